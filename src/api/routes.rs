use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    // Frontend is served from a different origin; allow everything.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::home))
        .route("/api/health", get(handlers::health))
        .route("/api/movies", get(handlers::list_movies))
        .route("/api/recommend", post(handlers::recommend))
        .route("/api/movie/:movie_id", get(handlers::movie_details))
        .route("/api/random", get(handlers::random_movies))
        .route("/api/top", get(handlers::top_movies))
        .route("/api/search", get(handlers::search_movies))
        .route("/api/genres", get(handlers::list_genres))
        .route("/api/stats", get(handlers::stats))
        .route(
            "/api/analytics/rating-distribution",
            get(handlers::rating_distribution),
        )
        .route(
            "/api/analytics/genre-frequency",
            get(handlers::genre_frequency),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}
