use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::models::{MatchTier, Movie, Recommendation};
use crate::services::{PosterCache, RecommendOutcome, DEFAULT_RECOMMENDATIONS};

use super::AppState;

const RATING_BIN_EDGES: [f64; 6] = [0.0, 2.0, 4.0, 6.0, 8.0, 10.0];
const RATING_BIN_LABELS: [&str; 5] = ["0-2", "2-4", "4-6", "6-8", "8-10"];

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub movie: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub movie: String,
    pub recommendations: Vec<Recommendation>,
    pub count: usize,
    pub base_title: String,
    pub match_type: MatchTier,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_list_limit() -> i64 {
    500
}

#[derive(Debug, Deserialize)]
pub struct CountParams {
    #[serde(default = "default_count")]
    pub count: i64,
}

fn default_count() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default = "default_search_limit")]
    pub limit: i64,
}

fn default_search_limit() -> i64 {
    20
}

/// Movie card shared by the listing endpoints
#[derive(Debug, Serialize)]
pub struct MovieCard {
    pub id: i64,
    pub title: String,
    pub rating: Option<f64>,
    pub poster: Option<String>,
    pub genres: Vec<String>,
    pub overview: String,
}

impl From<&Movie> for MovieCard {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            rating: movie.rating.map(|r| (r * 10.0).round() / 10.0),
            poster: None,
            genres: movie.genres.clone(),
            overview: movie.overview.clone(),
        }
    }
}

async fn attach_card_posters(posters: &PosterCache, cards: &mut [MovieCard]) {
    for card in cards.iter_mut() {
        card.poster = posters.get_or_fetch(card.id).await;
    }
}

// Handlers

/// Service banner with the endpoint listing
pub async fn home() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Movie Recommendation API",
        "version": "1.0",
        "endpoints": {
            "/api/movies": "GET - Get list of all movies",
            "/api/recommend": "POST - Get recommendations for a movie",
            "/api/movie/{id}": "GET - Get movie details by ID"
        }
    }))
}

/// Basic health/status endpoint
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "dataset_count": state.engine.corpus().len(),
        "tmdb_key_present": state.posters.provider_enabled(),
        "poster_cache_entries": state.posters.len().await,
    }))
}

/// Paginated movie titles in corpus order
pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Json<serde_json::Value> {
    let limit = params.limit.clamp(1, 1000) as usize;
    let offset = params.offset.max(0) as usize;

    let movies = state.engine.corpus().titles(offset, limit);
    let count = movies.len();
    Json(json!({
        "movies": movies,
        "count": count,
        "limit": limit,
        "offset": offset,
        "total": state.engine.corpus().len(),
    }))
}

/// Tiered title resolution plus ranked recommendations
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Response> {
    let movie_name = request.movie.trim();
    if movie_name.is_empty() {
        return Err(AppError::InvalidInput("Movie name is required".to_string()));
    }

    match state
        .engine
        .resolve_and_recommend(movie_name, DEFAULT_RECOMMENDATIONS)
    {
        RecommendOutcome::NotFound { suggestions } => {
            tracing::info!(query = %movie_name, "No match for recommendation query");
            Ok((
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": format!("Movie \"{}\" not found in database", movie_name),
                    "suggestions": suggestions,
                    "suggestion": "Try a suggested title",
                })),
            )
                .into_response())
        }
        RecommendOutcome::Found(set) => {
            let mut recommendations = set.recommendations;
            for rec in recommendations.iter_mut() {
                rec.poster = state.posters.get_or_fetch(rec.id).await;
            }

            tracing::info!(
                query = %movie_name,
                base_title = %set.base_title,
                results = recommendations.len(),
                "Recommendations served"
            );

            Ok(Json(RecommendResponse {
                movie: movie_name.to_string(),
                count: recommendations.len(),
                recommendations,
                base_title: set.base_title,
                match_type: set.tier,
            })
            .into_response())
        }
    }
}

/// Movie details by external id
pub async fn movie_details(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let corpus = state.engine.corpus();
    let movie = corpus
        .by_id(movie_id)
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    Ok(Json(json!({
        "id": movie.id,
        "title": movie.title,
        "overview": movie.overview,
        "genres": movie.genres,
        "rating": movie.rating,
        "vote_count": movie.vote_count.unwrap_or(0),
        "poster": state.posters.get_or_fetch(movie.id).await,
    })))
}

/// Uniformly sampled movies
pub async fn random_movies(
    State(state): State<AppState>,
    Query(params): Query<CountParams>,
) -> Json<serde_json::Value> {
    let corpus = state.engine.corpus();
    let count = (params.count.clamp(0, 50) as usize).min(corpus.len());

    // ThreadRng is not Send; sample before any await point.
    let sampled = {
        let mut rng = rand::thread_rng();
        rand::seq::index::sample(&mut rng, corpus.len(), count)
    };
    let mut cards: Vec<MovieCard> = sampled
        .iter()
        .filter_map(|idx| corpus.get(idx).map(MovieCard::from))
        .collect();
    attach_card_posters(&state.posters, &mut cards).await;

    let count = cards.len();
    Json(json!({
        "movies": cards,
        "count": count,
    }))
}

/// Highest-rated movies
pub async fn top_movies(
    State(state): State<AppState>,
    Query(params): Query<CountParams>,
) -> Json<serde_json::Value> {
    let count = params.count.clamp(0, 50) as usize;

    let mut cards: Vec<MovieCard> = state
        .engine
        .corpus()
        .top_rated(count)
        .into_iter()
        .map(MovieCard::from)
        .collect();
    attach_card_posters(&state.posters, &mut cards).await;

    let count = cards.len();
    Json(json!({
        "movies": cards,
        "count": count,
    }))
}

/// Search by title substring and/or genre
pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<serde_json::Value>> {
    let query = params.q.trim();
    let genre = params.genre.trim();
    let limit = params.limit.clamp(1, 50) as usize;

    if query.is_empty() && genre.is_empty() {
        return Err(AppError::InvalidInput(
            "Provide at least one of \"q\" or \"genre\"".to_string(),
        ));
    }

    let matches = state.engine.corpus().search(
        (!query.is_empty()).then_some(query),
        (!genre.is_empty()).then_some(genre),
    );
    let total_matches = matches.len();

    let mut cards: Vec<MovieCard> =
        matches.into_iter().take(limit).map(MovieCard::from).collect();
    attach_card_posters(&state.posters, &mut cards).await;

    let count = cards.len();
    Ok(Json(json!({
        "query": query,
        "genre": genre,
        "movies": cards,
        "count": count,
        "limit": limit,
        "total_matches": total_matches,
    })))
}

/// Sorted distinct genre tags
pub async fn list_genres(State(state): State<AppState>) -> Json<serde_json::Value> {
    let genres = state.engine.corpus().distinct_genres();
    Json(json!({
        "count": genres.len(),
        "genres": genres,
    }))
}

/// Corpus statistics
pub async fn stats(State(state): State<AppState>) -> Json<serde_json::Value> {
    let corpus = state.engine.corpus();
    let (oldest, newest) = match corpus.release_date_range() {
        Some((oldest, newest)) => (Some(oldest), Some(newest)),
        None => (None, None),
    };

    Json(json!({
        "total_movies": corpus.len(),
        "average_rating": corpus.mean_rating().map(|r| (r * 100.0).round() / 100.0),
        "total_genres": corpus.distinct_genres().len(),
        "date_range": {
            "oldest": oldest,
            "newest": newest,
        },
    }))
}

/// Rating histogram over fixed bins
pub async fn rating_distribution(State(state): State<AppState>) -> Json<serde_json::Value> {
    let counts = state.engine.corpus().rating_histogram(&RATING_BIN_EDGES);
    Json(json!({
        "labels": RATING_BIN_LABELS,
        "counts": counts,
        "total": state.engine.corpus().len(),
    }))
}

/// Top-15 genre counts
pub async fn genre_frequency(State(state): State<AppState>) -> Json<serde_json::Value> {
    let frequency = state.engine.corpus().genre_frequency(15);
    let labels: Vec<&str> = frequency.iter().map(|(tag, _)| tag.as_str()).collect();
    let counts: Vec<usize> = frequency.iter().map(|&(_, count)| count).collect();
    Json(json!({
        "labels": labels,
        "counts": counts,
    }))
}
