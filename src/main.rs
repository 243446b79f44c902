use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use cinematch_api::api::{create_router, AppState};
use cinematch_api::config::Config;
use cinematch_api::dataset;
use cinematch_api::services::{PosterCache, RecommendationEngine, TmdbProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Loading the snapshot and building the index block serving on purpose:
    // the process must not accept requests against a partial corpus.
    let movies = dataset::load_movies(Path::new(&config.dataset_path))?;
    tracing::info!(
        movies = movies.len(),
        path = %config.dataset_path,
        "Dataset loaded"
    );
    if movies.len() < 2 {
        tracing::warn!("Corpus has fewer than two movies; recommendation lists will be empty");
    }

    let engine = RecommendationEngine::build(movies);

    let provider = TmdbProvider::from_config(&config)?;
    if config.tmdb_api_key.is_none() {
        tracing::warn!("TMDB_API_KEY not set; poster lookups disabled");
    }
    let posters = PosterCache::new(Arc::new(provider));

    let state = AppState::new(engine, posters);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
