use std::sync::Arc;

use crate::services::{PosterCache, RecommendationEngine};

/// Shared application state
///
/// The engine is fully immutable after startup and the poster cache is
/// internally synchronized, so handlers read both without locking. Cloning
/// is cheap (two `Arc`s).
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    pub posters: Arc<PosterCache>,
}

impl AppState {
    pub fn new(engine: RecommendationEngine, posters: PosterCache) -> Self {
        Self {
            engine: Arc::new(engine),
            posters: Arc::new(posters),
        }
    }
}
