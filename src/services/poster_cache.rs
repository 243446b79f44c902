use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use super::providers::PosterProvider;

/// Process-wide poster URL cache.
///
/// One entry per movie id, each a `OnceCell`, so concurrent callers for the
/// same id join a single in-flight provider call instead of issuing their
/// own. Provider failures are stored as absent and never retried for the
/// process lifetime — indistinguishable from a movie with no poster.
pub struct PosterCache {
    provider: Arc<dyn PosterProvider>,
    entries: Mutex<HashMap<i64, Arc<OnceCell<Option<String>>>>>,
}

impl PosterCache {
    pub fn new(provider: Arc<dyn PosterProvider>) -> Self {
        Self {
            provider,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cached poster URL for `movie_id`, fetching through the provider on
    /// first use. At most one upstream request is ever made per id.
    pub async fn get_or_fetch(&self, movie_id: i64) -> Option<String> {
        let cell = {
            let mut entries = self.entries.lock().await;
            entries
                .entry(movie_id)
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        cell.get_or_init(|| async {
            match self.provider.fetch_poster(movie_id).await {
                Ok(poster) => poster,
                Err(error) => {
                    tracing::warn!(
                        movie_id,
                        provider = self.provider.name(),
                        error = %error,
                        "Poster lookup failed; caching absent result"
                    );
                    None
                }
            }
        })
        .await
        .clone()
    }

    /// Whether the underlying provider can return posters at all.
    pub fn provider_enabled(&self) -> bool {
        self.provider.is_enabled()
    }

    /// Number of cache entries, in-flight ones included.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
