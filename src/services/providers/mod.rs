/// Poster-metadata provider abstraction
///
/// Keeps the recommendation path decoupled from any one metadata vendor.
/// TMDB is the only production provider today; the trait exists so tests can
/// substitute a mock and so another vendor can slot in without touching the
/// cache or the handlers.
use crate::error::AppResult;

pub mod tmdb;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    /// Look up the poster image URL for an external movie id.
    ///
    /// `Ok(None)` means the movie genuinely has no poster. Errors are
    /// upstream faults; the poster cache converts both into a permanently
    /// cached absent result.
    async fn fetch_poster(&self, movie_id: i64) -> AppResult<Option<String>>;

    /// Whether lookups can succeed at all (e.g. an API key is configured)
    fn is_enabled(&self) -> bool;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
