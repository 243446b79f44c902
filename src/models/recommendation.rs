use serde::Serialize;

use super::Movie;

/// Strategy level at which a free-text query resolved to a corpus entry.
///
/// Wire names match the original API contract.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum MatchTier {
    #[serde(rename = "exact")]
    Exact,
    #[serde(rename = "case-insensitive")]
    CaseInsensitive,
    #[serde(rename = "partial")]
    Partial,
}

/// One ranked entry in a recommendation response.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub id: i64,
    /// Vote average rounded to one decimal; absent when the source had none
    pub rating: Option<f64>,
    pub genres: Vec<String>,
    pub overview: String,
    /// Cosine similarity against the query movie, rounded to 4 decimals;
    /// 1.0 when this entry echoes the resolved movie itself
    pub score: f64,
    /// Poster URL, filled in from the poster cache by the transport layer
    pub poster: Option<String>,
}

impl Recommendation {
    pub fn from_movie(movie: &Movie, score: f64) -> Self {
        Self {
            title: movie.title.clone(),
            id: movie.id,
            rating: movie.rating.map(|r| (r * 10.0).round() / 10.0),
            genres: movie.genres.clone(),
            overview: movie.overview.clone(),
            score,
            poster: None,
        }
    }
}
