use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One corpus entry: a movie and the text metadata the similarity engine
/// feeds on. Immutable after corpus load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// External TMDB identifier
    pub id: i64,
    /// Display and lookup title
    pub title: String,
    /// Plot synopsis; empty when the source row had none
    pub overview: String,
    /// Genre tags in source order
    pub genres: Vec<String>,
    /// Keyword tags in source order
    pub keywords: Vec<String>,
    /// Average vote, 0-10 scale
    pub rating: Option<f64>,
    pub vote_count: Option<u32>,
    pub release_date: Option<NaiveDate>,
}

impl Movie {
    /// The "soup" string fed to the vectorizer: overview, genres, and
    /// keywords concatenated with single spaces.
    pub fn soup(&self) -> String {
        format!(
            "{} {} {}",
            self.overview,
            self.genres.join(" "),
            self.keywords.join(" ")
        )
    }
}
