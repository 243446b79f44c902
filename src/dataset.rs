use std::path::Path;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::Movie;

lazy_static! {
    static ref TAG_SPLIT: Regex = Regex::new(r"\s*[|,;/]+\s*").expect("valid regex");
}

/// One row of the finalized ingestion snapshot.
///
/// The upstream pipeline owns cleaning decisions (outlier trimming, null
/// handling); this loader only maps required columns and flattens the
/// stringified tag lists. Extra columns in the snapshot are ignored.
#[derive(Debug, Deserialize)]
struct MovieRecord {
    id: i64,
    original_title: String,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    genres: Option<String>,
    #[serde(default)]
    keywords: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
    #[serde(default)]
    vote_count: Option<u32>,
    #[serde(default)]
    release_date: Option<NaiveDate>,
}

impl From<MovieRecord> for Movie {
    fn from(record: MovieRecord) -> Self {
        Movie {
            id: record.id,
            title: record.original_title,
            overview: record.overview.unwrap_or_default(),
            genres: parse_tags(record.genres.as_deref().unwrap_or("")),
            keywords: parse_tags(record.keywords.as_deref().unwrap_or("")),
            rating: record.vote_average,
            vote_count: record.vote_count,
            release_date: record.release_date,
        }
    }
}

/// Flattens a stringified tag list into individual tags.
///
/// Accepts both the bracketed list form (`"['Action', 'Adventure']"`) and
/// plain delimited forms (`"Action|Adventure"`, `"Action, Adventure"`).
pub fn parse_tags(raw: &str) -> Vec<String> {
    let stripped: String = raw
        .chars()
        .map(|c| match c {
            '[' | ']' | '{' | '}' | '"' | '\'' => ' ',
            other => other,
        })
        .collect();
    TAG_SPLIT
        .split(&stripped)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Loads the finalized movie snapshot produced by the ingestion pipeline.
///
/// Any unreadable file or row missing a required column is fatal: the
/// service must not start serving against a partially loaded corpus.
pub fn load_movies(path: &Path) -> AppResult<Vec<Movie>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| AppError::DataLoad(format!("failed to open {}: {}", path.display(), e)))?;

    let mut movies = Vec::new();
    for (row, result) in reader.deserialize::<MovieRecord>().enumerate() {
        // +2: header line plus 1-based numbering
        let record =
            result.map_err(|e| AppError::DataLoad(format!("row {}: {}", row + 2, e)))?;
        movies.push(Movie::from(record));
    }

    Ok(movies)
}
