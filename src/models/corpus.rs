use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;

use super::Movie;

/// Immutable ordered collection of movies.
///
/// Index position doubles as the similarity-matrix axis and is stable for the
/// process lifetime. The exact-title lookup keeps the first occurrence when
/// two movies share a title; later duplicates are unreachable by exact lookup
/// but stay addressable by index.
pub struct Corpus {
    movies: Vec<Movie>,
    title_index: HashMap<String, usize>,
}

impl Corpus {
    pub fn new(movies: Vec<Movie>) -> Self {
        let mut title_index = HashMap::with_capacity(movies.len());
        for (idx, movie) in movies.iter().enumerate() {
            // first-wins on duplicate titles
            title_index.entry(movie.title.clone()).or_insert(idx);
        }
        Self {
            movies,
            title_index,
        }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Movie> {
        self.movies.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.movies.iter()
    }

    /// Exact-title lookup; first occurrence wins for duplicate titles.
    pub fn index_of_title(&self, title: &str) -> Option<usize> {
        self.title_index.get(title).copied()
    }

    /// Lookup by external id.
    pub fn by_id(&self, id: i64) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == id)
    }

    /// Titles in corpus order, paginated.
    pub fn titles(&self, offset: usize, limit: usize) -> Vec<String> {
        self.movies
            .iter()
            .skip(offset)
            .take(limit)
            .map(|m| m.title.clone())
            .collect()
    }

    /// The `count` highest-rated movies, descending rating, corpus-order
    /// tie-break. Unrated movies are excluded.
    pub fn top_rated(&self, count: usize) -> Vec<&Movie> {
        let mut rated: Vec<(usize, f64)> = self
            .movies
            .iter()
            .enumerate()
            .filter_map(|(idx, m)| m.rating.map(|r| (idx, r)))
            .collect();
        rated.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        rated
            .into_iter()
            .take(count)
            .map(|(idx, _)| &self.movies[idx])
            .collect()
    }

    /// Movies matching a case-insensitive title substring and/or genre
    /// substring, in corpus order.
    pub fn search(&self, title_query: Option<&str>, genre: Option<&str>) -> Vec<&Movie> {
        let title_query = title_query.map(str::to_lowercase);
        let genre = genre.map(str::to_lowercase);
        self.movies
            .iter()
            .filter(|m| {
                title_query
                    .as_deref()
                    .map_or(true, |q| m.title.to_lowercase().contains(q))
            })
            .filter(|m| {
                genre.as_deref().map_or(true, |g| {
                    m.genres.iter().any(|tag| tag.to_lowercase().contains(g))
                })
            })
            .collect()
    }

    /// Sorted distinct genre tags.
    pub fn distinct_genres(&self) -> Vec<String> {
        let mut genres: Vec<String> = self
            .movies
            .iter()
            .flat_map(|m| m.genres.iter().cloned())
            .collect();
        genres.sort();
        genres.dedup();
        genres
    }

    /// The `top_k` most frequent genre tags, descending count with
    /// alphabetical tie-break.
    pub fn genre_frequency(&self, top_k: usize) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for movie in &self.movies {
            for tag in &movie.genres {
                *counts.entry(tag.as_str()).or_insert(0) += 1;
            }
        }
        let mut sorted: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(tag, count)| (tag.to_string(), count))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        sorted.truncate(top_k);
        sorted
    }

    /// Histogram over half-open rating bins defined by `edges`
    /// (`edges[i] <= r < edges[i + 1]`). Unrated movies are not counted.
    pub fn rating_histogram(&self, edges: &[f64]) -> Vec<usize> {
        let mut counts = vec![0usize; edges.len().saturating_sub(1)];
        for rating in self.movies.iter().filter_map(|m| m.rating) {
            for i in 0..counts.len() {
                if rating >= edges[i] && rating < edges[i + 1] {
                    counts[i] += 1;
                    break;
                }
            }
        }
        counts
    }

    /// Mean of all present ratings.
    pub fn mean_rating(&self) -> Option<f64> {
        let ratings: Vec<f64> = self.movies.iter().filter_map(|m| m.rating).collect();
        if ratings.is_empty() {
            return None;
        }
        Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
    }

    /// Oldest and newest release dates present in the corpus.
    pub fn release_date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.movies.iter().filter_map(|m| m.release_date);
        let first = dates.next()?;
        let (oldest, newest) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some((oldest, newest))
    }
}
