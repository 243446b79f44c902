use std::cmp::Ordering;
use std::time::Instant;

use crate::models::{Corpus, MatchTier, Movie, Recommendation};

use super::resolver::{Resolution, ResolverOptions, TitleResolver};
use super::similarity::SimilarityMatrix;
use super::vectorizer::TfidfVectorizer;

/// Default number of similarity results per query
pub const DEFAULT_RECOMMENDATIONS: usize = 5;

/// A resolved query answered with ranked recommendations.
#[derive(Debug, Clone)]
pub struct RecommendationSet {
    /// Canonical title of the movie the query resolved to
    pub base_title: String,
    pub tier: MatchTier,
    pub recommendations: Vec<Recommendation>,
}

/// Outcome of `resolve_and_recommend`. `NotFound` is a normal terminal
/// result carrying alternatives, not a fault.
#[derive(Debug, Clone)]
pub enum RecommendOutcome {
    Found(RecommendationSet),
    NotFound { suggestions: Vec<String> },
}

/// Content-similarity recommendation engine.
///
/// Owns the corpus, the fitted vocabulary, and the all-pairs similarity
/// matrix. Everything is built once at startup and immutable afterwards, so
/// an `Arc<RecommendationEngine>` is safe to share across handler tasks with
/// no locking.
pub struct RecommendationEngine {
    corpus: Corpus,
    matrix: SimilarityMatrix,
    resolver: TitleResolver,
    vocabulary_size: usize,
}

impl RecommendationEngine {
    /// Vectorizes every movie and materializes the similarity matrix.
    /// Blocks until complete; serving must not start before this returns.
    pub fn build(movies: Vec<Movie>) -> Self {
        Self::with_options(movies, ResolverOptions::default())
    }

    pub fn with_options(movies: Vec<Movie>, options: ResolverOptions) -> Self {
        let corpus = Corpus::new(movies);

        let started = Instant::now();
        let vectorizer = TfidfVectorizer::fit(&corpus);
        let vocabulary_size = vectorizer.vocabulary_size();
        tracing::info!(
            movies = corpus.len(),
            vocabulary = vocabulary_size,
            "TF-IDF vectors built"
        );

        let matrix = SimilarityMatrix::build(vectorizer.vectors());
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "similarity matrix ready"
        );

        Self {
            corpus,
            matrix,
            resolver: TitleResolver::new(options),
            vocabulary_size,
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    /// Ranked similar movies for a known corpus index.
    ///
    /// Scores sort descending with ascending-index tie-break, the query index
    /// itself is dropped, and at most `n` entries are returned. Out-of-range
    /// indices yield an empty list.
    pub fn recommendations_for_index(&self, idx: usize, n: usize) -> Vec<Recommendation> {
        if idx >= self.corpus.len() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .matrix
            .row(idx)
            .iter()
            .copied()
            .enumerate()
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        scored
            .into_iter()
            .filter(|&(i, _)| i != idx)
            .take(n)
            .filter_map(|(i, score)| {
                self.corpus
                    .get(i)
                    .map(|m| Recommendation::from_movie(m, round_score(score)))
            })
            .collect()
    }

    /// Tiered resolution plus ranked retrieval.
    ///
    /// On an exact or case-insensitive match the resolved movie is prepended
    /// with score 1.0 and the list is deduplicated by title, so a duplicate
    /// title among the similarity results never appears twice. Substring
    /// matches return the similarity results alone.
    pub fn resolve_and_recommend(&self, query: &str, n: usize) -> RecommendOutcome {
        let resolved = match self.resolver.resolve(&self.corpus, query) {
            Resolution::NoMatch { suggestions } => {
                return RecommendOutcome::NotFound { suggestions }
            }
            Resolution::Match(resolved) => resolved,
        };

        let mut recommendations = self.recommendations_for_index(resolved.index, n);

        if matches!(resolved.tier, MatchTier::Exact | MatchTier::CaseInsensitive) {
            if let Some(movie) = self.corpus.get(resolved.index) {
                recommendations.retain(|r| r.title != movie.title);
                recommendations.insert(0, Recommendation::from_movie(movie, 1.0));
            }
        }

        RecommendOutcome::Found(RecommendationSet {
            base_title: resolved.title,
            tier: resolved.tier,
            recommendations,
        })
    }
}

/// Similarity rounded to 4 decimal digits for the wire.
fn round_score(score: f32) -> f64 {
    (score as f64 * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i64, title: &str, overview: &str, rating: Option<f64>) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            overview: overview.to_string(),
            genres: vec![],
            keywords: vec![],
            rating,
            vote_count: None,
            release_date: None,
        }
    }

    /// Avatar and Avatar 2 share sci-fi vocabulary; Titanic does not.
    fn engine() -> RecommendationEngine {
        RecommendationEngine::build(vec![
            movie(
                10,
                "Avatar",
                "alien planet pandora navi marine spaceship",
                Some(7.2),
            ),
            movie(
                11,
                "Avatar 2",
                "alien planet pandora ocean navi spaceship",
                Some(7.6),
            ),
            movie(
                12,
                "Titanic",
                "ocean liner iceberg romance disaster",
                Some(7.9),
            ),
        ])
    }

    #[test]
    fn test_recommendations_exclude_self_and_respect_bound() {
        let engine = engine();
        for idx in 0..3 {
            let recs = engine.recommendations_for_index(idx, 2);
            assert!(recs.len() <= 2);
            let self_id = engine.corpus().get(idx).map(|m| m.id);
            assert!(recs.iter().all(|r| Some(r.id) != self_id));
        }
    }

    #[test]
    fn test_recommendations_ranked_by_similarity() {
        let engine = engine();
        let recs = engine.recommendations_for_index(0, 2);
        assert_eq!(recs[0].title, "Avatar 2");
        assert_eq!(recs[1].title, "Titanic");
        assert!(recs[0].score > recs[1].score);
    }

    #[test]
    fn test_out_of_range_index_is_empty() {
        assert!(engine().recommendations_for_index(99, 5).is_empty());
    }

    #[test]
    fn test_ties_break_by_ascending_index() {
        // Three identical documents: rows tie pairwise at 1.0.
        let engine = RecommendationEngine::build(vec![
            movie(1, "A", "same words here", None),
            movie(2, "B", "same words here", None),
            movie(3, "C", "same words here", None),
        ]);
        let recs = engine.recommendations_for_index(2, 2);
        let titles: Vec<&str> = recs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_determinism() {
        let engine = engine();
        let first = engine.recommendations_for_index(0, 3);
        let second = engine.recommendations_for_index(0, 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_case_insensitive_query_prepends_self() {
        let engine = engine();
        let outcome = engine.resolve_and_recommend("avatar", 5);
        match outcome {
            RecommendOutcome::Found(set) => {
                assert_eq!(set.tier, MatchTier::CaseInsensitive);
                assert_eq!(set.base_title, "Avatar");
                assert_eq!(set.recommendations[0].title, "Avatar");
                assert_eq!(set.recommendations[0].score, 1.0);
                // Avatar 2 ranks above Titanic on shared sci-fi vocabulary.
                assert_eq!(set.recommendations[1].title, "Avatar 2");
                assert_eq!(set.recommendations[2].title, "Titanic");
            }
            other => panic!("expected found, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_match_does_not_prepend() {
        let engine = engine();
        match engine.resolve_and_recommend("vata", 5) {
            RecommendOutcome::Found(set) => {
                assert_eq!(set.tier, MatchTier::Partial);
                assert!(set.recommendations.iter().all(|r| r.score < 1.0));
            }
            other => panic!("expected found, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_titles_deduplicated_on_prepend() {
        let engine = RecommendationEngine::build(vec![
            movie(1, "Solaris", "space station psychology ocean planet", None),
            movie(2, "Solaris", "space station psychology ocean planet", None),
            movie(3, "Stalker", "zone guide wish room", None),
        ]);
        match engine.resolve_and_recommend("Solaris", 5) {
            RecommendOutcome::Found(set) => {
                let solaris_count = set
                    .recommendations
                    .iter()
                    .filter(|r| r.title == "Solaris")
                    .count();
                assert_eq!(solaris_count, 1);
                assert_eq!(set.recommendations[0].score, 1.0);
                // Bounded by n + 1 even with the prepended head.
                assert!(set.recommendations.len() <= 6);
            }
            other => panic!("expected found, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_query_carries_suggestions() {
        let engine = engine();
        match engine.resolve_and_recommend("Avatr", 5) {
            RecommendOutcome::NotFound { suggestions } => {
                assert!(!suggestions.is_empty());
                assert!(suggestions.len() <= 5);
            }
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_text_document_scores_zero() {
        let engine = RecommendationEngine::build(vec![
            movie(1, "Blank", "", None),
            movie(2, "Wordy", "alien planet spaceship", None),
            movie(3, "Texty", "romance disaster ocean", None),
        ]);
        let recs = engine.recommendations_for_index(0, 2);
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn test_single_movie_corpus_yields_no_recommendations() {
        let engine = RecommendationEngine::build(vec![movie(1, "Lonely", "words", None)]);
        assert!(engine.recommendations_for_index(0, 5).is_empty());
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(0.123_456), 0.1235);
        assert_eq!(round_score(1.0), 1.0);
        assert_eq!(round_score(0.0), 0.0);
    }
}
