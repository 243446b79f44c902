use std::cmp::Ordering;

use crate::models::{Corpus, MatchTier};

/// Successful resolution of a free-text query to a corpus entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTitle {
    pub index: usize,
    pub title: String,
    pub tier: MatchTier,
}

/// Outcome of tiered resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Match(ResolvedTitle),
    /// No tier matched; carries up to `max_suggestions` alternative titles.
    NoMatch { suggestions: Vec<String> },
}

/// Fuzzy-suggestion knobs. These are configuration with conventional
/// defaults, not tuned thresholds.
#[derive(Debug, Clone, Copy)]
pub struct ResolverOptions {
    /// Minimum normalized edit similarity for a fuzzy suggestion
    pub suggestion_cutoff: f64,
    /// Maximum number of fuzzy suggestions returned
    pub max_suggestions: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            suggestion_cutoff: 0.3,
            max_suggestions: 5,
        }
    }
}

/// Maps user-supplied free text to a corpus index through a fixed tier
/// ladder, first success wins:
///
/// 1. exact title (first-wins lookup)
/// 2. case-insensitive title equality, first match in corpus order
/// 3. case-insensitive substring, first match in corpus order — the first
///    hit, not the most similar one
/// 4. no match: fuzzy suggestions by normalized edit similarity, falling
///    back to the highest-rated titles when nothing clears the cutoff
pub struct TitleResolver {
    options: ResolverOptions,
}

impl TitleResolver {
    pub fn new(options: ResolverOptions) -> Self {
        Self { options }
    }

    pub fn resolve(&self, corpus: &Corpus, query: &str) -> Resolution {
        let query = query.trim();

        if let Some(index) = corpus.index_of_title(query) {
            return Resolution::Match(ResolvedTitle {
                index,
                title: query.to_string(),
                tier: MatchTier::Exact,
            });
        }

        let folded = query.to_lowercase();
        for (index, movie) in corpus.iter().enumerate() {
            if movie.title.to_lowercase() == folded {
                return Resolution::Match(ResolvedTitle {
                    index,
                    title: movie.title.clone(),
                    tier: MatchTier::CaseInsensitive,
                });
            }
        }

        for (index, movie) in corpus.iter().enumerate() {
            if movie.title.to_lowercase().contains(&folded) {
                return Resolution::Match(ResolvedTitle {
                    index,
                    title: movie.title.clone(),
                    tier: MatchTier::Partial,
                });
            }
        }

        Resolution::NoMatch {
            suggestions: self.suggestions(corpus, &folded),
        }
    }

    /// Titles within the edit-similarity cutoff, best first with corpus-order
    /// tie-break; the highest-rated titles when nothing clears the cutoff.
    fn suggestions(&self, corpus: &Corpus, folded_query: &str) -> Vec<String> {
        let mut scored: Vec<(usize, &str, f64)> = corpus
            .iter()
            .enumerate()
            .map(|(index, movie)| {
                let ratio = edit_similarity(folded_query, &movie.title.to_lowercase());
                (index, movie.title.as_str(), ratio)
            })
            .filter(|&(_, _, ratio)| ratio >= self.options.suggestion_cutoff)
            .collect();
        scored.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        let close: Vec<String> = scored
            .into_iter()
            .take(self.options.max_suggestions)
            .map(|(_, title, _)| title.to_string())
            .collect();
        if !close.is_empty() {
            return close;
        }

        corpus
            .top_rated(self.options.max_suggestions)
            .into_iter()
            .map(|m| m.title.clone())
            .collect()
    }
}

impl Default for TitleResolver {
    fn default() -> Self {
        Self::new(ResolverOptions::default())
    }
}

/// Normalized Levenshtein similarity in [0, 1].
fn edit_similarity(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a == 0 && len_b == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / len_a.max(len_b) as f64
}

/// Two-row Levenshtein distance over chars.
fn levenshtein(a: &str, b: &str) -> usize {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a == 0 {
        return len_b;
    }
    if len_b == 0 {
        return len_a;
    }

    let mut prev_row: Vec<usize> = (0..=len_b).collect();
    let mut curr_row = vec![0; len_b + 1];

    for (i, ca) in a.chars().enumerate() {
        curr_row[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr_row[j + 1] = (curr_row[j] + 1)
                .min(prev_row[j + 1] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[len_b]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Movie;

    fn movie(id: i64, title: &str, rating: Option<f64>) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            overview: String::new(),
            genres: vec![],
            keywords: vec![],
            rating,
            vote_count: None,
            release_date: None,
        }
    }

    fn corpus() -> Corpus {
        Corpus::new(vec![
            movie(1, "Avatar", Some(7.2)),
            movie(2, "Avatar 2", Some(7.6)),
            movie(3, "Titanic", Some(7.9)),
            movie(4, "Alien", Some(8.1)),
            movie(5, "Aliens", Some(8.0)),
        ])
    }

    #[test]
    fn test_exact_match_wins_over_substring() {
        // "Alien" is also a substring of "Aliens"; exact must win.
        let resolution = TitleResolver::default().resolve(&corpus(), "Alien");
        assert_eq!(
            resolution,
            Resolution::Match(ResolvedTitle {
                index: 3,
                title: "Alien".to_string(),
                tier: MatchTier::Exact,
            })
        );
    }

    #[test]
    fn test_exact_match_trims_whitespace() {
        let resolution = TitleResolver::default().resolve(&corpus(), "  Titanic  ");
        match resolution {
            Resolution::Match(resolved) => assert_eq!(resolved.tier, MatchTier::Exact),
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_case_insensitive_tier() {
        let resolution = TitleResolver::default().resolve(&corpus(), "avatar");
        assert_eq!(
            resolution,
            Resolution::Match(ResolvedTitle {
                index: 0,
                title: "Avatar".to_string(),
                tier: MatchTier::CaseInsensitive,
            })
        );
    }

    #[test]
    fn test_substring_takes_first_in_corpus_order() {
        // "ali" hits both "Alien" and "Aliens"; corpus order decides.
        let resolution = TitleResolver::default().resolve(&corpus(), "ali");
        assert_eq!(
            resolution,
            Resolution::Match(ResolvedTitle {
                index: 3,
                title: "Alien".to_string(),
                tier: MatchTier::Partial,
            })
        );
    }

    #[test]
    fn test_no_match_returns_close_suggestions() {
        let resolution = TitleResolver::default().resolve(&corpus(), "Avatr");
        match resolution {
            Resolution::NoMatch { suggestions } => {
                assert!(suggestions.len() <= 5);
                assert_eq!(suggestions[0], "Avatar");
            }
            other => panic!("expected no match, got {:?}", other),
        }
    }

    #[test]
    fn test_no_close_match_falls_back_to_top_rated() {
        let resolution = TitleResolver::default().resolve(&corpus(), "zzzzzzzzzzzzzzzzzzzz");
        match resolution {
            Resolution::NoMatch { suggestions } => {
                // Descending rating order.
                assert_eq!(
                    suggestions,
                    vec!["Alien", "Aliens", "Titanic", "Avatar 2", "Avatar"]
                );
            }
            other => panic!("expected no match, got {:?}", other),
        }
    }

    #[test]
    fn test_suggestion_bound_respects_options() {
        let resolver = TitleResolver::new(ResolverOptions {
            suggestion_cutoff: 0.0,
            max_suggestions: 2,
        });
        match resolver.resolve(&corpus(), "qqqqqqqqqqqqqqqqq") {
            Resolution::NoMatch { suggestions } => assert_eq!(suggestions.len(), 2),
            other => panic!("expected no match, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_corpus_never_errors() {
        let empty = Corpus::new(vec![]);
        assert_eq!(
            TitleResolver::default().resolve(&empty, "anything"),
            Resolution::NoMatch {
                suggestions: vec![]
            }
        );
    }

    #[test]
    fn test_duplicate_titles_resolve_to_first_occurrence() {
        let corpus = Corpus::new(vec![
            movie(1, "Solaris", Some(6.0)),
            movie(2, "Solaris", Some(7.0)),
        ]);
        match TitleResolver::default().resolve(&corpus, "Solaris") {
            Resolution::Match(resolved) => assert_eq!(resolved.index, 0),
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", "abc"), 0);
    }

    #[test]
    fn test_edit_similarity_range() {
        assert_eq!(edit_similarity("", ""), 1.0);
        assert_eq!(edit_similarity("abc", "abc"), 1.0);
        assert!(edit_similarity("abcd", "wxyz") <= 0.0 + f64::EPSILON);
    }
}
