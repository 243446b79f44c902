use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::Corpus;

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"(?u)\b\w\w+\b").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any",
            "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
            "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "down",
            "during", "each", "few", "for", "from", "further", "had", "has", "have", "having",
            "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "i", "if",
            "in", "into", "is", "it", "its", "itself", "just", "me", "more", "most", "my",
            "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or",
            "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should",
            "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
            "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
            "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where",
            "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
            "yours", "yourself", "yourselves",
        ];
        words.iter().copied().collect()
    };
}

pub type TermId = u32;

/// Sparse TF-IDF vector: `(term_id, weight)` pairs sorted by term id.
pub type TermVector = Vec<(TermId, f32)>;

/// Tokenize into lowercase word tokens of length >= 2 with stop words removed.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// TF-IDF vectorizer fitted over the whole corpus.
///
/// Vocabulary ids are assigned in first-seen order across corpus index order,
/// so a fixed corpus always produces the same vectors. Weights use smoothed
/// IDF (`ln((1 + N) / (1 + df)) + 1`) and each vector is L2-normalized; a
/// document whose soup is empty or all stop words gets an empty vector.
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, TermId>,
    vectors: Vec<TermVector>,
}

impl TfidfVectorizer {
    pub fn fit(corpus: &Corpus) -> Self {
        let docs: Vec<Vec<String>> = corpus.iter().map(|m| tokenize(&m.soup())).collect();

        // vocabulary in first-seen order, document frequency per term
        let mut vocabulary: HashMap<String, TermId> = HashMap::new();
        let mut df: Vec<u32> = Vec::new();
        for tokens in &docs {
            let mut seen: HashSet<TermId> = HashSet::new();
            for token in tokens {
                let next_id = vocabulary.len() as TermId;
                let id = *vocabulary.entry(token.clone()).or_insert(next_id);
                if id as usize == df.len() {
                    df.push(0);
                }
                if seen.insert(id) {
                    df[id as usize] += 1;
                }
            }
        }

        let n = docs.len() as f32;
        let idf: Vec<f32> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f32)).ln() + 1.0)
            .collect();

        let vectors = docs
            .iter()
            .map(|tokens| {
                let mut tf: HashMap<TermId, f32> = HashMap::new();
                for token in tokens {
                    *tf.entry(vocabulary[token.as_str()]).or_insert(0.0) += 1.0;
                }

                let mut vector: TermVector = tf
                    .into_iter()
                    .map(|(id, count)| (id, count * idf[id as usize]))
                    .collect();
                vector.sort_unstable_by_key(|&(id, _)| id);

                let norm = vector.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
                if norm > 0.0 {
                    for entry in &mut vector {
                        entry.1 /= norm;
                    }
                }
                vector
            })
            .collect();

        Self {
            vocabulary,
            vectors,
        }
    }

    /// The learned vocabulary (term -> term id), exposed for tests and
    /// reproducibility checks; serving only needs the vectors.
    pub fn vocabulary(&self) -> &HashMap<String, TermId> {
        &self.vocabulary
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vectors(&self) -> &[TermVector] {
        &self.vectors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Movie;

    fn movie(id: i64, overview: &str) -> Movie {
        Movie {
            id,
            title: format!("movie-{}", id),
            overview: overview.to_string(),
            genres: vec![],
            keywords: vec![],
            rating: None,
            vote_count: None,
            release_date: None,
        }
    }

    #[test]
    fn test_tokenize_drops_stopwords_and_short_tokens() {
        let tokens = tokenize("The ship sank in the Atlantic, a tragedy");
        assert_eq!(tokens, vec!["ship", "sank", "atlantic", "tragedy"]);
    }

    #[test]
    fn test_tokenize_lowercases() {
        assert_eq!(tokenize("ALIEN Invasion"), vec!["alien", "invasion"]);
    }

    #[test]
    fn test_empty_soup_yields_empty_vector() {
        let corpus = Corpus::new(vec![movie(1, "space alien ship"), movie(2, "the and of")]);
        let vectorizer = TfidfVectorizer::fit(&corpus);
        assert!(!vectorizer.vectors()[0].is_empty());
        assert!(vectorizer.vectors()[1].is_empty());
    }

    #[test]
    fn test_vectors_are_l2_normalized() {
        let corpus = Corpus::new(vec![
            movie(1, "space alien ship space"),
            movie(2, "alien ocean"),
        ]);
        let vectorizer = TfidfVectorizer::fit(&corpus);
        for vector in vectorizer.vectors() {
            let norm: f32 = vector.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_rare_terms_outweigh_common_terms() {
        // "alien" appears in every document, "submarine" in one.
        let corpus = Corpus::new(vec![
            movie(1, "alien submarine"),
            movie(2, "alien ocean"),
            movie(3, "alien desert"),
        ]);
        let vectorizer = TfidfVectorizer::fit(&corpus);
        let first = &vectorizer.vectors()[0];
        // term ids are first-seen: alien = 0, submarine = 1
        let alien = first.iter().find(|&&(id, _)| id == 0).map(|&(_, w)| w);
        let submarine = first.iter().find(|&&(id, _)| id == 1).map(|&(_, w)| w);
        assert!(submarine.unwrap() > alien.unwrap());
    }

    #[test]
    fn test_vocabulary_spans_corpus() {
        let corpus = Corpus::new(vec![movie(1, "space alien"), movie(2, "ocean alien")]);
        let vectorizer = TfidfVectorizer::fit(&corpus);
        assert_eq!(vectorizer.vocabulary_size(), 3);
        // ids assigned in first-seen order
        assert_eq!(vectorizer.vocabulary().get("space"), Some(&0));
        assert_eq!(vectorizer.vocabulary().get("alien"), Some(&1));
        assert_eq!(vectorizer.vocabulary().get("ocean"), Some(&2));
    }
}
