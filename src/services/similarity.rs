use std::cmp::Ordering;

use super::vectorizer::TermVector;

/// Dense all-pairs cosine-similarity matrix.
///
/// Built eagerly at startup: O(N²) f32 memory in exchange for O(1) row
/// lookups on the query path. That is the right trade for corpora in the
/// low thousands (~100 MB at 5k movies); past roughly 20k entries, compute a
/// row per query from the sparse vectors instead — same contract, no
/// persistent matrix.
pub struct SimilarityMatrix {
    scores: Vec<f32>,
    n: usize,
}

impl SimilarityMatrix {
    /// Materialize pairwise similarities for pre-normalized sparse vectors.
    ///
    /// The diagonal is pinned to 1.0 for non-degenerate vectors and 0.0 for
    /// empty ones, so a zero-text document scores 0 against everything
    /// including itself.
    pub fn build(vectors: &[TermVector]) -> Self {
        let n = vectors.len();
        let mut scores = vec![0.0f32; n * n];
        for i in 0..n {
            scores[i * n + i] = if vectors[i].is_empty() { 0.0 } else { 1.0 };
            for j in (i + 1)..n {
                let s = sparse_dot(&vectors[i], &vectors[j]).min(1.0);
                scores[i * n + j] = s;
                scores[j * n + i] = s;
            }
        }
        Self { scores, n }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Similarity scores of document `i` against the whole corpus, aligned
    /// to corpus index order.
    pub fn row(&self, i: usize) -> &[f32] {
        &self.scores[i * self.n..(i + 1) * self.n]
    }

    pub fn similarity(&self, i: usize, j: usize) -> f32 {
        self.scores[i * self.n + j]
    }
}

/// Dot product of two term-id-sorted sparse vectors.
fn sparse_dot(a: &TermVector, b: &TermVector) -> f32 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}
