//! TF-IDF lexical index over the FAQ questions
//!
//! The index is derived, rebuildable state: it is fully re-fit whenever the
//! question list changes. Rebuilding is deterministic — the same questions in
//! the same order always produce identical vectors, so similarity scores are
//! reproducible across processes and test runs.

use std::collections::HashMap;

/// Maximum number of terms kept in the fitted vocabulary
pub const MAX_VOCABULARY: usize = 1000;

/// English stop words excluded from the vocabulary
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "could", "did", "do", "does",
    "doing", "down", "during", "each", "few", "for", "from", "further", "had",
    "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how",
    "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more",
    "most", "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "them",
    "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "would",
    "you", "your", "yours",
];

/// Sparse-text feature index: bounded uni/bi-gram vocabulary with smoothed
/// inverse document frequency weights and one feature vector per question
#[derive(Debug, Default)]
pub struct LexicalIndex {
    /// Term → column in the feature space
    vocabulary: HashMap<String, usize>,

    /// Smoothed IDF weight per column
    idf: Vec<f32>,

    /// One TF-IDF vector per question, in question insertion order
    vectors: Vec<Vec<f32>>,
}

impl LexicalIndex {
    /// Create an empty, unfitted index
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the index has been fit over a non-empty question list
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.vectors.is_empty() && !self.vocabulary.is_empty()
    }

    /// Number of indexed questions
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the index holds no questions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Fit the vocabulary and recompute all question vectors
    ///
    /// The vocabulary keeps the `MAX_VOCABULARY` most frequent terms across
    /// the corpus; ties break lexicographically so the fit is deterministic.
    pub fn rebuild<S: AsRef<str>>(&mut self, questions: &[S]) {
        self.vocabulary.clear();
        self.idf.clear();
        self.vectors.clear();

        if questions.is_empty() {
            return;
        }

        let docs: Vec<Vec<String>> = questions
            .iter()
            .map(|q| features(q.as_ref()))
            .collect();

        // Corpus-wide term counts and document frequencies
        let mut term_counts: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for doc in &docs {
            let mut seen: Vec<&str> = Vec::new();
            for term in doc {
                *term_counts.entry(term).or_insert(0) += 1;
                if !seen.contains(&term.as_str()) {
                    seen.push(term);
                    *doc_freq.entry(term).or_insert(0) += 1;
                }
            }
        }

        // Cap the vocabulary: most frequent terms first, lexicographic
        // tie-break keeps the selection deterministic
        let mut ranked: Vec<(&str, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(MAX_VOCABULARY);

        #[allow(clippy::cast_precision_loss)]
        let n_docs = docs.len() as f32;
        for (column, (term, _)) in ranked.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let df = doc_freq.get(term).copied().unwrap_or(0) as f32;
            // Smoothed IDF: ln((1 + n) / (1 + df)) + 1
            self.idf.push(((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
            self.vocabulary.insert((*term).to_string(), column);
        }

        let vectors = docs.iter().map(|doc| self.vectorize(doc)).collect();
        self.vectors = vectors;
    }

    /// Project a query into the fitted feature space
    ///
    /// Out-of-vocabulary terms contribute zero weight. Returns an all-zero
    /// vector when the index has never been fit.
    #[must_use]
    pub fn project(&self, query: &str) -> Vec<f32> {
        self.vectorize(&features(query))
    }

    /// Score a query against every indexed question
    ///
    /// Returns the insertion-order position and cosine similarity of the best
    /// match; equal scores resolve to the first-inserted question. `None`
    /// only when the index holds no questions.
    #[must_use]
    pub fn best_match(&self, query: &str) -> Option<(usize, f32)> {
        if self.vectors.is_empty() {
            return None;
        }

        let projected = self.project(query);

        let mut best_idx = 0;
        let mut best_score = f32::MIN;
        for (idx, vector) in self.vectors.iter().enumerate() {
            let score = cosine_similarity(&projected, vector);
            // Strict greater-than keeps the earliest index on ties
            if score > best_score {
                best_idx = idx;
                best_score = score;
            }
        }

        Some((best_idx, best_score))
    }

    /// Build the L2-normalized TF-IDF vector for one token list
    fn vectorize(&self, terms: &[String]) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.vocabulary.len()];
        for term in terms {
            if let Some(&column) = self.vocabulary.get(term) {
                vector[column] += self.idf[column];
            }
        }

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

/// Compute cosine similarity between two vectors
///
/// Returns 0.0 if either vector has zero magnitude or the lengths differ
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return 0.0;
    }

    dot / denom
}

/// Extract uni-gram and bi-gram features from a text
///
/// Tokens are lowercase alphanumeric runs of at least two characters with
/// stop words removed; bi-grams are formed over the filtered token sequence.
fn features(text: &str) -> Vec<String> {
    let tokens = tokenize(text);

    let mut features: Vec<String> = tokens.clone();
    for pair in tokens.windows(2) {
        features.push(format!("{} {}", pair[0], pair[1]));
    }
    features
}

/// Split a text into lowercase alphanumeric tokens, dropping stop words and
/// single-character fragments
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 2 && !STOP_WORDS.contains(t))
        .map(ToString::to_string)
        .collect()
}
