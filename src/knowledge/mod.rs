//! FAQ knowledge base: matching engine, cache, and persistence
//!
//! - **store**: load/save of the durable FAQ document
//! - **index**: TF-IDF lexical index over the questions
//! - **cache**: bounded memoization of match decisions
//! - **defaults**: built-in starter FAQ set
//!
//! The [`KnowledgeBase`] facade ties these together behind a mutex so a
//! multi-threaded host can race lookups against `add_entry` without observing
//! a half-rebuilt index. Lookups never return an error: every failure mode
//! degrades to "no match" so the caller can fall through to its generative
//! answer source.

pub mod cache;
pub mod defaults;
pub mod index;
pub mod store;

use std::sync::Mutex;

use indexmap::IndexMap;

use crate::config::MatchingConfig;
use cache::MatchCache;
use index::LexicalIndex;
use store::FaqStore;

pub use index::cosine_similarity;

/// Counters describing knowledge base activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchStats {
    /// Number of FAQ entries
    pub entries: usize,

    /// Decisions currently held by the match cache
    pub cache_entries: usize,

    /// Lookups answered from the match cache
    pub cache_hits: u64,

    /// Lookups answered by an exact key hit
    pub exact_hits: u64,

    /// Lookups that ran the vectorize-and-score step
    pub scored_queries: u64,
}

/// Mutable state guarded as one unit
#[derive(Debug)]
struct Inner {
    /// Question → answer, in insertion order; keys are normalized
    faqs: IndexMap<String, String>,

    index: LexicalIndex,
    cache: MatchCache,

    cache_hits: u64,
    exact_hits: u64,
    scored_queries: u64,
}

/// The FAQ matching engine and its persistence
///
/// Construct one per process (or per test fixture) and share it by
/// reference; there is no global instance.
#[derive(Debug)]
pub struct KnowledgeBase {
    store: FaqStore,
    threshold: f32,
    inner: Mutex<Inner>,
}

impl KnowledgeBase {
    /// Open a knowledge base backed by the given store
    ///
    /// Loads the persisted mapping (or the built-in defaults) and fits the
    /// lexical index over it.
    #[must_use]
    pub fn open(store: FaqStore, matching: &MatchingConfig) -> Self {
        let faqs = store.load();

        let mut index = LexicalIndex::new();
        let questions: Vec<&String> = faqs.keys().collect();
        index.rebuild(&questions);

        Self {
            store,
            threshold: matching.threshold,
            inner: Mutex::new(Inner {
                faqs,
                index,
                cache: MatchCache::new(matching.cache_capacity),
                cache_hits: 0,
                exact_hits: 0,
                scored_queries: 0,
            }),
        }
    }

    /// Look up an answer using the configured similarity threshold
    #[must_use]
    pub fn lookup(&self, query: &str) -> Option<String> {
        self.lookup_with_threshold(query, self.threshold)
    }

    /// Look up an answer with a caller-supplied threshold
    ///
    /// Pipeline: normalize → exact key hit → cached decision → TF-IDF cosine
    /// scoring with a strict greater-than threshold. A score exactly equal to
    /// the threshold is a miss. Ties resolve to the first-inserted question.
    #[must_use]
    pub fn lookup_with_threshold(&self, query: &str, threshold: f32) -> Option<String> {
        let normalized = normalize(query);
        if normalized.is_empty() {
            return None;
        }

        let mut guard = self.lock_inner();
        let inner = &mut *guard;

        // Exact matches bypass both the cache and scoring, so a freshly
        // added question answers deterministically at any threshold
        if let Some(answer) = inner.faqs.get(&normalized) {
            inner.exact_hits += 1;
            tracing::debug!(query = %normalized, "exact FAQ hit");
            return Some(answer.clone());
        }

        if let Some(decision) = inner.cache.get(&normalized).cloned() {
            inner.cache_hits += 1;
            tracing::debug!(query = %normalized, hit = decision.is_some(), "cached match decision");
            return decision.and_then(|key| inner.faqs.get(&key).cloned());
        }

        inner.scored_queries += 1;
        let decision = match inner.index.best_match(&normalized) {
            Some((best_idx, score)) if score > threshold => {
                let key = inner.faqs.get_index(best_idx).map(|(k, _)| k.clone());
                tracing::debug!(query = %normalized, score, key = ?key, "FAQ similarity match");
                key
            }
            Some((_, score)) => {
                tracing::debug!(query = %normalized, score, threshold, "no FAQ above threshold");
                None
            }
            None => {
                tracing::debug!(query = %normalized, "empty knowledge base");
                None
            }
        };

        inner.cache.insert(normalized, decision.clone());
        decision.and_then(|key| inner.faqs.get(&key).cloned())
    }

    /// Insert or overwrite a question → answer pair
    ///
    /// The question key is normalized; an existing key keeps its insertion
    /// position (last-write-wins on the answer). The lexical index is rebuilt
    /// and the match cache cleared before the mapping is persisted, so
    /// previously cached negatives cannot mask the new entry. Persistence is
    /// best-effort: a failed save is logged and the in-memory mapping stays
    /// authoritative.
    pub fn add_entry(&self, question: &str, answer: &str) {
        let normalized = normalize(question);
        if normalized.is_empty() {
            tracing::warn!("ignoring FAQ entry with empty question");
            return;
        }

        let mut guard = self.lock_inner();
        let inner = &mut *guard;

        let replaced = inner
            .faqs
            .insert(normalized.clone(), answer.to_string())
            .is_some();

        let questions: Vec<&String> = inner.faqs.keys().collect();
        inner.index.rebuild(&questions);
        inner.cache.clear();

        if let Err(e) = self.store.save(&inner.faqs) {
            tracing::warn!(error = %e, "failed to persist FAQ document");
        }

        tracing::info!(question = %normalized, replaced, "added FAQ entry");
    }

    /// Number of FAQ entries
    #[must_use]
    pub fn count(&self) -> usize {
        self.lock_inner().faqs.len()
    }

    /// All question keys in insertion order
    #[must_use]
    pub fn list_questions(&self) -> Vec<String> {
        self.lock_inner().faqs.keys().cloned().collect()
    }

    /// Snapshot of activity counters
    #[must_use]
    pub fn stats(&self) -> MatchStats {
        let inner = self.lock_inner();
        MatchStats {
            entries: inner.faqs.len(),
            cache_entries: inner.cache.len(),
            cache_hits: inner.cache_hits,
            exact_hits: inner.exact_hits,
            scored_queries: inner.scored_queries,
        }
    }

    /// Lock the inner state, recovering from a poisoned mutex
    fn lock_inner(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Normalize a text for key comparison: trim and lowercase
#[must_use]
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
