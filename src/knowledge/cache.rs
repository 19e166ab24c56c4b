//! Bounded memoization of match decisions
//!
//! The matcher's verdict for a normalized query — the matched question key or
//! an explicit negative — is only valid against the question set it was
//! computed from, so the whole cache is cleared whenever an entry is added.

use std::num::NonZeroUsize;

use lru::LruCache;

/// A cached match decision: the matched question key, or `None` for an
/// explicit "no FAQ matched" verdict
pub type MatchDecision = Option<String>;

/// Bounded recency-evicting cache from normalized query to match decision
pub struct MatchCache {
    entries: LruCache<String, MatchDecision>,
}

impl std::fmt::Debug for MatchCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchCache")
            .field("len", &self.entries.len())
            .field("capacity", &self.entries.cap())
            .finish()
    }
}

impl MatchCache {
    /// Create a cache holding at most `capacity` decisions
    ///
    /// A zero capacity is bumped to one so the cache stays usable.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or_else(|| NonZeroUsize::new(1).expect("1 is non-zero"));
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Look up the memoized decision for a normalized query, refreshing its
    /// recency on hit
    pub fn get(&mut self, query: &str) -> Option<&MatchDecision> {
        self.entries.get(query)
    }

    /// Record a decision, evicting the least recently used entry when full
    pub fn insert(&mut self, query: String, decision: MatchDecision) {
        self.entries.put(query, decision);
    }

    /// Drop every cached decision
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached decisions
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no decisions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caches_positive_and_negative_decisions() {
        let mut cache = MatchCache::new(8);
        cache.insert("what is hpc".to_string(), Some("what is hpc".to_string()));
        cache.insert("weather".to_string(), None);

        assert_eq!(
            cache.get("what is hpc"),
            Some(&Some("what is hpc".to_string()))
        );
        assert_eq!(cache.get("weather"), Some(&None));
        assert_eq!(cache.get("unseen"), None);
    }

    #[test]
    fn evicts_least_recently_used_at_capacity() {
        let mut cache = MatchCache::new(2);
        cache.insert("a".to_string(), None);
        cache.insert("b".to_string(), None);

        // Touch "a" so "b" becomes the eviction candidate
        let _ = cache.get("a");
        cache.insert("c".to_string(), None);

        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn clear_empties_the_cache() {
        let mut cache = MatchCache::new(4);
        cache.insert("a".to_string(), None);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_capacity_is_bumped_to_one() {
        let mut cache = MatchCache::new(0);
        cache.insert("a".to_string(), None);
        assert_eq!(cache.len(), 1);
    }
}
