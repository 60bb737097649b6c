//! Usage Tracker Module
//!
//! Per-key access counters backing the least-used eviction policy.

use std::collections::HashMap;

use crate::cache::CacheKey;

// == Usage Tracker ==
/// Tracks cumulative access counts for currently cached keys.
///
/// Counters never decay and are never capped, so a key that was hot early
/// resists eviction indefinitely even once it goes cold. That is the
/// intended (approximate-LFU) behavior, not strict LFU.
#[derive(Debug, Default)]
pub struct UsageTracker {
    /// Access count per cached key
    counts: HashMap<CacheKey, u64>,
}

impl UsageTracker {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    // == Touch ==
    /// Counts one access, starting from zero for an untracked key.
    ///
    /// Returns the updated count.
    pub fn touch(&mut self, key: &CacheKey) -> u64 {
        let count = self.counts.entry(key.clone()).or_insert(0);
        *count += 1;
        *count
    }

    // == Forget ==
    /// Drops a key's counter. The counter restarts from zero if the key
    /// is ever reinserted.
    pub fn forget(&mut self, key: &CacheKey) {
        self.counts.remove(key);
    }

    // == Transfer ==
    /// Moves a key's accumulated count to a new key, replacing any
    /// counter already present there. No-op when the old key is untracked.
    pub fn transfer(&mut self, old: &CacheKey, new: CacheKey) {
        if let Some(count) = self.counts.remove(old) {
            self.counts.insert(new, count);
        }
    }

    // == Count ==
    /// Returns the current count for a key (zero if untracked).
    pub fn count(&self, key: &CacheKey) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    // == Victim ==
    /// Selects the eviction victim: the key with the strictly smallest
    /// count, ties broken by the smallest `(owner, alias)` pair.
    pub fn victim(&self) -> Option<CacheKey> {
        self.counts
            .iter()
            .min_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)))
            .map(|(key, _)| key.clone())
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn key(alias: &str) -> CacheKey {
        CacheKey::new("u", alias)
    }

    #[test]
    fn test_tracker_new() {
        let tracker = UsageTracker::new();
        assert!(tracker.is_empty());
        assert_eq!(tracker.victim(), None);
    }

    #[test]
    fn test_touch_accumulates() {
        let mut tracker = UsageTracker::new();

        assert_eq!(tracker.touch(&key("a")), 1);
        assert_eq!(tracker.touch(&key("a")), 2);
        assert_eq!(tracker.touch(&key("a")), 3);
        assert_eq!(tracker.count(&key("a")), 3);
    }

    #[test]
    fn test_victim_picks_least_used() {
        let mut tracker = UsageTracker::new();

        tracker.touch(&key("hot"));
        tracker.touch(&key("hot"));
        tracker.touch(&key("hot"));
        tracker.touch(&key("warm"));
        tracker.touch(&key("warm"));
        tracker.touch(&key("cold"));

        assert_eq!(tracker.victim(), Some(key("cold")));
    }

    #[test]
    fn test_victim_tie_break_is_lexicographic() {
        let mut tracker = UsageTracker::new();

        tracker.touch(&key("b"));
        tracker.touch(&key("a"));
        tracker.touch(&key("c"));

        // All counts equal: smallest (owner, alias) wins.
        assert_eq!(tracker.victim(), Some(key("a")));
    }

    #[test]
    fn test_victim_tie_break_across_owners() {
        let mut tracker = UsageTracker::new();

        tracker.touch(&CacheKey::new("zoe", "a"));
        tracker.touch(&CacheKey::new("amy", "z"));

        assert_eq!(tracker.victim(), Some(CacheKey::new("amy", "z")));
    }

    #[test]
    fn test_forget_resets_count() {
        let mut tracker = UsageTracker::new();

        tracker.touch(&key("a"));
        tracker.touch(&key("a"));
        tracker.forget(&key("a"));

        assert_eq!(tracker.count(&key("a")), 0);
        assert_eq!(tracker.touch(&key("a")), 1);
    }

    #[test]
    fn test_transfer_moves_count() {
        let mut tracker = UsageTracker::new();

        tracker.touch(&key("old"));
        tracker.touch(&key("old"));
        tracker.transfer(&key("old"), key("new"));

        assert_eq!(tracker.count(&key("old")), 0);
        assert_eq!(tracker.count(&key("new")), 2);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_transfer_overwrites_target_count() {
        let mut tracker = UsageTracker::new();

        tracker.touch(&key("old"));
        tracker.touch(&key("old"));
        tracker.touch(&key("new"));
        tracker.transfer(&key("old"), key("new"));

        assert_eq!(tracker.count(&key("new")), 2);
    }

    #[test]
    fn test_transfer_missing_old_is_noop() {
        let mut tracker = UsageTracker::new();

        tracker.touch(&key("existing"));
        tracker.transfer(&key("missing"), key("target"));

        assert_eq!(tracker.count(&key("target")), 0);
        assert_eq!(tracker.len(), 1);
    }
}
