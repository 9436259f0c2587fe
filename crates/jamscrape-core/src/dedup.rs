//! Per-jam-run deduplication of game ids.
//!
//! The cache exists to prevent redundant fetch work when an id appears more
//! than once in a feed. It is not a data-integrity mechanism: a game that
//! fails mid-pipeline is not retried within the same run.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// A set of claimed game ids, scoped to one jam run and shared by all of
/// that run's game tasks.
///
/// The membership test and the insert happen under a single lock
/// acquisition, so a second concurrent claim for the same id always
/// observes the first and skips.
#[derive(Debug, Clone, Default)]
pub struct DedupCache {
    claimed: Arc<Mutex<HashSet<String>>>,
}

impl DedupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim an id. Returns true if this caller won the claim,
    /// false if the id was already claimed in this run.
    pub fn claim(&self, id: &str) -> bool {
        let mut claimed = self.claimed.lock().expect("dedup lock poisoned");
        claimed.insert(id.to_string())
    }

    /// Number of ids claimed so far in this run.
    pub fn len(&self) -> usize {
        self.claimed.lock().expect("dedup lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_claim_wins_second_observes() {
        let cache = DedupCache::new();
        assert!(cache.claim("42"));
        assert!(!cache.claim("42"));
        assert!(cache.claim("43"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn clones_share_the_same_set() {
        let cache = DedupCache::new();
        let other = cache.clone();
        assert!(cache.claim("42"));
        assert!(!other.claim("42"));
    }

    #[tokio::test]
    async fn concurrent_claims_grant_exactly_one_winner() {
        let cache = DedupCache::new();
        let mut handles = Vec::new();
        for _ in 0..32 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move { cache.claim("contested") }));
        }
        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(cache.len(), 1);
    }
}
