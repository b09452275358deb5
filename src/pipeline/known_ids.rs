//! Bounded memory of recall ids seen by previous poll cycles.
//!
//! Ids are not timestamped, so numeric order stands in for age: when the
//! cache grows past its capacity the smallest ids are dropped first.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::models::RecallId;

/// Handle to a cache shared between poll cycles.
pub type SharedKnownIds = Arc<Mutex<KnownIdCache>>;

/// Set of known recall ids with a maximum cardinality.
#[derive(Debug, Clone)]
pub struct KnownIdCache {
    ids: BTreeSet<RecallId>,
    capacity: usize,
}

impl KnownIdCache {
    /// Create an empty cache holding at most `capacity` ids.
    pub fn new(capacity: usize) -> Self {
        Self {
            ids: BTreeSet::new(),
            capacity,
        }
    }

    /// Wrap the cache in a handle that serializes mutation.
    pub fn shared(self) -> SharedKnownIds {
        Arc::new(Mutex::new(self))
    }

    pub fn contains(&self, id: RecallId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Candidates not present in the cache. Does not mutate.
    pub fn new_ids(&self, candidates: &HashSet<RecallId>) -> HashSet<RecallId> {
        candidates
            .iter()
            .copied()
            .filter(|id| !self.ids.contains(id))
            .collect()
    }

    /// Insert ids without enforcing the capacity.
    pub fn add_all(&mut self, ids: impl IntoIterator<Item = RecallId>) {
        self.ids.extend(ids);
    }

    /// Drop the smallest ids until the capacity holds again.
    ///
    /// Returns the number of evicted ids.
    pub fn evict_to_capacity(&mut self) -> usize {
        let mut evicted = 0;
        while self.ids.len() > self.capacity {
            self.ids.pop_first();
            evicted += 1;
        }
        evicted
    }

    /// Insert then evict in one step.
    pub fn commit(&mut self, ids: impl IntoIterator<Item = RecallId>) -> usize {
        self.add_all(ids);
        self.evict_to_capacity()
    }

    /// Iterate ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = RecallId> + '_ {
        self.ids.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_is_set_difference() {
        let mut cache = KnownIdCache::new(10);
        cache.add_all([1, 2, 3]);

        let candidates = HashSet::from([2, 3, 4, 5]);
        assert_eq!(cache.new_ids(&candidates), HashSet::from([4, 5]));
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(4));
    }

    #[test]
    fn test_empty_cache_reports_everything_new() {
        let cache = KnownIdCache::new(10);
        let candidates = HashSet::from([7, 8]);
        assert_eq!(cache.new_ids(&candidates), candidates);
    }

    #[test]
    fn test_evicts_smallest_ids() {
        let mut cache = KnownIdCache::new(3);
        let evicted = cache.commit([10, 4, 7, 1, 12]);

        assert_eq!(evicted, 2);
        assert_eq!(cache.iter().collect::<Vec<_>>(), vec![7, 10, 12]);
    }

    #[test]
    fn test_add_all_does_not_evict() {
        let mut cache = KnownIdCache::new(1);
        cache.add_all([1, 2]);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.evict_to_capacity(), 1);
        assert!(cache.contains(2));
    }

    #[test]
    fn test_retains_largest_regardless_of_insertion_order() {
        let batches: [&[&[RecallId]]; 3] = [
            &[&[1, 2, 3], &[9, 8], &[4, 5, 6, 7]],
            &[&[9, 8, 7], &[1], &[2, 3, 4, 5, 6]],
            &[&[5], &[3, 9], &[1, 7], &[2, 8, 6, 4]],
        ];

        for history in batches {
            let mut cache = KnownIdCache::new(4);
            for batch in history {
                cache.commit(batch.iter().copied());
                assert!(cache.len() <= cache.capacity());
            }
            assert_eq!(cache.iter().collect::<Vec<_>>(), vec![6, 7, 8, 9]);
        }
    }

    #[test]
    fn test_smaller_id_after_eviction_is_dropped_again() {
        let mut cache = KnownIdCache::new(2);
        cache.commit([5, 6, 7]);
        cache.commit([1]);
        assert_eq!(cache.iter().collect::<Vec<_>>(), vec![6, 7]);
    }

    #[tokio::test]
    async fn test_shared_handle() {
        let shared = KnownIdCache::new(2).shared();
        shared.lock().await.commit([1, 2, 3]);
        assert_eq!(shared.lock().await.len(), 2);
    }
}
