//! Lookup index: key -> recency list handle

use std::collections::HashMap;
use std::hash::Hash;
use ahash::RandomState;

use crate::list::EntryId;

/// Hash index from key to the [`EntryId`] of its list entry
///
/// Holds handles only; entries are owned by the recency list.
#[derive(Debug)]
pub struct LookupIndex<K> {
    map: HashMap<K, EntryId, RandomState>,
}

impl<K> LookupIndex<K>
where
    K: Hash + Eq,
{
    /// Create an index sized for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }

    /// Handle for `key`, if indexed
    pub fn find(&self, key: &K) -> Option<EntryId> {
        self.map.get(key).copied()
    }

    /// Record `key -> id`; the key must not already be indexed
    pub fn insert(&mut self, key: K, id: EntryId) {
        let previous = self.map.insert(key, id);
        debug_assert!(previous.is_none(), "key indexed twice");
    }

    /// Drop the mapping for `key`
    pub fn remove(&mut self, key: &K) -> Option<EntryId> {
        self.map.remove(key)
    }

    /// Number of indexed keys
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drop every mapping
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::RecencyList;

    #[test]
    fn test_index_find() {
        let mut list = RecencyList::new();
        let mut index = LookupIndex::with_capacity(4);

        let id = list.insert_front("alpha".to_string(), 1);
        index.insert("alpha".to_string(), id);

        assert_eq!(index.find(&"alpha".to_string()), Some(id));
        assert_eq!(index.find(&"beta".to_string()), None);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_index_remove() {
        let mut list = RecencyList::new();
        let mut index = LookupIndex::with_capacity(4);

        let id = list.insert_front(7u64, ());
        index.insert(7u64, id);

        assert_eq!(index.remove(&7), Some(id));
        assert_eq!(index.remove(&7), None);
        assert!(index.is_empty());
    }

    #[test]
    fn test_index_clear() {
        let mut list = RecencyList::new();
        let mut index = LookupIndex::with_capacity(4);

        for key in 0..3i64 {
            let id = list.insert_front(key, ());
            index.insert(key, id);
        }
        index.clear();

        assert!(index.is_empty());
        assert_eq!(index.find(&0), None);
    }
}
