//! LRU cache: recency list and lookup index kept in lockstep

use std::hash::Hash;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::index::LookupIndex;
use crate::list::{Iter, RecencyList};
use crate::stats::CacheStats;

/// LRU cache with fixed capacity
///
/// Every `get` or `put` hit promotes the entry to the front. Inserting a new
/// key into a full cache first evicts the back (least recently used) entry.
#[derive(Debug)]
pub struct LruCache<K, V> {
    /// Owns every entry, front = most recently used
    list: RecencyList<K, V>,

    /// Key -> handle into `list`
    index: LookupIndex<K>,

    stats: CacheStats,

    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of live entries
    ///
    /// # Returns
    /// * `Result<LruCache>` - Empty cache, or `InvalidCapacity` for 0
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(0));
        }

        debug!(capacity, "creating LRU cache");
        Ok(Self {
            list: RecencyList::with_capacity(capacity),
            index: LookupIndex::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
        })
    }

    /// Create a cache from a signed capacity, rejecting values <= 0
    pub fn try_from_signed(capacity: i64) -> Result<Self> {
        match usize::try_from(capacity) {
            Ok(capacity) if capacity > 0 => Self::new(capacity),
            _ => Err(Error::InvalidCapacity(capacity)),
        }
    }

    /// Get a value from the cache and promote it to most recently used
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.index.find(key) {
            Some(id) => {
                self.list.promote(id);
                self.stats.record_hit();
                self.list.get(id).map(|(_, value)| value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Get a value without touching the recency order or stats
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = self.index.find(key)?;
        self.list.get(id).map(|(_, value)| value)
    }

    /// Check if a key is cached, without promoting it
    pub fn contains(&self, key: &K) -> bool {
        self.index.find(key).is_some()
    }

    /// Insert or overwrite a key-value pair
    ///
    /// An existing key keeps its slot and moves to the front. A new key
    /// evicts the least recently used entry when the cache is full.
    pub fn put(&mut self, key: K, value: V) {
        if let Some(id) = self.index.find(&key) {
            // Update existing
            if let Some(slot) = self.list.get_mut(id) {
                *slot = value;
            }
            self.list.promote(id);
            self.stats.record_update();
            return;
        }

        if self.list.len() == self.capacity {
            self.evict();
        }

        let id = self.list.insert_front(key.clone(), value);
        self.index.insert(key, id);
        self.stats.record_insert();
    }

    /// Remove a key from the cache
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        self.list.remove(id).map(|(_, value)| value)
    }

    /// Drop every entry; capacity and stats are kept
    pub fn clear(&mut self) {
        debug!(entries = self.list.len(), "clearing LRU cache");
        self.list.clear();
        self.index.clear();
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate entries from most to least recently used, without promoting
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.list.iter()
    }

    /// Keys from most to least recently used
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.list.iter().map(|(key, _)| key)
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Reset hit/miss/eviction counters
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Verify that list and index describe the same set of entries
    pub fn check_invariants(&self) -> Result<()> {
        self.list.debug_validate_invariants()?;

        if self.list.len() > self.capacity {
            return Err(Error::Invariant(format!(
                "{} entries exceed capacity {}",
                self.list.len(),
                self.capacity
            )));
        }
        if self.index.len() != self.list.len() {
            return Err(Error::Invariant(format!(
                "index holds {} keys, list holds {}",
                self.index.len(),
                self.list.len()
            )));
        }

        for id in self.list.iter_ids() {
            let (key, _) = self
                .list
                .get(id)
                .ok_or_else(|| Error::Invariant(format!("dangling handle {}", id.index())))?;
            if self.index.find(key) != Some(id) {
                return Err(Error::Invariant(format!(
                    "index does not point at list slot {}",
                    id.index()
                )));
            }
        }

        Ok(())
    }

    /// Release the cache and every entry it owns
    pub fn destroy(self) {
        debug!(entries = self.list.len(), "destroying LRU cache");
    }

    fn evict(&mut self) {
        if let Some((key, _value)) = self.list.evict_back() {
            self.index.remove(&key);
            self.stats.record_eviction();
            trace!(len = self.list.len(), "evicted least recently used entry");
        }
    }
}
