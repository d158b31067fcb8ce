//! Recency list: entries ordered from most to least recently used
//!
//! Entries live in an arena and link to their neighbours by slot index, so
//! promotion and eviction are O(1) splices without raw pointers. Freed slots
//! are recycled through a free list.

use crate::error::{Error, Result};

/// Stable handle to an entry in a [`RecencyList`]
///
/// A handle stays valid until its entry is removed or evicted; the slot may
/// then be reused by a later insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(usize);

impl EntryId {
    /// Arena slot backing this handle
    pub fn index(self) -> usize {
        self.0
    }
}

/// Node in the recency doubly-linked list
#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Arena-backed doubly-linked list, front = most recently used
#[derive(Debug)]
pub struct RecencyList<K, V> {
    nodes: Vec<Option<Node<K, V>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RecencyList<K, V> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty list with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the most recently used entry
    pub fn front_id(&self) -> Option<EntryId> {
        self.head.map(EntryId)
    }

    /// Handle of the least recently used entry
    pub fn back_id(&self) -> Option<EntryId> {
        self.tail.map(EntryId)
    }

    /// Check if `id` refers to a live entry
    pub fn contains(&self, id: EntryId) -> bool {
        self.node(id.0).is_some()
    }

    /// Key and value stored under `id`
    pub fn get(&self, id: EntryId) -> Option<(&K, &V)> {
        self.node(id.0).map(|node| (&node.key, &node.value))
    }

    /// Mutable value stored under `id`; does not change the order
    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut V> {
        self.node_mut(id.0).map(|node| &mut node.value)
    }

    /// Insert a brand-new entry at the front
    pub fn insert_front(&mut self, key: K, value: V) -> EntryId {
        let idx = self.alloc_node();
        self.nodes[idx] = Some(Node {
            key,
            value,
            prev: None,
            next: None,
        });
        self.link_front(idx);
        self.len += 1;
        EntryId(idx)
    }

    /// Move a live entry to the front
    ///
    /// No-op when the entry is already the front or is not live.
    pub fn promote(&mut self, id: EntryId) {
        if self.head == Some(id.0) || !self.contains(id) {
            return;
        }

        self.unlink(id.0);
        self.link_front(id.0);
    }

    /// Remove and return the back (least recently used) entry
    pub fn evict_back(&mut self) -> Option<(K, V)> {
        let tail = self.tail?;
        self.remove(EntryId(tail))
    }

    /// Remove an arbitrary entry
    pub fn remove(&mut self, id: EntryId) -> Option<(K, V)> {
        if !self.contains(id) {
            return None;
        }

        self.unlink(id.0);
        let node = self.nodes[id.0].take()?;
        self.free_node(id.0);
        self.len -= 1;
        Some((node.key, node.value))
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterate entries from front (most recent) to back
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Iterate entry handles from front to back
    pub fn iter_ids(&self) -> impl Iterator<Item = EntryId> + '_ {
        std::iter::successors(self.head, move |&idx| self.node(idx).and_then(|node| node.next))
            .map(EntryId)
    }

    /// Walk the links in both directions and check them against `len`
    pub fn debug_validate_invariants(&self) -> Result<()> {
        let live = self.nodes.iter().filter(|slot| slot.is_some()).count();
        if live != self.len {
            return Err(Error::Invariant(format!(
                "arena holds {} entries, len is {}",
                live, self.len
            )));
        }

        let mut prev = None;
        let mut cursor = self.head;
        let mut walked = 0;
        while let Some(idx) = cursor {
            let node = self
                .node(idx)
                .ok_or_else(|| Error::Invariant(format!("link to free slot {}", idx)))?;
            if node.prev != prev {
                return Err(Error::Invariant(format!(
                    "slot {} has prev {:?}, expected {:?}",
                    idx, node.prev, prev
                )));
            }
            walked += 1;
            if walked > self.len {
                return Err(Error::Invariant("cycle in recency list".to_string()));
            }
            prev = cursor;
            cursor = node.next;
        }

        if walked != self.len {
            return Err(Error::Invariant(format!(
                "walked {} entries front to back, len is {}",
                walked, self.len
            )));
        }
        if prev != self.tail {
            return Err(Error::Invariant(format!(
                "last walked slot {:?} is not the tail {:?}",
                prev, self.tail
            )));
        }

        Ok(())
    }

    fn node(&self, idx: usize) -> Option<&Node<K, V>> {
        self.nodes.get(idx).and_then(|slot| slot.as_ref())
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node<K, V>> {
        self.nodes.get_mut(idx).and_then(|slot| slot.as_mut())
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(head_idx) => {
                if let Some(head) = self.node_mut(head_idx) {
                    head.prev = Some(idx);
                }
            }
            None => {
                self.tail = Some(idx);
            }
        }

        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.node(idx) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = self.node_mut(prev_idx) {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = self.node_mut(next_idx) {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }

        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = None;
        }
    }

    fn alloc_node(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(None);
            idx
        }
    }

    fn free_node(&mut self, idx: usize) {
        self.free_list.push(idx);
    }
}

/// Front-to-back iterator over a [`RecencyList`]
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
