//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.
//!
//! Recency is kept in a doubly-linked list threaded through a slab of nodes,
//! with a hashmap from key to slot index. `touch`, `remove`, and
//! `evict_oldest` are all O(1); freed slots are recycled through a free list.

use std::collections::HashMap;

// == List Node ==
/// One slot in the recency list.
#[derive(Debug, Default)]
struct Node {
    key: String,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// List orientation:
/// - Head = Least recently used
/// - Tail = Most recently used
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Slab of list nodes; slots are recycled via `free`
    nodes: Vec<Node>,
    /// Key to slot index
    index: HashMap<String, usize>,
    /// Least recently used slot
    head: Option<usize>,
    /// Most recently used slot
    tail: Option<usize>,
    /// Recycled slot indices
    free: Vec<usize>,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used.
    ///
    /// An existing key is unlinked from its current position and relinked at
    /// the tail; a new key gets a slot (recycled if available) at the tail.
    pub fn touch(&mut self, key: &str) {
        if let Some(&idx) = self.index.get(key) {
            self.unlink(idx);
            self.push_tail(idx);
        } else {
            let idx = self.alloc(key);
            self.index.insert(key.to_string(), idx);
            self.push_tail(idx);
        }
    }

    // == Remove ==
    /// Removes a key from the tracker. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        if let Some(idx) = self.index.remove(key) {
            self.unlink(idx);
            self.release(idx);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let idx = self.head?;
        self.unlink(idx);
        let key = std::mem::take(&mut self.nodes[idx].key);
        self.index.remove(&key);
        self.free.push(idx);
        Some(key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&str> {
        self.head.map(|idx| self.nodes[idx].key.as_str())
    }

    // == Recency Order ==
    /// Returns all tracked keys, least recently used first.
    pub fn keys_oldest_first(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.index.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            keys.push(self.nodes[idx].key.clone());
            cursor = self.nodes[idx].next;
        }
        keys
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Clear ==
    /// Drops all tracked keys and recycled slots.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    // == Internal: slot management ==
    /// Takes a slot for a new key, reusing a freed one when possible.
    fn alloc(&mut self, key: &str) -> usize {
        let node = Node {
            key: key.to_string(),
            prev: None,
            next: None,
        };
        if let Some(idx) = self.free.pop() {
            self.nodes[idx] = node;
            idx
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    /// Returns a slot to the free list. Slot contents are overwritten on reuse.
    fn release(&mut self, idx: usize) {
        self.nodes[idx].key = String::new();
        self.free.push(idx);
    }

    // == Internal: list surgery ==
    /// Detaches a slot from the list, patching its neighbors.
    fn unlink(&mut self, idx: usize) {
        let prev = self.nodes[idx].prev;
        let next = self.nodes[idx].next;

        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }

        self.nodes[idx].prev = None;
        self.nodes[idx].next = None;
    }

    /// Appends a detached slot at the most-recent end.
    fn push_tail(&mut self, idx: usize) {
        self.nodes[idx].prev = self.tail;
        self.nodes[idx].next = None;

        match self.tail {
            Some(t) => self.nodes[t].next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }
}
