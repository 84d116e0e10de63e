//! Priority Heap: array-backed binary min-heap with deterministic tie-breaking.
//!
//! # Purpose
//!
//! Backing store for the pathfinding request queue and for nearest-enemy
//! selection. Both run inside the lockstep tick, so the pop order must be a
//! pure function of the pushed `(priority, insertion order)` pairs.
//!
//! # Ordering
//!
//! Every entry carries a monotonically increasing sequence number assigned on
//! push. Entries compare by `(priority, sequence)`, which is a total order:
//!
//! ```text
//! push(a, 3)  seq 0
//! push(b, 1)  seq 1
//! push(c, 3)  seq 2
//! pop -> b, a, c      (a and c tie on priority, a was pushed first)
//! ```
//!
//! # Complexity
//!
//! - `push` / `pop`: O(log n) sift-up / sift-down
//! - `peek`: O(1)
//! - `remove_all`: O(n) filter followed by a full bottom-up re-heapify

use thiserror::Error;

/// Errors raised by collection misuse. These indicate a logic defect in the
/// caller, not a runtime condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("container is empty")]
    EmptyContainer,
}

#[derive(Debug, Clone)]
struct HeapEntry<T, P> {
    priority: P,
    sequence: u64,
    item: T,
}

impl<T, P: Ord> HeapEntry<T, P> {
    #[inline]
    fn precedes(&self, other: &Self) -> bool {
        (&self.priority, self.sequence) < (&other.priority, other.sequence)
    }
}

/// Lifetime counters, useful for debugging and diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
    pub len: usize,
    pub pushed: u64,
    pub peak_len: usize,
}

/// Min-priority heap keyed by an externally supplied priority.
///
/// Lower priorities pop first. Equal priorities pop in insertion order.
#[derive(Debug, Clone)]
pub struct PriorityHeap<T, P = i64> {
    entries: Vec<HeapEntry<T, P>>,
    next_sequence: u64,
    peak_len: usize,
}

impl<T, P: Ord> Default for PriorityHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Ord> PriorityHeap<T, P> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_sequence: 0,
            peak_len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            next_sequence: 0,
            peak_len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sequence number the next `push` will receive.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Resume sequence numbering from a restored value. Never moves backwards.
    pub fn resume_sequence(&mut self, next_sequence: u64) {
        self.next_sequence = self.next_sequence.max(next_sequence);
    }

    /// Push `item` with `priority`. Returns the sequence number assigned to it.
    pub fn push(&mut self, item: T, priority: P) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push(HeapEntry { priority, sequence, item });
        let last = self.entries.len() - 1;
        self.sift_up(last);
        self.peak_len = self.peak_len.max(self.entries.len());
        sequence
    }

    /// Remove and return the minimum-priority item.
    pub fn pop(&mut self) -> Result<T, CollectionError> {
        self.pop_entry().map(|(item, _, _)| item)
    }

    /// Remove and return the minimum entry as `(item, priority, sequence)`.
    pub fn pop_entry(&mut self) -> Result<(T, P, u64), CollectionError> {
        if self.entries.is_empty() {
            return Err(CollectionError::EmptyContainer);
        }
        let last = self.entries.len() - 1;
        self.entries.swap(0, last);
        let entry = self.entries.pop().ok_or(CollectionError::EmptyContainer)?;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Ok((entry.item, entry.priority, entry.sequence))
    }

    /// Borrow the minimum-priority item without removing it.
    pub fn peek(&self) -> Result<&T, CollectionError> {
        self.entries
            .first()
            .map(|entry| &entry.item)
            .ok_or(CollectionError::EmptyContainer)
    }

    pub fn peek_priority(&self) -> Result<&P, CollectionError> {
        self.entries
            .first()
            .map(|entry| &entry.priority)
            .ok_or(CollectionError::EmptyContainer)
    }

    /// Remove every item matching `predicate`, then rebuild heap order.
    ///
    /// Returns the number of removed items. The rebuild is a full bottom-up
    /// heapify, not an incremental repair.
    pub fn remove_all(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !predicate(&entry.item));
        let removed = before - self.entries.len();
        if removed > 0 {
            self.heapify();
        }
        removed
    }

    /// True if any item matches `predicate`.
    pub fn any(&self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        self.entries.iter().any(|entry| predicate(&entry.item))
    }

    /// True if an entry with this sequence number is still queued.
    pub fn contains_sequence(&self, sequence: u64) -> bool {
        self.entries.iter().any(|entry| entry.sequence == sequence)
    }

    /// Iterate items in storage order (not priority order).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|entry| &entry.item)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> HeapStats {
        HeapStats {
            len: self.entries.len(),
            pushed: self.next_sequence,
            peak_len: self.peak_len,
        }
    }

    /// Check the min-heap invariant. Used by tests and debug assertions.
    pub fn is_valid_heap(&self) -> bool {
        (1..self.entries.len()).all(|child| {
            let parent = (child - 1) / 2;
            !self.entries[child].precedes(&self.entries[parent])
        })
    }

    fn heapify(&mut self) {
        let len = self.entries.len();
        if len < 2 {
            return;
        }
        for index in (0..len / 2).rev() {
            self.sift_down(index);
        }
        debug_assert!(self.is_valid_heap());
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.entries[index].precedes(&self.entries[parent]) {
                self.entries.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.entries[left].precedes(&self.entries[smallest]) {
                smallest = left;
            }
            if right < len && self.entries[right].precedes(&self.entries[smallest]) {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.entries.swap(index, smallest);
            index = smallest;
        }
    }
}
