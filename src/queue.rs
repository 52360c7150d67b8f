use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::error::{Error, Result};
use crate::models::{Priority, QueueEntry, TaskId};

/// Heap slot ordered by `(rank, seq)`. `seq` is the enqueue counter, giving FIFO among equal ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    rank: u8,
    seq: u64,
    entry: QueueEntry,
}

impl Ord for Slot {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.rank, self.seq).cmp(&(other.rank, other.seq))
    }
}

impl PartialOrd for Slot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority dispatch queue over `(id, priority)` pairs.
#[derive(Debug, Default)]
pub struct DispatchQueue {
    heap: BinaryHeap<Reverse<Slot>>,
    seq: u64,
}

impl DispatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, id: TaskId, priority: Priority) {
        let slot = Slot {
            rank: priority.rank(),
            seq: self.seq,
            entry: QueueEntry { id, priority },
        };
        self.seq += 1;
        self.heap.push(Reverse(slot));
    }

    /// Removes and returns the most urgent entry, earliest first among equal ranks.
    pub fn pop_min(&mut self) -> Result<QueueEntry> {
        self.heap
            .pop()
            .map(|Reverse(slot)| slot.entry)
            .ok_or(Error::Empty)
    }

    /// Drops the entry for `id`. Absent ids are ignored.
    pub fn remove_by_id(&mut self, id: TaskId) -> bool {
        let before = self.heap.len();
        self.heap.retain(|Reverse(slot)| slot.entry.id != id);
        self.heap.len() != before
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.heap.iter().any(|Reverse(slot)| slot.entry.id == id)
    }

    /// Entries in the order `pop_min` would return them.
    pub fn peek_all(&self) -> Vec<QueueEntry> {
        let mut slots: Vec<Slot> = self.heap.iter().map(|Reverse(slot)| *slot).collect();
        slots.sort();
        slots.into_iter().map(|slot| slot.entry).collect()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
