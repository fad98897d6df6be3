//! Internal registry state: per-system entries and priority-ordered queues.
//!
//! A `PriorityQueue` orders envelopes by priority (higher first) and breaks
//! ties by an insertion sequence number, so FIFO within a priority class is
//! stable as long as sequence assignment and heap insertion happen inside
//! the same critical section - which the manager guarantees by mutating
//! entries only under the registry lock.

use crate::bus::envelope::QueueItem;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Notify;

/// Heap entry: greater means served earlier.
#[derive(Debug)]
struct RankedItem {
    priority: i64,
    seq: u64,
    item: QueueItem,
}

impl PartialEq for RankedItem {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for RankedItem {}

impl PartialOrd for RankedItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher priority first, then earlier insertion first
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Capacity-bounded priority queue with FIFO tie-break.
#[derive(Debug)]
pub(crate) struct PriorityQueue {
    heap: BinaryHeap<RankedItem>,
    next_seq: u64,
    max_size: usize,
}

impl PriorityQueue {
    pub(crate) fn new(max_size: usize) -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
            max_size,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.heap.len() >= self.max_size
    }

    pub(crate) fn push(&mut self, item: QueueItem) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(RankedItem {
            priority: item.priority,
            seq,
            item,
        });
    }

    /// Push, evicting the oldest entry when at capacity.
    ///
    /// Used for output and error queues where bookkeeping must never fail;
    /// returns the evicted envelope so the caller can log it.
    pub(crate) fn push_evicting(&mut self, item: QueueItem) -> Option<QueueItem> {
        let evicted = if self.is_full() {
            self.remove_oldest()
        } else {
            None
        };
        self.push(item);
        evicted
    }

    /// Pop the highest-priority ready item, FIFO among equal priority.
    pub(crate) fn pop(&mut self) -> Option<QueueItem> {
        self.heap.pop().map(|ranked| ranked.item)
    }

    pub(crate) fn clear(&mut self) {
        self.heap.clear();
    }

    fn remove_oldest(&mut self) -> Option<QueueItem> {
        let mut entries: Vec<RankedItem> = std::mem::take(&mut self.heap).into_vec();
        let oldest_index = entries
            .iter()
            .enumerate()
            .min_by_key(|(_, ranked)| ranked.seq)
            .map(|(index, _)| index)?;
        let oldest = entries.swap_remove(oldest_index);
        self.heap = entries.into();
        Some(oldest.item)
    }
}

/// Registry record for one named system.
///
/// Created on first registration or on first send addressed to the name;
/// persists until the process exits. Queue clears leave the entry in place.
#[derive(Debug)]
pub(crate) struct SystemEntry {
    pub(crate) input: PriorityQueue,
    pub(crate) output: PriorityQueue,
    pub(crate) error: PriorityQueue,
    pub(crate) processed: u64,
    pub(crate) errors: u64,
    pub(crate) last_activity: Instant,
    /// Wakes the system's worker when an input item arrives.
    pub(crate) input_signal: Arc<Notify>,
}

impl SystemEntry {
    pub(crate) fn new(max_queue_size: usize) -> Self {
        Self {
            input: PriorityQueue::new(max_queue_size),
            output: PriorityQueue::new(max_queue_size),
            error: PriorityQueue::new(max_queue_size),
            processed: 0,
            errors: 0,
            last_activity: Instant::now(),
            input_signal: Arc::new(Notify::new()),
        }
    }

    pub(crate) fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}
