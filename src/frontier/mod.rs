//! Graph-search bookkeeping: the open list and the parent-pointer arena.
//!
//! Frontier entries are plain [`NodeId`]s into a [`SearchTree`]; a path is
//! only materialised once, by walking parent pointers back from the goal.

mod tree;

pub use tree::{Node, NodeId, SearchTree};

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};

/// Priority-queue entry. Lower priority pops first; equal priorities pop in
/// insertion order.
#[derive(Debug)]
struct Entry {
    priority: f64,
    seq: u64,
    node: NodeId,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then(self.seq.cmp(&other.seq))
    }
}

/// The open list.
#[derive(Debug)]
pub(crate) enum Frontier {
    /// First in, first out.
    Fifo(VecDeque<NodeId>),
    /// Last in, first out.
    Lifo(Vec<NodeId>),
    /// Min-priority queue with FIFO tie-break.
    Priority {
        heap: BinaryHeap<Reverse<Entry>>,
        next_seq: u64,
    },
}

impl Frontier {
    pub fn fifo() -> Self {
        Frontier::Fifo(VecDeque::new())
    }

    pub fn lifo() -> Self {
        Frontier::Lifo(Vec::new())
    }

    pub fn priority() -> Self {
        Frontier::Priority {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Adds a node. `priority` is ignored by the FIFO and LIFO variants.
    pub fn push(&mut self, node: NodeId, priority: f64) {
        match self {
            Frontier::Fifo(queue) => queue.push_back(node),
            Frontier::Lifo(stack) => stack.push(node),
            Frontier::Priority { heap, next_seq } => {
                heap.push(Reverse(Entry {
                    priority,
                    seq: *next_seq,
                    node,
                }));
                *next_seq += 1;
            }
        }
    }

    pub fn pop(&mut self) -> Option<NodeId> {
        match self {
            Frontier::Fifo(queue) => queue.pop_front(),
            Frontier::Lifo(stack) => stack.pop(),
            Frontier::Priority { heap, .. } => heap.pop().map(|Reverse(e)| e.node),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Frontier::Fifo(queue) => queue.len(),
            Frontier::Lifo(stack) => stack.len(),
            Frontier::Priority { heap, .. } => heap.len(),
        }
    }
}
