//! Per-search state: one [CellState] per grid cell, referenced by flat index, and the priority
//! frontier. A fresh context is created by every search call, so nothing leaks between searches.
use core::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::Cell;

/// Mutable search state of a single cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct CellState {
    /// Best known distance (A*: from start, D* Lite: to goal).
    pub g: f64,
    /// A*: `g + h`. D* Lite: the one-step lookahead `rhs`.
    pub aux: f64,
    /// Index of the cell this one was reached from. Only used to rebuild the path.
    pub predecessor: Option<usize>,
    /// Logically part of the frontier.
    pub open: bool,
    /// Finalized by A*, never reopened.
    pub closed: bool,
}

impl Default for CellState {
    fn default() -> CellState {
        CellState {
            g: f64::INFINITY,
            aux: f64::INFINITY,
            predecessor: None,
            open: false,
            closed: false,
        }
    }
}

/// Frontier key for A*: lowest `f` first, exact ties in insertion order.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AstarKey {
    pub f: f64,
    pub seq: u64,
}

impl PartialEq for AstarKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AstarKey {}

impl PartialOrd for AstarKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AstarKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Frontier key for D* Lite: `min(g, rhs) + h`, ties broken on `(row, col)` so that the order
/// stays deterministic while many keys are still infinite.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DStarKey {
    pub k: f64,
    pub cell: Cell,
}

impl PartialEq for DStarKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DStarKey {}

impl PartialOrd for DStarKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DStarKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.k
            .total_cmp(&other.k)
            .then_with(|| self.cell.cmp(&other.cell))
    }
}

struct SmallestKeyHolder<K> {
    key: K,
    index: usize,
}

impl<K: Ord> Eq for SmallestKeyHolder<K> {}

impl<K: Ord> PartialEq for SmallestKeyHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.index == other.index
    }
}

impl<K: Ord> PartialOrd for SmallestKeyHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for SmallestKeyHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so that the max-heap pops the smallest key first.
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Min-priority queue of cell indices. Holds no cell data: ordering comes from the key stored
/// alongside each index. Entries are never removed in place, callers skip stale entries when
/// they are popped.
pub(crate) struct Frontier<K> {
    heap: BinaryHeap<SmallestKeyHolder<K>>,
}

impl<K: Ord + Copy> Frontier<K> {
    pub fn new() -> Frontier<K> {
        Frontier {
            heap: BinaryHeap::new(),
        }
    }

    pub fn push(&mut self, key: K, index: usize) {
        self.heap.push(SmallestKeyHolder { key, index });
    }

    pub fn pop(&mut self) -> Option<(K, usize)> {
        self.heap.pop().map(|h| (h.key, h.index))
    }

    pub fn peek(&self) -> Option<(K, usize)> {
        self.heap.peek().map(|h| (h.key, h.index))
    }

    /// Physical entry count, stale entries included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Cell states of one search invocation plus its frontier.
pub(crate) struct SearchContext<K> {
    pub cells: Vec<CellState>,
    pub frontier: Frontier<K>,
}

impl<K: Ord + Copy> SearchContext<K> {
    /// All costs start at infinity with no predecessors.
    pub fn new(len: usize) -> SearchContext<K> {
        SearchContext {
            cells: vec![CellState::default(); len],
            frontier: Frontier::new(),
        }
    }

    pub fn predecessors(&self) -> Vec<Option<usize>> {
        self.cells.iter().map(|c| c.predecessor).collect()
    }
}
