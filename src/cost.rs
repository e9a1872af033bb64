//! Edge costs and heuristics for the uniform 8-connected grid.
//!
//! Cardinal moves cost `1` and diagonal moves cost `√2`. The [octile] distance is the exact
//! cost of a move sequence on an empty grid, which makes it admissible and consistent with
//! [step_cost]. The [euclidean] distance is a weaker but also consistent lower bound.
use core::f64::consts::SQRT_2;

use itertools::Itertools;

use crate::Cell;

/// Cost of a single move between two 8-adjacent cells. Must not be called for cells that are
/// not neighbours.
#[inline]
pub fn step_cost(a: &Cell, b: &Cell) -> f64 {
    debug_assert!(a.is_adjacent(b), "{a} and {b} are not adjacent");
    if a.row != b.row && a.col != b.col {
        SQRT_2
    } else {
        1.0
    }
}

/// `max(dx, dy) + (√2 - 1) * min(dx, dy)`: take as many diagonal steps as possible, then go
/// straight.
#[inline]
pub fn octile(a: &Cell, b: &Cell) -> f64 {
    let dx = (a.col - b.col).abs() as f64;
    let dy = (a.row - b.row).abs() as f64;
    dx.max(dy) + (SQRT_2 - 1.0) * dx.min(dy)
}

#[inline]
pub fn euclidean(a: &Cell, b: &Cell) -> f64 {
    let dx = (a.col - b.col) as f64;
    let dy = (a.row - b.row) as f64;
    dx.hypot(dy)
}

/// Distance estimate used to order the search frontier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Heuristic {
    #[default]
    Octile,
    Euclidean,
    /// Always zero, turning A* into Dijkstra's algorithm.
    Zero,
}

impl Heuristic {
    #[inline]
    pub fn estimate(&self, a: &Cell, b: &Cell) -> f64 {
        match self {
            Heuristic::Octile => octile(a, b),
            Heuristic::Euclidean => euclidean(a, b),
            Heuristic::Zero => 0.0,
        }
    }
}

/// Sums the step costs along a path. Empty and single-cell paths cost nothing.
pub fn path_cost(path: &[Cell]) -> f64 {
    path.iter()
        .tuple_windows()
        .map(|(a, b)| step_cost(a, b))
        .sum()
}
