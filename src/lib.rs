//! # grid_search
//!
//! Shortest-path search on a uniform grid with 8-directional movement. Cardinal moves cost
//! `1`, diagonal moves cost `√2` and cells may be blocked by walls. Two solvers are provided:
//!
//! - [AstarSolver](solver::astar::AstarSolver), a classic best-first search rooted at the start
//!   cell using the [octile distance](cost::octile) as heuristic.
//! - [DStarLiteSolver](solver::dstar_lite::DStarLiteSolver), an incremental search rooted at the
//!   goal which keeps a tentative distance `g` and a one-step lookahead `rhs` per cell until the
//!   start cell becomes consistent.
//!
//! Both report progress to an optional [SearchObserver](observer::SearchObserver), which can be
//! used for visualisation or to cancel a search cooperatively.
//!
//! ```
//! use grid_search::{solver::astar::AstarSolver, solver::GridSolver, PathingGrid};
//!
//! let grid = PathingGrid::from_ascii(
//!     "S..
//!      .#.
//!      ..G",
//! )
//! .unwrap();
//! let result = AstarSolver::new().search(&grid).unwrap();
//! assert!(result.found);
//! assert_eq!(result.path.len(), 4);
//! ```
pub mod cost;
pub mod error;
pub mod observer;
pub mod path;
pub mod pathing_grid;
pub(crate) mod search_context;
pub mod solver;

use core::fmt;

use grid_util::point::Point;

pub use error::{ConfigError, SearchError};
pub use observer::{EventKind, SearchEvent, SearchObserver};
pub use pathing_grid::{GridConfig, PathingGrid};
pub use solver::{GridSolver, SearchResult};

/// Absolute tolerance used when comparing accumulated path costs.
pub const COST_EPSILON: f64 = 1e-9;

/// A grid coordinate. Signed so that out-of-bounds input can be represented and rejected
/// when a [PathingGrid] is built. Converts to and from [Point] with `x = col` and `y = row`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Cell {
        Cell { row, col }
    }

    /// True if `other` is one of the 8 cells surrounding this one.
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        let dr = (self.row - other.row).abs();
        let dc = (self.col - other.col).abs();
        dr <= 1 && dc <= 1 && dr + dc > 0
    }
}

impl From<(i32, i32)> for Cell {
    fn from((row, col): (i32, i32)) -> Cell {
        Cell { row, col }
    }
}

impl From<Cell> for Point {
    fn from(cell: Cell) -> Point {
        Point::new(cell.col, cell.row)
    }
}

impl From<Point> for Cell {
    fn from(point: Point) -> Cell {
        Cell::new(point.y, point.x)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_excludes_self_and_distance_two() {
        let c = Cell::new(2, 2);
        assert!(!c.is_adjacent(&c));
        assert!(c.is_adjacent(&Cell::new(1, 1)));
        assert!(c.is_adjacent(&Cell::new(2, 3)));
        assert!(!c.is_adjacent(&Cell::new(4, 2)));
    }

    #[test]
    fn point_conversion_swaps_axes() {
        let point = Point::from(Cell::new(2, 5));
        assert_eq!((point.x, point.y), (5, 2));
        assert_eq!(Cell::from(point), Cell::new(2, 5));
    }

    #[test]
    fn displays_as_row_col() {
        assert_eq!(Cell::from((3, 7)).to_string(), "(3, 7)");
    }
}
