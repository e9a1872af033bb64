//! Turning predecessor links into ordered paths.
use itertools::Itertools;

use crate::error::SearchError;
use crate::{Cell, PathingGrid};

/// Which way the predecessor links point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Links lead from the goal back to the start (start-rooted search such as A*). The walk is
    /// reversed so the returned path still runs from start to goal.
    TowardStart,
    /// Links lead from the start forward to the goal (goal-rooted search such as D* Lite).
    TowardGoal,
}

/// Follows `predecessors` from `terminal` until `endpoint` is reached.
///
/// Returns `[terminal]` if both are the same cell and an empty path if `terminal` has no
/// predecessor at all. A chain that revisits a cell or stops before `endpoint` is an internal
/// error: predecessor links must form a tree once a search has converged.
pub fn extract(
    grid: &PathingGrid,
    predecessors: &[Option<usize>],
    terminal: usize,
    endpoint: usize,
    direction: Direction,
) -> Result<Vec<Cell>, SearchError> {
    if terminal == endpoint {
        return Ok(vec![grid.cell_at(terminal)]);
    }
    if predecessors[terminal].is_none() {
        return Ok(Vec::new());
    }
    let mut visited = vec![false; predecessors.len()];
    let mut path = Vec::new();
    let mut current = terminal;
    loop {
        if visited[current] {
            return Err(SearchError::PredecessorCycle {
                cell: grid.cell_at(current),
            });
        }
        visited[current] = true;
        path.push(grid.cell_at(current));
        if current == endpoint {
            break;
        }
        current = predecessors[current].ok_or(SearchError::BrokenChain {
            cell: grid.cell_at(current),
        })?;
    }
    if direction == Direction::TowardStart {
        path.reverse();
    }
    Ok(path)
}

/// Consecutive cells are mutual 8-neighbours and no cell is a wall.
pub fn is_contiguous(grid: &PathingGrid, path: &[Cell]) -> bool {
    path.iter().all(|c| !grid.is_wall(c))
        && path
            .iter()
            .tuple_windows()
            .all(|(a, b)| a.is_adjacent(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_grid() -> PathingGrid {
        PathingGrid::from_ascii("S...G").unwrap()
    }

    #[test]
    fn walks_backward_and_reverses() {
        let grid = line_grid();
        // 4 -> 3 -> 2 -> 1 -> 0
        let preds = vec![None, Some(0), Some(1), Some(2), Some(3)];
        let path = extract(&grid, &preds, 4, 0, Direction::TowardStart).unwrap();
        assert_eq!(path.first(), Some(&Cell::new(0, 0)));
        assert_eq!(path.last(), Some(&Cell::new(0, 4)));
        assert_eq!(path.len(), 5);
        assert!(is_contiguous(&grid, &path));
    }

    #[test]
    fn walks_forward_in_order() {
        let grid = line_grid();
        // 0 -> 1 -> 2 -> 3 -> 4
        let preds = vec![Some(1), Some(2), Some(3), Some(4), None];
        let path = extract(&grid, &preds, 0, 4, Direction::TowardGoal).unwrap();
        assert_eq!(path, (0..5).map(|c| Cell::new(0, c)).collect::<Vec<_>>());
    }

    #[test]
    fn degenerate_chains() {
        let grid = line_grid();
        let preds = vec![None; 5];
        assert_eq!(
            extract(&grid, &preds, 2, 2, Direction::TowardGoal).unwrap(),
            vec![Cell::new(0, 2)]
        );
        assert!(extract(&grid, &preds, 2, 4, Direction::TowardGoal)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn detects_cycles_and_breaks() {
        let grid = line_grid();
        let cyclic = vec![Some(1), Some(2), Some(0), None, None];
        assert!(matches!(
            extract(&grid, &cyclic, 0, 4, Direction::TowardGoal),
            Err(SearchError::PredecessorCycle { .. })
        ));
        let broken = vec![Some(1), None, None, None, None];
        assert_eq!(
            extract(&grid, &broken, 0, 4, Direction::TowardGoal),
            Err(SearchError::BrokenChain {
                cell: Cell::new(0, 1)
            })
        );
    }

    #[test]
    fn contiguity_rejects_jumps_and_walls() {
        let grid = PathingGrid::from_ascii("S#G\n...").unwrap();
        let jump = [Cell::new(0, 0), Cell::new(0, 2)];
        let through_wall = [Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)];
        let around = [Cell::new(0, 0), Cell::new(1, 1), Cell::new(0, 2)];
        assert!(!is_contiguous(&grid, &jump));
        assert!(!is_contiguous(&grid, &through_wall));
        assert!(is_contiguous(&grid, &around));
    }
}
