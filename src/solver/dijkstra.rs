use crate::cost::Heuristic;
use crate::error::SearchOutcome;
use crate::observer::SearchObserver;
use crate::solver::{astar::AstarSolver, GridSolver};
use crate::PathingGrid;

/// Uniform-cost search: A* with a heuristic that is always zero. Expands cells in order of
/// distance from the start, which makes it a convenient reference for the other solvers.
#[derive(Clone, Debug, Default)]
pub struct DijkstraSolver;

impl GridSolver for DijkstraSolver {
    fn name(&self) -> &'static str {
        "dijkstra"
    }

    fn run<O: SearchObserver>(
        &self,
        grid: &PathingGrid,
        start: usize,
        goal: usize,
        observer: &mut O,
    ) -> SearchOutcome {
        AstarSolver::with_heuristic(Heuristic::Zero).run(grid, start, goal, observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{EventKind, EventRecorder};
    use crate::{Cell, COST_EPSILON};

    #[test]
    fn matches_astar_cost() {
        let grid = PathingGrid::from_ascii(
            "S..#....
             .#.#.##.
             .#...#..
             ...#...G",
        )
        .unwrap();
        let dijkstra = DijkstraSolver.search(&grid).unwrap();
        let astar = AstarSolver::new().search(&grid).unwrap();
        assert!(dijkstra.found);
        assert!((dijkstra.cost - astar.cost).abs() < COST_EPSILON);
    }

    #[test]
    fn expands_at_least_as_much_as_astar() {
        let grid = PathingGrid::build(15, 15, [], Cell::new(0, 0), Cell::new(14, 10)).unwrap();
        let mut d = EventRecorder::new();
        let mut a = EventRecorder::new();
        DijkstraSolver.search_observed(&grid, &mut d).unwrap();
        AstarSolver::new().search_observed(&grid, &mut a).unwrap();
        assert!(d.count(EventKind::Closed) >= a.count(EventKind::Closed));
    }
}
