use core::ops::ControlFlow;

use log::debug;

use crate::error::SearchOutcome;
use crate::observer::{EventKind, NoopObserver, SearchEvent, SearchObserver};
use crate::{Cell, PathingGrid};

pub mod astar;
pub mod dijkstra;
pub mod dstar_lite;

/// Outcome of a single search. An unreachable goal is an ordinary result with `found == false`,
/// an empty path and infinite cost.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub found: bool,
    /// Cells from start to goal, both included.
    pub path: Vec<Cell>,
    pub cost: f64,
    /// Number of frontier pops that did work, for diagnostics.
    pub expanded: usize,
    /// The observer stopped the search before it finished.
    pub cancelled: bool,
}

impl SearchResult {
    pub fn found(path: Vec<Cell>, cost: f64, expanded: usize) -> SearchResult {
        SearchResult {
            found: true,
            path,
            cost,
            expanded,
            cancelled: false,
        }
    }

    pub fn not_found(expanded: usize) -> SearchResult {
        SearchResult {
            found: false,
            path: Vec::new(),
            cost: f64::INFINITY,
            expanded,
            cancelled: false,
        }
    }

    pub fn cancelled(expanded: usize) -> SearchResult {
        SearchResult {
            cancelled: true,
            ..SearchResult::not_found(expanded)
        }
    }
}

pub trait GridSolver {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Runs the search between two cells given by arena index. Both are known to be in bounds
    /// and free.
    fn run<O: SearchObserver>(
        &self,
        grid: &PathingGrid,
        start: usize,
        goal: usize,
        observer: &mut O,
    ) -> SearchOutcome;

    /// Searches from the grid's own start to its own goal.
    fn search(&self, grid: &PathingGrid) -> SearchOutcome {
        self.search_observed(grid, &mut NoopObserver)
    }

    fn search_observed<O: SearchObserver>(
        &self,
        grid: &PathingGrid,
        observer: &mut O,
    ) -> SearchOutcome {
        self.search_between(grid, grid.start(), grid.goal(), observer)
    }

    /// Searches between arbitrary cells of the grid. Endpoints are validated the same way
    /// [PathingGrid::build] validates the grid's own start and goal, before any search work.
    fn search_between<O: SearchObserver>(
        &self,
        grid: &PathingGrid,
        start: Cell,
        goal: Cell,
        observer: &mut O,
    ) -> SearchOutcome {
        grid.validate_endpoints(start, goal)?;
        match (grid.index_of(&start), grid.index_of(&goal)) {
            (Some(start_ix), Some(goal_ix)) => self.run(grid, start_ix, goal_ix, observer),
            // validate_endpoints has already rejected out-of-bounds endpoints
            _ => Ok(SearchResult::not_found(0)),
        }
    }
}

/// True if start and goal lie on different connected components, in which case searching is
/// pointless.
pub(crate) fn precheck_unreachable(grid: &PathingGrid, start: usize, goal: usize) -> bool {
    let (start, goal) = (grid.cell_at(start), grid.cell_at(goal));
    if grid.unreachable(&start, &goal) {
        debug!("{} is not reachable from {}, skipping search", goal, start);
        true
    } else {
        false
    }
}

/// Reports the cells of a found path in order. A cancellation request only stops the
/// notifications, the path is complete at this point.
pub(crate) fn announce_path<O: SearchObserver>(observer: &mut O, path: &[Cell]) {
    for &cell in path {
        if observer
            .on_event(SearchEvent::new(cell, EventKind::PathMember))
            .is_break()
        {
            debug!("Observer stopped path notifications at {}", cell);
            break;
        }
    }
}

/// Forwards an event about the cell at `ix`.
#[inline]
pub(crate) fn notify<O: SearchObserver>(
    observer: &mut O,
    grid: &PathingGrid,
    ix: usize,
    kind: EventKind,
) -> ControlFlow<()> {
    observer.on_event(SearchEvent::new(grid.cell_at(ix), kind))
}
