//! Goal-rooted incremental search in the style of
//! [D* Lite](http://idm-lab.org/bib/abstracts/papers/aaai02b.pdf).
//!
//! Every cell carries a tentative distance to the goal `g` and a one-step lookahead
//! `rhs(u) = min over free neighbours v of g(v) + cost(u, v)` (with `rhs(goal) = 0`). A cell is
//! consistent when both agree. The search repeatedly takes the cell with the smallest key
//! `min(g, rhs) + h(u, goal)` and makes it locally consistent, propagating the change to the
//! lookahead of its neighbours, until the start is consistent and no queued key is smaller than
//! the key of the start.
//!
//! This performs a single convergence pass over a static grid. Distances valid for every cell
//! that was settled are left in `g`, the path is read off the predecessor links from the start.
use core::ops::ControlFlow;

use log::{debug, info, trace, warn};

use crate::cost::{step_cost, Heuristic};
use crate::error::{SearchError, SearchOutcome};
use crate::observer::{EventKind, SearchObserver};
use crate::path::{extract, Direction};
use crate::search_context::{DStarKey, SearchContext};
use crate::solver::{announce_path, notify, precheck_unreachable, GridSolver, SearchResult};
use crate::{Cell, PathingGrid};

#[derive(Clone, Debug, Default)]
pub struct DStarLiteSolver {
    pub heuristic: Heuristic,
    /// Skip the search entirely when start and goal are on different connected components.
    pub component_precheck: bool,
}

impl DStarLiteSolver {
    pub fn new() -> DStarLiteSolver {
        DStarLiteSolver::default()
    }

    pub fn with_heuristic(heuristic: Heuristic) -> DStarLiteSolver {
        DStarLiteSolver {
            heuristic,
            ..DStarLiteSolver::default()
        }
    }
}

impl GridSolver for DStarLiteSolver {
    fn name(&self) -> &'static str {
        "dstar_lite"
    }

    fn run<O: SearchObserver>(
        &self,
        grid: &PathingGrid,
        start: usize,
        goal: usize,
        observer: &mut O,
    ) -> SearchOutcome {
        if self.component_precheck && precheck_unreachable(grid, start, goal) {
            return Ok(SearchResult::not_found(0));
        }
        let mut search = DStarLite::new(grid, goal, self.heuristic, observer);
        if search.converge(start).is_break() {
            info!(
                "{}: cancelled after {} expansions",
                self.name(),
                search.expanded
            );
            return Ok(SearchResult::cancelled(search.expanded));
        }

        let distance = search.ctx.cells[start].g;
        if distance.is_infinite() {
            if grid.reachable(&grid.cell_at(start), &grid.cell_at(goal)) {
                warn!("Reachable start did not converge, is reachable graph correct?");
            }
            info!(
                "{}: no path from {} to {}, {} expanded",
                self.name(),
                grid.cell_at(start),
                grid.cell_at(goal),
                search.expanded
            );
            return Ok(SearchResult::not_found(search.expanded));
        }

        let path = extract(
            grid,
            &search.ctx.predecessors(),
            start,
            goal,
            Direction::TowardGoal,
        )
        .and_then(|path| {
            if path.is_empty() {
                Err(SearchError::BrokenChain {
                    cell: grid.cell_at(start),
                })
            } else {
                Ok(path)
            }
        })
        .map_err(|e| {
            warn!("{}: invalid predecessor chain: {}", self.name(), e);
            e
        })?;
        info!(
            "{}: path of {} cells found, cost {:.3}, {} expanded",
            self.name(),
            path.len(),
            distance,
            search.expanded
        );
        let expanded = search.expanded;
        announce_path(&mut *search.observer, &path);
        Ok(SearchResult::found(path, distance, expanded))
    }
}

/// State of one D* Lite invocation. `aux` of each [CellState](crate::search_context::CellState)
/// holds `rhs`, `open` marks queue membership.
struct DStarLite<'a, O> {
    grid: &'a PathingGrid,
    goal: usize,
    goal_cell: Cell,
    heuristic: Heuristic,
    ctx: SearchContext<DStarKey>,
    observer: &'a mut O,
    expanded: usize,
}

impl<'a, O: SearchObserver> DStarLite<'a, O> {
    fn new(
        grid: &'a PathingGrid,
        goal: usize,
        heuristic: Heuristic,
        observer: &'a mut O,
    ) -> DStarLite<'a, O> {
        DStarLite {
            grid,
            goal,
            goal_cell: grid.cell_at(goal),
            heuristic,
            ctx: SearchContext::new(grid.len()),
            observer,
            expanded: 0,
        }
    }

    fn key(&self, ix: usize) -> DStarKey {
        let state = &self.ctx.cells[ix];
        let cell = self.grid.cell_at(ix);
        DStarKey {
            k: state.g.min(state.aux) + self.heuristic.estimate(&cell, &self.goal_cell),
            cell,
        }
    }

    fn is_consistent(&self, ix: usize) -> bool {
        let state = &self.ctx.cells[ix];
        state.g == state.aux
    }

    /// One-step lookahead from the current `g` of the free neighbours.
    fn lookahead(&self, ix: usize) -> f64 {
        if ix == self.goal {
            return 0.0;
        }
        let cell = self.grid.cell_at(ix);
        self.grid
            .neighbours_of(ix)
            .iter()
            .filter(|&&n| !self.grid.is_wall_ix(n))
            .map(|&n| self.ctx.cells[n].g + step_cost(&cell, &self.grid.cell_at(n)))
            .fold(f64::INFINITY, f64::min)
    }

    fn insert(&mut self, ix: usize) -> ControlFlow<()> {
        self.ctx.cells[ix].open = true;
        self.ctx.frontier.push(self.key(ix), ix);
        notify(&mut *self.observer, self.grid, ix, EventKind::Opened)
    }

    /// Removes and returns the queued cell with the smallest key. Heap entries whose key no
    /// longer matches the cell's live key, or whose cell has left the queue, are dropped.
    fn pop(&mut self) -> Option<usize> {
        while let Some((key, ix)) = self.ctx.frontier.pop() {
            if self.ctx.cells[ix].open && key == self.key(ix) {
                self.ctx.cells[ix].open = false;
                return Some(ix);
            }
        }
        None
    }

    /// Smallest live key in the queue.
    fn top_key(&mut self) -> Option<DStarKey> {
        while let Some((key, ix)) = self.ctx.frontier.peek() {
            if self.ctx.cells[ix].open && key == self.key(ix) {
                return Some(key);
            }
            self.ctx.frontier.pop();
        }
        None
    }

    fn converged(&mut self, start: usize) -> bool {
        match self.top_key() {
            None => true,
            Some(top) => self.is_consistent(start) && self.key(start) <= top,
        }
    }

    fn converge(&mut self, start: usize) -> ControlFlow<()> {
        self.ctx.cells[self.goal].aux = 0.0;
        if self.insert(self.goal).is_break() {
            return ControlFlow::Break(());
        }
        let grid = self.grid;
        while !self.converged(start) {
            let Some(u) = self.pop() else {
                break;
            };
            self.expanded += 1;
            let state = &mut self.ctx.cells[u];
            if state.g > state.aux {
                state.g = state.aux;
                trace!("Settled {} at g {:.3}", grid.cell_at(u), state.g);
                if notify(&mut *self.observer, grid, u, EventKind::Closed).is_break() {
                    return ControlFlow::Break(());
                }
            } else {
                state.g = f64::INFINITY;
                let rhs = self.lookahead(u);
                self.ctx.cells[u].aux = rhs;
                if !self.is_consistent(u) && self.insert(u).is_break() {
                    return ControlFlow::Break(());
                }
            }
            for &v in grid.neighbours_of(u) {
                if grid.is_wall_ix(v) {
                    continue;
                }
                if self.update_neighbour(v, u).is_break() {
                    return ControlFlow::Break(());
                }
            }
        }
        debug!(
            "Converged after {} expansions with {} heap entries left",
            self.expanded,
            self.ctx.frontier.len()
        );
        ControlFlow::Continue(())
    }

    /// Recomputes `rhs(v)` after `g(u)` changed. The predecessor of `v` is only moved to `u` when
    /// `v` is over-consistent afterwards.
    fn update_neighbour(&mut self, v: usize, u: usize) -> ControlFlow<()> {
        if v == self.goal {
            return ControlFlow::Continue(());
        }
        let rhs = self.lookahead(v);
        if rhs == self.ctx.cells[v].aux {
            return ControlFlow::Continue(());
        }
        let state = &mut self.ctx.cells[v];
        state.aux = rhs;
        if state.g > rhs && state.predecessor != Some(u) {
            state.predecessor = Some(u);
            let changed = notify(
                &mut *self.observer,
                self.grid,
                v,
                EventKind::PredecessorChanged,
            );
            if changed.is_break() {
                return ControlFlow::Break(());
            }
        }
        if self.ctx.cells[v].open {
            // Still queued: only the heap position changes.
            self.ctx.frontier.push(self.key(v), v);
            ControlFlow::Continue(())
        } else {
            self.insert(v)
        }
    }
}
