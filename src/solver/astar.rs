use log::{info, trace, warn};

use crate::cost::{step_cost, Heuristic};
use crate::error::SearchOutcome;
use crate::observer::{EventKind, SearchObserver};
use crate::path::{extract, Direction};
use crate::search_context::{AstarKey, SearchContext};
use crate::solver::{announce_path, notify, precheck_unreachable, GridSolver, SearchResult};
use crate::PathingGrid;

/// Best-first search from the start cell. With the default [Heuristic::Octile] and a
/// `heuristic_factor` of `1.0` the returned path is optimal: the heuristic is consistent, so a
/// closed cell already has its final distance and is never reopened.
#[derive(Clone, Debug)]
pub struct AstarSolver {
    pub heuristic: Heuristic,
    /// Scales the heuristic. Values above `1.0` give Weighted A*, which expands fewer cells
    /// but no longer guarantees the shortest path. Must be finite and non-negative, anything
    /// else is replaced by `1.0` when a search starts.
    pub heuristic_factor: f64,
    /// Skip the search entirely when start and goal are on different connected components.
    pub component_precheck: bool,
}

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver {
            heuristic: Heuristic::Octile,
            heuristic_factor: 1.0,
            component_precheck: false,
        }
    }

    pub fn with_heuristic(heuristic: Heuristic) -> AstarSolver {
        AstarSolver {
            heuristic,
            ..AstarSolver::new()
        }
    }
}

impl AstarSolver {
    fn effective_factor(&self) -> f64 {
        if self.heuristic_factor.is_finite() && self.heuristic_factor >= 0.0 {
            self.heuristic_factor
        } else {
            warn!(
                "Invalid heuristic factor {}, searching with 1.0",
                self.heuristic_factor
            );
            1.0
        }
    }
}

impl Default for AstarSolver {
    fn default() -> AstarSolver {
        AstarSolver::new()
    }
}

impl GridSolver for AstarSolver {
    fn name(&self) -> &'static str {
        match self.heuristic {
            Heuristic::Zero => "dijkstra",
            _ => "astar",
        }
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
        let goal_cell = grid.cell_at(goal);
        let factor = self.effective_factor();
        let h = |ix: usize| self.heuristic.estimate(&grid.cell_at(ix), &goal_cell) * factor;

        let mut ctx: SearchContext<AstarKey> = SearchContext::new(grid.len());
        let mut seq: u64 = 0;
        let mut expanded = 0;
        ctx.cells[start].g = 0.0;
        ctx.cells[start].aux = h(start);
        ctx.cells[start].open = true;
        ctx.frontier.push(
            AstarKey {
                f: ctx.cells[start].aux,
                seq,
            },
            start,
        );

        while let Some((key, current)) = ctx.frontier.pop() {
            let state = ctx.cells[current];
            // A cell is pushed again every time a shorter way to it is found. Only the entry
            // carrying the live f is acted upon, older ones are skipped here.
            if state.closed || key.f > state.aux {
                continue;
            }
            expanded += 1;
            if current == goal {
                let path = extract(
                    grid,
                    &ctx.predecessors(),
                    goal,
                    start,
                    Direction::TowardStart,
                )
                .map_err(|e| {
                    warn!("{}: invalid predecessor chain: {}", self.name(), e);
                    e
                })?;
                info!(
                    "{}: path of {} cells found, cost {:.3}, {} expanded",
                    self.name(),
                    path.len(),
                    state.g,
                    expanded
                );
                announce_path(observer, &path);
                return Ok(SearchResult::found(path, state.g, expanded));
            }

            ctx.cells[current].closed = true;
            ctx.cells[current].open = false;
            trace!("Closed {} with g {:.3}", grid.cell_at(current), state.g);
            if notify(observer, grid, current, EventKind::Closed).is_break() {
                info!("{}: cancelled after {} expansions", self.name(), expanded);
                return Ok(SearchResult::cancelled(expanded));
            }

            let current_cell = grid.cell_at(current);
            for &n in grid.neighbours_of(current) {
                if grid.is_wall_ix(n) || ctx.cells[n].closed {
                    continue;
                }
                let tentative_g = state.g + step_cost(&current_cell, &grid.cell_at(n));
                let neighbour = &mut ctx.cells[n];
                if tentative_g >= neighbour.g {
                    continue;
                }
                neighbour.g = tentative_g;
                neighbour.aux = tentative_g + h(n);
                neighbour.predecessor = Some(current);
                let kind = if neighbour.open {
                    EventKind::PredecessorChanged
                } else {
                    neighbour.open = true;
                    EventKind::Opened
                };
                seq += 1;
                ctx.frontier.push(
                    AstarKey {
                        f: neighbour.aux,
                        seq,
                    },
                    n,
                );
                if notify(observer, grid, n, kind).is_break() {
                    info!("{}: cancelled after {} expansions", self.name(), expanded);
                    return Ok(SearchResult::cancelled(expanded));
                }
            }
        }

        if grid.reachable(&grid.cell_at(start), &goal_cell) {
            warn!("Reachable goal could not be pathed to, is reachable graph correct?");
        }
        info!(
            "{}: no path from {} to {}, {} expanded",
            self.name(),
            grid.cell_at(start),
            goal_cell,
            expanded
        );
        Ok(SearchResult::not_found(expanded))
    }
}
