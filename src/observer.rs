//! Search observer hooks for visualisation and cooperative cancellation.

use core::ops::ControlFlow;

use crate::Cell;

/// The state transition a [SearchEvent] reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The cell entered the frontier.
    Opened,
    /// The cell's distance was finalized for this round.
    Closed,
    /// The cell's predecessor link was replaced.
    PredecessorChanged,
    /// The cell is part of the returned path. Emitted in path order after a successful search.
    PathMember,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SearchEvent {
    pub cell: Cell,
    pub kind: EventKind,
}

impl SearchEvent {
    pub const fn new(cell: Cell, kind: EventKind) -> SearchEvent {
        SearchEvent { cell, kind }
    }
}

/// Receives state transitions synchronously, right after they happen. An observer cannot alter
/// the search state; returning [ControlFlow::Break] asks the search to stop as soon as possible,
/// in which case the search reports `found == false` and `cancelled == true`.
///
/// Closures of type `FnMut(SearchEvent) -> ControlFlow<()>` are observers:
///
/// ```
/// use core::ops::ControlFlow;
/// use grid_search::{solver::astar::AstarSolver, GridSolver, PathingGrid, SearchEvent};
///
/// let grid = PathingGrid::from_ascii("S...G").unwrap();
/// let mut events = 0;
/// let result = AstarSolver::new()
///     .search_observed(&grid, &mut |_: SearchEvent| {
///         events += 1;
///         ControlFlow::Continue(())
///     })
///     .unwrap();
/// assert!(result.found && events > 0);
/// ```
pub trait SearchObserver {
    fn on_event(&mut self, event: SearchEvent) -> ControlFlow<()>;
}

impl<F> SearchObserver for F
where
    F: FnMut(SearchEvent) -> ControlFlow<()>,
{
    fn on_event(&mut self, event: SearchEvent) -> ControlFlow<()> {
        self(event)
    }
}

/// A [SearchObserver] that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    #[inline]
    fn on_event(&mut self, _event: SearchEvent) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Records every event in order. With a limit set it cancels the search once that many events
/// have been seen, which gives callers a simple step budget.
#[derive(Clone, Debug, Default)]
pub struct EventRecorder {
    pub events: Vec<SearchEvent>,
    pub limit: Option<usize>,
}

impl EventRecorder {
    pub fn new() -> EventRecorder {
        EventRecorder::default()
    }

    pub fn with_limit(limit: usize) -> EventRecorder {
        EventRecorder {
            events: Vec::new(),
            limit: Some(limit),
        }
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    /// Cells of all events of the given kind, in emission order.
    pub fn cells(&self, kind: EventKind) -> Vec<Cell> {
        self.events
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.cell)
            .collect()
    }
}

impl SearchObserver for EventRecorder {
    fn on_event(&mut self, event: SearchEvent) -> ControlFlow<()> {
        self.events.push(event);
        match self.limit {
            Some(limit) if self.events.len() >= limit => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_breaks_at_limit() {
        let mut recorder = EventRecorder::with_limit(2);
        let e = SearchEvent::new(Cell::new(0, 0), EventKind::Opened);
        assert_eq!(recorder.on_event(e), ControlFlow::Continue(()));
        assert_eq!(recorder.on_event(e), ControlFlow::Break(()));
        assert_eq!(recorder.count(EventKind::Opened), 2);
        assert!(recorder.cells(EventKind::Closed).is_empty());
    }

    #[test]
    fn closures_are_observers() {
        let mut seen = Vec::new();
        let mut observer = |e: SearchEvent| {
            seen.push(e.kind);
            ControlFlow::Continue(())
        };
        let _ = observer.on_event(SearchEvent::new(Cell::new(1, 1), EventKind::Closed));
        assert_eq!(seen, vec![EventKind::Closed]);
    }
}
