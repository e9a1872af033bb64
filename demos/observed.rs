use core::ops::ControlFlow;

use grid_search::{
    observer::{EventKind, EventRecorder},
    solver::dstar_lite::DStarLiteSolver,
    GridSolver, PathingGrid, SearchEvent,
};

// D* Lite searches from the goal back towards the start. An observer sees every state
// transition and can stop the search early.
fn main() {
    let grid = PathingGrid::from_ascii(
        "S.........
         .######...
         ......#...
         ..#...#.#.
         ..#.....#G",
    )
    .unwrap();
    let solver = DStarLiteSolver::new();

    let mut recorder = EventRecorder::new();
    let result = solver.search_observed(&grid, &mut recorder).unwrap();
    println!("{}", grid.render_path(&result.path));
    println!("cost: {:.3}, expanded: {}", result.cost, result.expanded);
    for kind in [
        EventKind::Opened,
        EventKind::Closed,
        EventKind::PredecessorChanged,
        EventKind::PathMember,
    ] {
        println!("{:?}: {}", kind, recorder.count(kind));
    }

    // A closure makes a step budget.
    let mut budget = 5;
    let stopped = solver
        .search_observed(&grid, &mut |event: SearchEvent| {
            if event.kind == EventKind::Closed {
                budget -= 1;
            }
            if budget == 0 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();
    println!("stopped early: cancelled = {}", stopped.cancelled);
}
