use grid_search::{
    observer::{EventKind, EventRecorder},
    solver::astar::AstarSolver,
    Cell, GridSolver, PathingGrid,
};

// The heuristic_factor can be set to scale the heuristic, causing cells that are closer to the goal (ignoring obstacles)
// to be evaluated sooner than in normal operation. This is called Weighted A* and it can speed up the search in certain scenarios,
// at the price of possibly longer paths.

fn main() {
    const N: i32 = 30;
    let block = |r0: i32, c0: i32, h: i32, w: i32| {
        (r0..r0 + h).flat_map(move |r| (c0..c0 + w).map(move |c| Cell::new(r, c)))
    };
    let walls = block(8, 8, 8, 8)
        .chain(block(3, 0, 6, 6))
        .chain(block(0, 10, 6, 6));
    let grid = PathingGrid::build(
        N as usize,
        N as usize,
        walls,
        Cell::new(1, 1),
        Cell::new(N - 3, N - 3),
    )
    .unwrap();
    println!("{}", grid);
    for factor in [1.0, 1.3, 2.0] {
        let solver = AstarSolver {
            heuristic_factor: factor,
            ..AstarSolver::new()
        };
        let mut recorder = EventRecorder::new();
        let result = solver.search_observed(&grid, &mut recorder).unwrap();
        println!(
            "factor {factor}: cost {:.3}, {} cells closed",
            result.cost,
            recorder.count(EventKind::Closed)
        );
    }
}
