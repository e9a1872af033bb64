use grid_search::{solver::astar::AstarSolver, GridSolver, PathingGrid};

// In this example a path is found on a grid with shape
// #####
// #S..#
// #.#.#
// #..G#
// #####
// S marks the start
// G marks the goal
fn main() {
    let grid = PathingGrid::from_ascii(
        "#####
         #S..#
         #.#.#
         #..G#
         #####",
    )
    .unwrap();
    let result = AstarSolver::new().search(&grid).unwrap();
    if result.found {
        println!("A path of cost {:.3} has been found:", result.cost);
        for cell in &result.path {
            println!("{}", cell);
        }
        print!("{}", grid.render_path(&result.path));
    }
}
