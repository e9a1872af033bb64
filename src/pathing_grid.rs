use core::fmt;

use grid_util::grid::{BoolGrid, ValueGrid};
use grid_util::point::Point;
use log::{debug, info};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::error::{ConfigError, ConfigResult, Endpoint};
use crate::Cell;

/// Plain description of a grid. Useful when the layout comes from configuration rather than
/// being assembled in code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    pub walls: Vec<Cell>,
    pub start: Cell,
    pub goal: Cell,
}

impl GridConfig {
    pub fn build(&self) -> ConfigResult<PathingGrid> {
        PathingGrid::build(
            self.rows,
            self.cols,
            self.walls.iter().copied(),
            self.start,
            self.goal,
        )
    }
}

/// [PathingGrid] owns the wall layout of a fixed-size grid together with its start and goal.
/// The 8-neighbourhood of every cell is computed once at build time, as are the
/// [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory)) of the free
/// cells so that reachability can be answered without searching.
///
/// The grid is immutable after [build](Self::build). Search state lives in a context created
/// per search call, so a grid can be searched any number of times and cloned freely.
#[derive(Clone, Debug)]
pub struct PathingGrid {
    rows: usize,
    cols: usize,
    /// Indexed by `(x, y) = (col, row)`.
    walls: BoolGrid,
    neighbours: Vec<SmallVec<[usize; 8]>>,
    components: UnionFind<usize>,
    start: Cell,
    goal: Cell,
}

impl PathingGrid {
    /// Validates the layout and builds the grid. Fails if either dimension is zero or does not
    /// fit a signed coordinate, if a wall, the start or the goal lies outside the grid, or if
    /// the start or goal is a wall.
    pub fn build<I>(
        rows: usize,
        cols: usize,
        walls: I,
        start: Cell,
        goal: Cell,
    ) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = Cell>,
    {
        if rows == 0 || cols == 0 {
            return Err(ConfigError::EmptyGrid { rows, cols });
        }
        let max = i32::MAX as usize;
        if rows > max || cols > max || rows.checked_mul(cols).is_none() {
            return Err(ConfigError::TooLarge { rows, cols });
        }
        let mut grid = PathingGrid {
            rows,
            cols,
            walls: BoolGrid::new(cols, rows, false),
            neighbours: Vec::new(),
            components: UnionFind::new(0),
            start,
            goal,
        };
        let mut wall_count = 0;
        for wall in walls {
            if !grid.in_bounds(&wall) {
                return Err(ConfigError::WallOutOfBounds { cell: wall });
            }
            if !grid.is_wall(&wall) {
                grid.walls.set(wall.col, wall.row, true);
                wall_count += 1;
            }
        }
        grid.validate_endpoints(start, goal)?;
        grid.generate_neighbours();
        grid.generate_components();
        info!(
            "Built {}x{} grid with {} walls, start {} goal {}",
            rows, cols, wall_count, start, goal
        );
        Ok(grid)
    }

    /// Parses a map with one line per row: `.` is free, `#`, `@` and `T` are walls, `S` marks
    /// the start and `G` the goal. Leading and trailing whitespace on each line is ignored, as
    /// are blank lines.
    pub fn from_ascii(map: &str) -> ConfigResult<Self> {
        let lines = map
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>();
        let rows = lines.len();
        let cols = lines.first().map_or(0, |l| l.chars().count());
        let mut walls = Vec::new();
        let mut start: Option<Cell> = None;
        let mut goal: Option<Cell> = None;
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(ConfigError::RaggedRow {
                    row,
                    expected: cols,
                    found,
                });
            }
            for (col, symbol) in line.chars().enumerate() {
                let cell = Cell::new(row as i32, col as i32);
                match symbol {
                    '.' => {}
                    '#' | '@' | 'T' => walls.push(cell),
                    'S' => place_endpoint(&mut start, Endpoint::Start, cell)?,
                    'G' => place_endpoint(&mut goal, Endpoint::Goal, cell)?,
                    _ => return Err(ConfigError::UnknownSymbol { symbol, row, col }),
                }
            }
        }
        let start = start.ok_or(ConfigError::MissingEndpoint {
            what: Endpoint::Start,
        })?;
        let goal = goal.ok_or(ConfigError::MissingEndpoint {
            what: Endpoint::Goal,
        })?;
        Self::build(rows, cols, walls, start, goal)
    }

    /// Checks that both endpoints are inside the grid and not on a wall.
    pub fn validate_endpoints(&self, start: Cell, goal: Cell) -> ConfigResult<()> {
        for (what, cell) in [(Endpoint::Start, start), (Endpoint::Goal, goal)] {
            match self.index_of(&cell) {
                None => {
                    return Err(ConfigError::OutOfBounds {
                        what,
                        cell,
                        rows: self.rows,
                        cols: self.cols,
                    })
                }
                Some(ix) if self.is_wall_ix(ix) => {
                    return Err(ConfigError::OnWall { what, cell })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Caches the in-bounds part of every cell's Moore neighbourhood as arena indices.
    fn generate_neighbours(&mut self) {
        let neighbours = (0..self.len())
            .map(|ix| {
                Point::from(self.cell_at(ix))
                    .moore_neighborhood_smallvec()
                    .into_iter()
                    .filter_map(|p| self.index_of(&Cell::from(p)))
                    .collect::<SmallVec<[usize; 8]>>()
            })
            .collect();
        self.neighbours = neighbours;
    }

    /// Generates a new [UnionFind] structure and links up free neighbours to the same components.
    fn generate_components(&mut self) {
        self.components = UnionFind::new(self.len());
        for ix in 0..self.len() {
            if self.is_wall_ix(ix) {
                continue;
            }
            for &n in &self.neighbours[ix] {
                // Each pair only needs to be joined once.
                if n > ix && !self.is_wall_ix(n) {
                    self.components.union(ix, n);
                }
            }
        }
        debug!("Generated connected components for {} cells", self.len());
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }
    /// Number of cells, walls included.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn start(&self) -> Cell {
        self.start
    }
    pub fn goal(&self) -> Cell {
        self.goal
    }

    pub fn in_bounds(&self, cell: &Cell) -> bool {
        self.walls.index_in_bounds(cell.col, cell.row)
    }

    /// Flat arena index of a cell, `None` if it is out of bounds.
    #[inline]
    pub fn index_of(&self, cell: &Cell) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| cell.row as usize * self.cols + cell.col as usize)
    }

    #[inline]
    pub fn cell_at(&self, ix: usize) -> Cell {
        Cell::new((ix / self.cols) as i32, (ix % self.cols) as i32)
    }

    /// Out-of-bounds cells count as walls.
    pub fn is_wall(&self, cell: &Cell) -> bool {
        !self.in_bounds(cell) || self.walls.get_point(Point::from(*cell))
    }

    #[inline]
    pub(crate) fn is_wall_ix(&self, ix: usize) -> bool {
        self.walls.get_point(Point::from(self.cell_at(ix)))
    }

    /// The up to 8 in-bounds neighbours of the cell at `ix`, walls included.
    #[inline]
    pub fn neighbours_of(&self, ix: usize) -> &[usize] {
        &self.neighbours[ix]
    }

    /// In-bounds neighbours of a cell. Empty for out-of-bounds cells.
    pub fn neighbour_cells(&self, cell: &Cell) -> impl Iterator<Item = Cell> + '_ {
        self.index_of(cell)
            .map(|ix| self.neighbours_of(ix))
            .unwrap_or(&[])
            .iter()
            .map(|&n| self.cell_at(n))
    }

    /// Retrieves the component id a given [Cell] belongs to.
    pub fn component_of(&self, cell: &Cell) -> Option<usize> {
        self.index_of(cell).map(|ix| self.components.find(ix))
    }

    /// Checks if two free cells are on the same connected component.
    pub fn reachable(&self, a: &Cell, b: &Cell) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(a_ix), Some(b_ix)) => {
                !self.is_wall_ix(a_ix)
                    && !self.is_wall_ix(b_ix)
                    && self.components.equiv(a_ix, b_ix)
            }
            _ => false,
        }
    }

    /// Checks if two cells are on different connected components.
    pub fn unreachable(&self, a: &Cell, b: &Cell) -> bool {
        !self.reachable(a, b)
    }

    /// Renders the grid like [Display](fmt::Display) with the cells of `path` marked by `*`.
    pub fn render_path(&self, path: &[Cell]) -> String {
        let mut on_path = vec![false; self.len()];
        for ix in path.iter().filter_map(|c| self.index_of(c)) {
            on_path[ix] = true;
        }
        self.render(|ix| on_path[ix].then_some('*'))
    }

    fn render<F>(&self, overlay: F) -> String
    where
        F: Fn(usize) -> Option<char>,
    {
        let mut out = String::with_capacity(self.len() + self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let ix = row * self.cols + col;
                let cell = self.cell_at(ix);
                let symbol = if cell == self.start {
                    'S'
                } else if cell == self.goal {
                    'G'
                } else if self.is_wall_ix(ix) {
                    '#'
                } else {
                    overlay(ix).unwrap_or('.')
                };
                out.push(symbol);
            }
            out.push('\n');
        }
        out
    }
}

fn place_endpoint(slot: &mut Option<Cell>, what: Endpoint, cell: Cell) -> ConfigResult<()> {
    match slot {
        Some(first) => Err(ConfigError::DuplicateEndpoint {
            what,
            first: *first,
            second: cell,
        }),
        None => {
            *slot = Some(cell);
            Ok(())
        }
    }
}

impl fmt::Display for PathingGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render(|_| None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_dimensions() {
        let err = PathingGrid::build(0, 3, [], Cell::new(0, 0), Cell::new(0, 1)).unwrap_err();
        assert_eq!(err, ConfigError::EmptyGrid { rows: 0, cols: 3 });
        assert!(PathingGrid::build(3, 0, [], Cell::new(0, 0), Cell::new(0, 0)).is_err());
    }

    #[test]
    fn rejects_dimensions_beyond_coordinate_range() {
        let err = PathingGrid::build(1 << 33, 1 << 33, [], Cell::new(0, 0), Cell::new(1, 1))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::TooLarge {
                rows: 1 << 33,
                cols: 1 << 33
            }
        );
        let too_wide = i32::MAX as usize + 1;
        assert!(matches!(
            PathingGrid::build(1, too_wide, [], Cell::new(0, 0), Cell::new(0, 1)),
            Err(ConfigError::TooLarge { .. })
        ));
        assert!(matches!(
            PathingGrid::build(usize::MAX, 2, [], Cell::new(0, 0), Cell::new(0, 1)),
            Err(ConfigError::TooLarge { .. })
        ));
    }

    #[test]
    fn rejects_endpoints_outside_or_on_walls() {
        let err = PathingGrid::build(3, 3, [], Cell::new(-1, 0), Cell::new(2, 2)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfBounds {
                what: Endpoint::Start,
                ..
            }
        ));
        let err = PathingGrid::build(3, 3, [], Cell::new(0, 0), Cell::new(2, 3)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfBounds {
                what: Endpoint::Goal,
                ..
            }
        ));
        let err = PathingGrid::build(3, 3, [Cell::new(0, 0)], Cell::new(0, 0), Cell::new(2, 2))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OnWall {
                what: Endpoint::Start,
                ..
            }
        ));
        let err = PathingGrid::build(3, 3, [Cell::new(2, 2)], Cell::new(0, 0), Cell::new(2, 2))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OnWall {
                what: Endpoint::Goal,
                ..
            }
        ));
        let err = PathingGrid::build(3, 3, [Cell::new(5, 5)], Cell::new(0, 0), Cell::new(2, 2))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::WallOutOfBounds {
                cell: Cell::new(5, 5)
            }
        );
    }

    #[test]
    fn neighbourhoods_are_bounds_checked() {
        let grid = PathingGrid::build(3, 4, [], Cell::new(0, 0), Cell::new(2, 3)).unwrap();
        let corner = grid.index_of(&Cell::new(0, 0)).unwrap();
        let edge = grid.index_of(&Cell::new(0, 1)).unwrap();
        let centre = grid.index_of(&Cell::new(1, 1)).unwrap();
        assert_eq!(grid.neighbours_of(corner).len(), 3);
        assert_eq!(grid.neighbours_of(edge).len(), 5);
        assert_eq!(grid.neighbours_of(centre).len(), 8);
        assert!(grid
            .neighbour_cells(&Cell::new(1, 1))
            .all(|n| n.is_adjacent(&Cell::new(1, 1))));
        assert_eq!(grid.neighbour_cells(&Cell::new(7, 7)).count(), 0);
        let mut around = grid.neighbour_cells(&Cell::new(1, 1)).collect::<Vec<_>>();
        around.sort();
        around.dedup();
        assert_eq!(around.len(), 8);
        assert!(!around.contains(&Cell::new(1, 1)));
    }

    #[test]
    fn single_cell_grid_has_no_neighbours() {
        let grid = PathingGrid::build(1, 1, [], Cell::new(0, 0), Cell::new(0, 0)).unwrap();
        assert!(grid.neighbours_of(0).is_empty());
        assert!(grid.reachable(&Cell::new(0, 0), &Cell::new(0, 0)));
    }

    /// Tests whether cells are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        // |.#.|
        // |.#.|
        let grid = PathingGrid::from_ascii(
            "S#G
             .#.",
        )
        .unwrap();
        let left = Cell::new(1, 0);
        let right = Cell::new(1, 2);
        assert!(grid.reachable(&grid.start(), &left));
        assert!(grid.unreachable(&left, &right));
        assert!(grid.unreachable(&grid.start(), &grid.goal()));
        assert_ne!(grid.component_of(&left), grid.component_of(&right));
        // Walls are never reachable, not even from themselves.
        assert!(grid.unreachable(&Cell::new(0, 1), &Cell::new(0, 1)));
    }

    #[test]
    fn diagonal_gap_connects_components() {
        // |S#|
        // |#G|
        let grid = PathingGrid::from_ascii("S#\n#G").unwrap();
        assert!(grid.reachable(&grid.start(), &grid.goal()));
    }

    #[test]
    fn ascii_round_trips_through_display() {
        let map = "S..#\n.#..\n...G\n";
        let grid = PathingGrid::from_ascii(map).unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert!(grid.is_wall(&Cell::new(0, 3)));
        assert!(grid.is_wall(&Cell::new(1, 1)));
        assert!(grid.is_wall(&Cell::new(-1, 0)));
        assert_eq!(grid.to_string(), map);
    }

    #[test]
    fn ascii_errors() {
        assert!(matches!(
            PathingGrid::from_ascii("S.\n.x"),
            Err(ConfigError::UnknownSymbol { symbol: 'x', row: 1, col: 1 })
        ));
        assert!(matches!(
            PathingGrid::from_ascii("S..\n.G"),
            Err(ConfigError::RaggedRow { row: 1, expected: 3, found: 2 })
        ));
        assert!(matches!(
            PathingGrid::from_ascii("S..\n..."),
            Err(ConfigError::MissingEndpoint { what: Endpoint::Goal })
        ));
        assert!(matches!(
            PathingGrid::from_ascii("S.S\n..G"),
            Err(ConfigError::DuplicateEndpoint { what: Endpoint::Start, .. })
        ));
        assert!(matches!(
            PathingGrid::from_ascii(""),
            Err(ConfigError::MissingEndpoint { .. })
        ));
    }

    #[test]
    fn config_builds_grid() {
        let config = GridConfig {
            rows: 2,
            cols: 3,
            walls: vec![Cell::new(0, 1)],
            start: Cell::new(0, 0),
            goal: Cell::new(0, 2),
        };
        let grid = config.build().unwrap();
        assert!(grid.is_wall(&Cell::new(0, 1)));
        let path = [Cell::new(0, 0), Cell::new(1, 1), Cell::new(0, 2)];
        assert_eq!(grid.render_path(&path), "S#G\n.*.\n");
    }
}
