//! Error types for grid construction and search.

use core::fmt;

use thiserror::Error;

use crate::Cell;

/// Which endpoint of a search a [ConfigError] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::Goal => write!(f, "goal"),
        }
    }
}

/// Invalid grid input. Raised while building a [PathingGrid](crate::PathingGrid), never in the
/// middle of a search.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid must have at least one row and one column, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("{rows}x{cols} grid does not fit signed cell coordinates")]
    TooLarge { rows: usize, cols: usize },

    #[error("{what} {cell} lies outside the {rows}x{cols} grid")]
    OutOfBounds {
        what: Endpoint,
        cell: Cell,
        rows: usize,
        cols: usize,
    },

    #[error("{what} {cell} is placed on a wall")]
    OnWall { what: Endpoint, cell: Cell },

    #[error("wall {cell} lies outside the grid")]
    WallOutOfBounds { cell: Cell },

    #[error("unknown map symbol {symbol:?} at ({row}, {col})")]
    UnknownSymbol { symbol: char, row: usize, col: usize },

    #[error("map row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("map has no {what} cell")]
    MissingEndpoint { what: Endpoint },

    #[error("map has more than one {what} cell: {first} and {second}")]
    DuplicateEndpoint {
        what: Endpoint,
        first: Cell,
        second: Cell,
    },
}

/// Failures of a search call. An unreachable goal is not an error: it is reported as a
/// [SearchResult](crate::SearchResult) with `found == false`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The predecessor chain revisited a cell. Indicates a bug in the update logic.
    #[error("predecessor cycle detected at {cell}")]
    PredecessorCycle { cell: Cell },

    /// The predecessor chain ended before reaching the other endpoint although the
    /// terminal cell was reported reachable.
    #[error("predecessor chain broken at {cell}")]
    BrokenChain { cell: Cell },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

pub type SearchOutcome = Result<crate::SearchResult, SearchError>;
