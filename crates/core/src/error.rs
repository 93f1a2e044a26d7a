//! Error types for the blobgraph clustering engine.

use thiserror::Error;

use crate::item::Representation;

/// Primary error type for graph construction and extraction.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("item list is empty")]
    EmptyInput,

    #[error("item {index} is not a {expected} item")]
    MixedRepresentation {
        index: usize,
        expected: Representation,
    },

    #[error("item {index} has an empty boundary")]
    DegenerateGeometry { index: usize },

    #[error("item {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    #[error("malformed adjacency: {0}")]
    MalformedAdjacency(#[source] AdjacencyDefect),

    #[error("malformed distance matrix: {0}")]
    MalformedDistances(#[source] DistanceDefect),

    #[error("invalid calibration: {field} = {value}")]
    InvalidCalibration { field: &'static str, value: f64 },

    #[error("distance between items {i} and {j} overflows")]
    DistanceOverflow { i: usize, j: usize },

    #[error("invalid connection threshold: {0}")]
    InvalidThreshold(f64),

    #[error("measurement table has no {column} column (required for {kind})")]
    MissingColumn { kind: &'static str, column: String },

    #[error("column {column} has {len} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        len: usize,
        expected: usize,
    },

    #[error("table has {boundaries} boundaries for {rows} rows")]
    BoundaryCountMismatch { boundaries: usize, rows: usize },

    #[error("unknown distance kind: {0}")]
    UnknownDistanceKind(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("run cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why an externally supplied adjacency matrix was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjacencyDefect {
    #[error("row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("entry ({i}, {j}) has no mirror at ({j}, {i})")]
    Asymmetric { i: usize, j: usize },

    #[error("diagonal entry {index} is set")]
    SelfLoop { index: usize },
}

/// Why a serialized distance matrix was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceDefect {
    #[error("{len} values for {n} items, expected {expected}")]
    WrongLength {
        n: usize,
        len: usize,
        expected: usize,
    },

    #[error("distance ({i}, {j}) differs from ({j}, {i})")]
    Asymmetric { i: usize, j: usize },

    #[error("distance ({i}, {j}) is negative or not finite")]
    Invalid { i: usize, j: usize },
}

/// Convenience Result type alias for GraphError.
pub type Result<T> = std::result::Result<T, GraphError>;
