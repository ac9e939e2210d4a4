use thiserror::Error;

/// A search request that cannot be run as given.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("depth {depth} needs {depth} pieces but only {available} were given")]
    NotEnoughPieces { depth: usize, available: usize },
    #[error("max height {0} is outside 1..=24")]
    Height(i32),
    #[error("field holds {capacity} rows, fewer than the max height {max_height}")]
    FieldTooSmall { capacity: i32, max_height: i32 },
    #[error("field has blocks at or above row {0}")]
    BlocksAboveHeight(i32),
    #[error("cannot start {threads} worker threads: {message}")]
    ThreadPool { threads: usize, message: String },
}
