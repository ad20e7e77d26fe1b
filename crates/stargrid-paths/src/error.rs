use stargrid_core::Pos;
use thiserror::Error;

/// Why a start/end pair was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("{0} is outside the grid")]
    OutOfBounds(Pos),
    #[error("start and end are the same cell {0}")]
    SameCell(Pos),
    #[error("{0} is an obstacle")]
    Obstacle(Pos),
}

/// Errors returned by [`PathSearch::run`](crate::PathSearch::run).
///
/// Not finding a path is a normal outcome and is reported through
/// [`SearchOutcome::NoPath`](crate::SearchOutcome::NoPath) instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Rejected before the grid was touched.
    #[error("invalid endpoints: {0}")]
    InvalidEndpoints(#[from] EndpointError),
    /// The context was cancelled mid-search. Cell markers are left as they
    /// were at that point.
    #[error("search cancelled")]
    Cancelled,
}
