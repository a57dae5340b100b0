use thiserror::Error;

use pathviz_core::Point;

/// Errors reported by the [`SearchEngine`](crate::SearchEngine).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// An endpoint outside the engine's range.
    #[error("coordinate {0} is outside the search range")]
    InvalidCoordinate(Point),

    /// The engine was driven in a state that does not allow it.
    #[error("invalid search state: {0}")]
    InvalidState(&'static str),

    /// The start or end cell is an obstacle.
    #[error("start or end cell {0} is an obstacle")]
    StartOrEndIsObstacle(Point),

    /// The open set ran empty before the end was reached.
    #[error("no path found: destination unreachable")]
    NoPathFound,
}
