//! Error type for grid mutation and configuration import.

use thiserror::Error;

use crate::geom::Point;

/// Errors reported by [`Grid`](crate::Grid) mutators and config import.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// A row/column outside `0..size`.
    #[error("coordinate {pos} is outside the {size}x{size} grid")]
    InvalidCoordinate { pos: Point, size: i32 },

    /// A weight below 1.
    #[error("invalid weight {0}: weights must be at least 1")]
    InvalidWeight(i32),

    /// A malformed or inconsistent configuration payload.
    #[error("invalid grid configuration: {0}")]
    InvalidConfig(String),
}
