//! **pathviz-core**: grid state for weighted pathfinding visualization.
//!
//! This crate provides the grid the search engine runs over: geometry
//! primitives, weighted/obstacle cells, an owned square [`Grid`] with
//! orthogonal neighbour lookup and resizing, and the sparse [`GridConfig`]
//! used to save and restore painted layouts.
//!
//! Enable the `serde` feature for JSON (de)serialization of configurations.

pub mod cell;
pub mod config;
pub mod error;
pub mod geom;
pub mod grid;

pub use cell::{Cell, DEFAULT_WEIGHT};
pub use config::{GridConfig, NodeConfig, Position};
pub use error::GridError;
pub use geom::{Point, Range};
pub use grid::Grid;
