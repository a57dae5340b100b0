//! Incremental A* pathfinding over a weighted, 4-connected grid.
//!
//! [`SearchEngine`] searches from one start cell to one end cell and exposes
//! its open set, closed set and path after every [`step`](SearchEngine::step),
//! so a caller can animate the exploration one expansion per tick, or run it
//! to completion with [`find_path`](SearchEngine::find_path).
//!
//! Moving into a cell costs that cell's weight; the heuristic is the
//! Manhattan distance. Among open cells with equal `f`, the one inserted
//! first is expanded first, which makes runs fully reproducible.
//!
//! # Trait hierarchy
//!
//! | Trait | Provides |
//! |---|---|
//! | [`Pather`] | neighbours, passability |
//! | [`WeightedPather`] : [`Pather`] | entry cost |
//! | [`AstarPather`] : [`WeightedPather`] | admissible estimate |
//!
//! [`pathviz_core::Grid`] implements all three.

mod distance;
mod engine;
mod error;
mod event;
mod grid;
mod speed;
mod traits;

pub use distance::manhattan;
pub use engine::{Score, SearchEngine, SearchState, Step, UNREACHABLE};
pub use error::SearchError;
pub use event::{Observer, SearchEvent};
pub use speed::{ParseSpeedError, Speed};
pub use traits::{AstarPather, Pather, WeightedPather};
