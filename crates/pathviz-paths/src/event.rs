//! Notifications emitted by the [`SearchEngine`](crate::SearchEngine) to a
//! registered observer.

use pathviz_core::Point;

/// A single state change inside a search run.
///
/// Events are delivered synchronously, in order, from within
/// [`set_start_and_end`](crate::SearchEngine::set_start_and_end) and
/// [`step`](crate::SearchEngine::step).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchEvent {
    /// Transient state was cleared and a new run is ready.
    Reset { start: Point, end: Point },
    /// A cell entered the open set.
    Opened { pos: Point, g: i64, f: i64 },
    /// An open cell got a strictly cheaper route.
    Improved { pos: Point, g: i64, f: i64 },
    /// A cell moved from the open set to the closed set.
    Closed(Point),
    /// The end was reached; the path has `len` cells and costs `cost`.
    Found { len: usize, cost: i64 },
    /// The open set ran empty.
    Exhausted,
}

/// Boxed observer callback.
pub type Observer = Box<dyn FnMut(&SearchEvent)>;
