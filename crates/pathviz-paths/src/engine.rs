//! Incremental A* over a weighted grid.
//!
//! [`SearchEngine`] owns every piece of transient search state (per-cell
//! `g`/`h`/`f`/parent, open and closed sets, the reconstructed path) in flat
//! arrays indexed by cell, so the grid itself stays the sole owner of cell
//! data and is only borrowed for the duration of each call. Per-cell state is
//! invalidated lazily by bumping a generation counter.
//!
//! The grid must not change between [`set_start_and_end`] and the end of the
//! run. Mutating it mid-run is unsupported and gives unspecified results
//! (never memory unsafety).
//!
//! [`set_start_and_end`]: SearchEngine::set_start_and_end

use std::collections::BinaryHeap;

use log::{debug, trace};
use pathviz_core::{Grid, Point, Range};

use crate::error::SearchError;
use crate::event::{Observer, SearchEvent};
use crate::traits::AstarPather;

/// Sentinel cost for cells without a known route.
pub const UNREACHABLE: i64 = i64::MAX;

const NO_PARENT: usize = usize::MAX;

// ---------------------------------------------------------------------------
// Internal node and heap entry
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Status {
    Unvisited,
    Open,
    Closed,
}

#[derive(Clone)]
struct Node {
    g: i64,
    h: i64,
    f: i64,
    parent: usize,
    /// Open-set insertion sequence; kept when `g` improves.
    seq: u32,
    generation: u32,
    status: Status,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: UNREACHABLE,
            h: 0,
            f: UNREACHABLE,
            parent: NO_PARENT,
            seq: 0,
            generation: 0,
            status: Status::Unvisited,
        }
    }
}

/// Heap entry ordered by `(f, seq)`, smallest first.
///
/// Popping the smallest `(f, seq)` among live entries selects the same cell as
/// a linear scan for the first minimum-`f` cell in insertion order.
#[derive(Clone, Copy, Eq, PartialEq)]
struct NodeRef {
    idx: usize,
    f: i64,
    seq: u32,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest (f, seq) first.
        other.f.cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// Public state types
// ---------------------------------------------------------------------------

/// Lifecycle of a search run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchState {
    /// No start/end set.
    Idle,
    /// Start/end set, open set = {start}, nothing expanded yet.
    Ready,
    /// At least one step taken, end not yet reached.
    Running,
    /// Path reconstructed.
    Found,
    /// Open set emptied without reaching the end.
    Exhausted,
}

impl SearchState {
    /// Whether the run is over (found or exhausted).
    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(self, SearchState::Found | SearchState::Exhausted)
    }
}

/// Outcome of a single [`SearchEngine::step`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// A cell was expanded; the end has not been reached yet.
    Pending,
    /// The end was selected and the path reconstructed.
    Found,
    /// The open set is empty; there is no path.
    Exhausted,
}

/// Transient per-cell search fields, valid for the current run only.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Score {
    /// Known cost from the start.
    pub g: i64,
    /// Manhattan estimate to the end.
    pub h: i64,
    /// `g + h`.
    pub f: i64,
    /// Predecessor on the best known route.
    pub parent: Option<Point>,
}

// ---------------------------------------------------------------------------
// SearchEngine
// ---------------------------------------------------------------------------

/// Step-wise A* search from one start cell to one end cell.
///
/// Drive it with [`step`](Self::step) (one expansion per call, e.g. once per
/// animation tick) or with [`find_path`](Self::find_path) (to completion).
/// Both produce identical open sets, closed sets and paths.
pub struct SearchEngine {
    rng: Range,
    width: usize,
    nodes: Vec<Node>,
    generation: u32,
    heap: BinaryHeap<NodeRef>,
    /// Every cell ever opened this run, in insertion order.
    inserted: Vec<usize>,
    /// Closed cells in finalization order.
    closed: Vec<usize>,
    path: Vec<Point>,
    start: usize,
    goal: usize,
    state: SearchState,
    steps: usize,
    next_seq: u32,
    // shared scratch buffer for neighbor queries
    nbuf: Vec<Point>,
    observer: Option<Observer>,
}

impl SearchEngine {
    /// Create a new engine for the given grid rectangle.
    pub fn new(rng: Range) -> Self {
        Self {
            rng,
            width: rng.width().max(0) as usize,
            nodes: vec![Node::default(); rng.len()],
            generation: 0,
            heap: BinaryHeap::new(),
            inserted: Vec::new(),
            closed: Vec::new(),
            path: Vec::new(),
            start: NO_PARENT,
            goal: NO_PARENT,
            state: SearchState::Idle,
            steps: 0,
            next_seq: 0,
            nbuf: Vec::with_capacity(4),
            observer: None,
        }
    }

    /// Create an engine covering the whole of `grid`.
    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(grid.bounds())
    }

    /// Replace the underlying range (e.g. after a grid resize).
    ///
    /// Caches are kept when the new range fits in the existing capacity and
    /// reallocated otherwise. The engine returns to [`SearchState::Idle`].
    pub fn set_range(&mut self, rng: Range) {
        let new_len = rng.len();
        self.rng = rng;
        self.width = rng.width().max(0) as usize;
        if new_len > self.nodes.len() {
            self.nodes.clear();
            self.nodes.resize(new_len, Node::default());
            self.generation = 0;
        }
        self.reset();
    }

    /// The grid rectangle being searched.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    /// Register a callback that receives every [`SearchEvent`].
    pub fn set_observer<F: FnMut(&SearchEvent) + 'static>(&mut self, observer: F) {
        self.observer = Some(Box::new(observer));
    }

    /// Remove the registered observer, if any.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Forget endpoints and all transient state.
    pub fn reset(&mut self) {
        self.clear_run();
        self.start = NO_PARENT;
        self.goal = NO_PARENT;
        self.state = SearchState::Idle;
    }

    // -----------------------------------------------------------------------
    // Run setup
    // -----------------------------------------------------------------------

    /// Designate start and end and prepare a fresh run.
    ///
    /// Clears the open set, closed set, path and every cell's transient
    /// fields, then opens `start` with `g = 0`. May be called in any state.
    /// Obstacle endpoints are reported by the first [`step`](Self::step) or
    /// by [`find_path`](Self::find_path).
    pub fn set_start_and_end<P: AstarPather>(
        &mut self,
        pather: &P,
        start: Point,
        end: Point,
    ) -> Result<(), SearchError> {
        let start_idx = self.idx(start).ok_or(SearchError::InvalidCoordinate(start))?;
        let goal_idx = self.idx(end).ok_or(SearchError::InvalidCoordinate(end))?;

        self.clear_run();
        self.start = start_idx;
        self.goal = goal_idx;

        let h = i64::from(pather.estimate(start, end));
        let seq = self.next_seq();
        let cur_gen = self.generation;
        let node = &mut self.nodes[start_idx];
        node.g = 0;
        node.h = h;
        node.f = h;
        node.parent = NO_PARENT;
        node.seq = seq;
        node.generation = cur_gen;
        node.status = Status::Open;
        self.inserted.push(start_idx);
        self.heap.push(NodeRef {
            idx: start_idx,
            f: h,
            seq,
        });
        self.state = SearchState::Ready;

        debug!("search ready: {} -> {} in {}", start, end, self.rng);
        self.emit(SearchEvent::Reset { start, end });
        self.emit(SearchEvent::Opened {
            pos: start,
            g: 0,
            f: h,
        });
        Ok(())
    }

    /// Bump the generation and drop all per-run collections.
    fn clear_run(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.heap.clear();
        self.inserted.clear();
        self.closed.clear();
        self.path.clear();
        self.steps = 0;
        self.next_seq = 0;
    }

    fn next_seq(&mut self) -> u32 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn check_endpoints<P: AstarPather>(&self, pather: &P) -> Result<(), SearchError> {
        for idx in [self.start, self.goal] {
            let p = self.point(idx);
            if !pather.passable(p) {
                return Err(SearchError::StartOrEndIsObstacle(p));
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    /// Run one A* iteration.
    ///
    /// Normal completion is reported through [`Step::Found`] and
    /// [`Step::Exhausted`]. Errors are reserved for misuse: stepping while
    /// idle or after the run finished ([`SearchError::InvalidState`]) and
    /// obstacle endpoints on the first step
    /// ([`SearchError::StartOrEndIsObstacle`]).
    pub fn step<P: AstarPather>(&mut self, pather: &P) -> Result<Step, SearchError> {
        match self.state {
            SearchState::Idle => return Err(SearchError::InvalidState("start and end are not set")),
            SearchState::Found | SearchState::Exhausted => {
                return Err(SearchError::InvalidState(
                    "search already finished; set start and end again",
                ));
            }
            SearchState::Ready => {
                self.check_endpoints(pather)?;
                self.state = SearchState::Running;
            }
            SearchState::Running => {}
        }
        self.steps += 1;

        let Some(ci) = self.pop_open() else {
            self.state = SearchState::Exhausted;
            debug!("search exhausted after {} steps", self.steps);
            self.emit(SearchEvent::Exhausted);
            return Ok(Step::Exhausted);
        };

        if ci == self.goal {
            self.reconstruct_path();
            self.state = SearchState::Found;
            let cost = self.nodes[ci].g;
            debug!(
                "path found after {} steps: {} cells, cost {}",
                self.steps,
                self.path.len(),
                cost
            );
            self.emit(SearchEvent::Found {
                len: self.path.len(),
                cost,
            });
            return Ok(Step::Found);
        }

        self.nodes[ci].status = Status::Closed;
        self.closed.push(ci);
        let current_point = self.point(ci);
        trace!("step {}: closed {}", self.steps, current_point);
        self.emit(SearchEvent::Closed(current_point));

        self.expand(pather, ci);
        Ok(Step::Pending)
    }

    /// Drive the search to completion and return the path.
    ///
    /// If start and end coincide the single-cell path is returned without
    /// taking any step. May be called on a partly stepped run.
    pub fn find_path<P: AstarPather>(&mut self, pather: &P) -> Result<&[Point], SearchError> {
        match self.state {
            SearchState::Idle => return Err(SearchError::InvalidState("start and end are not set")),
            SearchState::Found | SearchState::Exhausted => {
                return Err(SearchError::InvalidState(
                    "search already finished; set start and end again",
                ));
            }
            SearchState::Ready | SearchState::Running => {}
        }
        self.check_endpoints(pather)?;

        if self.start == self.goal && self.state == SearchState::Ready {
            self.path.clear();
            self.path.push(self.point(self.start));
            self.state = SearchState::Found;
            self.emit(SearchEvent::Found { len: 1, cost: 0 });
            return Ok(&self.path);
        }

        loop {
            match self.step(pather)? {
                Step::Pending => {}
                Step::Found => return Ok(&self.path),
                Step::Exhausted => return Err(SearchError::NoPathFound),
            }
        }
    }

    /// Pop the live open cell with the smallest `(f, seq)`.
    fn pop_open(&mut self) -> Option<usize> {
        while let Some(entry) = self.heap.pop() {
            let n = &self.nodes[entry.idx];
            // Stale: superseded by a cheaper entry, or already closed.
            if n.generation != self.generation || n.status != Status::Open || n.f != entry.f {
                continue;
            }
            return Some(entry.idx);
        }
        None
    }

    fn expand<P: AstarPather>(&mut self, pather: &P, ci: usize) {
        let current_g = self.nodes[ci].g;
        let current_point = self.point(ci);
        let goal_point = self.point(self.goal);
        let cur_gen = self.generation;

        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        pather.neighbors(current_point, &mut nbuf);

        for &np in nbuf.iter() {
            let Some(ni) = self.idx(np) else {
                continue;
            };
            let tentative_g = current_g + i64::from(pather.cost(current_point, np));

            let n = &mut self.nodes[ni];
            if n.generation != cur_gen {
                n.generation = cur_gen;
                n.status = Status::Unvisited;
            }
            let opened = match n.status {
                Status::Closed => continue,
                Status::Open if tentative_g >= n.g => continue,
                Status::Open => false,
                Status::Unvisited => true,
            };

            let h = i64::from(pather.estimate(np, goal_point));
            n.g = tentative_g;
            n.h = h;
            n.f = tentative_g + h;
            n.parent = ci;
            n.status = Status::Open;
            let f = n.f;

            let seq = if opened {
                let seq = self.next_seq();
                self.nodes[ni].seq = seq;
                self.inserted.push(ni);
                seq
            } else {
                self.nodes[ni].seq
            };
            self.heap.push(NodeRef { idx: ni, f, seq });

            let ev = if opened {
                SearchEvent::Opened {
                    pos: np,
                    g: tentative_g,
                    f,
                }
            } else {
                SearchEvent::Improved {
                    pos: np,
                    g: tentative_g,
                    f,
                }
            };
            self.emit(ev);
        }

        self.nbuf = nbuf;
    }

    fn reconstruct_path(&mut self) {
        self.path.clear();
        let mut ci = self.goal;
        while ci != NO_PARENT {
            self.path.push(self.point(ci));
            ci = self.nodes[ci].parent;
        }
        self.path.reverse();
    }

    fn emit(&mut self, ev: SearchEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&ev);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Start cell of the current run.
    pub fn start(&self) -> Option<Point> {
        (self.state != SearchState::Idle).then(|| self.point(self.start))
    }

    /// End cell of the current run.
    pub fn end(&self) -> Option<Point> {
        (self.state != SearchState::Idle).then(|| self.point(self.goal))
    }

    /// Number of [`step`](Self::step) calls taken this run.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Cells currently in the open set, in insertion order.
    pub fn open_set(&self) -> impl Iterator<Item = Point> + '_ {
        self.inserted
            .iter()
            .copied()
            .filter(|&i| self.nodes[i].status == Status::Open)
            .map(|i| self.point(i))
    }

    /// Closed cells, in the order they were finalized.
    pub fn closed_set(&self) -> impl Iterator<Item = Point> + '_ {
        self.closed.iter().map(|&i| self.point(i))
    }

    /// The path from start to end inclusive; empty until found.
    #[inline]
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Total cost of the found path (sum of entered-cell weights).
    pub fn path_cost(&self) -> Option<i64> {
        (self.state == SearchState::Found).then(|| self.nodes[self.goal].g)
    }

    /// Transient fields of `p` in the current run, if it was ever opened.
    pub fn score(&self, p: Point) -> Option<Score> {
        let n = self.live(p)?;
        Some(Score {
            g: n.g,
            h: n.h,
            f: n.f,
            parent: (n.parent != NO_PARENT).then(|| self.point(n.parent)),
        })
    }

    /// Whether `p` is in the open set.
    pub fn is_open(&self, p: Point) -> bool {
        self.live(p).is_some_and(|n| n.status == Status::Open)
    }

    /// Whether `p` is in the closed set.
    pub fn is_closed(&self, p: Point) -> bool {
        self.live(p).is_some_and(|n| n.status == Status::Closed)
    }

    fn live(&self, p: Point) -> Option<&Node> {
        if self.state == SearchState::Idle {
            return None;
        }
        let n = &self.nodes[self.idx(p)?];
        (n.generation == self.generation && n.status != Status::Unvisited).then_some(n)
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Convert a `Point` to a flat index. Returns `None` if out of range.
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if !self.rng.contains(p) {
            return None;
        }
        let x = (p.x - self.rng.min.x) as usize;
        let y = (p.y - self.rng.min.y) as usize;
        Some(y * self.width + x)
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    fn point(&self, idx: usize) -> Point {
        let x = (idx % self.width) as i32 + self.rng.min.x;
        let y = (idx / self.width) as i32 + self.rng.min.y;
        Point::new(x, y)
    }
}
