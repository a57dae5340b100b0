//! WASM binding for **pathviz**.
//!
//! [`Visualizer`] owns one [`Grid`] and one [`SearchEngine`] and exposes the
//! operations a browser UI needs: painting cells, placing endpoints, stepping
//! the search once per animation tick and reading back the open set, closed
//! set and path for drawing.
//!
//! Positions cross the boundary as flat `[row, col, row, col, ...]` arrays
//! (`Int32Array` on the JS side). Errors become JS strings built from their
//! `Display` text.
//!
//! # Quick start
//!
//! ```html
//! <script type="module">
//!   import init, { Visualizer, init_logging, speed_delay } from './pkg/pathviz_web.js';
//!   await init();
//!   init_logging("debug");
//!   const vis = new Visualizer(20);
//!   vis.set_obstacle(3, 4, true);
//!   vis.set_start_and_end(0, 0, 19, 19);
//!   const tick = () => {
//!     const status = vis.step();
//!     draw(vis.open_set(), vis.closed_set(), vis.path());
//!     if (status === "pending") setTimeout(tick, speed_delay("fast"));
//!   };
//!   tick();
//! </script>
//! ```

use std::fmt::Display;

use log::{Level, LevelFilter, Log, Metadata, Record, debug};
use pathviz_core::{Grid, GridConfig, Point};
use pathviz_paths::{SearchEngine, SearchState, Speed, Step};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_err(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Flatten points to `[row, col, ...]`.
fn flatten(points: impl IntoIterator<Item = Point>) -> Vec<i32> {
    points
        .into_iter()
        .flat_map(|p| [p.row(), p.col()])
        .collect()
}

fn step_status(step: Step) -> &'static str {
    match step {
        Step::Pending => "pending",
        Step::Found => "found",
        Step::Exhausted => "exhausted",
    }
}

fn state_name(state: SearchState) -> &'static str {
    match state {
        SearchState::Idle => "idle",
        SearchState::Ready => "ready",
        SearchState::Running => "running",
        SearchState::Found => "found",
        SearchState::Exhausted => "exhausted",
    }
}

// ---------------------------------------------------------------------------
// Console logger
// ---------------------------------------------------------------------------

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&msg),
            Level::Warn => web_sys::console::warn_1(&msg),
            Level::Info => web_sys::console::info_1(&msg),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

/// Route `log` output to the browser console.
///
/// `level` is one of `error`, `warn`, `info`, `debug`, `trace` or `off`.
/// Calling it again only changes the level.
#[wasm_bindgen]
pub fn init_logging(level: &str) -> Result<(), JsValue> {
    let filter: LevelFilter = level.parse().map_err(js_err)?;
    // A second call finds the logger already installed.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(filter);
    Ok(())
}

// ---------------------------------------------------------------------------
// Visualizer
// ---------------------------------------------------------------------------

/// A grid plus the search running on it.
#[wasm_bindgen]
pub struct Visualizer {
    grid: Grid,
    engine: SearchEngine,
}

#[wasm_bindgen]
impl Visualizer {
    /// A `size`×`size` grid of plain cells with an idle search.
    #[wasm_bindgen(constructor)]
    pub fn new(size: i32) -> Visualizer {
        let grid = Grid::new(size);
        let engine = SearchEngine::for_grid(&grid);
        Visualizer { grid, engine }
    }

    /// Current side length.
    pub fn size(&self) -> i32 {
        self.grid.size()
    }

    pub fn is_obstacle(&self, row: i32, col: i32) -> bool {
        self.grid
            .at(Point::from_row_col(row, col))
            .is_some_and(|c| c.obstacle)
    }

    /// Weight of a cell, 0 when out of range.
    pub fn weight(&self, row: i32, col: i32) -> i32 {
        self.grid
            .weight(Point::from_row_col(row, col))
            .unwrap_or_default()
    }

    pub fn set_obstacle(&mut self, row: i32, col: i32, obstacle: bool) -> Result<(), JsValue> {
        self.grid
            .set_obstacle(Point::from_row_col(row, col), obstacle)
            .map_err(js_err)
    }

    pub fn set_weight(&mut self, row: i32, col: i32, weight: i32) -> Result<(), JsValue> {
        self.grid
            .set_weight(Point::from_row_col(row, col), weight)
            .map_err(js_err)
    }

    /// Resize the grid, keeping overlapping cells. The search goes idle.
    pub fn resize(&mut self, size: i32) {
        self.grid.resize(size);
        self.engine.set_range(self.grid.bounds());
    }

    /// Reset every cell to default and drop the current search.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.engine.reset();
    }

    /// Start a new run between two cells.
    pub fn set_start_and_end(
        &mut self,
        start_row: i32,
        start_col: i32,
        end_row: i32,
        end_col: i32,
    ) -> Result<(), JsValue> {
        let start = Point::from_row_col(start_row, start_col);
        let end = Point::from_row_col(end_row, end_col);
        self.engine
            .set_start_and_end(&self.grid, start, end)
            .map_err(js_err)
    }

    /// Advance the run by one expansion.
    ///
    /// Returns `"pending"`, `"found"` or `"exhausted"`.
    pub fn step(&mut self) -> Result<String, JsValue> {
        let step = self.engine.step(&self.grid).map_err(js_err)?;
        Ok(step_status(step).to_string())
    }

    /// Run to completion and return the path as `[row, col, ...]`.
    pub fn find_path(&mut self) -> Result<Vec<i32>, JsValue> {
        let path = self.engine.find_path(&self.grid).map_err(js_err)?;
        Ok(flatten(path.iter().copied()))
    }

    /// Drop the current run.
    pub fn reset(&mut self) {
        self.engine.reset();
    }

    /// `"idle"`, `"ready"`, `"running"`, `"found"` or `"exhausted"`.
    pub fn state(&self) -> String {
        state_name(self.engine.state()).to_string()
    }

    pub fn steps(&self) -> usize {
        self.engine.steps()
    }

    pub fn open_set(&self) -> Vec<i32> {
        flatten(self.engine.open_set())
    }

    pub fn closed_set(&self) -> Vec<i32> {
        flatten(self.engine.closed_set())
    }

    pub fn path(&self) -> Vec<i32> {
        flatten(self.engine.path().iter().copied())
    }

    /// Path cost once found, `undefined` otherwise.
    ///
    /// Returned as a JS number; exact up to 2^53.
    pub fn path_cost(&self) -> Option<f64> {
        self.engine.path_cost().map(|c| c as f64)
    }

    /// Transient fields of a cell as JSON
    /// (`{"g":..,"h":..,"f":..,"parent":[row,col]|null}`), `undefined` when
    /// the cell is not part of the current run.
    pub fn score(&self, row: i32, col: i32) -> Option<String> {
        let score = self.engine.score(Point::from_row_col(row, col))?;
        let parent = score.parent.map(|p| [p.row(), p.col()]);
        Some(
            serde_json::json!({
                "g": score.g,
                "h": score.h,
                "f": score.f,
                "parent": parent,
            })
            .to_string(),
        )
    }

    /// Sparse JSON configuration, including the current endpoints if a run
    /// is set up.
    pub fn export_config(&self) -> Result<String, JsValue> {
        self.grid
            .export_config()
            .with_endpoints(self.engine.start(), self.engine.end())
            .to_json()
            .map_err(js_err)
    }

    /// Apply a JSON configuration.
    ///
    /// Returns the stored endpoints as `[startRow, startCol, endRow, endCol]`
    /// when both are present, otherwise an empty array; placing them is left
    /// to the caller. The search goes idle.
    pub fn import_config(&mut self, json: &str) -> Result<Vec<i32>, JsValue> {
        let config = GridConfig::from_json(json).map_err(js_err)?;
        self.grid.import_config(&config).map_err(js_err)?;
        self.engine.set_range(self.grid.bounds());
        debug!("visualizer imported a {0}x{0} layout", config.size);
        Ok(match config.endpoints() {
            (Some(start), Some(end)) => flatten([start, end]),
            _ => Vec::new(),
        })
    }
}

/// Delay in milliseconds for a speed preset name.
#[wasm_bindgen]
pub fn speed_delay(name: &str) -> Result<u32, JsValue> {
    let speed: Speed = name.parse().map_err(js_err)?;
    Ok(speed.delay().as_millis() as u32)
}
