//! Shared pieces of the `pathviz` command-line driver.
//!
//! Demonstrates: named layout books, random layout generation, driving the
//! search step by step under an external step budget, and a text rendering
//! of the grid with the open set, closed set and path overlaid.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, eyre};
use log::{debug, info};
use pathviz_core::{Cell, Grid, GridConfig, GridError, Point};
use pathviz_paths::{SearchEngine, SearchError, Step};
use rand::{RngExt, SeedableRng};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Layout book
// ---------------------------------------------------------------------------

/// Named grid configurations, persisted as a single JSON object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutBook {
    layouts: BTreeMap<String, GridConfig>,
}

impl LayoutBook {
    /// Read a book from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("reading layout book {}", path.display()))?;
        Self::from_json(&text).wrap_err_with(|| format!("parsing layout book {}", path.display()))
    }

    /// Read a book from `path`, or start an empty one if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("no layout book at {}, starting empty", path.display());
            Ok(Self::default())
        }
    }

    /// Parse a book and validate every layout in it.
    pub fn from_json(text: &str) -> Result<Self> {
        let book: LayoutBook = serde_json::from_str(text)?;
        for (name, config) in &book.layouts {
            config
                .validate()
                .wrap_err_with(|| format!("layout `{name}`"))?;
        }
        Ok(book)
    }

    /// Write the book to `path` as indented JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).wrap_err_with(|| format!("writing layout book {}", path.display()))
    }

    /// Look up a layout by name.
    pub fn get(&self, name: &str) -> Option<&GridConfig> {
        self.layouts.get(name)
    }

    /// Store (or replace) a layout.
    pub fn insert(&mut self, name: impl Into<String>, config: GridConfig) {
        self.layouts.insert(name.into(), config);
    }

    /// Remove a layout, returning it if present.
    pub fn remove(&mut self, name: &str) -> Option<GridConfig> {
        self.layouts.remove(name)
    }

    /// Layouts in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GridConfig)> {
        self.layouts.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Parameters for [`generate`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GenParams {
    pub size: i32,
    /// Chance that a cell becomes an obstacle.
    pub density: f64,
    /// Upper bound (inclusive) for random weights; 1 disables weights.
    pub max_weight: i32,
    pub seed: u64,
}

/// Paint a random layout. Identical parameters give identical grids.
pub fn generate(params: GenParams) -> Result<Grid, GridError> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(params.seed);
    let mut grid = Grid::new(params.size);
    let density = params.density.clamp(0.0, 1.0);
    let max_weight = params.max_weight.max(1);
    for p in grid.bounds() {
        let obstacle = rng.random_bool(density);
        let weight = if max_weight > 1 {
            rng.random_range(1..=max_weight)
        } else {
            1
        };
        grid.set(p, Cell::weighted(weight).with_obstacle(obstacle))?;
    }
    info!(
        "generated {}x{} layout with {} painted cells (seed {})",
        params.size,
        params.size,
        grid.modified_count(),
        params.seed
    );
    Ok(grid)
}

// ---------------------------------------------------------------------------
// Driving
// ---------------------------------------------------------------------------

/// How a budgeted run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Path found with the given cost.
    Found { cost: i64 },
    /// Open set exhausted: the end is unreachable.
    NoPath,
    /// The step budget ran out before the search finished.
    BudgetExceeded { steps: usize },
}

/// Step `engine` until it finishes or `max_steps` steps have been taken,
/// calling `on_step` after every step.
///
/// Running out of budget is reported as [`Outcome::BudgetExceeded`], not as a
/// missing path.
pub fn drive(
    engine: &mut SearchEngine,
    grid: &Grid,
    max_steps: Option<usize>,
    mut on_step: impl FnMut(&SearchEngine),
) -> Result<Outcome, SearchError> {
    if engine.start() == engine.end() && engine.steps() == 0 {
        // Degenerate run: no stepping needed.
        engine.find_path(grid)?;
        on_step(engine);
        return Ok(Outcome::Found { cost: 0 });
    }
    loop {
        if max_steps.is_some_and(|max| engine.steps() >= max) {
            return Ok(Outcome::BudgetExceeded {
                steps: engine.steps(),
            });
        }
        let step = engine.step(grid)?;
        on_step(engine);
        match step {
            Step::Pending => {}
            Step::Found => {
                return Ok(Outcome::Found {
                    cost: engine.path_cost().unwrap_or_default(),
                });
            }
            Step::Exhausted => return Ok(Outcome::NoPath),
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the grid with search state overlaid, one line per row.
///
/// `S`/`E` endpoints, `*` path, `x` closed, `o` open, `#` obstacle,
/// `2`–`9` weights (`+` above 9), `.` plain cell.
pub fn render(grid: &Grid, engine: &SearchEngine) -> String {
    let size = grid.size().max(0) as usize;
    let mut out = String::with_capacity(size * (size + 1));
    for (p, cell) in grid.iter() {
        let ch = if engine.start() == Some(p) {
            'S'
        } else if engine.end() == Some(p) {
            'E'
        } else if engine.path().contains(&p) {
            '*'
        } else if engine.is_closed(p) {
            'x'
        } else if engine.is_open(p) {
            'o'
        } else {
            cell_char(cell)
        };
        out.push(ch);
        if p.col() == grid.size() - 1 {
            out.push('\n');
        }
    }
    out
}

fn cell_char(cell: Cell) -> char {
    if cell.obstacle {
        '#'
    } else if cell.weight == 1 {
        '.'
    } else if cell.weight <= 9 {
        char::from_digit(cell.weight as u32, 10).unwrap_or('+')
    } else {
        '+'
    }
}

// ---------------------------------------------------------------------------
// Argument helpers
// ---------------------------------------------------------------------------

/// Parse a `row,col` pair.
pub fn parse_point(s: &str) -> Result<Point, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `row,col`, got `{s}`"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|e| format!("bad row `{row}`: {e}"))?;
    let col = col
        .trim()
        .parse()
        .map_err(|e| format!("bad column `{col}`: {e}"))?;
    Ok(Point::from_row_col(row, col))
}

/// Resolve endpoints: explicit overrides win over the layout's stored ones.
pub fn endpoints(
    config: &GridConfig,
    start: Option<Point>,
    end: Option<Point>,
) -> Result<(Point, Point)> {
    let (stored_start, stored_end) = config.endpoints();
    let start = start
        .or(stored_start)
        .ok_or_else(|| eyre!("no start position: pass --start row,col"))?;
    let end = end
        .or(stored_end)
        .ok_or_else(|| eyre!("no end position: pass --end row,col"))?;
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rc(row: i32, col: i32) -> Point {
        Point::from_row_col(row, col)
    }

    #[test]
    fn parse_point_variants() {
        assert_eq!(parse_point("2,3"), Ok(rc(2, 3)));
        assert_eq!(parse_point(" 0 , 4 "), Ok(rc(0, 4)));
        assert!(parse_point("23").is_err());
        assert!(parse_point("a,1").is_err());
    }

    #[test]
    fn book_json_round_trip() {
        let mut book = LayoutBook::default();
        let mut grid = Grid::new(4);
        grid.set_obstacle(rc(1, 1), true).unwrap();
        book.insert(
            "walls",
            grid.export_config()
                .with_endpoints(Some(rc(0, 0)), Some(rc(3, 3))),
        );
        book.insert("empty", Grid::new(2).export_config());

        let text = serde_json::to_string(&book).unwrap();
        let back = LayoutBook::from_json(&text).unwrap();
        assert_eq!(back, book);
        let names: Vec<&str> = back.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["empty", "walls"]);
    }

    #[test]
    fn book_rejects_invalid_layout() {
        let text = r#"{"bad": {"size": 0, "nodes": []}}"#;
        assert!(LayoutBook::from_json(text).is_err());
    }

    #[test]
    fn generate_is_seeded() {
        let params = GenParams {
            size: 8,
            density: 0.3,
            max_weight: 4,
            seed: 7,
        };
        assert_eq!(generate(params).unwrap(), generate(params).unwrap());
        let flat = generate(GenParams {
            density: 0.0,
            max_weight: 1,
            ..params
        })
        .unwrap();
        assert_eq!(flat.modified_count(), 0);
        assert_eq!(flat.size(), 8);
    }

    #[test]
    fn endpoints_prefer_overrides() {
        let config = Grid::new(3)
            .export_config()
            .with_endpoints(Some(rc(0, 0)), Some(rc(2, 2)));
        assert_eq!(
            endpoints(&config, None, Some(rc(1, 1))).unwrap(),
            (rc(0, 0), rc(1, 1))
        );
        let bare = Grid::new(3).export_config();
        assert!(endpoints(&bare, Some(rc(0, 0)), None).is_err());
    }

    #[test]
    fn drive_with_budget() {
        let grid = Grid::new(6);
        let mut engine = SearchEngine::for_grid(&grid);
        engine.set_start_and_end(&grid, rc(0, 0), rc(5, 5)).unwrap();
        let mut ticks = 0;
        let outcome = drive(&mut engine, &grid, Some(3), |_| ticks += 1).unwrap();
        assert_eq!(outcome, Outcome::BudgetExceeded { steps: 3 });
        assert_eq!(ticks, 3);

        let outcome = drive(&mut engine, &grid, None, |_| {}).unwrap();
        assert_eq!(outcome, Outcome::Found { cost: 10 });
    }

    #[test]
    fn drive_reports_unreachable_and_degenerate() {
        let mut grid = Grid::new(3);
        grid.set_obstacle(rc(0, 1), true).unwrap();
        grid.set_obstacle(rc(1, 0), true).unwrap();
        let mut engine = SearchEngine::for_grid(&grid);
        engine.set_start_and_end(&grid, rc(0, 0), rc(2, 2)).unwrap();
        assert_eq!(drive(&mut engine, &grid, None, |_| {}), Ok(Outcome::NoPath));

        engine.set_start_and_end(&grid, rc(2, 2), rc(2, 2)).unwrap();
        assert_eq!(
            drive(&mut engine, &grid, Some(0), |_| {}),
            Ok(Outcome::Found { cost: 0 })
        );
        assert_eq!(engine.steps(), 0);
    }

    #[test]
    fn render_overlays_search_state() {
        let mut grid = Grid::new(3);
        grid.set_obstacle(rc(1, 1), true).unwrap();
        grid.set_weight(rc(2, 0), 5).unwrap();
        let mut engine = SearchEngine::for_grid(&grid);
        assert_eq!(render(&grid, &engine), "...\n.#.\n5..\n");

        engine.set_start_and_end(&grid, rc(0, 0), rc(0, 2)).unwrap();
        engine.find_path(&grid).unwrap();
        assert_eq!(render(&grid, &engine), "S*E\no#.\n5..\n");
    }
}
