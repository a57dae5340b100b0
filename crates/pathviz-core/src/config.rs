//! Sparse grid configuration: import and export.
//!
//! A [`GridConfig`] lists only the cells that differ from the default, so its
//! size is proportional to the painted cells rather than the grid area. With
//! the `serde` feature enabled it (de)serializes to the JSON layout
//!
//! ```json
//! {
//!   "size": 5,
//!   "nodes": [{ "row": 1, "col": 2, "isObstacle": true, "weight": 1 }],
//!   "startPosition": { "row": 0, "col": 0 },
//!   "endPosition": null
//! }
//! ```

use log::{debug, warn};

use crate::cell::Cell;
use crate::error::GridError;
use crate::geom::Point;
use crate::grid::Grid;

/// A `(row, col)` pair as it appears in serialized configurations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl From<Point> for Position {
    fn from(p: Point) -> Self {
        Self {
            row: p.row(),
            col: p.col(),
        }
    }
}

impl From<Position> for Point {
    fn from(pos: Position) -> Self {
        Point::from_row_col(pos.row, pos.col)
    }
}

/// One non-default cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct NodeConfig {
    pub row: i32,
    pub col: i32,
    pub is_obstacle: bool,
    pub weight: i32,
}

impl NodeConfig {
    /// Position of the described cell.
    #[inline]
    pub fn pos(&self) -> Point {
        Point::from_row_col(self.row, self.col)
    }

    /// The described cell value.
    #[inline]
    pub fn cell(&self) -> Cell {
        Cell {
            obstacle: self.is_obstacle,
            weight: self.weight,
        }
    }
}

/// Sparse description of a grid plus optional caller-owned endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct GridConfig {
    pub size: i32,
    pub nodes: Vec<NodeConfig>,
    pub start_position: Option<Position>,
    pub end_position: Option<Position>,
}

impl GridConfig {
    /// Attach start/end positions (builder).
    pub fn with_endpoints(mut self, start: Option<Point>, end: Option<Point>) -> Self {
        self.start_position = start.map(Position::from);
        self.end_position = end.map(Position::from);
        self
    }

    /// The stored start/end positions as points.
    pub fn endpoints(&self) -> (Option<Point>, Option<Point>) {
        (
            self.start_position.map(Point::from),
            self.end_position.map(Point::from),
        )
    }

    /// Check the payload without applying it.
    ///
    /// The size must be positive, and every node must lie inside the grid and
    /// carry a weight ≥ 1.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.size < 1 {
            return Err(GridError::InvalidConfig(format!(
                "size must be positive, got {}",
                self.size
            )));
        }
        for node in &self.nodes {
            if node.row < 0 || node.col < 0 || node.row >= self.size || node.col >= self.size {
                return Err(GridError::InvalidConfig(format!(
                    "node {} lies outside the {}x{} grid",
                    node.pos(),
                    self.size,
                    self.size
                )));
            }
            if node.weight < 1 {
                return Err(GridError::InvalidConfig(format!(
                    "node {} has weight {}",
                    node.pos(),
                    node.weight
                )));
            }
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl GridConfig {
    /// Parse a configuration from JSON.
    ///
    /// A payload without a usable `size` or `nodes` list is rejected with
    /// [`GridError::InvalidConfig`].
    pub fn from_json(s: &str) -> Result<Self, GridError> {
        let config: GridConfig =
            serde_json::from_str(s).map_err(|e| GridError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String, GridError> {
        serde_json::to_string(self).map_err(|e| GridError::InvalidConfig(e.to_string()))
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, GridError> {
        serde_json::to_string_pretty(self).map_err(|e| GridError::InvalidConfig(e.to_string()))
    }
}

impl Grid {
    /// Build a fresh grid from a configuration.
    pub fn from_config(config: &GridConfig) -> Result<Self, GridError> {
        let mut grid = Grid::default();
        grid.import_config(config)?;
        Ok(grid)
    }

    /// Export the sparse configuration of this grid.
    ///
    /// Endpoints are left unset; attach them with
    /// [`GridConfig::with_endpoints`].
    pub fn export_config(&self) -> GridConfig {
        GridConfig {
            size: self.size(),
            nodes: self
                .modified()
                .map(|(p, c)| NodeConfig {
                    row: p.row(),
                    col: p.col(),
                    is_obstacle: c.obstacle,
                    weight: c.weight,
                })
                .collect(),
            start_position: None,
            end_position: None,
        }
    }

    /// Apply a configuration to this grid.
    ///
    /// The grid is resized to the configured size (overlapping cells keep
    /// their state, as with [`Grid::resize`]) and every listed node is then
    /// written. The payload is validated first; on error the grid is left
    /// untouched.
    pub fn import_config(&mut self, config: &GridConfig) -> Result<(), GridError> {
        if let Err(err) = config.validate() {
            warn!("rejected grid config: {err}");
            return Err(err);
        }
        self.resize(config.size);
        for node in &config.nodes {
            self.set(node.pos(), node.cell())?;
        }
        debug!(
            "imported {}x{} config with {} nodes",
            config.size,
            config.size,
            config.nodes.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rc(row: i32, col: i32) -> Point {
        Point::from_row_col(row, col)
    }

    fn painted() -> Grid {
        let mut g = Grid::new(4);
        g.set_obstacle(rc(0, 3), true).unwrap();
        g.set_weight(rc(2, 1), 5).unwrap();
        g.set(rc(3, 3), Cell::WALL.with_weight(2)).unwrap();
        g
    }

    #[test]
    fn export_is_sparse_and_row_major() {
        let cfg = painted().export_config();
        assert_eq!(cfg.size, 4);
        assert_eq!(
            cfg.nodes,
            vec![
                NodeConfig {
                    row: 0,
                    col: 3,
                    is_obstacle: true,
                    weight: 1
                },
                NodeConfig {
                    row: 2,
                    col: 1,
                    is_obstacle: false,
                    weight: 5
                },
                NodeConfig {
                    row: 3,
                    col: 3,
                    is_obstacle: true,
                    weight: 2
                },
            ]
        );
        assert_eq!(cfg.endpoints(), (None, None));
    }

    #[test]
    fn export_of_empty_grid_has_no_nodes() {
        let cfg = Grid::new(50).export_config();
        assert_eq!(cfg.size, 50);
        assert!(cfg.nodes.is_empty());
    }

    #[test]
    fn import_into_fresh_grid_round_trips() {
        let g = painted();
        let back = Grid::from_config(&g.export_config()).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn import_onto_same_grid_is_identity() {
        let mut g = painted();
        let cfg = g.export_config();
        g.import_config(&cfg).unwrap();
        assert_eq!(g, painted());
    }

    #[test]
    fn import_resizes_and_keeps_overlap() {
        let mut g = Grid::new(2);
        g.set_weight(rc(0, 0), 3).unwrap();
        let cfg = GridConfig {
            size: 3,
            nodes: vec![NodeConfig {
                row: 2,
                col: 2,
                is_obstacle: true,
                weight: 1,
            }],
            ..Default::default()
        };
        g.import_config(&cfg).unwrap();
        assert_eq!(g.size(), 3);
        assert_eq!(g.weight(rc(0, 0)), Some(3));
        assert!(!g.is_passable(rc(2, 2)));
    }

    #[test]
    fn invalid_configs_leave_grid_untouched() {
        let mut g = painted();
        let bad_size = GridConfig {
            size: 0,
            ..Default::default()
        };
        assert!(matches!(
            g.import_config(&bad_size),
            Err(GridError::InvalidConfig(_))
        ));

        let out_of_bounds = GridConfig {
            size: 2,
            nodes: vec![NodeConfig {
                row: 2,
                col: 0,
                is_obstacle: true,
                weight: 1,
            }],
            ..Default::default()
        };
        assert!(g.import_config(&out_of_bounds).is_err());

        let zero_weight = GridConfig {
            size: 4,
            nodes: vec![NodeConfig {
                row: 1,
                col: 1,
                is_obstacle: false,
                weight: 0,
            }],
            ..Default::default()
        };
        assert!(g.import_config(&zero_weight).is_err());
        assert_eq!(g, painted());
    }

    #[test]
    fn endpoints_round_trip() {
        let cfg = Grid::new(3)
            .export_config()
            .with_endpoints(Some(rc(0, 1)), Some(rc(2, 2)));
        assert_eq!(cfg.start_position, Some(Position { row: 0, col: 1 }));
        assert_eq!(cfg.endpoints(), (Some(rc(0, 1)), Some(rc(2, 2))));
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn json_field_names() {
        let mut g = Grid::new(3);
        g.set_weight(Point::from_row_col(1, 2), 4).unwrap();
        let cfg = g
            .export_config()
            .with_endpoints(Some(Point::from_row_col(0, 0)), None);
        let v: serde_json::Value = serde_json::from_str(&cfg.to_json().unwrap()).unwrap();
        assert_eq!(v["size"], 3);
        assert_eq!(v["nodes"][0]["row"], 1);
        assert_eq!(v["nodes"][0]["col"], 2);
        assert_eq!(v["nodes"][0]["isObstacle"], false);
        assert_eq!(v["nodes"][0]["weight"], 4);
        assert_eq!(v["startPosition"]["row"], 0);
        assert!(v["endPosition"].is_null());
    }

    #[test]
    fn parse_without_endpoints() {
        let cfg = GridConfig::from_json(
            r#"{"size": 4, "nodes": [{"row": 0, "col": 1, "isObstacle": true, "weight": 1}]}"#,
        )
        .unwrap();
        assert_eq!(cfg.size, 4);
        assert_eq!(cfg.nodes.len(), 1);
        assert_eq!(cfg.endpoints(), (None, None));
    }

    #[test]
    fn missing_size_or_nodes_is_invalid() {
        assert!(matches!(
            GridConfig::from_json(r#"{"nodes": []}"#),
            Err(GridError::InvalidConfig(_))
        ));
        assert!(matches!(
            GridConfig::from_json(r#"{"size": 5}"#),
            Err(GridError::InvalidConfig(_))
        ));
        assert!(matches!(
            GridConfig::from_json("not json"),
            Err(GridError::InvalidConfig(_))
        ));
        assert!(matches!(
            GridConfig::from_json(r#"{"size": -2, "nodes": []}"#),
            Err(GridError::InvalidConfig(_))
        ));
    }

    #[test]
    fn json_round_trip() {
        let mut g = Grid::new(6);
        g.set_obstacle(Point::from_row_col(5, 0), true).unwrap();
        g.set_weight(Point::from_row_col(2, 3), 9).unwrap();
        let json = g.export_config().to_json_pretty().unwrap();
        let back = Grid::from_config(&GridConfig::from_json(&json).unwrap()).unwrap();
        assert_eq!(back, g);
    }
}
