//! Search traits for [`Grid`]: 4-way movement, entered-cell weights and a
//! Manhattan heuristic.

use pathviz_core::{DEFAULT_WEIGHT, Grid, Point};

use crate::distance::manhattan;
use crate::traits::{AstarPather, Pather, WeightedPather};

impl Pather for Grid {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        buf.extend(Grid::neighbors(self, p));
    }

    fn passable(&self, p: Point) -> bool {
        self.is_passable(p)
    }
}

impl WeightedPather for Grid {
    /// The weight of the cell being entered; `from` does not matter.
    fn cost(&self, _from: Point, to: Point) -> i32 {
        self.weight(to).unwrap_or(DEFAULT_WEIGHT)
    }
}

impl AstarPather for Grid {
    fn estimate(&self, from: Point, to: Point) -> i32 {
        manhattan(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pather_skips_obstacles_and_edges() {
        let mut g = Grid::new(3);
        g.set_obstacle(Point::from_row_col(0, 1), true).unwrap();
        let mut buf = Vec::new();
        Pather::neighbors(&g, Point::from_row_col(0, 0), &mut buf);
        assert_eq!(buf, vec![Point::from_row_col(1, 0)]);
        assert!(!g.passable(Point::from_row_col(0, 1)));
        assert!(!g.passable(Point::from_row_col(3, 3)));
    }

    #[test]
    fn pather_order_matches_grid_neighbors() {
        let mut g = Grid::new(4);
        g.set_obstacle(Point::from_row_col(2, 1), true).unwrap();
        for p in g.bounds() {
            let mut buf = Vec::new();
            Pather::neighbors(&g, p, &mut buf);
            assert_eq!(buf, Grid::neighbors(&g, p).collect::<Vec<_>>());
        }
        let mut buf = Vec::new();
        Pather::neighbors(&g, Point::from_row_col(1, 1), &mut buf);
        assert_eq!(
            buf,
            vec![
                Point::from_row_col(0, 1),
                Point::from_row_col(1, 2),
                Point::from_row_col(1, 0),
            ]
        );
    }

    #[test]
    fn cost_is_entered_cell_weight() {
        let mut g = Grid::new(3);
        g.set_weight(Point::from_row_col(1, 1), 6).unwrap();
        let from = Point::from_row_col(0, 1);
        assert_eq!(g.cost(from, Point::from_row_col(1, 1)), 6);
        assert_eq!(g.cost(Point::from_row_col(1, 1), from), 1);
        assert_eq!(
            g.estimate(Point::from_row_col(0, 0), Point::from_row_col(2, 2)),
            4
        );
    }
}
