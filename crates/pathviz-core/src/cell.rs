//! The [`Cell`] type: one square of the search grid.

/// Weight of an unmodified cell.
pub const DEFAULT_WEIGHT: i32 = 1;

/// A grid cell: an obstacle flag plus the cost of entering it.
///
/// `weight` is always ≥ 1 for cells stored in a [`Grid`](crate::Grid); the
/// grid rejects writes that would break that.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub obstacle: bool,
    pub weight: i32,
}

impl Cell {
    /// An open cell with the given weight.
    #[inline]
    pub const fn weighted(weight: i32) -> Self {
        Self {
            obstacle: false,
            weight,
        }
    }

    /// An obstacle cell with default weight.
    pub const WALL: Self = Self {
        obstacle: true,
        weight: DEFAULT_WEIGHT,
    };

    /// Set the obstacle flag (builder).
    #[inline]
    pub const fn with_obstacle(mut self, obstacle: bool) -> Self {
        self.obstacle = obstacle;
        self
    }

    /// Set the weight (builder).
    #[inline]
    pub const fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Whether the cell can be walked through.
    #[inline]
    pub const fn is_passable(self) -> bool {
        !self.obstacle
    }

    /// Whether the cell equals the default (open, weight 1).
    #[inline]
    pub const fn is_default(self) -> bool {
        !self.obstacle && self.weight == DEFAULT_WEIGHT
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self {
            obstacle: false,
            weight: DEFAULT_WEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cell() {
        let c = Cell::default();
        assert!(c.is_default());
        assert!(c.is_passable());
        assert_eq!(c.weight, 1);
    }

    #[test]
    fn builders() {
        let c = Cell::default().with_weight(4);
        assert!(!c.is_default());
        assert_eq!(c, Cell::weighted(4));
        let w = c.with_obstacle(true);
        assert!(!w.is_passable());
        assert_eq!(w.weight, 4);
        assert!(!Cell::WALL.is_default());
    }
}
