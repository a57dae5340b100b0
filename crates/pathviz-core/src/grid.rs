//! The [`Grid`] type: an owned square grid of [`Cell`]s.
//!
//! The grid is the sole owner of cell state. It knows nothing about start or
//! end designations or search bookkeeping: those belong to the caller and to
//! the search engine respectively.

use log::debug;

use crate::cell::Cell;
use crate::error::GridError;
use crate::geom::{Point, Range};

/// A `size`×`size` grid of [`Cell`]s stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    size: i32,
}

impl Grid {
    /// Create a new grid of `size`×`size` default cells.
    ///
    /// Negative sizes are treated as zero.
    pub fn new(size: i32) -> Self {
        let size = size.max(0);
        Self {
            cells: vec![Cell::default(); (size as usize) * (size as usize)],
            size,
        }
    }

    /// Side length of the grid.
    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    /// The bounding range of this grid.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::square(self.size)
    }

    /// Whether `p` is inside this grid's bounds.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if self.contains(p) {
            Some((p.y as usize) * (self.size as usize) + (p.x as usize))
        } else {
            None
        }
    }

    fn check(&self, p: Point) -> Result<usize, GridError> {
        self.index(p).ok_or(GridError::InvalidCoordinate {
            pos: p,
            size: self.size,
        })
    }

    /// Read the cell at `p`. Returns `None` if `p` is outside bounds.
    #[inline]
    pub fn at(&self, p: Point) -> Option<Cell> {
        self.index(p).map(|i| self.cells[i])
    }

    /// Whether `p` is inside the grid and not an obstacle.
    #[inline]
    pub fn is_passable(&self, p: Point) -> bool {
        self.at(p).is_some_and(Cell::is_passable)
    }

    /// Weight of the cell at `p`, or `None` if outside bounds.
    #[inline]
    pub fn weight(&self, p: Point) -> Option<i32> {
        self.at(p).map(|c| c.weight)
    }

    /// Replace the whole cell at `p`.
    pub fn set(&mut self, p: Point, cell: Cell) -> Result<(), GridError> {
        if cell.weight < 1 {
            return Err(GridError::InvalidWeight(cell.weight));
        }
        let i = self.check(p)?;
        self.cells[i] = cell;
        Ok(())
    }

    /// Mark or unmark the cell at `p` as an obstacle.
    pub fn set_obstacle(&mut self, p: Point, obstacle: bool) -> Result<(), GridError> {
        let i = self.check(p)?;
        self.cells[i].obstacle = obstacle;
        Ok(())
    }

    /// Set the cost of entering the cell at `p`. `weight` must be ≥ 1.
    pub fn set_weight(&mut self, p: Point, weight: i32) -> Result<(), GridError> {
        if weight < 1 {
            return Err(GridError::InvalidWeight(weight));
        }
        let i = self.check(p)?;
        self.cells[i].weight = weight;
        Ok(())
    }

    /// Passable orthogonal neighbours of `p`, in the order up, right, down,
    /// left. Out-of-bounds positions and obstacles are skipped.
    pub fn neighbors(&self, p: Point) -> impl Iterator<Item = Point> + '_ {
        p.neighbors_4()
            .into_iter()
            .filter(move |&n| self.is_passable(n))
    }

    /// Change the side length to `new_size`.
    ///
    /// Cells at coordinates valid in both the old and new grid keep their
    /// obstacle flag and weight; new cells are default.
    pub fn resize(&mut self, new_size: i32) {
        let new_size = new_size.max(0);
        if new_size == self.size {
            return;
        }
        let mut resized = Grid::new(new_size);
        let overlap = self.bounds().intersect(resized.bounds());
        for p in overlap {
            if let (Some(src), Some(dst)) = (self.index(p), resized.index(p)) {
                resized.cells[dst] = self.cells[src];
            }
        }
        debug!("grid resized from {} to {}", self.size, new_size);
        *self = resized;
    }

    /// Reset every cell to default, keeping the size.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Number of cells that differ from the default.
    pub fn modified_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_default()).count()
    }

    /// Row-major iterator over `(Point, Cell)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        self.bounds().iter().zip(self.cells.iter().copied())
    }

    /// Row-major iterator over the non-default cells only.
    pub fn modified(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        self.iter().filter(|(_, c)| !c.is_default())
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(0)
    }
}
