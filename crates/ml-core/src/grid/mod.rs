//! Rectangular cell grid with precomputed neighbor tables.
//!
//! Width and height are always odd and at least [`MIN_GRID_SIDE`]: the maze
//! lattice keeps even coordinates wall-only, so an even dimension would leave
//! a navigable column or row flush against the border. Neighbor stepping is
//! done through explicit `(dx, dy)` coordinate math with bounds checks, in
//! the 4- and 8-direction orders the generator's scans rely on.

mod cell;

pub use cell::{Cell, CellFlags, CellKind};
pub(crate) use cell::tags;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::MIN_GRID_SIDE;
use crate::errors::GridError;

/// Cardinal direction offsets, in generator scan order.
pub const OFFSETS4: [(i32, i32); 4] = [
    (1, 0),  // right
    (0, -1), // up
    (-1, 0), // left
    (0, 1),  // down
];

/// All 8 neighbor offsets, counter-clockwise from east.
pub const OFFSETS8: [(i32, i32); 8] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Cardinal movement direction. Index order matches [`OFFSETS4`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(usize)]
pub enum Direction {
    Right = 0,
    Up = 1,
    Left = 2,
    Down = 3,
}

impl Direction {
    /// The `(dx, dy)` step for this direction.
    pub const fn offset(self) -> (i32, i32) {
        OFFSETS4[self as usize]
    }

    /// Index into the 4-direction tables.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Round up to the next odd value.
const fn make_odd(v: i32) -> i32 {
    v | 1
}

/// A fixed-size grid of cells, flat row-major storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    bonus: u32,
}

impl Grid {
    /// Allocate a grid, rounding each requested dimension up to the next odd
    /// value with a floor of [`MIN_GRID_SIDE`]. Every cell starts unvisited
    /// and invisible.
    pub fn new(width: i32, height: i32) -> Self {
        let width = make_odd(width.max(MIN_GRID_SIDE));
        let height = make_odd(height.max(MIN_GRID_SIDE));
        let size = (width * height) as usize;

        let mut cells = Vec::with_capacity(size);
        for index in 0..size as i32 {
            cells.push(Cell::new(index % width, index / width));
        }

        Self {
            width,
            height,
            cells,
            bonus: 0,
        }
    }

    /// Grid width (always odd, >= 7).
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Grid height (always odd, >= 7).
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Total cell count.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True only for an impossible zero-size grid; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of treasure cells currently on the grid.
    pub const fn bonus_count(&self) -> u32 {
        self.bonus
    }

    pub(crate) fn set_bonus_count(&mut self, bonus: u32) {
        self.bonus = bonus;
    }

    pub(crate) fn add_bonus(&mut self) {
        self.bonus += 1;
    }

    /// Whether `(x, y)` lies inside the grid.
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Flat index for in-bounds coordinates.
    pub(crate) fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.contains(x, y) {
            Some((x + y * self.width) as usize)
        } else {
            None
        }
    }

    /// Bounds-checked cell lookup.
    pub fn cell(&self, x: i32, y: i32) -> Result<&Cell, GridError> {
        self.index(x, y)
            .map(|i| &self.cells[i])
            .ok_or(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
    }

    /// Bounds-checked mutable cell lookup.
    pub fn cell_mut(&mut self, x: i32, y: i32) -> Result<&mut Cell, GridError> {
        let (width, height) = (self.width, self.height);
        match self.index(x, y) {
            Some(i) => Ok(&mut self.cells[i]),
            None => Err(GridError::OutOfBounds {
                x,
                y,
                width,
                height,
            }),
        }
    }

    /// Cell by flat index. Indices come from this grid's own lookups, so
    /// plain slice indexing is the invariant check.
    pub(crate) fn at(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    pub(crate) fn at_mut(&mut self, index: usize) -> &mut Cell {
        &mut self.cells[index]
    }

    /// Flat index for coordinates the caller has already validated against
    /// the grid bounds.
    pub(crate) fn flat(&self, x: i32, y: i32) -> usize {
        debug_assert!(self.contains(x, y), "flat({x}, {y}) outside grid");
        (x + y * self.width) as usize
    }

    /// Step one cardinal direction from a flat index, bounds-checked.
    pub(crate) fn neighbor4(&self, index: usize, dir: usize) -> Option<usize> {
        let cell = &self.cells[index];
        let (dx, dy) = OFFSETS4[dir];
        self.index(cell.x + dx, cell.y + dy)
    }

    /// Step one of the 8 directions from a flat index, bounds-checked.
    pub(crate) fn neighbor8(&self, index: usize, dir: usize) -> Option<usize> {
        let cell = &self.cells[index];
        let (dx, dy) = OFFSETS8[dir];
        self.index(cell.x + dx, cell.y + dy)
    }

    /// Iterate all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// ASCII dump of the cell kinds, one row per line.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.len() + self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let index = (x + y * self.width) as usize;
                out.push(self.cells[index].symbol());
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_rounded_up_to_odd() {
        let grid = Grid::new(4, 4);
        assert_eq!((grid.width(), grid.height()), (7, 7));

        let grid = Grid::new(6, 10);
        assert_eq!((grid.width(), grid.height()), (7, 11));

        let grid = Grid::new(9, 13);
        assert_eq!((grid.width(), grid.height()), (9, 13));

        let grid = Grid::new(-5, 0);
        assert_eq!((grid.width(), grid.height()), (7, 7));
    }

    #[test]
    fn test_cells_start_unvisited() {
        let grid = Grid::new(9, 9);
        assert_eq!(grid.len(), 81);
        for cell in grid.iter() {
            assert_eq!(cell.kind(), CellKind::Unvisited);
            assert!(!cell.visible());
        }
        assert_eq!(grid.bonus_count(), 0);
    }

    #[test]
    fn test_positions_match_indices() {
        let grid = Grid::new(9, 7);
        for (i, cell) in grid.iter().enumerate() {
            assert_eq!(cell.position(), (i as i32 % 9, i as i32 / 9));
        }
    }

    #[test]
    fn test_out_of_bounds_is_an_error() {
        let mut grid = Grid::new(7, 7);
        assert!(grid.cell(0, 0).is_ok());
        assert!(grid.cell(6, 6).is_ok());
        assert_eq!(
            grid.cell(7, 0),
            Err(GridError::OutOfBounds {
                x: 7,
                y: 0,
                width: 7,
                height: 7
            })
        );
        assert!(grid.cell(-1, 3).is_err());
        assert!(grid.cell_mut(3, 7).is_err());
    }

    #[test]
    fn test_neighbor_stepping_stops_at_edges() {
        let grid = Grid::new(7, 7);
        let origin = grid.index(0, 0).unwrap();
        // left and up run off the grid
        assert_eq!(grid.neighbor4(origin, 2), None);
        assert_eq!(grid.neighbor4(origin, 1), None);
        // right and down stay inside
        assert_eq!(grid.neighbor4(origin, 0), grid.index(1, 0));
        assert_eq!(grid.neighbor4(origin, 3), grid.index(0, 1));

        let center = grid.index(3, 3).unwrap();
        for dir in 0..8 {
            let n = grid.neighbor8(center, dir).unwrap();
            let cell = grid.at(n);
            let (dx, dy) = OFFSETS8[dir];
            assert_eq!(cell.position(), (3 + dx, 3 + dy));
        }
    }

    #[test]
    fn test_direction_offsets() {
        assert_eq!(Direction::Right.offset(), (1, 0));
        assert_eq!(Direction::Up.offset(), (0, -1));
        assert_eq!(Direction::Left.offset(), (-1, 0));
        assert_eq!(Direction::Down.offset(), (0, 1));
    }
}
