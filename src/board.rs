//! Board geometry
//!
//! `Board` is the static width/height shared by every session, `Cell` a
//! coordinate on it. The adjacency buffer computed here drives both the
//! no-touching placement rule and the miss-reveal sent when a ship sinks.

use serde::{Deserialize, Serialize};

use crate::error::PlacementError;

/// Board coordinate, `row` in `0..height`, `column` in `0..width`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
}

impl Cell {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Direction a ship's run extends in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Same row, consecutive columns
    Horizontal,
    /// Same column, consecutive rows
    Vertical,
}

/// Static board dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Board {
    pub width: usize,
    pub height: usize,
}

impl Board {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Check whether the cell lies on the board
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.column < self.width
    }

    /// Cell at signed coordinates, `None` when off the board
    fn cell_at(&self, row: i64, column: i64) -> Option<Cell> {
        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        let cell = Cell::new(row, column);
        self.contains(cell).then_some(cell)
    }

    /// Cell `offset` steps from `start` along `axis`, shifted `cross` steps sideways
    fn step(&self, start: Cell, axis: Axis, offset: i64, cross: i64) -> Option<Cell> {
        let (row, column) = (start.row as i64, start.column as i64);
        match axis {
            Axis::Horizontal => self.cell_at(row + cross, column + offset),
            Axis::Vertical => self.cell_at(row + offset, column + cross),
        }
    }

    /// Cells occupied by a run of `length` starting at `start`
    ///
    /// Fails if any part of the run lies off the board.
    pub fn run(&self, start: Cell, axis: Axis, length: usize) -> Result<Vec<Cell>, PlacementError> {
        (0..length as i64)
            .map(|i| self.step(start, axis, i, 0).ok_or(PlacementError::OutOfBounds))
            .collect()
    }

    /// One-cell buffer around a run of `length` starting at `start`
    ///
    /// The buffer is the cell just before and just after the run along
    /// `axis`, plus both perpendicular neighbours of every run cell and of
    /// those two end cells. Off-board cells are omitted; a run that itself
    /// leaves the board is rejected.
    pub fn adjacent_cells(
        &self,
        start: Cell,
        axis: Axis,
        length: usize,
    ) -> Result<Vec<Cell>, PlacementError> {
        self.run(start, axis, length)?;

        let mut buffer = Vec::with_capacity(2 * length + 6);
        let end = length as i64;
        for offset in -1..=end {
            if offset == -1 || offset == end {
                buffer.extend(self.step(start, axis, offset, 0));
            }
            buffer.extend(self.step(start, axis, offset, -1));
            buffer.extend(self.step(start, axis, offset, 1));
        }
        Ok(buffer)
    }
}
