//! Error types for the evac engine.
//!
//! Organized by subsystem: grid construction and addressing, edits,
//! field solving, and occupancy counting. Every variant is a local,
//! recoverable condition; none leaves a grid in an inconsistent state.

use std::error::Error;
use std::fmt;

use crate::coord::CellCoord;

/// Errors from grid construction, resizing and cell addressing.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// A coordinate lies outside the grid extent.
    OutOfBounds {
        /// The offending coordinate.
        coord: CellCoord,
        /// Grid width in cells.
        columns: u32,
        /// Grid height in cells.
        rows: u32,
    },
    /// Attempted to build a grid with zero rows or columns.
    EmptyGrid,
    /// A dimension does not fit the signed coordinate space.
    DimensionTooLarge {
        /// Which dimension overflowed.
        name: &'static str,
        /// The requested value.
        value: u32,
        /// The maximum allowed value.
        max: u32,
    },
    /// `rows * columns` exceeds the cell budget.
    TooManyCells {
        /// The requested cell count.
        cells: u64,
        /// The maximum allowed cell count.
        max: u64,
    },
    /// Cell size is NaN, infinite, zero or negative.
    InvalidCellSize {
        /// The rejected value.
        value: f32,
    },
    /// A layout's cell list does not match its declared dimensions.
    LayoutMismatch {
        /// `rows * columns` from the layout header.
        expected: usize,
        /// Length of the cell list.
        actual: usize,
    },
    /// A layout names more than one spawn cell.
    MultipleSpawns {
        /// The first spawn encountered.
        first: CellCoord,
        /// The extra spawn that was rejected.
        second: CellCoord,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                coord,
                columns,
                rows,
            } => {
                write!(f, "cell {coord} out of bounds: [0, {columns}) x [0, {rows})")
            }
            Self::EmptyGrid => write!(f, "grid must have at least one cell"),
            Self::DimensionTooLarge { name, value, max } => {
                write!(f, "{name} = {value} exceeds maximum {max}")
            }
            Self::TooManyCells { cells, max } => {
                write!(f, "grid of {cells} cells exceeds maximum {max}")
            }
            Self::InvalidCellSize { value } => {
                write!(f, "cell_size must be finite and positive, got {value}")
            }
            Self::LayoutMismatch { expected, actual } => {
                write!(f, "layout has {actual} cells, expected {expected}")
            }
            Self::MultipleSpawns { first, second } => {
                write!(f, "layout has more than one spawn: {first} and {second}")
            }
        }
    }
}

impl Error for GridError {}

/// Errors from applying a user edit to a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum EditError {
    /// The edit targeted a cell outside the grid.
    OutOfBounds(GridError),
    /// A simulation run is in progress; edits are blocked.
    EditsLocked,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds(e) => write!(f, "edit rejected: {e}"),
            Self::EditsLocked => write!(f, "edit rejected: simulation run in progress"),
        }
    }
}

impl Error for EditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::OutOfBounds(e) => Some(e),
            Self::EditsLocked => None,
        }
    }
}

impl From<GridError> for EditError {
    fn from(e: GridError) -> Self {
        Self::OutOfBounds(e)
    }
}

/// Errors from computing the distance and guidance fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveError {
    /// The exit registry is empty. Every cell was left unreached and a
    /// simulation must not be started.
    NoExitsDefined,
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoExitsDefined => write!(f, "no exits defined"),
        }
    }
}

impl Error for SolveError {}

/// Errors from occupancy counting.
#[derive(Clone, Debug, PartialEq)]
pub enum OccupancyError {
    /// The agent loop reported a cell outside the grid.
    OutOfBounds(GridError),
    /// `leave` on a cell with no occupants. The counter is left at zero.
    ///
    /// Signals a bookkeeping bug in the agent loop; benign for the grid.
    Underflow {
        /// The cell that was already empty.
        coord: CellCoord,
    },
}

impl fmt::Display for OccupancyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds(e) => write!(f, "occupancy update rejected: {e}"),
            Self::Underflow { coord } => {
                write!(f, "leave on empty cell {coord} ignored")
            }
        }
    }
}

impl Error for OccupancyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::OutOfBounds(e) => Some(e),
            Self::Underflow { .. } => None,
        }
    }
}

impl From<GridError> for OccupancyError {
    fn from(e: GridError) -> Self {
        Self::OutOfBounds(e)
    }
}
