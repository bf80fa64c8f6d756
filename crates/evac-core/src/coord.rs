//! Cell coordinates and the orthogonal [`Direction`] set.

use std::fmt;

/// Address of a cell within a grid.
///
/// Axes are signed so that edit requests arriving from a pointer (which can
/// land left of or above the grid) are representable and can be rejected
/// with a bounds error rather than wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCoord {
    /// Column index (x axis, grows east).
    pub column: i32,
    /// Row index (y axis, grows south).
    pub row: i32,
}

impl CellCoord {
    /// Create a coordinate from `(column, row)`.
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// The coordinate one step away in `direction`. May be out of bounds.
    pub fn step(self, direction: Direction) -> Self {
        let (dc, dr) = direction.offset();
        Self {
            column: self.column + dc,
            row: self.row + dr,
        }
    }

    /// Manhattan (L1) distance between two coordinates.
    pub fn manhattan(self, other: Self) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

impl From<(i32, i32)> for CellCoord {
    fn from((column, row): (i32, i32)) -> Self {
        Self { column, row }
    }
}

/// One of the four edge-sharing neighbour directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    /// One row up (row - 1).
    North = 0,
    /// One row down (row + 1).
    South = 1,
    /// One column left (column - 1).
    West = 2,
    /// One column right (column + 1).
    East = 3,
}

impl Direction {
    /// All four directions in the default neighbour scan order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Returns the `(column_offset, row_offset)` for this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
        }
    }

    /// Unit vector `[dx, dy]` from a cell centre toward the neighbour centre.
    pub fn unit_vector(self) -> [f32; 2] {
        let (dc, dr) = self.offset();
        [dc as f32, dr as f32]
    }

    /// The direction pointing back the other way.
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::West => "west",
            Direction::East => "east",
        };
        f.write_str(name)
    }
}
