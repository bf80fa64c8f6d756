//! Cell classification and BFS distance values.

use std::fmt;

/// What a cell is, as painted by the user.
///
/// Exactly one variant holds for a cell at any time; assigning a new
/// classification replaces the previous one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Classification {
    /// Walkable floor.
    #[default]
    Open,
    /// Impassable barrier.
    Wall,
    /// Evacuation target. Seeds the distance field.
    Exit,
    /// Region where agents are released. At most one per grid.
    Spawn,
}

impl Classification {
    /// Whether agents (and the BFS frontier) may enter this cell.
    pub fn is_walkable(self) -> bool {
        !matches!(self, Classification::Wall)
    }

    /// Single-character glyph used by ASCII layouts and debug dumps.
    pub fn glyph(self) -> char {
        match self {
            Classification::Open => '.',
            Classification::Wall => '#',
            Classification::Exit => 'E',
            Classification::Spawn => 'S',
        }
    }

    /// Inverse of [`glyph`](Self::glyph).
    pub fn from_glyph(c: char) -> Option<Self> {
        match c {
            '.' => Some(Classification::Open),
            '#' => Some(Classification::Wall),
            'E' => Some(Classification::Exit),
            'S' => Some(Classification::Spawn),
            _ => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Classification::Open => "open",
            Classification::Wall => "wall",
            Classification::Exit => "exit",
            Classification::Spawn => "spawn",
        };
        f.write_str(name)
    }
}

/// Hop count from the nearest exit, or [`Distance::UNREACHED`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Distance(u32);

impl Distance {
    /// Sentinel for cells no exit can reach. Compares greater than every
    /// reached distance.
    pub const UNREACHED: Distance = Distance(u32::MAX);

    /// Distance of an exit cell.
    pub const ZERO: Distance = Distance(0);

    /// A reached distance of `hops` steps.
    pub const fn hops(hops: u32) -> Self {
        Self(hops)
    }

    /// Whether some exit reaches this cell.
    pub fn is_reached(self) -> bool {
        self != Self::UNREACHED
    }

    /// The hop count, or `None` when unreached.
    pub fn get(self) -> Option<u32> {
        self.is_reached().then_some(self.0)
    }

    /// The next BFS level. Saturates below the sentinel.
    pub fn next_level(self) -> Self {
        Self(self.0.saturating_add(1).min(u32::MAX - 1))
    }
}

impl Default for Distance {
    fn default() -> Self {
        Self::UNREACHED
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(h) => write!(f, "{h}"),
            None => f.write_str("unreached"),
        }
    }
}
