//! Plain layout shape for persistence collaborators.
//!
//! A [`Layout`] is everything needed to rebuild a venue: dimensions, cell
//! size and one [`Classification`] per cell. Fields and occupancy are
//! derived state and are not part of it. The core defines no file format;
//! with the `serde` feature the type can be handed to any serde backend.

use evac_core::{CellCoord, Classification, GridError};

use crate::grid::Grid;

/// Serializable venue shape. `cells` is row-major, `rows * columns` long.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    /// Number of rows.
    pub rows: u32,
    /// Number of columns.
    pub columns: u32,
    /// World units per cell edge.
    pub cell_size: f32,
    /// Row-major classifications.
    pub cells: Vec<Classification>,
}

impl Grid {
    /// Export the current classification layout.
    pub fn layout(&self) -> Layout {
        Layout {
            rows: self.rows(),
            columns: self.columns(),
            cell_size: self.cell_size(),
            cells: self.cells().iter().map(|c| c.classification()).collect(),
        }
    }

    /// Build a fresh grid from a layout.
    ///
    /// Exits are registered in row-major order. Fails with
    /// [`GridError::LayoutMismatch`] if the cell list has the wrong length and
    /// [`GridError::MultipleSpawns`] if more than one cell is a spawn.
    pub fn from_layout(layout: &Layout) -> Result<Self, GridError> {
        let expected = Grid::validate_dimensions(layout.rows, layout.columns, layout.cell_size)?;
        if layout.cells.len() != expected {
            return Err(GridError::LayoutMismatch {
                expected,
                actual: layout.cells.len(),
            });
        }
        let mut grid = Grid::new(layout.rows, layout.columns, layout.cell_size)?;

        let mut spawn: Option<CellCoord> = None;
        for (index, &classification) in layout.cells.iter().enumerate() {
            let coord = grid.coord_of(index);
            if classification == Classification::Spawn {
                if let Some(first) = spawn {
                    return Err(GridError::MultipleSpawns {
                        first,
                        second: coord,
                    });
                }
                spawn = Some(coord);
            }
            grid.set_classification(coord, classification)?;
        }
        Ok(grid)
    }

    /// Replace this grid with one rebuilt from `layout`.
    ///
    /// The revision keeps increasing across the swap so that summaries
    /// taken before the load never match the new venue. On error the grid
    /// is left as it was.
    pub fn load_layout(&mut self, layout: &Layout) -> Result<(), GridError> {
        let next = Grid::from_layout(layout)?;
        let revision = self.revision + next.revision + 1;
        *self = next;
        self.revision = revision;
        Ok(())
    }
}
