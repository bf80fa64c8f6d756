//! Edit-intent state machine for single cells.
//!
//! The drawing UI sends `(cell, mode, is_removal)` triples. [`Classifier`]
//! turns each into a target [`Classification`] and applies it through
//! [`Grid::set_classification`], which keeps the exit registry and spawn
//! reference consistent and invalidates solved fields.
//!
//! # Transitions
//!
//! | is_removal | mode          | previous            | result |
//! |------------|---------------|---------------------|--------|
//! | true       | any           | any                 | Open   |
//! | false      | `AddingExit`  | any                 | Exit   |
//! | false      | `AddingSpawn` | any                 | Spawn  |
//! | false      | `None`        | Open                | Wall   |
//! | false      | `None`        | Wall / Exit / Spawn | Open   |

use evac_core::{CellCoord, Classification, EditError};
use evac_grid::Grid;

use crate::gate::RunGate;

/// What a non-removal edit should paint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EditMode {
    /// Plain toggle between Open and Wall (anything else clears to Open).
    #[default]
    None,
    /// Paint an exit.
    AddingExit,
    /// Move the spawn to this cell.
    AddingSpawn,
}

/// Result of a successful edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditOutcome {
    /// The edited cell.
    pub coord: CellCoord,
    /// Classification before the edit.
    pub previous: Classification,
    /// Classification after the edit.
    pub current: Classification,
}

impl EditOutcome {
    /// Whether the edit changed anything.
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }

    /// Whether a wall was added or removed.
    pub fn walls_changed(&self) -> bool {
        self.changed()
            && (self.previous == Classification::Wall || self.current == Classification::Wall)
    }
}

/// Target classification for an edit.
pub fn target_classification(
    previous: Classification,
    mode: EditMode,
    is_removal: bool,
) -> Classification {
    if is_removal {
        return Classification::Open;
    }
    match mode {
        EditMode::AddingExit => Classification::Exit,
        EditMode::AddingSpawn => Classification::Spawn,
        EditMode::None => match previous {
            Classification::Open => Classification::Wall,
            Classification::Wall | Classification::Exit | Classification::Spawn => {
                Classification::Open
            }
        },
    }
}

/// Applies edit intents to a grid, honouring the run gate.
#[derive(Clone, Debug)]
pub struct Classifier {
    gate: RunGate,
}

impl Classifier {
    /// Create a classifier that consults `gate` before every edit.
    pub fn new(gate: RunGate) -> Self {
        Self { gate }
    }

    /// The gate this classifier consults.
    pub fn gate(&self) -> &RunGate {
        &self.gate
    }

    /// Apply one edit.
    ///
    /// # Errors
    ///
    /// - [`EditError::EditsLocked`] while a run is in progress.
    /// - [`EditError::OutOfBounds`] if `coord` is outside the grid.
    ///
    /// The grid is unchanged on error.
    pub fn apply_edit(
        &self,
        grid: &mut Grid,
        coord: CellCoord,
        mode: EditMode,
        is_removal: bool,
    ) -> Result<EditOutcome, EditError> {
        if self.gate.edits_locked() {
            return Err(EditError::EditsLocked);
        }
        let previous = grid.classification_of(coord)?;
        let current = target_classification(previous, mode, is_removal);
        grid.set_classification(coord, current)?;
        Ok(EditOutcome {
            coord,
            previous,
            current,
        })
    }
}
