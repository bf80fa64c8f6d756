//! Evac: grid classification, exit distance fields and occupancy tracking
//! for pedestrian evacuation venues.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all evac sub-crates. For most users, adding `evac` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use evac::prelude::*;
//!
//! let mut session = Session::new(SessionConfig {
//!     rows: 5,
//!     columns: 5,
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! // A wall down column 2 with a gap at row 2, and an exit in the corner.
//! for row in [0, 1, 3, 4] {
//!     session.apply_edit(CellCoord::new(2, row), EditMode::None, false).unwrap();
//! }
//! session.arm(EditMode::AddingExit);
//! session.paint(CellCoord::new(4, 4), false).unwrap();
//!
//! session.start_run().unwrap();
//! assert_eq!(
//!     session.guidance_vector_of(CellCoord::new(0, 2)).unwrap(),
//!     Some([1.0, 0.0])
//! );
//! session.enter(CellCoord::new(0, 2)).unwrap();
//! assert_eq!(session.peak_occupants_of(CellCoord::new(0, 2)).unwrap(), 1);
//! session.finish_run();
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `evac-core` | Coordinates, directions, classifications, errors |
//! | [`grid`] | `evac-grid` | Cells, the grid and its registries, layouts |
//! | [`field`] | `evac-field` | Multi-source BFS distance and guidance solver |
//! | [`engine`] | `evac-engine` | Classifier, occupancy, sessions, background solving |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types and error enums (`evac-core`).
pub use evac_core as types;

/// Cell grid storage (`evac-grid`).
///
/// [`grid::Grid`] keeps the exit registry and spawn reference consistent
/// with cell classifications; [`grid::Layout`] is its persistence shape.
pub use evac_grid as grid;

/// Distance and guidance field solver (`evac-field`).
pub use evac_field as field;

/// Editing, occupancy and session control (`evac-engine`).
///
/// [`engine::Session`] is the usual entry point.
pub use evac_engine as engine;

/// Common imports for typical evac usage.
///
/// ```rust
/// use evac::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use evac_core::{CellCoord, Classification, Direction, Distance};

    // Errors
    pub use evac_core::{EditError, GridError, OccupancyError, SolveError};

    // Grid
    pub use evac_grid::{Grid, Layout};

    // Solver
    pub use evac_field::{FieldSolver, FieldSummary};

    // Engine
    pub use evac_engine::{
        ConfigError, EditMode, EditOutcome, OccupancyTracker, RunGate, Session, SessionConfig,
        SessionError,
    };
}
