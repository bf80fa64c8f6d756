//! Core types for the evac navigation-field engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by every other crate in the workspace: cell
//! coordinates, the four orthogonal directions, cell classification,
//! BFS distances, and the error taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod classification;
pub mod coord;
pub mod error;

pub use classification::{Classification, Distance};
pub use coord::{CellCoord, Direction};
pub use error::{EditError, GridError, OccupancyError, SolveError};
