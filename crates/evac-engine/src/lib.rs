//! Session control for evac venues.
//!
//! Wraps a [`Grid`](evac_grid::Grid) in a [`Session`] that applies drawing
//! edits through the [`Classifier`], solves navigation fields on demand or
//! on a background [`SolveWorker`], and counts agents with the
//! [`OccupancyTracker`]. A [`RunGate`] shared with the classifier blocks
//! edits while a simulation run is in progress.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod classifier;
pub mod config;
pub mod gate;
pub mod occupancy;
pub mod session;
pub mod worker;

pub use classifier::{target_classification, Classifier, EditMode, EditOutcome};
pub use config::{ConfigError, SessionConfig};
pub use gate::RunGate;
pub use occupancy::{DensitySnapshot, OccupancyTracker};
pub use session::{Session, SessionError};
pub use worker::{SolveReply, SolveWorker, SubmitError};
