//! Distance and guidance fields for evac grids.
//!
//! [`FieldSolver`] runs a multi-source breadth-first search seeded from
//! every exit at once, then derives a per-cell [`Direction`] pointing at the
//! neighbour one step closer to an exit. Agents read their cell's guidance
//! instead of searching for a path individually.
//!
//! [`Direction`]: evac_core::Direction

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod solver;

pub use solver::{FieldSolver, FieldSolverBuilder, FieldSummary, SolvedField};
