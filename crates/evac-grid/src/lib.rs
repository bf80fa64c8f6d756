//! Cell grid storage for evac venues.
//!
//! This crate owns the rectangular [`Grid`] of [`Cell`]s together with the
//! two registries that must stay consistent with cell classifications: the
//! ordered exit registry and the single spawn reference.
//!
//! # Invariants
//!
//! - Every cell holds exactly one [`Classification`](evac_core::Classification).
//! - A cell is in the exit registry iff it is classified `Exit`, and appears
//!   there once.
//! - The spawn reference names the only `Spawn` cell, if any.
//! - Distance and guidance values are meaningful only while
//!   [`Grid::fields_valid`] is true; any classification change clears them.
//! - Occupancy counters are unsigned and updated atomically, so they may be
//!   bumped through a shared reference while renderers read them.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod grid;
pub mod layout;

pub use cell::{Cell, NavState, Occupancy};
pub use grid::{Grid, NavField};
pub use layout::Layout;
