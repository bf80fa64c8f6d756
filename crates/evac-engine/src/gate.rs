//! Shared "simulation run in progress" flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable handle to the edit-blocking flag.
///
/// The session controller closes the gate when a run starts and opens it
/// when the run finishes. The [`Classifier`](crate::Classifier) only reads
/// it. All clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct RunGate {
    running: Arc<AtomicBool>,
}

impl RunGate {
    /// A new, open gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a run is in progress and edits must be rejected.
    pub fn edits_locked(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Mark a run as started. Returns `false` if one was already running.
    pub fn lock_edits(&self) -> bool {
        !self.running.swap(true, Ordering::AcqRel)
    }

    /// Mark the run as finished. Returns `false` if none was running.
    pub fn unlock_edits(&self) -> bool {
        self.running.swap(false, Ordering::AcqRel)
    }
}
