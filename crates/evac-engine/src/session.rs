//! The session controller: one grid, its editor, solver and occupancy.
//!
//! Locking discipline: edits, solves and structural resets take the grid
//! write lock; queries and occupancy updates take the read lock. Occupancy
//! counters are atomics, so any number of agent threads can enter and
//! leave cells alongside renderers.

use std::error::Error;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use evac_core::{
    CellCoord, Classification, Distance, EditError, GridError, OccupancyError, SolveError,
};
use evac_field::{FieldSolver, FieldSummary};
use evac_grid::{Grid, Layout};

use crate::classifier::{Classifier, EditMode, EditOutcome};
use crate::config::{ConfigError, SessionConfig};
use crate::gate::RunGate;
use crate::occupancy::{DensitySnapshot, OccupancyTracker};
use crate::worker::{SolveReply, SolveWorker, SubmitError};

// Every grid mutation keeps the invariants intact before it returns, so a
// panic on another thread leaves nothing half-applied worth refusing.
pub(crate) fn read_grid(grid: &RwLock<Grid>) -> RwLockReadGuard<'_, Grid> {
    grid.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_grid(grid: &RwLock<Grid>) -> RwLockWriteGuard<'_, Grid> {
    grid.write().unwrap_or_else(PoisonError::into_inner)
}

// ── SessionError ───────────────────────────────────────────────────

/// Errors from [`Session`] operations.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionError {
    /// An edit was rejected.
    Edit(EditError),
    /// A solve failed.
    Solve(SolveError),
    /// A structural operation was given invalid input.
    Grid(GridError),
    /// The operation is not allowed while a run is in progress.
    RunInProgress,
    /// The background solve queue is full.
    WorkerBusy,
    /// The background solve worker has been shut down.
    WorkerShutdown,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edit(e) => write!(f, "edit: {e}"),
            Self::Solve(e) => write!(f, "solve: {e}"),
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::RunInProgress => write!(f, "a simulation run is in progress"),
            Self::WorkerBusy => write!(f, "solve queue is full"),
            Self::WorkerShutdown => write!(f, "solve worker has shut down"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Edit(e) => Some(e),
            Self::Solve(e) => Some(e),
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EditError> for SessionError {
    fn from(e: EditError) -> Self {
        Self::Edit(e)
    }
}

impl From<SolveError> for SessionError {
    fn from(e: SolveError) -> Self {
        Self::Solve(e)
    }
}

impl From<GridError> for SessionError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<SubmitError> for SessionError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::QueueFull => Self::WorkerBusy,
            SubmitError::Shutdown => Self::WorkerShutdown,
        }
    }
}

// ── Session ────────────────────────────────────────────────────────

/// Owns a venue grid and everything that acts on it.
///
/// # Example
///
/// ```
/// use evac_core::{CellCoord, Distance};
/// use evac_engine::{EditMode, Session, SessionConfig};
///
/// let mut session = Session::new(SessionConfig {
///     rows: 5,
///     columns: 5,
///     ..Default::default()
/// })
/// .unwrap();
/// session.arm(EditMode::AddingExit);
/// session.paint(CellCoord::new(4, 4), false).unwrap();
///
/// session.start_run().unwrap();
/// assert_eq!(session.distance_of(CellCoord::new(0, 0)).unwrap(), Distance::hops(8));
/// session.enter(CellCoord::new(0, 0)).unwrap();
/// session.finish_run();
/// ```
#[derive(Debug)]
pub struct Session {
    grid: Arc<RwLock<Grid>>,
    classifier: Classifier,
    tracker: OccupancyTracker,
    solver: FieldSolver,
    worker: SolveWorker,
    armed: EditMode,
}

impl Session {
    /// Validate `config`, build an all-open grid and start the solve worker.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let solver = config.solver()?;
        let grid = Arc::new(RwLock::new(config.grid()?));
        let worker = SolveWorker::spawn(
            Arc::clone(&grid),
            solver.clone(),
            config.worker_queue_depth,
        )?;
        tracing::info!(
            rows = config.rows,
            columns = config.columns,
            cell_size = config.cell_size,
            "session started"
        );
        Ok(Self {
            grid,
            classifier: Classifier::new(RunGate::new()),
            tracker: OccupancyTracker::new(),
            solver,
            worker,
            armed: EditMode::None,
        })
    }

    /// Shared read access to the grid, for rendering.
    pub fn read(&self) -> RwLockReadGuard<'_, Grid> {
        read_grid(&self.grid)
    }

    /// The shared grid handle.
    pub fn grid_handle(&self) -> Arc<RwLock<Grid>> {
        Arc::clone(&self.grid)
    }

    /// A handle to the run gate the classifier consults.
    pub fn run_gate(&self) -> RunGate {
        self.classifier.gate().clone()
    }

    /// The occupancy tracker, for underflow counts.
    pub fn tracker(&self) -> &OccupancyTracker {
        &self.tracker
    }

    /// Whether a simulation run is in progress.
    pub fn is_running(&self) -> bool {
        self.classifier.gate().edits_locked()
    }

    // ── Editing ────────────────────────────────────────────────────

    /// Arm `mode` for the next successful [`paint`](Self::paint).
    pub fn arm(&mut self, mode: EditMode) {
        self.armed = mode;
    }

    /// The currently armed mode.
    pub fn armed(&self) -> EditMode {
        self.armed
    }

    /// Apply an edit with the armed mode.
    ///
    /// A successful non-removal edit disarms the mode back to
    /// [`EditMode::None`]. Removals and failed edits keep it armed.
    pub fn paint(&mut self, coord: CellCoord, is_removal: bool) -> Result<EditOutcome, EditError> {
        let outcome = self.apply_edit(coord, self.armed, is_removal)?;
        if !is_removal {
            self.armed = EditMode::None;
        }
        Ok(outcome)
    }

    /// Apply one edit with an explicit mode.
    pub fn apply_edit(
        &self,
        coord: CellCoord,
        mode: EditMode,
        is_removal: bool,
    ) -> Result<EditOutcome, EditError> {
        let mut grid = write_grid(&self.grid);
        self.classifier
            .apply_edit(&mut grid, coord, mode, is_removal)
    }

    // ── Solving and runs ───────────────────────────────────────────

    /// Solve the field on the calling thread.
    pub fn solve(&self) -> Result<FieldSummary, SolveError> {
        let mut grid = write_grid(&self.grid);
        self.solver.solve(&mut grid)
    }

    /// Queue a solve on the worker thread.
    pub fn solve_in_background(&self) -> Result<SolveReply, SessionError> {
        Ok(self.worker.request()?)
    }

    /// Solve, clear occupancy and lock edits for a simulation run.
    ///
    /// # Errors
    ///
    /// - [`SessionError::RunInProgress`] if a run is already active.
    /// - [`SessionError::Solve`] with [`SolveError::NoExitsDefined`] when the
    ///   venue has no exits. No run is started and edits stay open.
    pub fn start_run(&self) -> Result<FieldSummary, SessionError> {
        let gate = self.classifier.gate();
        if !gate.lock_edits() {
            return Err(SessionError::RunInProgress);
        }
        let mut grid = write_grid(&self.grid);
        match self.solver.solve(&mut grid) {
            Ok(summary) => {
                self.tracker.reset_all(&grid);
                tracing::info!(
                    exits = summary.exits,
                    reached = summary.reached,
                    unreached = summary.unreached_walkable,
                    "run started"
                );
                Ok(summary)
            }
            Err(e) => {
                gate.unlock_edits();
                tracing::warn!(error = %e, "run refused");
                Err(e.into())
            }
        }
    }

    /// End the current run and re-enable edits. Returns `false` if no run
    /// was in progress.
    pub fn finish_run(&self) -> bool {
        let was_running = self.classifier.gate().unlock_edits();
        if was_running {
            let snapshot = self.density_snapshot();
            tracing::info!(
                remaining = snapshot.total_current(),
                max_peak = snapshot.max_peak(),
                underflows = self.tracker.underflows(),
                "run finished"
            );
        }
        was_running
    }

    // ── Occupancy ──────────────────────────────────────────────────

    /// Record an agent entering `coord`.
    pub fn enter(&self, coord: CellCoord) -> Result<u32, OccupancyError> {
        self.tracker.enter(&self.read(), coord)
    }

    /// Record an agent leaving `coord`.
    pub fn leave(&self, coord: CellCoord) -> Result<u32, OccupancyError> {
        self.tracker.leave(&self.read(), coord)
    }

    /// Zero every occupancy counter.
    pub fn reset_occupancy(&self) {
        self.tracker.reset_all(&self.read());
    }

    /// Copy out every occupancy counter.
    pub fn density_snapshot(&self) -> DensitySnapshot {
        self.tracker.density_snapshot(&self.read())
    }

    // ── Queries ────────────────────────────────────────────────────

    /// Classification of `coord`.
    pub fn classification_of(&self, coord: CellCoord) -> Result<Classification, GridError> {
        self.read().classification_of(coord)
    }

    /// Guidance of `coord` as a unit `(dx, dy)` vector.
    pub fn guidance_vector_of(&self, coord: CellCoord) -> Result<Option<[f32; 2]>, GridError> {
        self.read().guidance_vector_of(coord)
    }

    /// Hop distance from `coord` to the nearest exit.
    pub fn distance_of(&self, coord: CellCoord) -> Result<Distance, GridError> {
        self.read().distance_of(coord)
    }

    /// Current occupants of `coord`.
    pub fn current_occupants_of(&self, coord: CellCoord) -> Result<u32, GridError> {
        self.read().current_occupants_of(coord)
    }

    /// Peak occupants of `coord` since the last occupancy reset.
    pub fn peak_occupants_of(&self, coord: CellCoord) -> Result<u32, GridError> {
        self.read().peak_occupants_of(coord)
    }

    // ── Structure ──────────────────────────────────────────────────
    //
    // All refused with `RunInProgress` while a run is active.

    /// Rebuild the grid all-open at a new size. Exits and spawn are lost.
    pub fn resize(&self, rows: u32, columns: u32, cell_size: f32) -> Result<(), SessionError> {
        let mut grid = self.structural_lock()?;
        grid.resize(rows, columns, cell_size)?;
        tracing::debug!(rows, columns, cell_size, "grid resized");
        Ok(())
    }

    /// Return every cell to Open with no fields or occupants.
    pub fn reset(&self) -> Result<(), SessionError> {
        let mut grid = self.structural_lock()?;
        grid.reset();
        tracing::debug!("grid reset");
        Ok(())
    }

    /// Clear fields and occupancy, keep the layout.
    pub fn reset_fields_only(&self) -> Result<(), SessionError> {
        let mut grid = self.structural_lock()?;
        grid.reset_fields_only();
        tracing::debug!("fields and occupancy reset");
        Ok(())
    }

    /// Export the current layout.
    pub fn layout(&self) -> Layout {
        self.read().layout()
    }

    /// Replace the venue with `layout`.
    pub fn load_layout(&self, layout: &Layout) -> Result<(), SessionError> {
        let mut grid = self.structural_lock()?;
        grid.load_layout(layout)?;
        tracing::debug!(
            rows = layout.rows,
            columns = layout.columns,
            exits = grid.exit_count(),
            "layout loaded"
        );
        Ok(())
    }

    /// Stop the solve worker. Returns `false` if its thread panicked.
    pub fn shutdown(&mut self) -> bool {
        self.worker.shutdown()
    }

    fn structural_lock(&self) -> Result<RwLockWriteGuard<'_, Grid>, SessionError> {
        let grid = write_grid(&self.grid);
        if self.is_running() {
            return Err(SessionError::RunInProgress);
        }
        Ok(grid)
    }
}
