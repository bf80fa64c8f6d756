//! Session configuration, validation, and error types.

use std::error::Error;
use std::fmt;

use evac_core::{Direction, GridError};
use evac_field::FieldSolver;
use evac_grid::Grid;

// ── SessionConfig ──────────────────────────────────────────────────

/// Builder-input for [`Session::new`](crate::Session::new).
///
/// Defaults give a 24 x 24 venue with unit cells and the standard
/// North/South/West/East scan order.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Grid rows. Default: 24.
    pub rows: u32,
    /// Grid columns. Default: 24.
    pub columns: u32,
    /// World units per cell. Must be finite and positive. Default: 1.0.
    pub cell_size: f32,
    /// Neighbour order for the field solver. Default: [`Direction::ALL`].
    pub scan_order: [Direction; 4],
    /// Pending background solve requests before submission fails.
    /// Default: 4.
    pub worker_queue_depth: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rows: 24,
            columns: 24,
            cell_size: 1.0,
            scan_order: Direction::ALL,
            worker_queue_depth: 4,
        }
    }
}

impl SessionConfig {
    /// Check every field without allocating a grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Grid::validate_dimensions(self.rows, self.columns, self.cell_size)?;
        self.solver()?;
        if self.worker_queue_depth == 0 {
            return Err(ConfigError::WorkerQueueZero);
        }
        Ok(())
    }

    pub(crate) fn solver(&self) -> Result<FieldSolver, ConfigError> {
        FieldSolver::builder()
            .scan_order(self.scan_order)
            .build()
            .map_err(|reason| ConfigError::InvalidScanOrder { reason })
    }

    pub(crate) fn grid(&self) -> Result<Grid, ConfigError> {
        Ok(Grid::new(self.rows, self.columns, self.cell_size)?)
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`SessionConfig::validate()`] or while starting a
/// session.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Grid dimensions or cell size are invalid.
    Grid(GridError),
    /// The scan order is not a permutation of the four directions.
    InvalidScanOrder {
        /// Which direction was repeated.
        reason: String,
    },
    /// `worker_queue_depth` is zero.
    WorkerQueueZero,
    /// The solve worker thread could not be spawned.
    ThreadSpawnFailed {
        /// OS error text.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::InvalidScanOrder { reason } => write!(f, "invalid scan order: {reason}"),
            Self::WorkerQueueZero => write!(f, "worker_queue_depth must be at least 1"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}
