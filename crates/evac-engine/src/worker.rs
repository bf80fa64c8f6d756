//! Background field-solve thread.
//!
//! ```text
//! Caller thread(s)                     evac-solve thread
//!     |                                      |
//!     |--request()------------------------->| rx.recv()
//!     |   [tx: bounded(queue_depth)]        | grid.write()
//!     |                                      | solver.solve(&mut grid)
//!     |<--result via per-request bounded(1)--|
//! ```
//!
//! The worker holds the grid write lock for the whole solve, so a solve
//! never interleaves with an edit or a structural reset.

use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use evac_core::SolveError;
use evac_field::{FieldSolver, FieldSummary};
use evac_grid::Grid;

use crate::config::ConfigError;
use crate::session::write_grid;

/// Reply channel for one background solve.
pub type SolveReply = Receiver<Result<FieldSummary, SolveError>>;

pub(crate) struct SolveRequest {
    reply: Sender<Result<FieldSummary, SolveError>>,
}

/// Why a solve request could not be queued.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitError {
    /// The request queue is full.
    QueueFull,
    /// The worker has been shut down.
    Shutdown,
}

/// Owns the `evac-solve` thread and its request queue.
#[derive(Debug)]
pub struct SolveWorker {
    tx: Option<Sender<SolveRequest>>,
    handle: Option<JoinHandle<()>>,
}

impl SolveWorker {
    /// Spawn the worker thread for `grid`.
    pub fn spawn(
        grid: Arc<RwLock<Grid>>,
        solver: FieldSolver,
        queue_depth: usize,
    ) -> Result<Self, ConfigError> {
        let (tx, rx) = crossbeam_channel::bounded(queue_depth.max(1));
        let handle = thread::Builder::new()
            .name("evac-solve".into())
            .spawn(move || run(rx, grid, solver))
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: format!("evac-solve: {e}"),
            })?;
        tracing::info!(queue_depth, "solve worker started");
        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Queue a solve. The result arrives on the returned channel.
    pub fn request(&self) -> Result<SolveReply, SubmitError> {
        let tx = self.tx.as_ref().ok_or(SubmitError::Shutdown)?;
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        tx.try_send(SolveRequest { reply: reply_tx })
            .map_err(|e| match e {
                TrySendError::Full(_) => SubmitError::QueueFull,
                TrySendError::Disconnected(_) => SubmitError::Shutdown,
            })?;
        Ok(reply_rx)
    }

    /// Whether the worker still accepts requests.
    pub fn is_running(&self) -> bool {
        self.tx.is_some()
    }

    /// Stop accepting requests, let queued solves finish, and join the
    /// thread. Returns `false` if the thread panicked.
    pub fn shutdown(&mut self) -> bool {
        self.tx.take();
        let joined = match self.handle.take() {
            Some(handle) => handle.join().is_ok(),
            None => return true,
        };
        tracing::info!(joined, "solve worker stopped");
        joined
    }
}

impl Drop for SolveWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(rx: Receiver<SolveRequest>, grid: Arc<RwLock<Grid>>, solver: FieldSolver) {
    while let Ok(request) = rx.recv() {
        let result = {
            let mut grid = write_grid(&grid);
            solver.solve(&mut grid)
        };
        // The caller may have dropped its reply channel.
        let _ = request.reply.send(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evac_core::{CellCoord, Classification, Distance};

    fn shared(rows: u32, columns: u32) -> Arc<RwLock<Grid>> {
        Arc::new(RwLock::new(Grid::new(rows, columns, 1.0).unwrap()))
    }

    #[test]
    fn solves_in_background() {
        let grid = shared(3, 3);
        grid.write()
            .unwrap()
            .set_classification(CellCoord::new(2, 2), Classification::Exit)
            .unwrap();
        let mut worker = SolveWorker::spawn(Arc::clone(&grid), FieldSolver::default(), 2).unwrap();

        let summary = worker.request().unwrap().recv().unwrap().unwrap();
        assert_eq!(summary.reached, 9);
        assert_eq!(
            grid.read().unwrap().distance_of(CellCoord::new(0, 0)).unwrap(),
            Distance::hops(4)
        );
        assert!(worker.shutdown());
    }

    #[test]
    fn no_exits_is_reported_through_reply() {
        let worker = SolveWorker::spawn(shared(2, 2), FieldSolver::default(), 1).unwrap();
        let reply = worker.request().unwrap();
        assert_eq!(reply.recv().unwrap(), Err(SolveError::NoExitsDefined));
    }

    #[test]
    fn requests_after_shutdown_fail() {
        let mut worker = SolveWorker::spawn(shared(2, 2), FieldSolver::default(), 1).unwrap();
        assert!(worker.is_running());
        assert!(worker.shutdown());
        assert!(!worker.is_running());
        assert_eq!(worker.request().unwrap_err(), SubmitError::Shutdown);
        assert!(worker.shutdown());
    }

    #[test]
    fn full_queue_is_reported() {
        let grid = shared(2, 2);
        let worker = SolveWorker::spawn(Arc::clone(&grid), FieldSolver::default(), 1).unwrap();

        // Hold the write lock so the worker blocks on its first request.
        let guard = grid.write().unwrap();
        let mut replies = Vec::new();
        let mut saw_full = false;
        for _ in 0..4 {
            match worker.request() {
                Ok(reply) => replies.push(reply),
                Err(SubmitError::QueueFull) => saw_full = true,
                Err(SubmitError::Shutdown) => panic!("worker shut down"),
            }
        }
        drop(guard);
        assert!(saw_full);
        for reply in replies {
            assert_eq!(reply.recv().unwrap(), Err(SolveError::NoExitsDefined));
        }
    }

    #[test]
    fn queued_solves_finish_before_shutdown() {
        let grid = shared(2, 2);
        let mut worker = SolveWorker::spawn(grid, FieldSolver::default(), 4).unwrap();
        let replies: Vec<_> = (0..3).map(|_| worker.request().unwrap()).collect();
        assert!(worker.shutdown());
        for reply in replies {
            assert!(reply.recv().is_ok());
        }
    }
}
