//! Per-cell occupancy counting for the agent loop.
//!
//! Counters live on the cells as atomics, so every operation here takes a
//! shared `&Grid`. Agents on several threads may enter and leave cells
//! while a renderer reads the same grid.

use std::sync::atomic::{AtomicU64, Ordering};

use evac_core::{CellCoord, OccupancyError};
use evac_grid::Grid;

/// Increments and decrements occupancy counters and reports inconsistencies.
///
/// The tracker itself only counts underflows. The counts are on the grid.
#[derive(Debug, Default)]
pub struct OccupancyTracker {
    underflows: AtomicU64,
}

impl OccupancyTracker {
    /// A tracker with no recorded underflows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an agent entering `coord`. Returns the new current count.
    ///
    /// Peak is raised to the new count if it is higher.
    pub fn enter(&self, grid: &Grid, coord: CellCoord) -> Result<u32, OccupancyError> {
        Ok(grid.cell(coord)?.occupancy().increment())
    }

    /// Record an agent leaving `coord`. Returns the new current count.
    ///
    /// Leaving an empty cell changes nothing. It is logged and reported as
    /// [`OccupancyError::Underflow`] so the caller can ignore it.
    pub fn leave(&self, grid: &Grid, coord: CellCoord) -> Result<u32, OccupancyError> {
        match grid.cell(coord)?.occupancy().decrement() {
            Some(current) => Ok(current),
            None => {
                self.underflows.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(%coord, "agent left a cell with no recorded occupants");
                Err(OccupancyError::Underflow { coord })
            }
        }
    }

    /// Current occupant count at `coord`.
    pub fn current(&self, grid: &Grid, coord: CellCoord) -> Result<u32, OccupancyError> {
        Ok(grid.current_occupants_of(coord)?)
    }

    /// Highest count `coord` has held since the last reset.
    pub fn peak(&self, grid: &Grid, coord: CellCoord) -> Result<u32, OccupancyError> {
        Ok(grid.peak_occupants_of(coord)?)
    }

    /// Zero current and peak on every cell and forget recorded underflows.
    pub fn reset_all(&self, grid: &Grid) {
        grid.clear_occupancy();
        self.underflows.store(0, Ordering::Relaxed);
    }

    /// Number of `leave` calls on empty cells since the last reset.
    pub fn underflows(&self) -> u64 {
        self.underflows.load(Ordering::Relaxed)
    }

    /// Copy every counter out for heat-map rendering.
    pub fn density_snapshot(&self, grid: &Grid) -> DensitySnapshot {
        let mut current = Vec::with_capacity(grid.cell_count());
        let mut peak = Vec::with_capacity(grid.cell_count());
        for cell in grid.cells() {
            current.push(cell.occupancy().current());
            peak.push(cell.occupancy().peak());
        }
        DensitySnapshot {
            rows: grid.rows(),
            columns: grid.columns(),
            current,
            peak,
        }
    }
}

/// Row-major copy of every cell's occupancy counters.
///
/// Counters are read one cell at a time, so a snapshot taken while agents
/// move is not a single atomic cut across the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DensitySnapshot {
    /// Grid rows.
    pub rows: u32,
    /// Grid columns.
    pub columns: u32,
    /// Current occupants per cell.
    pub current: Vec<u32>,
    /// Peak occupants per cell.
    pub peak: Vec<u32>,
}

impl DensitySnapshot {
    /// Sum of current occupants over all cells.
    pub fn total_current(&self) -> u64 {
        self.current.iter().map(|&n| u64::from(n)).sum()
    }

    /// Largest peak on any cell.
    pub fn max_peak(&self) -> u32 {
        self.peak.iter().copied().max().unwrap_or(0)
    }

    /// Current count at `(column, row)`, if in range.
    pub fn current_at(&self, column: u32, row: u32) -> Option<u32> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.current
            .get(row as usize * self.columns as usize + column as usize)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evac_core::GridError;
    use proptest::prelude::*;
    use std::thread;

    fn c(column: i32, row: i32) -> CellCoord {
        CellCoord::new(column, row)
    }

    #[test]
    fn enter_three_leave_one() {
        let g = Grid::new(3, 3, 1.0).unwrap();
        let t = OccupancyTracker::new();
        let at = c(1, 1);
        assert_eq!(t.enter(&g, at), Ok(1));
        assert_eq!(t.enter(&g, at), Ok(2));
        assert_eq!(t.enter(&g, at), Ok(3));
        assert_eq!(t.leave(&g, at), Ok(2));
        assert_eq!(t.current(&g, at), Ok(2));
        assert_eq!(t.peak(&g, at), Ok(3));
    }

    #[test]
    fn leave_on_empty_cell_is_counted_noop() {
        let g = Grid::new(2, 2, 1.0).unwrap();
        let t = OccupancyTracker::new();
        assert_eq!(
            t.leave(&g, c(0, 0)),
            Err(OccupancyError::Underflow { coord: c(0, 0) })
        );
        assert_eq!(t.current(&g, c(0, 0)), Ok(0));
        assert_eq!(t.underflows(), 1);
        t.reset_all(&g);
        assert_eq!(t.underflows(), 0);
    }

    #[test]
    fn out_of_bounds_is_reported() {
        let g = Grid::new(2, 2, 1.0).unwrap();
        let t = OccupancyTracker::new();
        assert!(matches!(
            t.enter(&g, c(-1, 0)),
            Err(OccupancyError::OutOfBounds(GridError::OutOfBounds { .. }))
        ));
        assert!(matches!(t.peak(&g, c(0, 2)), Err(OccupancyError::OutOfBounds(_))));
    }

    #[test]
    fn reset_all_zeroes_current_and_peak() {
        let g = Grid::new(2, 2, 1.0).unwrap();
        let t = OccupancyTracker::new();
        t.enter(&g, c(1, 0)).unwrap();
        t.enter(&g, c(1, 0)).unwrap();
        t.reset_all(&g);
        assert_eq!(t.current(&g, c(1, 0)), Ok(0));
        assert_eq!(t.peak(&g, c(1, 0)), Ok(0));
    }

    #[test]
    fn snapshot_is_row_major() {
        let g = Grid::new(2, 3, 1.0).unwrap();
        let t = OccupancyTracker::new();
        t.enter(&g, c(2, 0)).unwrap();
        t.enter(&g, c(0, 1)).unwrap();
        t.enter(&g, c(0, 1)).unwrap();
        t.leave(&g, c(0, 1)).unwrap();

        let snap = t.density_snapshot(&g);
        assert_eq!(snap.current, vec![0, 0, 1, 1, 0, 0]);
        assert_eq!(snap.peak, vec![0, 0, 1, 2, 0, 0]);
        assert_eq!(snap.total_current(), 2);
        assert_eq!(snap.max_peak(), 2);
        assert_eq!(snap.current_at(0, 1), Some(1));
        assert_eq!(snap.current_at(3, 0), None);
    }

    #[test]
    fn concurrent_agents_balance_out() {
        let g = Grid::new(4, 4, 1.0).unwrap();
        let t = OccupancyTracker::new();
        let at = c(2, 3);
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..500 {
                        t.enter(&g, at).unwrap();
                        t.leave(&g, at).unwrap();
                    }
                });
            }
        });
        assert_eq!(t.current(&g, at), Ok(0));
        assert_eq!(t.underflows(), 0);
        let peak = t.peak(&g, at).unwrap();
        assert!((1..=8).contains(&peak), "peak {peak}");
    }

    proptest! {
        #[test]
        fn peak_bounds_current_and_never_falls(
            moves in proptest::collection::vec(any::<bool>(), 0..200)
        ) {
            let g = Grid::new(1, 1, 1.0).unwrap();
            let t = OccupancyTracker::new();
            let at = c(0, 0);
            let mut model: u32 = 0;
            let mut model_peak: u32 = 0;
            let mut last_peak = 0;
            for enter in moves {
                if enter {
                    model += 1;
                    model_peak = model_peak.max(model);
                    prop_assert_eq!(t.enter(&g, at), Ok(model));
                } else if model == 0 {
                    prop_assert!(t.leave(&g, at).is_err());
                } else {
                    model -= 1;
                    prop_assert_eq!(t.leave(&g, at), Ok(model));
                }
                let peak = t.peak(&g, at).unwrap();
                prop_assert!(peak >= last_peak);
                prop_assert!(peak >= t.current(&g, at).unwrap());
                prop_assert_eq!(peak, model_peak);
                last_peak = peak;
            }
        }
    }
}
