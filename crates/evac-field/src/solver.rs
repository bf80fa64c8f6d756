//! Multi-source BFS field solver.
//!
//! Constructed via the builder pattern: [`FieldSolver::builder`], or
//! [`FieldSolver::default`] for the standard N/S/W/E scan order.

use std::collections::VecDeque;

use evac_core::{Direction, Distance, SolveError};
use evac_grid::{Grid, NavField};

/// Statistics from one solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSummary {
    /// Exits used as BFS seeds.
    pub exits: usize,
    /// Cells with a finite distance, exits included.
    pub reached: usize,
    /// Walkable cells no exit can reach.
    pub unreached_walkable: usize,
    /// Largest finite distance, `None` when nothing was reached.
    pub max_distance: Option<u32>,
    /// Grid revision the field was computed against.
    pub revision: u64,
}

/// Solver output before it is installed on a grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolvedField {
    /// Per-cell distance and guidance buffers.
    pub field: NavField,
    /// Statistics for the computation.
    pub summary: FieldSummary,
}

/// Exit-seeded breadth-first distance and guidance solver.
///
/// # Algorithm
///
/// 1. **Seed:** every registered exit gets distance 0 and is enqueued, in
///    registry order.
/// 2. **Expand:** pop cells FIFO; each unvisited, non-wall, orthogonal
///    neighbour gets `parent + 1` and is enqueued. Every cell is enqueued at
///    most once, so the work is O(rows x columns).
/// 3. **Guide:** each reached non-exit cell points at the neighbour with the
///    strictly smallest distance. Equal candidates resolve to the first one
///    in the scan order.
///
/// Exits, walls and unreached cells get no guidance.
///
/// # Construction
///
/// ```
/// use evac_core::Direction;
/// use evac_field::FieldSolver;
///
/// let solver = FieldSolver::builder()
///     .scan_order([Direction::East, Direction::West, Direction::North, Direction::South])
///     .build()
///     .unwrap();
/// assert_eq!(solver.scan_order()[0], Direction::East);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSolver {
    scan_order: [Direction; 4],
}

/// Builder for [`FieldSolver`].
pub struct FieldSolverBuilder {
    scan_order: [Direction; 4],
}

impl Default for FieldSolver {
    fn default() -> Self {
        Self {
            scan_order: Direction::ALL,
        }
    }
}

impl FieldSolver {
    /// Create a new builder. Defaults to [`Direction::ALL`] order.
    pub fn builder() -> FieldSolverBuilder {
        FieldSolverBuilder {
            scan_order: Direction::ALL,
        }
    }

    /// Neighbour order used for BFS expansion and guidance tie-breaking.
    pub fn scan_order(&self) -> &[Direction; 4] {
        &self.scan_order
    }

    /// Compute fields for `grid` without modifying it.
    ///
    /// With no exits every distance is [`Distance::UNREACHED`] and every
    /// guidance is `None`; `summary.exits` is 0.
    pub fn compute(&self, grid: &Grid) -> SolvedField {
        let n = grid.cell_count();
        let cells = grid.cells();
        let mut distances = vec![Distance::UNREACHED; n];
        let mut guidance: Vec<Option<Direction>> = vec![None; n];
        // BFS scratch. Lives only for this call.
        let mut visited = vec![false; n];
        let mut queue = VecDeque::with_capacity(n);

        let mut exits = 0;
        for exit in grid.exits() {
            let Ok(index) = grid.index_of(exit) else {
                continue;
            };
            if visited[index] {
                continue;
            }
            visited[index] = true;
            distances[index] = Distance::ZERO;
            queue.push_back(index);
            exits += 1;
        }

        while let Some(index) = queue.pop_front() {
            let next = distances[index].next_level();
            for (_, nb) in grid.neighbours(index, &self.scan_order) {
                if visited[nb] || !cells[nb].classification().is_walkable() {
                    continue;
                }
                visited[nb] = true;
                distances[nb] = next;
                queue.push_back(nb);
            }
        }

        let mut reached = 0;
        let mut unreached_walkable = 0;
        let mut max_distance = None;
        for index in 0..n {
            let own = distances[index];
            let Some(hops) = own.get() else {
                if cells[index].classification().is_walkable() {
                    unreached_walkable += 1;
                }
                continue;
            };
            reached += 1;
            max_distance = max_distance.max(Some(hops));
            if hops == 0 {
                continue;
            }

            let mut best = own;
            for (dir, nb) in grid.neighbours(index, &self.scan_order) {
                if distances[nb] < best {
                    best = distances[nb];
                    guidance[index] = Some(dir);
                }
            }
        }

        SolvedField {
            field: NavField {
                distances,
                guidance,
            },
            summary: FieldSummary {
                exits,
                reached,
                unreached_walkable,
                max_distance,
                revision: grid.revision(),
            },
        }
    }

    /// Compute fields and store them on `grid`.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::NoExitsDefined`] when the exit registry is
    /// empty. The grid is still updated: every cell is left unreached with
    /// no guidance.
    pub fn solve(&self, grid: &mut Grid) -> Result<FieldSummary, SolveError> {
        let SolvedField { field, summary } = self.compute(grid);
        grid.install_fields(field)
            .expect("solver buffers are sized from the grid they are installed on");

        if summary.exits == 0 {
            tracing::debug!(revision = summary.revision, "solve found no exits");
            return Err(SolveError::NoExitsDefined);
        }
        tracing::debug!(
            exits = summary.exits,
            reached = summary.reached,
            unreached = summary.unreached_walkable,
            max_distance = ?summary.max_distance,
            revision = summary.revision,
            "distance field solved"
        );
        Ok(summary)
    }
}

impl FieldSolverBuilder {
    /// Set the neighbour scan order. Must name each direction exactly once.
    pub fn scan_order(mut self, order: [Direction; 4]) -> Self {
        self.scan_order = order;
        self
    }

    /// Build the solver, validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the scan order repeats a direction.
    pub fn build(self) -> Result<FieldSolver, String> {
        let mut seen = [false; 4];
        for d in self.scan_order {
            if std::mem::replace(&mut seen[d as usize], true) {
                return Err(format!("scan_order lists {d} more than once"));
            }
        }
        Ok(FieldSolver {
            scan_order: self.scan_order,
        })
    }
}
