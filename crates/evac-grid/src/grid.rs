//! The rectangular venue grid.

use std::fmt;

use evac_core::{CellCoord, Classification, Direction, Distance, GridError};
use indexmap::IndexSet;
use smallvec::SmallVec;

use crate::cell::{Cell, NavState};

/// Solver output ready to be installed on a grid with
/// [`Grid::install_fields`]. Both vectors are in row-major cell order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavField {
    /// Per-cell hop count to the nearest exit.
    pub distances: Vec<Distance>,
    /// Per-cell step toward the nearest exit.
    pub guidance: Vec<Option<Direction>>,
}

/// A `rows x columns` grid of cells with an exit registry and a spawn
/// reference.
///
/// Cells are stored in row-major order: index `row * columns + column`.
/// Neighbourhood is 4-connected; cells on the border simply have fewer
/// neighbours (nothing wraps).
///
/// # Examples
///
/// ```
/// use evac_core::{CellCoord, Classification};
/// use evac_grid::Grid;
///
/// let mut grid = Grid::new(5, 5, 1.0).unwrap();
/// grid.set_classification(CellCoord::new(4, 4), Classification::Exit).unwrap();
/// assert_eq!(grid.exits().collect::<Vec<_>>(), vec![CellCoord::new(4, 4)]);
/// ```
#[derive(Clone, Debug)]
pub struct Grid {
    rows: u32,
    columns: u32,
    cell_size: f32,
    cells: Vec<Cell>,
    exits: IndexSet<CellCoord>,
    spawn: Option<CellCoord>,
    fields_valid: bool,
    pub(crate) revision: u64,
}

impl Grid {
    /// Maximum dimension size: coordinates use `i32`, so each axis must fit.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Maximum `rows * columns`. Cells are allocated up front, so the
    /// total is capped well below what either axis alone allows.
    pub const MAX_CELLS: u64 = 1 << 24;

    /// Create an all-open grid.
    ///
    /// Returns `Err(GridError::EmptyGrid)` if either dimension is 0,
    /// `Err(GridError::DimensionTooLarge)` if either exceeds `i32::MAX`,
    /// `Err(GridError::TooManyCells)` past [`Grid::MAX_CELLS`], or
    /// `Err(GridError::InvalidCellSize)` unless `cell_size` is finite and
    /// positive.
    pub fn new(rows: u32, columns: u32, cell_size: f32) -> Result<Self, GridError> {
        let count = Self::validate_dimensions(rows, columns, cell_size)?;
        Ok(Self {
            rows,
            columns,
            cell_size,
            cells: (0..count).map(|_| Cell::default()).collect(),
            exits: IndexSet::new(),
            spawn: None,
            fields_valid: false,
            revision: 0,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// World units per cell edge.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Bumped on every classification change and structural rebuild.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether distance and guidance reflect the current layout.
    pub fn fields_valid(&self) -> bool {
        self.fields_valid
    }

    /// Exit cells in registration order.
    pub fn exits(&self) -> impl ExactSizeIterator<Item = CellCoord> + '_ {
        self.exits.iter().copied()
    }

    /// Number of registered exits.
    pub fn exit_count(&self) -> usize {
        self.exits.len()
    }

    /// The current spawn cell, if one is set.
    pub fn spawn(&self) -> Option<CellCoord> {
        self.spawn
    }

    // ── Addressing ──────────────────────────────────────────────

    /// Whether `coord` lies inside the grid.
    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.column >= 0
            && coord.row >= 0
            && (coord.column as u32) < self.columns
            && (coord.row as u32) < self.rows
    }

    /// Row-major index of `coord`.
    pub fn index_of(&self, coord: CellCoord) -> Result<usize, GridError> {
        if !self.contains(coord) {
            return Err(GridError::OutOfBounds {
                coord,
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(coord.row as usize * self.columns as usize + coord.column as usize)
    }

    /// Coordinate of the cell at row-major `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= cell_count()`.
    pub fn coord_of(&self, index: usize) -> CellCoord {
        assert!(index < self.cells.len(), "cell index {index} out of range");
        let columns = self.columns as usize;
        CellCoord::new((index % columns) as i32, (index / columns) as i32)
    }

    /// Index of the neighbour of `index` in `direction`, or `None` at the border.
    pub fn neighbour(&self, index: usize, direction: Direction) -> Option<usize> {
        let next = self.coord_of(index).step(direction);
        self.index_of(next).ok()
    }

    /// In-grid neighbours of `index`, visited in `order`.
    pub fn neighbours(
        &self,
        index: usize,
        order: &[Direction; 4],
    ) -> SmallVec<[(Direction, usize); 4]> {
        order
            .iter()
            .filter_map(|&d| self.neighbour(index, d).map(|n| (d, n)))
            .collect()
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cell at `coord`.
    pub fn cell(&self, coord: CellCoord) -> Result<&Cell, GridError> {
        let i = self.index_of(coord)?;
        Ok(&self.cells[i])
    }

    /// Iterate `(coord, cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (self.coord_of(i), c))
    }

    // ── Read-only queries ───────────────────────────────────────

    /// Classification of the cell at `coord`.
    pub fn classification_of(&self, coord: CellCoord) -> Result<Classification, GridError> {
        Ok(self.cell(coord)?.classification)
    }

    /// Solved hop count at `coord`; [`Distance::UNREACHED`] while fields are stale.
    pub fn distance_of(&self, coord: CellCoord) -> Result<Distance, GridError> {
        Ok(self.cell(coord)?.nav.distance)
    }

    /// Solved step direction at `coord`.
    pub fn guidance_of(&self, coord: CellCoord) -> Result<Option<Direction>, GridError> {
        Ok(self.cell(coord)?.nav.guidance)
    }

    /// Solved guidance as a unit vector `[dx, dy]` from this cell's centre
    /// toward the chosen neighbour's centre.
    pub fn guidance_vector_of(&self, coord: CellCoord) -> Result<Option<[f32; 2]>, GridError> {
        Ok(self.guidance_of(coord)?.map(Direction::unit_vector))
    }

    /// Agents presently in the cell at `coord`.
    pub fn current_occupants_of(&self, coord: CellCoord) -> Result<u32, GridError> {
        Ok(self.cell(coord)?.occupancy.current())
    }

    /// Peak occupant count at `coord` since the last occupancy reset.
    pub fn peak_occupants_of(&self, coord: CellCoord) -> Result<u32, GridError> {
        Ok(self.cell(coord)?.occupancy.peak())
    }

    // ── World geometry ──────────────────────────────────────────

    /// World position of a cell's centre. The grid origin is the top-left
    /// corner of cell `(0, 0)`.
    pub fn cell_center(&self, coord: CellCoord) -> Result<[f32; 2], GridError> {
        self.index_of(coord)?;
        let half = self.cell_size / 2.0;
        Ok([
            coord.column as f32 * self.cell_size + half,
            coord.row as f32 * self.cell_size + half,
        ])
    }

    /// The cell containing world position `(x, y)`, or `None` outside the grid.
    pub fn cell_at_point(&self, x: f32, y: f32) -> Option<CellCoord> {
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return None;
        }
        let column = (x / self.cell_size).floor();
        let row = (y / self.cell_size).floor();
        if column >= self.columns as f32 || row >= self.rows as f32 {
            return None;
        }
        Some(CellCoord::new(column as i32, row as i32))
    }

    // ── Mutation ────────────────────────────────────────────────

    /// Reclassify one cell, keeping the exit registry and spawn reference
    /// consistent. Returns the previous classification.
    ///
    /// - Leaving `Exit` removes the cell from the registry (order of the
    ///   remaining exits is kept).
    /// - Leaving `Spawn` clears the spawn reference.
    /// - Becoming `Exit` appends to the registry.
    /// - Becoming `Spawn` reverts any other spawn cell to `Open`.
    ///
    /// Any actual change bumps the revision and clears solved fields.
    /// Occupancy is untouched.
    pub fn set_classification(
        &mut self,
        coord: CellCoord,
        classification: Classification,
    ) -> Result<Classification, GridError> {
        let index = self.index_of(coord)?;
        let previous = self.cells[index].classification;
        if previous == classification {
            return Ok(previous);
        }

        match previous {
            Classification::Exit => {
                self.exits.shift_remove(&coord);
            }
            Classification::Spawn => {
                if self.spawn == Some(coord) {
                    self.spawn = None;
                }
            }
            Classification::Open | Classification::Wall => {}
        }

        match classification {
            Classification::Exit => {
                self.exits.insert(coord);
            }
            Classification::Spawn => {
                if let Some(old) = self.spawn.replace(coord) {
                    let old_index = self.index_of(old)?;
                    self.cells[old_index].classification = Classification::Open;
                }
            }
            Classification::Open | Classification::Wall => {}
        }

        self.cells[index].classification = classification;
        self.touch();
        Ok(previous)
    }

    /// Store solver output and mark fields valid.
    ///
    /// Returns `Err(GridError::LayoutMismatch)` if either buffer's length
    /// differs from the cell count; the grid is unchanged in that case.
    pub fn install_fields(&mut self, field: NavField) -> Result<(), GridError> {
        let expected = self.cells.len();
        for actual in [field.distances.len(), field.guidance.len()] {
            if actual != expected {
                return Err(GridError::LayoutMismatch { expected, actual });
            }
        }
        for ((cell, distance), guidance) in self
            .cells
            .iter_mut()
            .zip(field.distances)
            .zip(field.guidance)
        {
            cell.nav = NavState { distance, guidance };
        }
        self.fields_valid = true;
        Ok(())
    }

    /// Zero every cell's occupancy counters.
    pub fn clear_occupancy(&self) {
        for cell in &self.cells {
            cell.occupancy.clear();
        }
    }

    /// Same dimensions, every cell back to `Open` with no fields or
    /// occupants; exit registry and spawn reference cleared.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.reset();
        }
        self.exits.clear();
        self.spawn = None;
        self.fields_valid = false;
        self.revision += 1;
    }

    /// Clear distance, guidance and occupancy; keep the layout.
    pub fn reset_fields_only(&mut self) {
        for cell in &mut self.cells {
            cell.nav = NavState::default();
            cell.occupancy.clear();
        }
        self.fields_valid = false;
    }

    /// Discard the grid and rebuild it all-open at the new size.
    ///
    /// Exits and the spawn are lost; callers must paint them again. On
    /// error the grid is left as it was.
    pub fn resize(&mut self, rows: u32, columns: u32, cell_size: f32) -> Result<(), GridError> {
        let revision = self.revision;
        *self = Self::new(rows, columns, cell_size)?;
        self.revision = revision + 1;
        Ok(())
    }

    /// Check dimensions and cell size without allocating. Returns the
    /// cell count.
    pub fn validate_dimensions(
        rows: u32,
        columns: u32,
        cell_size: f32,
    ) -> Result<usize, GridError> {
        if rows == 0 || columns == 0 {
            return Err(GridError::EmptyGrid);
        }
        for (name, value) in [("rows", rows), ("columns", columns)] {
            if value > Self::MAX_DIM {
                return Err(GridError::DimensionTooLarge {
                    name,
                    value,
                    max: Self::MAX_DIM,
                });
            }
        }
        let cells = u64::from(rows) * u64::from(columns);
        let count = match usize::try_from(cells) {
            Ok(count) if cells <= Self::MAX_CELLS => count,
            _ => {
                return Err(GridError::TooManyCells {
                    cells,
                    max: Self::MAX_CELLS,
                })
            }
        };
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize { value: cell_size });
        }
        Ok(count)
    }

    fn touch(&mut self) {
        self.revision += 1;
        if self.fields_valid {
            for cell in &mut self.cells {
                cell.nav = NavState::default();
            }
            self.fields_valid = false;
        }
    }
}

/// One line per row, one glyph per cell (see [`Classification::glyph`]).
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.columns as usize) {
            for cell in row {
                write!(f, "{}", cell.classification.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
