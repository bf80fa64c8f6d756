//! Test utilities for evac development.
//!
//! Provides ASCII venue fixtures, an independent reference distance
//! computation for checking the field solver, and seeded random venues
//! for property tests and benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::VecDeque;

use evac_core::{CellCoord, Classification};
use evac_grid::Grid;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Build a grid from rows of glyphs (`.` open, `#` wall, `E` exit,
/// `S` spawn). Cell size is 1.0. Exits register in row-major order.
///
/// # Panics
///
/// Panics on ragged rows, empty input or an unknown glyph.
pub fn layout_from_ascii(rows: &[&str]) -> Grid {
    let columns = rows.first().map(|r| r.chars().count()).unwrap_or(0);
    let mut grid = Grid::new(rows.len() as u32, columns as u32, 1.0).expect("non-empty layout");
    for (row, line) in rows.iter().enumerate() {
        assert_eq!(line.chars().count(), columns, "ragged row {row}: {line:?}");
        for (column, glyph) in line.chars().enumerate() {
            let class = Classification::from_glyph(glyph)
                .unwrap_or_else(|| panic!("unknown glyph {glyph:?} at ({column}, {row})"));
            grid.set_classification(CellCoord::new(column as i32, row as i32), class)
                .expect("in bounds");
        }
    }
    grid
}

/// Shortest orthogonal hop count from each cell to its nearest exit,
/// computed by a separate single-source BFS per exit and taking the minimum.
///
/// Deliberately shares no code with the multi-source solver. `None` for
/// walls and for cells no exit reaches.
pub fn reference_distances(grid: &Grid) -> Vec<Option<u32>> {
    let rows = grid.rows() as i32;
    let columns = grid.columns() as i32;
    let n = grid.cell_count();
    let walkable: Vec<bool> = grid
        .cells()
        .iter()
        .map(|c| c.classification() != Classification::Wall)
        .collect();
    let idx = |col: i32, row: i32| (row * columns + col) as usize;

    let mut best: Vec<Option<u32>> = vec![None; n];
    for exit in grid.exits() {
        let mut dist: Vec<Option<u32>> = vec![None; n];
        let mut queue = VecDeque::new();
        dist[idx(exit.column, exit.row)] = Some(0);
        queue.push_back((exit.column, exit.row));
        while let Some((col, row)) = queue.pop_front() {
            let d = dist[idx(col, row)].unwrap_or(0);
            for (nc, nr) in [(col + 1, row), (col - 1, row), (col, row + 1), (col, row - 1)] {
                if nc < 0 || nr < 0 || nc >= columns || nr >= rows {
                    continue;
                }
                let i = idx(nc, nr);
                if !walkable[i] || dist[i].is_some() {
                    continue;
                }
                dist[i] = Some(d + 1);
                queue.push_back((nc, nr));
            }
        }
        for (b, d) in best.iter_mut().zip(dist) {
            *b = match (*b, d) {
                (Some(x), Some(y)) => Some(x.min(y)),
                (x, y) => x.or(y),
            };
        }
    }
    best
}

/// A seeded random venue: each cell is a wall with probability
/// `wall_density`, then `exits` distinct open cells become exits and, if
/// possible, one more open cell becomes the spawn.
pub fn random_venue(rows: u32, columns: u32, wall_density: f64, exits: usize, seed: u64) -> Grid {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut grid = Grid::new(rows, columns, 1.0).expect("non-empty venue");
    let mut open = Vec::new();
    for index in 0..grid.cell_count() {
        let coord = grid.coord_of(index);
        if rng.random_bool(wall_density.clamp(0.0, 1.0)) {
            grid.set_classification(coord, Classification::Wall)
                .expect("in bounds");
        } else {
            open.push(coord);
        }
    }
    for _ in 0..exits {
        if open.is_empty() {
            break;
        }
        let coord = open.swap_remove(rng.random_range(0..open.len()));
        grid.set_classification(coord, Classification::Exit)
            .expect("in bounds");
    }
    if !open.is_empty() {
        let coord = open.swap_remove(rng.random_range(0..open.len()));
        grid.set_classification(coord, Classification::Spawn)
            .expect("in bounds");
    }
    grid
}

/// Coordinates of every cell with the given classification, row-major.
pub fn cells_classified(grid: &Grid, class: Classification) -> Vec<CellCoord> {
    grid.iter()
        .filter(|(_, cell)| cell.classification() == class)
        .map(|(coord, _)| coord)
        .collect()
}
