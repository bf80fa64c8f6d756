//! Benchmark venues for the evac navigation-field engine.
//!
//! - [`reference_venue`]: 100x100 grid (10K cells), 20% walls, 4 exits
//! - [`stress_venue`]: 316x316 grid (~100K cells), 20% walls, 16 exits
//! - [`agent_positions`]: deterministic walkable start cells

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use evac_core::CellCoord;
use evac_engine::{Session, SessionConfig};
use evac_grid::Grid;
use evac_test_utils::random_venue;

/// 100x100 venue with 20% walls and 4 exits.
pub fn reference_venue(seed: u64) -> Grid {
    random_venue(100, 100, 0.2, 4, seed)
}

/// 316x316 venue with 20% walls and 16 exits.
pub fn stress_venue(seed: u64) -> Grid {
    random_venue(316, 316, 0.2, 16, seed)
}

/// A session loaded with `grid`'s layout.
pub fn session_for(grid: &Grid) -> Session {
    let session = Session::new(SessionConfig {
        rows: grid.rows(),
        columns: grid.columns(),
        cell_size: grid.cell_size(),
        ..Default::default()
    })
    .unwrap();
    session.load_layout(&grid.layout()).unwrap();
    session
}

/// Up to `count` walkable cells picked by a fixed stride from `seed`.
pub fn agent_positions(grid: &Grid, count: usize, seed: u64) -> Vec<CellCoord> {
    let walkable: Vec<CellCoord> = grid
        .iter()
        .filter(|(_, cell)| cell.classification().is_walkable())
        .map(|(coord, _)| coord)
        .collect();
    if walkable.is_empty() {
        return Vec::new();
    }
    let start = (seed as usize) % walkable.len();
    let stride = walkable.len() / count.max(1) + 1;
    (0..count)
        .map(|i| walkable[(start + i * stride) % walkable.len()])
        .collect()
}
