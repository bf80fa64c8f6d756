//! Criterion micro-benchmarks for field solving.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use evac_bench::{reference_venue, stress_venue};
use evac_core::{CellCoord, Classification};
use evac_field::FieldSolver;
use evac_grid::Grid;

/// Benchmark: compute() on the 10K-cell reference venue.
fn bench_compute_reference_10k(c: &mut Criterion) {
    let grid = reference_venue(42);
    let solver = FieldSolver::default();

    c.bench_function("compute_reference_10k", |b| {
        b.iter(|| black_box(solver.compute(black_box(&grid))));
    });
}

/// Benchmark: solve() in place on the ~100K-cell stress venue.
fn bench_solve_stress_100k(c: &mut Criterion) {
    let mut grid = stress_venue(42);
    let solver = FieldSolver::default();

    c.bench_function("solve_stress_100k", |b| {
        b.iter(|| {
            let _ = black_box(solver.solve(&mut grid));
        });
    });
}

/// Benchmark: open 100x100 room with one exit in the corner (worst-case
/// BFS depth).
fn bench_solve_open_room_corner_exit(c: &mut Criterion) {
    let mut grid = Grid::new(100, 100, 1.0).unwrap();
    grid.set_classification(CellCoord::new(99, 99), Classification::Exit)
        .unwrap();
    let solver = FieldSolver::default();

    c.bench_function("solve_open_room_corner_exit", |b| {
        b.iter(|| {
            let _ = black_box(solver.solve(&mut grid));
        });
    });
}

/// Benchmark: toggle a wall then re-solve, the edit-preview loop.
fn bench_edit_then_solve_reference(c: &mut Criterion) {
    let grid = reference_venue(7);
    let solver = FieldSolver::default();
    let target = CellCoord::new(50, 50);

    c.bench_function("edit_then_solve_reference", |b| {
        b.iter_batched(
            || grid.clone(),
            |mut g| {
                let previous = g.classification_of(target).unwrap();
                let next = if previous == Classification::Wall {
                    Classification::Open
                } else {
                    Classification::Wall
                };
                g.set_classification(target, next).unwrap();
                let _ = black_box(solver.solve(&mut g));
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_compute_reference_10k,
    bench_solve_stress_100k,
    bench_solve_open_room_corner_exit,
    bench_edit_then_solve_reference,
);
criterion_main!(benches);
