//! End-to-end venue scenarios driven through the public session API:
//! draw a venue, solve it, run agents, reset, and reload.

use evac_core::{CellCoord, Classification, Distance, GridError, SolveError};
use evac_engine::{EditMode, Session, SessionConfig, SessionError};
use evac_grid::{Grid, Layout};
use evac_test_utils::{layout_from_ascii, reference_distances};

fn c(column: i32, row: i32) -> CellCoord {
    CellCoord::new(column, row)
}

fn session(rows: u32, columns: u32) -> Session {
    Session::new(SessionConfig {
        rows,
        columns,
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn open_room_single_exit() {
    let mut s = session(5, 5);
    s.arm(EditMode::AddingExit);
    s.paint(c(4, 4), false).unwrap();

    let summary = s.solve().unwrap();
    assert_eq!(summary.exits, 1);
    assert_eq!(summary.reached, 25);
    assert_eq!(summary.max_distance, Some(8));
    assert_eq!(s.distance_of(c(0, 0)).unwrap(), Distance::hops(8));
    assert_eq!(s.guidance_vector_of(c(4, 4)).unwrap(), None);
    // North and west are out of range at the corner; south comes first.
    assert_eq!(s.guidance_vector_of(c(0, 0)).unwrap(), Some([0.0, 1.0]));
}

#[test]
fn wall_with_gap_routes_through_gap() {
    let s = session(5, 5);
    for row in [0, 1, 3, 4] {
        s.apply_edit(c(2, row), EditMode::None, false).unwrap();
    }
    s.apply_edit(c(4, 4), EditMode::AddingExit, false).unwrap();
    s.solve().unwrap();

    assert_eq!(s.guidance_vector_of(c(0, 2)).unwrap(), Some([1.0, 0.0]));
    assert_eq!(s.distance_of(c(0, 2)).unwrap(), Distance::hops(6));
    assert_eq!(s.distance_of(c(0, 0)).unwrap(), Distance::hops(8));
    assert_eq!(s.distance_of(c(2, 0)).unwrap(), Distance::UNREACHED);
}

#[test]
fn no_exits_leaves_everything_unreached() {
    let s = session(4, 3);
    s.apply_edit(c(1, 1), EditMode::None, false).unwrap();
    assert_eq!(s.solve(), Err(SolveError::NoExitsDefined));
    let grid = s.read();
    assert!(grid
        .cells()
        .iter()
        .all(|cell| cell.nav().distance == Distance::UNREACHED && cell.nav().guidance.is_none()));
}

#[test]
fn occupancy_counts_during_run() {
    let s = session(3, 3);
    s.apply_edit(c(0, 0), EditMode::AddingExit, false).unwrap();
    s.start_run().unwrap();

    let at = c(2, 2);
    for _ in 0..3 {
        s.enter(at).unwrap();
    }
    s.leave(at).unwrap();
    assert_eq!(s.current_occupants_of(at), Ok(2));
    assert_eq!(s.peak_occupants_of(at), Ok(3));

    let snap = s.density_snapshot();
    assert_eq!(snap.total_current(), 2);
    assert_eq!(snap.max_peak(), 3);
    assert!(s.finish_run());
}

#[test]
fn reset_then_solve_has_no_exits() {
    let s = session(4, 4);
    s.apply_edit(c(3, 3), EditMode::AddingExit, false).unwrap();
    s.apply_edit(c(0, 0), EditMode::AddingSpawn, false).unwrap();
    s.solve().unwrap();
    s.enter(c(1, 1)).unwrap();

    s.reset().unwrap();
    assert_eq!(s.solve(), Err(SolveError::NoExitsDefined));
    let grid = s.read();
    assert_eq!(grid.exit_count(), 0);
    assert_eq!(grid.spawn(), None);
    assert!(grid
        .cells()
        .iter()
        .all(|cell| cell.classification() == Classification::Open));
    assert_eq!(grid.current_occupants_of(c(1, 1)), Ok(0));
}

#[test]
fn reset_fields_only_keeps_layout_for_next_run() {
    let s = session(4, 4);
    s.apply_edit(c(3, 0), EditMode::AddingExit, false).unwrap();
    s.apply_edit(c(1, 1), EditMode::None, false).unwrap();
    let before = s.layout();

    s.start_run().unwrap();
    s.enter(c(0, 3)).unwrap();
    s.finish_run();

    s.reset_fields_only().unwrap();
    assert_eq!(s.layout(), before);
    assert_eq!(s.distance_of(c(0, 0)).unwrap(), Distance::UNREACHED);
    assert_eq!(s.peak_occupants_of(c(0, 3)), Ok(0));

    let again = s.start_run().unwrap();
    assert_eq!(again.exits, 1);
    assert_eq!(s.distance_of(c(0, 0)).unwrap(), Distance::hops(3));
    s.finish_run();
}

#[test]
fn resize_discards_the_venue() {
    let s = session(3, 3);
    s.apply_edit(c(2, 2), EditMode::AddingExit, false).unwrap();
    s.resize(6, 2, 0.5).unwrap();

    let grid = s.read();
    assert_eq!((grid.rows(), grid.columns()), (6, 2));
    assert_eq!(grid.cell_size(), 0.5);
    assert_eq!(grid.exit_count(), 0);
    drop(grid);
    assert_eq!(
        s.start_run(),
        Err(SessionError::Solve(SolveError::NoExitsDefined))
    );
}

#[test]
fn layout_reload_reproduces_fields() {
    let source = layout_from_ascii(&[
        "S..#....",
        ".#.#.##.",
        ".#...#E.",
        ".####.#.",
        "......#E",
    ]);
    let expected = reference_distances(&source);

    let s = session(2, 2);
    s.load_layout(&source.layout()).unwrap();
    assert_eq!(s.read().spawn(), Some(c(0, 0)));
    s.solve().unwrap();

    let got: Vec<Option<u32>> = s
        .read()
        .cells()
        .iter()
        .map(|cell| cell.nav().distance.get())
        .collect();
    assert_eq!(got, expected);
}

#[test]
fn edit_after_solve_invalidates_until_next_solve() {
    let s = session(3, 3);
    s.apply_edit(c(0, 0), EditMode::AddingExit, false).unwrap();
    let first = s.solve().unwrap();
    assert!(s.read().fields_valid());

    s.apply_edit(c(1, 0), EditMode::None, false).unwrap();
    assert!(!s.read().fields_valid());
    assert_eq!(s.guidance_vector_of(c(2, 0)).unwrap(), None);

    let second = s.solve().unwrap();
    assert!(second.revision > first.revision);
    assert_eq!(s.distance_of(c(2, 0)).unwrap(), Distance::hops(4));
}

#[test]
fn oversized_venues_are_refused_and_keep_the_grid() {
    let s = session(3, 3);
    s.apply_edit(c(2, 2), EditMode::AddingExit, false).unwrap();

    assert!(matches!(
        s.resize(50_000, 50_000, 1.0),
        Err(SessionError::Grid(GridError::TooManyCells { .. }))
    ));
    let huge = Layout {
        rows: Grid::MAX_DIM,
        columns: Grid::MAX_DIM,
        cell_size: 1.0,
        cells: vec![],
    };
    assert!(matches!(
        s.load_layout(&huge),
        Err(SessionError::Grid(GridError::TooManyCells { .. }))
    ));

    assert_eq!(s.read().cell_count(), 9);
    assert_eq!(s.start_run().unwrap().exits, 1);
    s.finish_run();
}
