//! Evac quickstart: draw a venue, solve it, walk agents out.
//!
//! Demonstrates:
//!   1. Creating a Session from a SessionConfig
//!   2. Painting walls, an exit and a spawn with the one-shot edit modes
//!   3. Starting a run (solve + edit lock) and reading guidance
//!   4. Counting agents with enter/leave and reading the density snapshot
//!   5. Resetting fields between runs
//!
//! Run with:
//!   RUST_LOG=evac_engine=debug cargo run --example quickstart

use evac_core::{CellCoord, Distance};
use evac_engine::{EditMode, Session, SessionConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ─── Venue ──────────────────────────────────────────────────────

const ROWS: u32 = 7;
const COLS: u32 = 9;
const AGENTS: usize = 5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("evac_engine=info,evac_field=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    let mut session = Session::new(SessionConfig {
        rows: ROWS,
        columns: COLS,
        cell_size: 0.5,
        ..Default::default()
    })?;

    // A partition down column 4 with a single doorway at row 3.
    for row in 0..ROWS as i32 {
        if row != 3 {
            session.apply_edit(CellCoord::new(4, row), EditMode::None, false)?;
        }
    }
    session.arm(EditMode::AddingExit);
    session.paint(CellCoord::new(8, 6), false)?;
    session.arm(EditMode::AddingSpawn);
    session.paint(CellCoord::new(0, 0), false)?;

    println!("{}", *session.read());

    let summary = session.start_run()?;
    println!(
        "solved: {} exits, {} reachable cells, farthest {} hops",
        summary.exits,
        summary.reached,
        summary.max_distance.unwrap_or(0)
    );

    // Walk agents from the spawn along the guidance field.
    let spawn = session.read().spawn().ok_or("venue has no spawn")?;
    for _ in 0..AGENTS {
        let mut at = spawn;
        session.enter(at)?;
        while session.distance_of(at)? != Distance::ZERO {
            let Some(dir) = session.read().guidance_of(at)? else {
                break;
            };
            let next = at.step(dir);
            session.enter(next)?;
            session.leave(at)?;
            at = next;
        }
        session.leave(at)?;
    }

    let density = session.density_snapshot();
    println!(
        "after run: {} agents left inside, busiest cell peaked at {}",
        density.total_current(),
        density.max_peak()
    );
    let doorway = CellCoord::new(4, 3);
    println!(
        "doorway {doorway}: distance {}, peak {}",
        session.distance_of(doorway)?,
        session.peak_occupants_of(doorway)?
    );
    session.finish_run();

    session.reset_fields_only()?;
    println!("fields cleared, layout kept: {} exits", session.read().exit_count());

    session.shutdown();
    Ok(())
}
