//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `dos_core` linkage.
//! - Exercise the dashboard flow against a throwaway in-memory database.

use dos_core::{open_db_in_memory, AuthBackend, SqliteBackend, SystemClock, TaskBoard};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("dos_core ping={}", dos_core::ping());
    println!("dos_core version={}", dos_core::core_version());

    match dashboard_probe() {
        Ok(summary) => {
            println!("dos_core dashboard={summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("dos_core dashboard probe failed: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Signs up a demo account and reports its seeded task counters.
fn dashboard_probe() -> Result<String, Box<dyn std::error::Error>> {
    let conn = open_db_in_memory()?;
    let backend = SqliteBackend::try_new(&conn)?;
    let session = backend.sign_up("demo@dos.local", "demo-password", Some("Démo"))?;

    let clock = SystemClock;
    let board = TaskBoard::attach(&backend, &clock, session.user_id);
    let stats = board.stats();
    Ok(format!(
        "tasks={} completed={} progress={}%",
        stats.total, stats.completed, stats.completion_percent
    ))
}
