//! # Registration Demo
//!
//! Runs a scripted registration session against the configured catalog and
//! prints what the pages would show.
//!
//! ## Usage
//! ```bash
//! cargo run -p krs-session --bin krs-demo
//!
//! # Explicit config file
//! cargo run -p krs-session --bin krs-demo -- --config ./krs.toml
//!
//! # More logging
//! RUST_LOG=krs_session=trace cargo run -p krs-session --bin krs-demo
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use krs_core::conflict::{CellState, Timetable};
use krs_core::{SectionCode, Weekday};
use krs_session::{
    ContextKind, ContextView, RegistrationSession, SessionConfig, SessionHandle,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("KRS Registration Demo");
                println!();
                println!("Usage: krs-demo [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Session config file (default: platform config dir)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = SessionConfig::load_or_default(config_path);
    let catalog = config.load_catalog()?;
    info!(courses = catalog.len(), "Starting registration demo");

    let mut session = RegistrationSession::with_ledger(catalog, &config);
    session.authenticate(&true)?;
    let handle = SessionHandle::new(session, config.reset_delay());

    // -------------------------------------------------------------------------
    // Regular registration: pick classes, submit
    // -------------------------------------------------------------------------
    println!("== {} ==", ContextKind::Regular.title());
    let picks = [
        ("IF-101", SectionCode::A),
        ("IF-102", SectionCode::B),
        ("IF-201", SectionCode::C),
    ];
    let mut view = None;
    for (code, section) in picks {
        view = Some(handle.with_session_mut(|s| {
            let id = s
                .search(code)?
                .first()
                .map(|c| c.id.clone())
                .unwrap_or_default();
            s.select_with_section(&id, section)
        })?);
    }
    if let Some(view) = &view {
        print_view(view);
    }

    let grid = handle.with_session(|s| s.timetable(ContextKind::Regular))?;
    print_timetable(&grid);

    handle.with_session_mut(|s| {
        s.open_review(ContextKind::Regular)?;
        s.set_terms_accepted(ContextKind::Regular, true)
    })?;
    let receipt = handle.confirm(ContextKind::Regular)?;
    println!("{} ({})", receipt.message, receipt.record.id);

    tokio::time::sleep(config.reset_delay() + Duration::from_millis(50)).await;
    let stage = handle.with_session(|s| s.stage(ContextKind::Regular));
    println!("Back to: {}", stage);
    println!();

    // -------------------------------------------------------------------------
    // Short-term registration in simulation mode
    // -------------------------------------------------------------------------
    println!("== {} ==", ContextKind::ShortTerm.title());
    let mode = handle.with_session_mut(|s| s.toggle_mode())?;
    println!("Mode: {}", mode);

    let view = handle.with_session_mut(|s| {
        let ids: Vec<String> = s.courses()?.iter().take(3).map(|c| c.id.clone()).collect();
        let mut view = s.view(ContextKind::ShortTerm)?;
        for id in ids {
            view = s.toggle(&id)?;
        }
        Ok::<_, krs_session::SessionError>(view)
    })?;
    print_view(&view);

    for pair in handle.with_session(|s| s.conflicting_pairs(ContextKind::ShortTerm))? {
        println!(
            "  bentrok: {} / {} on {} {}",
            pair.first_code,
            pair.second_code,
            pair.overlap.day.name_id(),
            pair.overlap.time_label()
        );
    }

    if let Err(e) = handle.with_session_mut(|s| s.open_review(ContextKind::ShortTerm)) {
        println!("Review refused: [{}] {}", e.code(), e);
    } else {
        handle.with_session_mut(|s| s.set_terms_accepted(ContextKind::ShortTerm, true))?;
        let receipt = handle.confirm(ContextKind::ShortTerm)?;
        println!("{}", receipt.message);
    }

    let simulations = handle.with_session(|s| s.sink().simulations().len());
    let submitted = handle.with_session(|s| {
        s.sink()
            .submitted(ContextKind::Regular)
            .map(|r| r.total_credits)
    });
    println!();
    println!("Ledger: regular submitted = {:?} SKS, simulations = {}", submitted, simulations);

    Ok(())
}

/// Initializes tracing/logging.
///
/// ## Log Levels
/// Set via `RUST_LOG` environment variable:
/// - `RUST_LOG=debug` - Verbose logging
/// - `RUST_LOG=info` - Normal logging (default)
/// - `RUST_LOG=krs=trace` - Trace krs crates only
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,krs=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}

fn print_view(view: &ContextView) {
    for item in &view.selected {
        let section = item
            .section
            .map(|s| format!(" [{}]", s))
            .unwrap_or_default();
        println!(
            "  {}{}  {}  {} SKS  {}  {}",
            item.course.code,
            section,
            item.course.name,
            item.course.credits,
            item.course.difficulty.label_id(),
            item.course.schedule_label()
        );
    }
    let cost = match view.cost_visibility {
        krs_core::CostVisibility::Shown => format!("  total {}", view.snapshot.total_cost),
        krs_core::CostVisibility::Hidden => String::new(),
    };
    println!("  {}{}", view.snapshot.credit_label(), cost);
    if view.has_conflict {
        println!("  Terdapat bentrok jadwal!");
    }
}

fn print_timetable(grid: &Timetable) {
    print!("{:<13}", "Waktu");
    for day in Weekday::ALL {
        print!("{:<12}", day.name_id());
    }
    println!();

    for row in &grid.rows {
        print!("{:<13}", row.label);
        for cell in &row.cells {
            let text = match cell.state {
                CellState::Free => "·".to_string(),
                CellState::Scheduled => cell.occupants.join(","),
                CellState::Conflicting => format!("{} ✗", cell.occupants.join(",")),
            };
            print!("{:<12}", text);
        }
        println!();
    }
}
