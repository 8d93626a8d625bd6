//! Plinko Drop entry point
//!
//! Headless runner: builds a session from settings and plays drops either one
//! at a time or on the auto-drop schedule with several balls in flight.

use std::path::PathBuf;

use clap::Parser;

use plinko_drop::{ActiveDrop, DropStatus, Result, Session, Settings};

#[derive(Debug, Parser)]
#[command(name = "plinko-drop", version, about = "Drop balls through a Plinko board")]
struct Args {
    /// Settings JSON file; defaults are used when missing
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Peg rows (one slot per row)
    #[arg(long)]
    rows: Option<u32>,

    /// Wager per ball
    #[arg(long)]
    bet: Option<f64>,

    /// Number of balls to drop
    #[arg(long, default_value_t = 10)]
    drops: u32,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Drop on a timer (ms between balls) instead of one at a time
    #[arg(long)]
    auto_interval_ms: Option<f32>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    if let Some(rows) = args.rows {
        settings.rows = rows;
    }
    if let Some(bet) = args.bet {
        settings.bet = bet;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    let mut session = Session::new(settings)?;
    log::info!(
        "Multipliers: {:?}",
        session.layout().multipliers.as_slice()
    );

    match args.auto_interval_ms {
        Some(interval_ms) => run_auto(&mut session, args.drops, interval_ms)?,
        None => run_sequential(&mut session, args.drops),
    }

    let summary = session.summary();
    log::info!(
        "Done: {} dropped, {} scored, {} no-score, {} failed; wagered {:.2}, paid {:.2}, balance {:.2}",
        summary.total_dropped,
        summary.scored,
        summary.no_score,
        summary.failed,
        summary.total_wagered,
        summary.total_paid_out,
        summary.balance
    );
    if let Some(hit) = session.last_hit() {
        log::info!(
            "Last hit: drop {} slot {} at {}x ({})",
            hit.drop_number,
            hit.slot_index,
            hit.multiplier,
            hit.tier.as_str()
        );
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// One ball at a time, stopping when a drop is refused
fn run_sequential(session: &mut Session, drops: u32) {
    for _ in 0..drops {
        if let Err(e) = session.play_drop() {
            log::warn!("Stopping: {}", e);
            break;
        }
    }
}

/// Timer-driven drops with every in-flight ball stepped each frame
fn run_auto(session: &mut Session, drops: u32, interval_ms: f32) -> Result<()> {
    session.set_auto_interval(interval_ms)?;
    session.set_auto_drop(true);

    let frame_ms = session.settings().physics.nominal_frame_ms;
    let mut in_flight: Vec<ActiveDrop> = Vec::new();
    let mut started = 0;

    loop {
        if started < drops {
            for drop in session.tick_auto(frame_ms) {
                if started < drops {
                    started += 1;
                    in_flight.push(drop);
                } else {
                    session.abandon(drop);
                }
            }
            if started >= drops {
                session.set_auto_drop(false);
            }
        }

        for drop in &mut in_flight {
            // Failures are logged and counted by the session
            if let Ok(DropStatus::InFlight { x, y }) = session.advance(drop, frame_ms) {
                log::trace!("Drop #{} at ({:.1}, {:.1})", drop.number(), x, y);
            }
        }
        in_flight.retain(|drop| !drop.is_finished());

        let broke = !session.wallet().can_afford(session.wallet().bet());
        if in_flight.is_empty() && (started >= drops || broke) {
            break;
        }
    }
    Ok(())
}
