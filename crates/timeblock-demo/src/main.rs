#![forbid(unsafe_code)]

mod cli;
mod logging;
mod replay;

use std::process::ExitCode;

use clap::Parser;
use timeblock::model::day;
use timeblock::prelude::*;
use timeblock::{BlockOutcome, EdgeOutcome, MoveOutcome};
use tracing::{error, info, warn};

use crate::cli::{Cli, Gesture};
use crate::replay::{Clock, replay};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs);
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "demo failed");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => TimelineConfig::from_file(path)?,
        None => TimelineConfig::default(),
    };
    if cli.sample {
        config.mock.sample = true;
    }
    if cli.seed.is_some() {
        config.mock.seed = cli.seed;
    }

    let backend = config.mock_backend()?;
    let latency = backend.latency();
    let mut timeline = Timeline::new(config, backend)?;
    let date = cli.date.unwrap_or_else(day::today);
    timeline.set_day(date)?;
    timeline.resize(cli.width);
    info!(
        latency_ms = latency.as_millis() as u64,
        width_px = cli.width,
        "timeline ready"
    );

    let gestures = if cli.gestures.is_empty() {
        default_gestures(&timeline)
    } else {
        cli.gestures.clone()
    };
    if gestures.is_empty() {
        warn!("roster is empty, nothing to drag");
    }

    let mut clock = Clock::start();
    for gesture in &gestures {
        let before = timeline.render_period(&gesture.period_id);
        let (outcome, stats) = replay(&mut timeline, gesture, &mut clock);
        let after = timeline.render_period(&gesture.period_id);
        info!(
            %gesture,
            outcome = describe(&outcome),
            previews = stats.previews,
            throttled = stats.ignored,
            "gesture replayed"
        );
        if let (Some(before), Some(after)) = (before, after) {
            println!(
                "{:<16} {:>5}-{:<5} -> {:>5}-{:<5}  {}",
                gesture.to_string(),
                day::format_clock(before.from),
                day::format_clock(before.to),
                day::format_clock(after.from),
                day::format_clock(after.to),
                describe(&outcome),
            );
        }
    }

    for row in timeline.rows().iter().take(5) {
        println!("{:<24} {}", row.name, row.hours_label);
    }
    if cli.dump {
        println!("{}", timeline.store().to_json()?);
    }
    Ok(())
}

/// A move, an extension and an over-eager shrink on the first period.
fn default_gestures<S: timeblock::RosterSource>(timeline: &Timeline<S>) -> Vec<Gesture> {
    let first = timeline.store().with_employees(|employees| {
        employees
            .iter()
            .find_map(|e| e.periods.first())
            .map(|p| p.id.clone())
    });
    let Some(period_id) = first else {
        return Vec::new();
    };
    vec![
        Gesture {
            period_id: period_id.clone(),
            handle: Handle::Move,
            dx: 50.0,
        },
        Gesture {
            period_id: period_id.clone(),
            handle: Handle::To,
            dx: 75.0,
        },
        Gesture {
            period_id,
            handle: Handle::From,
            dx: 400.0,
        },
    ]
}

fn describe(outcome: &BlockOutcome) -> &'static str {
    match outcome {
        BlockOutcome::Edge(EdgeOutcome::Committed { .. })
        | BlockOutcome::Move(MoveOutcome::Committed { .. }) => "committed",
        BlockOutcome::Edge(EdgeOutcome::Reverted { .. })
        | BlockOutcome::Move(MoveOutcome::Reverted { .. }) => "reverted",
        BlockOutcome::Move(MoveOutcome::Unchanged) => "unchanged",
        BlockOutcome::Edge(EdgeOutcome::Cancelled) | BlockOutcome::Move(MoveOutcome::Cancelled) => {
            "cancelled"
        }
        BlockOutcome::Ignored(_)
        | BlockOutcome::Edge(EdgeOutcome::Ignored { .. })
        | BlockOutcome::Move(MoveOutcome::Ignored { .. }) => "ignored",
        BlockOutcome::Edge(_) | BlockOutcome::Move(_) => "in progress",
    }
}
