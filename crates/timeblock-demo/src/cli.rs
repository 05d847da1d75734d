#![forbid(unsafe_code)]

//! Command line of the demo binary.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use timeblock::{Handle, Id};

#[derive(Debug, Parser)]
#[command(
    name = "timeblock-demo",
    about = "Load a roster, replay drag gestures on the timeline, and log what happens"
)]
pub struct Cli {
    /// Configuration file (`.toml` or `.json`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Day to show (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Container width in pixels.
    #[arg(long, default_value_t = 1200.0)]
    pub width: f64,

    /// Use the fixed three-employee sample roster.
    #[arg(long)]
    pub sample: bool,

    /// Seed for the random roster.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Gesture to replay as PERIOD:HANDLE:DX, e.g. `3:move:-50` or `1:to:120`.
    /// HANDLE is `from`, `to` or `move`; DX is in pixels. Repeatable.
    #[arg(long = "gesture", value_parser = parse_gesture)]
    pub gestures: Vec<Gesture>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub json_logs: bool,

    /// Log controller transitions (debug level).
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the final roster JSON to stdout.
    #[arg(long)]
    pub dump: bool,
}

/// One scripted drag: grab `handle` of `period_id` and move it `dx` pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub period_id: Id,
    pub handle: Handle,
    pub dx: f64,
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handle = match self.handle {
            Handle::From => "from",
            Handle::To => "to",
            Handle::Move => "move",
        };
        write!(f, "{}:{handle}:{}", self.period_id, self.dx)
    }
}

pub fn parse_gesture(s: &str) -> Result<Gesture, String> {
    let mut parts = s.splitn(3, ':');
    let (Some(period), Some(handle), Some(dx)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected PERIOD:HANDLE:DX, got `{s}`"));
    };
    if period.is_empty() {
        return Err("period id is empty".into());
    }
    let period_id = period
        .parse::<u64>()
        .map_or_else(|_| Id::from(period), Id::Num);
    let handle = match handle.to_ascii_lowercase().as_str() {
        "from" => Handle::From,
        "to" => Handle::To,
        "move" => Handle::Move,
        other => return Err(format!("unknown handle `{other}` (from, to, move)")),
    };
    let dx: f64 = dx
        .parse()
        .map_err(|e| format!("invalid pixel delta `{dx}`: {e}"))?;
    if !dx.is_finite() {
        return Err(format!("pixel delta must be finite, got `{dx}`"));
    }
    Ok(Gesture {
        period_id,
        handle,
        dx,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_gestures() {
        assert_eq!(
            parse_gesture("3:move:-50").unwrap(),
            Gesture {
                period_id: Id::Num(3),
                handle: Handle::Move,
                dx: -50.0
            }
        );
        assert_eq!(parse_gesture("p-1:TO:12.5").unwrap().period_id, Id::from("p-1"));
        assert!(parse_gesture("1:left:5").unwrap_err().contains("unknown handle"));
        assert!(parse_gesture("1:to").is_err());
        assert!(parse_gesture("1:to:NaN").is_err());
        assert!(parse_gesture(":to:1").is_err());
    }

    #[test]
    fn parses_arguments() {
        let cli = Cli::try_parse_from([
            "timeblock-demo",
            "--sample",
            "--date",
            "2024-03-01",
            "--gesture",
            "1:from:-50",
            "--gesture",
            "5:move:25",
        ])
        .unwrap();
        assert!(cli.sample);
        assert_eq!(cli.gestures.len(), 2);
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(cli.width, 1200.0);
    }
}
