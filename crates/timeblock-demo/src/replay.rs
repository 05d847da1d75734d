#![forbid(unsafe_code)]

//! Scripted gesture playback against a [`Timeline`].
//!
//! Each gesture is a drag start at x = 0, a few intermediate moves spaced
//! [`FRAME`] apart (some of which the throttle swallows), and a drop at `dx`.
//! Time comes from a synthetic clock so runs are reproducible.

use std::time::Duration;

use timeblock::{BlockOutcome, Instant, PointerEvent, RosterSource, Target, Timeline};
use tracing::{debug, info};

use crate::cli::Gesture;

/// Spacing between synthetic pointer events.
pub const FRAME: Duration = Duration::from_millis(16);
/// Intermediate moves per gesture.
pub const MOVES: u32 = 6;

/// Synthetic monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    now: Instant,
}

impl Clock {
    #[must_use]
    pub fn start() -> Self {
        Self {
            now: Instant::now(),
        }
    }

    pub fn tick(&mut self) -> Instant {
        self.now += FRAME;
        self.now
    }
}

/// Counts of what happened during one gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub previews: u32,
    pub ignored: u32,
}

/// Replay `gesture`, returning the drop outcome.
pub fn replay<S: RosterSource>(
    timeline: &mut Timeline<S>,
    gesture: &Gesture,
    clock: &mut Clock,
) -> (BlockOutcome, ReplayStats) {
    let target = Target::new(gesture.period_id.clone(), gesture.handle);
    let mut stats = ReplayStats::default();

    let started = timeline.dispatch(&target, &PointerEvent::start(0.0), clock.tick());
    if let BlockOutcome::Ignored(reason) = started {
        info!(%gesture, ?reason, "gesture ignored");
        return (started, stats);
    }

    for i in 1..=MOVES {
        let x = gesture.dx * f64::from(i) / f64::from(MOVES + 1);
        match timeline.dispatch(&target, &PointerEvent::drag(x), clock.tick()) {
            BlockOutcome::Ignored(_) => stats.ignored += 1,
            BlockOutcome::Edge(timeblock::EdgeOutcome::Ignored { .. })
            | BlockOutcome::Move(timeblock::MoveOutcome::Ignored { .. }) => stats.ignored += 1,
            _ => stats.previews += 1,
        }
        if let Some(render) = timeline.render_period(&gesture.period_id) {
            debug!(
                from = render.from_hint.as_deref().unwrap_or("-"),
                to = render.to_hint.as_deref().unwrap_or("-"),
                left_px = render.geometry.left_px,
                width_px = render.geometry.width_px,
                "preview"
            );
        }
    }

    let dropped = timeline.dispatch(&target, &PointerEvent::end(gesture.dx), clock.tick());
    (dropped, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeblock::{EdgeOutcome, Handle, Id, MockBackend, TimelineConfig};

    fn timeline() -> Timeline<MockBackend> {
        let mut timeline = Timeline::new(TimelineConfig::default(), MockBackend::sample()).unwrap();
        timeline.set_day_start(0).unwrap();
        timeline.resize(1200.0);
        timeline
    }

    #[test]
    fn replay_commits_and_throttles() {
        let mut timeline = timeline();
        let mut clock = Clock::start();
        let gesture = Gesture {
            period_id: Id::Num(1),
            handle: Handle::To,
            dx: 100.0,
        };
        let (outcome, stats) = replay(&mut timeline, &gesture, &mut clock);
        assert_eq!(
            outcome,
            BlockOutcome::Edge(EdgeOutcome::Committed {
                value: 21.0 * 3_600_000.0
            })
        );
        assert!(stats.ignored > 0, "16ms frames should hit the 50ms throttle");
        assert_eq!(stats.previews + stats.ignored, MOVES);
    }

    #[test]
    fn replay_on_missing_period() {
        let mut timeline = timeline();
        let mut clock = Clock::start();
        let gesture = Gesture {
            period_id: Id::Num(404),
            handle: Handle::Move,
            dx: 10.0,
        };
        let (outcome, stats) = replay(&mut timeline, &gesture, &mut clock);
        assert!(matches!(outcome, BlockOutcome::Ignored(_)));
        assert_eq!(stats, ReplayStats::default());
    }
}
