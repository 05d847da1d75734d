#![forbid(unsafe_code)]

//! Interval throttle for high-frequency pointer moves.
//!
//! Drag sources can emit a move event for every pixel of travel. The
//! [`Throttle`] lets at most one event through per configured interval:
//! the first call after [`reset`](Throttle::reset) always passes, later
//! calls pass once `interval` has elapsed since the last accepted one.
//!
//! Unlike latest-wins coalescing, a throttled event is simply dropped. That is sufficient for
//! drag tracking because every delivered move recomputes its delta from the
//! gesture anchor, so nothing accumulates across skipped events.
//!
//! # Invariants
//!
//! 1. Two accepted events are never closer than `interval` apart.
//! 2. A zero interval accepts every event.
//! 3. Time going backwards (non-monotonic test clocks) never accepts an
//!    event early; it is treated as zero elapsed time.

use std::time::Duration;

use web_time::Instant;

/// Default minimum spacing between delivered drag moves.
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(50);

/// Time-based interval throttle.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_accepted: Option<Instant>,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE_INTERVAL)
    }
}

impl Throttle {
    /// Create a throttle with the given minimum spacing.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: None,
        }
    }

    /// Configured minimum spacing.
    #[inline]
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` and records `now` if an event may pass.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        let ready = match self.last_accepted {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if ready {
            self.last_accepted = Some(now);
        }
        ready
    }

    /// Forget the last accepted event so the next call passes.
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}
