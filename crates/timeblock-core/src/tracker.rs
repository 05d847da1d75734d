#![forbid(unsafe_code)]

//! Pointer movement tracking: turns a drag gesture into pixel deltas.
//!
//! [`MovementTracker`] consumes [`PointerEvent`]s and reports, for each one,
//! a [`Movement`] describing its effect. Callers that prefer callbacks pass a
//! [`MovementHandler`] to [`process_with`](MovementTracker::process_with),
//! which is invoked for the same transitions.
//!
//! # State Machine
//!
//! ```text
//! Idle --DragStart--> Tracking { anchor } --DragEnd--> Idle
//!                        |    ^              (non-finite x: Cancelled)
//!                        +Drag+   (throttled)
//! ```
//!
//! # Invariants
//!
//! 1. Every delivered delta is `x - anchor`, computed fresh. Deltas are
//!    never accumulated, so throttled moves lose nothing.
//! 2. The anchor does not move during a gesture.
//! 3. After `DragEnd` (or [`reset`](MovementTracker::reset)) the anchor is
//!    cleared: further `Drag`/`DragEnd` events are no-ops until the next
//!    `DragStart`.
//! 4. No `Moved` is ever reported after the `Dropped` of the same gesture.
//! 5. `DragEnd` is never throttled, and always ends an active gesture.
//!
//! # Failure Modes
//!
//! - Events without an active gesture (stray duplicate end, move before
//!   start) produce [`Movement::Noop`] with [`MovementNoopReason::NoActiveGesture`].
//! - Non-finite start or move coordinates are ignored; the gesture remains
//!   active.
//! - A `DragEnd` with a non-finite coordinate ends the gesture as
//!   [`Movement::Cancelled`]: there is no delta to drop.

use std::time::Duration;

use tracing::{debug, trace};
use web_time::Instant;

use crate::pointer::{DragImagePolicy, PointerEvent, PointerEventKind};
use crate::throttle::{DEFAULT_THROTTLE_INTERVAL, Throttle};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning for a [`MovementTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Minimum spacing between delivered moves (default: 50ms).
    pub throttle_interval: Duration,
    /// Drag feedback announced on gesture start.
    pub drag_image: DragImagePolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            throttle_interval: DEFAULT_THROTTLE_INTERVAL,
            drag_image: DragImagePolicy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Result of feeding one pointer event to the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Movement {
    /// A gesture began; the presentation layer should apply `drag_image`.
    Started { drag_image: DragImagePolicy },
    /// The pointer moved `delta` pixels from the anchor.
    Moved { delta: f64 },
    /// The gesture ended `delta` pixels from the anchor.
    Dropped { delta: f64 },
    /// The gesture ended where the pointer could not be measured.
    Cancelled,
    /// The event was safely ignored.
    Noop { reason: MovementNoopReason },
}

/// Why an event produced no movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementNoopReason {
    /// Move or drop without an active gesture.
    NoActiveGesture,
    /// Move arrived before the throttle interval elapsed.
    Throttled,
    /// Coordinate was NaN or infinite.
    NonFiniteCoordinate,
}

impl Movement {
    /// Whether this outcome is a no-op.
    #[inline]
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::Noop { .. })
    }
}

/// Callbacks driven by a [`MovementTracker`].
pub trait MovementHandler {
    /// Gesture started.
    fn on_start(&mut self) {}

    /// Pointer is `delta` pixels away from the anchor.
    fn on_move(&mut self, delta: f64);

    /// Gesture ended `delta` pixels away from the anchor.
    fn on_drop(&mut self, delta: f64);

    /// Gesture ended without a usable delta.
    fn on_cancel(&mut self) {}
}

/// [`MovementHandler`] assembled from two closures.
pub struct Callbacks<M, D> {
    on_move: M,
    on_drop: D,
}

impl<M, D> std::fmt::Debug for Callbacks<M, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks").finish_non_exhaustive()
    }
}

/// Build a [`MovementHandler`] from `on_move` and `on_drop` closures.
pub fn callbacks<M, D>(on_move: M, on_drop: D) -> Callbacks<M, D>
where
    M: FnMut(f64),
    D: FnMut(f64),
{
    Callbacks { on_move, on_drop }
}

impl<M, D> MovementHandler for Callbacks<M, D>
where
    M: FnMut(f64),
    D: FnMut(f64),
{
    fn on_move(&mut self, delta: f64) {
        (self.on_move)(delta);
    }

    fn on_drop(&mut self, delta: f64) {
        (self.on_drop)(delta);
    }
}

// ---------------------------------------------------------------------------
// MovementTracker
// ---------------------------------------------------------------------------

/// Stateful tracker for one draggable element.
///
/// One tracker per handle: trackers share nothing, so drags on distinct
/// elements are independent.
#[derive(Debug, Clone)]
pub struct MovementTracker {
    config: TrackerConfig,
    anchor: Option<f64>,
    throttle: Throttle,
}

impl Default for MovementTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl MovementTracker {
    /// Create a tracker with the given configuration.
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            throttle: Throttle::new(config.throttle_interval),
            config,
            anchor: None,
        }
    }

    /// Whether a gesture is in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    /// Anchor coordinate of the active gesture.
    #[inline]
    #[must_use]
    pub fn anchor(&self) -> Option<f64> {
        self.anchor
    }

    /// Current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect on the next gesture; an
    /// active gesture keeps its throttle.
    pub fn set_config(&mut self, config: TrackerConfig) {
        self.config = config;
        if self.anchor.is_none() {
            self.throttle = Throttle::new(config.throttle_interval);
        }
    }

    /// Abort the active gesture without a drop.
    pub fn reset(&mut self) {
        if self.anchor.take().is_some() {
            debug!("movement tracker reset mid-gesture");
        }
        self.throttle.reset();
    }

    /// Feed one event and report its effect.
    pub fn process(&mut self, event: &PointerEvent, now: Instant) -> Movement {
        if !event.x.is_finite() {
            if event.kind == PointerEventKind::DragEnd && self.anchor.take().is_some() {
                debug!("gesture released at a non-finite coordinate");
                self.throttle.reset();
                return Movement::Cancelled;
            }
            return Movement::Noop {
                reason: MovementNoopReason::NonFiniteCoordinate,
            };
        }

        match event.kind {
            PointerEventKind::DragStart => {
                if self.throttle.interval() != self.config.throttle_interval {
                    self.throttle = Throttle::new(self.config.throttle_interval);
                }
                if let Some(previous) = self.anchor {
                    debug!(previous, anchor = event.x, "re-anchoring active gesture");
                }
                self.anchor = Some(event.x);
                self.throttle.reset();
                Movement::Started {
                    drag_image: self.config.drag_image,
                }
            }
            PointerEventKind::Drag => {
                let Some(anchor) = self.anchor else {
                    return Movement::Noop {
                        reason: MovementNoopReason::NoActiveGesture,
                    };
                };
                if !self.throttle.try_acquire(now) {
                    trace!(x = event.x, "drag move throttled");
                    return Movement::Noop {
                        reason: MovementNoopReason::Throttled,
                    };
                }
                Movement::Moved {
                    delta: event.x - anchor,
                }
            }
            PointerEventKind::DragEnd => {
                let Some(anchor) = self.anchor.take() else {
                    return Movement::Noop {
                        reason: MovementNoopReason::NoActiveGesture,
                    };
                };
                self.throttle.reset();
                Movement::Dropped {
                    delta: event.x - anchor,
                }
            }
        }
    }

    /// Feed one event, invoking `handler` for the resulting transition.
    pub fn process_with<H>(&mut self, event: &PointerEvent, now: Instant, handler: &mut H) -> Movement
    where
        H: MovementHandler + ?Sized,
    {
        let movement = self.process(event, now);
        match movement {
            Movement::Started { .. } => handler.on_start(),
            Movement::Moved { delta } => handler.on_move(delta),
            Movement::Dropped { delta } => handler.on_drop(delta),
            Movement::Cancelled => handler.on_cancel(),
            Movement::Noop { .. } => {}
        }
        movement
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
