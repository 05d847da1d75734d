#![forbid(unsafe_code)]

//! Whole-period move controller.
//!
//! [`MoveDrag`] translates both edges of a period by one shared diff. It keeps
//! a single `shift` (0 when idle) so the block moves as a rigid body, and
//! commits through one [`ShiftSink`] call so the store never observes a
//! half-moved period.
//!
//! # Invariants
//!
//! 1. The live shift always lies in `[min - from, max - to]` and on the step
//!    grid when a grid point exists in that range.
//! 2. The shift returns to 0 after every drop, valid or not, and after a
//!    release at a non-finite coordinate.
//! 3. A drop with a zero diff does not call the sink.
//! 4. A drop is valid when `from + diff >= min` and `to + diff <= max`.
//!
//! # Failure Modes
//!
//! - **Span longer than the bounds**: the legal range is empty, the clamped
//!   diff fails validation, and the drop reverts.

use timeblock_core::normalize::clamp_and_round;
use timeblock_core::{
    DragImagePolicy, Instant, Movement, MovementTracker, Normalizer, PointerEvent, Scale,
    TrackerConfig,
};
use tracing::debug;

use crate::commit::ShiftSink;
use crate::shrink_extend::IgnoreReason;

/// Committed edges of the period being moved, in domain units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub from: f64,
    pub to: f64,
}

impl Span {
    #[must_use]
    pub const fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    /// Span translated by `diff`.
    #[must_use]
    pub fn shifted(self, diff: f64) -> Self {
        Self {
            from: self.from + diff,
            to: self.to + diff,
        }
    }
}

/// Result of feeding one event to a [`MoveDrag`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// Gesture began; the presentation layer should apply `drag_image`.
    Started { drag_image: DragImagePolicy },
    /// Live shift changed.
    Previewed { shift: f64 },
    /// `diff` passed validation and was handed to the sink.
    Committed { diff: f64 },
    /// Dropped where it started; nothing to write.
    Unchanged,
    /// `diff` failed validation; nothing was written.
    Reverted { diff: f64 },
    /// Released without a usable position; nothing was written.
    Cancelled,
    Ignored { reason: IgnoreReason },
}

/// Drag controller moving a whole period.
#[derive(Debug, Clone)]
pub struct MoveDrag {
    tracker: MovementTracker,
    bounds: Normalizer,
    shift: f64,
    dragging: bool,
}

impl Default for MoveDrag {
    fn default() -> Self {
        Self::new(Normalizer::identity(), TrackerConfig::default())
    }
}

impl MoveDrag {
    /// Idle controller. `bounds` supplies the legal `[min, max]` for both
    /// edges and the rounding step.
    #[must_use]
    pub fn new(bounds: Normalizer, tracker: TrackerConfig) -> Self {
        Self {
            tracker: MovementTracker::new(tracker),
            bounds,
            shift: 0.0,
            dragging: false,
        }
    }

    /// Live translation; 0 when idle.
    #[inline]
    #[must_use]
    pub const fn shift(&self) -> f64 {
        self.shift
    }

    #[inline]
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.dragging
    }

    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> &Normalizer {
        &self.bounds
    }

    /// Clamp `diff` so the span stays in bounds, then round it to the step.
    #[must_use]
    pub fn normalize_diff(&self, diff: f64, span: Span) -> f64 {
        clamp_and_round(
            diff,
            self.bounds.min() - span.from,
            self.bounds.max() - span.to,
            self.bounds.step(),
        )
    }

    /// Whether moving `span` by `diff` keeps both edges in bounds.
    #[must_use]
    pub fn validate_diff(&self, diff: f64, span: Span) -> bool {
        diff.is_finite()
            && span.from + diff >= self.bounds.min()
            && span.to + diff <= self.bounds.max()
    }

    /// Abort the gesture without committing.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.shift = 0.0;
        self.dragging = false;
    }

    /// Feed one pointer event. `span` holds the committed edges.
    pub fn handle<S>(
        &mut self,
        event: &PointerEvent,
        now: Instant,
        span: Span,
        scale: Scale,
        sink: &mut S,
    ) -> MoveOutcome
    where
        S: ShiftSink + ?Sized,
    {
        match self.tracker.process(event, now) {
            Movement::Started { drag_image } => {
                debug!(from = span.from, to = span.to, "move drag started");
                self.shift = 0.0;
                self.dragging = true;
                MoveOutcome::Started { drag_image }
            }
            Movement::Moved { delta } => {
                self.shift = self.normalize_diff(scale.to_units(delta), span);
                MoveOutcome::Previewed { shift: self.shift }
            }
            Movement::Dropped { delta } => {
                let diff = self.normalize_diff(scale.to_units(delta), span);
                self.shift = 0.0;
                self.dragging = false;
                if !self.validate_diff(diff, span) {
                    debug!(diff, "move drag reverted");
                    MoveOutcome::Reverted { diff }
                } else if diff == 0.0 {
                    MoveOutcome::Unchanged
                } else {
                    debug!(diff, "move drag committed");
                    sink.commit_shift(diff);
                    MoveOutcome::Committed { diff }
                }
            }
            Movement::Cancelled => {
                debug!(shift = self.shift, "move drag cancelled");
                self.shift = 0.0;
                self.dragging = false;
                MoveOutcome::Cancelled
            }
            Movement::Noop { reason } => MoveOutcome::Ignored {
                reason: IgnoreReason::Tracker(reason),
            },
        }
    }
}
