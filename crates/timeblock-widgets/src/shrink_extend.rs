#![forbid(unsafe_code)]

//! Single-edge drag controller.
//!
//! [`ShrinkExtend`] drives one edge (`from` or `to`) of a period. While the
//! pointer moves it keeps a local preview; on drop it validates the candidate
//! and either commits it through a [`CommitSink`] or reverts.
//!
//! # State Machine
//!
//! ```text
//!            start                 drop (valid)    -> commit, Idle
//!   Idle ─────────────▶ Dragging ──┤
//!     ▲                   │  ▲     drop (invalid)  -> revert, Idle
//!     │                   │  │
//!     │                   └──┘ move: preview = normalize(committed + units(delta))
//!     └── reset / cancel ──┘
//! ```
//!
//! # Invariants
//!
//! 1. When idle, [`ShrinkExtend::value`] returns exactly the committed value.
//! 2. The preview is always normalized: in bounds and on the step grid.
//! 3. Validation runs only at drop. Live previews are never validated.
//! 4. The sink is called at most once per gesture.
//!
//! # Failure Modes
//!
//! - **Invalid drop**: nothing is written, the preview is discarded and the
//!   outcome is [`EdgeOutcome::Reverted`].
//! - **Release at a non-finite coordinate**: the gesture ends with nothing
//!   written and the outcome is [`EdgeOutcome::Cancelled`].
//! - **Unmeasured scale**: deltas convert to 0, so the preview stays at the
//!   committed value.

use std::fmt;

use timeblock_core::{
    DragImagePolicy, Instant, Movement, MovementNoopReason, MovementTracker, Normalizer,
    PointerEvent, Scale, TrackerConfig,
};
use tracing::debug;

use crate::commit::CommitSink;

/// Caller-supplied acceptance test for a dropped value.
pub type Validator = Box<dyn Fn(f64) -> bool>;

/// Why a controller ignored an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The movement tracker produced no movement.
    Tracker(MovementNoopReason),
    /// The period is not editable.
    ReadOnly,
    /// Another handle of the same block is already dragging.
    Busy,
    /// No period with that id.
    UnknownTarget,
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeState {
    Idle,
    Dragging { preview: f64 },
}

/// Result of feeding one event to a [`ShrinkExtend`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeOutcome {
    /// Gesture began; the presentation layer should apply `drag_image`.
    Started { drag_image: DragImagePolicy },
    /// Preview moved to `value`.
    Previewed { value: f64 },
    /// `value` passed validation and was handed to the sink.
    Committed { value: f64 },
    /// `candidate` failed validation; nothing was written.
    Reverted { candidate: f64 },
    /// Released without a usable position; nothing was written.
    Cancelled,
    Ignored { reason: IgnoreReason },
}

/// Drag controller for a single edge value.
pub struct ShrinkExtend {
    tracker: MovementTracker,
    normalizer: Normalizer,
    validator: Option<Validator>,
    state: EdgeState,
}

impl fmt::Debug for ShrinkExtend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShrinkExtend")
            .field("tracker", &self.tracker)
            .field("normalizer", &self.normalizer)
            .field("has_validator", &self.validator.is_some())
            .field("state", &self.state)
            .finish()
    }
}

impl Default for ShrinkExtend {
    fn default() -> Self {
        Self::new(Normalizer::identity(), TrackerConfig::default())
    }
}

impl ShrinkExtend {
    /// Idle controller accepting every in-bounds drop.
    #[must_use]
    pub fn new(normalizer: Normalizer, tracker: TrackerConfig) -> Self {
        Self {
            tracker: MovementTracker::new(tracker),
            normalizer,
            validator: None,
            state: EdgeState::Idle,
        }
    }

    /// Install a drop validator.
    #[must_use]
    pub fn with_validator(mut self, validator: impl Fn(f64) -> bool + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> EdgeState {
        self.state
    }

    #[inline]
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, EdgeState::Dragging { .. })
    }

    #[inline]
    #[must_use]
    pub const fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn set_normalizer(&mut self, normalizer: Normalizer) {
        self.normalizer = normalizer;
    }

    /// Value to display: the preview while dragging, `committed` otherwise.
    #[inline]
    #[must_use]
    pub fn value(&self, committed: f64) -> f64 {
        match self.state {
            EdgeState::Idle => committed,
            EdgeState::Dragging { preview } => preview,
        }
    }

    /// Whether `candidate` would be accepted on drop.
    #[must_use]
    pub fn accepts(&self, candidate: f64) -> bool {
        self.validator.as_ref().is_none_or(|validate| validate(candidate))
    }

    /// Abort the gesture without committing.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.state = EdgeState::Idle;
    }

    /// Feed one pointer event.
    ///
    /// `committed` is the current stored value of the edge, and `scale`
    /// converts pixel deltas into domain units.
    pub fn handle<S>(
        &mut self,
        event: &PointerEvent,
        now: Instant,
        committed: f64,
        scale: Scale,
        sink: &mut S,
    ) -> EdgeOutcome
    where
        S: CommitSink + ?Sized,
    {
        match self.tracker.process(event, now) {
            Movement::Started { drag_image } => {
                debug!(committed, "edge drag started");
                self.state = EdgeState::Dragging { preview: committed };
                EdgeOutcome::Started { drag_image }
            }
            Movement::Moved { delta } => {
                let value = self.candidate(committed, delta, scale);
                self.state = EdgeState::Dragging { preview: value };
                EdgeOutcome::Previewed { value }
            }
            Movement::Dropped { delta } => {
                let candidate = self.candidate(committed, delta, scale);
                self.state = EdgeState::Idle;
                if self.accepts(candidate) {
                    debug!(committed, candidate, "edge drag committed");
                    sink.commit(candidate);
                    EdgeOutcome::Committed { value: candidate }
                } else {
                    debug!(committed, candidate, "edge drag reverted");
                    EdgeOutcome::Reverted { candidate }
                }
            }
            Movement::Cancelled => {
                debug!(committed, "edge drag cancelled");
                self.state = EdgeState::Idle;
                EdgeOutcome::Cancelled
            }
            Movement::Noop { reason } => EdgeOutcome::Ignored {
                reason: IgnoreReason::Tracker(reason),
            },
        }
    }

    fn candidate(&self, committed: f64, delta_px: f64, scale: Scale) -> f64 {
        self.normalizer.normalize(committed + scale.to_units(delta_px))
    }
}
