#![forbid(unsafe_code)]

//! Core: pointer movement tracking, pixel/time scale, and value normalization.
//!
//! # Role in Timeblock
//! `timeblock-core` is the input layer. It turns raw drag gestures into pixel
//! deltas, converts pixels into domain units, and normalizes the resulting
//! values. It knows nothing about periods, employees or stores; the drag
//! controllers in `timeblock-widgets` compose these pieces.
//!
//! # Primary responsibilities
//! - **PointerEvent**: canonical drag input (start, move, end) on one axis.
//! - **MovementTracker**: anchor bookkeeping, throttling, no-op diagnostics.
//! - **Scale**: pixels-per-unit derived from a measured container width.
//! - **Normalizer**: clamp-then-round-to-step policy.

pub mod normalize;
pub mod pointer;
pub mod scale;
pub mod throttle;
pub mod tracker;

pub use normalize::{NormalizeError, Normalizer};
pub use pointer::{DragImagePolicy, DropEffect, PointerEvent, PointerEventKind};
pub use scale::{Scale, pixels_to_units, units_to_pixels};
pub use throttle::{DEFAULT_THROTTLE_INTERVAL, Throttle};
pub use tracker::{
    Movement, MovementHandler, MovementNoopReason, MovementTracker, TrackerConfig, callbacks,
};

/// Re-exported so callers can construct timestamps for
/// [`MovementTracker::process`] without depending on `web-time` directly.
pub use web_time::Instant;
