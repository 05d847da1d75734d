#![forbid(unsafe_code)]

//! Clamp-then-round normalization of domain values.
//!
//! A [`Normalizer`] keeps a raw value inside `[min, max]` and snaps it to a
//! grid of `step` (for a day timeline: 0..=24h in 15 minute steps).
//!
//! # Invariants
//!
//! 1. Clamping happens before rounding, and the result always lies within
//!    `[min, max]`: when rounding would land outside, the nearest grid point
//!    inside the bounds is taken instead.
//! 2. `normalize(normalize(x)) == normalize(x)` for every `x`.
//! 3. When no grid point lies inside `[min, max]` the clamped value is
//!    returned unrounded.
//! 4. NaN is treated as `min`.

use std::fmt;

/// Clamp `value` into `[min, max]`.
///
/// `min` wins if the bounds are inverted.
#[inline]
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Round `value` to the nearest multiple of `step`.
///
/// A non-positive or non-finite `step` leaves `value` unchanged.
#[inline]
#[must_use]
pub fn round_to_step(value: f64, step: f64) -> f64 {
    if !(step.is_finite() && step > 0.0) {
        return value;
    }
    (value / step).round() * step
}

/// Clamp `value` into `[min, max]` and snap it to the `step` grid, staying
/// inside the bounds.
#[must_use]
pub fn clamp_and_round(value: f64, min: f64, max: f64, step: Option<f64>) -> f64 {
    let clamped = if value.is_nan() {
        min
    } else {
        clamp(value, min, max)
    };
    let Some(step) = step.filter(|s| s.is_finite() && *s > 0.0) else {
        return clamped;
    };

    // Work in grid indices so a re-normalized result maps back to the same
    // index and float products are reproduced exactly.
    let mut index = (clamped / step).round();
    if index * step > max {
        index -= 1.0;
    } else if index * step < min {
        index += 1.0;
    }
    let rounded = index * step;
    if rounded < min || rounded > max {
        clamped
    } else {
        rounded
    }
}

/// Errors from building a [`Normalizer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizeError {
    /// A bound is NaN or infinite.
    NonFiniteBound { min: f64, max: f64 },
    /// `min` is greater than `max`.
    InvertedBounds { min: f64, max: f64 },
    /// Step is zero, negative or not finite.
    InvalidStep { step: f64 },
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteBound { min, max } => {
                write!(f, "normalizer bounds must be finite (min={min}, max={max})")
            }
            Self::InvertedBounds { min, max } => {
                write!(f, "normalizer min {min} exceeds max {max}")
            }
            Self::InvalidStep { step } => {
                write!(f, "normalizer step {step} must be finite and > 0")
            }
        }
    }
}

impl std::error::Error for NormalizeError {}

/// Bounds + step rounding policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    min: f64,
    max: f64,
    step: Option<f64>,
}

impl Normalizer {
    /// Build a normalizer, rejecting inconsistent parameters.
    pub fn new(min: f64, max: f64, step: Option<f64>) -> Result<Self, NormalizeError> {
        if !(min.is_finite() && max.is_finite()) {
            return Err(NormalizeError::NonFiniteBound { min, max });
        }
        if min > max {
            return Err(NormalizeError::InvertedBounds { min, max });
        }
        if let Some(step) = step
            && !(step.is_finite() && step > 0.0)
        {
            return Err(NormalizeError::InvalidStep { step });
        }
        Ok(Self { min, max, step })
    }

    /// Bounds only, no rounding.
    pub fn bounded(min: f64, max: f64) -> Result<Self, NormalizeError> {
        Self::new(min, max, None)
    }

    /// Normalizer that accepts the whole finite line unchanged.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            min: f64::MIN,
            max: f64::MAX,
            step: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    #[inline]
    #[must_use]
    pub const fn step(&self) -> Option<f64> {
        self.step
    }

    /// Clamp into bounds, then round to step.
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        clamp_and_round(value, self.min, self.max, self.step)
    }

    /// Whether `value` lies inside the bounds.
    #[inline]
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::identity()
    }
}
