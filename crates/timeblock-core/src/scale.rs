#![forbid(unsafe_code)]

//! Bidirectional pixel <-> domain-unit scale.
//!
//! A timeline row maps a fixed domain range (one day, in milliseconds) onto
//! the measured container width. The scale is derived state: it is
//! recomputed on every container resize and never persisted.
//!
//! Before the first layout measurement the width is unknown and the scale is
//! [`Scale::UNMEASURED`] (zero pixels per unit). All conversions guard that
//! case explicitly and report "no movement" instead of dividing by zero.

/// Convert a pixel delta into a domain-unit delta.
///
/// Returns `0.0` when `pixels_per_unit` is zero, negative or not finite, or
/// when the result would not be finite.
#[must_use]
pub fn pixels_to_units(pixel_delta: f64, pixels_per_unit: f64) -> f64 {
    if !(pixels_per_unit.is_finite() && pixels_per_unit > 0.0) || !pixel_delta.is_finite() {
        return 0.0;
    }
    let units = pixel_delta / pixels_per_unit;
    if units.is_finite() { units } else { 0.0 }
}

/// Convert a domain-unit value into pixels.
///
/// Returns `0.0` for a degenerate scale.
#[must_use]
pub fn units_to_pixels(units: f64, pixels_per_unit: f64) -> f64 {
    if !(pixels_per_unit.is_finite() && pixels_per_unit > 0.0) || !units.is_finite() {
        return 0.0;
    }
    units * pixels_per_unit
}

/// Pixel density of a timeline row.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Scale {
    pixels_per_unit: f64,
}

impl Scale {
    /// Scale before the container has been measured.
    pub const UNMEASURED: Self = Self {
        pixels_per_unit: 0.0,
    };

    /// Scale with an explicit density. Degenerate densities collapse to
    /// [`Scale::UNMEASURED`].
    #[must_use]
    pub fn new(pixels_per_unit: f64) -> Self {
        if pixels_per_unit.is_finite() && pixels_per_unit > 0.0 {
            Self { pixels_per_unit }
        } else {
            Self::UNMEASURED
        }
    }

    /// Scale mapping `domain_range` units onto `width_px` pixels.
    #[must_use]
    pub fn from_width(width_px: f64, domain_range: f64) -> Self {
        if !(domain_range.is_finite() && domain_range > 0.0) {
            return Self::UNMEASURED;
        }
        Self::new(width_px / domain_range)
    }

    /// Pixels per domain unit (0 when unmeasured).
    #[inline]
    #[must_use]
    pub const fn pixels_per_unit(&self) -> f64 {
        self.pixels_per_unit
    }

    /// Whether a usable width has been measured.
    #[inline]
    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.pixels_per_unit > 0.0
    }

    /// Pixel delta to unit delta.
    #[inline]
    #[must_use]
    pub fn to_units(&self, pixel_delta: f64) -> f64 {
        pixels_to_units(pixel_delta, self.pixels_per_unit)
    }

    /// Unit value to pixels.
    #[inline]
    #[must_use]
    pub fn to_pixels(&self, units: f64) -> f64 {
        units_to_pixels(units, self.pixels_per_unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: f64 = 86_400_000.0;
    const HOUR_MS: f64 = 3_600_000.0;

    #[test]
    fn day_over_1200px() {
        let scale = Scale::from_width(1200.0, DAY_MS);
        assert_eq!(scale.pixels_per_unit(), 1200.0 / DAY_MS);
        let units = scale.to_units(500.0);
        assert!((units - 36_000_000.0).abs() < 1e-3);
        assert!((scale.to_pixels(12.0 * HOUR_MS) - 600.0).abs() < 1e-9);
    }

    #[test]
    fn unmeasured_scale_is_no_movement() {
        let scale = Scale::UNMEASURED;
        assert!(!scale.is_measured());
        assert_eq!(scale.to_units(500.0), 0.0);
        assert_eq!(scale.to_pixels(HOUR_MS), 0.0);
        assert_eq!(pixels_to_units(10.0, 0.0), 0.0);
    }

    #[test]
    fn degenerate_inputs_collapse() {
        assert_eq!(Scale::new(-1.0), Scale::UNMEASURED);
        assert_eq!(Scale::new(f64::NAN), Scale::UNMEASURED);
        assert_eq!(Scale::from_width(1200.0, 0.0), Scale::UNMEASURED);
        assert_eq!(Scale::from_width(0.0, DAY_MS), Scale::UNMEASURED);
        assert_eq!(pixels_to_units(f64::INFINITY, 1.0), 0.0);
    }

    #[test]
    fn negative_deltas_convert() {
        assert_eq!(pixels_to_units(-30.0, 0.5), -60.0);
    }
}
