//! Semantic unit types for the frame inputs supplied by the host
//!
//! The host loop hands the effect a frame delta and a speed multiplier every
//! frame. The multiplier scales every per-step rate in the simulation, so an
//! out-of-range value would either freeze the effect or blow the grid up in a
//! single step. [`SpeedMultiplier`] keeps it inside the range the effect is
//! tuned for.
//!
//! # Usage
//! ```
//! use paper_burn_core::SpeedMultiplier;
//!
//! assert_eq!(SpeedMultiplier::new(2.0).get(), 2.0);
//! assert_eq!(SpeedMultiplier::new(100.0), SpeedMultiplier::MAX);
//! assert_eq!(SpeedMultiplier::new(f32::NAN), SpeedMultiplier::default());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Playback speed multiplier applied to every per-step rate
///
/// Always finite and within `[0.1, 5.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
#[repr(transparent)]
pub struct SpeedMultiplier(f32);

impl SpeedMultiplier {
    /// Slowest supported playback
    pub const MIN: SpeedMultiplier = SpeedMultiplier(0.1);

    /// Fastest supported playback
    pub const MAX: SpeedMultiplier = SpeedMultiplier(5.0);

    /// Real-time playback
    pub const NORMAL: SpeedMultiplier = SpeedMultiplier(1.0);

    /// Create a multiplier, clamping into `[MIN, MAX]`.
    ///
    /// Non-finite input falls back to [`SpeedMultiplier::NORMAL`].
    #[inline]
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            SpeedMultiplier(value.clamp(Self::MIN.0, Self::MAX.0))
        } else {
            Self::NORMAL
        }
    }

    /// Raw multiplier value
    #[inline]
    #[must_use]
    pub const fn get(self) -> f32 {
        self.0
    }
}

impl Default for SpeedMultiplier {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl Deref for SpeedMultiplier {
    type Target = f32;
    #[inline]
    fn deref(&self) -> &f32 {
        &self.0
    }
}

impl From<f32> for SpeedMultiplier {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<SpeedMultiplier> for f32 {
    fn from(value: SpeedMultiplier) -> Self {
        value.0
    }
}

impl fmt::Display for SpeedMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}x", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_multiplier_clamps_range() {
        assert_eq!(SpeedMultiplier::new(0.0).get(), 0.1);
        assert_eq!(SpeedMultiplier::new(-3.0).get(), 0.1);
        assert_eq!(SpeedMultiplier::new(7.5).get(), 5.0);
        assert_eq!(SpeedMultiplier::new(1.5).get(), 1.5);
    }

    #[test]
    fn test_speed_multiplier_non_finite() {
        assert_eq!(SpeedMultiplier::new(f32::INFINITY), SpeedMultiplier::NORMAL);
        assert_eq!(SpeedMultiplier::new(f32::NAN), SpeedMultiplier::NORMAL);
    }

    #[test]
    fn test_speed_multiplier_display() {
        assert_eq!(SpeedMultiplier::new(2.0).to_string(), "2.00x");
    }
}
