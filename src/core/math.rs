//! Angle and scalar math utilities.
//!
//! All angles are in radians, counter-clockwise positive from the +X axis.
//! A single normalization helper is used everywhere an angle is integrated
//! or discretized, so the wrap at ±π lands in the same bucket for every
//! caller.

use std::f32::consts::PI;

/// Two times PI (full circle in radians).
pub const TWO_PI: f32 = 2.0 * PI;

/// Normalize an angle to (-π, π].
///
/// # Example
/// ```
/// use vahana_plan::core::math::normalize_angle;
/// use std::f32::consts::PI;
///
/// assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-5);
/// assert!((normalize_angle(-PI) - PI).abs() < 1e-6);
/// assert!((normalize_angle(PI / 2.0) - PI / 2.0).abs() < 1e-6);
/// ```
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % TWO_PI;
    if a > PI {
        a -= TWO_PI;
    } else if a <= -PI {
        a += TWO_PI;
    }
    a
}

/// Signed angular difference from `from` to `to`, in (-π, π].
///
/// Positive result means counter-clockwise rotation from `from` to `to`.
#[inline]
pub fn angle_diff(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Convert degrees to radians.
#[inline]
pub fn deg_to_rad(deg: f32) -> f32 {
    deg * PI / 180.0
}

/// Square of a value.
#[inline]
pub fn sq(x: f32) -> f32 {
    x * x
}
