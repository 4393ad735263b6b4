//! Continuous state of the tractor-trailer rig.

use serde::{Deserialize, Serialize};

use super::math::{angle_diff, normalize_angle};
use super::point::WorldPoint;

/// Full continuous state of the rig: tractor rear-axle position, tractor
/// heading, and trailer heading.
///
/// The trailer pivots about the hitch, which the vehicle geometry places
/// on or behind the rear axle. Both headings are CCW positive from +X
/// and normalized to (-π, π].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RigPose {
    /// Tractor rear-axle X position in meters.
    pub x: f32,
    /// Tractor rear-axle Y position in meters.
    pub y: f32,
    /// Tractor heading in radians.
    pub yaw: f32,
    /// Trailer heading in radians.
    pub trailer_yaw: f32,
}

impl RigPose {
    /// Create a new rig pose.
    #[inline]
    pub fn new(x: f32, y: f32, yaw: f32, trailer_yaw: f32) -> Self {
        Self {
            x,
            y,
            yaw,
            trailer_yaw,
        }
    }

    /// Rear-axle position.
    #[inline]
    pub fn position(&self) -> WorldPoint {
        WorldPoint::new(self.x, self.y)
    }

    /// Signed articulation angle between tractor and trailer headings,
    /// in (-π, π]. Exceeding the configured limit is a jackknife.
    #[inline]
    pub fn jackknife_angle(&self) -> f32 {
        angle_diff(self.trailer_yaw, self.yaw)
    }

    /// Same pose with both headings normalized to (-π, π].
    #[inline]
    pub fn normalized(&self) -> RigPose {
        RigPose::new(
            self.x,
            self.y,
            normalize_angle(self.yaw),
            normalize_angle(self.trailer_yaw),
        )
    }

    /// Compare against another pose with separate position and heading
    /// tolerances.
    pub fn approx_eq(&self, other: &RigPose, pos_tol: f32, yaw_tol: f32, trailer_tol: f32) -> bool {
        self.position().distance(&other.position()) <= pos_tol
            && angle_diff(self.yaw, other.yaw).abs() <= yaw_tol
            && angle_diff(self.trailer_yaw, other.trailer_yaw).abs() <= trailer_tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_jackknife_angle() {
        let straight = RigPose::new(0.0, 0.0, FRAC_PI_2, FRAC_PI_2);
        assert_relative_eq!(straight.jackknife_angle(), 0.0, epsilon = 1e-6);

        let bent = RigPose::new(0.0, 0.0, 0.3, -0.2);
        assert_relative_eq!(bent.jackknife_angle(), 0.5, epsilon = 1e-6);

        // Wraps across ±π
        let wrapped = RigPose::new(0.0, 0.0, 0.9 * PI, -0.9 * PI);
        assert_relative_eq!(wrapped.jackknife_angle(), -0.2 * PI, epsilon = 1e-5);
    }

    #[test]
    fn test_normalized() {
        let p = RigPose::new(1.0, 2.0, 3.0 * PI, -2.0 * PI).normalized();
        assert_relative_eq!(p.yaw, PI, epsilon = 1e-5);
        assert_relative_eq!(p.trailer_yaw, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_approx_eq() {
        let a = RigPose::new(0.0, 0.0, 0.0, 0.0);
        let b = RigPose::new(0.05, 0.0, 0.01, -0.01);
        assert!(a.approx_eq(&b, 0.1, 0.05, 0.05));
        assert!(!a.approx_eq(&b, 0.01, 0.05, 0.05));
        assert!(!a.approx_eq(&b, 0.1, 0.005, 0.05));
    }
}
