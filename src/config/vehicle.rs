//! Tractor-trailer geometry and steering limits.

use serde::{Deserialize, Serialize};

use crate::core::deg_to_rad;

/// Physical parameters of the rig.
///
/// Tractor body extents are measured from the rear axle; trailer body
/// extents are measured from the hitch, which sits `hitch_offset` meters
/// behind the rear axle. The defaults describe a full-size semi-trailer
/// combination with the fifth wheel directly over the rear axle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VehicleConfig {
    /// Tractor wheelbase in meters.
    pub wheelbase: f32,
    /// Maximum steering angle in radians.
    pub max_steer: f32,
    /// Tractor body extent ahead of the rear axle, meters.
    pub tractor_front: f32,
    /// Tractor body extent behind the rear axle, meters.
    pub tractor_back: f32,
    /// Tractor body width, meters.
    pub tractor_width: f32,
    /// Rear-axle-to-hitch distance, meters. The trailer pivots about the
    /// hitch, this far behind the rear axle along the tractor heading.
    pub hitch_offset: f32,
    /// Hitch-to-trailer-axle distance, meters. Governs how fast the
    /// trailer heading follows the tractor.
    pub trailer_wheelbase: f32,
    /// Trailer body extent ahead of the hitch, meters.
    pub trailer_front: f32,
    /// Trailer body extent behind the hitch, meters.
    pub trailer_back: f32,
    /// Trailer body width, meters.
    pub trailer_width: f32,
    /// Maximum allowed articulation angle between tractor and trailer
    /// headings, radians. Poses beyond this are mechanically infeasible.
    pub max_jackknife: f32,
    /// Extra clearance added around both body rectangles, meters.
    pub safety_margin: f32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            wheelbase: 3.7,
            max_steer: 0.6,
            tractor_front: 6.6,
            tractor_back: 1.0,
            tractor_width: 2.6,
            hitch_offset: 0.0,
            trailer_wheelbase: 8.0,
            trailer_front: 1.0,
            trailer_back: 9.0,
            trailer_width: 2.6,
            max_jackknife: deg_to_rad(60.0),
            safety_margin: 0.1,
        }
    }
}

impl VehicleConfig {
    /// Minimum turning radius of the tractor at full steer, meters.
    #[inline]
    pub fn min_turning_radius(&self) -> f32 {
        self.wheelbase / self.max_steer.tan()
    }

    /// Maximum path curvature of the tractor, 1/meters.
    #[inline]
    pub fn max_curvature(&self) -> f32 {
        self.max_steer.tan() / self.wheelbase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_min_turning_radius() {
        let v = VehicleConfig::default();
        assert_relative_eq!(v.min_turning_radius(), 3.7 / 0.6f32.tan(), epsilon = 1e-5);
        assert_relative_eq!(
            v.min_turning_radius() * v.max_curvature(),
            1.0,
            epsilon = 1e-5
        );
    }
}
