//! Swept-volume collision checking for the articulated rig.
//!
//! The footprint at a pose is the union of two oriented rectangles: the
//! tractor body around the rear axle and the trailer body trailing the
//! hitch, which sits the configured rear-to-hitch distance behind the
//! rear axle. Each check first gates on the jackknife limit, then queries
//! the obstacle k-d tree within each body's bounding radius and tests the
//! returned points in the body's local frame.

use crate::config::VehicleConfig;
use crate::core::{RigPose, WorldPoint};
use crate::obstacles::ObstacleSet;

/// One oriented body rectangle, anchored at the rear axle / hitch point.
///
/// The rectangle spans `[-back, front]` along the body heading and is
/// centered laterally, so its center sits `offset` ahead of the anchor.
#[derive(Clone, Copy, Debug)]
struct BodyRect {
    offset: f32,
    half_length: f32,
    half_width: f32,
    bounding_radius: f32,
}

impl BodyRect {
    fn new(front: f32, back: f32, width: f32, margin: f32) -> Self {
        let half_length = (front + back) / 2.0 + margin;
        let half_width = width / 2.0 + margin;
        Self {
            offset: (front - back) / 2.0,
            half_length,
            half_width,
            bounding_radius: (half_length * half_length + half_width * half_width).sqrt(),
        }
    }

    /// World position of the rectangle center for an anchor at `anchor`
    /// with the body heading `yaw`.
    fn center(&self, anchor: WorldPoint, yaw: f32) -> WorldPoint {
        WorldPoint::new(
            anchor.x + self.offset * yaw.cos(),
            anchor.y + self.offset * yaw.sin(),
        )
    }

    /// True if any obstacle point falls inside the rectangle.
    fn hits(&self, anchor: WorldPoint, yaw: f32, obstacles: &ObstacleSet) -> bool {
        let center = self.center(anchor, yaw);
        let cos_y = yaw.cos();
        let sin_y = yaw.sin();
        for idx in obstacles.within_radius(center, self.bounding_radius) {
            let p = obstacles.point(idx);
            let dx = p.x - center.x;
            let dy = p.y - center.y;
            // Into the body frame: longitudinal, lateral
            let lx = dx * cos_y + dy * sin_y;
            let ly = -dx * sin_y + dy * cos_y;
            if lx.abs() <= self.half_length && ly.abs() <= self.half_width {
                return true;
            }
        }
        false
    }
}

/// Pose and path feasibility checks against a static obstacle set.
pub struct CollisionChecker<'a> {
    obstacles: &'a ObstacleSet,
    max_jackknife: f32,
    hitch_offset: f32,
    tractor: BodyRect,
    trailer: BodyRect,
}

impl<'a> CollisionChecker<'a> {
    /// Create a checker for the given obstacle set and rig geometry.
    pub fn new(obstacles: &'a ObstacleSet, vehicle: &VehicleConfig) -> Self {
        Self {
            obstacles,
            max_jackknife: vehicle.max_jackknife,
            hitch_offset: vehicle.hitch_offset,
            tractor: BodyRect::new(
                vehicle.tractor_front,
                vehicle.tractor_back,
                vehicle.tractor_width,
                vehicle.safety_margin,
            ),
            trailer: BodyRect::new(
                vehicle.trailer_front,
                vehicle.trailer_back,
                vehicle.trailer_width,
                vehicle.safety_margin,
            ),
        }
    }

    /// True if the pose is free of collision and within the jackknife
    /// limit.
    pub fn is_pose_safe(&self, pose: &RigPose) -> bool {
        if pose.jackknife_angle().abs() > self.max_jackknife {
            return false;
        }
        let anchor = pose.position();
        if self.tractor.hits(anchor, pose.yaw, self.obstacles) {
            return false;
        }
        // The trailer is anchored at the hitch, behind the rear axle
        // along the tractor heading
        let hitch = WorldPoint::new(
            anchor.x - self.hitch_offset * pose.yaw.cos(),
            anchor.y - self.hitch_offset * pose.yaw.sin(),
        );
        !self.trailer.hits(hitch, pose.trailer_yaw, self.obstacles)
    }

    /// True iff every pose in the sequence is safe. Stops at the first
    /// failure.
    pub fn is_path_safe<I>(&self, poses: I) -> bool
    where
        I: IntoIterator<Item = RigPose>,
    {
        poses.into_iter().all(|p| self.is_pose_safe(&p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deg_to_rad;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_open_field_is_safe() {
        let obstacles = ObstacleSet::from_coords(&[], &[]);
        let vehicle = VehicleConfig::default();
        let checker = CollisionChecker::new(&obstacles, &vehicle);
        assert!(checker.is_pose_safe(&RigPose::new(0.0, 0.0, 0.0, 0.0)));
        assert!(checker.is_pose_safe(&RigPose::new(5.0, -3.0, 1.2, 1.0)));
    }

    #[test]
    fn test_jackknife_gate() {
        let obstacles = ObstacleSet::from_coords(&[], &[]);
        let vehicle = VehicleConfig::default();
        let checker = CollisionChecker::new(&obstacles, &vehicle);
        let bent = RigPose::new(0.0, 0.0, 0.0, deg_to_rad(75.0));
        assert!(!checker.is_pose_safe(&bent));
        let nearly = RigPose::new(0.0, 0.0, 0.0, deg_to_rad(55.0));
        assert!(checker.is_pose_safe(&nearly));
    }

    #[test]
    fn test_obstacle_in_tractor_body() {
        // Tractor heading +X spans [-1.0, 6.6] x [-1.3, 1.3] (plus margin)
        let obstacles = ObstacleSet::from_coords(&[3.0], &[0.5]);
        let vehicle = VehicleConfig::default();
        let checker = CollisionChecker::new(&obstacles, &vehicle);
        assert!(!checker.is_pose_safe(&RigPose::new(0.0, 0.0, 0.0, 0.0)));

        // Far to the side of the body it is fine
        let clear = ObstacleSet::from_coords(&[3.0], &[2.0]);
        let checker = CollisionChecker::new(&clear, &vehicle);
        assert!(checker.is_pose_safe(&RigPose::new(0.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_obstacle_in_trailer_body() {
        // Trailer heading +X spans [-9.0, 1.0] behind the hitch
        let obstacles = ObstacleSet::from_coords(&[-6.0], &[0.0]);
        let vehicle = VehicleConfig::default();
        let checker = CollisionChecker::new(&obstacles, &vehicle);
        assert!(!checker.is_pose_safe(&RigPose::new(0.0, 0.0, 0.0, 0.0)));

        // Rotating the whole rig to face +Y sweeps the trailer clear
        let up = RigPose::new(0.0, 0.0, FRAC_PI_2, FRAC_PI_2);
        assert!(checker.is_pose_safe(&up));
    }

    #[test]
    fn test_hitch_offset_shifts_trailer_body() {
        // With the hitch 2 m behind the rear axle the trailer rectangle
        // spans [-11.0, -1.0]; over the axle it spans [-9.0, 1.0]
        let obstacles = ObstacleSet::from_coords(&[-10.5], &[0.0]);
        let pose = RigPose::new(0.0, 0.0, 0.0, 0.0);

        let over_axle = VehicleConfig::default();
        let checker = CollisionChecker::new(&obstacles, &over_axle);
        assert!(checker.is_pose_safe(&pose));

        let offset_hitch = VehicleConfig {
            hitch_offset: 2.0,
            ..Default::default()
        };
        let checker = CollisionChecker::new(&obstacles, &offset_hitch);
        assert!(!checker.is_pose_safe(&pose));
    }

    #[test]
    fn test_path_stops_at_first_failure() {
        let obstacles = ObstacleSet::from_coords(&[20.0], &[0.0]);
        let vehicle = VehicleConfig::default();
        let checker = CollisionChecker::new(&obstacles, &vehicle);
        let safe = RigPose::new(0.0, 0.0, 0.0, 0.0);
        let hit = RigPose::new(19.0, 0.0, 0.0, 0.0);
        assert!(checker.is_path_safe([safe, safe]));
        assert!(!checker.is_path_safe([safe, hit, safe]));
    }

    #[test]
    fn test_rotated_body() {
        // Obstacle 3 m above the rear axle: clear when heading +X,
        // inside the tractor body when heading +Y.
        let obstacles = ObstacleSet::from_coords(&[0.0], &[3.0]);
        let vehicle = VehicleConfig::default();
        let checker = CollisionChecker::new(&obstacles, &vehicle);
        assert!(checker.is_pose_safe(&RigPose::new(0.0, 0.0, 0.0, 0.0)));
        assert!(!checker.is_pose_safe(&RigPose::new(0.0, 0.0, FRAC_PI_2, FRAC_PI_2)));
    }
}
