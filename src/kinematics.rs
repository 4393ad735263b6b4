//! Bicycle-with-trailer kinematics.
//!
//! One micro-step advances the tractor rear axle by a signed arc length
//! and drags the trailer heading toward the (freshly advanced) tractor
//! heading through the hitch. All search edges and the analytic goal
//! segment are built from these updates.

use crate::config::VehicleConfig;
use crate::core::{normalize_angle, RigPose};

/// Advance the rig by one arc step of signed length `d` (positive
/// forward, negative reverse) with steering angle `steer`.
#[inline]
pub fn step(pose: &RigPose, d: f32, steer: f32, vehicle: &VehicleConfig) -> RigPose {
    let x = pose.x + d * pose.yaw.cos();
    let y = pose.y + d * pose.yaw.sin();
    let yaw = normalize_angle(pose.yaw + d / vehicle.wheelbase * steer.tan());
    let trailer_yaw = normalize_angle(
        pose.trailer_yaw + d / vehicle.trailer_wheelbase * (yaw - pose.trailer_yaw).sin(),
    );
    RigPose::new(x, y, yaw, trailer_yaw)
}

/// Roll one motion primitive out from `start`: `n_steps` micro-steps of
/// `step_len` meters with fixed steering and direction. Returns the
/// `n_steps + 1` sampled poses including `start` itself.
pub fn rollout(
    start: &RigPose,
    steer: f32,
    forward: bool,
    n_steps: usize,
    step_len: f32,
    vehicle: &VehicleConfig,
) -> Vec<RigPose> {
    let d = if forward { step_len } else { -step_len };
    let mut samples = Vec::with_capacity(n_steps + 1);
    samples.push(*start);
    let mut pose = *start;
    for _ in 0..n_steps {
        pose = step(&pose, d, steer, vehicle);
        samples.push(pose);
    }
    samples
}

/// Propagate the trailer heading along a fixed tractor course.
///
/// The tractor samples come from an analytic curve, so the trailer just
/// follows: each step uses the chord length between consecutive samples,
/// signed by the sample's travel direction, and reads the arriving
/// sample's tractor heading, the same discretization as [`step`].
/// Returns one trailer heading per sample, starting from
/// `initial_trailer_yaw`.
pub fn propagate_trailer(
    xs: &[f32],
    ys: &[f32],
    yaws: &[f32],
    forward: &[bool],
    initial_trailer_yaw: f32,
    vehicle: &VehicleConfig,
) -> Vec<f32> {
    let mut trailer_yaws = Vec::with_capacity(xs.len());
    let mut trailer_yaw = normalize_angle(initial_trailer_yaw);
    trailer_yaws.push(trailer_yaw);
    for i in 1..xs.len() {
        let dx = xs[i] - xs[i - 1];
        let dy = ys[i] - ys[i - 1];
        let chord = (dx * dx + dy * dy).sqrt();
        let d = if forward[i] { chord } else { -chord };
        trailer_yaw = normalize_angle(
            trailer_yaw + d / vehicle.trailer_wheelbase * (yaws[i] - trailer_yaw).sin(),
        );
        trailer_yaws.push(trailer_yaw);
    }
    trailer_yaws
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_straight_step() {
        let v = VehicleConfig::default();
        let p = step(&RigPose::new(0.0, 0.0, 0.0, 0.0), 0.1, 0.0, &v);
        assert_relative_eq!(p.x, 0.1, epsilon = 1e-6);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.yaw, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.trailer_yaw, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_reverse_step_moves_backward() {
        let v = VehicleConfig::default();
        let p = step(&RigPose::new(0.0, 0.0, FRAC_PI_2, FRAC_PI_2), -0.1, 0.0, &v);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, -0.1, epsilon = 1e-6);
    }

    #[test]
    fn test_turn_rate_matches_wheelbase() {
        let v = VehicleConfig::default();
        let p = step(&RigPose::new(0.0, 0.0, 0.0, 0.0), 0.1, 0.3, &v);
        assert_relative_eq!(p.yaw, 0.1 / v.wheelbase * 0.3f32.tan(), epsilon = 1e-6);
    }

    #[test]
    fn test_trailer_lags_into_turn() {
        let v = VehicleConfig::default();
        let mut pose = RigPose::new(0.0, 0.0, 0.0, 0.0);
        for _ in 0..50 {
            pose = step(&pose, 0.1, 0.4, &v);
        }
        // Tractor has turned left; trailer follows but lags behind
        assert!(pose.yaw > 0.0);
        assert!(pose.trailer_yaw > 0.0);
        assert!(pose.trailer_yaw < pose.yaw);
    }

    #[test]
    fn test_rollout_shape() {
        let v = VehicleConfig::default();
        let start = RigPose::new(1.0, 2.0, 0.5, 0.4);
        let samples = rollout(&start, 0.2, true, 10, 0.1, &v);
        assert_eq!(samples.len(), 11);
        assert_eq!(samples[0], start);
        // Each step travels exactly the arc length
        for w in samples.windows(2) {
            let d = w[0].position().distance(&w[1].position());
            assert_relative_eq!(d, 0.1, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_propagate_trailer_straight_line_converges() {
        let v = VehicleConfig::default();
        let n = 400;
        let xs: Vec<f32> = (0..n).map(|i| i as f32 * 0.1).collect();
        let ys = vec![0.0; n];
        let yaws = vec![0.0; n];
        let forward = vec![true; n];
        let tyaws = propagate_trailer(&xs, &ys, &yaws, &forward, 0.5, &v);
        assert_eq!(tyaws.len(), n);
        // 40 m of straight forward driving pulls the trailer into line
        assert!(tyaws[n - 1].abs() < 0.05);
        // Monotone decay toward alignment
        assert!(tyaws[n - 1].abs() < tyaws[0].abs());
    }

    #[test]
    fn test_propagate_matches_integrator() {
        // Re-propagating over the integrator's own tractor course must
        // reproduce its trailer headings; each micro-step displaces the
        // rear axle by exactly the arc length, so the chords match too.
        let v = VehicleConfig::default();
        let samples = rollout(&RigPose::new(0.0, 0.0, 0.0, 0.2), 0.3, true, 30, 0.1, &v);
        let xs: Vec<f32> = samples.iter().map(|p| p.x).collect();
        let ys: Vec<f32> = samples.iter().map(|p| p.y).collect();
        let yaws: Vec<f32> = samples.iter().map(|p| p.yaw).collect();
        let forward = vec![true; samples.len()];
        let tyaws = propagate_trailer(&xs, &ys, &yaws, &forward, 0.2, &v);
        for (propagated, sample) in tyaws.iter().zip(samples.iter()) {
            assert_relative_eq!(*propagated, sample.trailer_yaw, epsilon = 1e-4);
        }
    }
}
