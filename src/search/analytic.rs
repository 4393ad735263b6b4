//! Analytic goal connection.
//!
//! From a candidate node, Reeds-Shepp curves to the goal's tractor pose
//! are tried in increasing length order. The tractor samples are fixed by
//! the curve; the trailer heading is propagated along them and the whole
//! segment is accepted only if the trailer arrives within tolerance of
//! the goal trailer heading and every sample clears collision and
//! jackknife checks.

use log::trace;

use crate::collision::CollisionChecker;
use crate::config::{SearchConfig, VehicleConfig};
use crate::core::{angle_diff, RigPose};
use crate::error::{PlanError, Result};
use crate::kinematics::propagate_trailer;
use crate::reeds_shepp::{enumerate_paths, sample_path};

/// Dense samples of an accepted goal-connection segment. The first
/// sample duplicates the node pose it connects from.
#[derive(Clone, Debug)]
pub(super) struct GoalSegment {
    pub xs: Vec<f32>,
    pub ys: Vec<f32>,
    pub yaws: Vec<f32>,
    pub trailer_yaws: Vec<f32>,
    pub forward: Vec<bool>,
}

/// Try to close the remaining gap from `from` to `goal` analytically.
///
/// Returns the first (shortest) valid segment, `Ok(None)` when no curve
/// validates, and `Err(Internal)` on a malformed curve sample.
pub(super) fn try_goal_connection(
    from: &RigPose,
    goal: &RigPose,
    vehicle: &VehicleConfig,
    search: &SearchConfig,
    checker: &CollisionChecker<'_>,
) -> Result<Option<GoalSegment>> {
    let max_curvature = vehicle.max_curvature();
    let paths = enumerate_paths(
        from.x,
        from.y,
        from.yaw,
        goal.x,
        goal.y,
        goal.yaw,
        max_curvature,
    );

    for path in &paths {
        let samples = sample_path(
            path,
            from.x,
            from.y,
            from.yaw,
            max_curvature,
            search.motion_resolution,
        );
        if samples.len() < 2 {
            return Err(PlanError::Internal(format!(
                "Reeds-Shepp path of length {:.3} produced {} samples",
                path.total_length,
                samples.len()
            )));
        }

        let trailer_yaws = propagate_trailer(
            &samples.xs,
            &samples.ys,
            &samples.yaws,
            &samples.forward,
            from.trailer_yaw,
            vehicle,
        );
        let terminal = trailer_yaws[trailer_yaws.len() - 1];
        if angle_diff(terminal, goal.trailer_yaw).abs() > search.goal_trailer_yaw_tol {
            continue;
        }

        let poses = (0..samples.len()).map(|i| {
            RigPose::new(
                samples.xs[i],
                samples.ys[i],
                samples.yaws[i],
                trailer_yaws[i],
            )
        });
        if !checker.is_path_safe(poses) {
            continue;
        }

        trace!(
            "analytic connection accepted: {:.2} m over {} samples",
            path.total_length,
            samples.len()
        );
        return Ok(Some(GoalSegment {
            xs: samples.xs,
            ys: samples.ys,
            yaws: samples.yaws,
            trailer_yaws,
            forward: samples.forward,
        }));
    }
    Ok(None)
}
