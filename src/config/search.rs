//! Search discretization, cost weights, and budgets.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::time::Duration;

use crate::core::deg_to_rad;

/// Hybrid A* search settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Spatial grid resolution for node identity, meters.
    pub xy_resolution: f32,
    /// Angular grid resolution for node identity, radians.
    pub yaw_resolution: f32,
    /// Arc length of one integration micro-step, meters.
    pub motion_resolution: f32,
    /// Number of steering samples in [-max_steer, +max_steer].
    pub n_steer: usize,
    /// Extra cost per meter driven in reverse.
    pub back_cost: f32,
    /// Flat cost for reversing the direction of travel between edges.
    pub switch_back_cost: f32,
    /// Cost per radian of steering change between consecutive edges.
    pub steer_change_cost: f32,
    /// Cost per radian of steering magnitude.
    pub steer_cost: f32,
    /// Cost per radian of articulation at an edge's end pose.
    pub jackknife_cost: f32,
    /// Multiplicative heuristic weight; >= 1 trades optimality for speed.
    pub heuristic_weight: f32,
    /// Tolerance on the trailer heading at the goal, radians.
    pub goal_trailer_yaw_tol: f32,
    /// Obstacle inflation radius for the holonomic cost-to-go grid, meters.
    pub inflation_radius: f32,
    /// Margin added around the obstacle/start/goal bounding box when
    /// sizing the workspace grid, meters. Poses leaving the grid are
    /// pruned, which also bounds the search.
    pub grid_margin: f32,
    /// Attempt the analytic goal connection whenever the Reeds-Shepp
    /// distance-to-go falls below this, meters.
    pub analytic_radius: f32,
    /// Also attempt the analytic connection unconditionally every this
    /// many pops, so attempts keep happening far from the goal.
    pub analytic_interval: usize,
    /// Hard cap on node expansions before giving up.
    pub max_expansions: usize,
    /// Optional wall-clock budget for a single plan call.
    pub time_budget: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            xy_resolution: 2.0,
            yaw_resolution: deg_to_rad(15.0),
            motion_resolution: 0.1,
            n_steer: 9,
            back_cost: 5.0,
            switch_back_cost: 100.0,
            steer_change_cost: 5.0,
            steer_cost: 1.0,
            jackknife_cost: 200.0,
            heuristic_weight: 5.0,
            goal_trailer_yaw_tol: PI / 60.0,
            inflation_radius: 1.5,
            grid_margin: 15.0,
            analytic_radius: 20.0,
            analytic_interval: 20,
            max_expansions: 100_000,
            time_budget: None,
        }
    }
}

impl SearchConfig {
    /// Micro-steps per edge, sized so one edge crosses roughly one grid
    /// cell diagonal.
    #[inline]
    pub fn steps_per_edge(&self) -> usize {
        let edge_len = self.xy_resolution * std::f32::consts::SQRT_2;
        (edge_len / self.motion_resolution).ceil().max(1.0) as usize
    }

    /// Set the node expansion budget.
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Set the wall-clock budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_per_edge() {
        let c = SearchConfig::default();
        // 2.0 * sqrt(2) / 0.1 = 28.28 -> 29 steps
        assert_eq!(c.steps_per_edge(), 29);

        let coarse = SearchConfig {
            motion_resolution: 5.0,
            ..Default::default()
        };
        assert_eq!(coarse.steps_per_edge(), 1);
    }

    #[test]
    fn test_builders() {
        let c = SearchConfig::default()
            .with_max_expansions(10)
            .with_time_budget(Duration::from_secs(1));
        assert_eq!(c.max_expansions, 10);
        assert_eq!(c.time_budget, Some(Duration::from_secs(1)));
    }
}
