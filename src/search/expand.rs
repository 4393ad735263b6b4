//! Motion-primitive successor generation.

use crate::collision::CollisionChecker;
use crate::config::{SearchConfig, VehicleConfig};
use crate::core::RigPose;
use crate::heuristic::CostToGoGrid;
use crate::kinematics::rollout;

use super::node::{NodeKey, SearchNode};

/// Everything an expansion needs besides the parent node.
pub(super) struct ExpandContext<'a> {
    pub vehicle: &'a VehicleConfig,
    pub search: &'a SearchConfig,
    pub checker: &'a CollisionChecker<'a>,
    pub grid: &'a CostToGoGrid,
    /// Steering samples, ascending; shared by every expansion.
    pub steer_set: Vec<f32>,
    /// Micro-steps per edge.
    pub n_steps: usize,
}

/// Uniform steering samples over [-max_steer, +max_steer]. A single
/// sample degenerates to straight ahead; odd counts include zero.
pub(super) fn steer_candidates(n_steer: usize, max_steer: f32) -> Vec<f32> {
    if n_steer <= 1 {
        return vec![0.0];
    }
    (0..n_steer)
        .map(|i| -max_steer + 2.0 * max_steer * i as f32 / (n_steer - 1) as f32)
        .collect()
}

/// Cost of one edge per the search weights.
fn edge_cost(
    parent: &SearchNode,
    steer: f32,
    forward: bool,
    end: &RigPose,
    arc_length: f32,
    cfg: &SearchConfig,
) -> f32 {
    let mut cost = arc_length;
    if !forward {
        cost += cfg.back_cost * arc_length;
    }
    if forward != parent.forward && parent.parent.is_some() {
        cost += cfg.switch_back_cost;
    }
    cost += cfg.steer_cost * steer.abs();
    cost += cfg.steer_change_cost * (steer - parent.steer).abs();
    cost += cfg.jackknife_cost * end.jackknife_angle().abs();
    cost
}

/// Generate all feasible successors of `parent` in a fixed (direction,
/// steering) order: forward edges first, steering ascending within each
/// direction. Colliding, jackknifed, out-of-workspace, and self-loop
/// successors are dropped.
pub(super) fn successors(parent: &SearchNode, ctx: &ExpandContext<'_>) -> Vec<SearchNode> {
    let parent_pose = parent.pose();
    let step_len = ctx.search.motion_resolution;
    let arc_length = ctx.n_steps as f32 * step_len;
    let mut out = Vec::with_capacity(2 * ctx.steer_set.len());

    for &forward in &[true, false] {
        for &steer in &ctx.steer_set {
            let samples = rollout(
                &parent_pose,
                steer,
                forward,
                ctx.n_steps,
                step_len,
                ctx.vehicle,
            );
            let end = samples[samples.len() - 1];
            if !ctx.grid.contains(end.position()) {
                continue;
            }
            let key = NodeKey::from_pose(&end, ctx.search.xy_resolution, ctx.search.yaw_resolution);
            if key == parent.key {
                continue;
            }
            if !ctx.checker.is_path_safe(samples.iter().copied()) {
                continue;
            }
            let cost =
                parent.cost + edge_cost(parent, steer, forward, &end, arc_length, ctx.search);
            out.push(SearchNode {
                key,
                xs: samples.iter().map(|p| p.x).collect(),
                ys: samples.iter().map(|p| p.y).collect(),
                yaws: samples.iter().map(|p| p.yaw).collect(),
                trailer_yaws: samples.iter().map(|p| p.trailer_yaw).collect(),
                forward,
                steer,
                cost,
                parent: Some(parent.key),
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacles::ObstacleSet;
    use crate::core::WorldPoint;

    fn open_field_context<'a>(
        vehicle: &'a VehicleConfig,
        search: &'a SearchConfig,
        checker: &'a CollisionChecker<'a>,
        grid: &'a CostToGoGrid,
    ) -> ExpandContext<'a> {
        ExpandContext {
            vehicle,
            search,
            checker,
            grid,
            steer_set: steer_candidates(search.n_steer, vehicle.max_steer),
            n_steps: search.steps_per_edge(),
        }
    }

    #[test]
    fn test_steer_candidates_cover_range() {
        let set = steer_candidates(9, 0.6);
        assert_eq!(set.len(), 9);
        assert!((set[0] + 0.6).abs() < 1e-6);
        assert!((set[8] - 0.6).abs() < 1e-6);
        assert!(set[4].abs() < 1e-6);
        assert!(set.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(steer_candidates(1, 0.6), vec![0.0]);
    }

    #[test]
    fn test_open_field_expansion_count() {
        let vehicle = VehicleConfig::default();
        let search = SearchConfig::default();
        let obstacles = ObstacleSet::from_coords(&[], &[]);
        let checker = CollisionChecker::new(&obstacles, &vehicle);
        let grid = CostToGoGrid::build(
            &obstacles,
            WorldPoint::ZERO,
            &[],
            search.xy_resolution,
            search.inflation_radius,
            search.grid_margin,
        )
        .unwrap();
        let ctx = open_field_context(&vehicle, &search, &checker, &grid);

        let start = RigPose::new(0.0, 0.0, 0.0, 0.0);
        let key = NodeKey::from_pose(&start, search.xy_resolution, search.yaw_resolution);
        let root = SearchNode::root(&start, key);
        let kids = successors(&root, &ctx);

        // Every (direction, steer) pair survives in an open field
        assert_eq!(kids.len(), 2 * search.n_steer);
        for kid in &kids {
            assert_eq!(kid.xs.len(), ctx.n_steps + 1);
            assert_eq!(kid.parent, Some(key));
            assert_ne!(kid.key, key);
            assert!(kid.cost > 0.0);
        }
        // Fixed ordering: forward block first
        assert!(kids[0].forward);
        assert!(!kids[kids.len() - 1].forward);
    }

    #[test]
    fn test_reverse_edges_cost_more() {
        let vehicle = VehicleConfig::default();
        let search = SearchConfig::default();
        let obstacles = ObstacleSet::from_coords(&[], &[]);
        let checker = CollisionChecker::new(&obstacles, &vehicle);
        let grid = CostToGoGrid::build(
            &obstacles,
            WorldPoint::ZERO,
            &[],
            search.xy_resolution,
            search.inflation_radius,
            search.grid_margin,
        )
        .unwrap();
        let ctx = open_field_context(&vehicle, &search, &checker, &grid);

        let start = RigPose::new(0.0, 0.0, 0.0, 0.0);
        let key = NodeKey::from_pose(&start, search.xy_resolution, search.yaw_resolution);
        let root = SearchNode::root(&start, key);
        let kids = successors(&root, &ctx);

        let forward_straight = kids
            .iter()
            .find(|k| k.forward && k.steer.abs() < 1e-6)
            .unwrap();
        let reverse_straight = kids
            .iter()
            .find(|k| !k.forward && k.steer.abs() < 1e-6)
            .unwrap();
        assert!(reverse_straight.cost > forward_straight.cost);
    }

    #[test]
    fn test_blocked_directions_are_dropped() {
        let vehicle = VehicleConfig::default();
        let search = SearchConfig::default();
        // A dense wall just ahead of the tractor nose
        let ys: Vec<f32> = (-30..=30).map(|i| i as f32 * 0.2).collect();
        let xs = vec![8.0; ys.len()];
        let obstacles = ObstacleSet::from_coords(&xs, &ys);
        let checker = CollisionChecker::new(&obstacles, &vehicle);
        let grid = CostToGoGrid::build(
            &obstacles,
            WorldPoint::new(-10.0, 0.0),
            &[WorldPoint::ZERO],
            search.xy_resolution,
            search.inflation_radius,
            search.grid_margin,
        )
        .unwrap();
        let ctx = open_field_context(&vehicle, &search, &checker, &grid);

        let start = RigPose::new(0.0, 0.0, 0.0, 0.0);
        let key = NodeKey::from_pose(&start, search.xy_resolution, search.yaw_resolution);
        let root = SearchNode::root(&start, key);
        let kids = successors(&root, &ctx);

        // Driving forward rams the wall 1.4 m from the nose; reverse works
        assert!(kids.iter().all(|k| !k.forward || k.steer.abs() > 0.3));
        assert!(kids.iter().any(|k| !k.forward));
    }
}
