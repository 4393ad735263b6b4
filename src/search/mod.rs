//! Hybrid A* search core.
//!
//! Nodes are continuous rig states aggregated into coarse
//! (x, y, yaw, trailer_yaw) cells for open/closed membership. Each edge
//! is a forward-simulated motion primitive; the goal is reached through
//! an analytic Reeds-Shepp connection validated against collision,
//! jackknife, and trailer-heading constraints.

mod analytic;
mod expand;
mod node;

pub use node::NodeKey;

use log::{debug, trace};
use std::collections::{BinaryHeap, HashMap};
use std::time::Instant;

use crate::collision::CollisionChecker;
use crate::config::PlannerConfig;
use crate::core::RigPose;
use crate::error::{PlanError, Result};
use crate::heuristic::CostToGoGrid;
use crate::obstacles::ObstacleSet;
use crate::reeds_shepp::shortest_path_length;
use crate::PlannedPath;

use analytic::{try_goal_connection, GoalSegment};
use expand::{steer_candidates, successors, ExpandContext};
use node::{HeapEntry, SearchNode};

// Slack used when deciding a popped heap entry is stale.
const STALE_EPS: f32 = 1e-4;

/// Tractor-trailer trajectory planner.
///
/// A planner holds only configuration; every `plan` call builds its own
/// obstacle-derived state, so independent calls on clones may run in
/// parallel.
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    /// Create a planner with the given configuration.
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a collision-free, kinematically feasible trajectory from
    /// `start` to `goal`.
    pub fn plan(
        &self,
        start: RigPose,
        goal: RigPose,
        obstacles: &ObstacleSet,
    ) -> Result<PlannedPath> {
        let vehicle = &self.config.vehicle;
        let search = &self.config.search;
        let start = start.normalized();
        let goal = goal.normalized();

        let checker = CollisionChecker::new(obstacles, vehicle);
        if !checker.is_pose_safe(&start) {
            debug!("plan rejected: start pose unsafe");
            return Err(PlanError::InvalidStart);
        }
        if !checker.is_pose_safe(&goal) {
            debug!("plan rejected: goal pose unsafe");
            return Err(PlanError::InvalidGoal);
        }

        // Identical poses need no search
        if start.approx_eq(
            &goal,
            search.motion_resolution,
            search.yaw_resolution,
            search.goal_trailer_yaw_tol,
        ) {
            return Ok(PlannedPath {
                x: vec![start.x, goal.x],
                y: vec![start.y, goal.y],
                yaw: vec![start.yaw, goal.yaw],
                trailer_yaw: vec![start.trailer_yaw, goal.trailer_yaw],
                forward: vec![true, true],
            });
        }

        let grid = CostToGoGrid::build(
            obstacles,
            goal.position(),
            &[start.position()],
            search.xy_resolution,
            search.inflation_radius,
            search.grid_margin,
        )
        .ok_or(PlanError::HeuristicUnreachable)?;
        if grid.cost_at(start.position()).is_infinite() {
            debug!("plan rejected: start disconnected from goal in the cost-to-go grid");
            return Err(PlanError::HeuristicUnreachable);
        }

        let ctx = ExpandContext {
            vehicle,
            search,
            checker: &checker,
            grid: &grid,
            steer_set: steer_candidates(search.n_steer, vehicle.max_steer),
            n_steps: search.steps_per_edge(),
        };

        let mut open: HashMap<NodeKey, SearchNode> = HashMap::new();
        let mut closed: HashMap<NodeKey, SearchNode> = HashMap::new();
        let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::new();

        let start_key = NodeKey::from_pose(&start, search.xy_resolution, search.yaw_resolution);
        let root = SearchNode::root(&start, start_key);
        let h0 = self.heuristic(&root.pose(), &goal, &grid);
        heap.push(HeapEntry {
            f: search.heuristic_weight * h0,
            h: h0,
            g: 0.0,
            key: start_key,
        });
        open.insert(start_key, root);

        let deadline = search.time_budget.map(|b| Instant::now() + b);
        let mut expanded: usize = 0;
        let mut analytic_attempts: usize = 0;
        let mut pops_since_attempt = search.analytic_interval; // attempt on the first pop too

        while let Some(entry) = heap.pop() {
            if expanded >= search.max_expansions {
                debug!("plan aborted: node budget of {} reached", search.max_expansions);
                return Err(PlanError::BudgetExceeded {
                    nodes_expanded: expanded,
                });
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    debug!("plan aborted: time budget reached after {expanded} expansions");
                    return Err(PlanError::BudgetExceeded {
                        nodes_expanded: expanded,
                    });
                }
            }

            // Lazy deletion: drop entries for closed keys and entries
            // superseded by a cheaper in-place open-set update
            if closed.contains_key(&entry.key) {
                continue;
            }
            let Some(current) = open.get(&entry.key) else {
                continue;
            };
            if entry.g > current.cost + STALE_EPS {
                continue;
            }

            let Some(current) = open.remove(&entry.key) else {
                continue;
            };
            let current_pose = current.pose();
            closed.insert(entry.key, current);
            expanded += 1;
            pops_since_attempt += 1;

            let rs_to_go = shortest_path_length(
                current_pose.x,
                current_pose.y,
                current_pose.yaw,
                goal.x,
                goal.y,
                goal.yaw,
                vehicle.max_curvature(),
            )
            .unwrap_or(0.0);
            if rs_to_go <= search.analytic_radius || pops_since_attempt >= search.analytic_interval
            {
                pops_since_attempt = 0;
                analytic_attempts += 1;
                if let Some(segment) =
                    try_goal_connection(&current_pose, &goal, vehicle, search, &checker)?
                {
                    debug!(
                        "plan found: {} nodes expanded, {} analytic attempts",
                        expanded, analytic_attempts
                    );
                    return self.reconstruct(&closed, entry.key, &segment);
                }
            }

            let node = &closed[&entry.key];
            for succ in successors(node, &ctx) {
                if closed.contains_key(&succ.key) {
                    continue;
                }
                if let Some(existing) = open.get(&succ.key) {
                    if existing.cost <= succ.cost {
                        continue;
                    }
                }
                let h = self.heuristic(&succ.pose(), &goal, &grid);
                heap.push(HeapEntry {
                    f: succ.cost + search.heuristic_weight * h,
                    h,
                    g: succ.cost,
                    key: succ.key,
                });
                open.insert(succ.key, succ);
            }
            trace!(
                "expanded {} nodes, open set {} entries",
                expanded,
                open.len()
            );
        }

        debug!("plan failed: open set exhausted after {expanded} expansions");
        Err(PlanError::SearchExhausted {
            nodes_expanded: expanded,
        })
    }

    /// h(n) = max of the obstacle-aware holonomic cost-to-go and the
    /// obstacle-free Reeds-Shepp distance. Both underestimate the true
    /// remaining cost on their own, so their max does too.
    fn heuristic(&self, pose: &RigPose, goal: &RigPose, grid: &CostToGoGrid) -> f32 {
        let h_holo = grid.cost_at(pose.position());
        let h_rs = shortest_path_length(
            pose.x,
            pose.y,
            pose.yaw,
            goal.x,
            goal.y,
            goal.yaw,
            self.config.vehicle.max_curvature(),
        )
        .unwrap_or_else(|| pose.position().distance(&goal.position()));
        h_holo.max(h_rs)
    }

    /// Back-trace from the terminal node and stitch the edge samples and
    /// the analytic segment into one dense trajectory.
    fn reconstruct(
        &self,
        closed: &HashMap<NodeKey, SearchNode>,
        terminal: NodeKey,
        segment: &GoalSegment,
    ) -> Result<PlannedPath> {
        let mut chain: Vec<&SearchNode> = Vec::new();
        let mut cursor = Some(terminal);
        while let Some(key) = cursor {
            let node = closed.get(&key).ok_or_else(|| {
                PlanError::Internal(format!("parent chain broken at {key:?}"))
            })?;
            chain.push(node);
            if chain.len() > closed.len() {
                return Err(PlanError::Internal("parent chain contains a cycle".into()));
            }
            cursor = node.parent;
        }
        chain.reverse();

        let mut path = PlannedPath {
            x: Vec::new(),
            y: Vec::new(),
            yaw: Vec::new(),
            trailer_yaw: Vec::new(),
            forward: Vec::new(),
        };
        for (i, node) in chain.iter().enumerate() {
            // Each edge's first sample duplicates its parent's end pose
            let skip = usize::from(i > 0);
            for j in skip..node.xs.len() {
                path.x.push(node.xs[j]);
                path.y.push(node.ys[j]);
                path.yaw.push(node.yaws[j]);
                path.trailer_yaw.push(node.trailer_yaws[j]);
                path.forward.push(node.forward);
            }
        }
        for j in 1..segment.xs.len() {
            path.x.push(segment.xs[j]);
            path.y.push(segment.ys[j]);
            path.yaw.push(segment.yaws[j]);
            path.trailer_yaw.push(segment.trailer_yaws[j]);
            path.forward.push(segment.forward[j]);
        }
        // The root sample carries no motion of its own; align its flag
        // with the first real step
        if path.forward.len() > 1 {
            path.forward[0] = path.forward[1];
        }

        if path.x.len() < 2 {
            return Err(PlanError::Internal(
                "reconstructed path has fewer than two samples".into(),
            ));
        }
        Ok(path)
    }
}
