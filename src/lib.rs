//! # Vahana-Plan: Tractor-Trailer Motion Planner
//!
//! A hybrid-state A* planner for a car towing a single trailer. Given a
//! start pose, a goal pose, and a static set of point obstacles, it
//! produces a dense, kinematically feasible, collision-free trajectory
//! that respects Ackermann steering limits, the hitch coupling between
//! tractor and trailer, and a maximum jackknife angle.
//!
//! ## Quick Start
//!
//! ```rust
//! use vahana_plan::{plan, PlannerConfig, RigPose};
//!
//! let config = PlannerConfig::default();
//! let start = RigPose::new(0.0, 0.0, 0.0, 0.0);
//! let goal = RigPose::new(0.0, 0.0, 0.0, 0.0);
//!
//! let path = plan(start, goal, &[], &[], &config).unwrap();
//! assert!(path.len() >= 2);
//! ```
//!
//! ## Coordinate Frame
//!
//! World coordinates are meters, X/Y in the plane; headings are radians,
//! counter-clockwise positive from +X, normalized to (-π, π]. The rig
//! pose anchors at the tractor rear axle; the hitch sits the configured
//! rear-to-hitch distance behind it.
//!
//! ## Architecture
//!
//! - [`core`]: pose, point, and angle primitives
//! - [`config`]: vehicle geometry and search settings
//! - [`obstacles`]: k-d tree index over the obstacle points
//! - [`collision`]: oriented-rectangle footprint checks
//! - [`kinematics`]: bicycle-with-trailer integration
//! - [`reeds_shepp`]: analytic curve enumeration and sampling
//! - [`heuristic`]: holonomic cost-to-go grid
//! - [`search`]: the hybrid A* core
//!
//! ## Data Flow
//!
//! ```text
//!   obstacles ──► ObstacleSet (k-d tree) ──► CostToGoGrid (Dijkstra
//!       │                                    flood from the goal)
//!       │                                           │
//!       ▼                                           ▼
//!   CollisionChecker ◄────────────── Hybrid A* (open/closed over
//!       ▲                            coarse 4-tuple cells)
//!       │                                │              │
//!       │                          motion primitive   analytic
//!       └──────────────────────────  expansion      Reeds-Shepp shot
//!                                         │              │
//!                                         └──────┬───────┘
//!                                                ▼
//!                                          PlannedPath
//! ```
//!
//! The search is single-threaded and synchronous; one `plan` call shares
//! no state with any other.

pub mod collision;
pub mod config;
pub mod core;
pub mod error;
pub mod heuristic;
pub mod kinematics;
pub mod obstacles;
pub mod reeds_shepp;
pub mod search;

pub use crate::collision::CollisionChecker;
pub use crate::config::{PlannerConfig, SearchConfig, VehicleConfig};
pub use crate::core::RigPose;
pub use crate::error::{PlanError, Result};
pub use crate::obstacles::ObstacleSet;
pub use crate::search::Planner;

/// A planned trajectory as parallel per-sample arrays.
///
/// Adjacent samples are at most one motion step apart; `forward[i]`
/// tells whether the step arriving at sample `i` was driven forward.
/// The first sample is the start pose and the last matches the goal
/// within the configured tolerances.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedPath {
    /// Tractor rear-axle X positions, meters.
    pub x: Vec<f32>,
    /// Tractor rear-axle Y positions, meters.
    pub y: Vec<f32>,
    /// Tractor headings, radians.
    pub yaw: Vec<f32>,
    /// Trailer headings, radians.
    pub trailer_yaw: Vec<f32>,
    /// Per-sample travel direction (true = forward).
    pub forward: Vec<bool>,
}

impl PlannedPath {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True when the path holds no samples.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Rig pose at sample `i`.
    pub fn pose(&self, i: usize) -> RigPose {
        RigPose::new(self.x[i], self.y[i], self.yaw[i], self.trailer_yaw[i])
    }

    /// Total driven arc length, meters.
    pub fn length_meters(&self) -> f32 {
        let mut total = 0.0;
        for i in 1..self.len() {
            let dx = self.x[i] - self.x[i - 1];
            let dy = self.y[i] - self.y[i - 1];
            total += (dx * dx + dy * dy).sqrt();
        }
        total
    }

    /// Number of direction reversals along the path.
    pub fn direction_switches(&self) -> usize {
        self.forward.windows(2).filter(|w| w[0] != w[1]).count()
    }
}

/// Plan a trajectory between two rig poses.
///
/// `obstacles_x`/`obstacles_y` are parallel coordinate slices; an empty
/// obstacle set is legal. See [`PlanError`] for the failure taxonomy.
pub fn plan(
    start: RigPose,
    goal: RigPose,
    obstacles_x: &[f32],
    obstacles_y: &[f32],
    config: &PlannerConfig,
) -> Result<PlannedPath> {
    let obstacles = ObstacleSet::from_coords(obstacles_x, obstacles_y);
    Planner::new(config.clone()).plan(start, goal, &obstacles)
}

/// Flat-argument convenience wrapper: default vehicle and search
/// settings with the two grid resolutions overridden.
#[allow(clippy::too_many_arguments)]
pub fn plan_between(
    sx: f32,
    sy: f32,
    syaw: f32,
    strailer_yaw: f32,
    gx: f32,
    gy: f32,
    gyaw: f32,
    gtrailer_yaw: f32,
    obstacles_x: &[f32],
    obstacles_y: &[f32],
    xy_resolution: f32,
    yaw_resolution: f32,
) -> Result<PlannedPath> {
    let config = PlannerConfig::with_resolutions(xy_resolution, yaw_resolution);
    plan(
        RigPose::new(sx, sy, syaw, strailer_yaw),
        RigPose::new(gx, gy, gyaw, gtrailer_yaw),
        obstacles_x,
        obstacles_y,
        &config,
    )
}
