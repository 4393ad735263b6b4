//! Planner configuration.
//!
//! Plain-struct sections with serde derives; callers may deserialize them
//! from their own sources. Defaults describe a full-size semi-trailer and
//! a 2 m / 15° search grid.

mod search;
mod vehicle;

pub use search::SearchConfig;
pub use vehicle::VehicleConfig;

use serde::{Deserialize, Serialize};

/// Complete planner configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Rig geometry and steering limits.
    #[serde(default)]
    pub vehicle: VehicleConfig,
    /// Search discretization, costs, and budgets.
    #[serde(default)]
    pub search: SearchConfig,
}

impl PlannerConfig {
    /// Configuration with the given grid resolutions and defaults for
    /// everything else.
    pub fn with_resolutions(xy_resolution: f32, yaw_resolution: f32) -> Self {
        Self {
            vehicle: VehicleConfig::default(),
            search: SearchConfig {
                xy_resolution,
                yaw_resolution,
                ..Default::default()
            },
        }
    }
}
