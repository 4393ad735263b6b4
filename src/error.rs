//! Planner error types.

use thiserror::Error;

/// Reasons a plan call can fail.
///
/// The first five are expected outcomes the caller decides how to handle;
/// `Internal` indicates a broken contract inside the planner and is a bug.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// The start pose is in collision or exceeds the jackknife limit.
    #[error("start pose is in collision or beyond the jackknife limit")]
    InvalidStart,

    /// The goal pose is in collision or exceeds the jackknife limit.
    #[error("goal pose is in collision or beyond the jackknife limit")]
    InvalidGoal,

    /// The goal is disconnected from the start in the holonomic
    /// cost-to-go grid; no tractor-trailer path can exist either.
    #[error("goal is unreachable in the holonomic cost-to-go grid")]
    HeuristicUnreachable,

    /// The open set emptied without reaching the goal.
    #[error("search exhausted after expanding {nodes_expanded} nodes")]
    SearchExhausted {
        /// Nodes expanded before the open set emptied.
        nodes_expanded: usize,
    },

    /// The node or wall-clock budget ran out mid-search.
    #[error("search budget exceeded after {nodes_expanded} node expansions")]
    BudgetExceeded {
        /// Nodes expanded when the budget tripped.
        nodes_expanded: usize,
    },

    /// An internal contract was violated. Not a user error.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PlanError>;
