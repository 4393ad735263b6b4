//! Holonomic cost-to-go field.
//!
//! A 2D occupancy grid is laid over the workspace (obstacle bounding box
//! extended to cover the start and goal, plus a margin), cells near
//! obstacles are marked occupied, and a Dijkstra flood from the goal cell
//! fills every free cell with its obstacle-aware distance to the goal in
//! meters. The field is the h_holo term of the search heuristic and also
//! bounds the workspace: poses outside it are pruned.

use log::debug;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::{GridCoord, WorldPoint};
use crate::obstacles::{Bounds, ObstacleSet};

#[derive(Clone, Copy, Debug)]
struct FloodState {
    cost: f32,
    cell: usize,
}

impl PartialEq for FloodState {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.cell == other.cell
    }
}

impl Eq for FloodState {}

impl Ord for FloodState {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for FloodState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Precomputed holonomic cost-to-go over the workspace.
pub struct CostToGoGrid {
    origin: WorldPoint,
    resolution: f32,
    width: usize,
    height: usize,
    cost: Vec<f32>,
}

impl CostToGoGrid {
    /// Build the field for a plan.
    ///
    /// The grid covers the obstacle bounding box unioned with `cover`
    /// (start and goal positions), inflated by `margin`. A cell is
    /// occupied when any obstacle lies within `inflation_radius` of its
    /// center. Returns `None` when the goal cell itself is occupied.
    pub fn build(
        obstacles: &ObstacleSet,
        goal: WorldPoint,
        cover: &[WorldPoint],
        resolution: f32,
        inflation_radius: f32,
        margin: f32,
    ) -> Option<Self> {
        let mut bounds = obstacles.bounds().unwrap_or_else(|| Bounds::around(goal));
        for p in cover {
            bounds.expand_to(*p);
        }
        bounds.expand_to(goal);
        let bounds = bounds.inflate(margin);

        let width = ((bounds.max.x - bounds.min.x) / resolution).ceil().max(1.0) as usize + 1;
        let height = ((bounds.max.y - bounds.min.y) / resolution).ceil().max(1.0) as usize + 1;

        let mut grid = Self {
            origin: bounds.min,
            resolution,
            width,
            height,
            cost: vec![f32::INFINITY; width * height],
        };

        let mut occupied = vec![false; width * height];
        for iy in 0..height {
            for ix in 0..width {
                let center = grid.cell_center(GridCoord::new(ix as i32, iy as i32));
                occupied[iy * width + ix] = obstacles.any_within_radius(center, inflation_radius);
            }
        }

        let goal_cell = grid.world_to_cell(goal)?;
        let goal_idx = grid.index(goal_cell)?;
        if occupied[goal_idx] {
            debug!(
                "cost-to-go: goal cell ({}, {}) is inside the inflated obstacle set",
                goal_cell.x, goal_cell.y
            );
            return None;
        }

        // Dijkstra flood outward from the goal over 8-connected free cells
        let mut heap = BinaryHeap::new();
        grid.cost[goal_idx] = 0.0;
        heap.push(FloodState {
            cost: 0.0,
            cell: goal_idx,
        });
        while let Some(FloodState { cost, cell }) = heap.pop() {
            if cost > grid.cost[cell] {
                continue;
            }
            let coord = GridCoord::new((cell % width) as i32, (cell / width) as i32);
            for (neighbor, step_cells) in coord.neighbors_8() {
                let Some(n_idx) = grid.index(neighbor) else {
                    continue;
                };
                if occupied[n_idx] {
                    continue;
                }
                let next = cost + step_cells * resolution;
                if next < grid.cost[n_idx] {
                    grid.cost[n_idx] = next;
                    heap.push(FloodState {
                        cost: next,
                        cell: n_idx,
                    });
                }
            }
        }

        let reachable = grid.cost.iter().filter(|c| c.is_finite()).count();
        debug!(
            "cost-to-go: {}x{} cells at {:.2} m, {} reachable",
            width, height, resolution, reachable
        );
        Some(grid)
    }

    fn world_to_cell(&self, p: WorldPoint) -> Option<GridCoord> {
        let ix = ((p.x - self.origin.x) / self.resolution).floor();
        let iy = ((p.y - self.origin.y) / self.resolution).floor();
        if ix < 0.0 || iy < 0.0 || ix >= self.width as f32 || iy >= self.height as f32 {
            return None;
        }
        Some(GridCoord::new(ix as i32, iy as i32))
    }

    fn index(&self, c: GridCoord) -> Option<usize> {
        if c.x < 0 || c.y < 0 || c.x as usize >= self.width || c.y as usize >= self.height {
            return None;
        }
        Some(c.y as usize * self.width + c.x as usize)
    }

    fn cell_center(&self, c: GridCoord) -> WorldPoint {
        WorldPoint::new(
            self.origin.x + (c.x as f32 + 0.5) * self.resolution,
            self.origin.y + (c.y as f32 + 0.5) * self.resolution,
        )
    }

    /// True when the point lies inside the workspace grid.
    pub fn contains(&self, p: WorldPoint) -> bool {
        self.world_to_cell(p).is_some()
    }

    /// Cost-to-go at the point's cell, meters. Infinity for unreachable
    /// cells and points outside the grid.
    pub fn cost_at(&self, p: WorldPoint) -> f32 {
        match self.world_to_cell(p).and_then(|c| self.index(c)) {
            Some(idx) => self.cost[idx],
            None => f32::INFINITY,
        }
    }
}
