//! Search node and priority queue types.

use std::cmp::Ordering;

use crate::core::{normalize_angle, RigPose};

/// Discrete identity of a search node: spatial cell of the rear axle plus
/// angular bins for both headings. Two continuous states sharing a key
/// are treated as the same node for open/closed membership.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeKey {
    /// Spatial cell column.
    pub ix: i32,
    /// Spatial cell row.
    pub iy: i32,
    /// Tractor heading bin.
    pub iyaw: i32,
    /// Trailer heading bin.
    pub itrailer_yaw: i32,
}

impl NodeKey {
    /// Derive the key for a pose by floor division. Headings are
    /// normalized first so the wrap at ±π lands in a single bucket.
    pub fn from_pose(pose: &RigPose, xy_resolution: f32, yaw_resolution: f32) -> Self {
        Self {
            ix: (pose.x / xy_resolution).floor() as i32,
            iy: (pose.y / xy_resolution).floor() as i32,
            iyaw: (normalize_angle(pose.yaw) / yaw_resolution).floor() as i32,
            itrailer_yaw: (normalize_angle(pose.trailer_yaw) / yaw_resolution).floor() as i32,
        }
    }
}

/// One search record: the arriving edge's dense samples plus bookkeeping.
///
/// The sample arrays always hold at least one element and their last
/// element is the node's own continuous pose.
#[derive(Clone, Debug)]
pub struct SearchNode {
    /// Discrete identity.
    pub key: NodeKey,
    /// Sample X positions along the arriving edge.
    pub xs: Vec<f32>,
    /// Sample Y positions along the arriving edge.
    pub ys: Vec<f32>,
    /// Sample tractor headings along the arriving edge.
    pub yaws: Vec<f32>,
    /// Sample trailer headings along the arriving edge.
    pub trailer_yaws: Vec<f32>,
    /// Direction of the arriving edge.
    pub forward: bool,
    /// Steering angle of the arriving edge.
    pub steer: f32,
    /// Cost from the start.
    pub cost: f32,
    /// Parent key, or `None` for the root.
    pub parent: Option<NodeKey>,
}

impl SearchNode {
    /// Root node sitting at the start pose with no arriving edge.
    pub fn root(pose: &RigPose, key: NodeKey) -> Self {
        Self {
            key,
            xs: vec![pose.x],
            ys: vec![pose.y],
            yaws: vec![pose.yaw],
            trailer_yaws: vec![pose.trailer_yaw],
            forward: true,
            steer: 0.0,
            cost: 0.0,
            parent: None,
        }
    }

    /// The node's continuous pose (last edge sample).
    pub fn pose(&self) -> RigPose {
        let i = self.xs.len() - 1;
        RigPose::new(self.xs[i], self.ys[i], self.yaws[i], self.trailer_yaws[i])
    }
}

/// Priority queue entry. Ordered by f ascending with ties broken toward
/// smaller h (goal-preferring); `g` is recorded to detect entries made
/// stale by a later in-place open-set improvement.
#[derive(Clone, Copy, Debug)]
pub struct HeapEntry {
    /// Priority f = g + weighted h.
    pub f: f32,
    /// Heuristic part, for tie-breaking.
    pub h: f32,
    /// Cost-so-far at push time.
    pub g: f32,
    /// Node identity.
    pub key: NodeKey,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.h == other.h && self.key == other.key
    }
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior; prefer smaller h on ties
        match other.f.partial_cmp(&self.f).unwrap_or(Ordering::Equal) {
            Ordering::Equal => other.h.partial_cmp(&self.h).unwrap_or(Ordering::Equal),
            ord => ord,
        }
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;
    use std::f32::consts::PI;

    #[test]
    fn test_key_floor_division() {
        let pose = RigPose::new(3.9, -0.1, 0.1, -0.1);
        let key = NodeKey::from_pose(&pose, 2.0, 0.5);
        assert_eq!(key.ix, 1);
        assert_eq!(key.iy, -1);
        assert_eq!(key.iyaw, 0);
        assert_eq!(key.itrailer_yaw, -1);
    }

    #[test]
    fn test_key_wraps_headings_consistently() {
        // -π and +π are the same heading and must share a bin
        let a = NodeKey::from_pose(&RigPose::new(0.0, 0.0, PI, PI), 2.0, 0.5);
        let b = NodeKey::from_pose(&RigPose::new(0.0, 0.0, -PI, -PI), 2.0, 0.5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_root_pose_round_trip() {
        let pose = RigPose::new(1.0, 2.0, 0.3, 0.2);
        let key = NodeKey::from_pose(&pose, 2.0, 0.5);
        let node = SearchNode::root(&pose, key);
        assert_eq!(node.pose(), pose);
        assert!(node.parent.is_none());
    }

    #[test]
    fn test_heap_orders_by_f_then_h() {
        let key = NodeKey {
            ix: 0,
            iy: 0,
            iyaw: 0,
            itrailer_yaw: 0,
        };
        let mut heap = BinaryHeap::new();
        heap.push(HeapEntry {
            f: 2.0,
            h: 1.0,
            g: 1.0,
            key,
        });
        heap.push(HeapEntry {
            f: 1.0,
            h: 0.5,
            g: 0.5,
            key,
        });
        heap.push(HeapEntry {
            f: 1.0,
            h: 0.2,
            g: 0.8,
            key,
        });
        let first = heap.pop().unwrap();
        assert_eq!(first.f, 1.0);
        assert_eq!(first.h, 0.2);
        let second = heap.pop().unwrap();
        assert_eq!(second.h, 0.5);
        assert_eq!(heap.pop().unwrap().f, 2.0);
    }
}
