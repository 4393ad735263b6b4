//! Static obstacle index.
//!
//! Caller-supplied point obstacles are loaded once into a k-d tree and
//! never mutated afterwards; collision checks and grid inflation both
//! query it by radius.

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;

use crate::core::WorldPoint;

/// Bucket capacity large enough to hold dense runs of obstacle points that
/// share an exact coordinate on one axis (e.g. a straight wall of points),
/// which the library's default bucket size of 32 cannot split further.
const OBSTACLE_TREE_BUCKET_SIZE: usize = 512;

/// Axis-aligned bounding box over a point set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Lower corner.
    pub min: WorldPoint,
    /// Upper corner.
    pub max: WorldPoint,
}

impl Bounds {
    /// Degenerate box containing a single point.
    pub fn around(point: WorldPoint) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Grow to contain `point`.
    pub fn expand_to(&mut self, point: WorldPoint) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Grow outward by `margin` on every side.
    pub fn inflate(&self, margin: f32) -> Bounds {
        Bounds {
            min: WorldPoint::new(self.min.x - margin, self.min.y - margin),
            max: WorldPoint::new(self.max.x + margin, self.max.y + margin),
        }
    }
}

/// Immutable spatial index over the obstacle point cloud.
pub struct ObstacleSet {
    points: Vec<WorldPoint>,
    tree: KdTree<f32, u64, 2, OBSTACLE_TREE_BUCKET_SIZE, u32>,
}

impl ObstacleSet {
    /// Build the index from parallel coordinate slices. If the slices
    /// differ in length the pair is zipped to the shorter one.
    pub fn from_coords(xs: &[f32], ys: &[f32]) -> Self {
        if xs.len() != ys.len() {
            log::warn!(
                "obstacle coordinate slices differ in length ({} vs {}); using the shorter",
                xs.len(),
                ys.len()
            );
        }
        let points: Vec<WorldPoint> = xs
            .iter()
            .zip(ys.iter())
            .map(|(&x, &y)| WorldPoint::new(x, y))
            .collect();
        Self::from_points(points)
    }

    /// Build the index from a point list.
    pub fn from_points(points: Vec<WorldPoint>) -> Self {
        let mut tree = KdTree::new();
        for (i, p) in points.iter().enumerate() {
            tree.add(&[p.x, p.y], i as u64);
        }
        Self { points, tree }
    }

    /// Number of obstacle points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when no obstacles were supplied.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Obstacle point by index.
    #[inline]
    pub fn point(&self, idx: usize) -> WorldPoint {
        self.points[idx]
    }

    /// Indices of all obstacles within `radius` of `center`.
    pub fn within_radius(&self, center: WorldPoint, radius: f32) -> Vec<usize> {
        if self.points.is_empty() {
            return Vec::new();
        }
        self.tree
            .within_unsorted::<SquaredEuclidean>(&[center.x, center.y], radius * radius)
            .iter()
            .map(|n| n.item as usize)
            .collect()
    }

    /// True if any obstacle lies within `radius` of `center`.
    pub fn any_within_radius(&self, center: WorldPoint, radius: f32) -> bool {
        !self.points.is_empty()
            && !self
                .tree
                .within_unsorted::<SquaredEuclidean>(&[center.x, center.y], radius * radius)
                .is_empty()
    }

    /// Bounding box of the obstacle points; `None` when empty.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut iter = self.points.iter();
        let first = iter.next()?;
        let mut bounds = Bounds::around(*first);
        for p in iter {
            bounds.expand_to(*p);
        }
        Some(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set() {
        let set = ObstacleSet::from_coords(&[], &[]);
        assert!(set.is_empty());
        assert!(set.bounds().is_none());
        assert!(set.within_radius(WorldPoint::ZERO, 100.0).is_empty());
        assert!(!set.any_within_radius(WorldPoint::ZERO, 100.0));
    }

    #[test]
    fn test_within_radius() {
        let set = ObstacleSet::from_coords(&[0.0, 5.0, 10.0], &[0.0, 0.0, 0.0]);
        let mut near = set.within_radius(WorldPoint::new(4.0, 0.0), 2.0);
        near.sort_unstable();
        assert_eq!(near, vec![1]);

        let mut wide = set.within_radius(WorldPoint::new(4.0, 0.0), 7.0);
        wide.sort_unstable();
        assert_eq!(wide, vec![0, 1, 2]);
    }

    #[test]
    fn test_bounds() {
        let set = ObstacleSet::from_coords(&[-1.0, 3.0, 2.0], &[4.0, -2.0, 7.0]);
        let b = set.bounds().unwrap();
        assert_eq!(b.min, WorldPoint::new(-1.0, -2.0));
        assert_eq!(b.max, WorldPoint::new(3.0, 7.0));

        let inflated = b.inflate(1.0);
        assert_eq!(inflated.min, WorldPoint::new(-2.0, -3.0));
        assert_eq!(inflated.max, WorldPoint::new(4.0, 8.0));
    }

    #[test]
    fn test_mismatched_slices_zip_to_shorter() {
        let set = ObstacleSet::from_coords(&[1.0, 2.0, 3.0], &[0.0]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.point(0), WorldPoint::new(1.0, 0.0));
    }
}
