use crate::{Interval, Ray, Vec3};

/// Minimum extent of any axis of a box built from points.
const PAD_DELTA: f32 = 0.0001;

/// Axis-Aligned Bounding Box for the BVH.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
/// Invariant: `min <= max` on every axis of a non-empty box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals, padding degenerate axes.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }.padded()
    }

    /// Create an AABB from two corner points (in any order).
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));
        Self { x, y, z }.padded()
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Slab test: does the ray pass through this box inside `ray_t`?
    ///
    /// Each axis shrinks the interval to the segment between its two slab
    /// planes; an empty interval means a miss. Negative direction components
    /// swap entry and exit.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        let origin = r.origin();
        let direction = r.direction();

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let inv_d = 1.0 / crate::axis_component(direction, axis);
            let orig = crate::axis_component(origin, axis);

            let mut t0 = (slab.min - orig) * inv_d;
            let mut t1 = (slab.max - orig) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            // f32::max/min ignore NaN (0 * inf when the origin lies on a slab
            // plane of a parallel ray), which keeps the current bound.
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }

        true
    }

    /// Copy of this box with every axis at least `PAD_DELTA` wide.
    ///
    /// Flat primitives (rectangles, axis-aligned triangles) would otherwise
    /// produce zero-width slabs.
    pub fn padded(&self) -> Aabb {
        let pad = |i: Interval| {
            if i.size() < PAD_DELTA {
                i.expand(PAD_DELTA)
            } else {
                i
            }
        };
        Aabb {
            x: pad(self.x),
            y: pad(self.y),
            z: pad(self.z),
        }
    }

    /// True if `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &Aabb) -> bool {
        (0..3).all(|axis| {
            let outer = self.axis_interval(axis);
            let inner = other.axis_interval(axis);
            outer.min <= inner.min && inner.max <= outer.max
        })
    }

    /// Translate (move) the AABB by an offset vector.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb {
            x: self.x.offset(offset.x),
            y: self.y.offset(offset.y),
            z: self.z.offset(offset.z),
        }
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size > y_size && x_size > z_size {
            0
        } else if y_size > z_size {
            1
        } else {
            2
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min() + self.max()) * 0.5
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::from_points(Vec3::ZERO, Vec3::ONE)
    }

    #[test]
    fn test_from_points_any_order() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(aabb.min(), Vec3::ZERO);
        assert_eq!(aabb.max(), Vec3::splat(10.0));
    }

    #[test]
    fn test_flat_box_is_padded() {
        let flat = Aabb::from_points(Vec3::new(0.0, 5.0, 0.0), Vec3::new(1.0, 5.0, 1.0));
        assert!(flat.y.size() >= PAD_DELTA);
        assert!(flat.y.contains(5.0));
    }

    #[test]
    fn test_surrounding_contains_both() {
        let box1 = Aabb::from_points(Vec3::ZERO, Vec3::splat(5.0));
        let box2 = Aabb::from_points(Vec3::splat(3.0), Vec3::splat(10.0));
        let union = Aabb::surrounding(&box1, &box2);

        assert!(union.contains_box(&box1));
        assert!(union.contains_box(&box2));
        assert!(!box1.contains_box(&union));
    }

    #[test]
    fn test_hit_through_center() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::ONE);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_hit_respects_interval() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::ONE);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        // Box spans t in [4, 6]
        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.5)));
        assert!(!aabb.hit(&ray, Interval::new(6.5, 100.0)));
    }

    #[test]
    fn test_miss_pointing_away() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::ONE);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z, 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_box_miss_scenario() {
        // Ray starting beyond the far corner and moving further away.
        let ray = Ray::new(Vec3::splat(2.0), Vec3::ONE, 0.0);
        assert!(!unit_box().hit(&ray, Interval::new(0.0, f32::INFINITY)));
    }

    #[test]
    fn test_negative_direction_hits() {
        let ray = Ray::new(Vec3::splat(2.0), -Vec3::ONE, 0.0);
        assert!(unit_box().hit(&ray, Interval::new(0.0, f32::INFINITY)));
    }

    #[test]
    fn test_axis_parallel_ray() {
        // Direction has zero x and y components: slabs on those axes give
        // infinite bounds and only z constrains the interval.
        let inside = Ray::new(Vec3::new(0.5, 0.5, -3.0), Vec3::Z, 0.0);
        assert!(unit_box().hit(&inside, Interval::new(0.0, f32::INFINITY)));

        let outside = Ray::new(Vec3::new(1.5, 0.5, -3.0), Vec3::Z, 0.0);
        assert!(!unit_box().hit(&outside, Interval::new(0.0, f32::INFINITY)));
    }

    #[test]
    fn test_centroid_and_longest_axis() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(2.0, 10.0, 4.0));
        assert_eq!(aabb.centroid(), Vec3::new(1.0, 5.0, 2.0));
        assert_eq!(aabb.longest_axis(), 1);
    }

    #[test]
    fn test_translate() {
        let moved = unit_box().translate(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(moved.x.min, 5.0);
        assert_eq!(moved.x.max, 6.0);
        assert_eq!(moved.y.min, 0.0);
    }
}
