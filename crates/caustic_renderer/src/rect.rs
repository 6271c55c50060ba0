//! Axis-aligned rectangles and boxes built from them.

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    instance::FlipFace,
    sampling::gen_range,
    Material,
};
use caustic_math::{axis_component, Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Plane a rectangle lies in. The rectangle spans the first two axes and sits
/// at a constant coordinate `k` on the third.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectAxis {
    /// Spans x and y, constant z, faces +Z.
    XY,
    /// Spans x and z, constant y, faces +Y.
    XZ,
    /// Spans y and z, constant x, faces +X.
    YZ,
}

impl RectAxis {
    /// `(a, b, k)` axis indices.
    fn indices(self) -> (usize, usize, usize) {
        match self {
            RectAxis::XY => (0, 1, 2),
            RectAxis::XZ => (0, 2, 1),
            RectAxis::YZ => (1, 2, 0),
        }
    }

    fn normal(self) -> Vec3 {
        match self {
            RectAxis::XY => Vec3::Z,
            RectAxis::XZ => Vec3::Y,
            RectAxis::YZ => Vec3::X,
        }
    }

    /// Point with in-plane coordinates `(a, b)` at offset `k`.
    fn point(self, a: f32, b: f32, k: f32) -> Vec3 {
        match self {
            RectAxis::XY => Vec3::new(a, b, k),
            RectAxis::XZ => Vec3::new(a, k, b),
            RectAxis::YZ => Vec3::new(k, a, b),
        }
    }
}

/// An axis-aligned rectangle `[a0, a1] x [b0, b1]` at offset `k`.
pub struct Rect<M: Material> {
    axis: RectAxis,
    a0: f32,
    a1: f32,
    b0: f32,
    b1: f32,
    k: f32,
    material: M,
}

impl<M: Material> Rect<M> {
    pub fn new(axis: RectAxis, a: (f32, f32), b: (f32, f32), k: f32, material: M) -> Self {
        Self {
            axis,
            a0: a.0.min(a.1),
            a1: a.0.max(a.1),
            b0: b.0.min(b.1),
            b1: b.0.max(b.1),
            k,
            material,
        }
    }

    pub fn xy(x0: f32, x1: f32, y0: f32, y1: f32, k: f32, material: M) -> Self {
        Self::new(RectAxis::XY, (x0, x1), (y0, y1), k, material)
    }

    pub fn xz(x0: f32, x1: f32, z0: f32, z1: f32, k: f32, material: M) -> Self {
        Self::new(RectAxis::XZ, (x0, x1), (z0, z1), k, material)
    }

    pub fn yz(y0: f32, y1: f32, z0: f32, z1: f32, k: f32, material: M) -> Self {
        Self::new(RectAxis::YZ, (y0, y1), (z0, z1), k, material)
    }

    /// `(t, a, b)` where the ray crosses the rectangle.
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<(f32, f32, f32)> {
        let (ia, ib, ik) = self.axis.indices();
        let origin = ray.origin();
        let dir = ray.direction();

        let t = (self.k - axis_component(origin, ik)) / axis_component(dir, ik);
        // NaN (ray in the plane) fails the comparison too.
        if !ray_t.surrounds(t) {
            return None;
        }

        let a = axis_component(origin, ia) + t * axis_component(dir, ia);
        let b = axis_component(origin, ib) + t * axis_component(dir, ib);
        if a < self.a0 || a > self.a1 || b < self.b0 || b > self.b1 {
            return None;
        }

        Some((t, a, b))
    }

    fn rect_area(&self) -> f32 {
        (self.a1 - self.a0) * (self.b1 - self.b0)
    }
}

impl<M: Material + 'static> Hittable for Rect<M> {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let Some((t, a, b)) = self.intersect(ray, ray_t) else {
            return false;
        };

        rec.u = (a - self.a0) / (self.a1 - self.a0);
        rec.v = (b - self.b0) / (self.b1 - self.b0);
        rec.t = t;
        rec.p = ray.at(t);
        rec.set_face_normal(ray, self.axis.normal());
        rec.material = &self.material;
        rec.density = None;
        rec.boundary = None;

        true
    }

    fn bounding_box(&self) -> Option<Aabb> {
        let lo = self.axis.point(self.a0, self.b0, self.k);
        let hi = self.axis.point(self.a1, self.b1, self.k);
        Some(Aabb::from_points(lo, hi))
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let area = self.rect_area();
        if area <= 0.0 {
            return 0.0;
        }
        let probe = Ray::new_simple(origin, direction);
        let Some((t, _, _)) = self.intersect(&probe, Interval::forward(0.001)) else {
            return 0.0;
        };

        let distance_squared = t * t * direction.length_squared();
        let cosine = (direction.dot(self.axis.normal()) / direction.length()).abs();
        distance_squared / (cosine * area)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let a = gen_range(rng, self.a0, self.a1);
        let b = gen_range(rng, self.b0, self.b1);
        self.axis.point(a, b, self.k) - origin
    }

    fn area(&self) -> Option<f32> {
        Some(self.rect_area())
    }
}

/// A closed axis-aligned box made of six rectangles with outward normals.
pub struct Cuboid {
    sides: HittableList,
    bbox: Aabb,
}

impl Cuboid {
    pub fn new<M: Material + 'static>(p0: Vec3, p1: Vec3, material: M) -> Self {
        let lo = p0.min(p1);
        let hi = p0.max(p1);
        let material = Arc::new(material);
        let mut sides = HittableList::new();

        // Faces on the max side already face outward; min-side faces are
        // flipped.
        sides.add(Arc::new(Rect::xy(lo.x, hi.x, lo.y, hi.y, hi.z, material.clone())));
        sides.add(Arc::new(FlipFace::new(Rect::xy(
            lo.x,
            hi.x,
            lo.y,
            hi.y,
            lo.z,
            material.clone(),
        ))));
        sides.add(Arc::new(Rect::xz(lo.x, hi.x, lo.z, hi.z, hi.y, material.clone())));
        sides.add(Arc::new(FlipFace::new(Rect::xz(
            lo.x,
            hi.x,
            lo.z,
            hi.z,
            lo.y,
            material.clone(),
        ))));
        sides.add(Arc::new(Rect::yz(lo.y, hi.y, lo.z, hi.z, hi.x, material.clone())));
        sides.add(Arc::new(FlipFace::new(Rect::yz(
            lo.y, hi.y, lo.z, hi.z, lo.x, material,
        ))));

        Self {
            sides,
            bbox: Aabb::from_points(lo, hi),
        }
    }
}

impl Hittable for Cuboid {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        self.sides.hit(ray, ray_t, rec, rng)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.bbox)
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.sides.pdf_value(origin, direction)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.sides.random(origin, rng)
    }

    fn area(&self) -> Option<f32> {
        self.sides.area()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::test_rng;
    use crate::material::{Lambertian, NoMaterial};
    use crate::pdf::{HittablePdf, Pdf};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_xz_rect_hit_from_below() {
        let light = Rect::xz(213.0, 343.0, 227.0, 332.0, 554.0, NoMaterial);
        let ray = Ray::new_simple(Vec3::new(278.0, 0.0, 278.0), Vec3::Y);
        let mut rec = HitRecord::default();

        assert!(light.hit(&ray, Interval::forward(0.001), &mut rec, &mut test_rng()));
        assert!((rec.t - 554.0).abs() < 1e-3);
        // Outward normal is +Y, the ray comes from below.
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::Y);
        assert!((rec.u - (278.0 - 213.0) / 130.0).abs() < 1e-5);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let rect = Rect::xy(0.0, 1.0, 0.0, 1.0, 0.0, NoMaterial);
        let ray = Ray::new_simple(Vec3::new(0.5, 0.5, 0.0), Vec3::X);
        let mut rec = HitRecord::default();
        assert!(!rect.hit(&ray, Interval::forward(0.001), &mut rec, &mut test_rng()));
    }

    #[test]
    fn test_bbox_is_padded() {
        let rect = Rect::yz(0.0, 2.0, 0.0, 3.0, 5.0, NoMaterial);
        let bbox = rect.bounding_box().unwrap();
        assert!(bbox.x.size() > 0.0);
        assert!(bbox.x.contains(5.0));
        assert_eq!(bbox.z.max, 3.0);
    }

    #[test]
    fn test_pdf_value_straight_on() {
        let rect = Rect::xz(-1.0, 1.0, -1.0, 1.0, 2.0, NoMaterial);
        // Distance 2, cos 1, area 4.
        let value = rect.pdf_value(Vec3::ZERO, Vec3::Y);
        assert!((value - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_light_pdf_estimates_solid_angle() {
        // E[1 / pdf(d)] for d ~ pdf equals the solid angle of the rectangle.
        // A unit square at distance 1, seen head-on from its center, subtends
        // 4 * asin(1/5).
        let rect = Rect::xz(-0.5, 0.5, -0.5, 0.5, 1.0, NoMaterial);
        let pdf = HittablePdf::new(&rect, Vec3::ZERO);
        let mut rng = StdRng::seed_from_u64(21);
        let n = 50_000;

        let sum: f32 = (0..n)
            .map(|_| {
                let d = pdf.generate(&mut rng);
                1.0 / pdf.value(d)
            })
            .sum();
        let estimate = sum / n as f32;
        let exact = 4.0 * 0.2_f32.asin();
        assert!((estimate - exact).abs() / exact < 0.01, "{} vs {}", estimate, exact);
    }

    #[test]
    fn test_cuboid_normals_point_outward() {
        let cube = Cuboid::new(Vec3::ZERO, Vec3::ONE, Lambertian::new(Vec3::ONE));
        let mut rec = HitRecord::default();

        // From outside on the min-x side.
        let ray = Ray::new_simple(Vec3::new(-1.0, 0.5, 0.5), Vec3::X);
        assert!(cube.hit(&ray, Interval::forward(0.001), &mut rec, &mut test_rng()));
        assert!((rec.t - 1.0).abs() < 1e-5);
        assert!(rec.front_face);
        assert_eq!(rec.normal, -Vec3::X);

        // From inside toward max-y.
        let ray = Ray::new_simple(Vec3::splat(0.5), Vec3::Y);
        assert!(cube.hit(&ray, Interval::forward(0.001), &mut rec, &mut test_rng()));
        assert!(!rec.front_face);
        assert!((cube.area().unwrap() - 6.0).abs() < 1e-5);
    }
}
