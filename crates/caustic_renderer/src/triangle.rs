//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{
    hittable::{HitRecord, Hittable},
    sampling::gen_f32,
    Material,
};
use caustic_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// A triangle primitive.
pub struct Triangle<M: Material> {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Per-vertex texture coordinates
    uvs: [[f32; 2]; 3],
    /// Face normal (unit length), from counter-clockwise winding
    normal: Vec3,
    area: f32,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Triangle<M> {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: M) -> Self {
        Self::with_uvs(v0, v1, v2, [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]], material)
    }

    pub fn with_uvs(v0: Vec3, v1: Vec3, v2: Vec3, uvs: [[f32; 2]; 3], material: M) -> Self {
        let cross = (v1 - v0).cross(v2 - v0);
        let area = 0.5 * cross.length();
        let normal = cross.normalize_or_zero();

        let bbox = Aabb::from_points(v0.min(v1).min(v2), v0.max(v1).max(v2));

        Self {
            v0,
            v1,
            v2,
            uvs,
            normal,
            area,
            material,
            bbox,
        }
    }

    /// Ray parameter and barycentrics `(t, b1, b2)` of the intersection.
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<(f32, f32, f32)> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let b1 = f * s.dot(h);
        if !(0.0..=1.0).contains(&b1) {
            return None;
        }

        let q = s.cross(edge1);
        let b2 = f * ray.direction().dot(q);
        if b2 < 0.0 || b1 + b2 > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        ray_t.surrounds(t).then_some((t, b1, b2))
    }
}

impl<M: Material + 'static> Hittable for Triangle<M> {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let Some((t, b1, b2)) = self.intersect(ray, ray_t) else {
            return false;
        };

        let b0 = 1.0 - b1 - b2;
        rec.t = t;
        rec.p = ray.at(t);
        rec.set_face_normal(ray, self.normal);
        rec.u = b0 * self.uvs[0][0] + b1 * self.uvs[1][0] + b2 * self.uvs[2][0];
        rec.v = b0 * self.uvs[0][1] + b1 * self.uvs[1][1] + b2 * self.uvs[2][1];
        rec.material = &self.material;
        rec.density = None;
        rec.boundary = None;

        true
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.bbox)
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        if self.area <= 0.0 {
            return 0.0;
        }
        let probe = Ray::new_simple(origin, direction);
        let Some((t, _, _)) = self.intersect(&probe, Interval::forward(0.001)) else {
            return 0.0;
        };

        let distance_squared = t * t * direction.length_squared();
        let cosine = (direction.dot(self.normal) / direction.length()).abs();
        if cosine <= 0.0 {
            return 0.0;
        }
        distance_squared / (cosine * self.area)
    }

    /// Direction toward a point uniformly distributed over the triangle.
    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let su = gen_f32(rng).sqrt();
        let r2 = gen_f32(rng);
        let b0 = 1.0 - su;
        let b1 = r2 * su;
        let point = b0 * self.v0 + b1 * self.v1 + (1.0 - b0 - b1) * self.v2;
        point - origin
    }

    fn area(&self) -> Option<f32> {
        Some(self.area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::test_rng;
    use crate::material::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_triangle() -> Triangle<Lambertian> {
        // Triangle in XY plane at z=-1, facing +Z
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            Lambertian::new(Vec3::new(0.5, 0.5, 0.5)),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = test_triangle();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        assert!(tri.hit(&ray, Interval::forward(0.001), &mut rec, &mut test_rng()));
        assert!((rec.t - 1.0).abs() < 0.001);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = test_triangle();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let mut rec = HitRecord::default();

        assert!(!tri.hit(&ray, Interval::forward(0.001), &mut rec, &mut test_rng()));
    }

    #[test]
    fn test_uv_interpolation() {
        let tri = Triangle::with_uvs(
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            Lambertian::new(Vec3::ONE),
        );
        let ray = Ray::new_simple(Vec3::new(0.25, 0.5, 1.0), -Vec3::Z);
        let mut rec = HitRecord::default();

        assert!(tri.hit(&ray, Interval::forward(0.001), &mut rec, &mut test_rng()));
        assert!((rec.u - 0.25).abs() < 1e-5);
        assert!((rec.v - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_pdf_matches_solid_angle_formula() {
        let tri = test_triangle();
        // Straight down onto the plane at distance 1: cos = 1, area = 2.
        let value = tri.pdf_value(Vec3::ZERO, -Vec3::Z);
        assert!((value - 0.5).abs() < 1e-5);
        assert_eq!(tri.pdf_value(Vec3::ZERO, Vec3::Z), 0.0);
    }

    #[test]
    fn test_random_points_lie_on_triangle() {
        let tri = test_triangle();
        let mut rng = StdRng::seed_from_u64(12);
        let origin = Vec3::new(0.0, 0.0, 3.0);

        for _ in 0..500 {
            let dir = tri.random(origin, &mut rng);
            let point = origin + dir;
            assert!((point.z + 1.0).abs() < 1e-5);
            assert!(point.y >= -1.0 - 1e-5 && point.y <= 1.0 + 1e-5);
            // Inside the two slanted edges x = +-(1 - y) / 2.
            assert!(point.x.abs() <= (1.0 - point.y) / 2.0 + 1e-5);
        }
    }
}
