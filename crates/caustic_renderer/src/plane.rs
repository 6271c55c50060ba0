//! Infinite plane primitive.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use caustic_math::{Aabb, Interval, Onb, Ray, Vec3};
use rand::RngCore;

/// An infinite plane through `point` with unit `normal`.
///
/// Has no bounding box, so scenes keep it outside the BVH.
pub struct Plane<M: Material> {
    point: Vec3,
    basis: Onb,
    material: M,
}

impl<M: Material> Plane<M> {
    pub fn new(point: Vec3, normal: Vec3, material: M) -> Self {
        let normal = normal.try_normalize().unwrap_or(Vec3::Y);
        Self {
            point,
            basis: Onb::from_w(normal),
            material,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.basis.w()
    }
}

impl<M: Material + 'static> Hittable for Plane<M> {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let normal = self.basis.w();
        let denom = normal.dot(ray.direction());
        if denom.abs() < 1e-8 {
            return false;
        }

        let t = (self.point - ray.origin()).dot(normal) / denom;
        if !ray_t.surrounds(t) {
            return false;
        }

        rec.t = t;
        rec.p = ray.at(t);
        rec.set_face_normal(ray, normal);
        // Tile texture space once per world unit along the tangents.
        let local = rec.p - self.point;
        rec.u = local.dot(self.basis.u()).rem_euclid(1.0);
        rec.v = local.dot(self.basis.v()).rem_euclid(1.0);
        rec.material = &self.material;
        rec.density = None;
        rec.boundary = None;

        true
    }

    fn bounding_box(&self) -> Option<Aabb> {
        None
    }
}
