//! Homogeneous participating media.

use crate::{
    hittable::{HitRecord, Hittable},
    material::Isotropic,
    sampling::gen_f32,
    Color,
};
use caustic_core::Texture;
use caustic_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Gap between the entry hit and the search for the exit hit.
const EXIT_EPSILON: f32 = 0.0001;

/// A volume of constant density filling a closed boundary shape.
///
/// Rays inside scatter at a constant rate `density` per unit length; the
/// direction of a scattered ray follows an isotropic phase function.
pub struct ConstantMedium<H: Hittable> {
    boundary: H,
    density: f32,
    phase: Isotropic,
}

impl<H: Hittable> ConstantMedium<H> {
    pub fn new(boundary: H, density: f32, albedo: Color) -> Self {
        Self::textured(boundary, density, Texture::Solid(albedo))
    }

    pub fn textured(boundary: H, density: f32, albedo: Texture) -> Self {
        Self {
            boundary,
            density: density.max(0.0),
            phase: Isotropic::textured(albedo),
        }
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn boundary(&self) -> &H {
        &self.boundary
    }
}

impl<H: Hittable + 'static> Hittable for ConstantMedium<H> {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        if self.density <= 0.0 {
            return false;
        }

        let mut entry = HitRecord::default();
        let mut exit = HitRecord::default();

        if !self.boundary.hit(ray, Interval::UNIVERSE, &mut entry, rng) {
            return false;
        }
        let after_entry = Interval::forward(entry.t + EXIT_EPSILON);
        if !self.boundary.hit(ray, after_entry, &mut exit, rng) {
            return false;
        }

        let t_enter = entry.t.max(ray_t.min).max(0.0);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return false;
        }

        let ray_length = ray.direction().length();
        let distance_inside = (t_exit - t_enter) * ray_length;
        // 1 - [0, 1) keeps the logarithm finite.
        let hit_distance = -(1.0 - gen_f32(rng)).ln() / self.density;
        if hit_distance > distance_inside {
            return false;
        }

        rec.t = t_enter + hit_distance / ray_length;
        rec.p = ray.at(rec.t);
        rec.normal = Vec3::X; // arbitrary
        rec.front_face = true;
        rec.u = 0.0;
        rec.v = 0.0;
        rec.material = &self.phase;
        rec.density = Some(self.density);
        rec.boundary = Some(&self.boundary);

        true
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.boundary.bounding_box()
    }
}
