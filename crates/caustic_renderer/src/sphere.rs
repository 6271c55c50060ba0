//! Sphere primitives for ray tracing.

use crate::{
    hittable::{HitRecord, Hittable},
    sampling::{random_to_sphere, random_unit_vector},
    Material,
};
use caustic_math::{Aabb, Interval, Onb, Ray, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

/// Get the UV coordinates for a point on the unit sphere.
fn get_sphere_uv(p: Vec3) -> (f32, f32) {
    // theta: angle down from +Y
    // phi: angle around Y axis from -X
    let theta = (-p.y).clamp(-1.0, 1.0).acos();
    let phi = (-p.z).atan2(p.x) + PI;

    (phi / (2.0 * PI), theta / PI)
}

/// Nearest root of `|origin + t*dir - center| = radius` inside `ray_t`.
fn hit_sphere(center: Vec3, radius: f32, ray: &Ray, ray_t: Interval) -> Option<f32> {
    let a = ray.direction().length_squared();
    if a == 0.0 {
        return None;
    }

    let oc = center - ray.origin();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let root = (h - sqrtd) / a;
    if ray_t.surrounds(root) {
        return Some(root);
    }
    let root = (h + sqrtd) / a;
    ray_t.surrounds(root).then_some(root)
}

fn fill_record<'a>(
    rec: &mut HitRecord<'a>,
    ray: &Ray,
    t: f32,
    center: Vec3,
    radius: f32,
    material: &'a dyn Material,
) {
    rec.t = t;
    rec.p = ray.at(t);
    let outward_normal = (rec.p - center) / radius;
    rec.set_face_normal(ray, outward_normal);
    (rec.u, rec.v) = get_sphere_uv(outward_normal);
    rec.material = material;
    rec.density = None;
    rec.boundary = None;
}

/// A sphere primitive.
pub struct Sphere<M: Material> {
    center: Vec3,
    radius: f32,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Sphere<M> {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: M) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl<M: Material + 'static> Hittable for Sphere<M> {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        match hit_sphere(self.center, self.radius, ray, ray_t) {
            Some(t) => {
                fill_record(rec, ray, t, self.center, self.radius, &self.material);
                true
            }
            None => false,
        }
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.bbox)
    }

    /// Solid-angle density of directions toward the sphere: uniform over the
    /// subtended cone from outside, uniform over all directions from inside.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let distance_squared = (self.center - origin).length_squared();
        let radius_squared = self.radius * self.radius;

        if distance_squared < radius_squared {
            return 1.0 / (4.0 * PI);
        }
        if distance_squared == radius_squared {
            return 0.0;
        }

        let probe = Ray::new_simple(origin, direction);
        if hit_sphere(self.center, self.radius, &probe, Interval::forward(0.001)).is_none() {
            return 0.0;
        }

        let cos_theta_max = (1.0 - radius_squared / distance_squared).sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);
        1.0 / solid_angle
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.center - origin;
        let distance_squared = direction.length_squared();
        let radius_squared = self.radius * self.radius;

        if distance_squared < radius_squared {
            random_unit_vector(rng)
        } else if distance_squared == radius_squared {
            // On the surface: no cone to sample.
            Vec3::ZERO
        } else {
            Onb::from_w(direction).local(random_to_sphere(self.radius, distance_squared, rng))
        }
    }

    fn area(&self) -> Option<f32> {
        Some(4.0 * PI * self.radius * self.radius)
    }
}

/// A sphere whose center moves linearly over `[time0, time1]`.
pub struct MovingSphere<M: Material> {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: M,
}

impl<M: Material> MovingSphere<M> {
    pub fn new(
        center0: Vec3,
        center1: Vec3,
        time0: f32,
        time1: f32,
        radius: f32,
        material: M,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Center at `time`; clamps to the end positions outside the interval.
    pub fn center(&self, time: f32) -> Vec3 {
        let span = self.time1 - self.time0;
        if span <= 0.0 {
            return self.center0;
        }
        let s = ((time - self.time0) / span).clamp(0.0, 1.0);
        self.center0 + s * (self.center1 - self.center0)
    }
}

impl<M: Material + 'static> Hittable for MovingSphere<M> {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let center = self.center(ray.time());
        match hit_sphere(center, self.radius, ray, ray_t) {
            Some(t) => {
                fill_record(rec, ray, t, center, self.radius, &self.material);
                true
            }
            None => false,
        }
    }

    fn bounding_box(&self) -> Option<Aabb> {
        let rvec = Vec3::splat(self.radius);
        let box0 = Aabb::from_points(self.center0 - rvec, self.center0 + rvec);
        let box1 = Aabb::from_points(self.center1 - rvec, self.center1 + rvec);
        Some(Aabb::surrounding(&box0, &box1))
    }
}
