//! Hittable trait and HitRecord for ray-object intersection.

use crate::material::{Material, NoMaterial};
use crate::sampling::gen_f32;
use caustic_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Static absorbing material for HitRecord::default().
static NO_MATERIAL: NoMaterial = NoMaterial;

/// Record of a ray-object intersection.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal, always facing against the incoming ray
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// UV texture coordinates
    pub u: f32,
    pub v: f32,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Extinction coefficient, set only for interactions inside a medium
    pub density: Option<f32>,
    /// Boundary of the medium the interaction happened in
    pub boundary: Option<&'a dyn Hittable>,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            material: &NO_MATERIAL,
            u: 0.0,
            v: 0.0,
            t: 0.0,
            front_face: false,
            density: None,
            boundary: None,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Set the face normal based on ray direction and outward normal.
    ///
    /// `outward_normal` must be unit length.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
///
/// Shapes that can act as lights also implement `pdf_value` and `random`:
/// `random(origin)` returns a (not necessarily unit) direction from `origin`
/// toward a point on the shape, and `pdf_value(origin, direction)` is the
/// solid-angle density of that sampling.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within the given interval.
    ///
    /// Returns true if hit, and fills in the hit record. `rng` feeds
    /// stochastic shapes such as participating media.
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool;

    /// World-space bounds, or `None` for unbounded shapes.
    fn bounding_box(&self) -> Option<Aabb>;

    fn pdf_value(&self, _origin: Vec3, _direction: Vec3) -> f32 {
        0.0
    }

    fn random(&self, _origin: Vec3, _rng: &mut dyn RngCore) -> Vec3 {
        Vec3::X
    }

    /// Surface area, where it is known.
    fn area(&self) -> Option<f32> {
        None
    }
}

impl<H: Hittable + ?Sized> Hittable for Arc<H> {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        (**self).hit(ray, ray_t, rec, rng)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        (**self).bounding_box()
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        (**self).pdf_value(origin, direction)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        (**self).random(origin, rng)
    }

    fn area(&self) -> Option<f32> {
        (**self).area()
    }
}

/// A list of hittable objects, tested linearly.
///
/// As a light, a list samples one member uniformly and reports the average of
/// the members' densities.
#[derive(Clone, Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
    bbox: Option<Aabb>,
    unbounded: bool,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        match object.bounding_box() {
            Some(b) => {
                self.bbox = Some(match self.bbox {
                    Some(acc) => Aabb::surrounding(&acc, &b),
                    None => b,
                });
            }
            None => self.unbounded = true,
        }
        self.objects.push(object);
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.bbox = None;
        self.unbounded = false;
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }
}

impl FromIterator<Arc<dyn Hittable>> for HittableList {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Hittable>>>(iter: I) -> Self {
        let mut list = HittableList::new();
        for object in iter {
            list.add(object);
        }
        list
    }
}

impl Hittable for HittableList {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if object.hit(ray, ray_t.with_max(closest_so_far), rec, rng) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }

    fn bounding_box(&self) -> Option<Aabb> {
        if self.unbounded {
            None
        } else {
            self.bbox
        }
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        if self.objects.is_empty() {
            return 0.0;
        }
        let sum: f32 = self
            .objects
            .iter()
            .map(|o| o.pdf_value(origin, direction))
            .sum();
        sum / self.objects.len() as f32
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        if self.objects.is_empty() {
            return Vec3::X;
        }
        let n = self.objects.len();
        let index = ((gen_f32(rng) * n as f32) as usize).min(n - 1);
        self.objects[index].random(origin, rng)
    }

    fn area(&self) -> Option<f32> {
        self.objects.iter().map(|o| o.area()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::test_rng;
    use crate::material::Lambertian;
    use crate::sphere::Sphere;
    use crate::Color;

    fn sphere_at(z: f32) -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, z),
            0.5,
            Lambertian::new(Color::splat(0.5)),
        ))
    }

    #[test]
    fn test_set_face_normal() {
        let mut rec = HitRecord::default();
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);

        rec.set_face_normal(&ray, Vec3::Z);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);

        rec.set_face_normal(&ray, -Vec3::Z);
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_list_returns_closest() {
        let list: HittableList = [sphere_at(-5.0), sphere_at(-2.0), sphere_at(-8.0)]
            .into_iter()
            .collect();

        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);
        let mut rec = HitRecord::default();
        assert!(list.hit(&ray, Interval::forward(0.001), &mut rec, &mut test_rng()));
        assert!((rec.t - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_list_bounds() {
        let mut list = HittableList::new();
        assert!(list.bounding_box().is_none());

        list.add(sphere_at(-2.0));
        list.add(sphere_at(2.0));
        let bbox = list.bounding_box().unwrap();
        assert!((bbox.z.min + 2.5).abs() < 1e-4);
        assert!((bbox.z.max - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_list_pdf_is_average() {
        let a = sphere_at(-4.0);
        let b = sphere_at(4.0);
        let dir = -Vec3::Z;
        let expected = 0.5 * (a.pdf_value(Vec3::ZERO, dir) + b.pdf_value(Vec3::ZERO, dir));

        let list: HittableList = [a, b].into_iter().collect();
        let value = list.pdf_value(Vec3::ZERO, dir);
        assert!(value > 0.0);
        assert!((value - expected).abs() < 1e-6);
    }
}
