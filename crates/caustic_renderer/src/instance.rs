//! Transformed geometry.
//!
//! [`Instance`] places a shape in the world through an affine `Mat4`: rays
//! are carried into the shape's local space, intersected there, and the hit
//! is carried back. [`FlipFace`] swaps which side of a surface counts as the
//! front.

use crate::hittable::{HitRecord, Hittable};
use caustic_math::{Aabb, Interval, Mat4, Mat4Ext, Ray, Vec3};
use rand::RngCore;

/// A shape under a local-to-world transform.
///
/// The local ray keeps the transformed (unnormalized) direction, so hit
/// parameters `t` are identical in both spaces. Light sampling through an
/// instance is exact for rigid transforms.
pub struct Instance<H: Hittable> {
    object: H,
    /// Local-to-world transform
    transform: Mat4,
    /// World-to-local transform
    inverse: Mat4,
    bbox: Option<Aabb>,
}

impl<H: Hittable> Instance<H> {
    /// Wrap `object` with a local-to-world transform.
    pub fn new(object: H, transform: Mat4) -> Self {
        let inverse = transform.inverse();
        let bbox = object
            .bounding_box()
            .map(|local| transform.transform_aabb(&local));

        Self {
            object,
            transform,
            inverse,
            bbox,
        }
    }

    pub fn translate(object: H, offset: Vec3) -> Self {
        Self::new(object, Mat4::from_translation(offset))
    }

    /// Rotate by `degrees` around `axis` through the origin.
    pub fn rotate(object: H, axis: Vec3, degrees: f32) -> Self {
        let axis = axis.try_normalize().unwrap_or(Vec3::Y);
        Self::new(object, Mat4::from_axis_angle(axis, degrees.to_radians()))
    }

    pub fn rotate_y(object: H, degrees: f32) -> Self {
        Self::new(object, Mat4::from_rotation_y(degrees.to_radians()))
    }

    /// Apply `transform` after the current one.
    pub fn then(self, transform: Mat4) -> Self {
        Self::new(self.object, transform * self.transform)
    }

    /// Translate after the current transform.
    pub fn then_translate(self, offset: Vec3) -> Self {
        self.then(Mat4::from_translation(offset))
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }
}

impl<H: Hittable> Hittable for Instance<H> {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let local_ray = ray.spawn(
            self.inverse.transform_point3(ray.origin()),
            self.inverse.transform_vector3(ray.direction()),
        );

        if !self.object.hit(&local_ray, ray_t, rec, rng) {
            return false;
        }

        rec.p = self.transform.transform_point3(rec.p);
        // Inverse-transpose keeps the normal facing against the world ray.
        rec.normal = self.inverse.transform_normal_with_inverse(rec.normal);
        // A medium's boundary lives in local space and cannot answer
        // world-space shadow rays. Dropping it makes them sample the medium.
        rec.density = None;
        rec.boundary = None;
        true
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.pdf_value(
            self.inverse.transform_point3(origin),
            self.inverse.transform_vector3(direction),
        )
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let local = self
            .object
            .random(self.inverse.transform_point3(origin), rng);
        self.transform.transform_vector3(local)
    }

    fn area(&self) -> Option<f32> {
        self.object.area().map(|a| a * self.transform.area_scale())
    }
}

/// Reports hits on the opposite face: `front_face` is inverted.
///
/// Used to make a one-sided emitter face the other way.
pub struct FlipFace<H: Hittable> {
    object: H,
}

impl<H: Hittable> FlipFace<H> {
    pub fn new(object: H) -> Self {
        Self { object }
    }
}

impl<H: Hittable> Hittable for FlipFace<H> {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        if !self.object.hit(ray, ray_t, rec, rng) {
            return false;
        }
        rec.front_face = !rec.front_face;
        true
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.object.bounding_box()
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.pdf_value(origin, direction)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random(origin, rng)
    }

    fn area(&self) -> Option<f32> {
        self.object.area()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::test_rng;
    use crate::material::{DiffuseLight, Lambertian};
    use crate::medium::ConstantMedium;
    use crate::rect::{Cuboid, Rect};
    use crate::sphere::Sphere;
    use crate::triangle::Triangle;
    use crate::Color;

    fn unit_triangle() -> Triangle<Lambertian> {
        Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Lambertian::new(Color::new(0.5, 0.5, 0.5)),
        )
    }

    #[test]
    fn test_identity_instance_matches_object() {
        let instance = Instance::new(unit_triangle(), Mat4::IDENTITY);
        let ray = Ray::new_simple(Vec3::new(0.25, 0.25, 1.0), -Vec3::Z);
        let mut rec = HitRecord::default();

        assert!(instance.hit(&ray, Interval::forward(0.001), &mut rec, &mut test_rng()));
        assert!((rec.t - 1.0).abs() < 1e-5);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_translated_instance() {
        let instance = Instance::translate(unit_triangle(), Vec3::new(0.0, 0.0, -5.0));
        let ray = Ray::new_simple(Vec3::new(0.25, 0.25, 0.0), -Vec3::Z);
        let mut rec = HitRecord::default();

        assert!(instance.hit(&ray, Interval::forward(0.001), &mut rec, &mut test_rng()));
        assert!((rec.p.z + 5.0).abs() < 1e-4);
        assert!((rec.t - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_scaled_instance_keeps_world_t() {
        // Unnormalized local direction: t stays in world units.
        let instance = Instance::new(unit_triangle(), Mat4::from_scale(Vec3::splat(4.0)));
        let ray = Ray::new_simple(Vec3::new(1.0, 1.0, 3.0), -Vec3::Z);
        let mut rec = HitRecord::default();

        assert!(instance.hit(&ray, Interval::forward(0.001), &mut rec, &mut test_rng()));
        assert!((rec.t - 3.0).abs() < 1e-4);
        assert!((rec.p - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-4);
        assert!((instance.area().unwrap() - 8.0).abs() < 1e-3);
    }

    #[test]
    fn test_rotated_box_bounds_and_hit() {
        let cube = Cuboid::new(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), Lambertian::new(Color::ONE));
        let instance = Instance::rotate_y(cube, 15.0).then_translate(Vec3::new(265.0, 0.0, 295.0));

        let bbox = instance.bounding_box().unwrap();
        assert!(bbox.contains_box(&Aabb::from_points(
            Vec3::new(265.0, 0.0, 295.0),
            Vec3::new(266.0, 329.0, 296.0)
        )));
        assert!((bbox.y.max - 330.0).abs() < 1e-2);

        // Straight down through the rotated footprint's first corner.
        let ray = Ray::new_simple(Vec3::new(266.0, 1000.0, 296.0), -Vec3::Y);
        let mut rec = HitRecord::default();
        assert!(instance.hit(&ray, Interval::forward(0.001), &mut rec, &mut test_rng()));
        assert!((rec.p.y - 330.0).abs() < 1e-2);
        assert!((rec.normal - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn test_rotation_composes() {
        let a = Instance::rotate_y(unit_triangle(), 30.0).then(Mat4::from_rotation_y(60f32.to_radians()));
        let b = Instance::rotate_y(unit_triangle(), 90.0);
        let diff = a.transform() - b.transform();
        assert!(diff.to_cols_array().iter().all(|x| x.abs() < 1e-5));
    }

    #[test]
    fn test_flip_face_inverts_front_face() {
        let light = Rect::xz(0.0, 1.0, 0.0, 1.0, 1.0, DiffuseLight::new(Color::ONE));
        let flipped = FlipFace::new(Rect::xz(0.0, 1.0, 0.0, 1.0, 1.0, DiffuseLight::new(Color::ONE)));
        let ray = Ray::new_simple(Vec3::new(0.5, 0.0, 0.5), Vec3::Y);

        let mut rec = HitRecord::default();
        assert!(light.hit(&ray, Interval::forward(0.001), &mut rec, &mut test_rng()));
        assert!(!rec.front_face);
        assert_eq!(rec.material.emitted(&ray, &rec), Color::ZERO);

        let mut rec = HitRecord::default();
        assert!(flipped.hit(&ray, Interval::forward(0.001), &mut rec, &mut test_rng()));
        assert!(rec.front_face);
        assert_eq!(rec.material.emitted(&ray, &rec), Color::ONE);
        assert_eq!(rec.normal, -Vec3::Y);
    }

    #[test]
    fn test_instance_light_pdf_is_rigid_invariant() {
        let rect = Rect::xz(-1.0, 1.0, -1.0, 1.0, 0.0, DiffuseLight::new(Color::ONE));
        let moved = Instance::translate(
            Rect::xz(-1.0, 1.0, -1.0, 1.0, 0.0, DiffuseLight::new(Color::ONE)),
            Vec3::new(3.0, 0.0, 0.0),
        );
        let dir = Vec3::new(0.2, 1.0, -0.1);
        let at_origin = rect.pdf_value(Vec3::new(0.0, -2.0, 0.0), dir);
        let translated = moved.pdf_value(Vec3::new(3.0, -2.0, 0.0), dir);
        assert!(at_origin > 0.0);
        assert!((at_origin - translated).abs() < 1e-5);
    }

    #[test]
    fn test_instanced_medium_drops_local_boundary() {
        let fog = ConstantMedium::new(
            Sphere::new(Vec3::ZERO, 1.0, Lambertian::new(Color::ONE)),
            1000.0,
            Color::ONE,
        );
        let moved = Instance::translate(fog, Vec3::new(0.0, 0.5, 0.0));
        let ray = Ray::new_simple(Vec3::new(-5.0, 0.5, 0.0), Vec3::X);

        let mut rec = HitRecord::default();
        assert!(moved.hit(&ray, Interval::forward(0.001), &mut rec, &mut test_rng()));
        assert!((rec.p.y - 0.5).abs() < 1e-5);
        assert!(rec.p.x > -1.0 && rec.p.x < 1.0);
        assert!(rec.density.is_none());
        assert!(rec.boundary.is_none());
    }
}
