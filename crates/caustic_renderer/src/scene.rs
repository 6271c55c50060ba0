//! Scene assembly: geometry, lights, background and camera.

use crate::{
    bvh::{BvhNode, SplitAxis},
    camera::{Camera, ThinLensCamera},
    error::{SceneError, SceneResult},
    hittable::{HitRecord, Hittable, HittableList},
    Color,
};
use caustic_math::{Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Radiance arriving along rays that leave the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Solid(Color),
    /// White at the horizon blending to light blue straight up.
    Sky,
}

impl Background {
    pub fn value(&self, direction: Vec3) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::Sky => {
                let unit_direction = direction.normalize_or_zero();
                let a = 0.5 * (unit_direction.y + 1.0);
                let white = Color::new(1.0, 1.0, 1.0);
                let blue = Color::new(0.5, 0.7, 1.0);
                white * (1.0 - a) + blue * a
            }
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}

/// A built scene. Immutable and shared by all render threads.
pub struct Scene {
    world: BvhNode,
    unbounded: HittableList,
    lights: HittableList,
    background: Background,
    camera: Arc<dyn Camera>,
}

impl Scene {
    pub fn builder() -> SceneBuilder {
        SceneBuilder::new()
    }

    /// Closest hit among all primitives, bounded or not.
    pub fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let hit_world = self.world.hit(ray, ray_t, rec, rng);
        let ray_t = if hit_world { ray_t.with_max(rec.t) } else { ray_t };
        let hit_unbounded = self.unbounded.hit(ray, ray_t, rec, rng);
        hit_world || hit_unbounded
    }

    /// Radiance for a ray that hit nothing.
    pub fn background(&self, ray: &Ray) -> Color {
        self.background.value(ray.direction())
    }

    /// Shapes that are importance sampled as light sources.
    pub fn lights(&self) -> &HittableList {
        &self.lights
    }

    pub fn camera(&self) -> &dyn Camera {
        self.camera.as_ref()
    }
}

/// Collects primitives and lights, then builds the BVH.
///
/// ```ignore
/// let mut builder = Scene::builder().with_camera(camera);
/// builder.add(Sphere::new(Vec3::ZERO, 1.0, Lambertian::new(Color::ONE)));
/// builder.add_emitter(Rect::xz(-1.0, 1.0, -1.0, 1.0, 3.0, DiffuseLight::new(Color::splat(4.0))));
/// let scene = builder.build()?;
/// ```
#[derive(Default)]
pub struct SceneBuilder {
    objects: Vec<Arc<dyn Hittable>>,
    unbounded: Vec<Arc<dyn Hittable>>,
    lights: Vec<Arc<dyn Hittable>>,
    background: Background,
    camera: Option<Arc<dyn Camera>>,
    split_axis: SplitAxis,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    pub fn with_camera(mut self, camera: impl Camera + 'static) -> Self {
        self.camera = Some(Arc::new(camera));
        self
    }

    /// Set the BVH split policy.
    pub fn with_split_axis(mut self, split_axis: SplitAxis) -> Self {
        self.split_axis = split_axis;
        self
    }

    /// Add a bounded primitive to the BVH.
    pub fn add(&mut self, object: impl Hittable + 'static) -> &mut Self {
        self.objects.push(Arc::new(object));
        self
    }

    /// Add a primitive already shared elsewhere.
    pub fn add_shared(&mut self, object: Arc<dyn Hittable>) -> &mut Self {
        self.objects.push(object);
        self
    }

    /// Add a primitive without a bounding box (e.g. a plane). Tested outside
    /// the BVH.
    pub fn add_unbounded(&mut self, object: impl Hittable + 'static) -> &mut Self {
        self.unbounded.push(Arc::new(object));
        self
    }

    /// Register a shape for light sampling only. It is not rendered, so it
    /// usually mirrors an emitter added with [`SceneBuilder::add`].
    pub fn add_light(&mut self, shape: impl Hittable + 'static) -> &mut Self {
        self.lights.push(Arc::new(shape));
        self
    }

    /// Add an emitting primitive that is both rendered and light sampled.
    pub fn add_emitter(&mut self, object: impl Hittable + 'static) -> &mut Self {
        let object: Arc<dyn Hittable> = Arc::new(object);
        self.lights.push(object.clone());
        self.objects.push(object);
        self
    }

    pub fn build(self) -> SceneResult<Scene> {
        if self.objects.is_empty() {
            return Err(SceneError::EmptyScene);
        }

        for (index, light) in self.lights.iter().enumerate() {
            // A shape that cannot report its area cannot be sampled either.
            if light.area().unwrap_or(0.0) <= 0.0 {
                return Err(SceneError::ZeroAreaLight { index });
            }
        }

        let primitive_count = self.objects.len();
        let world = BvhNode::with_policy(self.objects, self.split_axis)?;
        let lights: HittableList = self.lights.into_iter().collect();
        let unbounded: HittableList = self.unbounded.into_iter().collect();

        log::info!(
            "Scene built: {} primitives, {} unbounded, {} lights",
            primitive_count,
            unbounded.len(),
            lights.len()
        );
        if lights.is_empty() {
            log::debug!("No lights registered, light sampling strategies fall back to BSDF sampling");
        }

        Ok(Scene {
            world,
            unbounded,
            lights,
            background: self.background,
            camera: self
                .camera
                .unwrap_or_else(|| Arc::new(ThinLensCamera::default())),
        })
    }
}
