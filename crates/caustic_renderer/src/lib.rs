//! Caustic Renderer - CPU Monte Carlo path tracing
//!
//! An offline path tracer that estimates the radiance reaching a camera by
//! sampling light transport paths:
//!
//! - **Geometry**: spheres, moving spheres, triangles and meshes, rectangles,
//!   boxes, infinite planes, affine instances
//! - **BVH**: median-split bounding volume hierarchy over shared primitives
//! - **Materials**: Lambertian, metal, dielectric, diffuse light, isotropic
//! - **Integrator**: BSDF, light, mixture, NEE and MIS sampling with Russian
//!   roulette
//! - **Media**: homogeneous participating media
//! - **Renderer**: row-parallel rendering with deterministic per-row seeds
//!
//! # Example
//!
//! ```ignore
//! use caustic_renderer::*;
//!
//! let mut builder = Scene::builder().with_background(Background::Sky);
//! builder.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, Lambertian::new(Color::splat(0.5))));
//! let scene = builder.build()?;
//!
//! let config = RenderConfig::default().with_resolution(400, 300).with_samples(64);
//! let image = render(&scene, &config);
//! ```

mod bvh;
mod camera;
mod config;
mod error;
mod hittable;
mod instance;
mod integrator;
mod material;
mod medium;
mod mesh;
mod pdf;
mod plane;
mod rect;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod triangle;

pub use bvh::{BvhNode, SplitAxis};
pub use camera::{Camera, ThinLensCamera};
pub use config::RenderConfig;
pub use error::{ConfigError, ConfigResult, SceneError, SceneResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use instance::{FlipFace, Instance};
pub use integrator::{power_heuristic, russian_roulette, Integrator, Strategy};
pub use material::{
    Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, NoMaterial,
    ScatterKind, ScatterRecord,
};
pub use medium::ConstantMedium;
pub use mesh::TriangleMesh;
pub use pdf::{CosinePdf, HittablePdf, MixturePdf, Pdf, ScatterPdf, UniformPdf};
pub use plane::Plane;
pub use rect::{Cuboid, Rect, RectAxis};
pub use renderer::{color_to_rgba, linear_to_gamma, render, render_with_progress, ImageBuffer};
pub use sampling::{gen_f32, gen_range, random_unit_vector};
pub use scene::{Background, Scene, SceneBuilder};
pub use sphere::{MovingSphere, Sphere};
pub use triangle::Triangle;

/// Re-export math types from caustic_math
pub use caustic_math::{Aabb, Interval, Mat4, Ray, Vec3};

/// Re-export scene data from caustic_core
pub use caustic_core::{Mesh, Texture};
