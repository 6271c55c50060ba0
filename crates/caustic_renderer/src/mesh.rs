//! Triangle meshes as a single hittable.

use crate::{
    bvh::BvhNode,
    error::SceneResult,
    hittable::{HitRecord, Hittable, HittableList},
    triangle::Triangle,
    Material,
};
use caustic_core::Mesh;
use caustic_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// All triangles of a [`Mesh`] sharing one material, behind their own BVH.
///
/// Light sampling picks a triangle uniformly and then a point on it.
pub struct TriangleMesh {
    bvh: BvhNode,
    triangles: HittableList,
}

impl TriangleMesh {
    /// Fails with [`crate::SceneError::EmptyBvh`] when the mesh has no
    /// valid faces.
    pub fn new<M: Material + 'static>(mesh: &Mesh, material: M) -> SceneResult<Self> {
        let material = Arc::new(material);

        let triangles: Vec<Arc<dyn Hittable>> = mesh
            .triangles()
            .into_iter()
            .map(|tri| {
                let [v0, v1, v2] = tri.positions;
                Arc::new(Triangle::with_uvs(v0, v1, v2, tri.uvs, material.clone()))
                    as Arc<dyn Hittable>
            })
            .collect();

        log::debug!(
            "Triangle mesh: {} vertices, {} triangles",
            mesh.vertex_count(),
            triangles.len()
        );

        let list = triangles.iter().cloned().collect();
        let bvh = BvhNode::new(triangles)?;

        Ok(Self {
            bvh,
            triangles: list,
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

impl Hittable for TriangleMesh {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        self.bvh.hit(ray, ray_t, rec, rng)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.bvh.bounding_box()
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.triangles.pdf_value(origin, direction)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.triangles.random(origin, rng)
    }

    fn area(&self) -> Option<f32> {
        self.triangles.area()
    }
}
