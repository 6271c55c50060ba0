//! Indexed triangle meshes.
//!
//! Plain geometry data, independent of any intersection structure. The
//! renderer turns a `Mesh` into triangles with their own BVH.

use caustic_math::{Aabb, Vec3};

/// A mesh consisting of vertex positions, optional UVs, and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// UV coordinates (optional - one [u, v] per vertex)
    pub uvs: Option<Vec<[f32; 2]>>,

    /// Triangle indices (every 3 indices form a triangle, counter-clockwise
    /// seen from the front)
    pub indices: Vec<u32>,

    /// Axis-aligned bounding box
    pub bounds: Aabb,
}

impl Mesh {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            uvs: None,
            indices,
            bounds,
        }
    }

    /// Attach per-vertex UVs. Ignored (with a warning) if the count does not
    /// match the vertex count.
    pub fn with_uvs(mut self, uvs: Vec<[f32; 2]>) -> Self {
        if uvs.len() == self.positions.len() {
            self.uvs = Some(uvs);
        } else {
            log::warn!(
                "UV count ({}) doesn't match vertex count ({}), ignoring UVs",
                uvs.len(),
                self.positions.len()
            );
        }
        self
    }

    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        if positions.is_empty() {
            return Aabb::EMPTY;
        }

        let (min, max) = positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        );

        Aabb::from_points(min, max)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    /// Corner positions and UVs of every valid triangle.
    ///
    /// Faces referencing out-of-range vertices are skipped with a warning.
    /// Meshes without UVs get the per-triangle barycentric defaults
    /// `(0,0), (1,0), (0,1)`.
    pub fn triangles(&self) -> Vec<MeshTriangle> {
        let mut triangles = Vec::with_capacity(self.triangle_count());
        let n = self.positions.len();

        for face in self.indices.chunks_exact(3) {
            let idx = [face[0] as usize, face[1] as usize, face[2] as usize];

            if idx.iter().any(|&i| i >= n) {
                log::warn!(
                    "Invalid triangle indices: [{}, {}, {}], vertex count: {}",
                    idx[0],
                    idx[1],
                    idx[2],
                    n
                );
                continue;
            }

            let uvs = match &self.uvs {
                Some(uvs) => [uvs[idx[0]], uvs[idx[1]], uvs[idx[2]]],
                None => [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            };

            triangles.push(MeshTriangle {
                positions: [
                    self.positions[idx[0]],
                    self.positions[idx[1]],
                    self.positions[idx[2]],
                ],
                uvs,
            });
        }

        triangles
    }
}

/// One face extracted from a [`Mesh`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshTriangle {
    pub positions: [Vec3; 3],
    pub uvs: [[f32; 2]; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ];
        Mesh::new(positions, vec![0, 1, 2, 1, 3, 2])
    }

    #[test]
    fn test_mesh_counts() {
        let mesh = quad();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(!mesh.has_uvs());
    }

    #[test]
    fn test_bounds_computation() {
        let positions = vec![
            Vec3::new(-1.0, -2.0, -3.0),
            Vec3::new(4.0, 5.0, 6.0),
            Vec3::new(0.0, 0.0, 0.0),
        ];
        let mesh = Mesh::new(positions, vec![0, 1, 2]);

        assert!((mesh.bounds.x.min - (-1.0)).abs() < 0.001);
        assert!((mesh.bounds.x.max - 4.0).abs() < 0.001);
        assert!((mesh.bounds.y.min - (-2.0)).abs() < 0.001);
        assert!((mesh.bounds.z.max - 6.0).abs() < 0.001);
    }

    #[test]
    fn test_triangles_extracted_in_order() {
        let mesh = quad();
        let triangles = mesh.triangles();

        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[1].positions[0], mesh.positions[1]);
        assert_eq!(triangles[1].positions[1], mesh.positions[3]);
        assert_eq!(triangles[1].positions[2], mesh.positions[2]);
        assert_eq!(triangles[0].uvs[1], [1.0, 0.0]);
    }

    #[test]
    fn test_invalid_indices_skipped() {
        let mut mesh = quad();
        mesh.indices.extend_from_slice(&[0, 1, 99]);
        assert_eq!(mesh.triangles().len(), 2);
    }

    #[test]
    fn test_uvs_attached_per_vertex() {
        let uvs = vec![[0.0, 0.0], [0.5, 0.0], [0.0, 0.5], [0.5, 0.5]];
        let mesh = quad().with_uvs(uvs);
        assert!(mesh.has_uvs());
        assert_eq!(mesh.triangles()[1].uvs[1], [0.5, 0.5]);

        let mismatched = quad().with_uvs(vec![[0.0, 0.0]]);
        assert!(!mismatched.has_uvs());
    }
}
