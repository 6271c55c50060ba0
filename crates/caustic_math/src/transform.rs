// Transform utilities for Mat4
//
// Extends glam::Mat4 with the pieces instancing needs: boxes, normals and
// how a transform scales surface area.

use crate::Aabb;
use glam::{Mat3, Mat4, Vec3};

/// Extension trait for Mat4 used by transformed primitives.
pub trait Mat4Ext {
    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;

    /// Transform a surface normal. `self` must be the *inverse* of the
    /// object-to-world matrix; the result is normalized.
    fn transform_normal_with_inverse(&self, normal: Vec3) -> Vec3;

    /// Factor by which this transform scales surface areas
    /// (`|det|^(2/3)`, exact for uniform scale).
    fn area_scale(&self) -> f32;
}

impl Mat4Ext for Mat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let lo = aabb.min();
        let hi = aabb.max();

        let mut result_min = Vec3::splat(f32::INFINITY);
        let mut result_max = Vec3::splat(f32::NEG_INFINITY);

        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            );
            let p = self.transform_point3(corner);
            result_min = result_min.min(p);
            result_max = result_max.max(p);
        }

        Aabb::from_points(result_min, result_max)
    }

    fn transform_normal_with_inverse(&self, normal: Vec3) -> Vec3 {
        let normal_matrix = Mat3::from_mat4(*self).transpose();
        (normal_matrix * normal).normalize()
    }

    fn area_scale(&self) -> f32 {
        Mat3::from_mat4(*self).determinant().abs().powf(2.0 / 3.0)
    }
}
