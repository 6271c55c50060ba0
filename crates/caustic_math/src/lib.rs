//! Math primitives for the caustic path tracer.
//!
//! Re-exports glam and adds the small set of types every renderer stage
//! shares: parameter intervals, bounding boxes, rays and orthonormal bases.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod onb;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;
pub use transform::Mat4Ext;

/// Axis index helper, 0 = X, 1 = Y, 2 = Z.
#[inline]
pub fn axis_component(v: Vec3, axis: usize) -> f32 {
    match axis {
        0 => v.x,
        1 => v.y,
        _ => v.z,
    }
}
