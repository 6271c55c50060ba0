//! Random sampling helpers shared by materials, shapes and PDFs.
//!
//! Everything takes `&mut dyn RngCore` so callers can pass the per-row
//! generator owned by the renderer.

use caustic_math::Vec3;
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Uniform `f32` in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform `f32` in `[min, max)`.
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Rejection-sampled point strictly inside the unit sphere.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniformly distributed direction on the unit sphere.
///
/// Maps a point of the unit disk onto the sphere (Marsaglia), which needs no
/// normalization and never produces a zero vector.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let u = gen_range(rng, -1.0, 1.0);
        let v = gen_range(rng, -1.0, 1.0);
        let r2 = u * u + v * v;
        if r2 < 1.0 {
            let s = 2.0 * (1.0 - r2).sqrt();
            return Vec3::new(u * s, v * s, 1.0 - 2.0 * r2);
        }
    }
}

/// Point in the unit disk of the XY plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_range(rng, -1.0, 1.0), gen_range(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Cosine-weighted direction on the +Z hemisphere (density `z / pi`).
pub fn random_cosine_direction(rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);
    let z = (1.0 - r2).sqrt();
    let phi = 2.0 * PI * r1;
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3::new(cos_phi * r2.sqrt(), sin_phi * r2.sqrt(), z)
}

/// Direction inside the cone around +Z subtended by a sphere of `radius` at
/// squared distance `distance_squared`, uniform in solid angle.
pub fn random_to_sphere(radius: f32, distance_squared: f32, rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);
    let cos_theta_max = (1.0 - radius * radius / distance_squared).max(0.0).sqrt();
    let z = 1.0 + r2 * (cos_theta_max - 1.0);

    let phi = 2.0 * PI * r1;
    let sin_theta = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, z)
}

/// Fixed-seed generator for tests.
#[cfg(test)]
pub(crate) fn test_rng() -> rand::rngs::StdRng {
    use rand::SeedableRng;
    rand::rngs::StdRng::seed_from_u64(0)
}
