//! Gradient (Perlin) noise for procedural textures.

use glam::Vec3;
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

const POINT_COUNT: usize = 256;

/// Lattice gradient noise with Hermite-smoothed trilinear interpolation.
///
/// Tables are generated once from an RNG and read-only afterwards, so a
/// single generator can be shared by every texture through an `Arc`.
#[derive(Clone, Debug)]
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    /// Build the gradient and permutation tables from `rng`.
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let gradients = (0..POINT_COUNT)
            .map(|_| {
                let v = Vec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                );
                v.try_normalize().unwrap_or(Vec3::X)
            })
            .collect();

        Self {
            gradients,
            perm_x: Self::generate_perm(rng),
            perm_y: Self::generate_perm(rng),
            perm_z: Self::generate_perm(rng),
        }
    }

    /// Deterministic generator for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(&mut StdRng::seed_from_u64(seed))
    }

    fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
        perm.shuffle(rng);
        perm
    }

    /// Noise value at `p`, roughly in `[-1, 1]`.
    pub fn noise(&self, p: Vec3) -> f32 {
        let floor = p.floor();
        let frac = p - floor;

        let i = floor.x as i32;
        let j = floor.y as i32;
        let k = floor.z as i32;

        let mut corners = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in corners.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, corner) in row.iter_mut().enumerate() {
                    let idx = self.perm_x[((i + di as i32) & 255) as usize]
                        ^ self.perm_y[((j + dj as i32) & 255) as usize]
                        ^ self.perm_z[((k + dk as i32) & 255) as usize];
                    *corner = self.gradients[idx];
                }
            }
        }

        Self::trilinear_interp(&corners, frac)
    }

    /// Sum of `depth` octaves of noise, each at double frequency and half
    /// weight. Always non-negative.
    pub fn turb(&self, p: Vec3, depth: usize) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }

    fn trilinear_interp(c: &[[[Vec3; 2]; 2]; 2], f: Vec3) -> f32 {
        let smooth = f * f * (Vec3::splat(3.0) - 2.0 * f);
        let mut accum = 0.0;

        for (i, plane) in c.iter().enumerate() {
            for (j, row) in plane.iter().enumerate() {
                for (k, gradient) in row.iter().enumerate() {
                    let (fi, fj, fk) = (i as f32, j as f32, k as f32);
                    let weight_v = f - Vec3::new(fi, fj, fk);
                    accum += (fi * smooth.x + (1.0 - fi) * (1.0 - smooth.x))
                        * (fj * smooth.y + (1.0 - fj) * (1.0 - smooth.y))
                        * (fk * smooth.z + (1.0 - fk) * (1.0 - smooth.z))
                        * gradient.dot(weight_v);
                }
            }
        }

        accum
    }
}
