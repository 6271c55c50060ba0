//! Probability densities over directions.
//!
//! A `Pdf` draws directions (`generate`) and reports the solid-angle density
//! of the same distribution (`value`). Materials hand out the closed
//! [`ScatterPdf`] enum; the integrator combines it with light sampling
//! through [`HittablePdf`] and [`MixturePdf`].

use crate::hittable::Hittable;
use crate::sampling::{gen_f32, random_cosine_direction, random_unit_vector};
use caustic_math::{Onb, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

/// Density of the uniform distribution over the sphere of directions.
pub const UNIFORM_SPHERE_PDF: f32 = 1.0 / (4.0 * PI);

pub trait Pdf {
    /// Solid-angle density of `direction`.
    fn value(&self, direction: Vec3) -> f32;

    /// Draw a direction from this distribution.
    fn generate(&self, rng: &mut dyn RngCore) -> Vec3;
}

/// Cosine-weighted hemisphere around a normal.
#[derive(Debug, Clone, Copy)]
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    pub fn new(w: Vec3) -> Self {
        Self { uvw: Onb::from_w(w) }
    }
}

impl Pdf for CosinePdf {
    fn value(&self, direction: Vec3) -> f32 {
        let cosine = self.uvw.w().dot(direction.normalize_or_zero());
        if cosine <= 0.0 {
            0.0
        } else {
            cosine / PI
        }
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.uvw.local(random_cosine_direction(rng))
    }
}

/// Uniform over the whole sphere.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformPdf;

impl Pdf for UniformPdf {
    fn value(&self, _direction: Vec3) -> f32 {
        UNIFORM_SPHERE_PDF
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        random_unit_vector(rng)
    }
}

/// The distributions a material can ask the integrator to sample.
#[derive(Debug, Clone, Copy)]
pub enum ScatterPdf {
    Cosine(CosinePdf),
    Uniform(UniformPdf),
}

impl Pdf for ScatterPdf {
    fn value(&self, direction: Vec3) -> f32 {
        match self {
            ScatterPdf::Cosine(pdf) => pdf.value(direction),
            ScatterPdf::Uniform(pdf) => pdf.value(direction),
        }
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        match self {
            ScatterPdf::Cosine(pdf) => pdf.generate(rng),
            ScatterPdf::Uniform(pdf) => pdf.generate(rng),
        }
    }
}

/// Directions from `origin` toward a shape (usually the light list).
pub struct HittablePdf<'a> {
    target: &'a dyn Hittable,
    origin: Vec3,
}

impl<'a> HittablePdf<'a> {
    pub fn new(target: &'a dyn Hittable, origin: Vec3) -> Self {
        Self { target, origin }
    }
}

impl Pdf for HittablePdf<'_> {
    fn value(&self, direction: Vec3) -> f32 {
        self.target.pdf_value(self.origin, direction)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.target.random(self.origin, rng)
    }
}

/// Equal-weight mixture of two densities.
pub struct MixturePdf<'a> {
    a: &'a dyn Pdf,
    b: &'a dyn Pdf,
}

impl<'a> MixturePdf<'a> {
    pub fn new(a: &'a dyn Pdf, b: &'a dyn Pdf) -> Self {
        Self { a, b }
    }
}

impl Pdf for MixturePdf<'_> {
    fn value(&self, direction: Vec3) -> f32 {
        0.5 * self.a.value(direction) + 0.5 * self.b.value(direction)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        if gen_f32(rng) < 0.5 {
            self.a.generate(rng)
        } else {
            self.b.generate(rng)
        }
    }
}
