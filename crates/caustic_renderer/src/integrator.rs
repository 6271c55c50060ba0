//! Radiance estimation along light paths.
//!
//! Each traced segment finds its closest hit, adds the emission there and
//! then either stops (absorption, Russian roulette) or continues. Specular
//! scatters continue along their fixed ray. Diffuse and volumetric scatters
//! pick the next direction according to the configured [`Strategy`].
//!
//! The next-event strategies split each diffuse bounce into a direct part
//! (one shadow ray toward a sampled light point) and an indirect part (one
//! BSDF-sampled continuation). The emission weight carried by the
//! continuation keeps light from being counted twice: NEE zeroes it wherever
//! the light sampler could have produced the direction, MIS uses the power
//! heuristic.

use crate::{
    config::RenderConfig,
    hittable::{HitRecord, Hittable},
    material::ScatterKind,
    pdf::{HittablePdf, MixturePdf, Pdf, ScatterPdf},
    sampling::gen_f32,
    scene::Scene,
    Color,
};
use caustic_math::{Interval, Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Nearest hit distance accepted for secondary rays (avoids self-intersection).
const RAY_EPSILON: f32 = 0.001;

/// How the integrator samples the direction after a diffuse or volumetric
/// scatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Sample the material's own distribution.
    Bsdf,
    /// Sample directions toward the lights only.
    Light,
    /// Pick light or material sampling with equal probability.
    Mixture,
    /// Next-event estimation: explicit shadow ray plus a BSDF continuation.
    Nee,
    /// Next-event estimation with power-heuristic weights.
    #[default]
    Mis,
}

/// Power-heuristic weights `(w_f, w_g)` for two sampling densities.
///
/// Both are zero when both densities are.
pub fn power_heuristic(f: f32, g: f32, beta: f32) -> (f32, f32) {
    let fb = f.max(0.0).powf(beta);
    let gb = g.max(0.0).powf(beta);
    let sum = fb + gb;
    if sum <= 0.0 || !sum.is_finite() {
        // Overflow only happens when one density dwarfs the other.
        return match (sum <= 0.0, f >= g) {
            (true, _) => (0.0, 0.0),
            (false, true) => (1.0, 0.0),
            (false, false) => (0.0, 1.0),
        };
    }
    (fb / sum, gb / sum)
}

/// Russian roulette: `Some(1 / p)` when the path survives, `None` when it
/// is terminated.
pub fn russian_roulette(rng: &mut dyn RngCore, probability: f32) -> Option<f32> {
    if probability >= 1.0 {
        return Some(1.0);
    }
    (gen_f32(rng) < probability).then(|| 1.0 / probability)
}

/// State carried by one traced segment.
#[derive(Debug, Clone, Copy)]
struct Segment {
    /// Bounces taken before this segment
    depth: u32,
    /// Factor applied to emission (and background) found by this segment
    emission_weight: f32,
    /// Shadow rays stop at their first hit and return only its emission
    shadow: bool,
}

impl Segment {
    fn camera() -> Self {
        Self {
            depth: 0,
            emission_weight: 1.0,
            shadow: false,
        }
    }

    fn bounce(depth: u32, emission_weight: f32) -> Self {
        Self {
            depth,
            emission_weight,
            shadow: false,
        }
    }

    fn shadow(depth: u32, emission_weight: f32) -> Self {
        Self {
            depth,
            emission_weight,
            shadow: true,
        }
    }
}

/// Path tracer over a built [`Scene`].
pub struct Integrator<'s> {
    scene: &'s Scene,
    strategy: Strategy,
    russian_roulette: f32,
    max_depth: u32,
    mis_beta: f32,
}

impl<'s> Integrator<'s> {
    pub fn new(scene: &'s Scene, config: &RenderConfig) -> Self {
        Self {
            scene,
            strategy: config.strategy,
            russian_roulette: config.russian_roulette.clamp(f32::MIN_POSITIVE, 1.0),
            max_depth: config.max_depth,
            mis_beta: config.mis_beta,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Estimate the radiance arriving along a camera ray.
    pub fn radiance(&self, ray: &Ray, rng: &mut dyn RngCore) -> Color {
        self.trace(ray, Segment::camera(), rng)
    }

    fn trace(&self, ray: &Ray, segment: Segment, rng: &mut dyn RngCore) -> Color {
        if segment.depth >= self.max_depth {
            return Color::ZERO;
        }

        let mut rec = HitRecord::default();
        if !self.scene.hit(ray, Interval::forward(RAY_EPSILON), &mut rec, rng) {
            // A shadow ray only ever looks for the light it was aimed at.
            if segment.shadow {
                return Color::ZERO;
            }
            return self.scene.background(ray) * segment.emission_weight;
        }

        let emitted = rec.material.emitted(ray, &rec) * segment.emission_weight;
        if segment.shadow {
            return emitted;
        }

        let Some(srec) = rec.material.scatter(ray, &rec, rng) else {
            return emitted;
        };
        let Some(rr_scale) = russian_roulette(rng, self.russian_roulette) else {
            return emitted;
        };

        let depth = segment.depth + 1;
        let incoming = match &srec.kind {
            ScatterKind::Specular { ray: specular, .. } => {
                self.trace(specular, Segment::bounce(depth, 1.0), rng)
            }
            ScatterKind::Pdf(bsdf) => self.scatter_diffuse(ray, &rec, bsdf, depth, rng),
        };

        emitted + rr_scale * srec.attenuation * incoming
    }

    /// Incoming radiance estimate at a diffuse or volumetric interaction,
    /// already weighted by `scattering_pdf / pdf`.
    fn scatter_diffuse(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        bsdf: &ScatterPdf,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let lights = self.scene.lights();
        if lights.is_empty() {
            return match self.strategy {
                // Nothing to aim at: only emission at this hit remains.
                Strategy::Light => Color::ZERO,
                _ => self.sample_continuation(ray_in, rec, bsdf, depth, rng),
            };
        }

        let light_pdf = HittablePdf::new(lights, rec.p);
        match self.strategy {
            Strategy::Bsdf => self.sample_continuation(ray_in, rec, bsdf, depth, rng),
            Strategy::Light => self.sample_continuation(ray_in, rec, &light_pdf, depth, rng),
            Strategy::Mixture => {
                let mixture = MixturePdf::new(&light_pdf, bsdf);
                self.sample_continuation(ray_in, rec, &mixture, depth, rng)
            }
            Strategy::Nee | Strategy::Mis => {
                let direct = self.direct_light(ray_in, rec, bsdf, &light_pdf, depth, rng);
                let indirect = self.indirect(ray_in, rec, bsdf, &light_pdf, depth, rng);
                direct + indirect
            }
        }
    }

    /// Sample one direction from `pdf` and trace it as an ordinary path.
    fn sample_continuation(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        pdf: &dyn Pdf,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let direction = scatter_direction(pdf.generate(rng), rec.normal);
        let pdf_value = pdf.value(direction);
        if pdf_value <= 0.0 {
            return Color::ZERO;
        }

        let scattered = ray_in.spawn(rec.p, direction);
        let f = rec.material.scattering_pdf(ray_in, rec, &scattered);
        if f <= 0.0 {
            return Color::ZERO;
        }

        f / pdf_value * self.trace(&scattered, Segment::bounce(depth, 1.0), rng)
    }

    /// Direct term of next-event estimation: one shadow ray toward a point
    /// sampled on the lights.
    fn direct_light(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        bsdf: &ScatterPdf,
        light_pdf: &HittablePdf,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let direction = light_pdf.generate(rng);
        if direction.length_squared() <= f32::EPSILON {
            return Color::ZERO;
        }
        let light_value = light_pdf.value(direction);
        if light_value <= 0.0 {
            return Color::ZERO;
        }

        let shadow_ray = ray_in.spawn(rec.p, direction);
        let f = rec.material.scattering_pdf(ray_in, rec, &shadow_ray);
        if f <= 0.0 {
            return Color::ZERO;
        }

        let weight = match self.strategy {
            Strategy::Mis => power_heuristic(light_value, bsdf.value(direction), self.mis_beta).0,
            _ => 1.0,
        };
        if weight <= 0.0 {
            return Color::ZERO;
        }

        let light = match (rec.density, rec.boundary) {
            (Some(density), Some(boundary)) => {
                self.shadow_through_medium(&shadow_ray, density, boundary, weight, depth, rng)
            }
            _ => self.trace(&shadow_ray, Segment::shadow(depth, weight), rng),
        };

        f / light_value * light
    }

    /// Shadow ray that starts inside a homogeneous medium: attenuate
    /// analytically up to the boundary exit and continue from there.
    fn shadow_through_medium(
        &self,
        shadow_ray: &Ray,
        density: f32,
        boundary: &dyn Hittable,
        weight: f32,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let mut exit = HitRecord::default();
        if !boundary.hit(shadow_ray, Interval::forward(RAY_EPSILON), &mut exit, rng) {
            return self.trace(shadow_ray, Segment::shadow(depth, weight), rng);
        }

        let distance = exit.t * shadow_ray.direction().length();
        let transmittance = (-density * distance).exp();
        let outside = shadow_ray.spawn(exit.p, shadow_ray.direction());
        transmittance * self.trace(&outside, Segment::shadow(depth, weight), rng)
    }

    /// Indirect term of next-event estimation: one BSDF-sampled continuation
    /// whose emission is weighted against the light sampler.
    fn indirect(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        bsdf: &ScatterPdf,
        light_pdf: &HittablePdf,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let direction = scatter_direction(bsdf.generate(rng), rec.normal);
        let bsdf_value = bsdf.value(direction);
        if bsdf_value <= 0.0 {
            return Color::ZERO;
        }

        let scattered = ray_in.spawn(rec.p, direction);
        let f = rec.material.scattering_pdf(ray_in, rec, &scattered);
        if f <= 0.0 {
            return Color::ZERO;
        }

        let light_value = light_pdf.value(direction);
        let emission_weight = match self.strategy {
            Strategy::Mis => power_heuristic(bsdf_value, light_value, self.mis_beta).0,
            _ if light_value > 0.0 => 0.0,
            _ => 1.0,
        };

        f / bsdf_value * self.trace(&scattered, Segment::bounce(depth, emission_weight), rng)
    }
}

/// Replace a degenerate sampled direction with the surface normal.
fn scatter_direction(direction: Vec3, normal: Vec3) -> Vec3 {
    if direction.length_squared() < 1e-16 || !direction.is_finite() {
        normal
    } else {
        direction
    }
}
