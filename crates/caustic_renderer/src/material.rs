//! Materials: how light interacts with surfaces and media.

use crate::hittable::HitRecord;
use crate::pdf::{CosinePdf, ScatterPdf, UniformPdf, UNIFORM_SPHERE_PDF};
use crate::sampling::{gen_f32, random_in_unit_sphere};
use caustic_core::Texture;
use caustic_math::{Ray, Vec3};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// Color type alias (linear RGB)
pub type Color = Vec3;

/// How a scattered ray continues.
#[derive(Debug, Clone, Copy)]
pub enum ScatterKind {
    /// A single deterministic continuation (mirror, glass).
    Specular { ray: Ray, is_refractive: bool },
    /// Directions are sampled by the integrator from this density.
    Pdf(ScatterPdf),
}

/// Result of a successful scatter.
#[derive(Debug, Clone, Copy)]
pub struct ScatterRecord {
    pub attenuation: Color,
    pub kind: ScatterKind,
    /// The interaction happened inside a participating medium.
    pub is_medium: bool,
}

impl ScatterRecord {
    pub fn is_specular(&self) -> bool {
        matches!(self.kind, ScatterKind::Specular { .. })
    }

    pub fn is_refractive(&self) -> bool {
        matches!(
            self.kind,
            ScatterKind::Specular {
                is_refractive: true,
                ..
            }
        )
    }
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Light emitted toward the incoming ray. Most materials emit nothing.
    fn emitted(&self, _ray_in: &Ray, _rec: &HitRecord) -> Color {
        Color::ZERO
    }

    /// Scatter an incoming ray, or `None` if it is absorbed.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord>;

    /// Density of the material's own scattering lobe for `scattered`.
    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        0.0
    }
}

impl<M: Material + ?Sized> Material for Arc<M> {
    fn emitted(&self, ray_in: &Ray, rec: &HitRecord) -> Color {
        (**self).emitted(ray_in, rec)
    }

    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        (**self).scatter(ray_in, rec, rng)
    }

    fn scattering_pdf(&self, ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        (**self).scattering_pdf(ray_in, rec, scattered)
    }
}

/// Absorbs everything and emits nothing.
///
/// Used for shapes that only exist to be sampled as lights.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMaterial;

impl Material for NoMaterial {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        None
    }
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Texture,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self::textured(Texture::Solid(albedo))
    }

    pub fn textured(albedo: Texture) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        Some(ScatterRecord {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            kind: ScatterKind::Pdf(ScatterPdf::Cosine(CosinePdf::new(rec.normal))),
            is_medium: false,
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        let cosine = rec.normal.dot(scattered.direction().normalize_or_zero());
        if cosine < 0.0 {
            0.0
        } else {
            cosine / PI
        }
    }
}

/// Metal (specular) material.
#[derive(Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz can push the lobe below the surface; absorb those.
        if scattered_dir.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterRecord {
            attenuation: self.albedo,
            kind: ScatterKind::Specular {
                ray: ray_in.spawn(rec.p, scattered_dir),
                is_refractive: false,
            },
            is_medium: false,
        })
    }
}

/// Dielectric (glass) material.
#[derive(Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, ior: f32) -> f32 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        // Total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;
        let reflects =
            cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng);

        let direction = if reflects {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterRecord {
            attenuation: Color::ONE,
            kind: ScatterKind::Specular {
                ray: ray_in.spawn(rec.p, direction),
                is_refractive: !reflects,
            },
            is_medium: false,
        })
    }
}

/// Diffuse light emitter. Emits from its front face only.
#[derive(Clone)]
pub struct DiffuseLight {
    emit: Texture,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(emit: Color) -> Self {
        Self::textured(Texture::Solid(emit))
    }

    pub fn textured(emit: Texture) -> Self {
        Self { emit }
    }
}

impl Material for DiffuseLight {
    fn emitted(&self, _ray_in: &Ray, rec: &HitRecord) -> Color {
        if rec.front_face {
            self.emit.value(rec.u, rec.v, rec.p)
        } else {
            Color::ZERO
        }
    }

    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        None
    }
}

/// Phase function of a participating medium: scatters uniformly.
#[derive(Clone)]
pub struct Isotropic {
    albedo: Texture,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self::textured(Texture::Solid(albedo))
    }

    pub fn textured(albedo: Texture) -> Self {
        Self { albedo }
    }
}

impl Material for Isotropic {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        Some(ScatterRecord {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            kind: ScatterKind::Pdf(ScatterPdf::Uniform(UniformPdf)),
            is_medium: true,
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        UNIFORM_SPHERE_PDF
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub(crate) fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface.
#[inline]
pub(crate) fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
