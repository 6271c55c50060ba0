//! Cameras for primary ray generation.

use crate::sampling::{gen_range, random_in_unit_disk};
use caustic_math::{Ray, Vec3};
use rand::RngCore;

/// Produces primary rays for normalized image-plane coordinates.
pub trait Camera: Send + Sync {
    /// Ray through `(s, t)`, both in `[0, 1]`: `s` runs left to right and
    /// `t` bottom to top.
    fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray;
}

/// Thin-lens perspective camera with defocus blur and a shutter interval.
#[derive(Debug, Clone)]
pub struct ThinLensCamera {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,         // Vertical field of view in degrees
    aspect_ratio: f32, // Width over height
    aperture: f32,     // Lens diameter
    focus_dist: f32,   // Distance from camera to plane of perfect focus

    // Shutter open/close times
    time0: f32,
    time1: f32,

    // Derived from the settings above
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

impl ThinLensCamera {
    /// Camera at the origin looking down -Z with a square 90 degree view.
    pub fn new() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 1.0,
            aperture: 0.0,
            focus_dist: 1.0,
            time0: 0.0,
            time1: 0.0,
            lower_left: Vec3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            lens_radius: 0.0,
        }
        .update()
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.update()
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture.max(0.0);
        self.focus_dist = focus_dist;
        self.update()
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self.update()
    }

    /// Set the shutter interval rays are timed within.
    pub fn with_shutter(mut self, time0: f32, time1: f32) -> Self {
        self.time0 = time0;
        self.time1 = time1;
        self.update()
    }

    pub fn look_from(&self) -> Vec3 {
        self.look_from
    }

    /// Recompute the image plane from the current settings.
    fn update(mut self) -> Self {
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = self.aspect_ratio * viewport_height;

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).try_normalize().unwrap_or(Vec3::Z);
        self.u = self.vup.cross(self.w).try_normalize().unwrap_or(Vec3::X);
        self.v = self.w.cross(self.u);

        self.horizontal = self.focus_dist * viewport_width * self.u;
        self.vertical = self.focus_dist * viewport_height * self.v;
        self.lower_left = self.look_from
            - self.horizontal / 2.0
            - self.vertical / 2.0
            - self.focus_dist * self.w;
        self.lens_radius = self.aperture / 2.0;
        self
    }
}

impl Default for ThinLensCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera for ThinLensCamera {
    fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let origin = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.look_from + self.u * rd.x + self.v * rd.y
        } else {
            self.look_from
        };

        let target = self.lower_left + s * self.horizontal + t * self.vertical;
        let time = gen_range(rng, self.time0, self.time1);

        Ray::new(origin, target - origin, time)
    }
}
