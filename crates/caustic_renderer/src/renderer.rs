//! Image rendering.
//!
//! Rows of the image are independent: each owns a random generator seeded
//! from the config seed and the row index, so the same config renders the
//! same image whether rows run on the rayon pool or one after another.

use crate::{config::RenderConfig, integrator::Integrator, sampling::gen_f32, scene::Scene, Color};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma-corrected 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let to_byte = |c: f32| (256.0 * linear_to_gamma(c).clamp(0.0, 0.999)) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}

/// Linear-light render output, row-major with the top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgba(*c)).collect()
    }

    /// Raw linear floats, three per pixel.
    pub fn as_f32_slice(&self) -> &[f32] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Mean over all pixels.
    pub fn mean(&self) -> Color {
        if self.pixels.is_empty() {
            return Color::ZERO;
        }
        self.pixels.iter().copied().sum::<Color>() / self.pixels.len() as f32
    }
}

/// Render the scene through its camera.
pub fn render(scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    render_with_progress(scene, config, &|_| {})
}

/// Render, reporting the completed percentage after every row.
pub fn render_with_progress(
    scene: &Scene,
    config: &RenderConfig,
    progress: &(dyn Fn(u32) + Sync),
) -> ImageBuffer {
    if let Err(e) = config.validate() {
        log::warn!("{}; rendering anyway with clamped values", e);
    }

    let mut image = ImageBuffer::new(config.width, config.height);
    if image.pixels.is_empty() {
        return image;
    }

    let integrator = Integrator::new(scene, config);
    let width = config.width as usize;
    let rows_done = AtomicUsize::new(0);
    let start = Instant::now();

    log::info!(
        "Rendering {}x{} at {} spp ({:?}, {})",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.strategy,
        if config.parallel { "parallel" } else { "sequential" }
    );

    let render_row = |(j, row): (usize, &mut [Color])| {
        let mut rng = StdRng::seed_from_u64(row_seed(config.seed, j));
        render_scanline(scene, &integrator, config, j, row, &mut rng);

        let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
        progress((done * 100 / config.height as usize) as u32);
    };

    if config.parallel {
        image.pixels.par_chunks_mut(width).enumerate().for_each(render_row);
    } else {
        image.pixels.chunks_mut(width).enumerate().for_each(render_row);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}

/// Seed for row `row`; distinct rows get unrelated streams.
fn row_seed(seed: u64, row: usize) -> u64 {
    seed ^ (row as u64 + 1).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

fn render_scanline(
    scene: &Scene,
    integrator: &Integrator,
    config: &RenderConfig,
    j: usize,
    row: &mut [Color],
    rng: &mut StdRng,
) {
    let samples = config.samples_per_pixel.max(1);
    let width = config.width as f32;
    let height = config.height as f32;
    let camera = scene.camera();

    for (i, pixel) in row.iter_mut().enumerate() {
        let mut pixel_color = Color::ZERO;

        for _ in 0..samples {
            let s = (i as f32 + gen_f32(rng)) / width;
            // Row 0 is the top of the image.
            let t = 1.0 - (j as f32 + gen_f32(rng)) / height;
            let ray = camera.get_ray(s, t, rng);
            let sample = integrator.radiance(&ray, rng);
            pixel_color += Color::select(sample.is_nan_mask(), Color::ZERO, sample);
        }

        *pixel = pixel_color / samples as f32;
    }
}
