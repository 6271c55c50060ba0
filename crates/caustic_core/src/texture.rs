//! Textures: spatially varying colors looked up at a hit.
//!
//! Procedural textures (checker, noise, marble) ignore `(u, v)` and read the
//! hit point; image textures read `(u, v)` only.

use std::path::Path;
use std::sync::Arc;

use glam::Vec3;
use thiserror::Error;

use crate::perlin::Perlin;

/// Color returned wherever an image could not be loaded.
pub const PLACEHOLDER_COLOR: Vec3 = Vec3::new(0.0, 1.0, 1.0);

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture {0} has no pixels")]
    Empty(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded image with pixels in linear RGB.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Row-major, top row first
    pub pixels: Vec<Vec3>,

    /// Original file path (for debugging)
    pub path: String,
}

impl ImageTexture {
    /// Build a texture from already decoded linear pixels.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<Vec3>,
        path: impl Into<String>,
    ) -> TextureResult<Self> {
        let path = path.into();
        if width == 0 || height == 0 || pixels.len() != (width * height) as usize {
            return Err(TextureError::Empty(path));
        }
        Ok(Self {
            width,
            height,
            pixels,
            path,
        })
    }

    /// Decode an image file, converting sRGB bytes to linear floats.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let display = path.to_string_lossy().to_string();

        let img = image::open(path).map_err(|source| TextureError::Load {
            path: display.clone(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb
            .pixels()
            .map(|p| {
                Vec3::new(
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                )
            })
            .collect();

        log::debug!("Loaded texture: {} ({}x{})", display, width, height);
        Self::new(width, height, pixels, display)
    }

    /// Nearest-pixel lookup. `(u, v)` are clamped to `[0, 1]`; `v = 0` is the
    /// bottom row of the image.
    pub fn sample(&self, u: f32, v: f32) -> Vec3 {
        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - v.clamp(0.0, 1.0);

        let i = ((u * self.width as f32) as u32).min(self.width - 1);
        let j = ((v * self.height as f32) as u32).min(self.height - 1);

        self.pixels
            .get((j * self.width + i) as usize)
            .copied()
            .unwrap_or(PLACEHOLDER_COLOR)
    }
}

/// Surface color as a function of `(u, v, p)`.
#[derive(Clone, Debug)]
pub enum Texture {
    Solid(Vec3),
    /// 3D checker: `sign(sin(10x) sin(10y) sin(10z))` selects `odd` (negative)
    /// or `even`.
    Checker { even: Arc<Texture>, odd: Arc<Texture> },
    /// Turbulence at `scale * p`, grey.
    Noise { perlin: Arc<Perlin>, scale: f32 },
    /// Marble veins: `0.5 * (1 + sin(scale * p.z + 10 * turb(p)))`.
    Marble { perlin: Arc<Perlin>, scale: f32 },
    Image(Arc<ImageTexture>),
}

/// Octaves used by turbulence-based textures.
const TURBULENCE_DEPTH: usize = 7;

impl Texture {
    pub fn solid(r: f32, g: f32, b: f32) -> Self {
        Texture::Solid(Vec3::new(r, g, b))
    }

    pub fn checker(even: Vec3, odd: Vec3) -> Self {
        Texture::Checker {
            even: Arc::new(Texture::Solid(even)),
            odd: Arc::new(Texture::Solid(odd)),
        }
    }

    /// Load an image texture, falling back to a solid placeholder color if
    /// the file cannot be decoded.
    pub fn image_or_placeholder(path: impl AsRef<Path>) -> Self {
        match ImageTexture::load(path) {
            Ok(image) => Texture::Image(Arc::new(image)),
            Err(err) => {
                log::warn!("{}; using placeholder color", err);
                Texture::Solid(PLACEHOLDER_COLOR)
            }
        }
    }

    /// Evaluate the texture at surface coordinates `(u, v)` and point `p`.
    pub fn value(&self, u: f32, v: f32, p: Vec3) -> Vec3 {
        match self {
            Texture::Solid(color) => *color,
            Texture::Checker { even, odd } => {
                let sines = (10.0 * p.x).sin() * (10.0 * p.y).sin() * (10.0 * p.z).sin();
                if sines < 0.0 {
                    odd.value(u, v, p)
                } else {
                    even.value(u, v, p)
                }
            }
            Texture::Noise { perlin, scale } => {
                Vec3::ONE * perlin.turb(*scale * p, TURBULENCE_DEPTH)
            }
            Texture::Marble { perlin, scale } => {
                let phase = *scale * p.z + 10.0 * perlin.turb(p, TURBULENCE_DEPTH);
                Vec3::ONE * 0.5 * (1.0 + phase.sin())
            }
            Texture::Image(image) => image.sample(u, v),
        }
    }
}

impl From<Vec3> for Texture {
    fn from(color: Vec3) -> Self {
        Texture::Solid(color)
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
