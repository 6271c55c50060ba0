//! Caustic Core - renderer-agnostic scene data.
//!
//! This crate provides:
//!
//! - **Textures**: solid, checker, Perlin noise / marble, and image textures
//! - **Meshes**: indexed triangle geometry
//!
//! # Example
//!
//! ```ignore
//! use caustic_core::Texture;
//!
//! let albedo = Texture::image_or_placeholder("earth.png");
//! let c = albedo.value(0.5, 0.5, glam::Vec3::ZERO);
//! ```

pub mod mesh;
pub mod perlin;
pub mod texture;

// Re-export commonly used types
pub use mesh::{Mesh, MeshTriangle};
pub use perlin::Perlin;
pub use texture::{ImageTexture, Texture, TextureError, TextureResult, PLACEHOLDER_COLOR};
