//! Error types for scene construction and render configuration.

use thiserror::Error;

/// Errors raised while assembling a scene.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("Cannot build a BVH over zero primitives")]
    EmptyBvh,

    #[error("Primitive {index} has no bounding box and cannot be placed in a BVH")]
    UnboundedPrimitive { index: usize },

    #[error("Light {index} has zero surface area")]
    ZeroAreaLight { index: usize },

    #[error("Scene contains no bounded primitives")]
    EmptyScene,
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Errors raised while loading or validating a [`crate::RenderConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid render config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid render config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
