//! Render settings.

use crate::error::{ConfigError, ConfigResult};
use crate::integrator::Strategy;
use serde::{Deserialize, Serialize};

/// Render configuration.
///
/// Loads from JSON with every field optional:
///
/// ```ignore
/// let config = RenderConfig::from_json_str(r#"{ "width": 300, "strategy": "nee" }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel for anti-aliasing and noise reduction
    pub samples_per_pixel: u32,
    /// How diffuse and volumetric bounces choose their next direction
    pub strategy: Strategy,
    /// Render rows on the rayon thread pool
    pub parallel: bool,
    /// Base seed for the per-row random generators
    pub seed: u64,
    /// Probability that a path continues after each scatter
    pub russian_roulette: f32,
    /// Hard cap on bounces per path
    pub max_depth: u32,
    /// Exponent of the MIS power heuristic
    pub mis_beta: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            samples_per_pixel: 100,
            strategy: Strategy::default(),
            parallel: true,
            seed: 0,
            russian_roulette: 0.9,
            max_depth: 256,
            mis_beta: 2.0,
        }
    }
}

impl RenderConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::Invalid(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        if !(self.russian_roulette > 0.0 && self.russian_roulette <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "russian_roulette must be in (0, 1], got {}",
                self.russian_roulette
            )));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".to_string()));
        }
        if !(self.mis_beta.is_finite() && self.mis_beta > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "mis_beta must be positive, got {}",
                self.mis_beta
            )));
        }
        Ok(())
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_russian_roulette(mut self, probability: f32) -> Self {
        self.russian_roulette = probability;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_mis_beta(mut self, beta: f32) -> Self {
        self.mis_beta = beta;
        self
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}
