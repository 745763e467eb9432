#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when validating a [`WorldConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Indicates an invalid configuration value.
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
    #[cfg(feature = "serde")]
    #[error("config parse error: {0}")]
    Parse(String),
}

/// Parameters of one stigmergy maze environment.
///
/// Passed explicitly into the world constructor; there is no process-wide
/// parameter registry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Independent trials per scored organism (useful with non-deterministic brains).
    pub evaluations_per_generation: u32,
    /// Timesteps per trial.
    pub life_time: u32,
    /// Width of the packed stigmergy signal.
    pub stigmergy_bits: u32,
    pub x_dim: usize,
    pub y_dim: usize,
    /// Fraction of post-spanning-tree interior walls to open, in `[0, 1]`.
    pub wall_percent: f64,
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            evaluations_per_generation: 1,
            life_time: 1000,
            stigmergy_bits: 1,
            x_dim: 15,
            y_dim: 15,
            wall_percent: 0.75,
            seed: None,
        }
    }
}

impl WorldConfig {
    pub const MAX_STIGMERGY_BITS: u32 = 32;

    pub fn with_dims(mut self, x_dim: usize, y_dim: usize) -> Self {
        self.x_dim = x_dim;
        self.y_dim = y_dim;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_wall_percent(mut self, wall_percent: f64) -> Self {
        self.wall_percent = wall_percent;
        self
    }

    pub fn with_life_time(mut self, life_time: u32) -> Self {
        self.life_time = life_time;
        self
    }

    pub fn with_stigmergy_bits(mut self, bits: u32) -> Self {
        self.stigmergy_bits = bits;
        self
    }

    pub fn with_evaluations(mut self, evaluations: u32) -> Self {
        self.evaluations_per_generation = evaluations;
        self
    }

    /// Even dimensions are bumped to the next odd value so the maze has a
    /// well-defined border ring and carving lattice.
    pub fn normalized(mut self) -> Self {
        if self.x_dim % 2 == 0 {
            self.x_dim += 1;
        }
        if self.y_dim % 2 == 0 {
            self.y_dim += 1;
        }
        self
    }

    /// Number of cells on the half-resolution carving lattice (odd interior offsets).
    pub fn lattice_cells(&self) -> usize {
        let cfg = self.normalized();
        (cfg.x_dim.saturating_sub(1) / 2) * (cfg.y_dim.saturating_sub(1) / 2)
    }

    /// Interior walls opened by the loop-opening pass.
    pub fn wall_quota(&self) -> usize {
        let cfg = self.normalized();
        let walls = (cfg.x_dim.saturating_sub(3) * cfg.y_dim.saturating_sub(3)) / 2;
        (walls as f64 * cfg.wall_percent.clamp(0.0, 1.0)).floor() as usize
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.evaluations_per_generation == 0 {
            return Err(ConfigError::Invalid("evaluations_per_generation must be >= 1"));
        }
        if self.life_time == 0 {
            return Err(ConfigError::Invalid("life_time must be >= 1"));
        }
        if self.stigmergy_bits == 0 || self.stigmergy_bits > Self::MAX_STIGMERGY_BITS {
            return Err(ConfigError::Invalid("stigmergy_bits must be in [1, 32]"));
        }
        if self.x_dim == 0 || self.y_dim == 0 {
            return Err(ConfigError::Invalid("x_dim and y_dim must be >= 1"));
        }
        // FOOD and HOME need two distinct open cells, and the spanning tree
        // opens 2 * lattice_cells - 1 of them.
        if self.lattice_cells() < 2 {
            return Err(ConfigError::Invalid(
                "dimensions leave fewer than two carvable cells (need at least 5x3)",
            ));
        }
        if !self.wall_percent.is_finite() || !(0.0..=1.0).contains(&self.wall_percent) {
            return Err(ConfigError::Invalid("wall_percent must be in [0, 1]"));
        }
        Ok(())
    }

    #[cfg(feature = "serde")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
