//! Driver configuration, loaded from JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stigmergy::config::{ConfigError, WorldConfig};
use stigmergy::evaluate::MazePolicy;

use crate::error::DriverError;

/// Which reference brain every organism of the population runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BrainSpec {
    /// Each output fires independently with probability `fire_rate`.
    Random { fire_rate: f32 },
    /// Never acts.
    Wait,
    /// Always moves forward.
    Forward,
}

impl Default for BrainSpec {
    fn default() -> Self {
        BrainSpec::Random { fire_rate: 0.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub world: WorldConfig,
    pub generations: u32,
    pub population: u32,
    pub maze_policy: MazePolicy,
    pub brain: BrainSpec,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            generations: 10,
            population: 16,
            maze_policy: MazePolicy::PerGeneration,
            brain: BrainSpec::default(),
        }
    }
}

impl DriverConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        if self.generations == 0 {
            return Err(ConfigError::Invalid("generations must be >= 1"));
        }
        if self.population == 0 {
            return Err(ConfigError::Invalid("population must be >= 1"));
        }
        if let BrainSpec::Random { fire_rate } = self.brain {
            if !(0.0..=1.0).contains(&fire_rate) {
                return Err(ConfigError::Invalid("brain.fire_rate must be in [0, 1]"));
            }
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> Result<Self, DriverError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, DriverError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }
}
