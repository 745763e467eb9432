//! Cross-platform application paths

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DriverError;

#[derive(Debug, Clone)]
pub struct AppPaths {
    data_dir: PathBuf,
}

impl AppPaths {
    /// Use the OS data directory (`<data_dir>/stigmergy`).
    pub fn new() -> Result<Self, DriverError> {
        let base = dirs::data_dir().ok_or(DriverError::NoDataDir)?;
        Self::at(base.join("stigmergy"))
    }

    /// Use an explicit directory, creating it if needed.
    pub fn at(dir: impl Into<PathBuf>) -> Result<Self, DriverError> {
        let data_dir = dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }

    pub fn generation_file(&self, generation: u32) -> PathBuf {
        self.data_dir.join(format!("generation_{generation:04}.json"))
    }
}
