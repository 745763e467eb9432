use thiserror::Error;

use stigmergy::config::ConfigError;
use stigmergy::error::WorldError;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("could not determine data directory")]
    NoDataDir,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    World(#[from] WorldError),
    #[error("usage: {0}")]
    Usage(String),
}
