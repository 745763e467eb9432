use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by maze construction and simulation.
#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// No interior OPEN cell was left to place a feature on.
    #[error("no open cell left to place {feature}")]
    Placement { feature: &'static str },
    /// The brain's I/O vectors do not match the environment's layout.
    #[error(
        "brain has {actual_inputs} inputs / {actual_outputs} outputs, \
         world needs {expected_inputs} / {expected_outputs}"
    )]
    BrainShape {
        expected_inputs: usize,
        actual_inputs: usize,
        expected_outputs: usize,
        actual_outputs: usize,
    },
}
