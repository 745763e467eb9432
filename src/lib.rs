//! # stigmergy
//!
//! A procedurally generated maze environment for scoring evolved agent brains.
//!
//! One agent lives in a randomly carved maze holding a food source and a home
//! cell. Each tick it senses a forward vision cone, a compass, a ring of
//! nearby stigmergy signals and (on request) the signal under its feet, then
//! a [`brain::Brain`] decides whether to write a signal, how to move, and
//! whether to read next tick. Moving, picking up food and delivering it home
//! all add to the trial score.
//!
//! ## Quick Start
//!
//! ```
//! use stigmergy::prelude::*;
//!
//! let cfg = WorldConfig::default().with_seed(42).with_life_time(100);
//! let mut world = StigmergyWorld::from_config(&cfg).unwrap();
//! let mut org = Organism::new(0, RandomBrain::new(world.layout(), 7, 0.5));
//!
//! org.evaluate(&mut world).unwrap();
//! assert!(org.mean_score().unwrap() >= 1.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): serialization for configs and summaries, JSON config loading
//! - `parallel`: evaluate organisms of a population on rayon workers
//!
//! ## Modules
//!
//! - [`maze`]: maze carving and feature placement
//! - [`sensors`]: headings and sensor offset tables
//! - [`world`]: per-tick simulation
//! - [`brain`]: the bit-vector brain protocol and reference brains
//! - [`evaluate`]: trials, organisms and population scoring

#[path = "core/agent.rs"]
pub mod agent;

#[path = "core/brain.rs"]
pub mod brain;

#[path = "core/config.rs"]
pub mod config;

#[path = "core/error.rs"]
pub mod error;

#[path = "core/evaluate.rs"]
pub mod evaluate;

#[path = "core/grid.rs"]
pub mod grid;

#[path = "core/maze.rs"]
pub mod maze;

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/sensors.rs"]
pub mod sensors;

#[path = "core/stats.rs"]
pub mod stats;

#[path = "core/world.rs"]
pub mod world;

/// Prelude module for convenient imports.
///
/// ```
/// use stigmergy::prelude::*;
/// ```
pub mod prelude {
    pub use crate::agent::AgentState;
    pub use crate::brain::{
        ActuatorFrame, BitBrain, Brain, IoLayout, MoveAction, Percept, RandomBrain,
        ScriptedBrain, SensorFrame,
    };
    pub use crate::config::{ConfigError, WorldConfig};
    pub use crate::error::WorldError;
    pub use crate::evaluate::{
        evaluate_generation, evaluate_population, evaluate_solo, DataMap, MazePolicy, Organism,
        ScoreSink, SCORE_FIELD,
    };
    pub use crate::grid::{Cell, Grid, Pos, StigmergyMap};
    pub use crate::maze::{FoodSource, MazeInstance};
    pub use crate::sensors::{Heading, SensorGeometry};
    pub use crate::stats::ScoreSummary;
    pub use crate::world::{StepEvent, StigmergyWorld};
}
