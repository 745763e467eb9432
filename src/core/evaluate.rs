//! Lifetime evaluation: run a brain for a fixed number of ticks over a fixed
//! number of independent trials and record one score per trial.

use hashbrown::HashMap;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::brain::Brain;
use crate::config::WorldConfig;
use crate::error::WorldError;
use crate::maze::MazeInstance;
use crate::stats::ScoreSummary;
use crate::world::StigmergyWorld;

/// Field name under which trial scores are recorded.
pub const SCORE_FIELD: &str = "score";

/// Receives one value per completed trial.
pub trait ScoreSink {
    fn append(&mut self, field: &str, value: f64);
}

/// Named columns of recorded values for one organism.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataMap {
    fields: HashMap<String, Vec<f64>>,
}

impl DataMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> &[f64] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn mean(&self, field: &str) -> Option<f64> {
        self.summary(field).map(|s| s.mean)
    }

    pub fn summary(&self, field: &str) -> Option<ScoreSummary> {
        ScoreSummary::from_samples(self.get(field))
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

impl ScoreSink for DataMap {
    fn append(&mut self, field: &str, value: f64) {
        self.fields.entry_ref(field).or_default().push(value);
    }
}

/// A brain under evaluation plus the data recorded for it.
#[derive(Debug, Clone)]
pub struct Organism<B> {
    pub id: u64,
    pub brain: B,
    pub data: DataMap,
}

impl<B: Brain> Organism<B> {
    pub fn new(id: u64, brain: B) -> Self {
        Self {
            id,
            brain,
            data: DataMap::new(),
        }
    }

    pub fn evaluate(&mut self, world: &mut StigmergyWorld) -> Result<(), WorldError> {
        evaluate_solo(world, &mut self.brain, &mut self.data)
    }

    pub fn mean_score(&self) -> Option<f64> {
        self.data.mean(SCORE_FIELD)
    }
}

/// Run `evaluations_per_generation` trials of `life_time` ticks each.
///
/// Every trial starts from a reset brain and the maze template; the final
/// score of each trial is appended to `sink` under [`SCORE_FIELD`]. The brain
/// shape is checked before the first tick.
pub fn evaluate_solo<B, S>(
    world: &mut StigmergyWorld,
    brain: &mut B,
    sink: &mut S,
) -> Result<(), WorldError>
where
    B: Brain + ?Sized,
    S: ScoreSink + ?Sized,
{
    world.layout().check(brain)?;
    let evaluations = world.config().evaluations_per_generation;
    let life_time = world.config().life_time;

    for eval in 0..evaluations {
        brain.reset_brain();
        world.reset_trial();
        for _ in 0..life_time {
            world.step(brain)?;
        }
        debug!(eval, score = world.score(), "trial finished");
        sink.append(SCORE_FIELD, world.score());
    }
    Ok(())
}

/// How mazes are shared when scoring a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MazePolicy {
    /// One maze per generation, identical for every organism.
    #[default]
    PerGeneration,
    /// A fresh maze for every organism.
    PerOrganism,
}

/// Seed of the maze used for organism `id` under [`MazePolicy::PerOrganism`].
pub fn organism_maze_seed(generation_seed: u64, id: u64) -> u64 {
    generation_seed ^ id.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Evaluate every organism on its own copy of `maze`.
pub fn evaluate_population<B: Brain + Send>(
    maze: &MazeInstance,
    organisms: &mut [Organism<B>],
) -> Result<(), WorldError> {
    for_each_organism(organisms, |org| {
        let mut world = StigmergyWorld::new(maze.clone());
        org.evaluate(&mut world)
    })
}

/// Score one generation, generating mazes according to `policy`.
pub fn evaluate_generation<B: Brain + Send>(
    config: &WorldConfig,
    policy: MazePolicy,
    generation_seed: u64,
    organisms: &mut [Organism<B>],
) -> Result<(), WorldError> {
    match policy {
        MazePolicy::PerGeneration => {
            let maze = MazeInstance::generate(config, generation_seed)?;
            evaluate_population(&maze, organisms)
        }
        MazePolicy::PerOrganism => for_each_organism(organisms, |org| {
            let maze = MazeInstance::generate(config, organism_maze_seed(generation_seed, org.id))?;
            let mut world = StigmergyWorld::new(maze);
            org.evaluate(&mut world)
        }),
    }
}

fn for_each_organism<B, F>(organisms: &mut [Organism<B>], f: F) -> Result<(), WorldError>
where
    B: Brain + Send,
    F: Fn(&mut Organism<B>) -> Result<(), WorldError> + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        organisms.par_iter_mut().try_for_each(f)
    }
    #[cfg(not(feature = "parallel"))]
    {
        organisms.iter_mut().try_for_each(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::{ActuatorFrame, BitBrain, IoLayout, MoveAction, RandomBrain, ScriptedBrain};
    use crate::world::{BASELINE_SCORE, MOVE_REWARD};

    #[test]
    fn data_map_appends_per_field() {
        let mut d = DataMap::new();
        d.append("score", 1.0);
        d.append("score", 3.0);
        d.append("other", 7.0);
        assert_eq!(d.get("score"), &[1.0, 3.0]);
        assert_eq!(d.mean("score"), Some(2.0));
        assert!(d.get("missing").is_empty());
        assert_eq!(d.mean("missing"), None);
    }

    #[test]
    fn one_score_per_trial() {
        let cfg = WorldConfig::default()
            .with_life_time(20)
            .with_evaluations(4)
            .with_seed(3);
        let mut world = StigmergyWorld::from_config(&cfg).unwrap();
        let mut org = Organism::new(0, RandomBrain::new(world.layout(), 9, 0.5));
        org.evaluate(&mut world).unwrap();
        assert_eq!(org.data.get(SCORE_FIELD).len(), 4);
        assert!(org.data.get(SCORE_FIELD).iter().all(|&s| s >= BASELINE_SCORE));
    }

    #[test]
    fn waiting_brain_scores_baseline() {
        let cfg = WorldConfig::default()
            .with_dims(14, 14)
            .with_wall_percent(0.0)
            .with_life_time(1);
        let mut world = StigmergyWorld::from_config(&cfg).unwrap();
        let mut brain = BitBrain::waiting(world.layout());
        let mut data = DataMap::new();
        evaluate_solo(&mut world, &mut brain, &mut data).unwrap();
        assert_eq!(data.get(SCORE_FIELD), &[1.0]);
    }

    #[test]
    fn trials_are_independent_for_deterministic_brains() {
        let cfg = WorldConfig::default()
            .with_life_time(200)
            .with_evaluations(3)
            .with_seed(17);
        let mut world = StigmergyWorld::from_config(&cfg).unwrap();
        let mut brain = BitBrain::forward(world.layout());
        let mut data = DataMap::new();
        evaluate_solo(&mut world, &mut brain, &mut data).unwrap();
        let scores = data.get(SCORE_FIELD);
        assert_eq!(scores[0], scores[1]);
        assert_eq!(scores[1], scores[2]);
        // A straight runner moves at most until the first wall.
        assert!(scores[0] <= BASELINE_SCORE + MOVE_REWARD * 15.0 + 1.5);
    }

    #[test]
    fn brain_is_reset_at_the_start_of_every_trial() {
        let cfg = WorldConfig::default()
            .with_life_time(3)
            .with_evaluations(2)
            .with_seed(12);
        let mut world = StigmergyWorld::from_config(&cfg).unwrap();
        let turn_left = ActuatorFrame {
            movement: MoveAction::TurnLeft,
            ..ActuatorFrame::wait()
        };
        let script = vec![ActuatorFrame::forward(), turn_left, ActuatorFrame::forward()];
        let mut brain = ScriptedBrain::new(world.layout(), script);
        let mut data = DataMap::new();
        evaluate_solo(&mut world, &mut brain, &mut data).unwrap();

        let scores = data.get(SCORE_FIELD);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0], scores[1]);

        // The second trial replays the script from its first frame, so it
        // senses exactly what the first one did.
        let frames = brain.seen_frames();
        assert_eq!(frames.len(), 6);
        assert_eq!(frames[..3], frames[3..]);
        assert_eq!(frames[2].heading, world.maze().start_heading.turn_left());
    }

    // Drives its outputs on the first tick only and never clears them itself.
    struct OneShotBrain {
        layout: IoLayout,
        inputs: Vec<bool>,
        outputs: Vec<bool>,
        ticks: usize,
    }

    impl OneShotBrain {
        fn new(layout: &IoLayout) -> Self {
            Self {
                layout: *layout,
                inputs: vec![false; layout.input_len()],
                outputs: vec![false; layout.output_len()],
                ticks: 0,
            }
        }
    }

    impl Brain for OneShotBrain {
        fn input_len(&self) -> usize {
            self.inputs.len()
        }
        fn output_len(&self) -> usize {
            self.outputs.len()
        }
        fn reset_brain(&mut self) {
            self.ticks = 0;
        }
        fn reset_inputs(&mut self) {
            self.inputs.fill(false);
        }
        fn reset_outputs(&mut self) {
            self.outputs.fill(false);
        }
        fn set_input(&mut self, index: usize, bit: bool) {
            self.inputs[index] = bit;
        }
        fn update(&mut self) {
            if self.ticks == 0 {
                let frame = ActuatorFrame {
                    write: true,
                    content: 1,
                    movement: MoveAction::TurnRight,
                    read: true,
                };
                self.outputs.copy_from_slice(&frame.encode(&self.layout));
            }
            self.ticks += 1;
        }
        fn read_output(&self, index: usize) -> bool {
            self.outputs[index]
        }
    }

    #[test]
    fn outputs_are_cleared_before_every_tick() {
        let cfg = WorldConfig::default().with_seed(4);
        let mut world = StigmergyWorld::from_config(&cfg).unwrap();
        let layout = *world.layout();
        let mut brain = OneShotBrain::new(&layout);

        let first = world.step(&mut brain).unwrap();
        assert_eq!(first.movement, MoveAction::TurnRight);
        assert_eq!(first.wrote, Some(1));

        let second = world.step(&mut brain).unwrap();
        assert_eq!(ActuatorFrame::read(&brain, &layout), ActuatorFrame::wait());
        assert_eq!(second, crate::world::StepEvent::default());
        assert!(!world.agent().last_read);
    }

    #[test]
    fn mismatched_brain_is_rejected_before_running() {
        let cfg = WorldConfig::default().with_stigmergy_bits(2);
        let mut world = StigmergyWorld::from_config(&cfg).unwrap();
        let mut brain = BitBrain::waiting(&IoLayout::new(1));
        let mut data = DataMap::new();
        let err = evaluate_solo(&mut world, &mut brain, &mut data).unwrap_err();
        assert!(matches!(err, WorldError::BrainShape { .. }));
        assert!(data.get(SCORE_FIELD).is_empty());
    }

    #[test]
    fn shared_maze_gives_equal_scores_to_equal_brains() {
        let cfg = WorldConfig::default().with_life_time(50).with_evaluations(2);
        let layout = IoLayout::new(cfg.stigmergy_bits);
        let mut orgs: Vec<_> = (0..4)
            .map(|id| Organism::new(id, BitBrain::forward(&layout)))
            .collect();
        evaluate_generation(&cfg, MazePolicy::PerGeneration, 5, &mut orgs).unwrap();
        let first = orgs[0].mean_score();
        assert!(first.is_some());
        assert!(orgs.iter().all(|o| o.mean_score() == first));
    }

    #[test]
    fn per_organism_policy_uses_distinct_mazes() {
        let cfg = WorldConfig::default();
        let a = MazeInstance::generate(&cfg, organism_maze_seed(5, 0)).unwrap();
        let b = MazeInstance::generate(&cfg, organism_maze_seed(5, 1)).unwrap();
        assert_ne!(a.grid, b.grid);

        let layout = IoLayout::new(cfg.stigmergy_bits);
        let mut orgs: Vec<_> = (0..3)
            .map(|id| Organism::new(id, RandomBrain::new(&layout, id + 1, 0.5)))
            .collect();
        let cfg = cfg.with_life_time(10);
        evaluate_generation(&cfg, MazePolicy::PerOrganism, 5, &mut orgs).unwrap();
        assert!(orgs.iter().all(|o| o.data.get(SCORE_FIELD).len() == 1));
    }
}
