//! Generation loop: build a population, score it, summarise the results.

use serde::Serialize;
use stigmergy::brain::{BitBrain, Brain, IoLayout, RandomBrain};
use stigmergy::evaluate::{evaluate_generation, MazePolicy, Organism, SCORE_FIELD};
use stigmergy::prng::Prng;
use stigmergy::stats::ScoreSummary;
use tracing::info;

use crate::config::{BrainSpec, DriverConfig};
use crate::error::DriverError;

pub type DynBrain = Box<dyn Brain + Send>;

#[derive(Debug, Clone, Serialize)]
pub struct OrganismReport {
    pub id: u64,
    pub scores: ScoreSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub generation: u32,
    pub maze_policy: MazePolicy,
    pub maze_seed: u64,
    /// Spread of per-organism mean scores.
    pub population: Option<ScoreSummary>,
    pub best_id: Option<u64>,
    pub organisms: Vec<OrganismReport>,
}

pub fn build_population(cfg: &DriverConfig, seed: u64) -> Vec<Organism<DynBrain>> {
    let layout = IoLayout::new(cfg.world.stigmergy_bits);
    let mut rng = Prng::new(seed);
    (0..cfg.population as u64)
        .map(|id| {
            let brain: DynBrain = match cfg.brain {
                BrainSpec::Random { fire_rate } => {
                    Box::new(RandomBrain::new(&layout, rng.next_u64(), fire_rate))
                }
                BrainSpec::Wait => Box::new(BitBrain::waiting(&layout)),
                BrainSpec::Forward => Box::new(BitBrain::forward(&layout)),
            };
            Organism::new(id, brain)
        })
        .collect()
}

/// Seed of the maze (or maze family) used in `generation`.
pub fn generation_seed(base: u64, generation: u32) -> u64 {
    Prng::new(base.wrapping_add(generation as u64)).next_u64()
}

pub fn run_generation(
    cfg: &DriverConfig,
    generation: u32,
    organisms: &mut [Organism<DynBrain>],
) -> Result<GenerationReport, DriverError> {
    let maze_seed = generation_seed(cfg.world.seed.unwrap_or(1), generation);
    for org in organisms.iter_mut() {
        org.data.clear();
    }
    evaluate_generation(&cfg.world, cfg.maze_policy, maze_seed, organisms)?;

    let organisms: Vec<OrganismReport> = organisms
        .iter()
        .filter_map(|o| {
            o.data.summary(SCORE_FIELD).map(|scores| OrganismReport { id: o.id, scores })
        })
        .collect();
    let means: Vec<f64> = organisms.iter().map(|o| o.scores.mean).collect();
    let best_id = organisms
        .iter()
        .max_by(|a, b| a.scores.mean.total_cmp(&b.scores.mean))
        .map(|o| o.id);
    let report = GenerationReport {
        generation,
        maze_policy: cfg.maze_policy,
        maze_seed,
        population: ScoreSummary::from_samples(&means),
        best_id,
        organisms,
    };

    if let Some(p) = &report.population {
        info!(
            "gen={} mean={:.4} best={:.4} worst={:.4} best_id={:?}",
            generation, p.mean, p.max, p.min, report.best_id
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stigmergy::config::WorldConfig;

    fn small(brain: BrainSpec, policy: MazePolicy) -> DriverConfig {
        DriverConfig {
            world: WorldConfig::default()
                .with_life_time(30)
                .with_evaluations(2)
                .with_seed(9),
            generations: 2,
            population: 5,
            maze_policy: policy,
            brain,
        }
    }

    #[test]
    fn every_organism_is_reported() {
        let cfg = small(BrainSpec::default(), MazePolicy::PerGeneration);
        let mut orgs = build_population(&cfg, 1);
        let report = run_generation(&cfg, 0, &mut orgs).unwrap();
        assert_eq!(report.organisms.len(), 5);
        assert!(report.organisms.iter().all(|o| o.scores.count == 2));
        assert!(report.best_id.is_some());
        assert_eq!(report.population.unwrap().count, 5);
    }

    #[test]
    fn waiting_population_scores_baseline() {
        let cfg = small(BrainSpec::Wait, MazePolicy::PerOrganism);
        let mut orgs = build_population(&cfg, 1);
        let report = run_generation(&cfg, 3, &mut orgs).unwrap();
        let p = report.population.unwrap();
        assert_eq!(p.min, 1.0);
        assert_eq!(p.max, 1.0);
    }

    #[test]
    fn data_is_cleared_between_generations() {
        let cfg = small(BrainSpec::Forward, MazePolicy::PerGeneration);
        let mut orgs = build_population(&cfg, 1);
        run_generation(&cfg, 0, &mut orgs).unwrap();
        run_generation(&cfg, 1, &mut orgs).unwrap();
        assert!(orgs.iter().all(|o| o.data.get(SCORE_FIELD).len() == 2));
    }

    #[test]
    fn generations_use_different_mazes() {
        assert_ne!(generation_seed(1, 0), generation_seed(1, 1));
    }
}
