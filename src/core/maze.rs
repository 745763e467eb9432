//! Procedural maze generation.
//!
//! Layout is carved as a randomized depth-first spanning tree on the odd
//! lattice, then a configured share of the remaining interior walls is opened
//! to introduce loops, and finally one FOOD and one HOME cell are placed.

use tracing::debug;

use crate::config::WorldConfig;
use crate::error::WorldError;
use crate::grid::{Cell, Grid, Pos, StigmergyMap};
use crate::prng::Prng;
use crate::sensors::Heading;

/// Pickups a freshly placed food source holds, inclusive range.
pub const FOOD_COUNT_MIN: u32 = 1;
pub const FOOD_COUNT_MAX: u32 = 5;

/// The single active FOOD cell and its remaining pickups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoodSource {
    pub pos: Pos,
    pub remaining: u32,
}

/// A generated maze: the template every trial starts from.
#[derive(Debug, Clone)]
pub struct MazeInstance {
    pub config: WorldConfig,
    pub seed: u64,
    pub grid: Grid,
    pub food: FoodSource,
    pub home: Pos,
    pub start_heading: Heading,
    /// Cells opened by the loop-opening pass.
    pub walls_opened: usize,
}

impl MazeInstance {
    /// Generate from `config.seed`, falling back to a fixed seed.
    pub fn from_config(config: &WorldConfig) -> Result<Self, WorldError> {
        Self::generate(config, config.seed.unwrap_or(1))
    }

    pub fn generate(config: &WorldConfig, seed: u64) -> Result<Self, WorldError> {
        config.validate()?;
        let config = config.normalized();
        let mut rng = Prng::new(seed);

        let mut grid = Grid::filled(config.x_dim, config.y_dim);
        carve_spanning_tree(&mut grid, &mut rng);
        let walls_opened = open_walls(&mut grid, &mut rng, config.wall_quota());

        let food_pos = pick_open_cell(&grid, &mut rng, None).ok_or(WorldError::Placement {
            feature: "food",
        })?;
        grid.set(food_pos, Cell::Food);
        let food = FoodSource {
            pos: food_pos,
            remaining: roll_food_count(&mut rng),
        };

        let home = pick_open_cell(&grid, &mut rng, None).ok_or(WorldError::Placement {
            feature: "home",
        })?;
        grid.set(home, Cell::Home);
        let start_heading = Heading::from_index(rng.gen_index(4) as u8);

        debug!(
            x_dim = config.x_dim,
            y_dim = config.y_dim,
            seed,
            walls_opened,
            food = ?food.pos,
            ?home,
            "maze generated"
        );

        Ok(Self {
            config,
            seed,
            grid,
            food,
            home,
            start_heading,
            walls_opened,
        })
    }

    /// Fresh signal layer matching this maze's dimensions.
    pub fn blank_stigmergy(&self) -> StigmergyMap {
        StigmergyMap::zeroed(self.grid.w(), self.grid.h())
    }
}

pub(crate) fn roll_food_count(rng: &mut Prng) -> u32 {
    FOOD_COUNT_MIN + rng.gen_index((FOOD_COUNT_MAX - FOOD_COUNT_MIN + 1) as usize) as u32
}

/// Uniformly random interior OPEN cell, never `exclude`.
pub(crate) fn pick_open_cell(grid: &Grid, rng: &mut Prng, exclude: Option<Pos>) -> Option<Pos> {
    let candidates: Vec<Pos> = grid
        .interior_positions()
        .filter(|&p| grid.cell(p) == Cell::Open && Some(p) != exclude)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.gen_index(candidates.len())])
}

// Neighbor two cells away in direction `d` (N, E, S, W), if it is an interior cell.
fn lattice_neighbor(grid: &Grid, p: Pos, d: Heading) -> Option<Pos> {
    let (dx, dy) = d.forward();
    let n = grid.offset(p, dx * 2, dy * 2)?;
    grid.is_interior(n).then_some(n)
}

fn carve_spanning_tree(grid: &mut Grid, rng: &mut Prng) {
    let start = Pos::new(1, 1);
    grid.set(start, Cell::Open);

    let mut stack: Vec<Pos> = vec![start];
    let mut current = start;

    while !stack.is_empty() {
        let mut options = [start; 4];
        let mut n = 0usize;
        for d in Heading::ALL {
            if let Some(next) = lattice_neighbor(grid, current, d) {
                if grid.cell(next) == Cell::Wall {
                    options[n] = next;
                    n += 1;
                }
            }
        }

        if n == 0 {
            if let Some(back) = stack.pop() {
                current = back;
            }
            continue;
        }

        let target = options[rng.gen_index(n)];
        stack.push(current);
        grid.set(target, Cell::Open);
        grid.set(
            Pos::new((current.x + target.x) / 2, (current.y + target.y) / 2),
            Cell::Open,
        );
        current = target;
    }
}

// Opens `quota` distinct interior walls chosen uniformly at random.
fn open_walls(grid: &mut Grid, rng: &mut Prng, quota: usize) -> usize {
    let mut walls: Vec<Pos> = grid
        .interior_positions()
        .filter(|&p| grid.cell(p) == Cell::Wall)
        .collect();
    let quota = quota.min(walls.len());
    for i in 0..quota {
        let j = rng.gen_range_usize(i, walls.len());
        walls.swap(i, j);
        grid.set(walls[i], Cell::Open);
    }
    quota
}
