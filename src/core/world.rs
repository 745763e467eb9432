//! Live simulation state and the per-tick sense/decide/act loop.

use tracing::{debug, trace};

use crate::agent::AgentState;
use crate::brain::{ActuatorFrame, Brain, IoLayout, MoveAction, Percept, SensorFrame};
use crate::config::WorldConfig;
use crate::error::WorldError;
use crate::grid::{Cell, Grid, Pos, StigmergyMap};
use crate::maze::{pick_open_cell, roll_food_count, FoodSource, MazeInstance};
use crate::prng::Prng;
use crate::sensors::{Heading, SensorGeometry, PROXIMITY_RING_AREA, VISION_CONE_AREA};

/// Score every trial starts from.
pub const BASELINE_SCORE: f64 = 1.0;
/// Added for each successful forward step.
pub const MOVE_REWARD: f64 = 1.0 / 1000.0;
pub const PICKUP_REWARD: f64 = 1.0;
pub const DROPOFF_REWARD: f64 = 0.5;

// Keeps the respawn stream apart from the carving stream of the same seed.
const RESPAWN_SALT: u64 = 0xF00D_5EED_F00D_5EED;

/// What happened on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepEvent {
    pub movement: MoveAction,
    /// Forward move that changed the agent's cell.
    pub moved: bool,
    /// Forward move rejected by a wall.
    pub bumped: bool,
    pub picked_up: bool,
    pub dropped_off: bool,
    pub food_respawned: bool,
    /// Value written to the agent's cell, if write control was set.
    pub wrote: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct StigmergyWorld {
    layout: IoLayout,
    geometry: SensorGeometry,
    maze: MazeInstance,

    grid: Grid,
    stigmergy: StigmergyMap,
    food: FoodSource,
    agent: AgentState,
    score: f64,
    rng: Prng,
}

impl StigmergyWorld {
    pub fn new(maze: MazeInstance) -> Self {
        let layout = IoLayout::new(maze.config.stigmergy_bits);
        let mut world = Self {
            layout,
            geometry: SensorGeometry::new(),
            grid: maze.grid.clone(),
            stigmergy: maze.blank_stigmergy(),
            food: maze.food,
            agent: AgentState::spawn(maze.home, maze.start_heading),
            score: BASELINE_SCORE,
            rng: Prng::new(maze.seed ^ RESPAWN_SALT),
            maze,
        };
        world.reset_trial();
        world
    }

    /// Generate a maze from `config` and wrap it.
    pub fn from_config(config: &WorldConfig) -> Result<Self, WorldError> {
        Ok(Self::new(MazeInstance::from_config(config)?))
    }

    /// Restore the maze template: layout, food source, blank signal layer, and
    /// an agent standing on HOME with the template heading.
    pub fn reset_trial(&mut self) {
        self.grid.clone_from(&self.maze.grid);
        self.stigmergy.clear();
        self.food = self.maze.food;
        self.agent = AgentState::spawn(self.maze.home, self.maze.start_heading);
        self.score = BASELINE_SCORE;
        self.rng = Prng::new(self.maze.seed ^ RESPAWN_SALT);
    }

    pub fn config(&self) -> &WorldConfig {
        &self.maze.config
    }

    pub fn layout(&self) -> &IoLayout {
        &self.layout
    }

    pub fn geometry(&self) -> &SensorGeometry {
        &self.geometry
    }

    pub fn maze(&self) -> &MazeInstance {
        &self.maze
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn stigmergy(&self) -> &StigmergyMap {
        &self.stigmergy
    }

    pub fn food(&self) -> FoodSource {
        self.food
    }

    pub fn agent(&self) -> &AgentState {
        &self.agent
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Move the agent, e.g. to set up a scenario. Ignored unless `pos` is passable.
    pub fn place_agent(&mut self, pos: Pos, heading: Heading) -> bool {
        if !self.grid.cell(pos).is_passable() {
            return false;
        }
        self.agent.pos = pos;
        self.agent.heading = heading;
        true
    }

    /// Assemble this tick's inputs from the agent's point of view.
    pub fn sense(&self) -> SensorFrame {
        let pos = self.agent.pos;
        let heading = self.agent.heading;

        let mut vision = [Percept::Wall; VISION_CONE_AREA];
        for (slot, &(dx, dy)) in vision.iter_mut().zip(self.geometry.vision(heading)) {
            let cell = self.grid.offset(pos, dx, dy).and_then(|p| self.grid.get(p));
            *slot = Percept::from_cell(cell);
        }

        let mut proximity = [false; PROXIMITY_RING_AREA];
        for (slot, &(dx, dy)) in proximity.iter_mut().zip(self.geometry.proximity(heading)) {
            *slot = self
                .grid
                .offset(pos, dx, dy)
                .is_some_and(|p| self.stigmergy.get(p) != 0);
        }

        let content = if self.agent.last_read {
            self.stigmergy.get(pos)
        } else {
            0
        };

        SensorFrame {
            vision,
            heading,
            proximity,
            content,
            carrying: self.agent.carrying,
        }
    }

    /// One full tick: clear brain I/O, sense, let the brain decide, act.
    pub fn step<B: Brain + ?Sized>(&mut self, brain: &mut B) -> Result<StepEvent, WorldError> {
        brain.reset_inputs();
        brain.reset_outputs();

        self.sense().write_to(brain, &self.layout);
        brain.update();
        let act = ActuatorFrame::read(brain, &self.layout);
        self.apply(act)
    }

    /// Actuation half of a tick, in output order: write, move, read control.
    pub fn apply(&mut self, act: ActuatorFrame) -> Result<StepEvent, WorldError> {
        let mut event = StepEvent {
            movement: act.movement,
            ..StepEvent::default()
        };

        self.agent.last_write = act.write;
        if act.write {
            let value = act.masked_content(&self.layout);
            self.stigmergy.write(self.agent.pos, value);
            event.wrote = Some(value);
        }

        match act.movement {
            MoveAction::Wait => {}
            MoveAction::TurnLeft => self.agent.heading = self.agent.heading.turn_left(),
            MoveAction::TurnRight => self.agent.heading = self.agent.heading.turn_right(),
            MoveAction::Forward => self.move_forward(&mut event)?,
        }

        self.agent.last_read = act.read;
        trace!(?event, score = self.score, "tick");
        Ok(event)
    }

    fn move_forward(&mut self, event: &mut StepEvent) -> Result<(), WorldError> {
        let (dx, dy) = self.agent.heading.forward();
        let target = match self.grid.offset(self.agent.pos, dx, dy) {
            Some(t) if self.grid.cell(t).is_passable() => t,
            _ => {
                event.bumped = true;
                return Ok(());
            }
        };

        self.agent.pos = target;
        self.score += MOVE_REWARD;
        event.moved = true;

        if self.grid.cell(target) == Cell::Food && !self.agent.carrying {
            self.agent.carrying = true;
            self.food.remaining = self.food.remaining.saturating_sub(1);
            self.score += PICKUP_REWARD;
            event.picked_up = true;
            if self.food.remaining == 0 {
                self.respawn_food(target)?;
                event.food_respawned = true;
            }
        }

        if self.grid.cell(target) == Cell::Home && self.agent.carrying {
            self.agent.carrying = false;
            self.score += DROPOFF_REWARD;
            event.dropped_off = true;
        }
        Ok(())
    }

    // Clears the exhausted source and places a new one on another open cell
    // (or the same one if nothing else is free).
    fn respawn_food(&mut self, old: Pos) -> Result<(), WorldError> {
        self.grid.set(old, Cell::Open);
        let pos = pick_open_cell(&self.grid, &mut self.rng, Some(old))
            .or_else(|| pick_open_cell(&self.grid, &mut self.rng, None))
            .ok_or(WorldError::Placement { feature: "food" })?;
        self.grid.set(pos, Cell::Food);
        self.food = FoodSource {
            pos,
            remaining: roll_food_count(&mut self.rng),
        };
        debug!(from = ?old, to = ?pos, remaining = self.food.remaining, "food respawned");
        Ok(())
    }

    /// Text rendering of the grid, two characters per cell, agent as an arrow.
    pub fn render_grid(&self) -> String {
        let (w, h) = (self.grid.w(), self.grid.h());
        let mut out = String::with_capacity((w * 2 * 3 + 1) * h);
        for y in 0..h {
            for x in 0..w {
                let p = Pos::new(x, y);
                if p == self.agent.pos {
                    out.push_str(self.agent.heading.arrow());
                } else {
                    out.push_str(self.grid.cell(p).glyph());
                }
            }
            out.push('\n');
        }
        out
    }

    pub fn render_stigmergy(&self) -> String {
        self.stigmergy.render()
    }
}
