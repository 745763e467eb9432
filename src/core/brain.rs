//! The bit-vector protocol between the world and an evolved brain.
//!
//! ## Input layout (in order)
//!
//! - vision cone: 8 cells x 5 one-hot bits `{open, wall, food, home, agent}`
//! - compass: 2 bits
//! - stigmergy proximity: 8 bits (signal present in ring cell)
//! - stigmergy content: `stigmergy_bits` bits, LSB first (zero unless read was requested)
//! - carrying food: 1 bit
//!
//! ## Output layout (in order)
//!
//! - write control: 1 bit
//! - content to write: `stigmergy_bits` bits, LSB first
//! - movement: 2 bits, decoded as `b0 + 2 * b1`
//! - read control: 1 bit (applies to the next tick)

use crate::error::WorldError;
use crate::grid::Cell;
use crate::prng::Prng;
use crate::sensors::{Heading, PROXIMITY_RING_AREA, VISION_CONE_AREA};

/// Decision-making unit driven by the world once per tick.
///
/// Internal state may persist across `update` calls within one trial and is
/// cleared by `reset_brain`.
pub trait Brain {
    fn input_len(&self) -> usize;
    fn output_len(&self) -> usize;

    /// Clear persistent internal state. Called once per trial.
    fn reset_brain(&mut self);
    /// Clear the input buffer. Called once per tick.
    fn reset_inputs(&mut self);
    /// Clear the output buffer. Called once per tick.
    fn reset_outputs(&mut self);

    fn set_input(&mut self, index: usize, bit: bool);
    fn update(&mut self);
    fn read_output(&self, index: usize) -> bool;
}

impl<B: Brain + ?Sized> Brain for Box<B> {
    fn input_len(&self) -> usize {
        (**self).input_len()
    }
    fn output_len(&self) -> usize {
        (**self).output_len()
    }
    fn reset_brain(&mut self) {
        (**self).reset_brain()
    }
    fn reset_inputs(&mut self) {
        (**self).reset_inputs()
    }
    fn reset_outputs(&mut self) {
        (**self).reset_outputs()
    }
    fn set_input(&mut self, index: usize, bit: bool) {
        (**self).set_input(index, bit)
    }
    fn update(&mut self) {
        (**self).update()
    }
    fn read_output(&self, index: usize) -> bool {
        (**self).read_output(index)
    }
}

/// Bit offsets of every input/output group for a given signal width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoLayout {
    pub stigmergy_bits: usize,
}

impl IoLayout {
    pub const VISION_BITS_PER_CELL: usize = 5;
    pub const COMPASS_BITS: usize = 2;
    pub const CARRYING_BITS: usize = 1;
    pub const WRITE_CONTROL_BITS: usize = 1;
    pub const MOVEMENT_BITS: usize = 2;
    pub const READ_CONTROL_BITS: usize = 1;

    pub fn new(stigmergy_bits: u32) -> Self {
        Self {
            stigmergy_bits: stigmergy_bits as usize,
        }
    }

    pub fn compass_start(&self) -> usize {
        VISION_CONE_AREA * Self::VISION_BITS_PER_CELL
    }

    pub fn proximity_start(&self) -> usize {
        self.compass_start() + Self::COMPASS_BITS
    }

    pub fn content_start(&self) -> usize {
        self.proximity_start() + PROXIMITY_RING_AREA
    }

    pub fn carrying_index(&self) -> usize {
        self.content_start() + self.stigmergy_bits
    }

    pub fn input_len(&self) -> usize {
        self.carrying_index() + Self::CARRYING_BITS
    }

    pub fn movement_start(&self) -> usize {
        Self::WRITE_CONTROL_BITS + self.stigmergy_bits
    }

    pub fn read_control_index(&self) -> usize {
        self.movement_start() + Self::MOVEMENT_BITS
    }

    pub fn output_len(&self) -> usize {
        self.read_control_index() + Self::READ_CONTROL_BITS
    }

    /// Reject a brain whose I/O vectors do not fit this layout.
    pub fn check<B: Brain + ?Sized>(&self, brain: &B) -> Result<(), WorldError> {
        if brain.input_len() != self.input_len() || brain.output_len() != self.output_len() {
            return Err(WorldError::BrainShape {
                expected_inputs: self.input_len(),
                actual_inputs: brain.input_len(),
                expected_outputs: self.output_len(),
                actual_outputs: brain.output_len(),
            });
        }
        Ok(())
    }

    fn content_mask(&self) -> u32 {
        if self.stigmergy_bits >= 32 {
            u32::MAX
        } else {
            (1u32 << self.stigmergy_bits) - 1
        }
    }
}

/// What one vision-cone cell looks like to the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Percept {
    Open,
    /// Walls and anything beyond the grid edge.
    #[default]
    Wall,
    Food,
    Home,
    Agent,
}

impl Percept {
    pub fn from_cell(cell: Option<Cell>) -> Self {
        match cell {
            Some(Cell::Open) => Percept::Open,
            Some(Cell::Food) => Percept::Food,
            Some(Cell::Home) => Percept::Home,
            Some(Cell::Wall) | None => Percept::Wall,
        }
    }

    fn one_hot(self) -> [bool; IoLayout::VISION_BITS_PER_CELL] {
        let mut bits = [false; IoLayout::VISION_BITS_PER_CELL];
        let i = match self {
            Percept::Open => 0,
            Percept::Wall => 1,
            Percept::Food => 2,
            Percept::Home => 3,
            Percept::Agent => 4,
        };
        bits[i] = true;
        bits
    }

    fn from_one_hot(bits: &[bool]) -> Self {
        match bits.iter().position(|&b| b) {
            Some(0) => Percept::Open,
            Some(2) => Percept::Food,
            Some(3) => Percept::Home,
            Some(4) => Percept::Agent,
            _ => Percept::Wall,
        }
    }
}

/// Everything the agent senses on one tick, by group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorFrame {
    pub vision: [Percept; VISION_CONE_AREA],
    pub heading: Heading,
    pub proximity: [bool; PROXIMITY_RING_AREA],
    /// Signal at the agent's own cell; zero unless the agent asked to read.
    pub content: u32,
    pub carrying: bool,
}

impl SensorFrame {
    pub fn encode(&self, layout: &IoLayout) -> Vec<bool> {
        let mut bits = Vec::with_capacity(layout.input_len());
        for p in &self.vision {
            bits.extend_from_slice(&p.one_hot());
        }
        bits.extend_from_slice(&self.heading.compass_bits());
        bits.extend_from_slice(&self.proximity);
        for i in 0..layout.stigmergy_bits {
            bits.push((self.content >> i) & 1 == 1);
        }
        bits.push(self.carrying);
        bits
    }

    /// Inverse of [`SensorFrame::encode`]; `bits` must be `layout.input_len()` long.
    pub fn decode(bits: &[bool], layout: &IoLayout) -> Self {
        let mut frame = SensorFrame::default();
        for (k, p) in frame.vision.iter_mut().enumerate() {
            let s = k * IoLayout::VISION_BITS_PER_CELL;
            *p = Percept::from_one_hot(&bits[s..s + IoLayout::VISION_BITS_PER_CELL]);
        }
        let c = layout.compass_start();
        frame.heading = Heading::from_index(bits[c] as u8 | ((bits[c + 1] as u8) << 1));
        let p = layout.proximity_start();
        frame.proximity.copy_from_slice(&bits[p..p + PROXIMITY_RING_AREA]);
        frame.content = pack_bits(&bits[layout.content_start()..layout.carrying_index()]);
        frame.carrying = bits[layout.carrying_index()];
        frame
    }

    pub fn write_to<B: Brain + ?Sized>(&self, brain: &mut B, layout: &IoLayout) {
        for (i, bit) in self.encode(layout).into_iter().enumerate() {
            brain.set_input(i, bit);
        }
    }
}

/// Decoded 2-bit movement code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveAction {
    #[default]
    Wait,
    TurnLeft,
    TurnRight,
    Forward,
}

impl MoveAction {
    pub fn from_bits(b0: bool, b1: bool) -> Self {
        match (b0 as u8) + 2 * (b1 as u8) {
            0 => MoveAction::Wait,
            1 => MoveAction::TurnLeft,
            2 => MoveAction::TurnRight,
            _ => MoveAction::Forward,
        }
    }

    pub fn bits(self) -> [bool; 2] {
        match self {
            MoveAction::Wait => [false, false],
            MoveAction::TurnLeft => [true, false],
            MoveAction::TurnRight => [false, true],
            MoveAction::Forward => [true, true],
        }
    }
}

/// Brain outputs for one tick, split into named groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorFrame {
    pub write: bool,
    pub content: u32,
    pub movement: MoveAction,
    pub read: bool,
}

impl ActuatorFrame {
    pub fn wait() -> Self {
        Self::default()
    }

    pub fn forward() -> Self {
        Self {
            movement: MoveAction::Forward,
            ..Self::default()
        }
    }

    pub fn read<B: Brain + ?Sized>(brain: &B, layout: &IoLayout) -> Self {
        let write = brain.read_output(0);
        let mut content = 0u32;
        for i in 0..layout.stigmergy_bits {
            if brain.read_output(IoLayout::WRITE_CONTROL_BITS + i) {
                content |= 1 << i;
            }
        }
        let m = layout.movement_start();
        let movement = MoveAction::from_bits(brain.read_output(m), brain.read_output(m + 1));
        let read = brain.read_output(layout.read_control_index());
        Self {
            write,
            content,
            movement,
            read,
        }
    }

    /// Output bit vector that [`ActuatorFrame::read`] decodes back to `self`
    /// (content bits above the layout width are dropped).
    pub fn encode(&self, layout: &IoLayout) -> Vec<bool> {
        let mut bits = Vec::with_capacity(layout.output_len());
        bits.push(self.write);
        for i in 0..layout.stigmergy_bits {
            bits.push((self.content >> i) & 1 == 1);
        }
        bits.extend_from_slice(&self.movement.bits());
        bits.push(self.read);
        bits
    }

    pub fn masked_content(&self, layout: &IoLayout) -> u32 {
        self.content & layout.content_mask()
    }
}

fn pack_bits(bits: &[bool]) -> u32 {
    let mut v = 0u32;
    for (i, &b) in bits.iter().enumerate() {
        if b {
            v |= 1 << i;
        }
    }
    v
}

/// Plain input/output buffers shared by the reference brains.
#[derive(Debug, Clone)]
struct IoBuffers {
    inputs: Vec<bool>,
    outputs: Vec<bool>,
}

impl IoBuffers {
    fn new(layout: &IoLayout) -> Self {
        Self {
            inputs: vec![false; layout.input_len()],
            outputs: vec![false; layout.output_len()],
        }
    }

    fn set_input(&mut self, index: usize, bit: bool) {
        if let Some(slot) = self.inputs.get_mut(index) {
            *slot = bit;
        }
    }

    fn read_output(&self, index: usize) -> bool {
        self.outputs.get(index).copied().unwrap_or(false)
    }
}

/// Emits the same output pattern every tick, ignoring its inputs.
#[derive(Debug, Clone)]
pub struct BitBrain {
    io: IoBuffers,
    pattern: Vec<bool>,
}

impl BitBrain {
    pub fn new(layout: &IoLayout, frame: ActuatorFrame) -> Self {
        Self {
            io: IoBuffers::new(layout),
            pattern: frame.encode(layout),
        }
    }

    pub fn waiting(layout: &IoLayout) -> Self {
        Self::new(layout, ActuatorFrame::wait())
    }

    pub fn forward(layout: &IoLayout) -> Self {
        Self::new(layout, ActuatorFrame::forward())
    }
}

impl Brain for BitBrain {
    fn input_len(&self) -> usize {
        self.io.inputs.len()
    }
    fn output_len(&self) -> usize {
        self.io.outputs.len()
    }
    fn reset_brain(&mut self) {}
    fn reset_inputs(&mut self) {
        self.io.inputs.fill(false);
    }
    fn reset_outputs(&mut self) {
        self.io.outputs.fill(false);
    }
    fn set_input(&mut self, index: usize, bit: bool) {
        self.io.set_input(index, bit);
    }
    fn update(&mut self) {
        self.io.outputs.copy_from_slice(&self.pattern);
    }
    fn read_output(&self, index: usize) -> bool {
        self.io.read_output(index)
    }
}

/// Fires each output independently with probability `fire_rate`.
///
/// The random stream is not reset between trials, so repeated trials give
/// different samples.
#[derive(Debug, Clone)]
pub struct RandomBrain {
    io: IoBuffers,
    rng: Prng,
    fire_rate: f32,
}

impl RandomBrain {
    pub fn new(layout: &IoLayout, seed: u64, fire_rate: f32) -> Self {
        Self {
            io: IoBuffers::new(layout),
            rng: Prng::new(seed),
            fire_rate: fire_rate.clamp(0.0, 1.0),
        }
    }
}

impl Brain for RandomBrain {
    fn input_len(&self) -> usize {
        self.io.inputs.len()
    }
    fn output_len(&self) -> usize {
        self.io.outputs.len()
    }
    fn reset_brain(&mut self) {}
    fn reset_inputs(&mut self) {
        self.io.inputs.fill(false);
    }
    fn reset_outputs(&mut self) {
        self.io.outputs.fill(false);
    }
    fn set_input(&mut self, index: usize, bit: bool) {
        self.io.set_input(index, bit);
    }
    fn update(&mut self) {
        for o in self.io.outputs.iter_mut() {
            *o = self.rng.gen_bool(self.fire_rate);
        }
    }
    fn read_output(&self, index: usize) -> bool {
        self.io.read_output(index)
    }
}

/// Plays back a fixed list of output frames, one per tick (repeating the
/// last one when the script runs out), and records every input vector.
#[derive(Debug, Clone)]
pub struct ScriptedBrain {
    io: IoBuffers,
    layout: IoLayout,
    script: Vec<ActuatorFrame>,
    tick: usize,
    seen: Vec<Vec<bool>>,
}

impl ScriptedBrain {
    pub fn new(layout: &IoLayout, script: Vec<ActuatorFrame>) -> Self {
        Self {
            io: IoBuffers::new(layout),
            layout: *layout,
            script,
            tick: 0,
            seen: Vec::new(),
        }
    }

    /// Input frames received so far, across trials, oldest first.
    pub fn seen_frames(&self) -> Vec<SensorFrame> {
        self.seen
            .iter()
            .map(|bits| SensorFrame::decode(bits, &self.layout))
            .collect()
    }
}

impl Brain for ScriptedBrain {
    fn input_len(&self) -> usize {
        self.io.inputs.len()
    }
    fn output_len(&self) -> usize {
        self.io.outputs.len()
    }
    fn reset_brain(&mut self) {
        self.tick = 0;
    }
    fn reset_inputs(&mut self) {
        self.io.inputs.fill(false);
    }
    fn reset_outputs(&mut self) {
        self.io.outputs.fill(false);
    }
    fn set_input(&mut self, index: usize, bit: bool) {
        self.io.set_input(index, bit);
    }
    fn update(&mut self) {
        self.seen.push(self.io.inputs.clone());
        let frame = self
            .script
            .get(self.tick)
            .or_else(|| self.script.last())
            .copied()
            .unwrap_or_default();
        self.io.outputs.copy_from_slice(&frame.encode(&self.layout));
        self.tick += 1;
    }
    fn read_output(&self, index: usize) -> bool {
        self.io.read_output(index)
    }
}
