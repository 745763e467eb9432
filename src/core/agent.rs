use crate::grid::Pos;
use crate::sensors::Heading;

/// Per-trial state of the single agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentState {
    pub pos: Pos,
    pub heading: Heading,
    pub carrying: bool,
    /// Write control asserted on the last tick.
    pub last_write: bool,
    /// Read control asserted on the last tick; gates content sensing on the next one.
    pub last_read: bool,
}

impl AgentState {
    pub fn spawn(pos: Pos, heading: Heading) -> Self {
        Self {
            pos,
            heading,
            carrying: false,
            last_write: false,
            last_read: false,
        }
    }
}
