//! Heading-indexed sensor offset tables.
//!
//! Each table maps `(heading, cell index)` to a grid-relative `(dx, dy)`.
//! Both tables are ordered near-to-far, then left-to-right as seen by the
//! agent, so a given index means the same egocentric cell for every heading.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const VISION_CONE_AREA: usize = 8;
pub const PROXIMITY_RING_AREA: usize = 8;

pub type Offset = (i32, i32);

/// Cardinal orientation, a 2-bit quantity on a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Heading {
    #[default]
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// Only the low two bits are used.
    pub fn from_index(i: u8) -> Self {
        Self::ALL[(i & 3) as usize]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn turn_left(self) -> Self {
        Self::from_index((self as u8).wrapping_add(3))
    }

    pub fn turn_right(self) -> Self {
        Self::from_index((self as u8).wrapping_add(1))
    }

    /// One step forward.
    pub fn forward(self) -> Offset {
        match self {
            Heading::North => (0, -1),
            Heading::East => (1, 0),
            Heading::South => (0, 1),
            Heading::West => (-1, 0),
        }
    }

    /// Compass code: North=00, East=10, South=01, West=11.
    pub fn compass_bits(self) -> [bool; 2] {
        let i = self as u8;
        [i & 1 != 0, i & 2 != 0]
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Heading::North => "^ ",
            Heading::East => "> ",
            Heading::South => " v",
            Heading::West => " <",
        }
    }
}

/// Precomputed sensor layouts, built once per environment and read-only after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorGeometry {
    vision: [[Offset; VISION_CONE_AREA]; 4],
    proximity: [[Offset; PROXIMITY_RING_AREA]; 4],
}

impl Default for SensorGeometry {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorGeometry {
    pub fn new() -> Self {
        let mut vision = [[(0, 0); VISION_CONE_AREA]; 4];
        let mut proximity = [[(0, 0); PROXIMITY_RING_AREA]; 4];
        for heading in Heading::ALL {
            vision[heading.index()] = vision_cone(heading);
            proximity[heading.index()] = proximity_ring(heading);
        }
        Self { vision, proximity }
    }

    pub fn vision(&self, heading: Heading) -> &[Offset; VISION_CONE_AREA] {
        &self.vision[heading.index()]
    }

    pub fn proximity(&self, heading: Heading) -> &[Offset; PROXIMITY_RING_AREA] {
        &self.proximity[heading.index()]
    }
}

// Three cells at distance 1, five at distance 2. Each heading restates the
// layout explicitly so the four cones stay mirror images of each other.
fn vision_cone(heading: Heading) -> [Offset; VISION_CONE_AREA] {
    let mut out = [(0, 0); VISION_CONE_AREA];
    let mut k = 0;
    for i in 1..=2i32 {
        match heading {
            Heading::North => {
                for j in -i..=i {
                    out[k] = (j, -i);
                    k += 1;
                }
            }
            Heading::East => {
                for j in -i..=i {
                    out[k] = (i, j);
                    k += 1;
                }
            }
            Heading::South => {
                for j in (-i..=i).rev() {
                    out[k] = (j, i);
                    k += 1;
                }
            }
            Heading::West => {
                for j in (-i..=i).rev() {
                    out[k] = (-i, j);
                    k += 1;
                }
            }
        }
    }
    out
}

// Moore neighborhood without the center: front row, left, right, back row.
fn proximity_ring(heading: Heading) -> [Offset; PROXIMITY_RING_AREA] {
    let mut out = [(0, 0); PROXIMITY_RING_AREA];
    let mut k = 0;
    for i in [1i32, 0, -1] {
        for j in -1..=1i32 {
            if i == 0 && j == 0 {
                continue;
            }
            out[k] = match heading {
                Heading::North => (j, -i),
                Heading::East => (i, j),
                Heading::South => (-j, i),
                Heading::West => (-i, -j),
            };
            k += 1;
        }
    }
    out
}
