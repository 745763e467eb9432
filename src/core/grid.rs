//! Cell-state grid and the co-located stigmergy signal layer.
//!
//! Both layers are stored row-major (`y * w + x`). `y` grows southwards, so
//! heading North means `dy = -1`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What occupies one maze cell. The four states are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Cell {
    #[default]
    Wall,
    Open,
    Food,
    Home,
}

impl Cell {
    pub fn is_passable(self) -> bool {
        self != Cell::Wall
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Cell::Wall => "██",
            Cell::Open => "  ",
            Cell::Food => "FF",
            Cell::Home => "HH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    w: usize,
    h: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// A grid that is wall everywhere.
    pub fn filled(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::Wall; w * h],
        }
    }

    pub fn w(&self) -> usize {
        self.w
    }

    pub fn h(&self) -> usize {
        self.h
    }

    #[inline]
    fn idx(&self, p: Pos) -> usize {
        p.y * self.w + p.x
    }

    pub fn in_bounds(&self, p: Pos) -> bool {
        p.x < self.w && p.y < self.h
    }

    /// Cells on the outer ring are never carved.
    pub fn is_interior(&self, p: Pos) -> bool {
        p.x >= 1 && p.y >= 1 && p.x + 1 < self.w && p.y + 1 < self.h
    }

    pub fn get(&self, p: Pos) -> Option<Cell> {
        if self.in_bounds(p) {
            Some(self.cells[self.idx(p)])
        } else {
            None
        }
    }

    /// Out-of-bounds reads as wall.
    pub fn cell(&self, p: Pos) -> Cell {
        self.get(p).unwrap_or(Cell::Wall)
    }

    /// Writes are ignored outside the grid.
    pub fn set(&mut self, p: Pos, cell: Cell) {
        if self.in_bounds(p) {
            let i = self.idx(p);
            self.cells[i] = cell;
        }
    }

    /// `p + (dx, dy)` if that stays inside the grid.
    pub fn offset(&self, p: Pos, dx: i32, dy: i32) -> Option<Pos> {
        let x = p.x as i64 + dx as i64;
        let y = p.y as i64 + dy as i64;
        if x < 0 || y < 0 || x >= self.w as i64 || y >= self.h as i64 {
            return None;
        }
        Some(Pos::new(x as usize, y as usize))
    }

    pub fn interior_positions(&self) -> impl Iterator<Item = Pos> + '_ {
        let (w, h) = (self.w, self.h);
        (1..h.saturating_sub(1)).flat_map(move |y| (1..w.saturating_sub(1)).map(move |x| Pos::new(x, y)))
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    pub fn positions_of(&self, cell: Cell) -> Vec<Pos> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == cell)
            .map(|(i, _)| Pos::new(i % self.w, i / self.w))
            .collect()
    }
}

/// Integer signal per cell; `0` means no signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StigmergyMap {
    w: usize,
    h: usize,
    values: Vec<u32>,
}

impl StigmergyMap {
    pub fn zeroed(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            values: vec![0; w * h],
        }
    }

    pub fn w(&self) -> usize {
        self.w
    }

    pub fn h(&self) -> usize {
        self.h
    }

    pub fn get(&self, p: Pos) -> u32 {
        if p.x < self.w && p.y < self.h {
            self.values[p.y * self.w + p.x]
        } else {
            0
        }
    }

    /// Overwrites the cell wholesale; signals are never merged.
    pub fn write(&mut self, p: Pos, value: u32) {
        if p.x < self.w && p.y < self.h {
            self.values[p.y * self.w + p.x] = value;
        }
    }

    pub fn clear(&mut self) {
        self.values.fill(0);
    }

    pub fn is_blank(&self) -> bool {
        self.values.iter().all(|&v| v == 0)
    }

    /// One row per line, values concatenated, followed by a separator line.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.w + 1) * self.h + 20);
        for y in 0..self.h {
            for x in 0..self.w {
                out.push_str(&self.values[y * self.w + x].to_string());
            }
            out.push('\n');
        }
        out.push_str("------------------\n");
        out
    }
}
