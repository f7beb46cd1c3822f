use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

// Canonical spawn orientations, row 0 on top
const SHAPE_I: &[&[u8]] = &[&[1, 1, 1, 1]];
const SHAPE_J: &[&[u8]] = &[&[1, 0, 0], &[1, 1, 1]];
const SHAPE_L: &[&[u8]] = &[&[0, 0, 1], &[1, 1, 1]];
const SHAPE_O: &[&[u8]] = &[&[1, 1], &[1, 1]];
const SHAPE_S: &[&[u8]] = &[&[0, 1, 1], &[1, 1, 0]];
const SHAPE_T: &[&[u8]] = &[&[0, 1, 0], &[1, 1, 1]];
const SHAPE_Z: &[&[u8]] = &[&[1, 1, 0], &[0, 1, 1]];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Color token, always non-zero
    pub fn color(&self) -> u32 {
        match self {
            PieceKind::I => 0x00ffff,
            PieceKind::J => 0x0000ff,
            PieceKind::L => 0xffa500,
            PieceKind::O => 0xffff00,
            PieceKind::S => 0x00ff00,
            PieceKind::T => 0x800080,
            PieceKind::Z => 0xff0000,
        }
    }

    fn rows(&self) -> &'static [&'static [u8]] {
        match self {
            PieceKind::I => SHAPE_I,
            PieceKind::J => SHAPE_J,
            PieceKind::L => SHAPE_L,
            PieceKind::O => SHAPE_O,
            PieceKind::S => SHAPE_S,
            PieceKind::T => SHAPE_T,
            PieceKind::Z => SHAPE_Z,
        }
    }

    /// Spawn orientation of this kind
    pub fn shape(&self) -> Shape {
        Shape::from_rows(self.rows())
    }
}

/// Boolean occupancy matrix of a piece in its local frame
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    rows: usize,
    cols: usize,
    // row-major
    cells: Vec<bool>,
}

impl Shape {
    /// Build from 0/1 rows; rows shorter than the first are padded empty
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            for c in 0..cols {
                cells.push(row.get(c).copied().unwrap_or(0) != 0);
            }
        }
        Shape {
            rows: rows.len(),
            cols,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    /// Occupied cells as (row, col)
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, filled)| **filled)
            .map(|(i, _)| (i / self.cols, i % self.cols))
    }

    /// 90 degrees clockwise: R x C becomes C x R with `new[x][R-1-y] = old[y][x]`
    pub fn rotated_clockwise(&self) -> Shape {
        let (rows, cols) = (self.cols, self.rows);
        let mut cells = vec![false; rows * cols];
        for y in 0..self.rows {
            for x in 0..self.cols {
                cells[x * cols + (self.rows - 1 - y)] = self.get(y, x);
            }
        }
        Shape { rows, cols, cells }
    }
}

/// Catalog entry handed to a board on spawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
}

impl Piece {
    pub fn new(kind: PieceKind) -> Self {
        Piece {
            kind,
            shape: kind.shape(),
        }
    }
}

/// Where a session pulls its next piece from
pub trait PieceSource {
    fn draw(&mut self) -> Piece;
}

/// Uniform random pieces
pub struct RandomPieces {
    rng: StdRng,
}

impl RandomPieces {
    pub fn new() -> Self {
        RandomPieces {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        RandomPieces {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPieces {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceSource for RandomPieces {
    fn draw(&mut self) -> Piece {
        let index = self.rng.random_range(0..PieceKind::ALL.len());
        Piece::new(PieceKind::ALL[index])
    }
}

/// Fixed list of kinds, repeated once exhausted
pub struct PieceSequence {
    kinds: VecDeque<PieceKind>,
}

impl PieceSequence {
    pub fn new(kinds: impl IntoIterator<Item = PieceKind>) -> Self {
        let kinds: VecDeque<PieceKind> = kinds.into_iter().collect();
        assert!(!kinds.is_empty(), "piece sequence needs at least one kind");
        PieceSequence { kinds }
    }
}

impl PieceSource for PieceSequence {
    fn draw(&mut self) -> Piece {
        let kind = self.kinds.pop_front().unwrap_or(PieceKind::O);
        self.kinds.push_back(kind);
        Piece::new(kind)
    }
}
