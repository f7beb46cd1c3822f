use crate::{
    config::GameConfig,
    piece::{Piece, PieceKind, Shape},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    Empty = 0,
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl CellType {
    pub fn is_empty(&self) -> bool {
        *self == CellType::Empty
    }

    /// Color token; 0 for an empty cell
    pub fn color(&self) -> u32 {
        match self.kind() {
            Some(kind) => kind.color(),
            None => 0,
        }
    }

    pub fn kind(&self) -> Option<PieceKind> {
        match self {
            CellType::Empty => None,
            CellType::I => Some(PieceKind::I),
            CellType::J => Some(PieceKind::J),
            CellType::L => Some(PieceKind::L),
            CellType::O => Some(PieceKind::O),
            CellType::S => Some(PieceKind::S),
            CellType::T => Some(PieceKind::T),
            CellType::Z => Some(PieceKind::Z),
        }
    }
}

impl From<PieceKind> for CellType {
    fn from(kind: PieceKind) -> Self {
        match kind {
            PieceKind::I => CellType::I,
            PieceKind::J => CellType::J,
            PieceKind::L => CellType::L,
            PieceKind::O => CellType::O,
            PieceKind::S => CellType::S,
            PieceKind::T => CellType::T,
            PieceKind::Z => CellType::Z,
        }
    }
}

/// Fixed-size grid of cells, row 0 on top
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Field {
    cols: usize,
    rows: usize,
    cells: Vec<Vec<CellType>>,
}

impl Field {
    pub fn new(cols: usize, rows: usize) -> Self {
        Field {
            cols,
            rows,
            cells: vec![vec![CellType::Empty; cols]; rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Out-of-range writes are ignored
    pub fn set_cell(&mut self, x: usize, y: usize, cell_type: CellType) {
        if x < self.cols && y < self.rows {
            self.cells[y][x] = cell_type;
        }
    }

    /// Out-of-range reads are empty
    pub fn get_cell(&self, x: usize, y: usize) -> CellType {
        self.cells
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(CellType::Empty)
    }

    pub fn row(&self, y: usize) -> &[CellType] {
        &self.cells[y]
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.cells[y].iter().all(|cell| !cell.is_empty())
    }

    /// Delete row `y`, shift everything above it down, insert an empty top row
    pub fn remove_row(&mut self, y: usize) {
        if y < self.rows {
            self.cells.remove(y);
            self.cells.insert(0, vec![CellType::Empty; self.cols]);
        }
    }

    /// Draw a shape at (x, y); cells outside the field are skipped
    pub fn draw_shape(&mut self, shape: &Shape, x: isize, y: isize, cell_type: CellType) {
        for (r, c) in shape.occupied() {
            let cx = x + c as isize;
            let cy = y + r as isize;
            if cx >= 0 && cy >= 0 {
                self.set_cell(cx as usize, cy as usize, cell_type);
            }
        }
    }
}

/// The falling, player-controlled piece
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: isize,
    pub y: isize,
}

/// What `Board::lock` did with the active piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockOutcome {
    /// Nothing to lock (no active piece, or a clear is still pending)
    NoPiece,
    /// Piece settled, no row completed
    Settled,
    /// Rows completed; the board is busy until `complete_clear`
    Clearing { rows: Vec<usize> },
}

/// One player's well: settled cells plus the active piece
#[derive(Debug, Clone)]
pub struct Board {
    field: Field,
    active: Option<ActivePiece>,
    // Full rows awaiting removal, bottom-most first
    clearing: Option<Vec<usize>>,
}

impl Board {
    pub fn new(config: &GameConfig) -> Self {
        let field = Field::new(config.board_width, config.board_height);
        tracing::info!("Board created: {}x{}", field.rows(), field.cols());
        Board {
            field,
            active: None,
            clearing: None,
        }
    }

    pub fn cols(&self) -> usize {
        self.field.cols()
    }

    pub fn rows(&self) -> usize {
        self.field.rows()
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn is_clearing(&self) -> bool {
        self.clearing.is_some()
    }

    /// Rows waiting for the clear animation to finish
    pub fn clearing_rows(&self) -> &[usize] {
        self.clearing.as_deref().unwrap_or(&[])
    }

    /// Put a settled cell directly into the grid
    pub fn set_cell(&mut self, x: usize, y: usize, cell_type: CellType) {
        self.field.set_cell(x, y, cell_type);
    }

    /// Place `piece` horizontally centered on the top row
    ///
    /// Returns false when that position collides. The piece is still placed
    /// so the blocked spawn can be shown; callers treat false as game over.
    pub fn spawn(&mut self, piece: &Piece) -> bool {
        if self.is_clearing() {
            return false;
        }
        let x = (self.cols() / 2) as isize - (piece.shape.cols() / 2) as isize;
        self.active = Some(ActivePiece {
            kind: piece.kind,
            shape: piece.shape.clone(),
            x,
            y: 0,
        });
        let fits = self.is_valid_move(0, 0, &piece.shape);
        if fits {
            tracing::debug!("Spawned {:?} at x={}", piece.kind, x);
        } else {
            tracing::info!("Spawn of {:?} blocked at x={}, y=0", piece.kind, x);
        }
        fits
    }

    /// Translate the active piece; false leaves the board untouched
    pub fn try_move(&mut self, dx: isize, dy: isize) -> bool {
        if self.is_clearing() {
            return false;
        }
        let valid = match &self.active {
            Some(active) => self.is_valid_move(dx, dy, &active.shape),
            None => return false,
        };
        if valid {
            if let Some(active) = self.active.as_mut() {
                active.x += dx;
                active.y += dy;
            }
        }
        valid
    }

    /// Rotate the active piece clockwise in place, or do nothing if it does not fit
    pub fn rotate(&mut self) {
        if self.is_clearing() {
            return;
        }
        let Some(active) = &self.active else {
            return;
        };
        let rotated = active.shape.rotated_clockwise();
        if self.is_valid_move(0, 0, &rotated) {
            if let Some(active) = self.active.as_mut() {
                active.shape = rotated;
            }
        }
    }

    /// Whether `shape`, at the active piece position shifted by (dx, dy), fits
    ///
    /// Side walls and floor are solid; rows above the top are open.
    /// Without an active piece nothing fits.
    pub fn is_valid_move(&self, dx: isize, dy: isize, shape: &Shape) -> bool {
        let Some(active) = &self.active else {
            return false;
        };
        let cols = self.cols() as isize;
        let rows = self.rows() as isize;
        for (r, c) in shape.occupied() {
            let x = active.x + c as isize + dx;
            let y = active.y + r as isize + dy;
            if x < 0 || x >= cols || y >= rows {
                return false;
            }
            if y >= 0 && !self.field.get_cell(x as usize, y as usize).is_empty() {
                return false;
            }
        }
        true
    }

    /// Commit the active piece to the grid and look for full rows
    pub fn lock(&mut self) -> LockOutcome {
        if self.is_clearing() {
            return LockOutcome::NoPiece;
        }
        let Some(active) = self.active.take() else {
            return LockOutcome::NoPiece;
        };
        // Cells above the top row vanish
        self.field
            .draw_shape(&active.shape, active.x, active.y, active.kind.into());

        let rows: Vec<usize> = (0..self.rows())
            .rev()
            .filter(|&y| self.field.is_row_full(y))
            .collect();
        if rows.is_empty() {
            tracing::debug!("Locked {:?} at ({}, {})", active.kind, active.x, active.y);
            LockOutcome::Settled
        } else {
            tracing::debug!("Locked {:?}, clearing rows {:?}", active.kind, rows);
            self.clearing = Some(rows.clone());
            LockOutcome::Clearing { rows }
        }
    }

    /// Finish a pending clear: remove the full rows and return how many
    pub fn complete_clear(&mut self) -> usize {
        match self.clearing.take() {
            Some(rows) => {
                self.remove_lines(&rows);
                rows.len()
            }
            None => 0,
        }
    }

    /// Remove the given rows, each one shifting the rows above it down
    pub fn remove_lines(&mut self, rows: &[usize]) {
        let mut rows = rows.to_vec();
        // Top-to-bottom keeps the indexes below the current one valid
        rows.sort_unstable();
        rows.dedup();
        for y in rows {
            self.field.remove_row(y);
        }
    }

    /// Grid copy with the active piece drawn in
    pub fn snapshot(&self) -> Field {
        let mut field = self.field.clone();
        if let Some(active) = &self.active {
            field.draw_shape(&active.shape, active.x, active.y, active.kind.into());
        }
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::new(&GameConfig::default())
    }

    fn fill_row(board: &mut Board, y: usize) {
        for x in 0..board.cols() {
            board.set_cell(x, y, CellType::T);
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = board();
        assert_eq!(board.rows(), 20);
        assert_eq!(board.cols(), 10);
        for y in 0..board.rows() {
            assert!(board.field().row(y).iter().all(|c| c.is_empty()));
        }
        assert!(board.active().is_none());
        assert!(!board.is_clearing());
    }

    #[test]
    fn test_custom_dimensions() {
        let board = Board::new(&GameConfig::new().with_board_size(6, 12));
        assert_eq!(board.field().rows(), 12);
        assert_eq!(board.field().row(0).len(), 6);
    }

    #[test]
    fn test_spawn_centered() {
        let mut board = board();
        assert!(board.spawn(&Piece::new(PieceKind::I)));
        let active = board.active().unwrap();
        assert_eq!(active.shape, PieceKind::I.shape());
        assert_eq!((active.x, active.y), (3, 0));

        assert!(board.spawn(&Piece::new(PieceKind::T)));
        assert_eq!(board.active().unwrap().x, 4);
        assert_eq!(board.active().unwrap().kind, PieceKind::T);
    }

    #[test]
    fn test_spawn_blocked() {
        let mut board = board();
        board.set_cell(4, 0, CellType::Z);
        assert!(!board.spawn(&Piece::new(PieceKind::O)));
        // still placed so the overlap can be displayed
        assert!(board.active().is_some());
    }

    #[test]
    fn test_valid_move_right() {
        let mut board = board();
        board.spawn(&Piece::new(PieceKind::O));
        let shape = board.active().unwrap().shape.clone();
        assert!(board.is_valid_move(1, 0, &shape));
    }

    #[test]
    fn test_invalid_move_walls() {
        let mut board = board();
        board.spawn(&Piece::new(PieceKind::O));
        let shape = board.active().unwrap().shape.clone();
        assert!(!board.is_valid_move(10, 0, &shape));
        assert!(!board.is_valid_move(-10, 0, &shape));
        assert!(!board.try_move(10, 0));
        assert_eq!(board.active().unwrap().x, 4);
    }

    #[test]
    fn test_invalid_move_floor() {
        let mut board = board();
        board.spawn(&Piece::new(PieceKind::O));
        let shape = board.active().unwrap().shape.clone();
        assert!(!board.is_valid_move(0, 20, &shape));
        assert!(board.is_valid_move(0, 18, &shape));
    }

    #[test]
    fn test_collision_with_settled_cell() {
        let mut board = board();
        board.set_cell(0, 19, CellType::L);
        board.spawn(&Piece::new(PieceKind::I));
        assert!(board.try_move(-3, 18));
        let shape = board.active().unwrap().shape.clone();
        assert!(!board.is_valid_move(0, 1, &shape));
    }

    #[test]
    fn test_rows_above_top_are_open() {
        let mut board = board();
        board.spawn(&Piece::new(PieceKind::I));
        let vertical = PieceKind::I.shape().rotated_clockwise();
        assert!(board.is_valid_move(0, -3, &vertical));
        assert!(board.try_move(0, -5));
        assert_eq!(board.active().unwrap().y, -5);
    }

    #[test]
    fn test_no_active_piece() {
        let mut board = board();
        assert!(!board.try_move(0, 1));
        board.rotate();
        assert_eq!(board.lock(), LockOutcome::NoPiece);
        assert!(!board.is_valid_move(0, 0, &PieceKind::O.shape()));
    }

    #[test]
    fn test_rotate_applies_when_it_fits() {
        let mut board = board();
        board.spawn(&Piece::new(PieceKind::I));
        board.rotate();
        let active = board.active().unwrap();
        assert_eq!((active.shape.rows(), active.shape.cols()), (4, 1));
    }

    #[test]
    fn test_rotate_blocked_keeps_shape() {
        let mut board = board();
        board.spawn(&Piece::new(PieceKind::I));
        // a vertical I at x=3 would cover (3, 1)
        board.set_cell(3, 1, CellType::S);
        board.rotate();
        assert_eq!(board.active().unwrap().shape, PieceKind::I.shape());
    }

    #[test]
    fn test_lock_without_full_rows() {
        let mut board = board();
        board.spawn(&Piece::new(PieceKind::O));
        while board.try_move(0, 1) {}
        assert_eq!(board.lock(), LockOutcome::Settled);
        assert!(board.active().is_none());
        assert_eq!(board.field().get_cell(4, 19), CellType::O);
        assert_eq!(board.field().get_cell(5, 18), CellType::O);
    }

    #[test]
    fn test_lock_skips_cells_above_top() {
        let mut board = board();
        board.spawn(&Piece::new(PieceKind::O));
        assert!(board.try_move(0, -1));
        assert_eq!(board.lock(), LockOutcome::Settled);
        assert_eq!(board.field().get_cell(4, 0), CellType::O);
        assert!(board.field().row(1).iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_lock_marks_full_bottom_row() {
        let mut board = board();
        fill_row(&mut board, 19);
        board.spawn(&Piece::new(PieceKind::O));
        assert_eq!(board.lock(), LockOutcome::Clearing { rows: vec![19] });
        assert!(board.is_clearing());
        assert_eq!(board.clearing_rows(), &[19]);

        assert_eq!(board.complete_clear(), 1);
        assert!(!board.is_clearing());
        assert!(board.field().row(19).iter().all(|c| c.is_empty()));
        assert_eq!(board.field().rows(), 20);
    }

    #[test]
    fn test_clearing_blocks_mutation() {
        let mut board = board();
        fill_row(&mut board, 19);
        board.spawn(&Piece::new(PieceKind::O));
        // settle on top of the full row, clear of the spawn rows
        while board.try_move(0, 1) {}
        assert!(matches!(board.lock(), LockOutcome::Clearing { .. }));
        assert!(!board.spawn(&Piece::new(PieceKind::T)));
        assert!(board.active().is_none());
        assert!(!board.try_move(0, 1));
        assert_eq!(board.lock(), LockOutcome::NoPiece);

        assert_eq!(board.complete_clear(), 1);
        assert_eq!(board.field().get_cell(4, 19), CellType::O);
        assert!(board.spawn(&Piece::new(PieceKind::T)));
        assert!(board.try_move(0, 1));
    }

    #[test]
    fn test_remove_lines_shifts_rows_down() {
        let mut board = board();
        fill_row(&mut board, 19);
        board.set_cell(2, 18, CellType::J);
        board.remove_lines(&[19]);
        assert!(board.field().row(0).iter().all(|c| c.is_empty()));
        assert_eq!(board.field().get_cell(2, 19), CellType::J);
        assert_eq!(board.field().rows(), 20);
    }

    #[test]
    fn test_remove_multiple_lines_any_order() {
        let mut a = board();
        fill_row(&mut a, 19);
        fill_row(&mut a, 17);
        a.set_cell(0, 18, CellType::I);
        a.set_cell(9, 16, CellType::Z);
        let mut b = a.clone();

        a.remove_lines(&[19, 17]);
        b.remove_lines(&[17, 19]);
        assert_eq!(a.field(), b.field());
        assert_eq!(a.field().get_cell(0, 19), CellType::I);
        assert_eq!(a.field().get_cell(9, 18), CellType::Z);
        assert!(a.field().row(0).iter().all(|c| c.is_empty()));
        assert!(a.field().row(1).iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_completing_row_with_piece() {
        let mut board = board();
        // bottom row full except columns 4 and 5
        for x in (0..10).filter(|x| *x != 4 && *x != 5) {
            board.set_cell(x, 19, CellType::L);
        }
        board.set_cell(0, 18, CellType::J);
        board.spawn(&Piece::new(PieceKind::O));
        while board.try_move(0, 1) {}
        assert_eq!(board.lock(), LockOutcome::Clearing { rows: vec![19] });
        assert_eq!(board.complete_clear(), 1);

        // row 18 shifted to 19: J at column 0, O's top half at 4 and 5
        assert_eq!(board.field().get_cell(0, 19), CellType::J);
        assert_eq!(board.field().get_cell(4, 19), CellType::O);
        assert_eq!(board.field().get_cell(5, 19), CellType::O);
        assert_eq!(
            board.field().row(19).iter().filter(|c| !c.is_empty()).count(),
            3
        );
        assert!(board.field().row(0).iter().all(|c| c.is_empty()));
    }

    fn drop_and_lock(board: &mut Board) -> LockOutcome {
        while board.try_move(0, 1) {}
        board.lock()
    }

    #[test]
    fn test_bottom_row_filled_by_moves() {
        let mut board = board();

        // horizontal I pushed to the left wall: columns 0-3
        assert!(board.spawn(&Piece::new(PieceKind::I)));
        for _ in 0..3 {
            assert!(board.try_move(-1, 0));
        }
        assert!(!board.try_move(-1, 0));
        assert_eq!(drop_and_lock(&mut board), LockOutcome::Settled);

        // horizontal I on columns 5-8
        assert!(board.spawn(&Piece::new(PieceKind::I)));
        assert!(board.try_move(1, 0));
        assert!(board.try_move(1, 0));
        assert_eq!(drop_and_lock(&mut board), LockOutcome::Settled);

        // vertical I against the right wall: column 9
        assert!(board.spawn(&Piece::new(PieceKind::I)));
        board.rotate();
        while board.try_move(1, 0) {}
        assert_eq!(board.active().unwrap().x, 9);
        assert_eq!(drop_and_lock(&mut board), LockOutcome::Settled);

        // only column 4 of the bottom row is left open
        let open: Vec<usize> = (0..10)
            .filter(|&x| board.field().get_cell(x, 19).is_empty())
            .collect();
        assert_eq!(open, vec![4]);

        // vertical I into the gap
        assert!(board.spawn(&Piece::new(PieceKind::I)));
        board.rotate();
        assert!(board.try_move(1, 0));
        assert_eq!(
            drop_and_lock(&mut board),
            LockOutcome::Clearing { rows: vec![19] }
        );
        assert_eq!(board.complete_clear(), 1);

        // both vertical pieces shifted down one row, new empty top row
        assert_eq!(board.field().rows(), 20);
        assert!(board.field().row(0).iter().all(|c| c.is_empty()));
        for x in [4, 9] {
            assert!((17..20).all(|y| board.field().get_cell(x, y) == CellType::I));
            assert!(board.field().get_cell(x, 16).is_empty());
        }
        assert_eq!(
            board.field().row(19).iter().filter(|c| !c.is_empty()).count(),
            2
        );
    }

    #[test]
    fn test_snapshot_draws_active_piece() {
        let mut board = board();
        board.spawn(&Piece::new(PieceKind::O));
        let snapshot = board.snapshot();
        assert_eq!(snapshot.get_cell(4, 0), CellType::O);
        assert_eq!(snapshot.get_cell(5, 1), CellType::O);
        assert!(board.field().get_cell(4, 0).is_empty());
    }

    #[test]
    fn test_cell_color_tokens() {
        assert_eq!(CellType::Empty.color(), 0);
        assert_eq!(CellType::from(PieceKind::I).color(), 0x00ffff);
    }
}
