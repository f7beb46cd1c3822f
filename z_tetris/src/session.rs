use crate::{
    board::{Board, LockOutcome},
    config::GameConfig,
    piece::{Piece, PieceSource},
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub fn number(&self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    pub fn other(&self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn index(&self) -> usize {
        self.number() as usize - 1
    }
}

impl Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.number())
    }
}

/// Controls of one player as sampled for a tick
///
/// `rotate` is the held state; a session rotates once per press.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub rotate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    None,
    Moved,
    /// A piece settled and `lines` rows were removed
    Locked(usize),
    /// A piece settled and these rows are flashing before removal
    Clearing(Vec<usize>),
    GameOver(PlayerId),
}

/// One player's game: board, queued piece, score and timers
pub struct Session {
    id: PlayerId,
    board: Board,
    source: Box<dyn PieceSource + Send>,
    next: Piece,
    score: u64,
    lost: bool,
    paused: bool,

    drop_interval_ms: u64,
    move_interval_ms: u64,
    soft_drop_interval_ms: u64,
    clear_delay_ms: u64,
    line_clear_score: u64,
    soft_drop_score: u64,

    next_drop_ms: u64,
    // Input is ignored until `now` exceeds this
    next_input_ms: u64,
    clear_deadline_ms: Option<u64>,
    rotate_held: bool,
    rotate_pending: bool,
}

impl Session {
    pub fn new(
        id: PlayerId,
        config: &GameConfig,
        mut source: Box<dyn PieceSource + Send>,
        now: u64,
    ) -> Self {
        let next = source.draw();
        let mut session = Session {
            id,
            board: Board::new(config),
            source,
            next,
            score: 0,
            lost: false,
            paused: false,
            drop_interval_ms: config.drop_interval_ms,
            move_interval_ms: config.move_interval_ms,
            soft_drop_interval_ms: config.soft_drop_interval_ms,
            clear_delay_ms: config.clear_delay_ms,
            line_clear_score: config.line_clear_score,
            soft_drop_score: config.soft_drop_score,
            next_drop_ms: now + config.drop_interval_ms,
            next_input_ms: 0,
            clear_deadline_ms: None,
            rotate_held: false,
            rotate_pending: false,
        };
        session.spawn_next();
        tracing::debug!("{} session started", id);
        session
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Board access for setting up positions
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn next(&self) -> &Piece {
        &self.next
    }

    pub fn is_lost(&self) -> bool {
        self.lost
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop reacting to ticks; the board is left as is
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Advance the session to `now` (milliseconds, monotonic)
    pub fn tick(&mut self, now: u64, input: &InputState) -> StepResult {
        // Presses are latched even while nothing else can happen
        if input.rotate && !self.rotate_held {
            self.rotate_pending = true;
        }
        self.rotate_held = input.rotate;

        if self.lost || self.paused {
            return StepResult::None;
        }

        if let Some(deadline) = self.clear_deadline_ms {
            if now < deadline {
                return StepResult::None;
            }
            self.clear_deadline_ms = None;
            let lines = self.board.complete_clear();
            return self.after_lock(lines);
        }

        if self.board.active().is_none() {
            return StepResult::None;
        }

        let mut result = StepResult::None;

        if now > self.next_drop_ms {
            if self.board.try_move(0, 1) {
                result = StepResult::Moved;
            } else {
                result = self.lock(now);
            }
            self.next_drop_ms = now + self.drop_interval_ms;
            if !matches!(result, StepResult::Moved | StepResult::Locked(_)) {
                return result;
            }
        }

        if now > self.next_input_ms {
            let moved = if input.left {
                self.next_input_ms = now + self.move_interval_ms;
                self.board.try_move(-1, 0)
            } else if input.right {
                self.next_input_ms = now + self.move_interval_ms;
                self.board.try_move(1, 0)
            } else if input.down {
                self.next_input_ms = now + self.soft_drop_interval_ms;
                let dropped = self.board.try_move(0, 1);
                if dropped {
                    self.next_drop_ms = now + self.drop_interval_ms;
                    self.score += self.soft_drop_score;
                }
                dropped
            } else if self.rotate_pending {
                self.rotate_pending = false;
                match self.board.active() {
                    Some(before) => {
                        let before = before.shape.clone();
                        self.board.rotate();
                        self.board.active().is_some_and(|a| a.shape != before)
                    }
                    None => false,
                }
            } else {
                false
            };
            if moved && result == StepResult::None {
                result = StepResult::Moved;
            }
        }

        result
    }

    fn lock(&mut self, now: u64) -> StepResult {
        match self.board.lock() {
            LockOutcome::NoPiece => StepResult::None,
            LockOutcome::Settled => self.after_lock(0),
            LockOutcome::Clearing { .. } if self.clear_delay_ms == 0 => {
                let lines = self.board.complete_clear();
                self.after_lock(lines)
            }
            LockOutcome::Clearing { rows } => {
                self.clear_deadline_ms = Some(now + self.clear_delay_ms);
                StepResult::Clearing(rows)
            }
        }
    }

    fn after_lock(&mut self, lines: usize) -> StepResult {
        if lines > 0 {
            self.score += lines as u64 * self.line_clear_score;
            tracing::info!("{} cleared {} line(s), score {}", self.id, lines, self.score);
        }
        if self.spawn_next() {
            StepResult::Locked(lines)
        } else {
            StepResult::GameOver(self.id)
        }
    }

    /// Spawn the queued piece and queue a fresh one; false means the game is lost
    fn spawn_next(&mut self) -> bool {
        let piece = std::mem::replace(&mut self.next, self.source.draw());
        if self.board.spawn(&piece) {
            true
        } else {
            self.lost = true;
            tracing::info!("{} topped out with score {}", self.id, self.score);
            false
        }
    }
}
