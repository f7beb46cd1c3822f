pub mod board;
pub mod config;
pub mod duel;
pub mod input;
pub mod leaderboard;
pub mod piece;
pub mod session;
pub mod state;
pub mod term_render;

pub use board::{ActivePiece, Board, CellType, Field, LockOutcome};
pub use config::GameConfig;
pub use duel::{Duel, MatchResult};
pub use input::{Control, KeyCommand, KeyLatch};
pub use leaderboard::{LeaderboardLink, LeaderboardStatus};
pub use piece::{Piece, PieceKind, PieceSequence, PieceSource, RandomPieces, Shape};
pub use session::{InputState, PlayerId, Session, StepResult};
pub use state::{DuelState, PlayerState};
pub use term_render::{AnsiTermStyle, DuelView, PlainTermStyle, TermRender, TermStyle};
