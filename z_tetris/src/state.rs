use serde::{Deserialize, Serialize};

use crate::{board::Field, duel::MatchResult, session::Session};

/// Side length of the next-piece preview
pub const PREVIEW_SIZE: usize = 4;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    /// Settled cells with the active piece drawn in
    pub well: Field,
    pub preview: Field,
    pub score: u64,
    pub lost: bool,
    pub clearing_rows: Vec<usize>,
}

impl PlayerState {
    pub fn capture(name: &str, session: &Session, lost: bool) -> Self {
        let mut preview = Field::new(PREVIEW_SIZE, PREVIEW_SIZE);
        let next = session.next();
        preview.draw_shape(&next.shape, 0, 0, next.kind.into());
        PlayerState {
            name: name.to_string(),
            well: session.board().snapshot(),
            preview,
            score: session.score(),
            lost,
            clearing_rows: session.board().clearing_rows().to_vec(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DuelState {
    pub player_one: PlayerState,
    pub player_two: PlayerState,
    pub outcome: Option<MatchResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CellType;
    use crate::config::GameConfig;
    use crate::piece::{PieceKind, PieceSequence};
    use crate::session::PlayerId;

    #[test]
    fn test_capture_draws_preview_and_active_piece() {
        let session = Session::new(
            PlayerId::One,
            &GameConfig::default(),
            Box::new(PieceSequence::new([PieceKind::O, PieceKind::I])),
            0,
        );
        let state = PlayerState::capture("Ann", &session, false);
        assert_eq!(state.name, "Ann");
        assert_eq!(state.well.get_cell(4, 0), CellType::O);
        assert_eq!(state.preview.cols(), 4);
        assert!((0..4).all(|x| state.preview.get_cell(x, 0) == CellType::I));
        assert!(state.preview.row(1).iter().all(|c| c.is_empty()));
        assert!(state.clearing_rows.is_empty());
    }

    #[test]
    fn test_duel_state_as_json() {
        let duel = crate::duel::Duel::new(
            &GameConfig::default(),
            ["Ann".to_string(), "Bo".to_string()],
            [
                Box::new(PieceSequence::new([PieceKind::T])),
                Box::new(PieceSequence::new([PieceKind::T])),
            ],
            0,
        );
        let json = serde_json::to_value(duel.state()).unwrap();
        assert_eq!(json["player_two"]["name"], "Bo");
        assert_eq!(json["player_one"]["score"], 0);
        assert!(json["outcome"].is_null());
    }
}
