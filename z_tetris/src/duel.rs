use crate::{
    config::GameConfig,
    piece::PieceSource,
    session::{InputState, PlayerId, Session, StepResult},
    state::{DuelState, PlayerState},
};
use serde::{Deserialize, Serialize};

/// Final result of a duel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: PlayerId,
    pub loser: PlayerId,
    pub winner_name: String,
    pub winner_score: u64,
}

/// Two sessions side by side; the first one to top out loses
pub struct Duel {
    sessions: [Session; 2],
    names: [String; 2],
    outcome: Option<MatchResult>,
}

impl Duel {
    pub fn new(
        config: &GameConfig,
        names: [String; 2],
        sources: [Box<dyn PieceSource + Send>; 2],
        now: u64,
    ) -> Duel {
        let [source_one, source_two] = sources;
        tracing::info!("Duel started: {} vs {}", names[0], names[1]);
        Duel {
            sessions: [
                Session::new(PlayerId::One, config, source_one, now),
                Session::new(PlayerId::Two, config, source_two, now),
            ],
            names,
            outcome: None,
        }
    }

    pub fn session(&self, player: PlayerId) -> &Session {
        &self.sessions[player.index()]
    }

    pub fn session_mut(&mut self, player: PlayerId) -> &mut Session {
        &mut self.sessions[player.index()]
    }

    pub fn name(&self, player: PlayerId) -> &str {
        &self.names[player.index()]
    }

    /// Tick player 1 then player 2; nothing moves once the duel is decided
    pub fn tick(&mut self, now: u64, inputs: &[InputState; 2]) -> (StepResult, StepResult) {
        let mut results = [StepResult::None, StepResult::None];
        for player in [PlayerId::One, PlayerId::Two] {
            if self.outcome.is_some() {
                break;
            }
            let result = self.sessions[player.index()].tick(now, &inputs[player.index()]);
            if let StepResult::GameOver(loser) = result {
                self.report_game_over(loser);
            }
            results[player.index()] = result;
        }
        let [one, two] = results;
        (one, two)
    }

    /// Record `loser` as topped out; only the first report counts
    pub fn report_game_over(&mut self, loser: PlayerId) {
        if self.outcome.is_some() {
            return;
        }
        for session in &mut self.sessions {
            session.pause();
        }
        let winner = loser.other();
        let result = MatchResult {
            winner,
            loser,
            winner_name: self.names[winner.index()].clone(),
            winner_score: self.sessions[winner.index()].score(),
        };
        tracing::info!(
            "{} ({}) wins with {} points",
            result.winner_name,
            winner,
            result.winner_score
        );
        self.outcome = Some(result);
    }

    pub fn outcome(&self) -> Option<&MatchResult> {
        self.outcome.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn state(&self) -> DuelState {
        let player_state = |player: PlayerId| {
            let session = self.session(player);
            let lost = session.is_lost()
                || self.outcome.as_ref().is_some_and(|o| o.loser == player);
            PlayerState::capture(self.name(player), session, lost)
        };
        DuelState {
            player_one: player_state(PlayerId::One),
            player_two: player_state(PlayerId::Two),
            outcome: self.outcome.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CellType;
    use crate::piece::{PieceKind, PieceSequence};

    fn duel() -> Duel {
        Duel::new(
            &GameConfig::default(),
            ["Alice".to_string(), "Bob".to_string()],
            [
                Box::new(PieceSequence::new([PieceKind::O])),
                Box::new(PieceSequence::new([PieceKind::O])),
            ],
            0,
        )
    }

    fn block_spawn(duel: &mut Duel, player: PlayerId) {
        for y in 2..20 {
            duel.session_mut(player).board_mut().set_cell(4, y, CellType::Z);
        }
    }

    #[test]
    fn test_game_over_names_other_winner() {
        let mut duel = duel();
        duel.session_mut(PlayerId::Two)
            .board_mut()
            .set_cell(0, 19, CellType::I);
        block_spawn(&mut duel, PlayerId::One);

        let (one, _) = duel.tick(1001, &[InputState::default(); 2]);
        assert_eq!(one, StepResult::GameOver(PlayerId::One));

        let outcome = duel.outcome().unwrap();
        assert_eq!(outcome.winner, PlayerId::Two);
        assert_eq!(outcome.loser, PlayerId::One);
        assert_eq!(outcome.winner_name, "Bob");
        assert_eq!(outcome.winner_score, 0);
        assert!(duel.session(PlayerId::One).is_paused());
        assert!(duel.session(PlayerId::Two).is_paused());
    }

    #[test]
    fn test_second_player_not_ticked_after_outcome() {
        let mut duel = duel();
        block_spawn(&mut duel, PlayerId::One);
        let (_, two) = duel.tick(1001, &[InputState::default(); 2]);
        assert_eq!(two, StepResult::None);
        assert_eq!(duel.session(PlayerId::Two).board().active().unwrap().y, 0);
    }

    #[test]
    fn test_game_over_reported_once() {
        let mut duel = duel();
        duel.report_game_over(PlayerId::Two);
        duel.report_game_over(PlayerId::One);
        assert_eq!(duel.outcome().unwrap().winner, PlayerId::One);
        assert_eq!(duel.outcome().unwrap().winner_name, "Alice");
    }

    #[test]
    fn test_winner_score_reported() {
        let mut duel = duel();
        let down = InputState {
            down: true,
            ..InputState::default()
        };
        duel.tick(10, &[InputState::default(), down]);
        duel.tick(61, &[InputState::default(), down]);
        duel.report_game_over(PlayerId::One);
        assert_eq!(duel.outcome().unwrap().winner_score, 2);
    }

    #[test]
    fn test_inputs_routed_per_player() {
        let mut duel = duel();
        let left = InputState {
            left: true,
            ..InputState::default()
        };
        let right = InputState {
            right: true,
            ..InputState::default()
        };
        duel.tick(10, &[left, right]);
        assert_eq!(duel.session(PlayerId::One).board().active().unwrap().x, 3);
        assert_eq!(duel.session(PlayerId::Two).board().active().unwrap().x, 5);
    }

    #[test]
    fn test_state_snapshot() {
        let mut duel = duel();
        let state = duel.state();
        assert_eq!(state.player_one.name, "Alice");
        assert_eq!(state.player_two.name, "Bob");
        assert!(state.outcome.is_none());

        duel.report_game_over(PlayerId::One);
        let state = duel.state();
        assert!(state.player_one.lost);
        assert!(!state.player_two.lost);
        assert_eq!(state.outcome.unwrap().winner, PlayerId::Two);
    }
}
