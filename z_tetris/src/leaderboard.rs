use zenoh_leaderboard::{LeaderboardClient, ScoreRecord, ScoreSubmission};

use crate::duel::MatchResult;

const UNAVAILABLE: &str = "leaderboard unavailable";

/// Progress of the post-match leaderboard round trip
#[derive(Debug, Clone, PartialEq)]
pub enum LeaderboardStatus {
    Disabled,
    Submitting,
    Ready(Vec<ScoreRecord>),
    Unavailable,
}

impl LeaderboardStatus {
    pub fn from_result(result: zenoh_leaderboard::Result<Vec<ScoreRecord>>) -> Self {
        match result {
            Ok(records) => LeaderboardStatus::Ready(records),
            Err(e) => {
                tracing::warn!("Leaderboard round trip failed: {}", e);
                LeaderboardStatus::Unavailable
            }
        }
    }

    /// Lines for the results screen, at most `limit` records
    pub fn lines(&self, limit: usize) -> Vec<String> {
        match self {
            LeaderboardStatus::Disabled => Vec::new(),
            LeaderboardStatus::Submitting => vec!["Submitting score...".to_string()],
            LeaderboardStatus::Unavailable => vec![UNAVAILABLE.to_string()],
            LeaderboardStatus::Ready(records) if records.is_empty() => {
                vec!["Top scores:".to_string(), "  (none yet)".to_string()]
            }
            LeaderboardStatus::Ready(records) => {
                let mut lines = vec!["Top scores:".to_string()];
                lines.extend(
                    records
                        .iter()
                        .take(limit)
                        .enumerate()
                        .map(|(i, record)| format!("{:>2}. {}", i + 1, record)),
                );
                lines
            }
        }
    }
}

async fn submit_and_fetch(
    client: &LeaderboardClient,
    submission: ScoreSubmission,
) -> zenoh_leaderboard::Result<Vec<ScoreRecord>> {
    let record = client.submit(submission).await?;
    tracing::info!("Submitted {} for {}", record.score, record.player_name);
    client.top().await
}

/// Leaderboard connection as set up at startup
#[derive(Debug)]
pub enum LeaderboardLink {
    /// Turned off by the player
    Disabled,
    /// Setup failed; the reason is already logged
    Failed(String),
    Connected(LeaderboardClient),
}

impl LeaderboardLink {
    /// Start the post-match round trip and return the status to show first
    pub fn submit(
        &self,
        result: &MatchResult,
        tx: flume::Sender<LeaderboardStatus>,
    ) -> LeaderboardStatus {
        match self {
            LeaderboardLink::Disabled => LeaderboardStatus::Disabled,
            LeaderboardLink::Failed(reason) => {
                tracing::debug!("Score of {} not submitted: {}", result.winner_name, reason);
                LeaderboardStatus::Unavailable
            }
            LeaderboardLink::Connected(client) => {
                spawn_submission(client.clone(), result, tx);
                LeaderboardStatus::Submitting
            }
        }
    }
}

/// Submit the winner's score in the background and report the top list on `tx`
pub fn spawn_submission(
    client: LeaderboardClient,
    result: &MatchResult,
    tx: flume::Sender<LeaderboardStatus>,
) -> tokio::task::JoinHandle<()> {
    let submission = ScoreSubmission {
        player_name: result.winner_name.clone(),
        score: result.winner_score,
    };
    tokio::spawn(async move {
        let _ = tx.send(LeaderboardStatus::Submitting);
        let status = LeaderboardStatus::from_result(submit_and_fetch(&client, submission).await);
        // The results screen may already be gone
        let _ = tx.send(status);
    })
}
