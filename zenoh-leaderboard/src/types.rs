/// Core types for the zenoh-leaderboard library
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{LeaderboardError, Result};

/// Longest accepted player name, in characters
pub const MAX_PLAYER_NAME_LEN: usize = 50;

/// Score submitted at the end of a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub player_name: String,
    pub score: u64,
}

impl ScoreSubmission {
    /// Create a validated submission
    ///
    /// The name is trimmed; it must be non-empty and at most
    /// `MAX_PLAYER_NAME_LEN` characters.
    pub fn new(player_name: impl Into<String>, score: u64) -> Result<Self> {
        let submission = Self {
            player_name: player_name.into(),
            score,
        };
        submission.validated()
    }

    /// Validate a submission received from the outside, normalising the name
    pub fn validated(self) -> Result<Self> {
        let player_name = self.player_name.trim().to_string();
        if player_name.is_empty() {
            return Err(LeaderboardError::InvalidRecord(
                "Player name and score required".to_string(),
            ));
        }
        if player_name.chars().count() > MAX_PLAYER_NAME_LEN {
            return Err(LeaderboardError::InvalidRecord(format!(
                "Player name longer than {} characters",
                MAX_PLAYER_NAME_LEN
            )));
        }
        Ok(Self {
            player_name,
            score: self.score,
        })
    }
}

/// Stored leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player_name: String,
    pub score: u64,
    /// Submission time, Unix milliseconds
    pub timestamp_ms: u64,
}

impl ScoreRecord {
    /// Stamp a submission with the current time
    pub fn stamped(submission: ScoreSubmission) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self::at(submission, timestamp_ms)
    }

    /// Build a record with an explicit timestamp
    pub fn at(submission: ScoreSubmission, timestamp_ms: u64) -> Self {
        Self {
            player_name: submission.player_name,
            score: submission.score,
            timestamp_ms,
        }
    }
}

impl std::fmt::Display for ScoreRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:<16} {:>8}", self.player_name, self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_trimmed() {
        let submission = ScoreSubmission::new("  Aldric ", 300).unwrap();
        assert_eq!(submission.player_name, "Aldric");
        assert_eq!(submission.score, 300);
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = ScoreSubmission::new("   ", 10).unwrap_err();
        assert!(matches!(err, LeaderboardError::InvalidRecord(_)));
    }

    #[test]
    fn test_long_name_rejected() {
        let name = "x".repeat(MAX_PLAYER_NAME_LEN + 1);
        assert!(ScoreSubmission::new(name, 10).is_err());
        let name = "x".repeat(MAX_PLAYER_NAME_LEN);
        assert!(ScoreSubmission::new(name, 10).is_ok());
    }

    #[test]
    fn test_missing_score_fails_to_parse() {
        let parsed: std::result::Result<ScoreSubmission, _> =
            serde_json::from_str(r#"{"player_name":"Finn"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_record_display() {
        let record = ScoreRecord::at(ScoreSubmission::new("Maeve", 1200).unwrap(), 0);
        let text = format!("{}", record);
        assert!(text.starts_with("Maeve"));
        assert!(text.ends_with("1200"));
    }
}
