/// Error types for the zenoh-leaderboard library
use thiserror::Error;

/// Result type alias for leaderboard operations
pub type Result<T> = std::result::Result<T, LeaderboardError>;

/// Errors that can occur in zenoh-leaderboard operations
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// Zenoh-related errors
    #[error("Zenoh error: {0}")]
    Zenoh(#[from] zenoh::Error),

    /// Backend is not configured (missing store path or credentials)
    ///
    /// Kept apart from an empty leaderboard, which is a successful empty result.
    #[error("Leaderboard backend not configured: {0}")]
    Config(String),

    /// Submitted record failed validation
    #[error("Invalid score record: {0}")]
    InvalidRecord(String),

    /// Invalid keyexpr pattern
    #[error("Invalid keyexpr: {0}")]
    InvalidKeyexpr(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// No leaderboard service answered
    #[error("Leaderboard unavailable: {0}")]
    Unavailable(String),

    /// Service answered with an error reply
    #[error("Leaderboard rejected request: {0}")]
    Rejected(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for LeaderboardError {
    fn from(e: serde_json::Error) -> Self {
        LeaderboardError::Serialization(e.to_string())
    }
}
