//! Key expressions for the leaderboard service
//!
//! The service declares a single queryable on `<prefix>/scores/*` and tells
//! requests apart by their last chunk:
//!
//! - `<prefix>/scores/top`: read the ranked list
//! - `<prefix>/scores/submit`: add a record (query payload carries it)

use zenoh::key_expr::KeyExpr;

use crate::error::LeaderboardError;

const SCORES: &str = "scores";

/// Leaderboard operation addressed by a key expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoresOp {
    Top,
    Submit,
}

impl ScoresOp {
    fn as_str(&self) -> &'static str {
        match self {
            ScoresOp::Top => "top",
            ScoresOp::Submit => "submit",
        }
    }
}

/// Scores keyexpr
///
/// Pattern: `<prefix>/scores/<op>`, or `<prefix>/scores/*` when `op` is None
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoresKeyexpr {
    prefix: String,
    op: Option<ScoresOp>,
}

impl ScoresKeyexpr {
    pub fn new(prefix: &KeyExpr, op: Option<ScoresOp>) -> Self {
        Self {
            prefix: prefix.to_string(),
            op,
        }
    }

    pub fn op(&self) -> Option<ScoresOp> {
        self.op
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl TryFrom<KeyExpr<'_>> for ScoresKeyexpr {
    type Error = LeaderboardError;

    fn try_from(keyexpr: KeyExpr<'_>) -> Result<Self, Self::Error> {
        let parts: Vec<&str> = keyexpr.as_str().split('/').collect();

        // Expected pattern: [...prefix]/scores/<op>
        if parts.len() < 3 || parts[parts.len() - 2] != SCORES {
            return Err(LeaderboardError::InvalidKeyexpr(format!(
                "Invalid ScoresKeyexpr pattern: {}",
                keyexpr.as_str()
            )));
        }

        let op = match parts[parts.len() - 1] {
            "top" => Some(ScoresOp::Top),
            "submit" => Some(ScoresOp::Submit),
            "*" => None,
            other => {
                return Err(LeaderboardError::InvalidKeyexpr(format!(
                    "Unknown scores operation '{}' in {}",
                    other,
                    keyexpr.as_str()
                )));
            }
        };
        let prefix = parts[..parts.len() - 2].join("/");

        Ok(Self { prefix, op })
    }
}

impl TryFrom<ScoresKeyexpr> for KeyExpr<'static> {
    type Error = LeaderboardError;

    fn try_from(scores_keyexpr: ScoresKeyexpr) -> Result<Self, Self::Error> {
        let op = scores_keyexpr.op.map(|op| op.as_str()).unwrap_or("*");
        let keyexpr_str = format!("{}/{}/{}", scores_keyexpr.prefix, SCORES, op);
        KeyExpr::try_from(keyexpr_str)
            .map_err(|e| LeaderboardError::InvalidKeyexpr(e.to_string()))
    }
}
