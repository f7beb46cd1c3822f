//! Querier side of the leaderboard
//!
//! Each call sends one query to `<prefix>/scores/<op>` and takes the first
//! reply. No reply within the timeout means no service is running and is
//! reported as `Unavailable`; an error reply is reported as `Rejected`.

use std::time::Duration;

use zenoh::bytes::ZBytes;
use zenoh::key_expr::KeyExpr;

use crate::codec::{decode, decode_text, encode};
use crate::config::LeaderboardConfig;
use crate::error::{LeaderboardError, Result};
use crate::keyexpr::{ScoresKeyexpr, ScoresOp};
use crate::types::{ScoreRecord, ScoreSubmission};

/// Client for a remote leaderboard service
#[derive(Debug, Clone)]
pub struct LeaderboardClient {
    session: zenoh::Session,
    prefix: KeyExpr<'static>,
    timeout: Duration,
}

impl LeaderboardClient {
    pub fn new(session: zenoh::Session, config: &LeaderboardConfig) -> Self {
        Self {
            session,
            prefix: config.keyexpr_prefix.clone(),
            timeout: Duration::from_millis(config.query_timeout_ms),
        }
    }

    /// Ranked records, highest score first
    pub async fn top(&self) -> Result<Vec<ScoreRecord>> {
        let payload = self.query(ScoresOp::Top, None).await?;
        decode(&payload)
    }

    /// Submit a score; returns the record as stored by the service
    pub async fn submit(&self, submission: ScoreSubmission) -> Result<ScoreRecord> {
        let submission = submission.validated()?;
        let payload = self.query(ScoresOp::Submit, Some(encode(&submission)?)).await?;
        decode(&payload)
    }

    async fn query(&self, op: ScoresOp, payload: Option<ZBytes>) -> Result<ZBytes> {
        let keyexpr: KeyExpr = ScoresKeyexpr::new(&self.prefix, Some(op)).try_into()?;
        tracing::debug!("Querying leaderboard: {}", keyexpr);

        let mut get = self.session.get(keyexpr.clone()).timeout(self.timeout);
        if let Some(payload) = payload {
            get = get.payload(payload);
        }
        let replies = get.await?;

        match replies.recv_async().await {
            Ok(reply) => match reply.result() {
                Ok(sample) => Ok(sample.payload().clone()),
                Err(err) => {
                    let reason = decode_text(err.payload())
                        .unwrap_or_else(|_| "unreadable error reply".to_string());
                    Err(LeaderboardError::Rejected(reason))
                }
            },
            Err(_) => Err(LeaderboardError::Unavailable(format!(
                "no leaderboard service answered on {}",
                keyexpr
            ))),
        }
    }
}
