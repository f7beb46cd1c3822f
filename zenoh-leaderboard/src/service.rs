//! Queryable serving the leaderboard
//!
//! The service declares a SINGLE queryable on `<prefix>/scores/*` and answers:
//!
//! 1. **Top**: `<prefix>/scores/top`
//!    - Replies with the ranked record list (possibly empty)
//!
//! 2. **Submit**: `<prefix>/scores/submit`
//!    - Query payload carries a `ScoreSubmission`
//!    - Replies with the stored `ScoreRecord`
//!
//! Validation and storage failures are sent back as error replies carrying
//! the reason, so clients can tell "rejected" from "nobody answered".

use zenoh::bytes::ZBytes;
use zenoh::key_expr::KeyExpr;
use zenoh::query::{Query, Queryable};

use crate::codec::{decode, encode};
use crate::config::LeaderboardConfig;
use crate::error::{LeaderboardError, Result};
use crate::keyexpr::{ScoresKeyexpr, ScoresOp};
use crate::store::SharedStore;
use crate::types::ScoreSubmission;

/// Request received by the leaderboard service
#[derive(Debug)]
pub struct LeaderboardRequest {
    query: Query,
    op: ScoresOp,
}

impl LeaderboardRequest {
    pub fn op(&self) -> ScoresOp {
        self.op
    }

    /// Run the request against `store` and send the reply
    pub async fn respond(self, store: &SharedStore) -> Result<()> {
        let keyexpr = self.query.key_expr().clone();
        match execute(self.op, self.query.payload(), store) {
            Ok(payload) => {
                self.query.reply(keyexpr, payload).await?;
            }
            Err(e) => {
                tracing::warn!("Leaderboard {:?} request failed: {}", self.op, e);
                self.query.reply_err(encode(&e.to_string())?).await?;
            }
        }
        Ok(())
    }
}

/// Apply one operation to the store and encode the reply payload
pub fn execute(op: ScoresOp, payload: Option<&ZBytes>, store: &SharedStore) -> Result<ZBytes> {
    let mut store = store
        .lock()
        .map_err(|_| LeaderboardError::Internal("score store lock poisoned".to_string()))?;
    match op {
        ScoresOp::Top => encode(&store.top()?),
        ScoresOp::Submit => {
            let payload = payload.ok_or_else(|| {
                LeaderboardError::InvalidRecord("Player name and score required".to_string())
            })?;
            let submission: ScoreSubmission = decode(payload)?;
            let record = store.submit(submission)?;
            tracing::info!("Stored score {} for '{}'", record.score, record.player_name);
            encode(&record)
        }
    }
}

/// Queryable answering leaderboard requests
#[derive(Debug)]
pub struct LeaderboardService {
    queryable: Queryable<zenoh::handlers::FifoChannelHandler<Query>>,
}

impl LeaderboardService {
    /// Declare the queryable on `<prefix>/scores/*`
    pub async fn declare(session: &zenoh::Session, config: &LeaderboardConfig) -> Result<Self> {
        let keyexpr: KeyExpr = ScoresKeyexpr::new(&config.keyexpr_prefix, None).try_into()?;
        let queryable = session.declare_queryable(&keyexpr).await?;
        tracing::info!("Leaderboard service declared on {}", keyexpr);
        Ok(Self { queryable })
    }

    /// Wait for the next well-formed request, skipping unparsable keyexprs
    pub async fn expect_request(&self) -> Result<LeaderboardRequest> {
        loop {
            let query = self.queryable.recv_async().await.map_err(|_| {
                LeaderboardError::Internal("Queryable channel closed".to_string())
            })?;
            let query_keyexpr = query.key_expr().clone();
            match ScoresKeyexpr::try_from(query_keyexpr.clone()) {
                Ok(parsed) => match parsed.op() {
                    Some(op) => return Ok(LeaderboardRequest { query, op }),
                    None => {
                        tracing::debug!(
                            "Ignoring glob query on leaderboard: {}",
                            query_keyexpr.as_str()
                        );
                    }
                },
                Err(e) => {
                    tracing::debug!("Failed to parse query keyexpr: {}", e);
                }
            }
        }
    }

    /// Answer requests until the queryable closes
    pub async fn serve(&self, store: SharedStore) -> Result<()> {
        loop {
            let request = self.expect_request().await?;
            tracing::debug!("Leaderboard request: {:?}", request.op());
            if let Err(e) = request.respond(&store).await {
                tracing::warn!("Failed to reply to leaderboard query: {}", e);
            }
        }
    }
}
