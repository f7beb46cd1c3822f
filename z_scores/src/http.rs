//! HTTP gateway exposing the score store as `/api/scores`
//!
//! `GET` returns the ranked list, `POST {player_name, score}` stores a record.
//! The routing logic lives in [`handle`] so it can be exercised without a socket.


use serde_json::json;
use tiny_http::{Header, Method, Response, Server, StatusCode};
use zenoh_leaderboard::{LeaderboardError, ScoreSubmission, SharedStore};

/// Status code and JSON body of a gateway reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    fn error(status: u16, message: impl std::fmt::Display) -> Self {
        Self::json(status, json!({ "error": message.to_string() }))
    }
}

fn is_scores_path(url: &str) -> bool {
    let path = url.split('?').next().unwrap_or("/");
    matches!(path.trim_end_matches('/'), "/api/scores" | "/scores")
}

/// Route one request against the store
pub fn handle(method: &Method, url: &str, body: &str, store: &SharedStore) -> HttpReply {
    if !is_scores_path(url) {
        return HttpReply::error(404, "Not Found");
    }
    let mut store = match store.lock() {
        Ok(store) => store,
        Err(_) => return HttpReply::error(500, "score store lock poisoned"),
    };
    match method {
        Method::Get => match store.top() {
            Ok(records) => match serde_json::to_value(records) {
                Ok(value) => HttpReply::json(200, value),
                Err(e) => HttpReply::error(500, e),
            },
            Err(e) => HttpReply::error(500, e),
        },
        Method::Post => {
            let submission: ScoreSubmission = match serde_json::from_str(body) {
                Ok(submission) => submission,
                Err(_) => return HttpReply::error(400, "Player name and score required"),
            };
            match store.submit(submission) {
                Ok(record) => {
                    tracing::info!(
                        "HTTP stored score {} for '{}'",
                        record.score,
                        record.player_name
                    );
                    HttpReply::json(200, json!({ "message": "Score submitted" }))
                }
                Err(e @ LeaderboardError::InvalidRecord(_)) => HttpReply::error(400, e),
                Err(e) => HttpReply::error(500, e),
            }
        }
        _ => HttpReply::json(405, json!({ "message": "Method Not Allowed" })),
    }
}

/// Serve HTTP requests until the listener fails; blocks the calling thread
pub fn run_gateway(addr: &str, store: SharedStore) -> anyhow::Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP gateway on {}: {}", addr, e))?;
    tracing::info!("HTTP gateway listening on http://{}/api/scores", addr);

    for mut request in server.incoming_requests() {
        let mut body = String::new();
        if let Err(e) = request.as_reader().read_to_string(&mut body) {
            tracing::debug!("Failed to read request body: {}", e);
        }
        let reply = handle(request.method(), request.url(), &body, &store);
        tracing::debug!("{} {} -> {}", request.method(), request.url(), reply.status);

        let mut response =
            Response::from_string(reply.body).with_status_code(StatusCode(reply.status));
        if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
            response.add_header(header);
        }
        if let Err(e) = request.respond(response) {
            tracing::debug!("Failed to send HTTP response: {}", e);
        }
    }
    Ok(())
}
