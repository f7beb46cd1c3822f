//! Configuration for leaderboard services and clients

use std::path::PathBuf;

use zenoh::key_expr::KeyExpr;

use crate::error::{LeaderboardError, Result};

/// Environment variable naming the JSON store file
pub const STORE_ENV_VAR: &str = "LEADERBOARD_STORE";

/// Default key expression prefix
pub const DEFAULT_PREFIX: &str = "z_tetris/leaderboard";

/// Default number of records kept by a store
pub const DEFAULT_CAPACITY: usize = 50;

/// Where the server keeps its records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Records live only as long as the process
    Memory,
    /// Flat JSON array persisted to a file
    JsonFile(PathBuf),
}

impl StoreBackend {
    /// Pick a backend from an explicit path, the environment, or the memory flag
    ///
    /// Explicit path wins over `LEADERBOARD_STORE`, which wins over `memory`.
    /// Returns `LeaderboardError::Config` when nothing is configured.
    pub fn resolve(path: Option<PathBuf>, memory: bool) -> Result<Self> {
        let env_path = std::env::var_os(STORE_ENV_VAR).map(PathBuf::from);
        Self::resolve_with(path, env_path, memory)
    }

    fn resolve_with(path: Option<PathBuf>, env_path: Option<PathBuf>, memory: bool) -> Result<Self> {
        if let Some(path) = path.or(env_path) {
            if path.as_os_str().is_empty() {
                return Err(LeaderboardError::Config("store path is empty".to_string()));
            }
            return Ok(StoreBackend::JsonFile(path));
        }
        if memory {
            return Ok(StoreBackend::Memory);
        }
        Err(LeaderboardError::Config(format!(
            "no store configured: pass --store <path>, set {}, or use --memory",
            STORE_ENV_VAR
        )))
    }
}

/// Main configuration shared by the leaderboard service and client
#[derive(Debug, Clone)]
pub struct LeaderboardConfig {
    /// Key expression prefix for leaderboard communication
    pub keyexpr_prefix: KeyExpr<'static>,

    /// Maximum number of records kept, highest scores first
    pub capacity: usize,

    /// Timeout for client queries (in milliseconds)
    pub query_timeout_ms: u64,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            keyexpr_prefix: KeyExpr::try_from(DEFAULT_PREFIX).unwrap().into_owned(),
            capacity: DEFAULT_CAPACITY,
            query_timeout_ms: 2000,
        }
    }
}

impl LeaderboardConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key expression prefix
    pub fn with_keyexpr_prefix(mut self, prefix: KeyExpr<'static>) -> Self {
        self.keyexpr_prefix = prefix;
        self
    }

    /// Set the store capacity (at least one record)
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Set the client query timeout in milliseconds
    pub fn with_query_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.query_timeout_ms = timeout_ms;
        self
    }
}
