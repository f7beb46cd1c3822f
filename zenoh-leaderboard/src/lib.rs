//! # zenoh-leaderboard
//!
//! A top-N score leaderboard served over Zenoh.
//!
//! ## Overview
//!
//! The service side owns a [`ScoreStore`] and answers queries on
//! `<prefix>/scores/top` and `<prefix>/scores/submit`. The client side is a thin
//! querier that games call once a match is over. Stores rank records by score,
//! highest first, and keep at most a configured number of them.
//!
//! ## Example
//!
//! ```rust,no_run
//! use zenoh_leaderboard::{LeaderboardClient, LeaderboardConfig, ScoreSubmission};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let session = zenoh::open(zenoh::Config::default()).await?;
//!     let client = LeaderboardClient::new(session, &LeaderboardConfig::default());
//!
//!     client.submit(ScoreSubmission::new("Aldric", 1200)?).await?;
//!     for record in client.top().await? {
//!         println!("{}", record);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
mod codec;
pub mod config;
pub mod error;
pub mod keyexpr;
pub mod name_generator;
pub mod service;
pub mod store;
pub mod types;

pub use client::LeaderboardClient;
pub use config::{LeaderboardConfig, StoreBackend};
pub use error::{LeaderboardError, Result};
pub use name_generator::generate_player_name;
pub use service::{LeaderboardRequest, LeaderboardService};
pub use store::{open_store, JsonFileStore, MemoryStore, ScoreStore, SharedStore};
pub use types::{ScoreRecord, ScoreSubmission};
