mod http;

use anyhow::anyhow;
use clap::Parser;
use std::path::PathBuf;
use zenoh::key_expr::KeyExpr;
use zenoh_leaderboard::{open_store, LeaderboardConfig, LeaderboardService, StoreBackend};

/// z_scores - leaderboard server for z_tetris
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file holding the scores (falls back to $LEADERBOARD_STORE)
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Keep scores in memory only
    #[arg(short, long)]
    memory: bool,

    /// Number of records kept
    #[arg(long, default_value_t = zenoh_leaderboard::config::DEFAULT_CAPACITY)]
    capacity: usize,

    /// Key expression prefix
    #[arg(short, long)]
    prefix: Option<String>,

    /// HTTP gateway address
    #[arg(long, default_value = "127.0.0.1:8080")]
    http: String,

    /// Disable the HTTP gateway
    #[arg(long)]
    no_http: bool,

    /// Path to Zenoh config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "multi_thread", worker_threads = 1)]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt::init();

    // Fails with a configuration error when no backend is given
    let backend = StoreBackend::resolve(args.store.clone(), args.memory)?;

    let mut config = LeaderboardConfig::new().with_capacity(args.capacity);
    if let Some(prefix) = args.prefix.clone() {
        let prefix: KeyExpr<'static> = prefix
            .try_into()
            .map_err(|e| anyhow!("Invalid prefix key expression: {}", e))?;
        config = config.with_keyexpr_prefix(prefix);
    }

    let store = open_store(&backend, config.capacity)?;

    let zenoh_config = if let Some(config_path) = args.config {
        zenoh::Config::from_file(config_path)
            .map_err(|e| anyhow!("Failed to load config file: {}", e))?
    } else {
        zenoh::Config::default()
    };
    let session = zenoh::open(zenoh_config)
        .await
        .map_err(|e| anyhow!("Failed to open zenoh session: {}", e))?;

    let service = LeaderboardService::declare(&session, &config).await?;

    println!("=== z_scores - z_tetris leaderboard ===");
    match &backend {
        StoreBackend::Memory => println!("Store: memory"),
        StoreBackend::JsonFile(path) => println!("Store: {}", path.display()),
    }
    println!("Prefix: {}", config.keyexpr_prefix);
    println!("Capacity: {}", config.capacity);

    if !args.no_http {
        println!("HTTP: http://{}/api/scores", args.http);
        let addr = args.http.clone();
        let http_store = store.clone();
        // tiny_http blocks on accept; a detached thread ends with the process
        std::thread::Builder::new()
            .name("http-gateway".to_string())
            .spawn(move || {
                if let Err(e) = http::run_gateway(&addr, http_store) {
                    tracing::error!("HTTP gateway stopped: {}", e);
                }
            })?;
    }

    tokio::select! {
        result = service.serve(store.clone()) => result?,
        _ = tokio::signal::ctrl_c() => println!("Shutting down"),
    }

    Ok(())
}
