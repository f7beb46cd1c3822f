use anyhow::anyhow;
use clap::Parser;
use console::Term;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use z_tetris::input::{DEFAULT_KEY_HOLD_MS, map_key};
use z_tetris::{
    AnsiTermStyle, Duel, DuelView, GameConfig, KeyCommand, KeyLatch, LeaderboardLink,
    PieceSource, PlainTermStyle, RandomPieces, TermRender,
};
use zenoh::key_expr::KeyExpr;
use zenoh_leaderboard::{LeaderboardClient, LeaderboardConfig, generate_player_name};

/// z_tetris - two-player Tetris duel on one keyboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Player 1 name (generated if omitted)
    #[arg(long)]
    player1: Option<String>,

    /// Player 2 name (generated if omitted)
    #[arg(long)]
    player2: Option<String>,

    /// Leaderboard key expression prefix
    #[arg(short, long)]
    prefix: Option<KeyExpr<'static>>,

    /// Path to Zenoh config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Play without submitting scores
    #[arg(long)]
    no_leaderboard: bool,

    /// Plain ASCII rendering without colors
    #[arg(long)]
    plain: bool,

    /// Seed for the piece sequence, shared by both players
    #[arg(long)]
    seed: Option<u64>,

    /// Board width in cells
    #[arg(long, default_value_t = 10)]
    width: usize,

    /// Board height in cells
    #[arg(long, default_value_t = 20)]
    height: usize,

    /// Gravity period in milliseconds
    #[arg(long, default_value_t = 1000)]
    drop_interval_ms: u64,

    /// Line clear animation length in milliseconds
    #[arg(long, default_value_t = 800)]
    clear_delay_ms: u64,

    /// How long a key press counts as held, in milliseconds
    #[arg(long, default_value_t = DEFAULT_KEY_HOLD_MS)]
    key_hold_ms: u64,

    /// Frame period in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
}

fn piece_source(seed: Option<u64>) -> Box<dyn PieceSource + Send> {
    match seed {
        Some(seed) => Box::new(RandomPieces::seeded(seed)),
        None => Box::new(RandomPieces::new()),
    }
}

async fn leaderboard_client(args: &Args) -> anyhow::Result<LeaderboardClient> {
    let zenoh_config = if let Some(config_path) = &args.config {
        zenoh::Config::from_file(config_path)
            .map_err(|e| anyhow!("Failed to load config file: {}", e))?
    } else {
        zenoh::Config::default()
    };
    let session = zenoh::open(zenoh_config)
        .await
        .map_err(|e| anyhow!("Failed to open zenoh session: {}", e))?;

    let mut config = LeaderboardConfig::new();
    if let Some(prefix) = args.prefix.clone() {
        config = config.with_keyexpr_prefix(prefix);
    }
    Ok(LeaderboardClient::new(session, &config))
}

fn render(term: &Term, view: &DuelView, plain: bool) -> anyhow::Result<()> {
    let lines = if plain {
        view.render(&PlainTermStyle)
    } else {
        view.render(&AnsiTermStyle)
    };
    term.move_cursor_to(0, 0)?;
    for line in lines {
        term.write_line(&line)?;
    }
    term.flush()?;
    Ok(())
}

#[tokio::main(flavor = "multi_thread", worker_threads = 1)]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout belongs to the game screen
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let link = if args.no_leaderboard {
        LeaderboardLink::Disabled
    } else {
        match leaderboard_client(&args).await {
            Ok(client) => LeaderboardLink::Connected(client),
            Err(e) => {
                tracing::warn!("Playing without leaderboard: {}", e);
                LeaderboardLink::Failed(e.to_string())
            }
        }
    };

    let game_config = GameConfig::new()
        .with_board_size(args.width, args.height)
        .with_drop_interval_ms(args.drop_interval_ms)
        .with_clear_delay_ms(args.clear_delay_ms);
    let names = [
        args.player1.clone().unwrap_or_else(generate_player_name),
        args.player2.clone().unwrap_or_else(generate_player_name),
    ];

    println!("=== z_tetris - Tetris duel ===");
    println!("{} (P1): A/D move, S down, W rotate", names[0]);
    println!("{} (P2): ← → move, ↓ down, ↑ rotate", names[1]);
    println!("q - Quit");

    let (key_tx, key_rx) = flume::unbounded::<KeyCommand>();
    let keyboard_task = tokio::task::spawn_blocking(move || {
        let input_term = Term::stdout();
        loop {
            if let Ok(key) = input_term.read_key()
                && let Some(command) = map_key(&key)
            {
                if key_tx.send(command).is_err() || command == KeyCommand::Quit {
                    break;
                }
            }
        }
    });

    let render_term = Term::stdout();
    render_term.clear_screen()?;
    render_term.hide_cursor()?;

    let start = Instant::now();
    let now_ms = || start.elapsed().as_millis() as u64;
    let mut frames = tokio::time::interval(Duration::from_millis(args.frame_ms.max(1)));
    let mut latch = KeyLatch::new(args.key_hold_ms);
    let mut duel = Duel::new(
        &game_config,
        names,
        [piece_source(args.seed), piece_source(args.seed)],
        now_ms(),
    );

    // Match
    let mut quit = false;
    while !duel.is_over() {
        frames.tick().await;
        let now = now_ms();
        for command in key_rx.try_iter() {
            match command {
                KeyCommand::Press(player, control) => latch.press(player, control, now),
                KeyCommand::Quit => quit = true,
            }
        }
        if quit {
            break;
        }
        duel.tick(now, &latch.poll(now));
        let view = DuelView::new(duel.state(), Vec::new()).with_flash((now / 100) % 2 == 0);
        render(&render_term, &view, args.plain)?;
    }

    // Results
    if let Some(result) = duel.outcome().cloned() {
        let (status_tx, status_rx) = flume::unbounded();
        let mut status = link.submit(&result, status_tx);
        while !quit {
            frames.tick().await;
            if let Some(latest) = status_rx.try_iter().last() {
                status = latest;
            }
            quit = key_rx.try_iter().any(|c| c == KeyCommand::Quit);

            let mut message = vec![format!(
                "{} wins with {}!",
                result.winner_name, result.winner_score
            )];
            message.extend(status.lines(5));
            message.push("q - Quit".to_string());
            render(&render_term, &DuelView::new(duel.state(), message), args.plain)?;
        }
    }

    render_term.show_cursor()?;
    keyboard_task.abort();
    let _ = keyboard_task.await;
    println!("Game Over!");
    Ok(())
}
