//! Galaxy Raiders entry point
//!
//! Loads configuration, wires the ports and runs the game loop with the
//! autopilot at the controls.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use galaxy_raiders::persistence::{JsonScoreStore, MemoryScoreStore, ScoreStore};
use galaxy_raiders::platform::{AsciiVisualizer, AutopilotController, HeadlessVisualizer, PcgGenerator};
use galaxy_raiders::sim::Visualizer;
use galaxy_raiders::{Config, ConfigError, GameEngine};

#[derive(Parser, Debug)]
#[command(name = "galaxy-raiders", about = "Arcade space shooter simulation")]
struct Cli {
    /// JSON config file; defaults are used for missing keys
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many ticks instead of running forever
    #[arg(long)]
    ticks: Option<u64>,

    /// Run bounded ticks back to back instead of at the frame rate
    #[arg(long, requires = "ticks")]
    unpaced: bool,

    /// RNG seed; taken from the clock when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Skip terminal drawing
    #[arg(long)]
    no_render: bool,

    /// Keep scores in memory only
    #[arg(long)]
    no_persist: bool,

    #[arg(long, default_value_t = 80)]
    columns: usize,

    #[arg(long, default_value_t = 24)]
    rows: usize,
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("galaxy-raiders: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ConfigError> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    }
    .with_env_overrides()?;

    let seed = cli.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    log::info!("Galaxy Raiders starting (seed {})", seed);

    let visualizer: Box<dyn Visualizer> = if cli.no_render {
        Box::new(HeadlessVisualizer::new())
    } else {
        Box::new(AsciiVisualizer::new(std::io::stdout(), cli.columns, cli.rows).with_clear_screen(true))
    };
    let store: Box<dyn ScoreStore> = if cli.no_persist {
        Box::new(MemoryScoreStore::new(config.persistence.leaderboard_capacity))
    } else {
        Box::new(JsonScoreStore::new(&config.persistence))
    };

    let mut engine = GameEngine::new(
        config,
        PcgGenerator::new(seed),
        AutopilotController::default(),
        visualizer,
        store,
    )?;

    match cli.ticks {
        Some(n) if cli.unpaced => engine.execute_n(n),
        Some(n) => engine.execute_paced(n),
        None => engine.execute(),
    }

    let stats = engine.stats();
    log::info!(
        "Session over after {} ticks: score {}, {} kills, {} asteroids, {} missiles",
        stats.ticks,
        engine.state().score,
        stats.kills,
        stats.asteroids_spawned,
        stats.missiles_launched
    );
    println!("Final score: {}", engine.state().score);

    if !cli.no_persist {
        report_leaderboard(&JsonScoreStore::new(&engine.config().persistence));
    }
    Ok(())
}

fn report_leaderboard(store: &JsonScoreStore) {
    let board = match store.load_leaderboard() {
        Ok(board) => board,
        Err(e) => {
            log::warn!("Leaderboard unavailable: {}", e);
            return;
        }
    };
    if let Some(best) = board.top_score() {
        println!("Best score on record: {}", best);
    }
    for (rank, entry) in board.ranked().iter().enumerate() {
        log::info!(
            "#{} {} ({} - {})",
            rank + 1,
            entry.score,
            entry.start_time,
            entry.end_time
        );
    }
}
