mod episode;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use rayon::prelude::*;

use episode::{play_episode, EpisodeResult};
use twenty48_core::GameConfig;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Run random-policy self-play episodes against the twenty48 engine"
)]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: u32,

    /// Base RNG seed; episode i plays with seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// TOML file overriding the default game configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write per-episode results as JSON to this path
    #[arg(long, value_name = "FILE")]
    results: Option<PathBuf>,

    /// Abort an episode after this many moves
    #[arg(long, default_value_t = 100_000)]
    max_moves: u64,

    /// Number of worker threads (defaults to the Rayon default)
    #[arg(long, value_name = "N")]
    workers: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match &cli.config {
        Some(path) => GameConfig::from_toml(path)?,
        None => GameConfig::default(),
    };

    info!(
        "playing {} games on a {size}x{size} grid, base seed {}",
        cli.games,
        cli.seed,
        size = config.size
    );

    let run = || -> Vec<EpisodeResult> {
        (0..cli.games)
            .into_par_iter()
            .map(|i| play_episode(config, cli.seed + u64::from(i), cli.max_moves))
            .collect()
    };

    let results = if let Some(n) = cli.workers {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .context("failed to build rayon thread pool")?
            .install(run)
    } else {
        run()
    };

    report(&results);

    if let Some(path) = &cli.results {
        let json = serde_json::to_string_pretty(&results)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write results to {}", path.display()))?;
        info!("wrote {} episode results to {}", results.len(), path.display());
    }

    Ok(())
}

fn report(results: &[EpisodeResult]) {
    if results.is_empty() {
        info!("no episodes played");
        return;
    }
    let best = results.iter().map(|r| r.score).max().unwrap_or(0);
    let wins = results.iter().filter(|r| r.won).count();
    let total_moves: u64 = results.iter().map(|r| r.moves).sum();
    let highest = results.iter().map(|r| r.highest_tile).max().unwrap_or(0);
    info!(
        "{} episodes: best score {}, {} wins, highest tile {}, {:.1} moves/episode",
        results.len(),
        best,
        wins,
        highest,
        total_moves as f64 / results.len() as f64
    );
}
