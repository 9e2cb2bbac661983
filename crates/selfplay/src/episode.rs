use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use twenty48_core::{Game, GameConfig, Move};

/// Summary for one completed self-play episode.
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeResult {
    pub seed: u64,
    pub moves: u64,
    pub score: u64,
    pub highest_tile: u32,
    pub won: bool,
}

/// Drive one independently-seeded engine to completion with a uniform
/// random policy over the valid moves.
///
/// The engine owns the spawn RNG; the policy uses its own RNG derived
/// from the same seed, so an episode is fully reproducible.
pub fn play_episode(config: GameConfig, seed: u64, max_moves: u64) -> EpisodeResult {
    let mut game = Game::from_seed(config, seed);
    let mut policy_rng = StdRng::seed_from_u64(seed.wrapping_mul(0x9e37_79b9_7f4a_7c15));

    while game.move_count() < max_moves {
        let legal = game.valid_moves();
        let candidates: Vec<Move> = Move::ALL
            .into_iter()
            .filter(|&dir| legal[dir.index()])
            .collect();
        if candidates.is_empty() {
            break;
        }
        let direction = candidates[policy_rng.gen_range(0..candidates.len())];
        let outcome = game.step(direction);
        if outcome.done {
            break;
        }
    }

    let result = EpisodeResult {
        seed,
        moves: game.move_count(),
        score: game.score(),
        highest_tile: game.grid().highest_tile(),
        won: game.is_won(),
    };
    debug!(
        "episode seed={} finished: {} moves, score {}, highest tile {}",
        result.seed, result.moves, result.score, result.highest_tile
    );
    result
}
