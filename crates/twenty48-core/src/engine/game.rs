use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;

use super::grid::Grid;
use super::moves::{shift, Move};

/// Snapshot returned by [`Game::step`] for environment-style callers.
///
/// No reward is computed here: the agent collaborator derives its own
/// reward from the grid, the merge list, and the score.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// Whether the move changed the grid.
    pub moved: bool,
    /// Row-major grid snapshot after the move (and spawn, if any).
    pub grid: Vec<u32>,
    /// Merge events produced by this move, in scan order.
    pub merged: Vec<u32>,
    /// Total score after the move.
    pub score: u64,
    /// True once the game is over or won.
    pub done: bool,
}

/// The game engine facade: owns the grid, score, move counter, terminal
/// latches, and a per-instance RNG driving the spawn policy.
///
/// A won game keeps accepting moves; only the `Over` latch rejects them.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    grid: Grid,
    previous_grid: Option<Grid>,
    merged_values: Vec<u32>,
    score: u64,
    move_count: u64,
    best_score: u64,
    won: bool,
    game_over: bool,
    rng: StdRng,
}

impl Game {
    /// A fresh game seeded from OS entropy.
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// A fresh game with a deterministic spawn sequence. Two games built
    /// from the same seed and fed the same moves stay identical.
    pub fn from_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let mut game = Game {
            grid: Grid::new(config.size),
            config,
            previous_grid: None,
            merged_values: Vec::new(),
            score: 0,
            move_count: 0,
            best_score: 0,
            won: false,
            game_over: false,
            rng,
        };
        game.spawn_tile();
        game.spawn_tile();
        info!("game initialized on a {0}x{0} grid", game.config.size);
        game
    }

    /// Rebuild an engine from persisted state. The terminal latches are
    /// re-derived from the grid contents; the RNG is seeded from entropy.
    pub fn restore(
        config: GameConfig,
        grid: Grid,
        score: u64,
        move_count: u64,
        best_score: u64,
    ) -> Self {
        Self::restore_with_rng(config, grid, score, move_count, best_score, StdRng::from_entropy())
    }

    /// Like [`Game::restore`] but with a deterministic spawn sequence.
    pub fn restore_seeded(
        config: GameConfig,
        grid: Grid,
        score: u64,
        move_count: u64,
        best_score: u64,
        seed: u64,
    ) -> Self {
        Self::restore_with_rng(
            config,
            grid,
            score,
            move_count,
            best_score,
            StdRng::seed_from_u64(seed),
        )
    }

    fn restore_with_rng(
        config: GameConfig,
        grid: Grid,
        score: u64,
        move_count: u64,
        best_score: u64,
        rng: StdRng,
    ) -> Self {
        let won = grid.contains(config.winning_tile);
        let game_over = grid.is_game_over();
        Game {
            config,
            grid,
            previous_grid: None,
            merged_values: Vec::new(),
            score,
            move_count,
            best_score,
            won,
            game_over,
            rng,
        }
    }

    /// Apply a move. Returns true iff the grid changed.
    ///
    /// The pre-move grid is snapshotted into `previous_grid` on every
    /// attempt, success or not. A changing move commits the resolved
    /// grid, bumps the score and move counter, spawns one tile, and
    /// re-evaluates the terminal latches. A rejected or no-op move has
    /// no other side effects.
    pub fn make_move(&mut self, direction: Move) -> bool {
        if self.game_over {
            debug!("move {direction} rejected: game is over");
            return false;
        }

        self.previous_grid = Some(self.grid.clone());
        self.merged_values.clear();

        let outcome = shift(&self.grid, direction);
        if !outcome.changed {
            return false;
        }

        self.grid = outcome.grid;
        self.merged_values = outcome.merged;
        self.score += outcome.score_delta;
        self.move_count += 1;
        self.spawn_tile();

        if !self.won && self.grid.contains(self.config.winning_tile) {
            self.won = true;
            info!(
                "reached the {} tile after {} moves",
                self.config.winning_tile, self.move_count
            );
        }
        if self.grid.is_game_over() {
            self.game_over = true;
            info!("no moves remain; final score {}", self.score);
        }
        true
    }

    /// Entry point for untyped direction tokens (key handlers, scripts).
    /// Unrecognized tokens are logged and treated as a no-op.
    pub fn make_move_token(&mut self, token: &str) -> bool {
        match token.parse::<Move>() {
            Ok(direction) => self.make_move(direction),
            Err(err) => {
                warn!("{err}");
                false
            }
        }
    }

    /// Place one new tile (2 or 4) in a uniformly random empty cell.
    ///
    /// A changing move always frees at least one cell before the spawn
    /// runs, so the no-empty-cell branch is defensive only.
    fn spawn_tile(&mut self) {
        let empty = self.grid.empty_cells();
        if empty.is_empty() {
            warn!("no empty cell available for spawn");
            return;
        }
        let (row, col) = empty[self.rng.gen_range(0..empty.len())];
        let value = if self.rng.gen_bool(self.config.spawn_probability) {
            2
        } else {
            4
        };
        self.grid.set(row, col, value);
        debug!("spawned {value} at ({row}, {col})");
    }

    /// Whether resolving `direction` would change the grid. Pure: no
    /// spawn, no RNG, no score, no mutation.
    pub fn can_move(&self, direction: Move) -> bool {
        shift(&self.grid, direction).changed
    }

    /// Validity of each direction in canonical order (Up, Down, Left,
    /// Right), for external callers choosing an action.
    pub fn valid_moves(&self) -> [bool; 4] {
        let mut mask = [false; 4];
        for (idx, &direction) in Move::ALL.iter().enumerate() {
            mask[idx] = self.can_move(direction);
        }
        mask
    }

    /// Environment-style step: apply the move and report the resulting
    /// state. `done` is true once the game is over or won.
    pub fn step(&mut self, direction: Move) -> StepOutcome {
        let moved = self.make_move(direction);
        StepOutcome {
            moved,
            grid: self.grid.cells().to_vec(),
            merged: self.merged_values.clone(),
            score: self.score,
            done: self.game_over || self.won,
        }
    }

    /// Start a new game: carry the best score forward, rebuild the grid
    /// with two spawned tiles, and clear the terminal latches.
    pub fn new_game(&mut self) {
        if self.score > self.best_score {
            self.best_score = self.score;
        }
        self.grid = Grid::new(self.config.size);
        self.previous_grid = None;
        self.merged_values.clear();
        self.score = 0;
        self.move_count = 0;
        self.won = false;
        self.game_over = false;
        self.spawn_tile();
        self.spawn_tile();
        info!("new game started; best score {}", self.best_score);
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Row-major grid snapshot for rendering or feature construction.
    pub fn snapshot(&self) -> Vec<u32> {
        self.grid.cells().to_vec()
    }

    /// Grid as it was before the most recently attempted move, kept for
    /// diffing. Not an undo mechanism.
    pub fn previous_grid(&self) -> Option<&Grid> {
        self.previous_grid.as_ref()
    }

    /// Merge events produced by the most recent move.
    pub fn merged_values(&self) -> &[u32] {
        &self.merged_values
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn move_count(&self) -> u64 {
        self.move_count
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
