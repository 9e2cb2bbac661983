//! twenty48-core: a deterministic 2048 game engine.
//!
//! This crate provides:
//! - A `Grid` model and the compress-and-merge move resolution (`shift`)
//! - A `Game` facade owning grid, score, and a seedable RNG, with an
//!   environment-style `step` interface for external agents
//! - A `SaveManager` that persists snapshot records as JSON
//!
//! Quick start:
//! ```
//! use twenty48_core::{Game, GameConfig, Move};
//!
//! let mut game = Game::from_seed(GameConfig::default(), 42);
//! let legal = game.valid_moves();
//! if legal[Move::Left.index()] {
//!     let outcome = game.step(Move::Left);
//!     assert!(outcome.moved);
//! }
//! ```
//!
//! All randomness flows through an RNG owned by the `Game` instance, so
//! behavior is reproducible under a fixed seed. Engines never share
//! mutable state; run many episodes by constructing independent engines.

pub mod config;
pub mod engine;
pub mod save;

pub use config::GameConfig;
pub use engine::{shift, Game, Grid, Move, ParseMoveError, ShiftOutcome, StepOutcome};
pub use save::{SaveData, SaveManager};
