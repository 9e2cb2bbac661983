//! Engine module: grid model, move resolution, and the `Game` facade.
//!
//! - `Grid` stores tile values and answers the terminal predicates.
//! - `moves` holds the compress-and-merge line resolver and `shift`.
//! - `Game` sequences move resolution, spawning, and terminal checks.

mod game;
mod grid;
mod moves;

pub use game::{Game, StepOutcome};
pub use grid::Grid;
pub use moves::{shift, Move, ParseMoveError, ShiftOutcome};
