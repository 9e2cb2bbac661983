use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::grid::Grid;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Canonical ordering used by `Game::valid_moves` and external callers.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Position of this direction within [`Move::ALL`].
    pub fn index(self) -> usize {
        match self {
            Move::Up => 0,
            Move::Down => 1,
            Move::Left => 2,
            Move::Right => 3,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(name)
    }
}

/// Error returned when a direction token is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMoveError(String);

impl fmt::Display for ParseMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized direction token '{}'", self.0)
    }
}

impl std::error::Error for ParseMoveError {}

impl FromStr for Move {
    type Err = ParseMoveError;

    /// Case-insensitive parsing of direction names plus the WASD keys
    /// used by the interaction layer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "w" => Ok(Move::Up),
            "down" | "s" => Ok(Move::Down),
            "left" | "a" => Ok(Move::Left),
            "right" | "d" => Ok(Move::Right),
            _ => Err(ParseMoveError(s.to_string())),
        }
    }
}

/// Result of resolving a move against a grid: the slid/merged grid
/// before any random spawn, plus the merge events it produced.
#[derive(Debug, Clone)]
pub struct ShiftOutcome {
    pub grid: Grid,
    /// True when the resolved grid differs from the input grid.
    pub changed: bool,
    /// One entry per merge event, in scan order (per line, lines in
    /// row/column order).
    pub merged: Vec<u32>,
    /// Sum of `merged`; the score contribution of this move.
    pub score_delta: u64,
}

/// Slide/merge tiles in the given direction. No randomness, no spawn,
/// no mutation of the input grid.
pub fn shift(grid: &Grid, direction: Move) -> ShiftOutcome {
    let size = grid.size();
    let mut next = grid.clone();
    let mut merged = Vec::new();
    let mut score_delta = 0u64;

    for idx in 0..size {
        let line: Vec<u32> = match direction {
            Move::Left | Move::Right => grid.row(idx).to_vec(),
            Move::Up | Move::Down => grid.column(idx),
        };
        let resolved = match direction {
            Move::Left | Move::Up => resolve_line(&line, &mut merged, &mut score_delta),
            Move::Right | Move::Down => resolve_reversed(&line, &mut merged, &mut score_delta),
        };
        match direction {
            Move::Left | Move::Right => {
                for (col, &value) in resolved.iter().enumerate() {
                    next.set(idx, col, value);
                }
            }
            Move::Up | Move::Down => {
                for (row, &value) in resolved.iter().enumerate() {
                    next.set(row, idx, value);
                }
            }
        }
    }

    let changed = next != *grid;
    ShiftOutcome {
        grid: next,
        changed,
        merged,
        score_delta,
    }
}

/// Compress-and-merge one line oriented so the move goes toward index 0.
///
/// Zeros are dropped first, then a single left-to-right scan merges each
/// equal pair into one doubled cell. A merged cell is never re-examined,
/// so a tile merges at most once per move. The result is padded back to
/// the input length with trailing zeros.
fn resolve_line(line: &[u32], merged: &mut Vec<u32>, score_delta: &mut u64) -> Vec<u32> {
    let compressed: Vec<u32> = line.iter().copied().filter(|&v| v != 0).collect();
    let mut out = Vec::with_capacity(line.len());
    let mut idx = 0;
    while idx < compressed.len() {
        if idx + 1 < compressed.len() && compressed[idx] == compressed[idx + 1] {
            let value = compressed[idx] * 2;
            merged.push(value);
            *score_delta += u64::from(value);
            out.push(value);
            idx += 2;
        } else {
            out.push(compressed[idx]);
            idx += 1;
        }
    }
    out.resize(line.len(), 0);
    out
}

/// Reversal trick for Right/Down: resolve the mirrored line, then
/// mirror the result back.
fn resolve_reversed(line: &[u32], merged: &mut Vec<u32>, score_delta: &mut u64) -> Vec<u32> {
    let reversed: Vec<u32> = line.iter().rev().copied().collect();
    let mut out = resolve_line(&reversed, merged, score_delta);
    out.reverse();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(line: &[u32]) -> (Vec<u32>, Vec<u32>, u64) {
        let mut merged = Vec::new();
        let mut delta = 0;
        let out = resolve_line(line, &mut merged, &mut delta);
        (out, merged, delta)
    }

    #[test]
    fn it_resolves_merge_pairs_once_per_pass() {
        assert_eq!(resolve(&[2, 2, 2, 2]), (vec![4, 4, 0, 0], vec![4, 4], 8));
        assert_eq!(resolve(&[2, 2, 4, 4]), (vec![4, 8, 0, 0], vec![4, 8], 12));
        assert_eq!(resolve(&[2, 0, 2, 0]), (vec![4, 0, 0, 0], vec![4], 4));
        // A freshly merged 4 must not merge again with the trailing 2+2.
        assert_eq!(resolve(&[4, 4, 4, 0]), (vec![8, 4, 0, 0], vec![8], 8));
    }

    #[test]
    fn it_is_idempotent_on_non_mergeable_lines() {
        assert_eq!(resolve(&[4, 8, 16, 0]), (vec![4, 8, 16, 0], vec![], 0));
        assert_eq!(resolve(&[0, 0, 0, 0]), (vec![0, 0, 0, 0], vec![], 0));
        assert_eq!(resolve(&[2]), (vec![2], vec![], 0));
        assert_eq!(resolve(&[]), (vec![], vec![], 0));
    }

    #[test]
    fn it_handles_longer_lines() {
        assert_eq!(
            resolve(&[2, 2, 2, 4, 4]),
            (vec![4, 2, 8, 0, 0], vec![4, 8], 12)
        );
    }

    #[test]
    fn it_shifts_left_and_right() {
        let grid = Grid::from_rows(&[
            [2, 2, 0, 0],
            [0, 4, 0, 4],
            [2, 4, 2, 4],
            [0, 0, 0, 0],
        ]);

        let left = shift(&grid, Move::Left);
        assert!(left.changed);
        assert_eq!(left.grid.row(0), &[4, 0, 0, 0]);
        assert_eq!(left.grid.row(1), &[8, 0, 0, 0]);
        assert_eq!(left.grid.row(2), &[2, 4, 2, 4]);
        assert_eq!(left.merged, vec![4, 8]);
        assert_eq!(left.score_delta, 12);

        let right = shift(&grid, Move::Right);
        assert!(right.changed);
        assert_eq!(right.grid.row(0), &[0, 0, 0, 4]);
        assert_eq!(right.grid.row(1), &[0, 0, 0, 8]);
        assert_eq!(right.grid.row(2), &[2, 4, 2, 4]);
    }

    #[test]
    fn it_shifts_up_and_down() {
        let grid = Grid::from_rows(&[
            [2, 0, 2, 0],
            [2, 4, 0, 0],
            [4, 4, 0, 0],
            [0, 0, 2, 0],
        ]);

        let up = shift(&grid, Move::Up);
        assert!(up.changed);
        assert_eq!(up.grid.column(0), vec![4, 4, 0, 0]);
        assert_eq!(up.grid.column(1), vec![8, 0, 0, 0]);
        assert_eq!(up.grid.column(2), vec![4, 0, 0, 0]);
        assert_eq!(up.merged, vec![4, 8, 4]);
        assert_eq!(up.score_delta, 16);

        let down = shift(&grid, Move::Down);
        assert!(down.changed);
        assert_eq!(down.grid.column(0), vec![0, 0, 4, 4]);
        assert_eq!(down.grid.column(1), vec![0, 0, 0, 8]);
        assert_eq!(down.grid.column(2), vec![0, 0, 0, 4]);
    }

    #[test]
    fn it_reports_unchanged_grids() {
        let grid = Grid::from_rows(&[
            [2, 4, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let outcome = shift(&grid, Move::Left);
        assert!(!outcome.changed);
        assert!(outcome.merged.is_empty());
        assert_eq!(outcome.score_delta, 0);
        assert_eq!(outcome.grid, grid);
    }

    #[test]
    fn it_parses_direction_tokens() {
        assert_eq!("up".parse::<Move>(), Ok(Move::Up));
        assert_eq!("LEFT".parse::<Move>(), Ok(Move::Left));
        assert_eq!("W".parse::<Move>(), Ok(Move::Up));
        assert_eq!("d".parse::<Move>(), Ok(Move::Right));
        assert!("diagonal".parse::<Move>().is_err());
        assert!("".parse::<Move>().is_err());
    }

    #[test]
    fn canonical_order_is_up_down_left_right() {
        for (idx, &dir) in Move::ALL.iter().enumerate() {
            assert_eq!(dir.index(), idx);
        }
    }
}
