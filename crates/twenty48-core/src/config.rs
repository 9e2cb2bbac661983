use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Construction-time engine configuration.
///
/// The engine never reads process-wide state; everything tunable
/// arrives through this value at construction.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct GameConfig {
    /// Grid side length (the board is `size` x `size`).
    #[serde(default = "defaults::size")]
    pub size: usize,
    /// Probability that a spawned tile is a 2; the rest are 4s.
    #[serde(default = "defaults::spawn_probability")]
    pub spawn_probability: f64,
    /// Tile value that latches the won state.
    #[serde(default = "defaults::winning_tile")]
    pub winning_tile: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            size: defaults::size(),
            spawn_probability: defaults::spawn_probability(),
            winning_tile: defaults::winning_tile(),
        }
    }
}

impl GameConfig {
    /// Load a configuration from a TOML file; missing keys fall back to
    /// their defaults.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }
}

mod defaults {
    pub fn size() -> usize {
        4
    }
    pub fn spawn_probability() -> f64 {
        0.8
    }
    pub fn winning_tile() -> u32 {
        2048
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_classic_game() {
        let config = GameConfig::default();
        assert_eq!(config.size, 4);
        assert_eq!(config.spawn_probability, 0.8);
        assert_eq!(config.winning_tile, 2048);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: GameConfig = toml::from_str("size = 5").unwrap();
        assert_eq!(config.size, 5);
        assert_eq!(config.spawn_probability, 0.8);
        assert_eq!(config.winning_tile, 2048);
    }

    #[test]
    fn it_loads_from_a_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "spawn_probability = 0.9\nwinning_tile = 1024").unwrap();

        let config = GameConfig::from_toml(&path).unwrap();
        assert_eq!(config.size, 4);
        assert_eq!(config.spawn_probability, 0.9);
        assert_eq!(config.winning_tile, 1024);

        assert!(GameConfig::from_toml(dir.path().join("missing.toml")).is_err());
    }
}
