//! Persistence collaborator: snapshot records saved as JSON files.
//!
//! Save and load failures never cross this boundary as panics or
//! errors; they are logged and surfaced as `false`/`None` so a caller
//! can always keep running.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::engine::{Game, Grid};

/// Snapshot record persisted for a single game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub size: usize,
    /// Row-major cell dump; 0 marks an empty cell.
    pub cells: Vec<u32>,
    pub score: u64,
    pub move_count: u64,
    pub best_score: u64,
}

impl SaveData {
    pub fn from_game(game: &Game) -> Self {
        SaveData {
            size: game.grid().size(),
            cells: game.snapshot(),
            score: game.score(),
            move_count: game.move_count(),
            best_score: game.best_score(),
        }
    }

    /// Reconstruct an engine from this record. The record's grid size
    /// wins over `config.size`; spawn probability and winning tile come
    /// from the config. Returns `None` when the cell dump is malformed.
    pub fn into_game(self, config: GameConfig) -> Option<Game> {
        let grid = Grid::from_cells(self.size, self.cells)?;
        let config = GameConfig {
            size: self.size,
            ..config
        };
        Some(Game::restore(
            config,
            grid,
            self.score,
            self.move_count,
            self.best_score,
        ))
    }
}

/// Manages a directory of JSON save files.
pub struct SaveManager {
    save_dir: PathBuf,
}

impl SaveManager {
    /// Open (creating if needed) a save directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let save_dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&save_dir)
            .with_context(|| format!("failed to create save dir {}", save_dir.display()))?;
        Ok(SaveManager { save_dir })
    }

    /// Persist a snapshot record under `name`. Returns false (after
    /// logging) on any I/O or serialization failure.
    pub fn save(&self, name: &str, data: &SaveData) -> bool {
        let path = self.save_dir.join(name);
        match self.try_save(&path, data) {
            Ok(()) => {
                info!("game saved to {}", path.display());
                true
            }
            Err(err) => {
                error!("failed to save game to {}: {err:#}", path.display());
                false
            }
        }
    }

    fn try_save(&self, path: &Path, data: &SaveData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Load a snapshot record by name. Returns `None` (after logging)
    /// when the file is missing, unreadable, or malformed.
    pub fn load(&self, name: &str) -> Option<SaveData> {
        let path = self.save_dir.join(name);
        if !path.exists() {
            warn!("save file not found: {}", path.display());
            return None;
        }
        match self.try_load(&path) {
            Ok(data) => {
                info!("game loaded from {}", path.display());
                Some(data)
            }
            Err(err) => {
                error!("failed to load game from {}: {err:#}", path.display());
                None
            }
        }
    }

    fn try_load(&self, path: &Path) -> Result<SaveData> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let data: SaveData = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(data)
    }

    /// Names of all `.json` save files in the directory, sorted.
    pub fn list(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.save_dir) {
            Ok(entries) => entries,
            Err(err) => {
                error!("failed to list {}: {err}", self.save_dir.display());
                return Vec::new();
            }
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(".json"))
            .collect();
        names.sort();
        names
    }

    /// Delete a save file by name. Returns false (after logging) when
    /// the file cannot be removed.
    pub fn delete(&self, name: &str) -> bool {
        let path = self.save_dir.join(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("save file deleted: {}", path.display());
                true
            }
            Err(err) => {
                error!("failed to delete {}: {err}", path.display());
                false
            }
        }
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_game() -> Game {
        Game::restore_seeded(
            GameConfig::default(),
            Grid::from_rows(&[
                [2, 4, 0, 0],
                [0, 8, 0, 0],
                [0, 0, 16, 0],
                [0, 0, 0, 32],
            ]),
            60,
            9,
            500,
            1,
        )
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let manager = SaveManager::new(dir.path().join("saves")).unwrap();

        let game = sample_game();
        let data = SaveData::from_game(&game);
        assert!(manager.save("autosave.json", &data));

        let loaded = manager.load("autosave.json").expect("record loads back");
        assert_eq!(loaded, data);

        let restored = loaded.into_game(GameConfig::default()).expect("valid record");
        assert_eq!(restored.grid(), game.grid());
        assert_eq!(restored.score(), 60);
        assert_eq!(restored.move_count(), 9);
        assert_eq!(restored.best_score(), 500);
        assert!(!restored.is_game_over());
        assert!(!restored.is_won());
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let manager = SaveManager::new(dir.path()).unwrap();
        assert!(manager.load("nope.json").is_none());
    }

    #[test]
    fn malformed_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let manager = SaveManager::new(dir.path()).unwrap();
        fs::write(dir.path().join("bad.json"), "not json at all").unwrap();
        assert!(manager.load("bad.json").is_none());
    }

    #[test]
    fn malformed_record_does_not_build_a_game() {
        let data = SaveData {
            size: 4,
            cells: vec![0; 15],
            score: 0,
            move_count: 0,
            best_score: 0,
        };
        assert!(data.into_game(GameConfig::default()).is_none());
    }

    #[test]
    fn it_lists_and_deletes_saves() {
        let dir = tempdir().unwrap();
        let manager = SaveManager::new(dir.path()).unwrap();
        let data = SaveData::from_game(&sample_game());
        assert!(manager.save("b.json", &data));
        assert!(manager.save("a.json", &data));
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(manager.list(), vec!["a.json".to_string(), "b.json".to_string()]);
        assert!(manager.delete("a.json"));
        assert!(!manager.delete("a.json"));
        assert_eq!(manager.list(), vec!["b.json".to_string()]);
    }

    #[test]
    fn loaded_terminal_grid_restores_the_over_latch() {
        let data = SaveData {
            size: 2,
            cells: vec![2, 4, 8, 16],
            score: 20,
            move_count: 3,
            best_score: 20,
        };
        let game = data.into_game(GameConfig::default()).unwrap();
        assert!(game.is_game_over());
        assert_eq!(game.valid_moves(), [false; 4]);
    }
}
