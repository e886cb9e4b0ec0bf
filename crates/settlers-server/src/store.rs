//! Game persistence.
//!
//! Games are stored whole, keyed by game id. The engine never sees the store;
//! sessions load a game, apply a command and save it back.

use dashmap::DashMap;
use settlers_core::GameState;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt game data: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Load/save access to games by id.
pub trait GameStore: Send + Sync {
    fn load(&self, id: Uuid) -> Result<Option<GameState>, StoreError>;

    fn save(&self, id: Uuid, game: &GameState) -> Result<(), StoreError>;

    /// Returns whether a game was removed
    fn remove(&self, id: Uuid) -> Result<bool, StoreError>;

    fn ids(&self) -> Result<Vec<Uuid>, StoreError>;
}

/// Keeps games in process memory.
#[derive(Default)]
pub struct MemoryStore {
    games: DashMap<Uuid, GameState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryStore {
    fn load(&self, id: Uuid) -> Result<Option<GameState>, StoreError> {
        Ok(self.games.get(&id).map(|g| g.clone()))
    }

    fn save(&self, id: Uuid, game: &GameState) -> Result<(), StoreError> {
        self.games.insert(id, game.clone());
        Ok(())
    }

    fn remove(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.games.remove(&id).is_some())
    }

    fn ids(&self) -> Result<Vec<Uuid>, StoreError> {
        Ok(self.games.iter().map(|entry| *entry.key()).collect())
    }
}

/// Keeps one `<id>.json` file per game in a directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) a store directory
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

impl GameStore for JsonFileStore {
    fn load(&self, id: Uuid) -> Result<Option<GameState>, StoreError> {
        match fs::read_to_string(self.path_for(id)) {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, id: Uuid, game: &GameState) -> Result<(), StoreError> {
        let text = serde_json::to_string(game)?;
        // Readers only ever see a complete file
        let tmp = self.dir.join(format!("{id}.json.tmp"));
        fs::write(&tmp, text)?;
        fs::rename(&tmp, self.path_for(id))?;
        debug!(%id, "game saved");
        Ok(())
    }

    fn remove(&self, id: Uuid) -> Result<bool, StoreError> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn ids(&self) -> Result<Vec<Uuid>, StoreError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| Uuid::parse_str(s).ok())
            {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}
