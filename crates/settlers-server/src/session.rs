//! Game session management.
//!
//! A session owns nothing but locks: game state lives in the store. Every
//! mutation runs load, apply, save under that game's lock, so two commands on
//! one game never interleave.

use dashmap::DashMap;
use settlers_core::{BoardSnapshot, Command, CommandOutcome, GameError, GameState};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::store::{GameStore, StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Game not found: {0}")]
    UnknownGame(Uuid),

    #[error("Storage failure: {0}")]
    Store(#[from] StoreError),

    #[error("Command rejected: {0}")]
    Rejected(#[from] GameError),
}

/// Runs commands against stored games.
pub struct GameSessions {
    store: Arc<dyn GameStore>,
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl GameSessions {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    fn lock_for(&self, id: Uuid) -> Arc<Mutex<()>> {
        Arc::clone(&self.locks.entry(id).or_default())
    }

    /// Run `f` on the stored game while holding its lock, saving on success
    fn with_game<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut GameState) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let lock = self.lock_for(id);
        // The lock guards no data, so a poisoned lock is still usable
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut game = self.store.load(id)?.ok_or(SessionError::UnknownGame(id))?;
        let result = f(&mut game)?;
        self.store.save(id, &game)?;
        Ok(result)
    }

    /// A new board with every player's opening settlement and road placed
    fn fresh_game() -> Result<GameState, GameError> {
        let mut rng = rand::thread_rng();
        let mut game = GameState::with_rng(&mut rng)?;
        game.auto_place_initial_settlements(&mut rng)?;
        Ok(game)
    }

    /// Create and store a new game
    pub fn create(&self) -> Result<Uuid, SessionError> {
        let id = Uuid::new_v4();
        let game = Self::fresh_game()?;
        self.store.save(id, &game)?;
        info!(%id, "game created");
        Ok(id)
    }

    /// Current snapshot (with next actions) of a game
    pub fn state(&self, id: Uuid) -> Result<BoardSnapshot, SessionError> {
        self.store
            .load(id)?
            .map(|game| game.snapshot_with_actions())
            .ok_or(SessionError::UnknownGame(id))
    }

    /// Current player of a game
    pub fn current_player(&self, id: Uuid) -> Result<u8, SessionError> {
        self.store
            .load(id)?
            .map(|game| game.current_player)
            .ok_or(SessionError::UnknownGame(id))
    }

    /// Apply a command. Rejected commands leave the stored game untouched.
    pub fn apply(&self, id: Uuid, command: Command) -> Result<CommandOutcome, SessionError> {
        debug!(%id, ?command, "applying command");
        self.with_game(id, |game| Ok(game.apply(command)?))
    }

    /// Replace a game with a freshly generated one under the same id
    pub fn reset(&self, id: Uuid) -> Result<BoardSnapshot, SessionError> {
        let snapshot = self.with_game(id, |game| {
            *game = Self::fresh_game()?;
            Ok(game.snapshot_with_actions())
        })?;
        info!(%id, "game reset");
        Ok(snapshot)
    }

    /// Delete a game
    pub fn remove(&self, id: Uuid) -> Result<bool, SessionError> {
        let removed = self.store.remove(id)?;
        self.locks.remove(&id);
        Ok(removed)
    }

    /// Ids of all stored games
    pub fn ids(&self) -> Result<Vec<Uuid>, SessionError> {
        Ok(self.store.ids()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn sessions() -> GameSessions {
        GameSessions::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_create_places_openings() {
        let sessions = sessions();
        let id = sessions.create().unwrap();
        let state = sessions.state(id).unwrap();

        assert_eq!(state.current_player, "1");
        let owners: Vec<_> = state
            .vertex_cells
            .iter()
            .filter_map(|v| v.owner_id.clone())
            .collect();
        assert_eq!(owners.len(), 4);
        assert_eq!(state.roads.len(), 4);
        assert_eq!(sessions.ids().unwrap(), vec![id]);
    }

    #[test]
    fn test_commands_are_persisted() {
        let sessions = sessions();
        let id = sessions.create().unwrap();

        let outcome = sessions.apply(id, Command::EndTurn).unwrap();
        assert_eq!(outcome.snapshot.current_player, "2");
        assert_eq!(sessions.current_player(id).unwrap(), 2);

        let outcome = sessions.apply(id, Command::RollDice).unwrap();
        assert!(outcome.dice.is_some());
        assert_eq!(sessions.state(id).unwrap(), outcome.snapshot);
    }

    #[test]
    fn test_rejected_command_is_not_saved() {
        let sessions = sessions();
        let id = sessions.create().unwrap();
        let before = sessions.state(id).unwrap();

        let err = sessions
            .apply(
                id,
                Command::PlaceRoad {
                    from: 0,
                    to: 1,
                    player: 9,
                },
            )
            .unwrap_err();
        assert!(matches!(err, SessionError::Rejected(GameError::UnknownPlayer(9))));
        assert_eq!(sessions.state(id).unwrap(), before);
    }

    #[test]
    fn test_unknown_game() {
        let sessions = sessions();
        let id = Uuid::new_v4();
        assert!(matches!(sessions.state(id), Err(SessionError::UnknownGame(_))));
        assert!(matches!(
            sessions.apply(id, Command::EndTurn),
            Err(SessionError::UnknownGame(_))
        ));
        assert!(!sessions.remove(id).unwrap());
    }

    #[test]
    fn test_reset_keeps_id_and_restarts_turns() {
        let sessions = sessions();
        let id = sessions.create().unwrap();
        sessions.apply(id, Command::EndTurn).unwrap();

        let state = sessions.reset(id).unwrap();
        assert_eq!(state.current_player, "1");
        assert_eq!(sessions.current_player(id).unwrap(), 1);
    }
}
