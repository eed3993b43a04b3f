use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard,
};

use rand::Rng;

use game_core::{AssetKind, GameConfig};
use session::GameSession;

use crate::rankings::RankingStore;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CreateSessionError {
    SessionIdOverflow,
}

/// Shared server state: the live session registry and the ranking store.
#[derive(Clone)]
pub struct AppState {
    sessions: Arc<Mutex<HashMap<u64, GameSession>>>,
    next_session_id: Arc<AtomicU64>,
    rankings: RankingStore,
    game_config: GameConfig,
    base_seed: Option<u64>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_store(RankingStore::in_memory())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(rankings: RankingStore) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            next_session_id: Arc::new(AtomicU64::new(0)),
            rankings,
            game_config: GameConfig::default(),
            base_seed: None,
        }
    }

    /// Derives each session's RNG seed from `seed + session_id` instead of
    /// entropy; used for reproducible runs.
    pub fn with_base_seed(mut self, seed: u64) -> Self {
        self.base_seed = Some(seed);
        self
    }

    pub fn rankings(&self) -> &RankingStore {
        &self.rankings
    }

    /// Creates and starts a session. Must be called within a tokio runtime,
    /// since starting spawns the session's timer tasks.
    pub fn create_session(
        &self,
        asset: AssetKind,
    ) -> Result<(u64, GameSession), CreateSessionError> {
        let previous = self
            .next_session_id
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                current.checked_add(1)
            })
            .map_err(|_| CreateSessionError::SessionIdOverflow)?;
        let session_id = previous + 1;

        let seed = match self.base_seed {
            Some(base) => base.wrapping_add(session_id),
            None => rand::rng().random(),
        };
        let session = GameSession::new(asset, self.game_config, seed);
        session.start();

        self.lock_sessions().insert(session_id, session.clone());
        Ok((session_id, session))
    }

    pub fn session(&self, session_id: u64) -> Option<GameSession> {
        self.lock_sessions().get(&session_id).cloned()
    }

    pub fn remove_session(&self, session_id: u64) -> Option<GameSession> {
        self.lock_sessions().remove(&session_id)
    }

    fn lock_sessions(&self) -> MutexGuard<'_, HashMap<u64, GameSession>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
