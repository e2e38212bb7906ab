use chrono::Utc;
use rand::Rng;
use serde::Serialize;

use storage::{KeyValueStore, StorageError};
use types::{EndReason, GameSession, GameStatus};

use crate::config::SessionConfig;

pub const SESSION_KEY: &str = "current_session";

/// Per-process rollup over the current session, for diagnostics and the
/// reporting layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total_sessions: u32,
    pub total_play_time_ms: i64,
    pub average_session_time_ms: i64,
    pub completion_rate: f64,
}

/// Tracks at most one current play session through
/// `NOT_STARTED → PLAYING ⇄ PAUSED → ENDED`.
///
/// Every mutation persists before returning, so a crash right after a call
/// sees the post-mutation state on the next load. Construction reconciles
/// with storage: an unreadable or stale record is discarded, anything else
/// resumes with its playing/paused status intact.
pub struct SessionManager {
    store: Box<dyn KeyValueStore>,
    current: Option<GameSession>,
    timeout: chrono::Duration,
}

impl SessionManager {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_config(store, SessionConfig::default())
    }

    pub fn with_config(store: Box<dyn KeyValueStore>, config: SessionConfig) -> Self {
        let mut manager = Self {
            store,
            current: None,
            timeout: config.timeout(),
        };
        manager.load();
        manager
    }

    /// Starts a new session. A still-active prior session is force-closed
    /// with `manual_quit` first.
    pub fn start_game(&mut self) -> Result<GameSession, StorageError> {
        if let Some(prev) = self.end_game(EndReason::ManualQuit)? {
            log::info!("Force-closed previous session {}", prev.session_id);
        }

        let session = GameSession {
            session_id: generate_session_id(),
            start_time: Utc::now(),
            end_time: None,
            status: GameStatus::Playing,
            end_reason: None,
            is_active: true,
        };
        self.current = Some(session.clone());
        self.persist()?;
        log::info!("Game started: {}", session.session_id);
        Ok(session)
    }

    /// PLAYING → PAUSED. No-op without an active session.
    pub fn pause_game(&mut self) -> Result<(), StorageError> {
        if let Some(session) = self.current.as_mut().filter(|s| s.is_active) {
            session.status = GameStatus::Paused;
            self.persist()?;
            log::info!("Game paused");
        }
        Ok(())
    }

    /// PAUSED → PLAYING. No-op unless currently paused.
    pub fn resume_game(&mut self) -> Result<(), StorageError> {
        if let Some(session) = self
            .current
            .as_mut()
            .filter(|s| s.status == GameStatus::Paused)
        {
            session.status = GameStatus::Playing;
            self.persist()?;
            log::info!("Game resumed");
        }
        Ok(())
    }

    /// Closes the active session and returns it, or `None` when there was
    /// nothing active to close.
    pub fn end_game(&mut self, reason: EndReason) -> Result<Option<GameSession>, StorageError> {
        let Some(session) = self.current.as_mut().filter(|s| s.is_active) else {
            log::debug!("No active session to end");
            return Ok(None);
        };

        session.end_time = Some(Utc::now());
        session.status = GameStatus::Ended;
        session.end_reason = Some(reason);
        session.is_active = false;
        let ended = session.clone();

        self.persist()?;
        log::info!("Game ended ({reason:?}): {}", ended.session_id);
        Ok(Some(ended))
    }

    pub fn current_session(&self) -> Option<&GameSession> {
        self.current.as_ref()
    }

    pub fn is_game_active(&self) -> bool {
        self.current.as_ref().is_some_and(|s| s.is_active)
    }

    pub fn is_game_paused(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|s| s.status == GameStatus::Paused)
    }

    /// Elapsed milliseconds: `(end_time ?? now) - start_time`, 0 without a
    /// session.
    pub fn game_duration(&self) -> i64 {
        let Some(session) = &self.current else {
            return 0;
        };
        let end = session.end_time.unwrap_or_else(Utc::now);
        (end - session.start_time).num_milliseconds()
    }

    pub fn is_session_timeout(&self) -> bool {
        self.current.as_ref().is_some_and(|s| self.expired(s))
    }

    /// Unconditionally discards the current session, in memory and in
    /// storage.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.current = None;
        self.store.remove(SESSION_KEY)?;
        log::info!("Session state reset");
        Ok(())
    }

    pub fn stats(&self) -> SessionStats {
        let duration = self.game_duration();
        let completed = self
            .current
            .as_ref()
            .is_some_and(|s| s.end_reason.is_some());
        SessionStats {
            total_sessions: self.current.is_some() as u32,
            total_play_time_ms: duration,
            average_session_time_ms: duration,
            completion_rate: if completed { 100.0 } else { 0.0 },
        }
    }

    fn load(&mut self) {
        let stored = match self.store.get(SESSION_KEY) {
            Ok(Some(stored)) => stored,
            Ok(None) => return,
            Err(e) => {
                log::warn!("Failed to read stored session: {e}");
                self.discard();
                return;
            }
        };

        let session: GameSession = match serde_json::from_str(&stored) {
            Ok(session) => session,
            Err(e) => {
                log::warn!("Discarding unreadable stored session: {e}");
                self.discard();
                return;
            }
        };

        if self.expired(&session) {
            log::info!("Stored session {} timed out, discarding", session.session_id);
            self.discard();
            return;
        }

        log::info!(
            "Recovered session {} ({:?})",
            session.session_id,
            session.status
        );
        self.current = Some(session);
    }

    fn discard(&mut self) {
        self.current = None;
        if let Err(e) = self.store.remove(SESSION_KEY) {
            log::warn!("Failed to clear stored session: {e}");
        }
    }

    fn expired(&self, session: &GameSession) -> bool {
        Utc::now() - session.start_time > self.timeout
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        if let Some(session) = &self.current {
            let serialized = serde_json::to_string(session)?;
            self.store.set(SESSION_KEY, &serialized)?;
        }
        Ok(())
    }
}

/// Timestamp plus a random base-36 suffix, so two sessions created in the
/// same millisecond still get distinct ids.
fn generate_session_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("session_{}_{suffix}", Utc::now().timestamp_millis())
}
