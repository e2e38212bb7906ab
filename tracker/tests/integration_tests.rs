use std::cell::RefCell;
use std::rc::Rc;

use identity::{IdentityManager, StaticProbe};
use session::{SessionManager, SESSION_KEY};
use storage::{KeyValueStore, MemoryStore, StorageError};
use types::{DeviceFingerprint, EndReason, GameOutcome, GameStatus};

/// MemoryStore handle that survives the manager owning it, standing in for
/// storage that outlives a page reload.
#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<MemoryStore>>);

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0.borrow_mut().set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.0.borrow_mut().remove(key)
    }
}

fn fingerprint() -> DeviceFingerprint {
    DeviceFingerprint {
        screen: "1366x768".to_string(),
        timezone: "Asia/Shanghai".to_string(),
        language: "zh-CN".to_string(),
        platform: "linux-x86_64".to_string(),
        user_agent: "integration-agent/1.0".to_string(),
        color_depth: 24,
        pixel_ratio: 1.5,
        hardware_concurrency: 4,
        max_touch_points: 5,
    }
}

#[test]
fn test_full_attribution_flow() {
    let mut identity = IdentityManager::new(
        Box::new(MemoryStore::new()),
        Box::new(StaticProbe::new(fingerprint())),
    );
    let mut sessions = SessionManager::new(Box::new(MemoryStore::new()));

    let player_id = identity.get_identity().unwrap();
    assert!(player_id.starts_with("player_"));

    let session = sessions.start_game().unwrap();
    sessions.pause_game().unwrap();
    sessions.resume_game().unwrap();

    let outcome = GameOutcome {
        is_winner: true,
        slack_off_count: 12,
    };
    let ended = sessions.end_game(outcome.end_reason()).unwrap().unwrap();

    assert_eq!(ended.session_id, session.session_id);
    assert_eq!(ended.end_reason, Some(EndReason::SecretGraduation));
    assert_eq!(ended.status, GameStatus::Ended);
    assert!(sessions.game_duration() >= 0);

    let info = identity.identity_info().unwrap();
    assert_eq!(info.id, player_id);
    assert!(!info.is_new_player);
}

#[test]
fn test_identity_and_session_survive_a_reload() {
    let identity_store = SharedStore::default();
    let session_store = SharedStore::default();

    let first_id;
    let first_session_id;
    {
        let mut identity = IdentityManager::new(
            Box::new(identity_store.clone()),
            Box::new(StaticProbe::new(fingerprint())),
        );
        let mut sessions = SessionManager::new(Box::new(session_store.clone()));
        first_id = identity.get_identity().unwrap();
        first_session_id = sessions.start_game().unwrap().session_id;
        sessions.pause_game().unwrap();
    }

    // Fresh managers over the same stores, as after a page reload.
    let mut identity = IdentityManager::new(
        Box::new(identity_store),
        Box::new(StaticProbe::new(fingerprint())),
    );
    let sessions = SessionManager::new(Box::new(session_store));

    assert_eq!(identity.get_identity().unwrap(), first_id);
    let recovered = sessions.current_session().unwrap();
    assert_eq!(recovered.session_id, first_session_id);
    assert_eq!(recovered.status, GameStatus::Paused);
    assert!(recovered.is_active);
}

#[test]
fn test_reload_after_graduation_keeps_the_ended_session() {
    let session_store = SharedStore::default();

    {
        let mut sessions = SessionManager::new(Box::new(session_store.clone()));
        sessions.start_game().unwrap();
        let outcome = GameOutcome {
            is_winner: true,
            slack_off_count: 3,
        };
        sessions.end_game(outcome.end_reason()).unwrap().unwrap();
    }

    let mut sessions = SessionManager::new(Box::new(session_store));
    let recovered = sessions.current_session().unwrap();
    assert_eq!(recovered.end_reason, Some(EndReason::Graduation));
    assert!(!recovered.is_active);
    assert!(sessions.end_game(EndReason::Dropout).unwrap().is_none());
}

#[test]
fn test_stale_persisted_session_is_not_resumed() {
    let mut session_store = SharedStore::default();

    let stale = types::GameSession {
        session_id: "session_0_abcdefghi".to_string(),
        start_time: chrono::Utc::now() - chrono::Duration::hours(30),
        end_time: None,
        status: GameStatus::Playing,
        end_reason: None,
        is_active: true,
    };
    session_store
        .set(SESSION_KEY, &serde_json::to_string(&stale).unwrap())
        .unwrap();

    let sessions = SessionManager::new(Box::new(session_store.clone()));
    assert!(sessions.current_session().is_none());
    assert_eq!(session_store.get(SESSION_KEY).unwrap(), None);
}

#[test]
fn test_identity_reset_is_invisible_on_an_unchanged_device() {
    let store = SharedStore::default();
    let mut identity = IdentityManager::new(
        Box::new(store),
        Box::new(StaticProbe::new(fingerprint())),
    );

    let before = identity.get_identity().unwrap();
    identity.reset_identity().unwrap();
    let after = identity.get_identity().unwrap();
    assert_eq!(before, after);
}
