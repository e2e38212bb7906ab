use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    NotStarted,
    Playing,
    Paused,
    Ended,
}

/// Why a session ended. The string forms are wire-visible and consumed by
/// the reporting backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Graduation,
    Dropout,
    SecretGraduation,
    Timeout,
    ManualQuit,
}

/// One continuous play attempt, bounded by start and end events.
///
/// Invariants: `end_time` and `end_reason` are both absent until the session
/// ends, and `is_active` holds exactly while the status is `Playing` or
/// `Paused`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub session_id: String,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub status: GameStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_reason: Option<EndReason>,
    pub is_active: bool,
}

impl GameSession {
    pub fn invariants_hold(&self) -> bool {
        let active_matches_status =
            self.is_active == matches!(self.status, GameStatus::Playing | GameStatus::Paused);
        let ended_fields_agree = self.end_time.is_some() == (self.status == GameStatus::Ended)
            && self.end_time.is_some() == self.end_reason.is_some();
        active_matches_status && ended_fields_agree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_wire_shape() {
        let session = GameSession {
            session_id: "session_1700000000000_abc123def".to_string(),
            start_time: Utc::now(),
            end_time: None,
            status: GameStatus::Playing,
            end_reason: None,
            is_active: true,
        };

        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"sessionId\""));
        assert!(json.contains("\"startTime\""));
        assert!(json.contains("\"status\":\"playing\""));
        assert!(json.contains("\"isActive\":true"));
        assert!(!json.contains("endTime"));
        assert!(!json.contains("endReason"));
    }

    #[test]
    fn test_end_reason_wire_values() {
        for (reason, wire) in [
            (EndReason::Graduation, "\"graduation\""),
            (EndReason::Dropout, "\"dropout\""),
            (EndReason::SecretGraduation, "\"secret_graduation\""),
            (EndReason::Timeout, "\"timeout\""),
            (EndReason::ManualQuit, "\"manual_quit\""),
        ] {
            assert_eq!(serde_json::to_string(&reason).unwrap(), wire);
        }
    }

    #[test]
    fn test_invariants_hold_on_ended_session() {
        let now = Utc::now();
        let session = GameSession {
            session_id: "session_1_x".to_string(),
            start_time: now,
            end_time: Some(now),
            status: GameStatus::Ended,
            end_reason: Some(EndReason::Dropout),
            is_active: false,
        };
        assert!(session.invariants_hold());
    }

    #[test]
    fn test_invariants_reject_half_ended_session() {
        let now = Utc::now();
        let session = GameSession {
            session_id: "session_1_x".to_string(),
            start_time: now,
            end_time: Some(now),
            status: GameStatus::Ended,
            end_reason: None,
            is_active: false,
        };
        assert!(!session.invariants_hold());
    }
}
