use serde::{Deserialize, Serialize};

/// Tunables for the session lifecycle. The only knob today is the window
/// after which a persisted session is considered stale and discarded on
/// load instead of resumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub timeout_hours: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { timeout_hours: 24 }
    }
}

impl SessionConfig {
    pub fn timeout(&self) -> chrono::Duration {
        chrono::Duration::hours(self.timeout_hours)
    }
}
