use serde::{Deserialize, Serialize};

use crate::session::EndReason;

/// Winning while slacking off at least this often counts as a secret
/// graduation.
pub const SLACK_OFF_GRADUATION_THRESHOLD: u32 = 10;

/// Final outcome flags produced by the gameplay engine, used to classify
/// why a session ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GameOutcome {
    pub is_winner: bool,
    pub slack_off_count: u32,
}

impl GameOutcome {
    /// Classifies the outcome into a reportable end reason. `Timeout` and
    /// `ManualQuit` never come out of here; those are reserved for the
    /// stale-session discard and forced-restart paths.
    pub fn end_reason(&self) -> EndReason {
        if self.is_winner {
            if self.slack_off_count >= SLACK_OFF_GRADUATION_THRESHOLD {
                EndReason::SecretGraduation
            } else {
                EndReason::Graduation
            }
        } else {
            EndReason::Dropout
        }
    }
}
