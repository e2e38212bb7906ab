pub mod fingerprint;
pub mod outcome;
pub mod session;

pub use fingerprint::DeviceFingerprint;
pub use outcome::GameOutcome;
pub use session::{EndReason, GameSession, GameStatus};
