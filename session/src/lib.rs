pub mod config;
pub mod manager;

pub use config::SessionConfig;
pub use manager::{SessionManager, SessionStats, SESSION_KEY};
