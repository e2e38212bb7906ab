use std::path::{Path, PathBuf};

use clap::Parser;

use identity::{HostProbe, IdentityManager};
use session::{SessionConfig, SessionManager};
use storage::FileStore;
use types::GameOutcome;

#[derive(Parser, Debug)]
struct Params {
    /// Directory holding the tracking store files.
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Optional YAML file with a `timeout_hours` override.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Record the run as a win.
    #[arg(long)]
    winner: bool,

    /// How often the player slacked off during the run.
    #[arg(long, default_value_t = 0)]
    slack_off_count: u32,

    /// Pause and resume once before ending.
    #[arg(long)]
    pause: bool,
}

fn load_config(path: Option<&Path>) -> SessionConfig {
    let Some(path) = path else {
        return SessionConfig::default();
    };
    match std::fs::read_to_string(path).map_err(|e| e.to_string()).and_then(|contents| {
        serde_yaml::from_str(&contents).map_err(|e| e.to_string())
    }) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring unreadable config {}: {e}", path.display());
            SessionConfig::default()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Params::parse();
    log::info!("args: {args:?}");

    let config = load_config(args.config.as_deref());
    let identity_store = FileStore::open(args.data_dir.join("identity.json"))?;
    let session_store = FileStore::open(args.data_dir.join("session.json"))?;

    let mut identity = IdentityManager::new(Box::new(identity_store), Box::new(HostProbe::new()));
    let mut sessions = SessionManager::with_config(Box::new(session_store), config);

    let player_id = identity.get_identity()?;
    let session = sessions.start_game()?;
    log::info!("Tracking session {} for {player_id}", session.session_id);

    if args.pause {
        sessions.pause_game()?;
        sessions.resume_game()?;
    }

    let outcome = GameOutcome {
        is_winner: args.winner,
        slack_off_count: args.slack_off_count,
    };
    let reason = outcome.end_reason();

    if let Some(ended) = sessions.end_game(reason)? {
        let record = serde_json::json!({
            "player_id": player_id,
            "session_id": ended.session_id,
            "game_duration": sessions.game_duration(),
            "end_reason": reason,
            "is_winner": outcome.is_winner,
            "slack_off_count": outcome.slack_off_count,
            "device_info": identity.identity_info()?,
        });
        println!("{record}");
    }

    Ok(())
}
