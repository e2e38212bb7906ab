use serde::Serialize;

use storage::{KeyValueStore, StorageError};
use types::DeviceFingerprint;

use crate::digest::fingerprint_digest;
use crate::probe::DeviceProbe;

pub const PLAYER_ID_KEY: &str = "player_id";
pub const FINGERPRINT_KEY: &str = "device_fingerprint";

const ID_PREFIX: &str = "player_";

/// Diagnostic view of the current identity, attachable to outbound reports.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityInfo {
    pub id: String,
    pub is_new_player: bool,
    pub id_consistent: bool,
}

/// Derives and owns the pseudonymous player id.
///
/// A persisted id is trusted as-is on later loads; fingerprint inputs like
/// the screen size can legitimately change without the device being new, so
/// only the first derivation runs the validate pass.
pub struct IdentityManager {
    store: Box<dyn KeyValueStore>,
    probe: Box<dyn DeviceProbe>,
    player_id: Option<String>,
}

impl IdentityManager {
    pub fn new(store: Box<dyn KeyValueStore>, probe: Box<dyn DeviceProbe>) -> Self {
        Self {
            store,
            probe,
            player_id: None,
        }
    }

    /// Returns the player id, deriving and persisting one on first access.
    ///
    /// Order: in-memory id, then stored id, then a fresh derivation followed
    /// by a single validate-and-regenerate pass before the result persists.
    pub fn get_identity(&mut self) -> Result<String, StorageError> {
        if let Some(id) = &self.player_id {
            return Ok(id.clone());
        }

        if let Some(stored) = self.store.get(PLAYER_ID_KEY)? {
            log::debug!("Reusing stored player id");
            self.player_id = Some(stored.clone());
            return Ok(stored);
        }

        let mut id = self.derive()?;
        if !self.validate(&id)? {
            log::warn!("Freshly derived player id failed validation, regenerating");
            id = self.derive()?;
        }

        self.store.set(PLAYER_ID_KEY, &id)?;
        self.player_id = Some(id.clone());
        log::info!("Assigned player id {id}");
        Ok(id)
    }

    /// Clears the in-memory id, the stored id and the stored fingerprint
    /// snapshot. The next `get_identity` derives from scratch.
    pub fn reset_identity(&mut self) -> Result<(), StorageError> {
        self.player_id = None;
        self.store.remove(PLAYER_ID_KEY)?;
        self.store.remove(FINGERPRINT_KEY)?;
        log::info!("Player identity reset");
        Ok(())
    }

    /// Compares the stored fingerprint snapshot against a fresh probe on the
    /// restart-stable fields only. False when no snapshot is stored or it
    /// fails to parse.
    pub fn validate_device_fingerprint(&self) -> Result<bool, StorageError> {
        let Some(stored) = self.store.get(FINGERPRINT_KEY)? else {
            return Ok(false);
        };
        let stored: DeviceFingerprint = match serde_json::from_str(&stored) {
            Ok(fingerprint) => fingerprint,
            Err(e) => {
                log::warn!("Stored fingerprint snapshot failed to parse: {e}");
                return Ok(false);
            }
        };
        Ok(stored.matches_stable_features(&self.probe.snapshot()))
    }

    pub fn identity_info(&self) -> Result<IdentityInfo, StorageError> {
        let stored = self.store.get(PLAYER_ID_KEY)?;
        let is_new_player = stored.is_none();
        let id_consistent = match (&stored, &self.player_id) {
            (Some(stored), Some(held)) => stored == held,
            (Some(_), None) => true,
            _ => false,
        };
        let id = self
            .player_id
            .clone()
            .or(stored)
            .unwrap_or_else(|| "unknown".to_string());
        Ok(IdentityInfo {
            id,
            is_new_player,
            id_consistent,
        })
    }

    /// Serializes a fresh snapshot, persists it for diagnostics and returns
    /// the serialized form used as digest input.
    fn serialized_snapshot(&mut self) -> Result<String, StorageError> {
        let fingerprint = self.probe.snapshot();
        let serialized = serde_json::to_string(&fingerprint)?;
        self.store.set(FINGERPRINT_KEY, &serialized)?;
        Ok(serialized)
    }

    fn derive(&mut self) -> Result<String, StorageError> {
        let serialized = self.serialized_snapshot()?;
        Ok(format!("{ID_PREFIX}{}", fingerprint_digest(&serialized)))
    }

    /// Recomputes the digest from a second snapshot and compares it to the
    /// hash embedded in `id`. A mismatch means an input field moved between
    /// the two snapshots.
    fn validate(&mut self, id: &str) -> Result<bool, StorageError> {
        let Some(hash) = id.strip_prefix(ID_PREFIX) else {
            return Ok(false);
        };
        if hash.is_empty() || hash.contains('_') {
            return Ok(false);
        }
        let serialized = self.serialized_snapshot()?;
        Ok(fingerprint_digest(&serialized) == hash)
    }
}
