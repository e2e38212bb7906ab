use serde::{Deserialize, Serialize};

/// Snapshot of client characteristics that stay stable across restarts of
/// the same environment. Used only as digest input, never as an identity by
/// itself.
///
/// The serialized field order is part of the identity contract: reordering
/// fields changes every derived player id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceFingerprint {
    pub screen: String,
    pub timezone: String,
    pub language: String,
    pub platform: String,
    pub user_agent: String,
    pub color_depth: u32,
    pub pixel_ratio: f64,
    pub hardware_concurrency: u32,
    pub max_touch_points: u32,
}

impl DeviceFingerprint {
    /// True when the fields that survive a restart match. Volatile fields
    /// (user agent, pixel ratio, concurrency, touch points) are ignored.
    pub fn matches_stable_features(&self, other: &DeviceFingerprint) -> bool {
        self.screen == other.screen
            && self.timezone == other.timezone
            && self.platform == other.platform
            && self.color_depth == other.color_depth
    }
}
