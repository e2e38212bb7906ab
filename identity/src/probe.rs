use types::DeviceFingerprint;

/// Collection seam for fingerprint input. The embedding shell supplies a
/// probe that reads whatever display/UA information its host exposes; tests
/// supply a fixed one.
pub trait DeviceProbe {
    /// Takes a fresh snapshot. Never cached by the probe; the caller decides
    /// what to persist.
    fn snapshot(&self) -> DeviceFingerprint;
}

/// Best-effort probe for a plain host process. Display-specific fields fall
/// back to neutral defaults the same way the browser client defaults absent
/// navigator fields.
#[derive(Debug, Default)]
pub struct HostProbe;

impl HostProbe {
    pub fn new() -> Self {
        Self
    }
}

impl DeviceProbe for HostProbe {
    fn snapshot(&self) -> DeviceFingerprint {
        DeviceFingerprint {
            screen: std::env::var("SCREEN_RESOLUTION").unwrap_or_else(|_| "0x0".to_string()),
            timezone: std::env::var("TZ").unwrap_or_else(|_| "UTC".to_string()),
            language: std::env::var("LANG").unwrap_or_else(|_| "en-US".to_string()),
            platform: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
            user_agent: format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ),
            color_depth: 24,
            pixel_ratio: 1.0,
            hardware_concurrency: std::thread::available_parallelism()
                .map(|n| n.get() as u32)
                .unwrap_or(0),
            max_touch_points: 0,
        }
    }
}

/// Probe that always returns the same snapshot. Used by tests and by
/// embedders that collect fingerprint data through their own channels.
#[derive(Debug, Clone)]
pub struct StaticProbe {
    fingerprint: DeviceFingerprint,
}

impl StaticProbe {
    pub fn new(fingerprint: DeviceFingerprint) -> Self {
        Self { fingerprint }
    }
}

impl DeviceProbe for StaticProbe {
    fn snapshot(&self) -> DeviceFingerprint {
        self.fingerprint.clone()
    }
}
