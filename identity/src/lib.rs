pub mod digest;
pub mod manager;
pub mod probe;

pub use digest::fingerprint_digest;
pub use manager::{IdentityInfo, IdentityManager, FINGERPRINT_KEY, PLAYER_ID_KEY};
pub use probe::{DeviceProbe, HostProbe, StaticProbe};
