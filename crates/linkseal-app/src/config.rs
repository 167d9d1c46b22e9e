//! Flow configuration.

use std::time::Duration;

/// Configuration shared by the submission and retrieval flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowConfig {
    /// Base URL share links are built under.
    pub base_url: String,

    /// Maximum secret size in bytes (UTF-8 text or raw file bytes),
    /// enforced before sealing. Exactly this many bytes is accepted.
    pub max_secret_size: usize,

    /// TTL attached to stored blobs.
    pub default_ttl: Duration,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            max_secret_size: 256 * 1024,
            default_ttl: Duration::from_secs(15 * 60),
        }
    }
}
