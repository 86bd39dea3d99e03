// Path: src/settings.rs
//! Engine configuration. Loading settings from a file, environment, or a
//! remote config service is out of scope (see the crate's scope note); this
//! struct is the shape a loader hands to `CryptographyEngine::apply_settings`,
//! plus a default usable without one.

use serde::{Deserialize, Serialize};

/// Recognized configuration options (spec "Configuration" table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Worker pool size for the digest pipeline.
    pub cpu_digest_thread_count: usize,
    /// Worker pool size for the verification pipeline.
    pub cpu_verifier_thread_count: usize,
    /// Bounded queue capacity (in batches) for the digest pipeline.
    pub cpu_digest_queue_size: usize,
    /// Bounded queue capacity (in batches) for the verification pipeline.
    pub cpu_verifier_queue_size: usize,
    /// Worker pool size for the Merkle tree hasher.
    pub merkle_thread_count: usize,
    /// Disables hardware-acceleration detection paths. The engine never had
    /// any to begin with (see the design notes on the removed GPU/OpenCL
    /// probing); this field is retained for config-surface compatibility.
    pub force_cpu: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let cpus = num_cpus::get().max(1);
        EngineSettings {
            cpu_digest_thread_count: cpus,
            cpu_verifier_thread_count: cpus,
            cpu_digest_queue_size: 256,
            cpu_verifier_queue_size: 256,
            merkle_thread_count: cpus,
            force_cpu: true,
        }
    }
}
