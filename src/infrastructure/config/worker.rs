//! Binary worker configuration.

use serde::{Deserialize, Serialize};

/// Binary worker settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Largest accepted frame body in bytes.
    pub max_frame_bytes: usize,
}

const fn default_max_frame_bytes() -> usize {
    1024 * 1024
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_frame_bytes: default_max_frame_bytes(),
        }
    }
}
