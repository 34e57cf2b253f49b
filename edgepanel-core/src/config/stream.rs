use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Options for the live stream channel
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Milliseconds between frames sent on an open stream
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl StreamConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

fn default_interval_ms() -> u64 {
    1000
}
