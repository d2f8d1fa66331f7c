#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MAX_IDLE_PER_HOST: usize = 10;
pub const DEFAULT_IDLE_CONN_TIMEOUT_SECS: u64 = 60;

/// Connection pool settings for the outbound HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpAdapterConfig {
    #[serde(default = "default_max_idle_per_host")]
    pub max_conns_per_host: usize,
    #[serde(default = "default_idle_conn_timeout_secs")]
    pub idle_conn_timeout_secs: u64,
}

impl HttpAdapterConfig {
    pub fn idle_conn_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_conn_timeout_secs)
    }
}

impl Default for HttpAdapterConfig {
    fn default() -> Self {
        Self {
            max_conns_per_host: DEFAULT_MAX_IDLE_PER_HOST,
            idle_conn_timeout_secs: DEFAULT_IDLE_CONN_TIMEOUT_SECS,
        }
    }
}

fn default_max_idle_per_host() -> usize {
    DEFAULT_MAX_IDLE_PER_HOST
}

fn default_idle_conn_timeout_secs() -> u64 {
    DEFAULT_IDLE_CONN_TIMEOUT_SECS
}
