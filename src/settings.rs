use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::transport::RetryPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Endpoint {
    /// Filesystem path of the execution node's IPC socket.
    #[serde(default = "default_ipc_path")]
    pub ipc_path: String,
    #[serde(default = "default_read_timeout_seconds")]
    pub read_timeout_seconds: u64,
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_ipc_path() -> String {
    "/mnt/fourtb/erigon/execution/erigon.ipc".to_string()
}
fn default_read_timeout_seconds() -> u64 {
    10
}
fn default_retry_max_attempts() -> u32 {
    2 // one initial attempt plus one retry
}
fn default_retry_backoff_ms() -> u64 {
    500
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            ipc_path: default_ipc_path(),
            read_timeout_seconds: default_read_timeout_seconds(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl Endpoint {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_seconds)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_max_attempts,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataFiles {
    /// JSON array of pool records ({pool_address, token0, token1, ...}).
    #[serde(default = "default_pools_file")]
    pub pools_file: String,
}

fn default_pools_file() -> String {
    "/mnt/fiveh/DATA/pulsex_v2_lps.json".to_string()
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            pools_file: default_pools_file(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub endpoint: Endpoint,
    #[serde(default)]
    pub data: DataFiles,
    #[serde(default)]
    pub log: LogSettings,
}

impl Settings {
    /// Loads `Config.toml` when present, then applies environment
    /// overrides. Every field has a default, so a bare environment works.
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("Config.toml").required(false))
            .build()?;

        let mut settings: Self = s.try_deserialize()?;

        if let Ok(path) = env::var("LP_PROBE_IPC_PATH") {
            if !path.trim().is_empty() {
                settings.endpoint.ipc_path = path;
            }
        }
        if let Ok(path) = env::var("LP_PROBE_POOLS_FILE") {
            if !path.trim().is_empty() {
                settings.data.pools_file = path;
            }
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_field() {
        let settings = Settings::default();
        assert_eq!(settings.endpoint.read_timeout(), Duration::from_secs(10));
        assert_eq!(settings.endpoint.retry_policy(), RetryPolicy::default());
        assert_eq!(settings.log.level, "info");
        assert!(!settings.data.pools_file.is_empty());
    }
}
