use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, ensure};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Upper bound for a single read from a connection.
    pub read_buffer_size: usize,
    /// Accumulation stops once a request reaches this size.
    pub max_request_bytes: usize,
    /// Time allowed for a whole request to arrive, counted from accept.
    pub read_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:4221".to_string(),
            read_buffer_size: 1024,
            max_request_bytes: 64 * 1024,
            read_timeout_ms: 5000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/tmp/data/"),
        }
    }
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Config {
    /// Loads the YAML file named by `SERVER_CONFIG` (defaults when unset),
    /// then applies `LISTEN` and `FILES_ROOT` from the environment.
    pub fn load() -> anyhow::Result<Self> {
        let base = match std::env::var("SERVER_CONFIG") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {path}"))?;
                Self::from_yaml_str(&raw).with_context(|| format!("parsing config file {path}"))?
            }
            Err(_) => Self::default(),
        };

        let cfg = base.with_overrides(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(raw)?;
        Ok(cfg)
    }

    /// Applies `LISTEN` and `FILES_ROOT` as returned by `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(addr) = lookup("LISTEN") {
            self.server.listen_addr = addr;
        }
        if let Some(root) = lookup("FILES_ROOT") {
            self.storage.root = PathBuf::from(root);
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let s = &self.server;
        ensure!(s.read_buffer_size > 0, "server.read_buffer_size must be positive");
        ensure!(
            s.max_request_bytes >= s.read_buffer_size,
            "server.max_request_bytes ({}) must be at least server.read_buffer_size ({})",
            s.max_request_bytes,
            s.read_buffer_size
        );
        ensure!(s.read_timeout_ms > 0, "server.read_timeout_ms must be positive");
        Ok(())
    }
}
