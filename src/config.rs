use std::path::PathBuf;
use crate::derive::ConflictPolicy;
use crate::error::ConfigError;

pub const DEFAULT_CSV_PATH: &str = "data/enrollments.csv";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND: &str = "0.0.0.0";
/// Largest accepted CSV upload, in bytes
pub const DEFAULT_UPLOAD_LIMIT: usize = 16 * 1024 * 1024;

/// Runtime settings, read from `CONFLICTS_*` environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub csv_path: PathBuf,
    pub bind: String,
    pub port: u16,
    pub policy: ConflictPolicy,
    pub upload_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            policy: ConflictPolicy::default(),
            upload_limit: DEFAULT_UPLOAD_LIMIT,
        }
    }
}

impl Config {
    /// Reads the process environment (after `.env` has been applied)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = lookup("CONFLICTS_CSV").filter(|p| !p.trim().is_empty()) {
            config.csv_path = PathBuf::from(path);
        }
        if let Some(bind) = lookup("CONFLICTS_BIND").filter(|b| !b.trim().is_empty()) {
            config.bind = bind;
        }
        if let Some(port) = lookup("CONFLICTS_PORT") {
            config.port = parse_port(&port)?;
        }
        if let Some(policy) = lookup("CONFLICTS_POLICY") {
            config.policy = policy.parse()?;
        }
        if let Some(limit) = lookup("CONFLICTS_UPLOAD_LIMIT") {
            config.upload_limit = limit
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidUploadLimit(limit.clone()))?;
        }

        Ok(config)
    }
}

pub fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPort(value.to_string()))
}
