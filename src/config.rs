//! Configuration module for msgdrop.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::{MsgdropError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins. Empty means same-origin only.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Account and login configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Minimum account name length.
    #[serde(default = "default_min_username_len")]
    pub min_username_len: usize,
    /// Minimum password length. Passwords must also contain a digit.
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,
    /// Consecutive failed logins before a CAPTCHA is required.
    #[serde(default = "default_captcha_threshold")]
    pub captcha_threshold: u32,
    /// Session lifetime in seconds.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

fn default_min_username_len() -> usize {
    5
}

fn default_min_password_len() -> usize {
    3
}

fn default_captcha_threshold() -> u32 {
    3
}

fn default_session_ttl() -> u64 {
    24 * 60 * 60
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_username_len: default_min_username_len(),
            min_password_len: default_min_password_len(),
            captcha_threshold: default_captcha_threshold(),
            session_ttl_secs: default_session_ttl(),
        }
    }
}

/// CAPTCHA verifier configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptchaConfig {
    /// Whether to verify tokens against the remote siteverify endpoint.
    /// When disabled, any non-empty token passes.
    #[serde(default)]
    pub enabled: bool,
    /// Shared secret for the siteverify call.
    #[serde(default)]
    pub secret_key: String,
    /// Siteverify endpoint URL.
    #[serde(default = "default_verify_url")]
    pub verify_url: String,
}

fn default_verify_url() -> String {
    "https://www.google.com/recaptcha/api/siteverify".to_string()
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            secret_key: String::new(),
            verify_url: default_verify_url(),
        }
    }
}

/// Long-poll retrieval configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    /// Interval between mailbox rechecks while a waiter is parked, in
    /// milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
    /// Maximum time a retrieval blocks before returning empty, in seconds.
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_max_wait_secs() -> u64 {
    3
}

impl PollConfig {
    /// Recheck interval as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Maximum wait as a `Duration`.
    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
            max_wait_secs: default_max_wait_secs(),
        }
    }
}

/// Backing store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store backend: "memory" or "json".
    #[serde(default = "default_store_backend")]
    pub backend: String,
    /// Path to the JSON snapshot file (json backend only).
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_backend() -> String {
    "memory".to_string()
}

fn default_store_path() -> String {
    "data/msgdrop.json".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            path: default_store_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/msgdrop.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Account and login settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// CAPTCHA settings.
    #[serde(default)]
    pub captcha: CaptchaConfig,
    /// Long-poll settings.
    #[serde(default)]
    pub poll: PollConfig,
    /// Store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| MsgdropError::Config(e.to_string()))
    }
}
