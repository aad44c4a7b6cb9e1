//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for an evote node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default, so a
/// partial file only overrides what it names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Data directory for the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Address the HTTP server binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// LMDB map size in MiB.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    /// HMAC secret for bearer tokens. Required to serve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_secret: Option<String>,

    /// Lifetime of tokens minted by `issue-token`.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// Upper bound on each request's storage work.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_audit_channel_capacity")]
    pub audit_channel_capacity: usize,

    /// Whether to expose the Prometheus `/metrics` route.
    #[serde(default)]
    pub enable_metrics: bool,

    /// Whether to serve the admin live feed.
    #[serde(default = "default_true")]
    pub enable_admin_feed: bool,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./evote_data")
}

fn default_listen_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_rpc_port() -> u16 {
    8080
}

fn default_map_size_mb() -> usize {
    256
}

fn default_token_ttl_secs() -> u64 {
    86_400
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

fn default_audit_channel_capacity() -> usize {
    1024
}

fn default_true() -> bool {
    true
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn rpc_socket_addr(&self) -> Result<SocketAddr, NodeError> {
        let ip: IpAddr = self
            .listen_addr
            .trim()
            .parse()
            .map_err(|e| NodeError::Config(format!("listen_addr {:?}: {e}", self.listen_addr)))?;
        Ok(SocketAddr::new(ip, self.rpc_port))
    }

    pub fn map_size_bytes(&self) -> usize {
        self.map_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }

    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse()
    }

    /// The token secret, rejecting an absent or blank value.
    pub fn require_token_secret(&self) -> Result<&str, NodeError> {
        match self.token_secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => Ok(secret),
            _ => Err(NodeError::Config(
                "token_secret is not set (config file or EVOTE_TOKEN_SECRET)".to_string(),
            )),
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            listen_addr: default_listen_addr(),
            rpc_port: default_rpc_port(),
            map_size_mb: default_map_size_mb(),
            token_secret: None,
            token_ttl_secs: default_token_ttl_secs(),
            request_timeout_ms: default_request_timeout_ms(),
            audit_channel_capacity: default_audit_channel_capacity(),
            enable_metrics: false,
            enable_admin_feed: default_true(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig {
            token_secret: Some("s3cret".into()),
            ..NodeConfig::default()
        };
        let toml_str = config.to_toml_string().unwrap();
        let parsed = NodeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config, NodeConfig::default());
        assert_eq!(config.rpc_port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("./evote_data"));
        assert_eq!(config.request_timeout(), Duration::from_millis(5000));
        assert!(config.enable_admin_feed);
        assert!(!config.enable_metrics);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            rpc_port = 9999
            enable_metrics = true
            log_format = "json"
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.rpc_port, 9999);
        assert!(config.enable_metrics);
        assert_eq!(config.log_format().unwrap(), LogFormat::Json);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn socket_addr_and_map_size() {
        let config = NodeConfig {
            listen_addr: "127.0.0.1".into(),
            rpc_port: 7000,
            map_size_mb: 2,
            ..NodeConfig::default()
        };
        assert_eq!(
            config.rpc_socket_addr().unwrap(),
            "127.0.0.1:7000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.map_size_bytes(), 2 * 1024 * 1024);

        let bad = NodeConfig {
            listen_addr: "localhost:80".into(),
            ..NodeConfig::default()
        };
        assert!(matches!(bad.rpc_socket_addr(), Err(NodeError::Config(_))));
    }

    #[test]
    fn blank_token_secret_is_rejected() {
        let mut config = NodeConfig::default();
        assert!(config.require_token_secret().is_err());
        config.token_secret = Some("   ".into());
        assert!(config.require_token_secret().is_err());
        config.token_secret = Some("abc".into());
        assert_eq!(config.require_token_secret().unwrap(), "abc");
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file(Path::new("/nonexistent/evote.toml"));
        assert!(matches!(result, Err(NodeError::Config(_))));
    }
}
