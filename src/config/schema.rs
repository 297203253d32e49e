//! Configuration schema definitions.
//!
//! This module defines the complete structure of the update server's config
//! document. All types derive Serde traits for deserialization from YAML or
//! TOML files.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// Port used when the config omits `server.port` or sets it to 0.
pub const DEFAULT_PORT: u16 = 8080;

/// Root configuration: an immutable, point-in-time view of all releases and
/// server settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ConfigSnapshot {
    /// HTTP server settings.
    pub server: ServerSettings,

    /// Releases in config order.
    pub releases: Vec<Release>,
}

/// HTTP server settings. Not consulted by release selection.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    /// Listening port (0 means [`DEFAULT_PORT`]).
    pub port: u16,

    /// Interface to bind.
    pub host: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Reload the config automatically when the file changes.
    pub watch: bool,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: "0.0.0.0".to_string(),
            request_timeout_secs: 10,
            watch: true,
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ServerSettings {
    /// The port to listen on, with `0` mapped to [`DEFAULT_PORT`].
    pub fn effective_port(&self) -> u16 {
        if self.port == 0 {
            DEFAULT_PORT
        } else {
            self.port
        }
    }

    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self, port_override: Option<u16>) -> String {
        let port = port_override.unwrap_or_else(|| self.effective_port());
        format!("{}:{}", self.host, port)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// A publishable version with per-platform download assets and an optional
/// rollout gate.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Release {
    /// Semantic version string, served back to clients verbatim. A missing
    /// version reads as empty and the release is never selected.
    #[serde(default)]
    pub version: String,

    /// Release notes shown by the client.
    #[serde(default)]
    pub notes: String,

    /// Publication date (RFC 3339 by convention, not parsed).
    #[serde(default)]
    pub pub_date: String,

    /// Platform id (e.g. `linux-x86_64`) to downloadable asset.
    #[serde(default)]
    pub platforms: BTreeMap<String, PlatformAsset>,

    /// Optional rollout gate. `None` means everyone is eligible.
    #[serde(default)]
    pub rollout: Option<RolloutRule>,
}

/// Download URL and detached signature for one platform build.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PlatformAsset {
    pub url: String,
    pub signature: String,
}

/// Eligibility gate for a release. Conditions are OR-combined.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RolloutRule {
    /// Exact-match allow-list against the `X-CUSTOMER` header.
    pub customers: HashSet<String>,

    /// Exact-match allow-list against the `X-REGION` header.
    pub regions: HashSet<String>,

    /// Share of machines (0..=100) admitted by the deterministic bucket.
    pub percentage: Option<u32>,
}
