//! Configuration system for the A2A orchestration server
//!
//! Configuration comes from a TOML file, with a small set of environment
//! variable overrides matching the deployment contract of the original
//! service (`A2A_SERVER_HOST`, `A2A_SERVER_PORT`, `PUBLIC_URL`,
//! `REMOTE_AGENT_ADDRESSES`).

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Main orchestrator configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrchestratorConfig {
    pub orchestrator: OrchestratorSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub agents: AgentsSection,
    #[serde(default)]
    pub dispatch: DispatchSection,
}

/// Orchestrator identity section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrchestratorSection {
    /// Orchestrator identifier (must match [a-zA-Z0-9._-]+)
    pub id: String,
    /// Display name published on the agent card
    pub name: String,
    /// Description published on the agent card
    pub description: String,
    /// Version string published on the agent card
    #[serde(default = "default_version")]
    pub version: String,
    /// Public base URL advertised to callers (default derived from server section)
    pub public_url: Option<String>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// HTTP server section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port for the A2A endpoint
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10000
}

/// Remote agent section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentsSection {
    /// Base URLs of remote agents resolved at startup
    #[serde(default)]
    pub addresses: Vec<String>,
    /// Timeout for agent card resolution in seconds
    #[serde(default = "default_card_timeout")]
    pub card_timeout_secs: u64,
    /// Timeout for a single task dispatch in seconds
    #[serde(default = "default_dispatch_timeout")]
    pub dispatch_timeout_secs: u64,
    /// Interval between liveness refresh sweeps in seconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    /// Registry entry TTL in seconds; entries older than this are expired
    #[serde(default = "default_registry_ttl")]
    pub registry_ttl_secs: u64,
}

impl Default for AgentsSection {
    fn default() -> Self {
        Self {
            addresses: Vec::new(),
            card_timeout_secs: default_card_timeout(),
            dispatch_timeout_secs: default_dispatch_timeout(),
            refresh_interval_secs: default_refresh_interval(),
            registry_ttl_secs: default_registry_ttl(),
        }
    }
}

fn default_card_timeout() -> u64 {
    10
}

fn default_dispatch_timeout() -> u64 {
    60
}

fn default_refresh_interval() -> u64 {
    60
}

fn default_registry_ttl() -> u64 {
    180
}

/// Dispatch behavior section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchSection {
    /// Dispatch mode: single best match or broadcast to all matches
    #[serde(default)]
    pub mode: DispatchMode,
    /// Cap on the number of agents targeted by a broadcast dispatch
    #[serde(default = "default_max_targets")]
    pub max_targets: usize,
}

impl Default for DispatchSection {
    fn default() -> Self {
        Self {
            mode: DispatchMode::default(),
            max_targets: default_max_targets(),
        }
    }
}

fn default_max_targets() -> usize {
    4
}

/// Dispatch mode selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Route to the single best-matching agent
    #[default]
    Single,
    /// Fan out to all live agents matching the request
    Broadcast,
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid orchestrator ID format: {0}")]
    InvalidOrchestratorId(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl OrchestratorConfig {
    /// Load configuration from a TOML file and apply environment overrides
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: OrchestratorConfig = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply deployment environment overrides
    ///
    /// `REMOTE_AGENT_ADDRESSES` is comma-separated and replaces the configured
    /// address list entirely when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("A2A_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("A2A_SERVER_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(url) = std::env::var("PUBLIC_URL") {
            self.orchestrator.public_url = Some(url);
        }
        if let Ok(addresses) = std::env::var("REMOTE_AGENT_ADDRESSES") {
            let parsed: Vec<String> = addresses
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if !parsed.is_empty() {
                self.agents.addresses = parsed;
            }
        }
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_orchestrator_id(&self.orchestrator.id)?;

        if self.server.port == 0 {
            return Err(ConfigError::InvalidConfig(
                "server.port must be non-zero".to_string(),
            ));
        }

        for address in &self.agents.addresses {
            url::Url::parse(address).map_err(|e| {
                ConfigError::InvalidConfig(format!("invalid agent address '{address}': {e}"))
            })?;
        }

        if self.agents.dispatch_timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "agents.dispatch_timeout_secs must be non-zero".to_string(),
            ));
        }

        if self.agents.registry_ttl_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "agents.registry_ttl_secs must be non-zero".to_string(),
            ));
        }

        if self.dispatch.max_targets == 0 {
            return Err(ConfigError::InvalidConfig(
                "dispatch.max_targets must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Public URL advertised on the orchestrator's agent card
    pub fn public_url(&self) -> String {
        self.orchestrator
            .public_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.server.port))
    }

    /// Create a test configuration for unit testing
    #[cfg(test)]
    pub fn test_config() -> Self {
        let toml_content = r#"
[orchestrator]
id = "test-orchestrator"
name = "Test Orchestrator"
description = "Coordinates test agents"

[server]
host = "127.0.0.1"
port = 10000

[agents]
addresses = ["http://localhost:10002"]
"#;
        toml::from_str(toml_content).expect("Test config should parse")
    }
}

/// Validate orchestrator ID format
fn validate_orchestrator_id(id: &str) -> Result<(), ConfigError> {
    let valid_chars = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');

    if id.is_empty() || !valid_chars {
        return Err(ConfigError::InvalidOrchestratorId(format!(
            "Orchestrator ID '{id}' must match pattern [a-zA-Z0-9._-]+"
        )));
    }

    Ok(())
}
