//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `hmbridge.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hub connection settings.
    pub hub: HubConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Hub connection configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Local address the callback listener binds to.
    pub local_host: String,
    /// Local callback port.
    pub local_port: u16,
    /// Address of the hub (CCU or Homegear host).
    pub remote_host: String,
    /// XML-RPC port on the hub.
    pub remote_port: u16,
    /// Credentials for the hub's JSON-RPC and XML APIs.
    pub username: String,
    /// Password; empty for unauthenticated hubs.
    pub password: String,
    /// How to resolve device display names.
    pub resolve_names: ResolveNames,
    /// Delay before the initial value pull of each entity, in
    /// milliseconds. Spreads the pull burst after discovery.
    pub link_delay_ms: u64,
    /// Mirror the hub's system variables as entities.
    pub variables_enabled: bool,
}

/// Name resolution strategy for discovered devices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveNames {
    /// Keep raw addresses as names.
    #[default]
    Off,
    /// Use the names carried in device metadata.
    Metadata,
    /// Resolve through the hub's JSON-RPC API.
    Json,
    /// Scrape the hub's XML-API add-on.
    Xml,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `hmbridge.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or a
    /// value fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("hmbridge.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HMBRIDGE_LOCAL_HOST") {
            self.hub.local_host = val;
        }
        if let Ok(val) = std::env::var("HMBRIDGE_LOCAL_PORT") {
            if let Ok(port) = val.parse() {
                self.hub.local_port = port;
            }
        }
        if let Ok(val) = std::env::var("HMBRIDGE_REMOTE_HOST") {
            self.hub.remote_host = val;
        }
        if let Ok(val) = std::env::var("HMBRIDGE_REMOTE_PORT") {
            if let Ok(port) = val.parse() {
                self.hub.remote_port = port;
            }
        }
        if let Ok(val) = std::env::var("HMBRIDGE_VARIABLES") {
            self.hub.variables_enabled = matches!(val.as_str(), "1" | "true" | "yes");
        }
        self.override_log_filter(
            std::env::var("RUST_LOG").ok(),
            std::env::var("HMBRIDGE_LOG").ok(),
        );
    }

    /// Apply the logging overrides, the project-specific variable winning
    /// over the generic one.
    fn override_log_filter(&mut self, rust_log: Option<String>, hmbridge_log: Option<String>) {
        if let Some(val) = rust_log {
            self.logging.filter = val;
        }
        if let Some(val) = hmbridge_log {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.hub.local_host.is_empty() {
            return Err(ConfigError::Validation(
                "local host must not be empty".to_string(),
            ));
        }
        if self.hub.remote_host.is_empty() {
            return Err(ConfigError::Validation(
                "remote host must not be empty".to_string(),
            ));
        }
        if self.hub.local_port == 0 || self.hub.remote_port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Return the `host:port` address of the hub.
    #[must_use]
    pub fn remote_addr(&self) -> String {
        format!("{}:{}", self.hub.remote_host, self.hub.remote_port)
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            local_host: "0.0.0.0".to_string(),
            local_port: 8943,
            remote_host: "127.0.0.1".to_string(),
            remote_port: 2001,
            username: "Admin".to_string(),
            password: String::new(),
            resolve_names: ResolveNames::Off,
            link_delay_ms: 500,
            variables_enabled: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "hmbridged=info,hmbridge=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
