//! Gateway configuration
//!
//! Built once at startup in layers: defaults, an optional JSON file,
//! environment variables (a `.env` file is honoured), then CLI flags.

use hwconf_advisor::SummarizerSettings;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::{GatewayError, Result, DEFAULT_DATABASE_PATH, DEFAULT_HOST, DEFAULT_PORT};

/// Token lifetime: seven days
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60 * 24 * 7;

/// Signing secret used when none is configured; fine for local runs only
pub const DEV_AUTH_SECRET: &str = "your-secret-key";

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Authentication settings
    pub auth: AuthSettings,

    /// Remote summarizer settings
    pub openrouter: SummarizerSettings,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            auth: AuthSettings::default(),
            openrouter: SummarizerSettings::default(),
        }
    }
}

impl GatewayConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the database path
    pub fn with_database_path(mut self, path: impl Into<String>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Set the token signing secret
    pub fn with_auth_secret(mut self, secret: impl Into<String>) -> Self {
        self.auth.secret = secret.into();
        self
    }

    /// Set the bcrypt cost factor
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.auth.bcrypt_cost = cost;
        self
    }

    /// Set the OpenRouter API key
    pub fn with_openrouter_key(mut self, key: impl Into<String>) -> Self {
        self.openrouter.api_key = Some(key.into());
        self
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                GatewayError::InvalidConfig(format!(
                    "Invalid socket address {}:{}: {}",
                    self.host, self.port, e
                ))
            })
    }

    /// Load configuration from a file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| GatewayError::InvalidConfig(format!("{}: {}", path, e)))?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file(&self, path: &str) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Overlay environment variables, loading `.env` first if present
    pub fn apply_env(self) -> Result<Self> {
        if let Some(path) = load_dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Overlay variables from an arbitrary lookup
    pub fn apply_env_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = var("HOST") {
            self.host = host;
        }
        if let Some(port) = var("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| GatewayError::InvalidConfig(format!("PORT is not a port: {}", port)))?;
        }
        if let Some(path) = var("DATABASE_PATH") {
            self.database_path = path;
        }
        if let Some(secret) = var("AUTH_SECRET") {
            self.auth.secret = secret;
        }
        if let Some(secure) = var("SECURE_COOKIES") {
            self.auth.secure_cookies = matches!(secure.trim(), "1" | "true" | "yes");
        }
        if let Some(key) = var("OPENROUTER_API_KEY") {
            self.openrouter.api_key = Some(key);
        }
        if let Some(model) = var("OPENROUTER_MODEL") {
            self.openrouter.model = model;
        }
        if let Some(url) = var("OPENROUTER_BASE_URL") {
            self.openrouter.base_url = url;
        }
        if let Some(timeout) = var("OPENROUTER_TIMEOUT_SECS") {
            self.openrouter.timeout_secs = timeout.trim().parse().map_err(|_| {
                GatewayError::InvalidConfig(format!(
                    "OPENROUTER_TIMEOUT_SECS is not a number: {}",
                    timeout
                ))
            })?;
        }

        Ok(self)
    }
}

/// Authentication settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HS256 signing secret
    pub secret: String,

    /// Token and cookie lifetime in seconds
    pub token_ttl_secs: u64,

    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,

    /// bcrypt cost factor (4-31)
    pub bcrypt_cost: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            secret: DEV_AUTH_SECRET.to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            secure_cookies: false,
            bcrypt_cost: 10,
        }
    }
}

impl AuthSettings {
    pub fn uses_dev_secret(&self) -> bool {
        self.secret == DEV_AUTH_SECRET
    }
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("secure_cookies", &self.secure_cookies)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

/// Load `.env` into the process environment; existing variables win
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Log filter from `RUST_LOG`, which may come from `.env`, falling back to
/// the verbosity default
pub fn log_filter(verbose: bool) -> EnvFilter {
    load_dotenv();
    let default = if verbose { "debug" } else { "info,tower_http=warn" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.auth.token_ttl_secs, 604_800);
        assert!(config.auth.uses_dev_secret());
        assert!(config.openrouter.api_key().is_none());
    }

    #[test]
    fn test_log_filter_prefers_rust_log() {
        std::env::set_var("RUST_LOG", "hwconf_gateway=trace");
        assert_eq!(log_filter(false).to_string(), "hwconf_gateway=trace");

        std::env::remove_var("RUST_LOG");
        assert_eq!(log_filter(true).to_string(), "debug");
    }

    #[test]
    fn test_config_builder() {
        let config = GatewayConfig::new()
            .with_host("0.0.0.0")
            .with_port(8080)
            .with_database_path("/tmp/hw.db")
            .with_auth_secret("s3cret");

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, "/tmp/hw.db");
        assert!(!config.auth.uses_dev_secret());
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_invalid_socket_addr() {
        let config = GatewayConfig::new().with_host("not a host");
        assert!(matches!(
            config.socket_addr(),
            Err(GatewayError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_env_overlay() {
        let env: HashMap<&str, &str> = [
            ("PORT", "4100"),
            ("AUTH_SECRET", "from-env"),
            ("OPENROUTER_API_KEY", "sk-or-env"),
            ("OPENROUTER_MODEL", ""),
            ("SECURE_COOKIES", "true"),
        ]
        .into_iter()
        .collect();

        let config = GatewayConfig::default()
            .apply_env_from(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.port, 4100);
        assert_eq!(config.auth.secret, "from-env");
        assert!(config.auth.secure_cookies);
        assert_eq!(config.openrouter.api_key(), Some("sk-or-env"));
        // blank values leave defaults in place
        assert_eq!(config.openrouter.model, hwconf_advisor::DEFAULT_MODEL);
    }

    #[test]
    fn test_env_rejects_bad_port() {
        let result = GatewayConfig::default()
            .apply_env_from(|key| (key == "PORT").then(|| "eighty".to_string()));
        assert!(matches!(result, Err(GatewayError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.json");
        let path = path.to_str().unwrap();

        GatewayConfig::new().with_port(9090).to_file(path).unwrap();
        let loaded = GatewayConfig::from_file(path).unwrap();
        assert_eq!(loaded.port, 9090);
        assert_eq!(loaded.auth.bcrypt_cost, 10);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = GatewayConfig::new()
            .with_auth_secret("jwt-secret")
            .with_openrouter_key("sk-or-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("jwt-secret"));
        assert!(!debug.contains("sk-or-secret"));
    }
}
