//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching config.toml structure.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::domain::SESSION_TTL_HOURS;

/// Main configuration structure matching config.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub provider: ProviderSection,
    pub swap: SwapSection,
    #[serde(default)]
    pub session: SessionSection,
    pub logging: LoggingSection,
}

/// Wallet provider / RPC configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSection {
    /// JSON-RPC endpoint (use a private RPC for production)
    pub rpc_url: String,
    /// Chain the wallet operates on (1 = Ethereum mainnet)
    pub chain_id: u64,
}

impl ProviderSection {
    /// Get RPC URL with environment variable override
    /// Checks WALLET_RPC_URL env var first, falls back to config value
    pub fn get_rpc_url(&self) -> String {
        std::env::var("WALLET_RPC_URL").unwrap_or_else(|_| self.rpc_url.clone())
    }
}

/// Swap API configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct SwapSection {
    /// Swap aggregator API base URL
    pub api_url: String,
    /// Optional API key for higher rate limits
    #[serde(default)]
    pub api_key: Option<String>,
    /// Slippage tolerance in basis points (1% = 100 bps)
    pub slippage_bps: u16,
    /// Input quiescence window before a quote request fires, in ms
    #[serde(default = "default_quote_debounce_ms")]
    pub quote_debounce_ms: u64,
}

fn default_quote_debounce_ms() -> u64 {
    crate::application::DEFAULT_DEBOUNCE_MS
}

impl SwapSection {
    /// Get API key with environment variable fallback
    /// Checks SWAP_API_KEY env var if config value is empty/None
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        std::env::var("SWAP_API_KEY").ok()
    }
}

/// Session persistence configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSection {
    /// Session lifetime in hours
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: i64,
    /// Where the session record is kept; supports `~` expansion
    #[serde(default = "default_store_path")]
    pub store_path: String,
}

fn default_ttl_hours() -> i64 {
    SESSION_TTL_HOURS
}

fn default_store_path() -> String {
    "~/.crosswap/session.json".to_string()
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            store_path: default_store_path(),
        }
    }
}

impl SessionSection {
    /// Store path with `~` and environment variables expanded.
    pub fn expanded_store_path(&self) -> String {
        shellexpand::full(&self.store_path)
            .map(|p| p.into_owned())
            .unwrap_or_else(|_| self.store_path.clone())
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.rpc_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "rpc_url cannot be empty".to_string(),
            ));
        }

        if self.provider.chain_id == 0 {
            return Err(ConfigError::ValidationError(
                "chain_id cannot be zero".to_string(),
            ));
        }

        if self.swap.api_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "api_url cannot be empty".to_string(),
            ));
        }

        if self.swap.slippage_bps == 0 || self.swap.slippage_bps > 5000 {
            return Err(ConfigError::ValidationError(format!(
                "slippage_bps must be 1-5000, got {}",
                self.swap.slippage_bps
            )));
        }

        if self.session.ttl_hours <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "ttl_hours must be > 0, got {}",
                self.session.ttl_hours
            )));
        }

        if self.session.store_path.is_empty() {
            return Err(ConfigError::ValidationError(
                "store_path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
