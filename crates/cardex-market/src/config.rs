//! Market configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Market configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// SQLite database file path
    pub database_path: String,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// Token lifetime in seconds (default: one hour)
    pub token_lifetime_secs: i64,
}

impl MarketConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = MarketConfig {
            database_path: env::var("CARDEX_DATABASE_PATH")
                .unwrap_or_else(|_| "./cardex.db".to_string()),

            jwt_secret: env::var("CARDEX_JWT_SECRET").unwrap_or_else(|_| {
                // Development fallback only.
                // In production, this MUST be set via environment variable.
                "cardex-dev-secret-change-in-production".to_string()
            }),

            token_lifetime_secs: env::var("CARDEX_TOKEN_LIFETIME_SECS")
                .unwrap_or_else(|_| "3600".to_string()) // 60 minutes
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CARDEX_TOKEN_LIFETIME_SECS".to_string()))?,
        };

        Ok(config)
    }

    /// A fixed configuration for tests: in-memory-friendly and deterministic.
    pub fn for_tests() -> Self {
        MarketConfig {
            database_path: ":memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            token_lifetime_secs: 3600,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load() {
        // With no variables set, load() should fall back to defaults.
        let config = MarketConfig::load().unwrap();
        assert_eq!(config.token_lifetime_secs, 3600);
        assert!(!config.jwt_secret.is_empty());
    }
}
