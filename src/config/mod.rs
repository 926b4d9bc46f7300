//! Configuration management for the Terragrids auth service
//!
//! This module handles loading and validating configuration from environment variables,
//! with support for different environments (development, staging, production).

use std::env;

use chrono::Duration;
use thiserror::Error;

use crate::auth::{ProtocolSettings, DEFAULT_NOTE_TAG, DEFAULT_SERVICE_NAME};

/// Longest challenge lifetime accepted from configuration (one day)
pub const MAX_CHALLENGE_LIFETIME_CEILING_SECONDS: i64 = 24 * 60 * 60;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment value: {0}")]
    InvalidValue(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),
}

/// Application environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse environment from string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "dev" | "development" | "local" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }

    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Get the environment name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL; the in-memory challenge store is used when unset
    pub database_url: Option<String>,

    /// Current environment
    pub environment: Environment,

    /// Server port
    pub port: u16,

    /// Maximum database connections
    pub db_max_connections: u32,

    /// CORS allowed origins
    pub cors_allowed_origins: Option<String>,

    /// Log level (RUST_LOG)
    pub log_level: String,

    /// Expected `service` literal in auth messages
    pub auth_service_name: String,

    /// Prefix of envelope notes carrying auth messages
    pub auth_note_tag: String,

    /// Maximum nonce lifetime accepted by the verifier (default: 600 = 10 minutes)
    pub auth_max_challenge_lifetime_seconds: i64,

    /// Lifetime given to issued nonces (default: 300 = 5 minutes)
    pub auth_challenge_ttl_seconds: i64,

    /// Wallets allowed to call admin endpoints
    pub admin_wallets: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .map(|s| Environment::parse(&s))
            .unwrap_or(Ok(Environment::Development))?;

        let database_url = env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("PORT must be a valid number".to_string()))?;

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .unwrap_or(5);

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS").ok();

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let auth_service_name =
            env::var("AUTH_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());

        let auth_note_tag =
            env::var("AUTH_NOTE_TAG").unwrap_or_else(|_| DEFAULT_NOTE_TAG.to_string());

        let auth_max_challenge_lifetime_seconds = env::var("AUTH_MAX_CHALLENGE_LIFETIME_SECONDS")
            .unwrap_or_else(|_| "600".to_string())
            .parse::<i64>()
            .unwrap_or(600);

        let auth_challenge_ttl_seconds = env::var("AUTH_CHALLENGE_TTL_SECONDS")
            .unwrap_or_else(|_| "300".to_string())
            .parse::<i64>()
            .unwrap_or(300);

        let admin_wallets = parse_wallet_list(&env::var("ADMIN_WALLETS").unwrap_or_default());

        let config = Config {
            database_url,
            environment,
            port,
            db_max_connections,
            cors_allowed_origins,
            log_level,
            auth_service_name,
            auth_note_tag,
            auth_max_challenge_lifetime_seconds,
            auth_challenge_ttl_seconds,
            admin_wallets,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment.is_production() && self.database_url.is_none() {
            return Err(ConfigError::MissingEnvVar("DATABASE_URL".to_string()));
        }

        if self.auth_max_challenge_lifetime_seconds <= 0
            || self.auth_max_challenge_lifetime_seconds > MAX_CHALLENGE_LIFETIME_CEILING_SECONDS
        {
            return Err(ConfigError::InvalidValue(format!(
                "AUTH_MAX_CHALLENGE_LIFETIME_SECONDS must be between 1 and {}",
                MAX_CHALLENGE_LIFETIME_CEILING_SECONDS
            )));
        }

        if self.auth_challenge_ttl_seconds <= 0 {
            return Err(ConfigError::InvalidValue(
                "AUTH_CHALLENGE_TTL_SECONDS must be positive".to_string(),
            ));
        }

        if self.auth_challenge_ttl_seconds > self.auth_max_challenge_lifetime_seconds {
            return Err(ConfigError::InvalidValue(format!(
                "AUTH_CHALLENGE_TTL_SECONDS ({}) exceeds AUTH_MAX_CHALLENGE_LIFETIME_SECONDS ({})",
                self.auth_challenge_ttl_seconds, self.auth_max_challenge_lifetime_seconds
            )));
        }

        if self.auth_note_tag.is_empty() || self.auth_service_name.is_empty() {
            return Err(ConfigError::InvalidValue(
                "AUTH_NOTE_TAG and AUTH_SERVICE_NAME must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Protocol constants for the verifier
    pub fn protocol_settings(&self) -> ProtocolSettings {
        ProtocolSettings {
            service_name: self.auth_service_name.clone(),
            note_tag: self.auth_note_tag.clone(),
            max_challenge_lifetime: Duration::seconds(self.auth_max_challenge_lifetime_seconds),
        }
    }

    pub fn challenge_ttl(&self) -> Duration {
        Duration::seconds(self.auth_challenge_ttl_seconds)
    }

    /// Get database URL with the password masked, for logging
    pub fn database_url_masked(&self) -> Option<String> {
        self.database_url.as_deref().map(mask_password)
    }
}

fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let prefix = &url[..colon_pos + 1];
            let suffix = &url[at_pos..];
            return format!("{}****{}", prefix, suffix);
        }
    }
    url.to_string()
}

fn parse_wallet_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
