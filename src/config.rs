// src/config.rs
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use crate::errors::{EvalError, Result};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Configuration for the Gemini provider.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_base: String,
    /// May be empty when a proxy in front of the API injects the key.
    pub api_key: String,
    pub model: String,
    /// Per-request timeout. Unset means a single call is only bounded by the retry cap.
    pub timeout_secs: Option<u64>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: None,
        }
    }
}

/// Retry behavior for calls to the scoring endpoint.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 5, base_delay_ms: 1000 }
    }
}

/// Session options handed to the controller at construction.
/// They are carried for the hosting environment and never used for scoring.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub app_id: String,
    pub firebase_config: Option<serde_json::Value>,
    pub initial_auth_token: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            app_id: "default-app-id".to_string(),
            firebase_config: None,
            initial_auth_token: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080 }
    }
}

/// High-level application configuration.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub retry: RetryConfig,
    pub session: SessionConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration: the TOML file named by `RELEVANCE_CONFIG` if set,
    /// then environment variables on top.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("RELEVANCE_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay values from `lookup` (normally the process environment).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.gemini.api_key = key;
        }
        if let Some(base) = lookup("GEMINI_API_BASE") {
            self.gemini.api_base = base;
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(raw) = lookup("GEMINI_TIMEOUT_SECS") {
            self.gemini.timeout_secs = Some(parse_var("GEMINI_TIMEOUT_SECS", &raw)?);
        }
        if let Some(raw) = lookup("RETRY_MAX_ATTEMPTS") {
            self.retry.max_attempts = parse_var("RETRY_MAX_ATTEMPTS", &raw)?;
        }
        if let Some(raw) = lookup("RETRY_BASE_DELAY_MS") {
            self.retry.base_delay_ms = parse_var("RETRY_BASE_DELAY_MS", &raw)?;
        }
        if let Some(app_id) = lookup("APP_ID") {
            self.session.app_id = app_id;
        }
        if let Some(raw) = lookup("FIREBASE_CONFIG") {
            let value: serde_json::Value = serde_json::from_str(&raw)?;
            self.session.firebase_config = Some(value);
        }
        if let Some(token) = lookup("INITIAL_AUTH_TOKEN") {
            self.session.initial_auth_token = Some(token);
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(raw) = lookup("PORT") {
            self.server.port = parse_var("PORT", &raw)?;
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(EvalError::Config("retry.max_attempts must be at least 1".to_string()));
        }
        if self.gemini.model.trim().is_empty() {
            return Err(EvalError::Config("gemini.model must not be empty".to_string()));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| EvalError::Config(format!("{} has an invalid value: '{}'", name, raw)))
}
