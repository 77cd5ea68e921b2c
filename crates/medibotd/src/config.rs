//! Configuration management for medibotd.
//!
//! Loads settings from a TOML file or uses defaults. The configuration is
//! built once at startup and handed to each adapter; nothing reads it from
//! global state afterwards.

use anyhow::{Context, Result};
use medibot_common::LlmError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// System-wide config file path
pub const CONFIG_PATH: &str = "/etc/medibot/config.toml";

/// Environment variable naming an alternative config file
pub const CONFIG_ENV: &str = "MEDIBOT_CONFIG";

/// Environment variable overriding the listen port
pub const PORT_ENV: &str = "PORT";

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allow cross-origin requests from any origin (browser front-ends)
    #[serde(default = "default_cors_permissive")]
    pub cors_permissive: bool,

    /// Maximum accepted request body in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_permissive() -> bool {
    true
}

fn default_body_limit() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_permissive: default_cors_permissive(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Exchange store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("medical_chat.db")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Generation endpoint (Ollama-style `/api/generate`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_generation_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_generation_model")]
    pub model: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_generation_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_generation_model() -> String {
    "medibot:latest".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_generation_endpoint(),
            model: default_generation_model(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Evaluation endpoint (Gemini-style `generateContent`).
///
/// The API key is never part of the file: `api_key_env` names the environment
/// variable it is read from at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default = "default_evaluation_enabled")]
    pub enabled: bool,

    #[serde(default = "default_evaluation_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_evaluation_model")]
    pub model: String,

    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_evaluation_enabled() -> bool {
    true
}

fn default_evaluation_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_evaluation_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            enabled: default_evaluation_enabled(),
            endpoint: default_evaluation_endpoint(),
            model: default_evaluation_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout(),
        }
    }
}

impl EvaluationConfig {
    /// Read the credential from the configured environment variable
    pub fn api_key(&self) -> Result<String, LlmError> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingCredential(self.api_key_env.clone()))
    }
}

/// Complete daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

impl Config {
    /// Resolve configuration at startup.
    ///
    /// An explicit path must load; otherwise `MEDIBOT_CONFIG`, then
    /// `/etc/medibot/config.toml`, then defaults. `PORT` overrides the port.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_from_path(path)?,
            None => Self::load_default(std::env::var(CONFIG_ENV).ok()),
        };
        config.apply_port_override(std::env::var(PORT_ENV).ok());
        Ok(config)
    }

    /// Config file to try when no explicit path is given
    pub fn default_path(config_env: Option<String>) -> PathBuf {
        config_env
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_PATH))
    }

    fn load_default(config_env: Option<String>) -> Self {
        let candidate = Self::default_path(config_env);
        Self::load_from_path(&candidate).unwrap_or_else(|e| {
            warn!("Config not found, using defaults: {:#}", e);
            Config::default()
        })
    }

    /// Apply the `PORT` value if it parses; invalid values are ignored
    pub fn apply_port_override(&mut self, port: Option<String>) {
        let Some(port) = port else {
            return;
        };
        match port.trim().parse::<u16>() {
            Ok(port) => self.server.port = port,
            Err(_) => warn!("Ignoring invalid {} value: {}", PORT_ENV, port),
        }
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
