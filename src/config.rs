// Configuration File Support
//
// This module provides configuration file parsing for the Godot gateway.
// Supports TOML format with environment variable overrides.
// Configuration files are loaded from the XDG config directory: ~/.config/godot-gateway/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the engine binary
pub const ENGINE_PATH_ENV: &str = "GODOT_PATH";

/// Environment variable toggling the engine debug flag
pub const DEBUG_ENV: &str = "GODOT_GATEWAY_DEBUG";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Engine invocation configuration
    pub engine: EngineConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl LoggingConfig {
    /// Convert log level string to tracing::Level
    pub fn log_level(&self) -> Result<tracing::Level> {
        self.level
            .to_lowercase()
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse log level: {}", e))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine binary; discovered automatically when unset
    pub path: Option<String>,

    /// Script the engine runs to dispatch operations
    pub script_path: String,

    /// Append `--debug-godot` to every invocation
    pub debug: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: None,
            script_path: "./scripts/godot_operations.gd".to_string(),
            debug: false,
        }
    }
}

impl Config {
    /// Load configuration from the default XDG config directory
    ///
    /// If the config file does not exist, returns default configuration
    /// (with environment overrides applied).
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed, or if
    /// the resulting configuration is invalid.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file from {:?}", path))?;

            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file from {:?}", path))?;

            tracing::info!("Loaded configuration from {:?}", path);
            config
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            Self::default()
        };

        let config = config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path
    ///
    /// Returns `~/.config/godot-gateway/config.toml` on Linux
    pub fn config_path() -> PathBuf {
        if let Some(proj_dirs) = directories::ProjectDirs::from("org", "godot-gateway", "godot-gateway")
        {
            proj_dirs.config_dir().join("config.toml")
        } else {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home)
                .join(".config")
                .join("godot-gateway")
                .join("config.toml")
        }
    }

    /// Apply environment variable overrides to the configuration
    ///
    /// Environment variables take precedence over config file values:
    /// - GODOT_GATEWAY_LOG_LEVEL
    /// - GODOT_GATEWAY_LOG_FORMAT
    /// - GODOT_PATH
    /// - GODOT_GATEWAY_SCRIPT_PATH
    /// - GODOT_GATEWAY_DEBUG
    fn apply_env_overrides(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("GODOT_GATEWAY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("GODOT_GATEWAY_LOG_FORMAT") {
            self.logging.format = format;
        }

        if let Some(path) = lookup(ENGINE_PATH_ENV) {
            if !path.trim().is_empty() {
                self.engine.path = Some(path);
            }
        }
        if let Some(script) = lookup("GODOT_GATEWAY_SCRIPT_PATH") {
            self.engine.script_path = script;
        }
        if let Some(debug) = lookup(DEBUG_ENV) {
            self.engine.debug = debug.parse().unwrap_or(self.engine.debug);
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            ),
        }

        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" | "compact" => {}
            _ => anyhow::bail!(
                "Invalid log format: {}. Must be one of: json, pretty, compact",
                self.logging.format
            ),
        }

        if self.engine.script_path.trim().is_empty() {
            anyhow::bail!("Engine script path must not be empty");
        }

        Ok(())
    }
}
