use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub poll: PollConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the home-automation status API lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    // "text" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_timeout_ms() -> u64 {
    900
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file with environment variable substitution
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse YAML configuration text, expanding `$(VAR_NAME)` references first
    pub fn parse(content: &str) -> Result<Self> {
        let expanded = expand_env_vars(content);

        let config: Config = serde_yaml::from_str(&expanded)?;

        config.validate()?;

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let base_url = self.source.base_url.trim();
        if base_url.is_empty() {
            return Err(AppError::Config(
                "source.base_url cannot be empty".to_string(),
            ));
        }

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "source.base_url must be an http(s) URL, got {}",
                base_url
            )));
        }

        if self.source.timeout_ms == 0 {
            return Err(AppError::Config(
                "source.timeout_ms cannot be 0".to_string(),
            ));
        }

        if self.poll.interval_ms == 0 {
            return Err(AppError::Config("poll.interval_ms cannot be 0".to_string()));
        }

        if self.server.port == 0 {
            return Err(AppError::Config("Server port cannot be 0".to_string()));
        }

        match self.logging.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(AppError::Config(format!(
                "logging.format must be text or json, got {}",
                other
            ))),
        }
    }
}

/// Expand environment variables in the format $(VAR_NAME)
fn expand_env_vars(content: &str) -> String {
    let mut result = content.to_string();

    let re = regex::Regex::new(r"\$\(([A-Z_][A-Z0-9_]*)\)").unwrap();

    for cap in re.captures_iter(content) {
        let full_match = &cap[0];
        let var_name = &cap[1];

        if let Ok(value) = std::env::var(var_name) {
            result = result.replace(full_match, &value);
        }
    }

    result
}
