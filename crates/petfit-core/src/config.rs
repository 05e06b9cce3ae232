use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const BACKGROUNDS: [&str; 5] = ["original", "studio", "park", "snowy", "rainy"];
pub const WEATHERS: [&str; 4] = ["clear", "cloudy", "drizzle", "snowfall"];
pub const TONES: [&str; 4] = ["neutral", "warm", "cool", "vivid"];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PetfitConfig {
    pub version: u32,
    pub server: ServerConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub style: StyleConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub base_url: String,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProgressConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StyleConfig {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_weather")]
    pub weather: String,
    #[serde(default = "default_tone")]
    pub tone: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background: default_background(),
            weather: default_weather(),
            tone: default_tone(),
        }
    }
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_timeout_ms() -> u64 {
    120_000
}

fn default_interval_ms() -> u64 {
    450
}

fn default_background() -> String {
    "studio".to_string()
}

fn default_weather() -> String {
    "clear".to_string()
}

fn default_tone() -> String {
    "neutral".to_string()
}

impl ServerConfig {
    pub fn endpoint_url(&self) -> String {
        format!("{}/api/fit_clothing", self.base_url.trim_end_matches('/'))
    }

    pub fn login_url(&self) -> String {
        if self.login_path.starts_with("http://") || self.login_path.starts_with("https://") {
            return self.login_path.clone();
        }
        let path = self.login_path.trim_start_matches('/');
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl ProgressConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve home directory for config path")]
    HomeDirectoryUnavailable,
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {message}")]
    Validation { message: String },
}

pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(base_dirs
        .home_dir()
        .join(".config")
        .join("petfit")
        .join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<PetfitConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: PetfitConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&parsed)?;
    Ok(parsed)
}

pub fn validate_config(config: &PetfitConfig) -> Result<(), ConfigError> {
    if config.version != 1 {
        return Err(validation("version must be 1"));
    }

    let base_url = config.server.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(validation(format!(
            "server.base_url must start with http:// or https://, got '{base_url}'"
        )));
    }

    if config.server.timeout_ms == 0 {
        return Err(validation("server.timeout_ms must be positive"));
    }

    if config.progress.interval_ms == 0 {
        return Err(validation("progress.interval_ms must be positive"));
    }

    check_choice("style.background", &config.style.background, &BACKGROUNDS)?;
    check_choice("style.weather", &config.style.weather, &WEATHERS)?;
    check_choice("style.tone", &config.style.tone, &TONES)?;

    Ok(())
}

fn check_choice(field: &str, value: &str, allowed: &[&str]) -> Result<(), ConfigError> {
    if allowed.contains(&value) {
        return Ok(());
    }

    Err(validation(format!(
        "{field} must be one of {}, got '{value}'",
        allowed.join("|")
    )))
}

fn validation(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}
