use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "eligibility.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub toast_ttl_secs: u64,
    pub toast_limit: usize,
}

/// One input of the eligibility check form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub key: String,
    pub placeholder: String,
}

impl FieldSpec {
    pub fn new(key: &str, placeholder: &str) -> Self {
        Self {
            key: key.to_string(),
            placeholder: placeholder.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityConfig {
    pub api: ApiConfig,
    pub ui: UiConfig,
    pub fields: Vec<FieldSpec>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            toast_ttl_secs: 5,
            toast_limit: 3,
        }
    }
}

const MIN_TOAST_TTL_SECS: u64 = 1;

impl UiConfig {
    /// How long a toast stays visible. Never shorter than one second.
    pub fn toast_ttl(&self) -> Duration {
        Duration::from_secs(self.toast_ttl_secs.max(MIN_TOAST_TTL_SECS))
    }
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        EligibilityConfig {
            api: ApiConfig::default(),
            ui: UiConfig::default(),
            fields: vec![
                FieldSpec::new("age", "Enter age"),
                FieldSpec::new("salary", "Enter salary"),
                FieldSpec::new("department", "Enter department"),
            ],
        }
    }
}

impl EligibilityConfig {
    /// Load configuration with environment variable overrides.
    ///
    /// An explicit `path` must exist; without one, `eligibility.toml` in the
    /// working directory is used when present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from_file(default_path)?
                } else {
                    log::debug!("{} not found, using defaults", DEFAULT_CONFIG_FILE);
                    EligibilityConfig::default()
                }
            }
        };

        config.apply_env_overrides();
        config.warn_on_clamped_values();
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn warn_on_clamped_values(&self) {
        if self.ui.toast_ttl_secs < MIN_TOAST_TTL_SECS {
            log::warn!(
                "ui.toast_ttl_secs={} is too short, using {}",
                self.ui.toast_ttl_secs,
                MIN_TOAST_TTL_SECS
            );
        }
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("ELIGIBILITY_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = lookup("ELIGIBILITY_API_TIMEOUT") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => log::warn!("Ignoring ELIGIBILITY_API_TIMEOUT={}", timeout),
            }
        }
    }
}
