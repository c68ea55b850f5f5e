//! Configuration management for hitmerge
//!
//! Loads the TOML configuration, applies profile and environment overrides
//! and validates the result before handing it to the search pipeline.

use crate::display::SettingsProvider;
use crate::error::{HitmergeError, Result};
use crate::retrieval::SearchType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

mod validator;

pub use validator::ConfigValidator;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta")]
    pub meta: MetaConfig,
    pub search: SearchConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub profiles: HashMap<String, ProfileOverrides>,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Search pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// When false, every request is handed back to the legacy engine
    pub bucketed_search_enabled: bool,
    /// Result cap used when the caller gives none
    pub default_limit: usize,
    pub default_type: SearchType,
}

/// Result display settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_icon: Option<String>,
}

/// Caller view options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub show_hidden_items: bool,
}

/// Profile-specific configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucketed_search_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_hidden_items: Option<bool>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HitmergeError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| HitmergeError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| HitmergeError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Load configuration with a specific profile applied
    pub fn load_with_profile(path: &Path, profile: &str) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_profile(profile)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Apply a profile's overrides to the configuration
    pub fn apply_profile(&mut self, profile: &str) -> Result<()> {
        let Some(overrides) = self.profiles.get(profile).cloned() else {
            return Err(HitmergeError::Config(format!("Unknown profile: {}", profile)));
        };

        if let Some(enabled) = overrides.bucketed_search_enabled {
            self.search.bucketed_search_enabled = enabled;
        }
        if let Some(limit) = overrides.default_limit {
            self.search.default_limit = limit;
        }
        if let Some(icon) = overrides.default_icon {
            self.display.default_icon = Some(icon);
        }
        if let Some(show) = overrides.show_hidden_items {
            self.view.show_hidden_items = show;
        }
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: HITMERGE_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix("HITMERGE_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "SEARCH__BUCKETED_SEARCH_ENABLED" => {
                self.search.bucketed_search_enabled = parse_env(path, value, "boolean")?;
            }
            "SEARCH__DEFAULT_LIMIT" => {
                self.search.default_limit = parse_env(path, value, "integer")?;
            }
            "SEARCH__DEFAULT_TYPE" => {
                self.search.default_type = value.parse::<SearchType>().map_err(|message| {
                    HitmergeError::InvalidConfigValue {
                        path: path.to_string(),
                        message,
                    }
                })?;
            }
            "DISPLAY__DEFAULT_ICON" => {
                self.display.default_icon = Some(value.to_string());
            }
            "VIEW__SHOW_HIDDEN_ITEMS" => {
                self.view.show_hidden_items = parse_env(path, value, "boolean")?;
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            HitmergeError::Config("Cannot determine config directory".to_string())
        })?;

        Ok(config_dir.join("hitmerge").join("config.toml"))
    }
}

fn parse_env<T: std::str::FromStr>(path: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| HitmergeError::InvalidConfigValue {
            path: path.to_string(),
            message: format!("Cannot parse '{}' as {}", value, kind),
        })
}

impl SettingsProvider for Config {
    fn default_icon(&self) -> Option<String> {
        self.display
            .default_icon
            .as_deref()
            .map(str::trim)
            .filter(|icon| !icon.is_empty())
            .map(str::to_owned)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            meta: MetaConfig {
                schema_version: "1.0.0".to_string(),
                created_at: current_timestamp(),
                last_modified: current_timestamp(),
            },
            search: SearchConfig {
                bucketed_search_enabled: true,
                default_limit: 100,
                default_type: SearchType::Classic,
            },
            display: DisplayConfig {
                default_icon: Some("Applications/16x16/document.png".to_string()),
            },
            view: ViewConfig {
                show_hidden_items: false,
            },
            profiles: HashMap::new(),
        }
    }
}
