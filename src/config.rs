//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/bananasplits/bananasplits.toml`
//! 3. Explicit config file (`--config <file>`)
//! 4. Environment variables: `BANANASPLITS_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{Percentage, SplitPolicy};

/// Identity stamped onto every split created in a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CreatorConfig {
    pub id: String,
    pub name: String,
}

impl Default for CreatorConfig {
    fn default() -> Self {
        Self {
            id: "1".into(),
            name: "John Doe".into(),
        }
    }
}

/// How split and member identifiers are minted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdStyle {
    /// `s1`, `s2`, ... for splits and `m1`, `m2`, ... for members
    #[default]
    Sequential,
    /// Random v4 UUIDs
    Uuid,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawCreatorConfig {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub default_creator_percentage: Option<u8>,
    pub backdate_window_days: Option<u32>,
    pub enforce_backdate_window: Option<bool>,
    pub allow_duplicate_emails: Option<bool>,
    pub max_members: Option<usize>,
    pub id_style: Option<IdStyle>,
    pub creator: RawCreatorConfig,
}

/// Unified configuration for bananasplits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Creator share a fresh create form starts with
    pub default_creator_percentage: u8,
    /// How many days a start date may be backdated
    pub backdate_window_days: u32,
    pub enforce_backdate_window: bool,
    pub allow_duplicate_emails: bool,
    /// Subscription tier member cap (unset = unlimited)
    pub max_members: Option<usize>,
    pub id_style: IdStyle,
    pub creator: CreatorConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_creator_percentage: 50,
            backdate_window_days: 45,
            enforce_backdate_window: true,
            allow_duplicate_emails: false,
            max_members: None,
            id_style: IdStyle::default(),
            creator: CreatorConfig::default(),
        }
    }
}

/// Get the XDG config directory for bananasplits.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bananasplits").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("bananasplits.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Commit-time rules derived from these settings.
    pub fn policy(&self) -> SplitPolicy {
        SplitPolicy {
            backdate_window_days: self
                .enforce_backdate_window
                .then_some(self.backdate_window_days),
            allow_duplicate_emails: self.allow_duplicate_emails,
            max_members: self.max_members,
        }
    }

    pub fn default_creator_percentage(&self) -> Percentage {
        Percentage::new(u64::from(self.default_creator_percentage))
    }

    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            default_creator_percentage: overlay
                .default_creator_percentage
                .unwrap_or(self.default_creator_percentage),
            backdate_window_days: overlay
                .backdate_window_days
                .unwrap_or(self.backdate_window_days),
            enforce_backdate_window: overlay
                .enforce_backdate_window
                .unwrap_or(self.enforce_backdate_window),
            allow_duplicate_emails: overlay
                .allow_duplicate_emails
                .unwrap_or(self.allow_duplicate_emails),
            max_members: overlay.max_members.or(self.max_members),
            id_style: overlay.id_style.unwrap_or(self.id_style),
            creator: CreatorConfig {
                id: overlay
                    .creator
                    .id
                    .clone()
                    .unwrap_or_else(|| self.creator.id.clone()),
                name: overlay
                    .creator
                    .name
                    .clone()
                    .unwrap_or_else(|| self.creator.name.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist when given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.check()?;

        Ok(current)
    }

    /// Load from defaults plus a single file, ignoring global config and env vars.
    pub fn from_file(path: &Path) -> Result<Self, ApplicationError> {
        let raw = load_raw_settings(path)?;
        let settings = Self::default().merge_with(&raw);
        settings.check()?;
        Ok(settings)
    }

    /// Apply BANANASPLITS_* environment variables as explicit overrides.
    ///
    /// Nested keys use a double underscore: `BANANASPLITS_CREATOR__NAME`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("BANANASPLITS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(&config, "default_creator_percentage")? {
            settings.default_creator_percentage = val;
        }
        if let Some(val) = env_value(&config, "backdate_window_days")? {
            settings.backdate_window_days = val;
        }
        if let Some(val) = env_value(&config, "enforce_backdate_window")? {
            settings.enforce_backdate_window = val;
        }
        if let Some(val) = env_value(&config, "allow_duplicate_emails")? {
            settings.allow_duplicate_emails = val;
        }
        if let Some(val) = env_value(&config, "max_members")? {
            settings.max_members = Some(val);
        }
        if let Some(val) = env_value(&config, "id_style")? {
            settings.id_style = val;
        }
        if let Some(val) = env_value(&config, "creator.id")? {
            settings.creator.id = val;
        }
        if let Some(val) = env_value(&config, "creator.name")? {
            settings.creator.name = val;
        }

        Ok(settings)
    }

    fn check(&self) -> Result<(), ApplicationError> {
        if self.default_creator_percentage > 100 {
            return Err(ApplicationError::Config {
                message: format!(
                    "default_creator_percentage must be within 0..=100, got {}",
                    self.default_creator_percentage
                ),
            });
        }
        if self.creator.name.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "creator.name must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# bananasplits configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/bananasplits/bananasplits.toml
#   File:   --config <file>
#   Env:    BANANASPLITS_* environment variables (nested: BANANASPLITS_CREATOR__NAME)

# Creator share a new split starts with
# default_creator_percentage = 50

# Start dates may be backdated by this many days
# backdate_window_days = 45
# enforce_backdate_window = true

# Allow the same member email twice in one split
# allow_duplicate_emails = false

# Member cap from the subscription tier (Green: 3, Ripe: 20, Golden: unset)
# max_members = 3

# Identifier style: "sequential" (s1, m1, ...) or "uuid"
# id_style = "sequential"

[creator]
# id = "1"
# name = "John Doe"
"#
        .to_string()
    }
}

/// Read one override; unset is `None`, a value that does not parse is an error.
fn env_value<T: DeserializeOwned>(
    config: &Config,
    key: &str,
) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(ApplicationError::Config {
            message: format!(
                "BANANASPLITS_{}: {}",
                key.to_uppercase().replace('.', "__"),
                e
            ),
        }),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
