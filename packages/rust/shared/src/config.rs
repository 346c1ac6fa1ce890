//! Application configuration for WiseWays.
//!
//! User config lives at `~/.wiseways/wiseways.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WiseWaysError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "wiseways.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".wiseways";

// ---------------------------------------------------------------------------
// Config structs (matching wiseways.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Link generation tuning.
    #[serde(default)]
    pub linking: LinkingConfig,

    /// Thinking-room detection tuning.
    #[serde(default)]
    pub rooms: RoomsConfig,
}

/// `[linking]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkingConfig {
    /// Minimum combined weight for a candidate edge.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Maximum edges kept per source question.
    #[serde(default = "default_max_per_node")]
    pub max_per_node: usize,
}

impl Default for LinkingConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            max_per_node: default_max_per_node(),
        }
    }
}

fn default_threshold() -> f64 {
    0.2
}
fn default_max_per_node() -> usize {
    8
}

/// What happens to room participants when rooms are regenerated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantPolicy {
    /// Every regenerated room is a brand-new entity with no participants.
    #[default]
    Drop,
    /// A regenerated room that contains most of an old room's members keeps
    /// the old room's id, creation time and participants.
    CarryOver,
}

/// `[rooms]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomsConfig {
    /// Links must be strictly heavier than this to pull a neighbour into a room.
    #[serde(default = "default_strong_link_threshold")]
    pub strong_link_threshold: f64,

    /// Number of common terms joined into a room theme.
    #[serde(default = "default_theme_terms")]
    pub theme_terms: usize,

    /// Character cap for the fallback theme.
    #[serde(default = "default_theme_fallback_chars")]
    pub theme_fallback_chars: usize,

    /// Participant handling across regenerations.
    #[serde(default)]
    pub participant_policy: ParticipantPolicy,
}

impl Default for RoomsConfig {
    fn default() -> Self {
        Self {
            strong_link_threshold: default_strong_link_threshold(),
            theme_terms: default_theme_terms(),
            theme_fallback_chars: default_theme_fallback_chars(),
            participant_policy: ParticipantPolicy::default(),
        }
    }
}

fn default_strong_link_threshold() -> f64 {
    0.45
}
fn default_theme_terms() -> usize {
    5
}
fn default_theme_fallback_chars() -> usize {
    100
}

// ---------------------------------------------------------------------------
// Runtime configs (merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime link generation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkConfig {
    pub threshold: f64,
    pub max_per_node: usize,
}

impl LinkConfig {
    pub fn new(threshold: f64, max_per_node: usize) -> Self {
        Self {
            threshold,
            max_per_node,
        }
    }

    /// Reject thresholds that would make every comparison meaningless.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(WiseWaysError::invalid_input(format!(
                "link threshold must be a finite non-negative number, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for LinkConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            threshold: config.linking.threshold,
            max_per_node: config.linking.max_per_node,
        }
    }
}

/// Runtime room detection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomConfig {
    pub strong_link_threshold: f64,
    pub theme_terms: usize,
    pub theme_fallback_chars: usize,
    pub participant_policy: ParticipantPolicy,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for RoomConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            strong_link_threshold: config.rooms.strong_link_threshold,
            theme_terms: config.rooms.theme_terms,
            theme_fallback_chars: config.rooms.theme_fallback_chars,
            participant_policy: config.rooms.participant_policy,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.wiseways/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| WiseWaysError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.wiseways/wiseways.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| WiseWaysError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| WiseWaysError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| WiseWaysError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| WiseWaysError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| WiseWaysError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("max_per_node"));
        assert!(toml_str.contains("participant_policy = \"drop\""));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[linking]
threshold = 0.35

[rooms]
participant_policy = "carry_over"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.linking.threshold, 0.35);
        assert_eq!(config.linking.max_per_node, 8);
        assert_eq!(config.rooms.strong_link_threshold, 0.45);
        assert_eq!(config.rooms.participant_policy, ParticipantPolicy::CarryOver);
    }

    #[test]
    fn runtime_configs_from_app_config() {
        let app = AppConfig::default();
        let links = LinkConfig::from(&app);
        assert_eq!(links.threshold, 0.2);
        assert_eq!(links.max_per_node, 8);

        let rooms = RoomConfig::from(&app);
        assert_eq!(rooms.theme_terms, 5);
        assert_eq!(rooms.theme_fallback_chars, 100);
    }

    #[test]
    fn link_config_validation() {
        assert!(LinkConfig::new(0.2, 8).validate().is_ok());
        assert!(LinkConfig::new(0.0, 0).validate().is_ok());
        assert!(LinkConfig::new(f64::NAN, 8).validate().is_err());
        assert!(LinkConfig::new(-0.1, 8).validate().is_err());
    }

    #[test]
    fn load_config_from_missing_file_is_io_error() {
        let err = load_config_from(Path::new("/nonexistent/wiseways.toml")).unwrap_err();
        assert!(matches!(err, WiseWaysError::Io { .. }));
    }
}
