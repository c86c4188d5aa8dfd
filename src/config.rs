//! Application-level configuration loading: court defaults and placeholder
//! player names.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "COURTSIDE_BACK_CONFIG_PATH";
/// Courts provisioned when no configuration overrides the count.
const DEFAULT_COURT_COUNT: u16 = 4;

/// Placeholder names shown on a court before the operator enters real ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderNames {
    /// Name for the `player1` slot.
    pub player1: String,
    /// Partner name for the `player1` slot.
    pub partner1: String,
    /// Name for the `player2` slot.
    pub player2: String,
    /// Partner name for the `player2` slot.
    pub partner2: String,
}

impl Default for PlaceholderNames {
    fn default() -> Self {
        Self {
            player1: "Player 1".into(),
            partner1: "Partner 1".into(),
            player2: "Player 2".into(),
            partner2: "Partner 2".into(),
        }
    }
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    court_count: u16,
    show_reset_button: bool,
    placeholders: PlaceholderNames,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        court_count = config.court_count,
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Number of courts provisioned when the store is empty.
    pub fn court_count(&self) -> u16 {
        self.court_count
    }

    /// Whether court panels should offer the clear-court button.
    pub fn show_reset_button(&self) -> bool {
        self.show_reset_button
    }

    /// Placeholder names for freshly cleared courts.
    pub fn placeholders(&self) -> &PlaceholderNames {
        &self.placeholders
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            court_count: DEFAULT_COURT_COUNT,
            show_reset_button: true,
            placeholders: PlaceholderNames::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file.
struct RawConfig {
    court_count: Option<u16>,
    show_reset_button: Option<bool>,
    placeholders: Option<RawPlaceholders>,
}

#[derive(Debug, Deserialize)]
/// JSON representation of the placeholder names block.
struct RawPlaceholders {
    player1: Option<String>,
    partner1: Option<String>,
    player2: Option<String>,
    partner2: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        let placeholders = match value.placeholders {
            Some(raw) => {
                let base = PlaceholderNames::default();
                PlaceholderNames {
                    player1: raw.player1.unwrap_or(base.player1),
                    partner1: raw.partner1.unwrap_or(base.partner1),
                    player2: raw.player2.unwrap_or(base.player2),
                    partner2: raw.partner2.unwrap_or(base.partner2),
                }
            }
            None => defaults.placeholders.clone(),
        };

        Self {
            court_count: value.court_count.unwrap_or(defaults.court_count),
            show_reset_button: value.show_reset_button.unwrap_or(defaults.show_reset_button),
            placeholders,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_config_fills_gaps_with_defaults() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"court_count": 8, "placeholders": {"player1": "Home"}}"#)
                .unwrap();
        let config: AppConfig = raw.into();

        assert_eq!(config.court_count(), 8);
        assert!(config.show_reset_button());
        assert_eq!(config.placeholders().player1, "Home");
        assert_eq!(config.placeholders().player2, "Player 2");
    }
}
