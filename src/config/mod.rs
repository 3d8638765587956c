use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ui::theme::ThemeName;
use crate::widget::EmbedOptions;
use crate::widget::state::WidgetVariant;

pub const DEFAULT_MEASUREMENT_ID: &str = "G-0124H40R9B";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantName {
    #[default]
    Standard,
    Scrubbable,
}

impl From<VariantName> for WidgetVariant {
    fn from(name: VariantName) -> Self {
        match name {
            VariantName::Standard => WidgetVariant::Standard,
            VariantName::Scrubbable => WidgetVariant::Scrubbable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub enabled: bool,
    pub measurement_id: String,
    pub endpoint: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            measurement_id: DEFAULT_MEASUREMENT_ID.to_string(),
            endpoint: "https://www.google-analytics.com/mp/collect".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub video_id: String,
    pub media_dir: PathBuf,
    pub variant: VariantName,
    pub player_vars: EmbedOptions,
    pub theme: ThemeName,
    pub log_level: String,
    pub analytics: AnalyticsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            video_id: String::new(),
            media_dir: default_media_dir(),
            variant: VariantName::default(),
            player_vars: EmbedOptions::default(),
            theme: ThemeName::default(),
            log_level: "info".to_string(),
            analytics: AnalyticsConfig::default(),
        }
    }
}

fn default_media_dir() -> PathBuf {
    dirs::video_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not find config directory")?
        .join("playchrome");

    Ok(config_dir.join("config.yml"))
}

pub fn parse_config(yaml: &str) -> Result<Config> {
    serde_yaml::from_str(yaml).context("Failed to parse config file")
}

/// Reads the config at `path`, writing the defaults there first if it does
/// not exist yet.
pub fn load_or_create_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let default_config = Config::default();
        let yaml =
            serde_yaml::to_string(&default_config).context("Failed to serialize default config")?;

        fs::write(path, yaml).context("Failed to write default config file")?;
        tracing::info!(path = %path.display(), "wrote default config");

        return Ok(default_config);
    }

    let config_content = fs::read_to_string(path).context("Failed to read config file")?;
    parse_config(&config_content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_takes_defaults() {
        let config = parse_config(
            "video_id: mO-qxAJwD34\nplayer_vars:\n  autoplay: 1\n  mute: 1\n",
        )
        .unwrap();

        assert_eq!(config.video_id, "mO-qxAJwD34");
        assert!(config.player_vars.autoplay());
        assert!(config.player_vars.start_muted());
        assert!(!config.player_vars.engine_controls());
        assert_eq!(config.player_vars.width, EmbedOptions::default().width);
        assert_eq!(config.variant, VariantName::Standard);
        assert_eq!(config.log_level, "info");
        assert!(!config.analytics.enabled);
        assert_eq!(config.analytics.measurement_id, DEFAULT_MEASUREMENT_ID);
    }

    #[test]
    fn test_variant_and_theme_names() {
        let config = parse_config("variant: scrubbable\ntheme: tokyo_night\n").unwrap();
        assert_eq!(config.variant, VariantName::Scrubbable);
        assert_eq!(config.theme, ThemeName::TokyoNight);
        assert_eq!(WidgetVariant::from(config.variant), WidgetVariant::Scrubbable);
    }

    #[test]
    fn test_unknown_variant_is_rejected() {
        assert!(parse_config("variant: cinema\n").is_err());
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let dir = std::env::temp_dir().join(format!("playchrome-config-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("config.yml");

        let created = load_or_create_config(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created, Config::default());

        fs::write(&path, "video_id: abc\n").unwrap();
        let reloaded = load_or_create_config(&path).unwrap();
        assert_eq!(reloaded.video_id, "abc");

        fs::remove_dir_all(&dir).unwrap();
    }
}
