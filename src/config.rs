/// Application configuration
///
/// A small JSON file in the user's config directory:
/// - Linux: ~/.config/notebook-gallery/config.json
/// - macOS: ~/Library/Application Support/notebook-gallery/config.json
/// - Windows: %APPDATA%\notebook-gallery\config.json
///
/// Created with defaults on first run. `GALLERY_CATALOG_URL` overrides the
/// catalog URL for the current session without touching the file.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the notebook catalog service
    pub catalog_url: String,
    /// Base URL of the standalone notebook viewer pages
    pub viewer_url: String,
    /// Show the public gallery and published-work tabs when no embedding
    /// host is present to decide
    pub publish_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            catalog_url: "http://localhost:8085".to_string(),
            viewer_url: "http://localhost:8085".to_string(),
            publish_enabled: true,
        }
    }
}

impl Config {
    /// Load the config file, creating it with defaults on first run.
    pub fn load() -> Self {
        let path = Self::config_path();
        let mut config = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => config,
                Err(err) => {
                    warn!("Unreadable config at {}: {err}", path.display());
                    Config::default()
                }
            },
            Err(_) => {
                let config = Config::default();
                config.save(&path);
                info!("Created default config at {}", path.display());
                config
            }
        };

        if let Ok(url) = std::env::var("GALLERY_CATALOG_URL") {
            config.catalog_url = url;
        }

        config
    }

    fn save(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                warn!("Failed to create config directory: {err}");
                return;
            }
        }

        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(err) = fs::write(path, json) {
                    warn!("Failed to write config to {}: {err}", path.display());
                }
            }
            Err(err) => warn!("Failed to serialize config: {err}"),
        }
    }

    fn config_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .expect("Could not determine user config directory");

        path.push("notebook-gallery");
        path.push("config.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.publish_enabled);
        assert!(!config.catalog_url.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let config = Config {
            catalog_url: "https://catalog.example.com".to_string(),
            viewer_url: "https://viewer.example.com".to_string(),
            publish_enabled: false,
        };

        let json = serde_json::to_string(&config).unwrap();
        let restored: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let parsed: Config =
            serde_json::from_str(r#"{"catalog_url": "https://catalog.example.com"}"#).unwrap();

        assert_eq!(parsed.catalog_url, "https://catalog.example.com");
        assert_eq!(parsed.viewer_url, Config::default().viewer_url);
        assert!(parsed.publish_enabled);
    }
}
