//! Application Configuration
//!
//! User settings and preferences stored in TOML format.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::vision::Zoom;

/// File name inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// OCR service connection
    pub server: ServerConfig,
    /// Look and feel
    pub ui: UiConfig,
    /// Where exported files go
    pub export: ExportConfig,
}

/// OCR service connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL the API paths are joined onto
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Query the health endpoint when the window opens
    pub check_health_on_start: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 60,
            check_health_on_start: true,
        }
    }
}

impl ServerConfig {
    /// Timeout as a duration, never zero
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Light or dark palette
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

/// Look and feel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub theme: ThemeMode,
    /// How long a toast stays visible
    pub notification_secs: u64,
    /// Zoom of the visualization tab for each new result
    pub initial_zoom: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Light,
            notification_secs: 6,
            initial_zoom: 1.0,
        }
    }
}

impl UiConfig {
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_secs.max(1))
    }

    /// Initial zoom clamped into the allowed range
    pub fn zoom(&self) -> Zoom {
        Zoom::new(self.initial_zoom)
    }
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Target directory; unset means the Downloads folder
    pub directory: Option<PathBuf>,
    /// Indent JSON exports
    pub pretty_json: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            pretty_json: true,
        }
    }
}

impl ExportConfig {
    pub fn resolved_directory(&self) -> PathBuf {
        self.directory
            .clone()
            .unwrap_or_else(crate::storage::default_export_dir)
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Load configuration, falling back to defaults when the file is missing or
/// broken. A missing file is created with the defaults.
pub fn load_or_default(path: &Path) -> AppConfig {
    if !path.exists() {
        let config = AppConfig::default();
        match save_config(&config, path) {
            Ok(()) => info!("Wrote default configuration to {:?}", path),
            Err(e) => warn!("Could not write default configuration: {:#}", e),
        }
        return config;
    }

    match load_config(path) {
        Ok(config) => {
            info!("Loaded configuration from {:?}", path);
            config
        }
        Err(e) => {
            warn!("{:#}; using defaults", e);
            AppConfig::default()
        }
    }
}

/// Default location of the configuration file
pub fn default_config_path() -> Result<PathBuf> {
    Ok(crate::storage::get_config_dir()?.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        // Check server defaults
        assert_eq!(config.server.base_url, "http://localhost:5000");
        assert_eq!(config.server.timeout_secs, 60);
        assert!(config.server.check_health_on_start);

        // Check ui defaults
        assert_eq!(config.ui.theme, ThemeMode::Light);
        assert_eq!(config.ui.notification_secs, 6);
        assert!((config.ui.initial_zoom - 1.0).abs() < f32::EPSILON);

        // Check export defaults
        assert!(config.export.directory.is_none());
        assert!(config.export.pretty_json);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = AppConfig::default();
        config.server.base_url = "http://ocr.internal:8080".to_string();
        config.ui.theme = ThemeMode::Dark;
        config.export.directory = Some(PathBuf::from("/tmp/exports"));

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("theme = \"dark\""));

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: AppConfig = toml::from_str("[server]\ntimeout_secs = 15\n").unwrap();
        assert_eq!(parsed.server.timeout_secs, 15);
        assert_eq!(parsed.server.base_url, "http://localhost:5000");
        assert_eq!(parsed.ui, UiConfig::default());
    }

    #[test]
    fn test_zero_values_are_clamped() {
        let mut config = AppConfig::default();
        config.server.timeout_secs = 0;
        config.ui.notification_secs = 0;
        config.ui.initial_zoom = 10.0;

        assert_eq!(config.server.timeout(), Duration::from_secs(1));
        assert_eq!(config.ui.notification_ttl(), Duration::from_secs(1));
        assert!((config.ui.zoom().factor() - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_save_and_load_config() {
        let config = AppConfig::default();

        let temp_file = NamedTempFile::new().unwrap();
        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_recovers() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[ui]\ntheme = \"purple\"").unwrap();
        assert_eq!(load_or_default(temp_file.path()), AppConfig::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert_eq!(load_or_default(&path), AppConfig::default());
        assert!(path.exists());
    }
}
