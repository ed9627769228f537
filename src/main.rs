//! OCR Scanner - desktop client for an OCR web service
//!
//! Stage images, send them to the service and inspect the recognized text,
//! word boxes and per-file batch outcomes.

mod api;
mod app;
mod config;
mod dashboard;
mod shared;
mod storage;
mod upload;
mod vision;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ThemeMode};
use crate::dashboard::Theme;

/// OCR Scanner - extract text from images with an OCR service
#[derive(Parser, Debug)]
#[command(name = "ocr-scanner")]
#[command(about = "Desktop client for an OCR web service")]
struct Args {
    /// Images to stage on startup
    files: Vec<PathBuf>,

    /// Base URL of the OCR service
    #[arg(long)]
    server_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Directory exported files are written to
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Configuration file to use instead of the platform default
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Colour theme
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,
}

impl Args {
    /// Command line values win over the configuration file
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(url) = &self.server_url {
            config.server.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.server.timeout_secs = secs;
        }
        if let Some(dir) = &self.export_dir {
            config.export.directory = Some(dir.clone());
        }
        if let Some(theme) = self.theme {
            config.ui.theme = theme;
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("OCR Scanner starting...");

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => config::default_config_path()?,
    };
    let mut config = config::load_or_default(&config_path);
    args.apply_to(&mut config);

    info!("Using OCR service at {}", config.server.base_url);

    let theme = Theme::from_mode(config.ui.theme);

    // Run the dashboard (blocking)
    if let Err(e) = dashboard::run_dashboard(config, theme, args.files) {
        error!("Dashboard error: {}", e);
    }

    info!("OCR Scanner shutdown complete");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_files_and_flags() {
        let args = Args::try_parse_from([
            "ocr-scanner",
            "--server-url",
            "http://ocr.lan:9000",
            "--theme",
            "dark",
            "a.png",
            "b.jpg",
        ])
        .unwrap();

        assert_eq!(args.files, vec![PathBuf::from("a.png"), PathBuf::from("b.jpg")]);
        assert_eq!(args.server_url.as_deref(), Some("http://ocr.lan:9000"));
        assert_eq!(args.theme, Some(ThemeMode::Dark));
        assert!(args.config.is_none());
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let args = Args::try_parse_from([
            "ocr-scanner",
            "--timeout-secs",
            "5",
            "--export-dir",
            "/tmp/out",
        ])
        .unwrap();
        let mut config = AppConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config.server.timeout_secs, 5);
        assert_eq!(config.export.directory, Some(PathBuf::from("/tmp/out")));
        // Untouched values keep their defaults
        assert_eq!(config.server.base_url, "http://localhost:5000");
        assert_eq!(config.ui.theme, ThemeMode::Light);
    }
}
