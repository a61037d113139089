//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use visaid::{VisaidError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for VisaidError {
    fn from(err: ConfigError) -> Self {
        VisaidError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (visaid/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed or fails validation
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, VisaidError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("visaid/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "visaid", "visaid") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load and validate configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, VisaidError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Result<AppConfig, VisaidError> {
    let config: AppConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate().map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.render().wait_timeout(), Duration::from_secs(10));
        assert_eq!(config.theme().name(), "default");
    }

    #[test]
    fn test_partial_sections_override_defaults() {
        let config = parse_config(
            r##"
            [render]
            wait_timeout_secs = 3
            margin_height = 50

            [browser]
            executable = "/opt/chromium/chrome"
            args = ["--lang=en-US"]

            [theme]
            name = "neutral"

            [theme.variables]
            primaryColor = "#fafafa"

            [generator]
            model = "local-model"
            endpoint = "http://localhost:8080/v1"
            "##,
        )
        .unwrap();

        assert_eq!(config.render().wait_timeout(), Duration::from_secs(3));
        assert_eq!(config.render().margin_height(), 50);
        assert_eq!(config.render().margin_width(), 40);
        assert_eq!(
            config.browser().executable(),
            Some(Path::new("/opt/chromium/chrome"))
        );
        assert_eq!(config.browser().args(), ["--lang=en-US".to_string()]);
        assert_eq!(config.theme().name(), "neutral");
        assert_eq!(config.theme().curve(), "basis");
        assert_eq!(config.theme().variables().len(), 1);
        assert_eq!(config.generator().model(), "local-model");
        assert_eq!(config.generator().api_key_env(), "OPENAI_API_KEY");
    }

    #[test]
    fn test_invalid_color_fails_validation() {
        let result = parse_config(
            r#"
            [theme.variables]
            lineColor = "nope"
            "#,
        );
        assert!(matches!(result, Err(VisaidError::Config(msg)) if msg.contains("lineColor")));
    }

    #[test]
    fn test_malformed_toml() {
        let result = parse_config("[render\nwait_timeout_secs = ");
        assert!(matches!(result, Err(VisaidError::Config(msg)) if msg.starts_with("Failed to parse")));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempdir().unwrap();
        let result = load_config(Some(dir.path().join("absent.toml")));
        assert!(matches!(result, Err(VisaidError::Config(msg)) if msg.contains("absent.toml")));
    }

    #[test]
    fn test_explicit_file_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[render]\nmargin_width = 10\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.render().margin_width(), 10);
    }
}
