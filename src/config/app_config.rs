use std::env;
use std::io;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tokio_native_tls::TlsConnector as TokioTlsConnector;

use super::model::Settings;

const DEFAULT_CONFIG_FILE: &str = "sitecheck.yml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Load the application settings.
/// Reads an optional `.env` file, then the YAML file named by the `CONFIG_FILE`
/// environment variable (`sitecheck.yml` by default). A missing file means defaults;
/// an unreadable or invalid one is logged and also falls back to defaults.
pub fn load_config() -> Settings {
    if let Err(e) = dotenvy::dotenv() {
        log::debug!("No .env file loaded: {}", e);
    }

    let config_file_location =
        env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

    let settings = load_settings_from(Path::new(&config_file_location));
    log::info!(
        "Using history file {} with a {}s request timeout",
        settings.log_file,
        settings.timeout_seconds
    );
    settings
}

/// Read settings from `path`, falling back to defaults when it cannot be used.
pub fn load_settings_from(path: &Path) -> Settings {
    if !path.exists() {
        log::debug!("Config file {} not found, using defaults", path.display());
        return Settings::default();
    }

    match read_settings(path) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Ignoring config file {}: {}", path.display(), e);
            Settings::default()
        }
    }
}

pub fn read_settings(path: &Path) -> Result<Settings, ConfigError> {
    let config_str = std::fs::read_to_string(path)?;
    if config_str.trim().is_empty() {
        return Ok(Settings::default());
    }
    Ok(serde_yaml::from_str(&config_str)?)
}

/// Setup a TLS connector that verifies certificates against the platform trust store.
/// Unlike a certificate-inspecting connector, a handshake through this one fails for
/// expired, self-signed or mismatched certificates.
pub fn setup_tls_connector() -> Result<TokioTlsConnector, native_tls::Error> {
    let connector = native_tls::TlsConnector::new()?;
    Ok(TokioTlsConnector::from(connector))
}

/// Build the HTTP client shared by every probe.
pub fn setup_http_client(settings: &Settings) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_seconds))
        .user_agent(settings.user_agent.clone())
        .build()
}
