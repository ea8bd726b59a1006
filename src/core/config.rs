//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.chirp/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! OAuth credentials are normally supplied through the environment
//! (`GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`, or a `.env` file).

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::{GoogleEndpoints, GoogleSettings};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChirpConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub api_base_url: Option<String>,
    pub refresh_on_start: Option<bool>,
    pub notification_ttl_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_port: Option<u16>,
    pub callback_timeout_secs: Option<u64>,
    pub authorize_url: Option<String>,
    pub token_url: Option<String>,
    pub userinfo_url: Option<String>,
    pub revoke_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_NOTIFICATION_TTL_MS: u64 = 2500;
pub const DEFAULT_REDIRECT_PORT: u16 = 8765;
pub const DEFAULT_CALLBACK_TIMEOUT_SECS: u64 = 120;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub api_base_url: String,
    pub refresh_on_start: bool,
    pub notification_ttl: Duration,
    pub google: GoogleSettings,
    pub open_browser: bool,
}

/// Values from CLI flags; `None` / `false` means "not specified".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub redirect_port: Option<u16>,
    pub no_refresh: bool,
    pub no_browser: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.chirp/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".chirp").join("config.toml"))
}

/// Load config from `~/.chirp/config.toml`, generating a commented default
/// if it does not exist yet.
pub fn load_config() -> Result<ChirpConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(ChirpConfig::default())
        }
    }
}

pub fn load_config_from(path: &Path) -> Result<ChirpConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ChirpConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ChirpConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    // Debug-print without the client secret
    debug!(
        "Config: general={:?}, auth.client_id set={}, auth.redirect_port={:?}",
        config.general,
        config.auth.client_id.is_some(),
        config.auth.redirect_port
    );
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# chirp configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# api_base_url = "http://localhost:3000/api"   # Or CHIRP_API_URL
# refresh_on_start = true
# notification_ttl_ms = 2500

# [auth]
# client_id = "...apps.googleusercontent.com"  # Or GOOGLE_CLIENT_ID
# client_secret = "..."                        # Or GOOGLE_CLIENT_SECRET
# redirect_port = 8765                         # Or CHIRP_REDIRECT_PORT
# callback_timeout_secs = 120
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve against the process environment.
pub fn resolve(config: &ChirpConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with(config, cli, |key| std::env::var(key).ok())
}

/// Resolve the final config by collapsing: defaults → config file → env → CLI.
pub fn resolve_with<F>(config: &ChirpConfig, cli: &CliOverrides, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    let api_base_url = cli
        .api_url
        .clone()
        .or_else(|| env("CHIRP_API_URL"))
        .or_else(|| config.general.api_base_url.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

    let redirect_port = cli
        .redirect_port
        .or_else(|| {
            env("CHIRP_REDIRECT_PORT").and_then(|v| match v.parse() {
                Ok(port) => Some(port),
                Err(_) => {
                    warn!("Ignoring invalid CHIRP_REDIRECT_PORT={v:?}");
                    None
                }
            })
        })
        .or(config.auth.redirect_port)
        .unwrap_or(DEFAULT_REDIRECT_PORT);

    // Credentials: env → config
    let client_id = env("GOOGLE_CLIENT_ID").or_else(|| config.auth.client_id.clone());
    let client_secret = env("GOOGLE_CLIENT_SECRET").or_else(|| config.auth.client_secret.clone());

    let defaults = GoogleEndpoints::default();
    let endpoints = GoogleEndpoints {
        authorize_url: config
            .auth
            .authorize_url
            .clone()
            .unwrap_or(defaults.authorize_url),
        token_url: config.auth.token_url.clone().unwrap_or(defaults.token_url),
        userinfo_url: config
            .auth
            .userinfo_url
            .clone()
            .unwrap_or(defaults.userinfo_url),
        revoke_url: config.auth.revoke_url.clone().unwrap_or(defaults.revoke_url),
    };

    ResolvedConfig {
        api_base_url,
        refresh_on_start: !cli.no_refresh && config.general.refresh_on_start.unwrap_or(true),
        notification_ttl: Duration::from_millis(
            config
                .general
                .notification_ttl_ms
                .unwrap_or(DEFAULT_NOTIFICATION_TTL_MS),
        ),
        google: GoogleSettings {
            client_id,
            client_secret,
            redirect_port,
            callback_timeout: Duration::from_secs(
                config
                    .auth
                    .callback_timeout_secs
                    .unwrap_or(DEFAULT_CALLBACK_TIMEOUT_SECS),
            ),
            endpoints,
        },
        open_browser: !cli.no_browser,
    }
}
