//! Application configuration for ProfileScout.
//!
//! User config lives at `~/.profilescout/profilescout.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ProfileScoutError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "profilescout.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".profilescout";

// ---------------------------------------------------------------------------
// Config structs (matching profilescout.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP service settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Page fetch settings.
    #[serde(default)]
    pub fetch: FetchSection,
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind the HTTP service to.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Port for the HTTP service.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Name of the env var holding the bearer token (never store the token itself).
    /// When the variable is unset or empty, requests are not authenticated.
    #[serde(default = "default_auth_token_env")]
    pub auth_token_env: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            auth_token_env: default_auth_token_env(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8787
}
fn default_auth_token_env() -> String {
    "PROFILESCOUT_TOKEN".into()
}

/// Which page fetcher renders the profile page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchBackend {
    /// Plain HTTP GET; sees only server-rendered markup.
    #[default]
    Http,
    /// Headless Chromium (requires the `browser` feature).
    Browser,
}

impl std::fmt::Display for FetchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http => f.write_str("http"),
            Self::Browser => f.write_str("browser"),
        }
    }
}

impl std::str::FromStr for FetchBackend {
    type Err = ProfileScoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "browser" => Ok(Self::Browser),
            other => Err(ProfileScoutError::config(format!(
                "unknown fetch backend '{other}': expected 'http' or 'browser'"
            ))),
        }
    }
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSection {
    /// Fetch backend.
    #[serde(default)]
    pub backend: FetchBackend,

    /// Overall timeout for fetching one page.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent by the HTTP backend.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Profile URL template; `{username}` is substituted.
    #[serde(default = "default_profile_url_template")]
    pub profile_url_template: String,

    /// Explicit Chromium executable for the browser backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<String>,
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            backend: FetchBackend::default(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            profile_url_template: default_profile_url_template(),
            chrome_path: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    concat!("ProfileScout/", env!("CARGO_PKG_VERSION")).into()
}
fn default_profile_url_template() -> String {
    "https://www.instagram.com/{username}/".into()
}

// ---------------------------------------------------------------------------
// Fetch config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime fetch configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Fetch backend.
    pub backend: FetchBackend,
    /// Overall page fetch timeout.
    pub timeout: Duration,
    /// User-Agent header for the HTTP backend.
    pub user_agent: String,
    /// Profile URL template with a `{username}` placeholder.
    pub profile_url_template: String,
    /// Explicit Chromium executable path.
    pub chrome_path: Option<PathBuf>,
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            backend: config.fetch.backend,
            timeout: Duration::from_secs(config.fetch.timeout_secs),
            user_agent: config.fetch.user_agent.clone(),
            profile_url_template: config.fetch.profile_url_template.clone(),
            chrome_path: config.fetch.chrome_path.as_ref().map(PathBuf::from),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl ServerConfig {
    /// Read the bearer token from the configured env var, if one is set.
    pub fn auth_token(&self) -> Option<String> {
        std::env::var(&self.auth_token_env)
            .ok()
            .filter(|token| !token.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.profilescout/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ProfileScoutError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.profilescout/profilescout.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| ProfileScoutError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        ProfileScoutError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ProfileScoutError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ProfileScoutError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ProfileScoutError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
