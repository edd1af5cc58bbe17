//! Configuration file loading
//!
//! Settings resolve ENV → TOML: environment variables take priority, the
//! TOML config file is the fallback. The file is optional; a missing file
//! yields an empty configuration so components can start zero-config.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level TOML configuration shared by all components
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Proxy service settings
    pub proxy: Option<ProxySection>,
    /// Spotify credentials (fallback when env vars are unset)
    pub spotify: Option<SpotifySection>,
    /// Widget settings
    pub widget: Option<WidgetSection>,
}

/// `[proxy]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProxySection {
    pub port: Option<u16>,
}

/// `[spotify]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpotifySection {
    pub refresh_token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

/// `[widget]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WidgetSection {
    pub proxy_url: Option<String>,
    pub interval_ms: Option<u64>,
}

/// Default configuration file path: `~/.config/nowplay/nowplay.toml`
/// (platform config dir via `dirs`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("nowplay").join("nowplay.toml"))
}

/// Load TOML configuration from `path`, or from the default location when
/// `path` is `None`. A missing file is not an error.
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let resolved = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => {
                debug!("No config directory on this platform, using empty config");
                return Ok(TomlConfig::default());
            }
        },
    };

    if !resolved.exists() {
        debug!("Config file not found at {}, using empty config", resolved.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&resolved)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", resolved.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", resolved.display(), e)))?;

    debug!("Loaded config from {}", resolved.display());
    Ok(config)
}
