use std::path::PathBuf;

use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/prodlist/config.toml` or `~/.config/prodlist/config.toml`
///
/// Precedence (highest wins):
/// 1) Command-line flags (applied later, in `cli::RunConfig`)
/// 2) Environment variables (prefix `PRODLIST__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub service: ServiceSettings,
    pub library: LibrarySettings,
    pub cache: CacheSettings,
    pub playlist: PlaylistSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Root of the Genius API; song references are resolved against it.
    pub base_url: String,
    /// Bearer token for the API. Usually supplied through the environment.
    pub token: String,
    /// Per-request timeout (seconds).
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.genius.com".to_string(),
            token: String::new(),
            timeout_secs: 30,
            user_agent: concat!("prodlist/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into()],
            follow_links: true,
            include_hidden: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Whether a parsed iTunes library is snapshotted between runs.
    pub enabled: bool,
    /// Snapshot location. Relative paths resolve against the working directory.
    pub path: PathBuf,
    /// How long a snapshot stays usable after it was written (seconds).
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("library_cache.json"),
            ttl_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaylistSettings {
    /// Directory that receives the `Produced by ....m3u` files.
    pub output_dir: PathBuf,
}

impl Default for PlaylistSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}
