//! Configuration loading and config file resolution
//!
//! The looper reads a single TOML file describing playback options,
//! logging and the ordered movie list. A missing file is not fatal: the
//! caller gets compiled defaults and a warning.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "VIDLOOP_CONFIG";

/// File name looked up in the platform config directories
pub const CONFIG_FILE_NAME: &str = "vidloop.toml";

/// Default resume record file name
pub const DEFAULT_RESUME_FILE: &str = "playlist_index.txt";

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Playback policy options
    pub playlist: PlaylistConfig,

    /// Logging options
    pub logging: LoggingConfig,

    /// Ordered movie list (`[[movie]]` tables)
    #[serde(rename = "movie")]
    pub movies: Vec<MovieEntry>,
}

/// `[playlist]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistConfig {
    /// Pick a random movie on every advance instead of walking in order
    pub random: bool,

    /// Persist and restore the sequential position across restarts
    pub resume: bool,

    /// Where the resume record lives
    pub resume_file: PathBuf,

    /// Simulated playback length of one movie, in seconds
    pub play_seconds: u64,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            random: false,
            resume: false,
            resume_file: PathBuf::from(DEFAULT_RESUME_FILE),
            play_seconds: 30,
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing level when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// One `[[movie]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieEntry {
    /// Playable target (file path or URI)
    pub path: String,

    /// Optional human label
    #[serde(default)]
    pub title: Option<String>,

    /// Consecutive plays before rotation moves on
    #[serde(default = "default_repeats")]
    pub repeats: u32,
}

fn default_repeats() -> u32 {
    1
}

/// Config file resolution following priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. User config directory (`~/.config/vidloop/vidloop.toml` on Linux)
/// 4. System config (`/etc/vidloop/vidloop.toml`, Unix only)
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    /// Create a resolver with an optional command-line override
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Resolve the config file path, or None if no candidate exists
    ///
    /// CLI and environment paths are returned even when the file is missing
    /// so that `load_config` can report them.
    pub fn resolve(&self) -> Option<PathBuf> {
        if let Some(path) = &self.cli_path {
            debug!(path = %path.display(), "Config path from command line");
            return Some(path.clone());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                debug!(path = %path, "Config path from {}", CONFIG_ENV_VAR);
                return Some(PathBuf::from(path));
            }
        }

        let user_config = dirs::config_dir().map(|d| d.join("vidloop").join(CONFIG_FILE_NAME));
        if let Some(path) = user_config {
            if path.exists() {
                return Some(path);
            }
        }

        if cfg!(unix) {
            let system_config = PathBuf::from("/etc/vidloop").join(CONFIG_FILE_NAME);
            if system_config.exists() {
                return Some(system_config);
            }
        }

        None
    }
}

/// Load configuration from a resolved path
///
/// `None` or a path that does not exist yields defaults with a warning.
/// A file that exists but cannot be read is `Error::Io`; one that does
/// not parse is `Error::Config`.
pub fn load_config(path: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = path else {
        warn!("No config file found, using defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!("Config file not found: {}, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

    info!(
        "Loaded config from {} ({} movies)",
        path.display(),
        config.movies.len()
    );
    Ok(config)
}

/// Parse configuration from TOML text
pub fn parse_config(content: &str) -> Result<TomlConfig> {
    let config: TomlConfig =
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;

    if let Some(entry) = config.movies.iter().find(|m| m.path.trim().is_empty()) {
        return Err(Error::InvalidInput(format!(
            "movie entry with empty path (title: {:?})",
            entry.title
        )));
    }

    Ok(config)
}
