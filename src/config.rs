//! Persistent configuration
//!
//! Read from `config.toml` in the per-user config directory. Every field is
//! optional; command-line flags override whatever the file sets.
//!
//! ```toml
//! size = [48, 24]        # or { width = 48, height = 24 }
//! native = false         # true renders at the image's own resolution
//! interval_ms = 100
//! filter = "catmull-rom"
//! loops = 3
//! cache_dir = "/tmp/pixcat"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use tracing::debug;

use crate::errors::{PixcatError, Result};
use crate::geometry::{Size, DEFAULT_SIZE};
use crate::render::{ResizeFilter, FRAME_INTERVAL};

/// On-disk representation, before validation
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    size: Option<toml::Value>,
    native: bool,
    interval_ms: Option<u64>,
    filter: Option<ResizeFilter>,
    loops: Option<u32>,
    cache_dir: Option<PathBuf>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Target render size; `None` renders at native resolution
    pub size: Option<Size>,
    /// Pause between animation frames
    pub interval: Duration,
    pub filter: ResizeFilter,
    /// Stop animations after this many cycles
    pub loops: Option<u32>,
    /// Where downloaded images are stored
    pub cache_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: Some(DEFAULT_SIZE),
            interval: FRAME_INTERVAL,
            filter: ResizeFilter::default(),
            loops: None,
            cache_dir: Self::default_cache_dir(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "pixcat", "pixcat")
}

impl Config {
    /// Default config file location
    pub fn config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Per-user cache directory for downloaded images
    pub fn default_cache_dir() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .or_else(|| home::home_dir().map(|home| home.join(".pixcat")))
            .unwrap_or_else(|| std::env::temp_dir().join("pixcat"))
    }

    /// Load from `path`, or from the default location when `None`
    ///
    /// An explicitly given file must exist; a missing default file yields the
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(PixcatError::Config(format!(
                        "config file {} does not exist",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => match Self::config_path() {
                Some(path) if path.is_file() => path,
                _ => {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        debug!("loading config from {}", path.display());
        let content = fs::read_to_string(&path)
            .map_err(|e| PixcatError::Config(format!("Failed to read config: {e}")))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| PixcatError::Config(format!("Invalid TOML config: {e}")))?;

        let defaults = Self::default();
        let size = if file.native {
            None
        } else {
            match &file.size {
                Some(value) => Some(Size::try_from(value)?),
                None => defaults.size,
            }
        };

        Ok(Self {
            size,
            interval: file
                .interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.interval),
            filter: file.filter.unwrap_or(defaults.filter),
            loops: file.loops.or(defaults.loops),
            cache_dir: file.cache_dir.unwrap_or(defaults.cache_dir),
        })
    }
}
