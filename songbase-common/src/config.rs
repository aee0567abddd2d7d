//! Configuration loading and install layout
//!
//! Config file resolution follows a fixed priority order:
//! 1. Explicit path (command-line argument)
//! 2. `SONGBASE_CONFIG` environment variable
//! 3. `<config dir>/songbase/config.toml`
//! 4. Compiled defaults (no file)
//!
//! An explicit path must exist. Any other missing file is not an error: a
//! warning is logged and defaults are used.

use crate::song::SongUrl;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SONGBASE_CONFIG";

/// Settings read from `config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SongbaseConfig {
    /// Relocatable install: library locations are stored relative to `install_dir`
    pub portable: bool,
    /// Installation directory (default: directory of the running executable)
    pub install_dir: Option<PathBuf>,
    /// Directory holding cached album covers
    pub cover_cache_dir: Option<PathBuf>,
    /// Directories searched for portable-device runtime libraries
    pub device_library_dirs: Vec<PathBuf>,
    /// Default tracing filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for SongbaseConfig {
    fn default() -> Self {
        Self {
            portable: false,
            install_dir: None,
            cover_cache_dir: default_cover_cache_dir(),
            device_library_dirs: default_device_library_dirs(),
            log_level: "info".to_string(),
        }
    }
}

impl SongbaseConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load the config following the priority order in the module docs
    ///
    /// An explicit path that does not exist is an error; every other missing
    /// file falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!("Config file not found: {}", path.display())));
            }
            return Self::load_file(path);
        }

        match resolve_config_path() {
            Some(path) => Self::load_file(&path),
            None => {
                warn!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn install_layout(&self) -> InstallLayout {
        let install_dir = self
            .install_dir
            .clone()
            .or_else(executable_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        InstallLayout {
            portable: self.portable,
            install_dir,
        }
    }

    pub fn codec_context(&self) -> CodecContext {
        CodecContext {
            layout: self.install_layout(),
            cover_cache_dir: self.cover_cache_dir.clone(),
        }
    }
}

/// Config path from the environment or the user config directory, if present
fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
        warn!("{} points to missing file {}", CONFIG_ENV_VAR, path.display());
    }

    let user_config = dirs::config_dir()?.join("songbase").join("config.toml");
    user_config.exists().then_some(user_config)
}

fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe().ok()?.parent().map(Path::to_path_buf)
}

fn default_cover_cache_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("songbase").join("covers"))
}

fn default_device_library_dirs() -> Vec<PathBuf> {
    let dirs: &[&str] = if cfg!(target_os = "macos") {
        &["/opt/homebrew/lib", "/usr/local/lib"]
    } else if cfg!(target_os = "windows") {
        &[]
    } else {
        &["/usr/lib", "/usr/lib64", "/usr/local/lib", "/usr/lib/x86_64-linux-gnu", "/usr/lib/aarch64-linux-gnu"]
    };
    dirs.iter().map(PathBuf::from).collect()
}

/// Where the installation lives and whether library locations are relocatable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    pub portable: bool,
    pub install_dir: PathBuf,
}

impl Default for InstallLayout {
    fn default() -> Self {
        Self {
            portable: false,
            install_dir: PathBuf::from("."),
        }
    }
}

impl InstallLayout {
    /// Text stored in the `filename` column for a location
    ///
    /// Portable installs store local files on the installation's drive as
    /// paths relative to the installation directory.
    pub fn storage_location(&self, url: &SongUrl) -> String {
        if self.portable && url.on_same_drive_as(&self.install_dir) {
            if let Some(relative) = url.relative_to(&self.install_dir) {
                return relative;
            }
        }
        url.as_str().to_string()
    }

    /// Inverse of [`InstallLayout::storage_location`]
    pub fn resolve_location(&self, stored: &str) -> SongUrl {
        let url = SongUrl::parse(stored);
        if self.portable {
            url.resolve_against(&self.install_dir)
        } else {
            url
        }
    }
}

/// Environment shared by the row and message codecs
#[derive(Debug, Clone, Default)]
pub struct CodecContext {
    pub layout: InstallLayout,
    /// When set, decoded songs without any cover adopt a cached one
    pub cover_cache_dir: Option<PathBuf>,
}
