//! Startup detection of device families
//!
//! A family is available when its runtime shared library (`libgpod`,
//! `libmtp`) is found in one of the configured library directories.
//! Nothing is linked at build time; missing libraries only disable the
//! matching family.

use crate::{DeviceCodec, DeviceError, DeviceFamily, IpodCodec, MtpCodec, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Connection parameters of a device to talk to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceTarget {
    /// Mount directory, or URL prefix when it contains `://`
    Ipod { prefix: String },
    /// Host name used in `mtp://` song locations
    Mtp { host: String },
}

impl DeviceTarget {
    pub fn family(&self) -> DeviceFamily {
        match self {
            DeviceTarget::Ipod { .. } => DeviceFamily::Ipod,
            DeviceTarget::Mtp { .. } => DeviceFamily::Mtp,
        }
    }
}

fn is_shared_library_for(file_name: &str, stem: &str) -> bool {
    let Some(rest) = file_name.strip_prefix(stem) else {
        return false;
    };
    (rest.starts_with('.') || rest.starts_with('-'))
        && (rest.contains(".so") || rest.ends_with(".dylib") || rest.ends_with(".dll"))
}

/// First runtime library of `family` found in `search_dirs`
pub fn find_runtime_library(family: DeviceFamily, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    for dir in search_dirs {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Skipping library directory {}: {}", dir.display(), e);
                continue;
            }
        };
        let mut matches: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| is_shared_library_for(n, family.library_stem()))
            })
            .collect();
        matches.sort();
        if let Some(found) = matches.into_iter().next() {
            return Some(found);
        }
    }
    None
}

/// Device families usable in this process
#[derive(Debug, Clone, Default)]
pub struct DeviceCodecs {
    available: BTreeMap<DeviceFamily, PathBuf>,
}

impl DeviceCodecs {
    /// Probe `search_dirs` for every family's runtime library
    pub fn detect(search_dirs: &[PathBuf]) -> Self {
        let mut available = BTreeMap::new();
        for family in DeviceFamily::ALL {
            match find_runtime_library(family, search_dirs) {
                Some(path) => {
                    info!("{} support enabled ({})", family, path.display());
                    available.insert(family, path);
                }
                None => info!("{} support disabled: {} not found", family, family.library_stem()),
            }
        }
        Self { available }
    }

    /// Registry with an explicit set of families, bypassing detection
    pub fn with_families(families: impl IntoIterator<Item = (DeviceFamily, PathBuf)>) -> Self {
        Self {
            available: families.into_iter().collect(),
        }
    }

    pub fn is_available(&self, family: DeviceFamily) -> bool {
        self.available.contains_key(&family)
    }

    pub fn library_path(&self, family: DeviceFamily) -> Option<&Path> {
        self.available.get(&family).map(PathBuf::as_path)
    }

    pub fn families(&self) -> impl Iterator<Item = DeviceFamily> + '_ {
        self.available.keys().copied()
    }

    /// Codec for `target`, if its family is available
    pub fn codec_for(&self, target: &DeviceTarget) -> Result<Box<dyn DeviceCodec>> {
        let family = target.family();
        if !self.is_available(family) {
            return Err(DeviceError::Unavailable(family));
        }
        Ok(match target {
            DeviceTarget::Ipod { prefix } => Box::new(IpodCodec::new(prefix)),
            DeviceTarget::Mtp { host } => Box::new(MtpCodec::new(host.as_str())),
        })
    }
}
