//! Song locations
//!
//! A location is kept in its encoded text form (`file:///music/a%20b.flac`,
//! `mtp://host/42`, `cdda://1`), which is what the `filename` column and the
//! tag-reader message carry. Relocatable installs may also store a scheme-less
//! path relative to the installation directory; see [`SongUrl::resolve_against`].

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

const FILE_SCHEME_PREFIX: &str = "file://";

/// Encoded location of a song's media
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongUrl(String);

impl SongUrl {
    /// Wrap an already-encoded location
    pub fn parse(encoded: impl Into<String>) -> Self {
        Self(encoded.into().trim().to_string())
    }

    /// Build a `file://` location from a local path
    pub fn from_local_file(path: &Path) -> Self {
        Self(format!("{}{}", FILE_SCHEME_PREFIX, encode_path(path, true)))
    }

    /// Append a plain `/`-separated path to an encoded URL prefix such as `http://host/music`
    pub fn with_path(prefix: &str, path: &str) -> Self {
        let encoded = encode_path(Path::new(path), false);
        Self(format!(
            "{}/{}",
            prefix.trim_end_matches('/'),
            encoded.trim_start_matches('/')
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Scheme name, if the location has one
    pub fn scheme(&self) -> Option<&str> {
        let (scheme, _) = self.0.split_once("://")?;
        let valid = !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        valid.then_some(scheme)
    }

    pub fn is_local_file(&self) -> bool {
        self.scheme().is_some_and(|s| s.eq_ignore_ascii_case("file"))
    }

    /// True for scheme-less (installation-relative) locations
    pub fn is_relative(&self) -> bool {
        !self.0.is_empty() && self.scheme().is_none()
    }

    /// Decoded local path for `file://` locations
    pub fn to_local_file(&self) -> Option<PathBuf> {
        if !self.is_local_file() {
            return None;
        }
        let rest = &self.0[FILE_SCHEME_PREFIX.len()..];
        // Skip an authority such as "localhost"
        let path = match rest.find('/') {
            Some(idx) => &rest[idx..],
            None => return None,
        };
        let decoded = urlencoding::decode(path).ok()?.into_owned();
        Some(PathBuf::from(strip_drive_slash(&decoded)))
    }

    /// Decoded last path segment, empty when there is none
    pub fn file_name(&self) -> String {
        let path = match self.0.split_once("://") {
            Some((_, rest)) => rest,
            None => self.0.as_str(),
        };
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segment = path.rsplit('/').next().unwrap_or_default();
        urlencoding::decode(segment)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| segment.to_string())
    }

    /// Resolve a relative location against `base`; absolute locations are returned unchanged
    pub fn resolve_against(&self, base: &Path) -> SongUrl {
        if !self.is_relative() {
            return self.clone();
        }
        let decoded = match urlencoding::decode(&self.0) {
            Ok(s) => s.into_owned(),
            Err(_) => return self.clone(),
        };
        let mut resolved = base.to_path_buf();
        for part in decoded.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    resolved.pop();
                }
                other => resolved.push(other),
            }
        }
        SongUrl::from_local_file(&resolved)
    }

    /// Encoded location relative to `base`, for local files only
    pub fn relative_to(&self, base: &Path) -> Option<String> {
        let target = self.to_local_file()?;
        let relative = relative_path(&target, base)?;
        Some(encode_path(&relative, false))
    }

    /// True when this local file shares its root (drive) with `base`
    pub fn on_same_drive_as(&self, base: &Path) -> bool {
        match self.to_local_file() {
            Some(path) => path.components().next() == base.components().next(),
            None => false,
        }
    }
}

impl std::fmt::Display for SongUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn encode_path(path: &Path, absolute: bool) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    let mut encoded: Vec<String> = Vec::new();
    for segment in text.split('/') {
        if is_drive(segment) {
            encoded.push(segment.to_string());
        } else {
            encoded.push(urlencoding::encode(segment).into_owned());
        }
    }
    let joined = encoded.join("/");
    if absolute && !joined.starts_with('/') {
        format!("/{}", joined)
    } else {
        joined
    }
}

fn is_drive(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

// "/C:/Music" -> "C:/Music"
fn strip_drive_slash(path: &str) -> &str {
    match path.strip_prefix('/') {
        Some(rest) if rest.len() >= 2 && is_drive(&rest[..2]) => rest,
        _ => path,
    }
}

fn relative_path(target: &Path, base: &Path) -> Option<PathBuf> {
    let target: Vec<Component> = target.components().collect();
    let base: Vec<Component> = base.components().collect();
    if target.first() != base.first() {
        return None;
    }
    let common = target
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    Some(relative)
}
