//! Normalized path handling for cross-platform determinism
//!
//! Artifact names and discovery order are derived from paths, so every path
//! is stored with forward slashes and converted to the platform-native form
//! only at I/O boundaries.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path normalized to forward slashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy();
        Self {
            inner: raw.replace('\\', "/"),
        }
    }

    /// The normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment)
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self { inner: joined }
    }

    /// Parent directory, if any.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            None => None,
        }
    }

    /// Final path component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.trim_end_matches('/').rsplit('/').next()
    }

    /// Final path component with the extension stripped.
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => Some(name),
            Some(idx) => Some(&name[..idx]),
        }
    }

    /// Extension without the leading dot, if present.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }

    /// This path relative to `base`, with the extension stripped.
    ///
    /// Used to derive artifact names from file locations. Falls back to the
    /// file stem when the path is not under `base`.
    pub fn name_relative_to(&self, base: &NormalizedPath) -> String {
        let base_str = base.as_str().trim_end_matches('/');
        let rel = self
            .inner
            .strip_prefix(base_str)
            .map(|r| r.trim_start_matches('/'))
            .filter(|r| !r.is_empty());
        match rel {
            Some(rel) => match rel.rfind('.') {
                Some(idx) if !rel[idx..].contains('/') => rel[..idx].to_string(),
                _ => rel.to_string(),
            },
            None => self.file_stem().unwrap_or_default().to_string(),
        }
    }

    /// Resolve symlinks and `..` segments into a canonical absolute path.
    ///
    /// The canonical form is the identity used by the inheritance cycle
    /// guard, so two spellings of the same file must map to one value.
    pub fn canonical(&self) -> Result<PathBuf> {
        dunce::canonicalize(self.to_native()).map_err(|e| Error::io(self.to_native(), e))
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
