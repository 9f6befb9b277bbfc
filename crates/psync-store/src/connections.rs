//! Connection loading

use psync_fs::{NormalizedPath, discover, io};
use psync_model::ConnectionDefinition;

use crate::Loaded;
use crate::error::{Error, Result};

/// File extensions recognized for connection documents.
pub const CONNECTION_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// A connection parsed from disk.
#[derive(Debug, Clone)]
pub struct LoadedConnection {
    pub path: NormalizedPath,
    pub definition: ConnectionDefinition,
}

/// Loads connection documents from an artifact root.
#[derive(Debug, Clone)]
pub struct ConnectionStore {
    root: NormalizedPath,
}

impl ConnectionStore {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Load every connection under the root, lexically ordered.
    pub fn load_all(&self) -> Result<Loaded<LoadedConnection>> {
        let paths = discover(&self.root, &CONNECTION_EXTENSIONS)?;

        let mut artifacts = Vec::new();
        let mut failures = Vec::new();
        for path in paths {
            match self.parse(&path) {
                Ok(connection) => artifacts.push(connection),
                Err(error) => {
                    tracing::warn!("failed to parse {}: {}", path, error);
                    failures.push(error);
                }
            }
        }

        Ok(Loaded {
            artifacts,
            failures,
        })
    }

    /// Parse a single connection document.
    pub fn parse(&self, path: &NormalizedPath) -> Result<LoadedConnection> {
        let source = io::read_text(path)?;
        let definition: ConnectionDefinition =
            serde_yaml::from_str(&source).map_err(|e| Error::malformed(path, e.to_string()))?;

        if definition.provider.trim().is_empty() {
            return Err(Error::malformed(path, "provider must not be empty"));
        }

        Ok(LoadedConnection {
            path: path.clone(),
            definition,
        })
    }
}
