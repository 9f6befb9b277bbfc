//! Error types for psync-store

/// Result type for psync-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or resolving local artifacts
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed artifact at {path}: {message}")]
    Malformed { path: String, message: String },

    #[error("Circular inheritance through {path}")]
    CircularInheritance { path: String },

    #[error("Kind mismatch: {path} extends {base}, which has a different kind")]
    KindMismatch { path: String, base: String },

    #[error("Missing base prompt: {path} extends {reference}, which does not exist")]
    MissingBase { path: String, reference: String },

    #[error("Failed to serialize {key}: {message}")]
    Serialize { key: String, message: String },

    #[error(transparent)]
    Fs(#[from] psync_fs::Error),
}

impl Error {
    pub fn malformed(path: impl std::fmt::Display, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.to_string(),
            message: message.into(),
        }
    }
}
