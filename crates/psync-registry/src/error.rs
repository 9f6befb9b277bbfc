//! Error types for psync-registry

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by registry implementations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{kind} '{key}' not found in the registry")]
    NotFound { kind: &'static str, key: String },

    #[error("Registry API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Registry transport error: {message}")]
    Transport { message: String },

    #[error("Registry client misconfigured: {message}")]
    Config { message: String },
}

impl Error {
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// Meaningful absence, as opposed to a failed request.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
