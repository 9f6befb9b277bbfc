//! Error types for psync-engine

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while orchestrating a sync command
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A connection's credential resolved to nothing; a blank secret is
    /// never upserted
    #[error("Missing secret for connection {provider}")]
    MissingSecret { provider: String },

    #[error("Missing value for header {header} of connection {provider}")]
    MissingHeaderValue { provider: String, header: String },

    #[error(transparent)]
    Store(#[from] psync_store::Error),

    #[error(transparent)]
    Registry(#[from] psync_registry::Error),
}
