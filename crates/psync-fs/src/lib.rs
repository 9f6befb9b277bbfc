//! Filesystem primitives for promptsync
//!
//! Normalized path handling, deterministic artifact discovery, and atomic
//! file output.

pub mod discover;
pub mod error;
pub mod io;
pub mod path;

pub use discover::discover;
pub use error::{Error, Result};
pub use path::NormalizedPath;
