//! Remote registry client contract for promptsync
//!
//! The sync engine only depends on the [`Registry`] trait: paginated list,
//! get-by-key, and upsert over both artifact families. Two implementations
//! ship with the workspace - an in-memory registry backing tests and a thin
//! HTTP client with no retry layer.

pub mod client;
pub mod error;
pub mod http;
pub mod memory;
pub mod types;

pub use client::Registry;
pub use error::{Error, Result};
pub use http::HttpRegistry;
pub use memory::MemoryRegistry;
pub use types::{
    ConnectionQuery, ConnectionUpsert, MAX_PAGE_SIZE, MIN_PAGE_SIZE, Page, PromptQuery,
    PromptSelector, RemoteConnection, RemotePrompt, clamp_page_size,
};
