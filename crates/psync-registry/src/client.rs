//! The registry client contract

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    ConnectionQuery, ConnectionUpsert, Page, PromptQuery, PromptSelector, RemoteConnection,
    RemotePrompt,
};

/// Remote registry operations the sync engine depends on.
///
/// Implementations own transport concerns entirely; the engine calls pages
/// sequentially and never issues two concurrent requests through one
/// client.
#[async_trait]
pub trait Registry: Send + Sync {
    async fn list_prompts(&self, query: &PromptQuery) -> Result<Page<RemotePrompt>>;

    /// Fetch one prompt, optionally pinned to a label or version.
    async fn get_prompt(&self, name: &str, selector: &PromptSelector) -> Result<RemotePrompt>;

    async fn upsert_prompt(&self, prompt: &RemotePrompt) -> Result<RemotePrompt>;

    async fn list_connections(&self, query: &ConnectionQuery) -> Result<Page<RemoteConnection>>;

    async fn get_connection(&self, provider: &str) -> Result<RemoteConnection>;

    async fn upsert_connection(&self, upsert: &ConnectionUpsert) -> Result<RemoteConnection>;
}
