//! In-memory registry
//!
//! Backs unit and integration tests. Keeps the latest record per prompt
//! name, assigns versions on upsert, and counts writes so tests can assert
//! that skip-if-unchanged really issued none.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use psync_model::LATEST_LABEL;

use crate::client::Registry;
use crate::error::{Error, Result};
use crate::types::{
    ConnectionQuery, ConnectionUpsert, Page, PromptQuery, PromptSelector, RemoteConnection,
    RemotePrompt, clamp_page_size,
};

#[derive(Debug, Default)]
struct State {
    prompts: BTreeMap<String, RemotePrompt>,
    connections: BTreeMap<String, RemoteConnection>,
    prompt_upserts: usize,
    connection_upserts: usize,
    fail_gets: bool,
}

/// Registry implementation over process memory.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    state: Mutex<State>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a prompt directly, bypassing upsert accounting.
    pub fn seed_prompt(&self, prompt: RemotePrompt) {
        let mut state = self.state.lock().unwrap();
        state.prompts.insert(prompt.name.clone(), prompt);
    }

    /// Store a connection directly, bypassing upsert accounting.
    pub fn seed_connection(&self, connection: RemoteConnection) {
        let mut state = self.state.lock().unwrap();
        state
            .connections
            .insert(connection.provider.clone(), connection);
    }

    /// Number of prompt upserts issued so far.
    pub fn prompt_upserts(&self) -> usize {
        self.state.lock().unwrap().prompt_upserts
    }

    /// Number of connection upserts issued so far.
    pub fn connection_upserts(&self) -> usize {
        self.state.lock().unwrap().connection_upserts
    }

    /// Make every get fail with a transport error.
    pub fn fail_gets(&self, fail: bool) {
        self.state.lock().unwrap().fail_gets = fail;
    }

    /// The stored prompt for a name, if any.
    pub fn stored_prompt(&self, name: &str) -> Option<RemotePrompt> {
        self.state.lock().unwrap().prompts.get(name).cloned()
    }

    /// The stored connection for a provider, if any.
    pub fn stored_connection(&self, provider: &str) -> Option<RemoteConnection> {
        self.state.lock().unwrap().connections.get(provider).cloned()
    }
}

fn paginate<T: Clone>(items: Vec<T>, page: u32, limit: u32) -> Page<T> {
    let limit = clamp_page_size(limit) as usize;
    let total_pages = items.len().div_ceil(limit) as u32;
    let start = (page.saturating_sub(1) as usize) * limit;
    let page_items = items.into_iter().skip(start).take(limit).collect();
    Page {
        items: page_items,
        total_pages,
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn list_prompts(&self, query: &PromptQuery) -> Result<Page<RemotePrompt>> {
        let state = self.state.lock().unwrap();
        let items: Vec<RemotePrompt> = state
            .prompts
            .values()
            .filter(|p| match &query.label {
                Some(label) if label != LATEST_LABEL => p.labels.iter().any(|l| l == label),
                _ => true,
            })
            .cloned()
            .collect();
        Ok(paginate(items, query.page, query.limit))
    }

    async fn get_prompt(&self, name: &str, selector: &PromptSelector) -> Result<RemotePrompt> {
        let state = self.state.lock().unwrap();
        if state.fail_gets {
            return Err(Error::Transport {
                message: "simulated read failure".into(),
            });
        }
        let prompt = state
            .prompts
            .get(name)
            .ok_or_else(|| Error::not_found("prompt", name))?;
        if let Some(version) = selector.version
            && prompt.version != Some(version)
        {
            return Err(Error::not_found("prompt", name));
        }
        if let Some(label) = &selector.label
            && label != LATEST_LABEL
            && !prompt.labels.iter().any(|l| l == label)
        {
            return Err(Error::not_found("prompt", name));
        }
        Ok(prompt.clone())
    }

    async fn upsert_prompt(&self, prompt: &RemotePrompt) -> Result<RemotePrompt> {
        let mut state = self.state.lock().unwrap();
        state.prompt_upserts += 1;

        let next_version = state
            .prompts
            .get(&prompt.name)
            .and_then(|p| p.version)
            .unwrap_or(0)
            + 1;
        let mut stored = prompt.clone();
        stored.version = Some(next_version);
        state.prompts.insert(stored.name.clone(), stored.clone());
        Ok(stored)
    }

    async fn list_connections(&self, query: &ConnectionQuery) -> Result<Page<RemoteConnection>> {
        let state = self.state.lock().unwrap();
        let items: Vec<RemoteConnection> = state.connections.values().cloned().collect();
        Ok(paginate(items, query.page, query.limit))
    }

    async fn get_connection(&self, provider: &str) -> Result<RemoteConnection> {
        let state = self.state.lock().unwrap();
        if state.fail_gets {
            return Err(Error::Transport {
                message: "simulated read failure".into(),
            });
        }
        state
            .connections
            .get(provider)
            .cloned()
            .ok_or_else(|| Error::not_found("connection", provider))
    }

    async fn upsert_connection(&self, upsert: &ConnectionUpsert) -> Result<RemoteConnection> {
        let mut state = self.state.lock().unwrap();
        state.connection_upserts += 1;
        let stored = upsert.stored();
        state
            .connections
            .insert(stored.provider.clone(), stored.clone());
        Ok(stored)
    }
}
