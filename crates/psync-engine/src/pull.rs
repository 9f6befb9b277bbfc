//! The pull command: remote to local, preserving operator-owned fields

use std::collections::BTreeMap;

use psync_fs::NormalizedPath;
use psync_model::{ConnectionDefinition, PromptDefinition, ValueSource};
use psync_registry::{RemoteConnection, RemotePrompt};
use psync_store::{ConnectionStore, LoadedConnection, LoadedPrompt, PromptStore, emit};

use crate::SyncEngine;
use crate::drain::{drain_connections, drain_prompts};
use crate::error::Result;
use crate::options::PullOptions;
use crate::report::PullReport;

impl SyncEngine<'_> {
    /// Write remote prompts into the local tree, one label at a time.
    ///
    /// A local prompt that declares `extends` is never overwritten without
    /// `force`: the remote copy holds the materialized body, and writing it
    /// back would silently destroy the authored inheritance relation.
    pub async fn pull_prompts(&self, options: &PullOptions) -> Result<PullReport> {
        let store = PromptStore::new(options.dir.clone());
        let label = options.filter().map(str::to_string);
        let remote = drain_prompts(self.registry(), label, options.limit).await?;

        let mut report = PullReport {
            dry_run: options.dry_run,
            ..Default::default()
        };

        for remote_prompt in remote {
            let path = prompt_path(store.root(), &remote_prompt.name);

            let existing = if path.is_file() {
                match store.parse(&path) {
                    Ok(loaded) => Some(loaded),
                    Err(error) => {
                        tracing::warn!("cannot merge into {}: {}", path, error);
                        report
                            .failures
                            .push(format!("{}: {error}", remote_prompt.name));
                        continue;
                    }
                }
            } else {
                None
            };

            if let Some(existing) = &existing
                && !existing.definition.extends.is_empty()
                && !options.force
            {
                report.skipped.push(format!(
                    "{} (local file declares extends; use force to overwrite)",
                    remote_prompt.name
                ));
                continue;
            }

            let derived_name = path.name_relative_to(store.root());
            let definition = merge_prompt(&remote_prompt, existing.as_ref(), &derived_name);

            if options.dry_run {
                report.written.push(remote_prompt.name.clone());
                continue;
            }
            match emit::write_prompt(&path, &definition) {
                Ok(()) => report.written.push(remote_prompt.name.clone()),
                Err(error) => report
                    .failures
                    .push(format!("{}: {error}", remote_prompt.name)),
            }
        }

        Ok(report)
    }

    /// Write remote connections into the local tree.
    ///
    /// Secret and header indirection names and the environments set are
    /// operator-owned: they merge in from any existing local file, and a
    /// new file gets a derived env indirection rather than a blank.
    pub async fn pull_connections(&self, options: &PullOptions) -> Result<PullReport> {
        let store = ConnectionStore::new(options.dir.clone());
        let remote = drain_connections(self.registry(), options.limit).await?;

        let mut report = PullReport {
            dry_run: options.dry_run,
            ..Default::default()
        };

        for remote_connection in remote {
            let path = store
                .root()
                .join(&format!("{}.yaml", remote_connection.provider));

            let existing = if path.is_file() {
                match store.parse(&path) {
                    Ok(loaded) => Some(loaded),
                    Err(error) => {
                        tracing::warn!("cannot merge into {}: {}", path, error);
                        report
                            .failures
                            .push(format!("{}: {error}", remote_connection.provider));
                        continue;
                    }
                }
            } else {
                None
            };

            let definition = merge_connection(&remote_connection, existing.as_ref());

            if options.dry_run {
                report.written.push(remote_connection.provider.clone());
                continue;
            }
            match emit::write_connection(&path, &definition) {
                Ok(()) => report.written.push(remote_connection.provider.clone()),
                Err(error) => report
                    .failures
                    .push(format!("{}: {error}", remote_connection.provider)),
            }
        }

        Ok(report)
    }
}

fn prompt_path(root: &NormalizedPath, name: &str) -> NormalizedPath {
    root.join(&format!("{name}.md"))
}

fn merge_prompt(
    remote: &RemotePrompt,
    existing: Option<&LoadedPrompt>,
    derived_name: &str,
) -> PromptDefinition {
    let mut definition = PromptDefinition {
        // A name the path already encodes would only be noise in the header
        name: (remote.name != derived_name).then(|| remote.name.clone()),
        kind: remote.kind,
        turns: remote.turns.clone(),
        labels: remote.labels.clone(),
        tags: remote.tags.clone(),
        config: remote.config.clone(),
        commit_message: remote.commit_message.clone(),
        version: remote.version,
        extends: Vec::new(),
        fragment: false,
        extra: BTreeMap::new(),
        body: remote.text.clone().unwrap_or_default(),
    };
    if let Some(existing) = existing {
        definition.fragment = existing.definition.fragment;
        definition.extra = existing.definition.extra.clone();
    }
    definition
}

fn merge_connection(
    remote: &RemoteConnection,
    existing: Option<&LoadedConnection>,
) -> ConnectionDefinition {
    let secret = existing
        .and_then(|e| e.definition.secret.clone())
        .unwrap_or_else(|| ValueSource::env_ref(default_secret_env(&remote.provider)));

    let mut extra_headers = BTreeMap::new();
    for key in &remote.extra_header_keys {
        let value = existing
            .and_then(|e| e.definition.extra_headers.get(key).cloned())
            .unwrap_or_else(|| {
                ValueSource::env_ref(default_header_env(&remote.provider, key))
            });
        extra_headers.insert(key.clone(), value);
    }

    ConnectionDefinition {
        provider: remote.provider.clone(),
        adapter: remote.adapter,
        secret: Some(secret),
        base_url: remote.base_url.clone(),
        custom_models: remote.custom_models.clone(),
        use_default_models: remote.use_default_models,
        extra_headers,
        config: remote.config.clone(),
        environments: existing
            .map(|e| e.definition.environments.clone())
            .unwrap_or_default(),
        extra: existing
            .map(|e| e.definition.extra.clone())
            .unwrap_or_default(),
    }
}

/// `openai-prod` -> `OPENAI_PROD_API_KEY`
fn default_secret_env(provider: &str) -> String {
    format!("{}_API_KEY", env_token(provider))
}

/// `openai-prod`, `X-Org` -> `OPENAI_PROD_HEADER_X_ORG`
fn default_header_env(provider: &str, header: &str) -> String {
    format!("{}_HEADER_{}", env_token(provider), env_token(header))
}

fn env_token(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
