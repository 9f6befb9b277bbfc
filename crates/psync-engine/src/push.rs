//! The push command: local to remote, skip-if-unchanged
//!
//! Per artifact: resolve, fetch the remote counterpart, skip when the
//! canonical forms match, otherwise upsert. One artifact's failure never
//! blocks the next.

use std::collections::BTreeMap;

use psync_diff::{diff, equivalent};
use psync_model::{Canonical, PromptKind, ResolvedPrompt, normalize_label_set, normalize_string_set};
use psync_registry::{ConnectionUpsert, PromptSelector, RemotePrompt};
use psync_store::{ConnectionStore, Error as StoreError, InheritanceResolver, PromptStore};

use crate::error::{Error, Result};
use crate::options::{FetchFailurePolicy, PushOptions};
use crate::report::{PushReport, PushResult, PushStatus};
use crate::scope::{resolve_scope, scope_matches};
use crate::{DEFAULT_COMMIT_MESSAGE, SyncEngine};

impl SyncEngine<'_> {
    /// Push local prompts to the registry.
    pub async fn push_prompts(&self, options: &PushOptions) -> Result<PushReport> {
        let store = PromptStore::new(options.dir.clone());
        let loaded = store.load_all()?;
        let resolver = InheritanceResolver::new(&store);

        let mut report = PushReport {
            dry_run: options.dry_run,
            ..Default::default()
        };
        for failure in &loaded.failures {
            report.failures.push(failure.to_string());
        }

        let filter = options.filter();
        for prompt in &loaded.artifacts {
            if prompt.definition.fragment {
                continue;
            }
            if !scope_matches(&prompt.definition.labels, filter) {
                continue;
            }

            let resolved = match resolver.resolve(prompt) {
                Ok(resolved) => resolved,
                Err(error @ StoreError::CircularInheritance { .. }) => return Err(error.into()),
                Err(error) => {
                    report.results.push(
                        PushResult::new(&prompt.name, PushStatus::Failed)
                            .with_detail(error.to_string()),
                    );
                    continue;
                }
            };

            // Which remote revision to compare against: flag, then the
            // artifact's own first label, then the environment default
            let declared = normalize_label_set(&resolved.labels).into_iter().next();
            let selector = PromptSelector {
                label: resolve_scope(
                    options.scope.as_deref(),
                    declared.as_deref(),
                    options.default_scope.as_deref(),
                ),
                version: None,
            };

            let payload = prompt_payload(&resolved, options);
            let local = resolved.canonical();

            let mut detail = None;
            match self.registry().get_prompt(&resolved.name, &selector).await {
                Ok(remote) if equivalent(&local, &remote.canonical()) => {
                    report
                        .results
                        .push(PushResult::new(&resolved.name, PushStatus::Skipped));
                    continue;
                }
                Ok(remote) => {
                    if options.debug_diff {
                        detail = Some(render_issues(diff(&local, &remote.canonical())));
                    }
                }
                Err(error) if error.is_not_found() => {
                    tracing::warn!("{}: no remote counterpart, pushing fresh", resolved.name);
                }
                Err(error) => match options.fetch_failure {
                    FetchFailurePolicy::PushAnyway => {
                        tracing::warn!(
                            "{}: comparison fetch failed ({error}), pushing anyway",
                            resolved.name
                        );
                    }
                    FetchFailurePolicy::FailArtifact => {
                        report.results.push(
                            PushResult::new(&resolved.name, PushStatus::Failed)
                                .with_detail(format!("comparison fetch failed: {error}")),
                        );
                        continue;
                    }
                },
            }

            let mut result = if options.dry_run {
                PushResult::new(&resolved.name, PushStatus::Pushed)
            } else {
                match self.registry().upsert_prompt(&payload).await {
                    Ok(_) => PushResult::new(&resolved.name, PushStatus::Pushed),
                    Err(error) => PushResult::new(&resolved.name, PushStatus::Failed)
                        .with_detail(error.to_string()),
                }
            };
            if result.detail.is_none() {
                result.detail = detail;
            }
            report.results.push(result);
        }

        Ok(report)
    }

    /// Push local connections to the registry.
    ///
    /// Secrets and header values must resolve to non-empty material before
    /// any network traffic happens for that artifact.
    pub async fn push_connections(&self, options: &PushOptions) -> Result<PushReport> {
        let store = ConnectionStore::new(options.dir.clone());
        let loaded = store.load_all()?;

        let mut report = PushReport {
            dry_run: options.dry_run,
            ..Default::default()
        };
        for failure in &loaded.failures {
            report.failures.push(failure.to_string());
        }

        let filter = options.filter();
        for connection in &loaded.artifacts {
            let definition = &connection.definition;
            if !scope_matches(&definition.environments, filter) {
                continue;
            }

            let Some(secret) = definition.secret.as_ref().and_then(|s| s.resolve()) else {
                let error = Error::MissingSecret {
                    provider: definition.provider.clone(),
                };
                report.results.push(
                    PushResult::new(&definition.provider, PushStatus::Failed)
                        .with_detail(error.to_string()),
                );
                continue;
            };

            let mut headers = BTreeMap::new();
            let mut missing_header = None;
            for (name, source) in &definition.extra_headers {
                match source.resolve() {
                    Some(value) => {
                        headers.insert(name.clone(), value);
                    }
                    None => {
                        missing_header = Some(name.clone());
                        break;
                    }
                }
            }
            if let Some(header) = missing_header {
                let error = Error::MissingHeaderValue {
                    provider: definition.provider.clone(),
                    header,
                };
                report.results.push(
                    PushResult::new(&definition.provider, PushStatus::Failed)
                        .with_detail(error.to_string()),
                );
                continue;
            }

            let payload = ConnectionUpsert {
                provider: definition.provider.clone(),
                adapter: definition.adapter,
                base_url: definition.base_url.clone(),
                custom_models: normalize_string_set(&definition.custom_models),
                use_default_models: definition.use_default_models,
                secret,
                extra_headers: headers,
                config: definition.config.clone(),
            };
            let local = definition.canonical();

            let mut detail = None;
            match self.registry().get_connection(&definition.provider).await {
                Ok(remote) if equivalent(&local, &remote.canonical()) => {
                    report
                        .results
                        .push(PushResult::new(&definition.provider, PushStatus::Skipped));
                    continue;
                }
                Ok(remote) => {
                    if options.debug_diff {
                        detail = Some(render_issues(diff(&local, &remote.canonical())));
                    }
                }
                Err(error) if error.is_not_found() => {
                    tracing::warn!(
                        "{}: no remote counterpart, pushing fresh",
                        definition.provider
                    );
                }
                Err(error) => match options.fetch_failure {
                    FetchFailurePolicy::PushAnyway => {
                        tracing::warn!(
                            "{}: comparison fetch failed ({error}), pushing anyway",
                            definition.provider
                        );
                    }
                    FetchFailurePolicy::FailArtifact => {
                        report.results.push(
                            PushResult::new(&definition.provider, PushStatus::Failed)
                                .with_detail(format!("comparison fetch failed: {error}")),
                        );
                        continue;
                    }
                },
            }

            let mut result = if options.dry_run {
                PushResult::new(&definition.provider, PushStatus::Pushed)
            } else {
                match self.registry().upsert_connection(&payload).await {
                    Ok(_) => PushResult::new(&definition.provider, PushStatus::Pushed),
                    Err(error) => PushResult::new(&definition.provider, PushStatus::Failed)
                        .with_detail(error.to_string()),
                }
            };
            if result.detail.is_none() {
                result.detail = detail;
            }
            report.results.push(result);
        }

        Ok(report)
    }
}

fn prompt_payload(resolved: &ResolvedPrompt, options: &PushOptions) -> RemotePrompt {
    RemotePrompt {
        name: resolved.name.clone(),
        kind: resolved.kind,
        text: (resolved.kind == PromptKind::Text).then(|| resolved.text.clone()),
        turns: resolved.turns.clone(),
        labels: normalize_label_set(&resolved.labels),
        tags: normalize_string_set(&resolved.tags),
        config: resolved.config.clone(),
        version: None,
        commit_message: options
            .commit_message
            .clone()
            .or_else(|| resolved.commit_message.clone())
            .or_else(|| Some(DEFAULT_COMMIT_MESSAGE.to_string())),
    }
}

fn render_issues(issues: Vec<psync_diff::Issue>) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
