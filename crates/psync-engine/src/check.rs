//! The check command: read-only drift detection

use std::collections::HashMap;

use psync_diff::diff;
use psync_model::Canonical;
use psync_store::{ConnectionStore, Error as StoreError, InheritanceResolver, PromptStore};

use crate::SyncEngine;
use crate::drain::{drain_connections, drain_prompts};
use crate::error::Result;
use crate::options::CheckOptions;
use crate::report::{CheckReport, Drift};
use crate::scope::scope_matches;

impl SyncEngine<'_> {
    /// Compare local prompts against the registry.
    ///
    /// Fragments are skipped, inheritance is resolved, and the full remote
    /// set is drained into a lookup by name. Circular inheritance aborts
    /// the run; other per-artifact failures are recorded and checking
    /// continues.
    pub async fn check_prompts(&self, options: &CheckOptions) -> Result<CheckReport> {
        let store = PromptStore::new(options.dir.clone());
        let loaded = store.load_all()?;
        let resolver = InheritanceResolver::new(&store);

        let mut report = CheckReport::default();
        for failure in &loaded.failures {
            report.failures.push(failure.to_string());
        }

        let remote = drain_prompts(self.registry(), None, options.limit).await?;
        let by_name: HashMap<&str, _> = remote.iter().map(|p| (p.name.as_str(), p)).collect();

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
                    report.failures.push(error.to_string());
                    continue;
                }
            };

            report.checked += 1;
            match by_name.get(resolved.name.as_str()) {
                None => report.missing.push(resolved.name.clone()),
                Some(remote) => {
                    let issues = diff(&resolved.canonical(), &remote.canonical());
                    if !issues.is_empty() {
                        report.drifted.push(Drift {
                            key: resolved.name.clone(),
                            issues,
                        });
                    }
                }
            }
        }

        Ok(report)
    }

    /// Compare local connections against the registry.
    pub async fn check_connections(&self, options: &CheckOptions) -> Result<CheckReport> {
        let store = ConnectionStore::new(options.dir.clone());
        let loaded = store.load_all()?;

        let mut report = CheckReport::default();
        for failure in &loaded.failures {
            report.failures.push(failure.to_string());
        }

        let remote = drain_connections(self.registry(), options.limit).await?;
        let by_provider: HashMap<&str, _> =
            remote.iter().map(|c| (c.provider.as_str(), c)).collect();

        let filter = options.filter();
        for connection in &loaded.artifacts {
            let definition = &connection.definition;
            if !scope_matches(&definition.environments, filter) {
                continue;
            }

            report.checked += 1;
            match by_provider.get(definition.provider.as_str()) {
                None => report.missing.push(definition.provider.clone()),
                Some(remote) => {
                    let issues = diff(&definition.canonical(), &remote.canonical());
                    if !issues.is_empty() {
                        report.drifted.push(Drift {
                            key: definition.provider.clone(),
                            issues,
                        });
                    }
                }
            }
        }

        Ok(report)
    }
}
