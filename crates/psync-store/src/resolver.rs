//! Prompt inheritance resolution
//!
//! Materializes a prompt's `extends` chain depth-first: every base is fully
//! resolved (including its own bases) before it is merged, and a visited set
//! of canonical absolute paths travels through the recursion as the cycle
//! guard. Merge order is declaration order, bases before the prompt's own
//! content. Labels, tags, config and commit message always come from the
//! prompt itself.

use std::collections::HashSet;
use std::path::PathBuf;

use psync_fs::NormalizedPath;
use psync_model::{ChatTurn, PromptKind, ResolvedPrompt};

use crate::error::{Error, Result};
use crate::prompts::{LoadedPrompt, PromptStore};

/// Resolves prompt inheritance chains against a store root.
pub struct InheritanceResolver<'a> {
    store: &'a PromptStore,
}

impl<'a> InheritanceResolver<'a> {
    pub fn new(store: &'a PromptStore) -> Self {
        Self { store }
    }

    /// Fully materialize a loaded prompt.
    pub fn resolve(&self, prompt: &LoadedPrompt) -> Result<ResolvedPrompt> {
        let mut visited = HashSet::new();
        visited.insert(prompt.path.canonical()?);

        let (text, turns) = self.materialize(prompt, &mut visited)?;

        if prompt.definition.kind == PromptKind::Chat
            && turns.is_empty()
            && !prompt.definition.fragment
        {
            return Err(Error::malformed(
                &prompt.path,
                "chat prompt resolved to zero turns",
            ));
        }

        Ok(ResolvedPrompt {
            name: prompt.name.clone(),
            kind: prompt.definition.kind,
            text,
            turns,
            labels: prompt.definition.labels.clone(),
            tags: prompt.definition.tags.clone(),
            config: prompt.definition.config.clone(),
            commit_message: prompt.definition.commit_message.clone(),
        })
    }

    /// Resolve a prompt's bases and merge its own content after them.
    fn materialize(
        &self,
        prompt: &LoadedPrompt,
        visited: &mut HashSet<PathBuf>,
    ) -> Result<(String, Vec<ChatTurn>)> {
        let mut segments: Vec<String> = Vec::new();
        let mut turns: Vec<ChatTurn> = Vec::new();

        for reference in &prompt.definition.extends {
            let base_path = self.reference_path(reference, &prompt.path);
            let canonical = base_path.canonical().map_err(|_| Error::MissingBase {
                path: prompt.path.to_string(),
                reference: reference.clone(),
            })?;
            if !visited.insert(canonical) {
                return Err(Error::CircularInheritance {
                    path: base_path.to_string(),
                });
            }

            let base = self.store.parse(&base_path)?;
            if base.definition.kind != prompt.definition.kind {
                return Err(Error::KindMismatch {
                    path: prompt.path.to_string(),
                    base: base_path.to_string(),
                });
            }

            let (base_text, base_turns) = self.materialize(&base, visited)?;
            if !base_text.is_empty() {
                segments.push(base_text);
            }
            turns.extend(base_turns);
        }

        match prompt.definition.kind {
            PromptKind::Text => {
                let own = prompt.definition.body.trim();
                if !own.is_empty() {
                    segments.push(own.to_string());
                }
            }
            PromptKind::Chat => {
                turns.extend(prompt.definition.turns.iter().cloned());
            }
        }

        Ok((segments.join("\n\n"), turns))
    }

    /// Map an extends reference to a file path.
    ///
    /// `./` and `../` references resolve against the referencing file's
    /// directory, `/` prefixed references against the root, and bare names
    /// against the root. The prompt extension is implied when absent.
    fn reference_path(&self, reference: &str, referrer: &NormalizedPath) -> NormalizedPath {
        let with_ext = if reference.ends_with(".md") {
            reference.to_string()
        } else {
            format!("{reference}.md")
        };

        if let Some(stripped) = with_ext.strip_prefix("./") {
            self.referrer_dir(referrer).join(stripped)
        } else if with_ext.starts_with("../") {
            self.referrer_dir(referrer).join(&with_ext)
        } else if let Some(stripped) = with_ext.strip_prefix('/') {
            self.store.root().join(stripped)
        } else {
            self.store.root().join(&with_ext)
        }
    }

    fn referrer_dir(&self, referrer: &NormalizedPath) -> NormalizedPath {
        referrer
            .parent()
            .unwrap_or_else(|| self.store.root().clone())
    }
}
