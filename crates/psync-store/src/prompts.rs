//! Prompt loading
//!
//! Reads prompt files under a root directory into typed records. A file
//! that fails to parse is recorded as a failure without aborting the load,
//! so one broken file never hides the rest of the tree.

use psync_fs::{NormalizedPath, discover, io};
use psync_model::{PromptDefinition, PromptKind};

use crate::error::{Error, Result};
use crate::{Loaded, frontmatter};

/// File extension for prompt files, also the implicit extension for bare
/// extends references.
pub const PROMPT_EXTENSION: &str = "md";

/// A prompt parsed from disk, with its resolved name and origin.
#[derive(Debug, Clone)]
pub struct LoadedPrompt {
    pub path: NormalizedPath,
    pub name: String,
    pub definition: PromptDefinition,
}

/// Loads prompt files from an artifact root.
#[derive(Debug, Clone)]
pub struct PromptStore {
    root: NormalizedPath,
}

impl PromptStore {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Load every prompt under the root, lexically ordered.
    pub fn load_all(&self) -> Result<Loaded<LoadedPrompt>> {
        let paths = discover(&self.root, &[PROMPT_EXTENSION])?;

        let mut artifacts = Vec::new();
        let mut failures = Vec::new();
        for path in paths {
            match self.parse(&path) {
                Ok(prompt) => artifacts.push(prompt),
                Err(error) => {
                    tracing::warn!("failed to parse {}: {}", path, error);
                    failures.push(error);
                }
            }
        }

        Ok(Loaded {
            artifacts,
            failures,
        })
    }

    /// Parse a single prompt file.
    ///
    /// The name falls back to the extension-stripped path relative to the
    /// root when the header does not declare one.
    pub fn parse(&self, path: &NormalizedPath) -> Result<LoadedPrompt> {
        let source = io::read_text(path)?;
        let (header, body) = frontmatter::split(&source);

        let mut definition: PromptDefinition = match header {
            Some(header) if !header.trim().is_empty() => serde_yaml::from_str(header)
                .map_err(|e| Error::malformed(path, e.to_string()))?,
            _ => PromptDefinition::default(),
        };
        definition.body = body.to_string();

        if definition.kind == PromptKind::Chat
            && definition.turns.is_empty()
            && definition.extends.is_empty()
            && !definition.fragment
        {
            return Err(Error::malformed(path, "chat prompt declares no turns"));
        }

        let name = match &definition.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => path.name_relative_to(&self.root),
        };

        Ok(LoadedPrompt {
            path: path.clone(),
            name,
            definition,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &std::path::Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_name_from_header() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "greet.md", "---\nname: custom/greet\n---\nHello\n");

        let store = PromptStore::new(temp.path());
        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.artifacts[0].name, "custom/greet");
    }

    #[test]
    fn test_name_derived_from_path() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "agents/greet.md", "Hello\n");

        let store = PromptStore::new(temp.path());
        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.artifacts[0].name, "agents/greet");
        assert_eq!(loaded.artifacts[0].definition.body, "Hello\n");
    }

    #[test]
    fn test_chat_without_turns_is_malformed() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "chat.md", "---\nkind: chat\n---\n");

        let store = PromptStore::new(temp.path());
        let loaded = store.load_all().unwrap();
        assert!(loaded.artifacts.is_empty());
        assert!(matches!(&loaded.failures[0], Error::Malformed { .. }));
    }

    #[test]
    fn test_chat_fragment_without_turns_is_allowed() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "base.md", "---\nkind: chat\nfragment: true\n---\n");

        let store = PromptStore::new(temp.path());
        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.artifacts.len(), 1);
        assert!(loaded.artifacts[0].definition.fragment);
    }

    #[test]
    fn test_broken_file_does_not_abort_load() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "bad.md", "---\nname: [unclosed\n---\n");
        write(temp.path(), "good.md", "---\nname: good\n---\nok\n");

        let store = PromptStore::new(temp.path());
        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.artifacts.len(), 1);
        assert_eq!(loaded.failures.len(), 1);
    }

    #[test]
    fn test_chat_turns_parse() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "chat.md",
            "---\nkind: chat\nturns:\n  - role: user\n    content: hi\n---\n",
        );

        let store = PromptStore::new(temp.path());
        let loaded = store.load_all().unwrap();
        let turns = &loaded.artifacts[0].definition.turns;
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, "user");
    }
}
