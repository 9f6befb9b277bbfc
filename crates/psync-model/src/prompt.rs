//! Prompt template schema - loaded from Markdown files with YAML front matter
//!
//! A prompt file is a `---` fenced YAML header followed by a free-text body.
//! Text prompts keep their template in the body; chat prompts carry an
//! ordered `turns` sequence in the header.
//!
//! # Example
//!
//! ```markdown
//! ---
//! name: agents/greeter
//! labels: [production]
//! tags: [onboarding]
//! extends: [tone/friendly]
//! ---
//! Hello {{user_name}}, welcome aboard.
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::canonical::{
    Canonical, CanonicalArtifact, CanonicalField, CanonicalValue, normalize_label_set,
    normalize_string_set, normalize_text,
};

/// Prompt template flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    /// Single text body
    #[default]
    Text,
    /// Ordered sequence of chat turns
    Chat,
}

impl PromptKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Chat => "chat",
        }
    }
}

/// One turn of a chat prompt
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatTurn {
    /// Speaker role (e.g. "system", "user", "assistant")
    pub role: String,
    /// Turn template text
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// A prompt template as authored on disk.
///
/// Serde covers the front-matter header; the Markdown body is attached by
/// the store after splitting. Unknown header keys land in `extra` and are
/// re-emitted verbatim on pull.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PromptDefinition {
    /// Unique key; derived from the relative file path when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub kind: PromptKind,

    /// Chat turns (chat prompts only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub turns: Vec<ChatTurn>,

    /// Deployment labels; the reserved `latest` label never compares
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Arbitrary structured configuration
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub config: serde_json::Value,

    /// Commit message recorded on push
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,

    /// Remote-assigned version; recorded on pull, never pushed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    /// References to base prompts, merged in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,

    /// Reusable base only: never pushed or compared
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fragment: bool,

    /// Operator-added header keys preserved for round-tripping
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,

    /// Markdown body (text prompts); not part of the header
    #[serde(skip)]
    pub body: String,
}

/// A prompt with its inheritance chain fully materialized.
///
/// This is what check and push actually compare: the name is final, the
/// bases are merged in, and nothing refers back to other files.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPrompt {
    pub name: String,
    pub kind: PromptKind,
    /// Concatenated body (text prompts)
    pub text: String,
    /// Concatenated turns (chat prompts)
    pub turns: Vec<ChatTurn>,
    pub labels: Vec<String>,
    pub tags: Vec<String>,
    pub config: serde_json::Value,
    pub commit_message: Option<String>,
}

impl Canonical for ResolvedPrompt {
    fn key(&self) -> &str {
        &self.name
    }

    fn canonical(&self) -> CanonicalArtifact {
        let mut fields = vec![
            CanonicalField::new("labels", CanonicalValue::StringSet(normalize_label_set(&self.labels))),
            CanonicalField::new("tags", CanonicalValue::StringSet(normalize_string_set(&self.tags))),
            CanonicalField::new("config", CanonicalValue::Structured(self.config.clone())),
        ];
        match self.kind {
            PromptKind::Text => {
                fields.push(CanonicalField::new(
                    "body",
                    CanonicalValue::Text(normalize_text(&self.text)),
                ));
            }
            PromptKind::Chat => {
                let turns = self
                    .turns
                    .iter()
                    .map(|t| ChatTurn::new(t.role.trim(), normalize_text(&t.content)))
                    .collect();
                fields.push(CanonicalField::new("turns", CanonicalValue::Turns(turns)));
            }
        }
        CanonicalArtifact {
            key: self.name.clone(),
            kind: self.kind.as_str(),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolved(labels: &[&str], body: &str) -> ResolvedPrompt {
        ResolvedPrompt {
            name: "greet".into(),
            kind: PromptKind::Text,
            text: body.into(),
            turns: vec![],
            labels: labels.iter().map(|s| s.to_string()).collect(),
            tags: vec![],
            config: serde_json::Value::Null,
            commit_message: None,
        }
    }

    #[test]
    fn test_header_round_trip_preserves_extra_keys() {
        let header = r#"
name: greet
labels: [production]
owner: platform-team
review: pending
"#;
        let def: PromptDefinition = serde_yaml::from_str(header).unwrap();
        assert_eq!(def.name.as_deref(), Some("greet"));
        assert_eq!(def.extra.len(), 2);

        let emitted = serde_yaml::to_string(&def).unwrap();
        assert!(emitted.contains("owner: platform-team"));
        assert!(emitted.contains("review: pending"));
    }

    #[test]
    fn test_kind_defaults_to_text() {
        let def: PromptDefinition = serde_yaml::from_str("name: greet").unwrap();
        assert_eq!(def.kind, PromptKind::Text);
    }

    #[test]
    fn test_latest_label_never_compares() {
        let with_latest = resolved(&["latest", "v2"], "Hello");
        let without = resolved(&["v2"], "Hello");
        assert_eq!(with_latest.canonical(), without.canonical());
    }

    #[test]
    fn test_line_endings_do_not_differ() {
        let crlf = resolved(&[], "Hello\r\nWorld");
        let lf = resolved(&[], "Hello\nWorld");
        assert_eq!(crlf.canonical(), lf.canonical());
    }

    #[test]
    fn test_chat_turn_order_is_significant() {
        let mut a = resolved(&[], "");
        a.kind = PromptKind::Chat;
        a.turns = vec![ChatTurn::new("user", "hi"), ChatTurn::new("assistant", "hello")];

        let mut b = a.clone();
        b.turns.reverse();
        assert_ne!(a.canonical(), b.canonical());
    }
}
