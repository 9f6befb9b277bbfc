//! Wire types for the registry contract

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use psync_model::{
    Adapter, Canonical, CanonicalArtifact, CanonicalField, CanonicalValue, ChatTurn, PromptKind,
    normalize_label_set, normalize_string_set, normalize_text,
};

/// Smallest accepted page size.
pub const MIN_PAGE_SIZE: u32 = 1;
/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Clamp a requested page size into the accepted range.
pub fn clamp_page_size(limit: u32) -> u32 {
    limit.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

/// One page of a list response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Server-reported total; later pages are requested based on this
    pub total_pages: u32,
}

/// Prompt list parameters. Pages are 1-based.
#[derive(Debug, Clone)]
pub struct PromptQuery {
    pub label: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for PromptQuery {
    fn default() -> Self {
        Self {
            label: None,
            page: 1,
            limit: MAX_PAGE_SIZE,
        }
    }
}

/// Connection list parameters. Pages are 1-based.
#[derive(Debug, Clone)]
pub struct ConnectionQuery {
    pub page: u32,
    pub limit: u32,
}

impl Default for ConnectionQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: MAX_PAGE_SIZE,
        }
    }
}

/// Selects which stored prompt revision a get returns.
#[derive(Debug, Clone, Default)]
pub struct PromptSelector {
    pub label: Option<String>,
    pub version: Option<u32>,
}

/// A prompt as the registry stores it.
///
/// Doubles as the upsert payload; `version` is registry-assigned and
/// ignored on write.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemotePrompt {
    pub name: String,
    #[serde(default)]
    pub kind: PromptKind,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub turns: Vec<ChatTurn>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub commit_message: Option<String>,
}

impl Canonical for RemotePrompt {
    fn key(&self) -> &str {
        &self.name
    }

    fn canonical(&self) -> CanonicalArtifact {
        let mut fields = vec![
            CanonicalField::new(
                "labels",
                CanonicalValue::StringSet(normalize_label_set(&self.labels)),
            ),
            CanonicalField::new(
                "tags",
                CanonicalValue::StringSet(normalize_string_set(&self.tags)),
            ),
            CanonicalField::new("config", CanonicalValue::Structured(self.config.clone())),
        ];
        match self.kind {
            PromptKind::Text => {
                fields.push(CanonicalField::new(
                    "body",
                    CanonicalValue::Text(normalize_text(self.text.as_deref().unwrap_or_default())),
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

/// A connection as the registry stores it.
///
/// The registry never returns secret material: only header names come back.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConnection {
    pub provider: String,
    pub adapter: Adapter,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub custom_models: Vec<String>,
    #[serde(default = "default_true")]
    pub use_default_models: bool,
    #[serde(default)]
    pub extra_header_keys: Vec<String>,
    #[serde(default)]
    pub config: serde_json::Value,
}

fn default_true() -> bool {
    true
}

impl Canonical for RemoteConnection {
    fn key(&self) -> &str {
        &self.provider
    }

    fn canonical(&self) -> CanonicalArtifact {
        CanonicalArtifact {
            key: self.provider.clone(),
            kind: "connection",
            fields: vec![
                CanonicalField::new("adapter", CanonicalValue::Scalar(self.adapter.to_string())),
                CanonicalField::new(
                    "base_url",
                    CanonicalValue::Scalar(self.base_url.clone().unwrap_or_default()),
                ),
                CanonicalField::new(
                    "custom_models",
                    CanonicalValue::StringSet(normalize_string_set(&self.custom_models)),
                ),
                CanonicalField::new(
                    "use_default_models",
                    CanonicalValue::Scalar(self.use_default_models.to_string()),
                ),
                CanonicalField::new(
                    "extra_headers",
                    CanonicalValue::StringSet(normalize_string_set(&self.extra_header_keys)),
                ),
                CanonicalField::new("config", CanonicalValue::Structured(self.config.clone())),
            ],
        }
    }
}

/// Connection upsert payload: resolved secret material included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionUpsert {
    pub provider: String,
    pub adapter: Adapter,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub custom_models: Vec<String>,
    #[serde(default = "default_true")]
    pub use_default_models: bool,
    /// Resolved credential; must never be blank
    pub secret: String,
    /// Resolved header values
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,
    #[serde(default)]
    pub config: serde_json::Value,
}

impl ConnectionUpsert {
    /// What the registry will store and return for this payload.
    pub fn stored(&self) -> RemoteConnection {
        RemoteConnection {
            provider: self.provider.clone(),
            adapter: self.adapter,
            base_url: self.base_url.clone(),
            custom_models: self.custom_models.clone(),
            use_default_models: self.use_default_models,
            extra_header_keys: self.extra_headers.keys().cloned().collect(),
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clamp_page_size() {
        assert_eq!(clamp_page_size(0), 1);
        assert_eq!(clamp_page_size(50), 50);
        assert_eq!(clamp_page_size(500), 100);
    }

    #[test]
    fn test_remote_prompt_canonical_matches_local_projection() {
        use psync_model::{PromptKind, ResolvedPrompt};

        let local = ResolvedPrompt {
            name: "greet".into(),
            kind: PromptKind::Text,
            text: "Hello\r\n".into(),
            turns: vec![],
            labels: vec!["production".into(), "latest".into()],
            tags: vec!["b".into(), "a".into()],
            config: serde_json::Value::Null,
            commit_message: None,
        };
        let remote = RemotePrompt {
            name: "greet".into(),
            kind: PromptKind::Text,
            text: Some("Hello".into()),
            turns: vec![],
            labels: vec!["production".into()],
            tags: vec!["a".into(), "b".into()],
            config: serde_json::Value::Null,
            version: Some(7),
            commit_message: Some("server side".into()),
        };
        assert_eq!(local.canonical(), remote.canonical());
    }

    #[test]
    fn test_upsert_stored_exposes_header_names_only() {
        let upsert = ConnectionUpsert {
            provider: "openai-prod".into(),
            adapter: Adapter::Openai,
            base_url: None,
            custom_models: vec![],
            use_default_models: true,
            secret: "sk-live".into(),
            extra_headers: BTreeMap::from([("X-Org".to_string(), "team".to_string())]),
            config: serde_json::Value::Null,
        };
        let stored = upsert.stored();
        assert_eq!(stored.extra_header_keys, vec!["X-Org".to_string()]);
    }
}
