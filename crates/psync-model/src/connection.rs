//! LLM-provider connection schema - loaded from YAML documents
//!
//! # Example YAML
//!
//! ```yaml
//! provider: openai-prod
//! adapter: openai
//! secret:
//!   env: OPENAI_API_KEY
//! custom_models: [gpt-4.1-nightly]
//! use_default_models: true
//! extra_headers:
//!   OpenAI-Organization:
//!     env: OPENAI_ORG
//! environments: [prod]
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::canonical::{
    Canonical, CanonicalArtifact, CanonicalField, CanonicalValue, normalize_string_set,
};
use crate::value::ValueSource;

/// Supported provider adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Adapter {
    Openai,
    Anthropic,
    Azure,
    Bedrock,
    GoogleVertexAi,
    GoogleAiStudio,
}

impl Adapter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Openai => "openai",
            Self::Anthropic => "anthropic",
            Self::Azure => "azure",
            Self::Bedrock => "bedrock",
            Self::GoogleVertexAi => "google-vertex-ai",
            Self::GoogleAiStudio => "google-ai-studio",
        }
    }
}

impl std::fmt::Display for Adapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider connection as authored on disk.
///
/// The secret and header values are operator-owned and local-only: the
/// registry never returns them, so only header *names* participate in
/// comparison. `environments` scopes which deployments the connection
/// applies to and is likewise never pushed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionDefinition {
    /// Unique key
    pub provider: String,

    pub adapter: Adapter,

    /// Credential, resolved at push time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<ValueSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_models: Vec<String>,

    #[serde(default = "default_true")]
    pub use_default_models: bool,

    /// Header name to value source; values resolve at push time
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_headers: BTreeMap<String, ValueSource>,

    /// Arbitrary structured configuration
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub config: serde_json::Value,

    /// Scope tags; empty means the connection applies everywhere
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environments: Vec<String>,

    /// Operator-added keys preserved for round-tripping
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

fn default_true() -> bool {
    true
}

impl ConnectionDefinition {
    /// Sorted header names, the only comparable part of `extra_headers`.
    pub fn header_names(&self) -> Vec<String> {
        let names: Vec<String> = self.extra_headers.keys().cloned().collect();
        normalize_string_set(&names)
    }
}

impl Canonical for ConnectionDefinition {
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
                    CanonicalValue::StringSet(self.header_names()),
                ),
                CanonicalField::new("config", CanonicalValue::Structured(self.config.clone())),
            ],
        }
    }
}
