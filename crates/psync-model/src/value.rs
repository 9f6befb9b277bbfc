//! Literal-or-environment value sources
//!
//! Secrets and header values in connection files are either written inline
//! or named via an environment variable. Resolution happens explicitly at
//! the point of use (push), never through ambient lookups.
//!
//! # Example YAML
//!
//! ```yaml
//! secret: sk-live-abc123            # literal shorthand
//! secret:
//!   env: OPENAI_API_KEY             # environment indirection
//! ```

use serde::{Deserialize, Serialize};

/// A value that is either inline or looked up from the environment.
///
/// When both `value` and `env` are present, the literal wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ValueSource {
    /// Inline literal value
    Literal(String),
    /// Explicit form carrying an optional literal and/or an env name
    Lookup {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        env: Option<String>,
    },
}

impl ValueSource {
    /// Build an environment indirection.
    pub fn env_ref(name: impl Into<String>) -> Self {
        Self::Lookup {
            value: None,
            env: Some(name.into()),
        }
    }

    /// Resolve against the process environment.
    ///
    /// Returns `None` when neither source yields a non-empty value.
    pub fn resolve(&self) -> Option<String> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve with a caller-supplied environment lookup.
    pub fn resolve_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        match self {
            Self::Literal(value) => non_empty(value.clone()),
            Self::Lookup { value, env } => value
                .clone()
                .and_then(non_empty)
                .or_else(|| env.as_deref().and_then(&lookup).and_then(non_empty)),
        }
    }

    /// The environment variable name, if this source is an indirection.
    ///
    /// Pull uses this to preserve operator-authored indirection names when
    /// rewriting a local file.
    pub fn env_name(&self) -> Option<&str> {
        match self {
            Self::Literal(_) => None,
            Self::Lookup { env, .. } => env.as_deref(),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}
