//! Artifact schemas and canonical forms for promptsync
//!
//! Defines the two synchronized artifact families — prompt templates and
//! LLM-provider connections — together with the canonical projection both
//! families are compared through.

pub mod canonical;
pub mod connection;
pub mod prompt;
pub mod value;

pub use canonical::{
    Canonical, CanonicalArtifact, CanonicalField, CanonicalValue, LATEST_LABEL,
    normalize_label_set, normalize_string_set, normalize_text, structurally_equal,
};
pub use connection::{Adapter, ConnectionDefinition};
pub use prompt::{ChatTurn, PromptDefinition, PromptKind, ResolvedPrompt};
pub use value::ValueSource;
