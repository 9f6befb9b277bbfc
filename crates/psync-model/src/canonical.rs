//! Canonical forms for artifact comparison
//!
//! Both artifact families are compared through the same projection: a keyed
//! list of canonical fields in which all text is newline-normalized, all
//! order-irrelevant collections are sorted, and all indirections have been
//! resolved or stripped. Equality on the projection is what "unchanged"
//! means everywhere in the sync engine.

use crate::prompt::ChatTurn;

/// Reserved label meaning "most recent version".
///
/// It is assigned by the registry, not by operators, and must never
/// participate in equality.
pub const LATEST_LABEL: &str = "latest";

/// Unify line endings to `\n` and strip trailing whitespace per line.
pub fn normalize_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trim, drop empties and the `latest` sentinel, sort, dedup.
pub fn normalize_label_set(labels: &[String]) -> Vec<String> {
    let filtered: Vec<String> = labels
        .iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty() && label != LATEST_LABEL)
        .collect();
    sort_dedup(filtered)
}

/// Trim, drop empties, sort, dedup. For tags, model lists, header names.
pub fn normalize_string_set(values: &[String]) -> Vec<String> {
    let filtered: Vec<String> = values
        .iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect();
    sort_dedup(filtered)
}

fn sort_dedup(mut values: Vec<String>) -> Vec<String> {
    values.sort();
    values.dedup();
    values
}

/// Deep value equality over arbitrary config blobs.
///
/// `serde_json::Value` maps compare by key, so insertion order never
/// matters; `null` and an absent blob are treated as the same thing.
pub fn structurally_equal(a: &serde_json::Value, b: &serde_json::Value) -> bool {
    a == b
}

/// The comparison-ready projection of an artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalArtifact {
    /// Identity key within the artifact family
    pub key: String,
    /// Artifact kind ("text", "chat", "connection")
    pub kind: &'static str,
    /// Comparable fields, in a fixed order per family
    pub fields: Vec<CanonicalField>,
}

/// One comparable field of a canonical artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalField {
    pub name: &'static str,
    pub value: CanonicalValue,
}

impl CanonicalField {
    pub fn new(name: &'static str, value: CanonicalValue) -> Self {
        Self { name, value }
    }
}

/// The shapes a canonical field can take.
///
/// The diff engine renders each shape differently: multi-line text becomes
/// a unified patch, sets and scalars print both sides, structured blobs
/// compare deeply, and chat turns compare pairwise in order.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalValue {
    /// Short single-line value
    Scalar(String),
    /// Normalized multi-line text
    Text(String),
    /// Sorted, deduplicated set
    StringSet(Vec<String>),
    /// Arbitrary nested config blob
    Structured(serde_json::Value),
    /// Ordered chat turns (order matters, unlike sets)
    Turns(Vec<ChatTurn>),
}

/// Capability set shared by both artifact families.
pub trait Canonical {
    /// Identity key within the family.
    fn key(&self) -> &str;

    /// Project into comparison-ready form.
    fn canonical(&self) -> CanonicalArtifact;

    /// Whether two artifacts are the same under canonical comparison.
    fn equivalent(&self, other: &dyn Canonical) -> bool {
        self.canonical() == other.canonical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("a\r\nb\r\n", "a\nb")]
    #[case("a\rb", "a\nb")]
    #[case("trailing   \nok", "trailing\nok")]
    #[case("unchanged", "unchanged")]
    fn test_normalize_text(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_text(input), expected);
    }

    #[test]
    fn test_string_set_is_order_insensitive() {
        let a = normalize_string_set(&["b".into(), "a".into()]);
        let b = normalize_string_set(&["a".into(), "b".into()]);
        assert_eq!(a, b);
        assert_eq!(a, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_string_set_normalization_is_idempotent() {
        let once = normalize_string_set(&[" b ".into(), "a".into(), "a".into(), "".into()]);
        let twice = normalize_string_set(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_label_set_drops_sentinel() {
        let labels = normalize_label_set(&["latest".into(), "v2".into()]);
        assert_eq!(labels, vec!["v2".to_string()]);
    }

    #[test]
    fn test_structural_equality_ignores_key_order() {
        let a = json!({"temperature": 0.2, "model": "gpt-4", "stop": ["a", "b"]});
        let b = json!({"model": "gpt-4", "stop": ["a", "b"], "temperature": 0.2});
        assert!(structurally_equal(&a, &b));
    }

    #[test]
    fn test_structural_inequality_on_nested_change() {
        let a = json!({"retry": {"max": 3}});
        let b = json!({"retry": {"max": 4}});
        assert!(!structurally_equal(&a, &b));
    }
}
