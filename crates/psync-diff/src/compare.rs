//! Field-by-field comparison of canonical artifacts

use psync_model::{CanonicalArtifact, CanonicalValue, ChatTurn};
use similar::TextDiff;

use crate::issue::Issue;

/// Context lines around each hunk in unified patches.
const PATCH_CONTEXT: usize = 3;

/// Whether two canonical artifacts are the same.
pub fn equivalent(local: &CanonicalArtifact, remote: &CanonicalArtifact) -> bool {
    local == remote
}

/// Compare two canonical artifacts, returning one issue per mismatch.
///
/// A kind mismatch short-circuits: the families project different field
/// sets, so field comparison past that point is meaningless.
pub fn diff(local: &CanonicalArtifact, remote: &CanonicalArtifact) -> Vec<Issue> {
    if local.kind != remote.kind {
        return vec![Issue::values("kind", local.kind, remote.kind)];
    }

    let mut issues = Vec::new();
    for field in &local.fields {
        let Some(counterpart) = remote.fields.iter().find(|f| f.name == field.name) else {
            issues.push(Issue::new(field.name, "missing on the remote side"));
            continue;
        };
        diff_value(field.name, &field.value, &counterpart.value, &mut issues);
    }
    issues
}

fn diff_value(name: &str, local: &CanonicalValue, remote: &CanonicalValue, issues: &mut Vec<Issue>) {
    match (local, remote) {
        (CanonicalValue::Scalar(l), CanonicalValue::Scalar(r)) => {
            if l != r {
                issues.push(Issue::values(name, display_or_empty(l), display_or_empty(r)));
            }
        }
        (CanonicalValue::StringSet(l), CanonicalValue::StringSet(r)) => {
            if l != r {
                issues.push(Issue::values(name, render_set(l), render_set(r)));
            }
        }
        (CanonicalValue::Structured(l), CanonicalValue::Structured(r)) => {
            if l != r {
                issues.push(Issue::values(name, render_json(l), render_json(r)));
            }
        }
        (CanonicalValue::Text(l), CanonicalValue::Text(r)) => {
            if l != r {
                issues.push(Issue::new(name, render_patch(r, l)));
            }
        }
        (CanonicalValue::Turns(l), CanonicalValue::Turns(r)) => {
            diff_turns(name, l, r, issues);
        }
        // Mixed shapes only happen across kinds, which short-circuit earlier
        _ => issues.push(Issue::new(name, "field shapes differ")),
    }
}

/// Compare chat turn lists: count first, then pairwise up to the shorter
/// length, then the turns present on only one side.
fn diff_turns(name: &str, local: &[ChatTurn], remote: &[ChatTurn], issues: &mut Vec<Issue>) {
    if local.len() != remote.len() {
        issues.push(Issue::values(
            format!("{name} count"),
            local.len(),
            remote.len(),
        ));
    }

    let shared = local.len().min(remote.len());
    for (index, (l, r)) in local.iter().zip(remote.iter()).take(shared).enumerate() {
        if l.role != r.role {
            issues.push(Issue::values(format!("{name}[{index}].role"), &l.role, &r.role));
        }
        if l.content != r.content {
            issues.push(Issue::new(
                format!("{name}[{index}].content"),
                render_patch(&r.content, &l.content),
            ));
        }
    }

    for (index, turn) in local.iter().enumerate().skip(shared) {
        issues.push(Issue::new(
            format!("{name}[{index}]"),
            format!("only present locally ({}: {})", turn.role, preview(&turn.content)),
        ));
    }
    for (index, turn) in remote.iter().enumerate().skip(shared) {
        issues.push(Issue::new(
            format!("{name}[{index}]"),
            format!("only present remotely ({}: {})", turn.role, preview(&turn.content)),
        ));
    }
}

/// Unified line patch from the remote value to the local one.
fn render_patch(remote: &str, local: &str) -> String {
    TextDiff::from_lines(remote, local)
        .unified_diff()
        .context_radius(PATCH_CONTEXT)
        .header("remote", "local")
        .to_string()
        .trim_end()
        .to_string()
}

fn render_set(values: &[String]) -> String {
    if values.is_empty() {
        "(empty)".to_string()
    } else {
        format!("[{}]", values.join(", "))
    }
}

fn render_json(value: &serde_json::Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}

fn display_or_empty(value: &str) -> &str {
    if value.is_empty() { "(empty)" } else { value }
}

fn preview(content: &str) -> String {
    const MAX: usize = 60;
    let first_line = content.lines().next().unwrap_or_default();
    if first_line.len() > MAX {
        let cut = first_line
            .char_indices()
            .take_while(|(i, _)| *i < MAX)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(first_line.len());
        format!("{}...", &first_line[..cut])
    } else if content.lines().count() > 1 {
        format!("{first_line}...")
    } else {
        first_line.to_string()
    }
}
