//! Diff issue type

/// One mismatching field between a local and a remote artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// Field path, e.g. `labels` or `turns[2].content`
    pub field: String,
    /// Human-readable rendering: both values, or a unified patch
    pub detail: String,
}

impl Issue {
    pub fn new(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            detail: detail.into(),
        }
    }

    /// Both-sides rendering for short values.
    pub fn values(
        field: impl Into<String>,
        local: impl std::fmt::Display,
        remote: impl std::fmt::Display,
    ) -> Self {
        Self::new(field, format!("local: {local}\nremote: {remote}"))
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.detail.contains('\n') {
            write!(f, "{}:\n{}", self.field, self.detail)
        } else {
            write!(f, "{}: {}", self.field, self.detail)
        }
    }
}
