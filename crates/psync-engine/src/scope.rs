//! Scope filtering and the scope fallback chain

/// Whether an artifact's declared scope set admits a filter value.
///
/// An empty declared set means "applies everywhere" and matches any
/// filter; a non-empty set requires membership. No filter admits
/// everything.
pub fn scope_matches(declared: &[String], filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(value) => declared.is_empty() || declared.iter().any(|scope| scope == value),
    }
}

/// Ordered scope resolution: command-line flag, then the artifact's own
/// declaration, then the environment-provided default.
pub fn resolve_scope(
    flag: Option<&str>,
    declared: Option<&str>,
    env_default: Option<&str>,
) -> Option<String> {
    flag.or(declared).or(env_default).map(str::to_string)
}
