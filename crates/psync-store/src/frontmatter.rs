//! Front-matter splitting for prompt files
//!
//! A prompt file is an optional `---` fenced YAML header followed by the
//! Markdown body. Files without a fence are all body.

/// Split a prompt source into its YAML header and body.
///
/// The opening fence must be the very first line. The body starts after the
/// closing fence, with one leading blank line tolerated.
pub fn split(source: &str) -> (Option<&str>, &str) {
    let rest = match source.strip_prefix("---") {
        Some(rest) if rest.starts_with('\n') || rest.starts_with("\r\n") => rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .unwrap_or(rest),
        _ => return (None, source),
    };

    for (idx, line) in fence_candidates(rest) {
        if line.trim_end() == "---" {
            let header = &rest[..idx];
            let after = &rest[idx + line.len()..];
            let body = after
                .strip_prefix("\r\n")
                .or_else(|| after.strip_prefix('\n'))
                .unwrap_or(after);
            let body = body
                .strip_prefix("\r\n")
                .or_else(|| body.strip_prefix('\n'))
                .unwrap_or(body);
            return (Some(header), body);
        }
    }

    // Unterminated fence: treat the whole file as body
    (None, source)
}

/// Byte offsets and text of each line, fence included.
fn fence_candidates(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |line| {
        let idx = offset;
        offset += line.len();
        (idx, line.trim_end_matches('\n'))
    })
}
