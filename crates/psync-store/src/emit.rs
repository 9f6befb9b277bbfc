//! Artifact file emission
//!
//! Renders in-memory definitions back into their on-disk form. Known header
//! keys serialize first and operator-added extra keys follow, so a pulled
//! file round-trips without losing anything an operator wrote.

use psync_fs::{NormalizedPath, io};
use psync_model::{ConnectionDefinition, PromptDefinition};

use crate::error::{Error, Result};

/// Render a prompt definition as a front-matter Markdown file.
pub fn render_prompt(definition: &PromptDefinition) -> Result<String> {
    let header = serde_yaml::to_string(definition).map_err(|e| Error::Serialize {
        key: definition.name.clone().unwrap_or_default(),
        message: e.to_string(),
    })?;

    let body = definition.body.trim_end();
    if body.is_empty() {
        Ok(format!("---\n{header}---\n"))
    } else {
        Ok(format!("---\n{header}---\n\n{body}\n"))
    }
}

/// Render a connection definition as a YAML document.
pub fn render_connection(definition: &ConnectionDefinition) -> Result<String> {
    serde_yaml::to_string(definition).map_err(|e| Error::Serialize {
        key: definition.provider.clone(),
        message: e.to_string(),
    })
}

/// Write a prompt file atomically.
pub fn write_prompt(path: &NormalizedPath, definition: &PromptDefinition) -> Result<()> {
    let rendered = render_prompt(definition)?;
    io::write_text(path, &rendered)?;
    Ok(())
}

/// Write a connection file atomically.
pub fn write_connection(path: &NormalizedPath, definition: &ConnectionDefinition) -> Result<()> {
    let rendered = render_connection(definition)?;
    io::write_text(path, &rendered)?;
    Ok(())
}
