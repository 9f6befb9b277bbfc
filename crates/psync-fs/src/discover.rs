//! Recursive artifact discovery
//!
//! Walks an artifact root and returns every file matching one of the given
//! extensions, lexically sorted so command output and processing order are
//! stable across platforms and runs.

use std::fs;

use crate::{Error, NormalizedPath, Result};

/// Discover artifact files under `root`.
///
/// Recurses through subdirectories, keeps files whose extension is in
/// `extensions` (without the leading dot), and skips dot-prefixed entries.
/// The result is lexically sorted on the normalized path.
pub fn discover(root: &NormalizedPath, extensions: &[&str]) -> Result<Vec<NormalizedPath>> {
    if !root.is_dir() {
        return Err(Error::NotADirectory {
            path: root.to_native(),
        });
    }

    let mut found = Vec::new();
    walk(root, extensions, &mut found)?;
    found.sort();
    Ok(found)
}

fn walk(dir: &NormalizedPath, extensions: &[&str], found: &mut Vec<NormalizedPath>) -> Result<()> {
    let entries = fs::read_dir(dir.to_native()).map_err(|e| Error::io(dir.to_native(), e))?;

    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir.to_native(), e))?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }

        let path = dir.join(&name);
        let file_type = entry
            .file_type()
            .map_err(|e| Error::io(path.to_native(), e))?;

        if file_type.is_dir() {
            walk(&path, extensions, found)?;
        } else if path
            .extension()
            .is_some_and(|ext| extensions.contains(&ext))
        {
            found.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &std::path::Path, rel: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_discover_recurses_and_sorts() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "zeta.md");
        touch(temp.path(), "agents/alpha.md");
        touch(temp.path(), "agents/beta.md");
        touch(temp.path(), "notes.txt");

        let root = NormalizedPath::new(temp.path());
        let found = discover(&root, &["md"]).unwrap();
        let names: Vec<_> = found.iter().map(|p| p.name_relative_to(&root)).collect();
        assert_eq!(names, vec!["agents/alpha", "agents/beta", "zeta"]);
    }

    #[test]
    fn test_discover_filters_extensions() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "openai.yaml");
        touch(temp.path(), "anthropic.yml");
        touch(temp.path(), "readme.md");

        let root = NormalizedPath::new(temp.path());
        let found = discover(&root, &["yaml", "yml"]).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_discover_skips_hidden_entries() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), ".hidden/base.md");
        touch(temp.path(), ".draft.md");
        touch(temp.path(), "visible.md");

        let root = NormalizedPath::new(temp.path());
        let found = discover(&root, &["md"]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].file_name(), Some("visible.md"));
    }

    #[test]
    fn test_discover_missing_root_fails() {
        let temp = TempDir::new().unwrap();
        let root = NormalizedPath::new(temp.path().join("nope"));
        assert!(matches!(
            discover(&root, &["md"]),
            Err(Error::NotADirectory { .. })
        ));
    }
}
