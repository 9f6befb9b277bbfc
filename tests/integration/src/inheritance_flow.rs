//! Inheritance-centric flows: materialization, fragments, cycle handling,
//! and the pull-side protection of authored extends relations.

use psync_engine::{CheckOptions, PullOptions, PushOptions, SyncEngine};
use psync_model::PromptKind;
use psync_registry::{MemoryRegistry, RemotePrompt};
use std::fs;
use tempfile::TempDir;

fn write(dir: &std::path::Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A chat prompt assembled from a two-level extends chain pushes the fully
/// materialized turn sequence; the fragment itself is never pushed.
#[tokio::test]
async fn test_chat_inheritance_pushes_materialized_turns() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "tone/polite.md",
        concat!(
            "---\n",
            "kind: chat\n",
            "fragment: true\n",
            "turns:\n",
            "  - role: system\n",
            "    content: Stay polite.\n",
            "---\n",
        ),
    );
    write(
        temp.path(),
        "support.md",
        concat!(
            "---\n",
            "kind: chat\n",
            "extends: [tone/polite]\n",
            "turns:\n",
            "  - role: user\n",
            "    content: '{{question}}'\n",
            "---\n",
        ),
    );

    let registry = MemoryRegistry::new();
    let engine = SyncEngine::new(&registry);
    let report = engine
        .push_prompts(&PushOptions::new(temp.path()))
        .await
        .unwrap();
    assert_eq!(report.pushed(), 1);
    assert_eq!(registry.prompt_upserts(), 1);

    let stored = registry.stored_prompt("support").unwrap();
    assert_eq!(stored.kind, PromptKind::Chat);
    let roles: Vec<_> = stored.turns.iter().map(|t| t.role.as_str()).collect();
    assert_eq!(roles, vec!["system", "user"]);
    assert_eq!(stored.turns[0].content, "Stay polite.");

    assert!(registry.stored_prompt("tone/polite").is_none());
}

/// Text inheritance joins base and child bodies with one blank line, and
/// the result is what the registry compares against.
#[tokio::test]
async fn test_text_inheritance_checks_clean_against_joined_body() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "intro.md", "---\nfragment: true\n---\nIntro\n");
    write(
        temp.path(),
        "details.md",
        "---\nextends: [intro]\n---\nDetails\n",
    );

    let registry = MemoryRegistry::new();
    registry.seed_prompt(RemotePrompt {
        name: "details".into(),
        kind: PromptKind::Text,
        text: Some("Intro\n\nDetails".into()),
        turns: vec![],
        labels: vec![],
        tags: vec![],
        config: serde_json::Value::Null,
        version: Some(1),
        commit_message: None,
    });

    let engine = SyncEngine::new(&registry);
    let report = engine
        .check_prompts(&CheckOptions::new(temp.path()))
        .await
        .unwrap();
    assert!(report.is_clean(), "{report:?}");
}

/// A cycle anywhere in the tree aborts check and push entirely; nothing is
/// written.
#[tokio::test]
async fn test_cycle_aborts_check_and_push() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.md", "---\nextends: [b]\n---\nA\n");
    write(temp.path(), "b.md", "---\nextends: [a]\n---\nB\n");

    let registry = MemoryRegistry::new();
    let engine = SyncEngine::new(&registry);

    assert!(
        engine
            .check_prompts(&CheckOptions::new(temp.path()))
            .await
            .is_err()
    );
    assert!(
        engine
            .push_prompts(&PushOptions::new(temp.path()))
            .await
            .is_err()
    );
    assert_eq!(registry.prompt_upserts(), 0);
}

/// Pull refuses to flatten an authored extends relation unless forced.
#[tokio::test]
async fn test_pull_never_flattens_extends_without_force() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "intro.md", "---\nfragment: true\n---\nIntro\n");
    write(
        temp.path(),
        "details.md",
        "---\nextends: [intro]\n---\nDetails\n",
    );

    let registry = MemoryRegistry::new();
    registry.seed_prompt(RemotePrompt {
        name: "details".into(),
        kind: PromptKind::Text,
        text: Some("Intro\n\nDetails".into()),
        turns: vec![],
        labels: vec![],
        tags: vec![],
        config: serde_json::Value::Null,
        version: Some(3),
        commit_message: None,
    });

    let engine = SyncEngine::new(&registry);
    let report = engine
        .pull_prompts(&PullOptions::new(temp.path()))
        .await
        .unwrap();
    assert!(report.written.is_empty());
    assert_eq!(report.skipped.len(), 1);

    let authored = fs::read_to_string(temp.path().join("details.md")).unwrap();
    assert!(authored.contains("extends"));

    let mut options = PullOptions::new(temp.path());
    options.force = true;
    let report = engine.pull_prompts(&options).await.unwrap();
    assert_eq!(report.written, vec!["details".to_string()]);

    let flattened = fs::read_to_string(temp.path().join("details.md")).unwrap();
    assert!(flattened.contains("Intro\n\nDetails"));
    assert!(!flattened.contains("extends"));
}

/// A kind mismatch in a chain fails that artifact but the rest of the tree
/// still pushes.
#[tokio::test]
async fn test_kind_mismatch_is_isolated() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "base.md", "---\nfragment: true\n---\nText base\n");
    write(
        temp.path(),
        "bad-chat.md",
        concat!(
            "---\n",
            "kind: chat\n",
            "extends: [base]\n",
            "turns:\n",
            "  - role: user\n",
            "    content: hi\n",
            "---\n",
        ),
    );
    write(temp.path(), "fine.md", "All good\n");

    let registry = MemoryRegistry::new();
    let engine = SyncEngine::new(&registry);
    let report = engine
        .push_prompts(&PushOptions::new(temp.path()))
        .await
        .unwrap();
    assert_eq!(report.failed(), 1);
    assert_eq!(report.pushed(), 1);
    assert!(registry.stored_prompt("fine").is_some());
    assert!(registry.stored_prompt("bad-chat").is_none());
}
