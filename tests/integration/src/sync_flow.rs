//! End-to-end sync flows against the in-memory registry
//!
//! Exercises the complete loop for both artifact families: check against a
//! matching and a drifted registry, push with skip-if-unchanged, and pull
//! with operator-field preservation.

use psync_engine::{CheckOptions, PullOptions, PushOptions, SyncEngine};
use psync_model::{Adapter, PromptKind};
use psync_registry::{MemoryRegistry, RemotePrompt};
use std::fs;
use tempfile::TempDir;

fn write(dir: &std::path::Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn remote_text_prompt(name: &str, labels: &[&str], body: &str) -> RemotePrompt {
    RemotePrompt {
        name: name.into(),
        kind: PromptKind::Text,
        text: Some(body.into()),
        turns: vec![],
        labels: labels.iter().map(|s| s.to_string()).collect(),
        tags: vec![],
        config: serde_json::Value::Null,
        version: Some(1),
        commit_message: None,
    }
}

/// A local prompt matching the registry checks clean; flipping the remote
/// body makes the same check report a body drift.
#[tokio::test]
async fn test_check_clean_then_drifted() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "greet.md",
        "---\nlabels: [production]\n---\nHello\n",
    );

    let registry = MemoryRegistry::new();
    registry.seed_prompt(remote_text_prompt("greet", &["production"], "Hello"));

    let engine = SyncEngine::new(&registry);
    let report = engine
        .check_prompts(&CheckOptions::new(temp.path()))
        .await
        .unwrap();
    assert!(report.is_clean());

    registry.seed_prompt(remote_text_prompt("greet", &["production"], "Hi"));
    let report = engine
        .check_prompts(&CheckOptions::new(temp.path()))
        .await
        .unwrap();
    assert!(!report.is_clean());
    assert_eq!(report.drifted.len(), 1);
    assert_eq!(report.drifted[0].key, "greet");
    assert_eq!(report.drifted[0].issues[0].field, "body");
}

/// Push is idempotent: the first run writes, the second skips with zero
/// upsert calls.
#[tokio::test]
async fn test_push_twice_is_idempotent() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "greet.md", "---\nlabels: [production]\n---\nHello\n");
    write(
        temp.path(),
        "chat.md",
        "---\nkind: chat\nturns:\n  - role: system\n    content: Be helpful.\n---\n",
    );

    let registry = MemoryRegistry::new();
    let engine = SyncEngine::new(&registry);

    let report = engine
        .push_prompts(&PushOptions::new(temp.path()))
        .await
        .unwrap();
    assert_eq!(report.pushed(), 2);
    assert_eq!(registry.prompt_upserts(), 2);

    let report = engine
        .push_prompts(&PushOptions::new(temp.path()))
        .await
        .unwrap();
    assert_eq!(report.pushed(), 0);
    assert_eq!(report.skipped(), 2);
    assert_eq!(registry.prompt_upserts(), 2);

    // And a check right after push agrees nothing drifted
    let check = engine
        .check_prompts(&CheckOptions::new(temp.path()))
        .await
        .unwrap();
    assert!(check.is_clean());
}

/// Pull writes remote artifacts, then a pulled tree checks clean and a
/// repeated pull leaves identical content.
#[tokio::test]
async fn test_pull_then_check_round_trip() {
    let temp = TempDir::new().unwrap();

    let registry = MemoryRegistry::new();
    registry.seed_prompt(remote_text_prompt(
        "agents/greet",
        &["production"],
        "Hello there",
    ));

    let engine = SyncEngine::new(&registry);
    let report = engine
        .pull_prompts(&PullOptions::new(temp.path()))
        .await
        .unwrap();
    assert_eq!(report.written, vec!["agents/greet".to_string()]);

    let check = engine
        .check_prompts(&CheckOptions::new(temp.path()))
        .await
        .unwrap();
    assert!(check.is_clean(), "pulled tree should check clean: {check:?}");

    let before = fs::read_to_string(temp.path().join("agents/greet.md")).unwrap();
    engine
        .pull_prompts(&PullOptions::new(temp.path()))
        .await
        .unwrap();
    let after = fs::read_to_string(temp.path().join("agents/greet.md")).unwrap();
    assert_eq!(before, after);
}

/// Connections: push resolves the secret from the environment indirection
/// written in the file, the registry stores header names only, and a
/// subsequent pull preserves the local indirections.
#[tokio::test]
async fn test_connection_push_pull_round_trip() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "anthropic-prod.yaml",
        concat!(
            "provider: anthropic-prod\n",
            "adapter: anthropic\n",
            "secret: sk-ant-live\n",
            "custom_models: [claude-internal]\n",
            "extra_headers:\n",
            "  X-Billing-Tag: platform\n",
            "environments: [prod]\n",
        ),
    );

    let registry = MemoryRegistry::new();
    let engine = SyncEngine::new(&registry);

    let report = engine
        .push_connections(&PushOptions::new(temp.path()))
        .await
        .unwrap();
    assert_eq!(report.pushed(), 1);

    let stored = registry.stored_connection("anthropic-prod").unwrap();
    assert_eq!(stored.adapter, Adapter::Anthropic);
    assert_eq!(stored.custom_models, vec!["claude-internal".to_string()]);
    assert_eq!(stored.extra_header_keys, vec!["X-Billing-Tag".to_string()]);

    // Round trip: pulling back preserves the literal header value and the
    // environments scope, which the registry never saw
    let report = engine
        .pull_connections(&PullOptions::new(temp.path()))
        .await
        .unwrap();
    assert_eq!(report.written, vec!["anthropic-prod".to_string()]);
    let content = fs::read_to_string(temp.path().join("anthropic-prod.yaml")).unwrap();
    assert!(content.contains("X-Billing-Tag: platform"));
    assert!(content.contains("- prod"));
    assert!(content.contains("sk-ant-live"));

    // And the pulled file still checks clean
    let check = engine
        .check_connections(&CheckOptions::new(temp.path()))
        .await
        .unwrap();
    assert!(check.is_clean(), "{check:?}");
}

/// Pagination: more remote artifacts than one page holds are all seen by
/// check, drained page by page.
#[tokio::test]
async fn test_check_drains_every_page() {
    let temp = TempDir::new().unwrap();
    let registry = MemoryRegistry::new();
    for i in 0..7 {
        let name = format!("p{i}");
        write(temp.path(), &format!("{name}.md"), "Same body\n");
        registry.seed_prompt(remote_text_prompt(&name, &[], "Same body"));
    }

    let engine = SyncEngine::new(&registry);
    let mut options = CheckOptions::new(temp.path());
    options.limit = 2;
    let report = engine.check_prompts(&options).await.unwrap();
    assert_eq!(report.checked, 7);
    assert!(report.is_clean());
}

/// Scope filtering end to end: a staging filter ignores production-only
/// prompts but still checks unscoped ones.
#[tokio::test]
async fn test_scope_filter_end_to_end() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "prod-only.md",
        "---\nlabels: [production]\n---\nA\n",
    );
    write(temp.path(), "everywhere.md", "B\n");

    let registry = MemoryRegistry::new();
    registry.seed_prompt(remote_text_prompt("everywhere", &[], "B"));

    let engine = SyncEngine::new(&registry);
    let mut options = CheckOptions::new(temp.path());
    options.scope = Some("staging".into());
    let report = engine.check_prompts(&options).await.unwrap();
    assert_eq!(report.checked, 1);
    assert!(report.is_clean());
}
