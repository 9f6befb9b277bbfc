//! Command reports
//!
//! Every command returns a report instead of printing; the CLI renders
//! them and derives the process exit code.

use psync_diff::Issue;

/// One artifact that differs between local and remote.
#[derive(Debug)]
pub struct Drift {
    pub key: String,
    pub issues: Vec<Issue>,
}

/// Result of a check run.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Artifacts that passed the scope filter and were compared
    pub checked: usize,
    /// Keys with no remote counterpart
    pub missing: Vec<String>,
    /// Artifacts whose canonical forms differ
    pub drifted: Vec<Drift>,
    /// Per-artifact load or resolution failures
    pub failures: Vec<String>,
}

impl CheckReport {
    /// True when the run found nothing to report; the CI gate condition.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.drifted.is_empty() && self.failures.is_empty()
    }
}

/// Result of a pull run.
#[derive(Debug, Default)]
pub struct PullReport {
    /// Keys written (or, under dry-run, that would be written)
    pub written: Vec<String>,
    /// Keys left untouched, with the reason
    pub skipped: Vec<String>,
    /// Per-artifact failures
    pub failures: Vec<String>,
    pub dry_run: bool,
}

/// Terminal state of one pushed artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushStatus {
    /// Canonically equal to the remote counterpart; no write issued
    Skipped,
    /// Upserted (or, under dry-run, would be)
    Pushed,
    /// Resolution, comparison or upsert failed; run continued
    Failed,
}

/// Outcome for one artifact during push.
#[derive(Debug)]
pub struct PushResult {
    pub key: String,
    pub status: PushStatus,
    /// Failure message, warning, or debug diff
    pub detail: Option<String>,
}

impl PushResult {
    pub fn new(key: impl Into<String>, status: PushStatus) -> Self {
        Self {
            key: key.into(),
            status,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Result of a push run.
#[derive(Debug, Default)]
pub struct PushReport {
    pub results: Vec<PushResult>,
    /// Load failures that never reached a per-artifact outcome
    pub failures: Vec<String>,
    pub dry_run: bool,
}

impl PushReport {
    pub fn pushed(&self) -> usize {
        self.count(PushStatus::Pushed)
    }

    pub fn skipped(&self) -> usize {
        self.count(PushStatus::Skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(PushStatus::Failed)
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0 || !self.failures.is_empty()
    }

    fn count(&self, status: PushStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}
