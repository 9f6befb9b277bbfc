//! Per-command options

use psync_fs::NormalizedPath;
use psync_registry::MAX_PAGE_SIZE;

/// What to do when the pre-push comparison fetch fails for a reason other
/// than not-found.
///
/// Not-found is meaningful absence and always proceeds to push; an actual
/// read failure defaults to failing that artifact so a transient error
/// cannot cause an unnecessary write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchFailurePolicy {
    /// Record the artifact as failed and continue with the next one
    #[default]
    FailArtifact,
    /// Fail-open: push anyway with a warning
    PushAnyway,
}

/// Options for the check command.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Artifact root directory
    pub dir: NormalizedPath,
    /// Scope/label filter from the command line
    pub scope: Option<String>,
    /// Environment-provided fallback scope
    pub default_scope: Option<String>,
    /// Remote page size
    pub limit: u32,
}

impl CheckOptions {
    pub fn new(dir: impl Into<NormalizedPath>) -> Self {
        Self {
            dir: dir.into(),
            scope: None,
            default_scope: None,
            limit: MAX_PAGE_SIZE,
        }
    }

    /// Effective filter: flag first, then the environment default.
    pub fn filter(&self) -> Option<&str> {
        self.scope.as_deref().or(self.default_scope.as_deref())
    }
}

/// Options for the pull command.
#[derive(Debug, Clone)]
pub struct PullOptions {
    pub dir: NormalizedPath,
    pub scope: Option<String>,
    pub default_scope: Option<String>,
    pub limit: u32,
    /// Report what would be written without touching disk
    pub dry_run: bool,
    /// Overwrite local prompts that declare extends
    pub force: bool,
}

impl PullOptions {
    pub fn new(dir: impl Into<NormalizedPath>) -> Self {
        Self {
            dir: dir.into(),
            scope: None,
            default_scope: None,
            limit: MAX_PAGE_SIZE,
            dry_run: false,
            force: false,
        }
    }

    pub fn filter(&self) -> Option<&str> {
        self.scope.as_deref().or(self.default_scope.as_deref())
    }
}

/// Options for the push command.
#[derive(Debug, Clone)]
pub struct PushOptions {
    pub dir: NormalizedPath,
    pub scope: Option<String>,
    pub default_scope: Option<String>,
    pub limit: u32,
    /// Resolve and compare, but never write to the registry
    pub dry_run: bool,
    /// Attach the structural diff to each pushed result
    pub debug_diff: bool,
    /// Commit message override
    pub commit_message: Option<String>,
    pub fetch_failure: FetchFailurePolicy,
}

impl PushOptions {
    pub fn new(dir: impl Into<NormalizedPath>) -> Self {
        Self {
            dir: dir.into(),
            scope: None,
            default_scope: None,
            limit: MAX_PAGE_SIZE,
            dry_run: false,
            debug_diff: false,
            commit_message: None,
            fetch_failure: FetchFailurePolicy::default(),
        }
    }

    pub fn filter(&self) -> Option<&str> {
        self.scope.as_deref().or(self.default_scope.as_deref())
    }
}
