//! Per-repository maintenance tasks.
//!
//! A task touches one repository through [`ContentsOps`] and reports a
//! [`RepoStatus`]. Archived and empty repositories are expected along the
//! way and end up as [`RepoStatus::Skipped`]; any other error is returned to
//! the caller, which logs it and moves on to the next repository.

mod readme;
mod remove;
mod workflow;

pub use readme::{ReadmeEdit, README_CANDIDATES};
pub use remove::{FileRemoval, BOILERPLATE_FILES};
pub use workflow::{WorkflowInstall, PHP_CS_FIXER_WORKFLOW};

use crate::error::{Result, SweepError};
use crate::github::{ContentsOps, RepositoryRef};

/// Outcome of running a task against one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoStatus {
    /// Changes were committed (or would be, in a dry run).
    Updated(String),
    /// The repository already looks right.
    Unchanged(String),
    /// The repository cannot be or should not be touched.
    Skipped(String),
    /// Something went wrong; the message describes it.
    Failed(String),
}

impl RepoStatus {
    /// Short label for log lines and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            RepoStatus::Updated(_) => "updated",
            RepoStatus::Unchanged(_) => "unchanged",
            RepoStatus::Skipped(_) => "skipped",
            RepoStatus::Failed(_) => "failed",
        }
    }

    /// The detail carried by the status.
    pub fn detail(&self) -> &str {
        match self {
            RepoStatus::Updated(d)
            | RepoStatus::Unchanged(d)
            | RepoStatus::Skipped(d)
            | RepoStatus::Failed(d) => d,
        }
    }
}

/// Settings shared by every task in a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskContext {
    /// Log what would be written instead of writing it.
    pub dry_run: bool,
}

/// A maintenance step applied to each repository of a sweep.
pub trait Task {
    /// Name used in log lines.
    fn name(&self) -> &str;

    /// Runs the task against one repository.
    fn run(&self, host: &dyn ContentsOps, repo: &RepositoryRef, ctx: &TaskContext) -> Result<RepoStatus>;
}

/// Turns archived and empty repository failures into a skip.
///
/// Every other error is handed back unchanged.
pub(crate) fn skip_expected(error: SweepError, repo: &RepositoryRef) -> Result<RepoStatus> {
    match error {
        SweepError::Archived { .. } => {
            tracing::info!("skipped {} because it is read-only", repo.name);
            Ok(RepoStatus::Skipped("read-only".into()))
        }
        SweepError::EmptyRepository { .. } => {
            tracing::info!("skipped {} because it is empty", repo.name);
            Ok(RepoStatus::Skipped("empty".into()))
        }
        other => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RepositoryRef {
        RepositoryRef::new("spatie", "laravel-backup", "https://github.com/spatie/laravel-backup")
    }

    #[test]
    fn test_archived_is_skipped() {
        let status = skip_expected(
            SweepError::Archived {
                repo: "laravel-backup".into(),
            },
            &repo(),
        )
        .unwrap();
        assert_eq!(status, RepoStatus::Skipped("read-only".into()));
    }

    #[test]
    fn test_empty_is_skipped() {
        let status = skip_expected(
            SweepError::EmptyRepository {
                repo: "laravel-backup".into(),
            },
            &repo(),
        )
        .unwrap();
        assert_eq!(status.label(), "skipped");
        assert_eq!(status.detail(), "empty");
    }

    #[test]
    fn test_other_errors_propagate() {
        let result = skip_expected(
            SweepError::GitHub {
                status: 500,
                message: "boom".into(),
            },
            &repo(),
        );
        assert!(matches!(result, Err(SweepError::GitHub { status: 500, .. })));
    }
}
