//! Removal of per-repository community health files.

use crate::error::{Result, SweepError};
use crate::github::{ContentsOps, RepositoryRef};

use super::{skip_expected, RepoStatus, Task, TaskContext};

/// Files superseded by the organization-wide `.github` repository.
pub const BOILERPLATE_FILES: [&str; 6] = [
    "SECURITY.md",
    "CONTRIBUTING.md",
    "FUNDING.md",
    ".github/SECURITY.md",
    ".github/CONTRIBUTING.md",
    ".github/FUNDING.md",
];

/// Deletes a fixed list of files wherever they exist.
pub struct FileRemoval {
    paths: Vec<String>,
    commit_message: String,
}

enum Removal {
    Removed,
    Absent,
}

impl FileRemoval {
    pub fn new(paths: impl IntoIterator<Item = impl Into<String>>, commit_message: impl Into<String>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            commit_message: commit_message.into(),
        }
    }

    /// The community health file cleanup.
    pub fn boilerplate() -> Self {
        Self::new(BOILERPLATE_FILES, "Use organisation-wide community health files")
    }

    fn remove(
        &self,
        host: &dyn ContentsOps,
        repo: &RepositoryRef,
        path: &str,
        ctx: &TaskContext,
    ) -> Result<Removal> {
        let snapshot = match host.get_file(repo, path) {
            Ok(snapshot) => snapshot,
            Err(SweepError::NotFound { .. }) => return Ok(Removal::Absent),
            Err(e) => return Err(e),
        };

        tracing::info!("removing file {} in {}", path, repo.name);
        if ctx.dry_run {
            return Ok(Removal::Removed);
        }

        host.delete_file(repo, path, &self.commit_message, &snapshot.sha)?;
        Ok(Removal::Removed)
    }
}

impl Task for FileRemoval {
    fn name(&self) -> &str {
        "remove-files"
    }

    fn run(&self, host: &dyn ContentsOps, repo: &RepositoryRef, ctx: &TaskContext) -> Result<RepoStatus> {
        let mut removed = 0;
        let mut failed = Vec::new();

        for path in &self.paths {
            match self.remove(host, repo, path, ctx) {
                Ok(Removal::Removed) => removed += 1,
                Ok(Removal::Absent) => {}
                Err(e @ (SweepError::Archived { .. } | SweepError::EmptyRepository { .. })) => {
                    return skip_expected(e, repo);
                }
                Err(e) => {
                    tracing::error!("something went wrong while removing {} in {}: {}", path, repo.name, e);
                    failed.push(path.as_str());
                }
            }
        }

        let suffix = if ctx.dry_run { " (dry run)" } else { "" };
        if !failed.is_empty() {
            Ok(RepoStatus::Failed(format!("could not remove {}", failed.join(", "))))
        } else if removed > 0 {
            Ok(RepoStatus::Updated(format!("removed {removed} file(s){suffix}")))
        } else {
            Ok(RepoStatus::Unchanged("no boilerplate files".into()))
        }
    }
}
