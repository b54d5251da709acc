//! Readme editing.

use crate::diff::{unified_diff, DiffSummary};
use crate::error::Result;
use crate::github::{ContentsOps, FileSnapshot, RepositoryRef};
use crate::transform::{Outcome, Transform};

use super::{skip_expected, RepoStatus, Task, TaskContext};

/// Readme file names, in lookup order.
pub const README_CANDIDATES: [&str; 2] = ["README.md", "readme.md"];

/// Applies a text transformation to a repository's readme.
pub struct ReadmeEdit {
    transform: Box<dyn Transform>,
    commit_message: String,
    candidates: Vec<String>,
}

impl ReadmeEdit {
    pub fn new(transform: impl Transform + 'static, commit_message: impl Into<String>) -> Self {
        Self {
            transform: Box::new(transform),
            commit_message: commit_message.into(),
            candidates: README_CANDIDATES.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Overrides the file names tried, in order.
    pub fn candidates(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.candidates = names.into_iter().map(Into::into).collect();
        self
    }

    /// Fetches the first candidate that exists.
    fn fetch(&self, host: &dyn ContentsOps, repo: &RepositoryRef) -> Result<Option<FileSnapshot>> {
        for name in &self.candidates {
            match host.get_file(repo, name) {
                Ok(snapshot) => return Ok(Some(snapshot)),
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }
}

impl Task for ReadmeEdit {
    fn name(&self) -> &str {
        "readme"
    }

    fn run(&self, host: &dyn ContentsOps, repo: &RepositoryRef, ctx: &TaskContext) -> Result<RepoStatus> {
        let snapshot = match self.fetch(host, repo) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                tracing::info!("skipped {} because it has no readme", repo.url);
                return Ok(RepoStatus::Skipped("no readme".into()));
            }
            Err(e) => return skip_expected(e, repo),
        };

        let updated = match self.transform.apply(&snapshot.content) {
            Outcome::Unchanged => {
                tracing::info!("skipped {} because it did not have the copy.", repo.url);
                return Ok(RepoStatus::Unchanged(snapshot.path));
            }
            Outcome::Changed(updated) => updated,
        };

        if ctx.dry_run {
            let summary = DiffSummary::from_diff(&snapshot.content, &updated);
            tracing::info!("would update {} in {} ({})", snapshot.path, repo.url, summary);
            tracing::debug!("{}", unified_diff(&snapshot.content, &updated, &snapshot.path));
            return Ok(RepoStatus::Updated(format!("{} (dry run)", snapshot.path)));
        }

        match host.put_file(
            repo,
            &snapshot.path,
            &self.commit_message,
            &updated,
            Some(&snapshot.sha),
        ) {
            Ok(()) => {
                tracing::info!("updated {}", repo.url);
                Ok(RepoStatus::Updated(snapshot.path))
            }
            Err(e) => skip_expected(e, repo),
        }
    }
}
