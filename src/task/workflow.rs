//! Installation of a CI workflow file.

use crate::error::{Result, SweepError};
use crate::github::{ContentsOps, RepositoryRef};

use super::{skip_expected, RepoStatus, Task, TaskContext};

/// Styling workflow added to every package.
pub const PHP_CS_FIXER_WORKFLOW: &str = include_str!("../../templates/php-cs-fixer.yml");

/// Creates a workflow file in repositories that already use workflows.
///
/// An existing file is never overwritten.
pub struct WorkflowInstall {
    directory: String,
    file_name: String,
    template: String,
    commit_message: String,
}

impl WorkflowInstall {
    pub fn new(
        directory: impl Into<String>,
        file_name: impl Into<String>,
        template: impl Into<String>,
        commit_message: impl Into<String>,
    ) -> Self {
        Self {
            directory: directory.into().trim_end_matches('/').to_string(),
            file_name: file_name.into(),
            template: template.into(),
            commit_message: commit_message.into(),
        }
    }

    /// The php-cs-fixer styling workflow.
    pub fn php_cs_fixer() -> Self {
        Self::new(
            ".github/workflows",
            "php-cs-fixer.yml",
            PHP_CS_FIXER_WORKFLOW,
            "Add php-cs-fixer workflow",
        )
    }

    /// Repository path of the workflow file.
    pub fn target_path(&self) -> String {
        format!("{}/{}", self.directory, self.file_name)
    }
}

impl Task for WorkflowInstall {
    fn name(&self) -> &str {
        "install-workflow"
    }

    fn run(&self, host: &dyn ContentsOps, repo: &RepositoryRef, ctx: &TaskContext) -> Result<RepoStatus> {
        match host.directory_exists(repo, &self.directory) {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!("skipped {} because it has no {} directory", repo.name, self.directory);
                return Ok(RepoStatus::Skipped(format!("no {} directory", self.directory)));
            }
            Err(e) => return skip_expected(e, repo),
        }

        let path = self.target_path();
        match host.get_file(repo, &path) {
            Ok(_) => {
                tracing::info!("skipped {} because {} already exists", repo.name, path);
                return Ok(RepoStatus::Unchanged(format!("{path} already present")));
            }
            Err(SweepError::NotFound { .. }) => {}
            Err(e) => return skip_expected(e, repo),
        }

        if ctx.dry_run {
            tracing::info!("would create {} in {}", path, repo.url);
            return Ok(RepoStatus::Updated(format!("{path} (dry run)")));
        }

        match host.put_file(repo, &path, &self.commit_message, &self.template, None) {
            Ok(()) => {
                tracing::info!("created {} in {}", path, repo.url);
                Ok(RepoStatus::Updated(path))
            }
            Err(e) => skip_expected(e, repo),
        }
    }
}
