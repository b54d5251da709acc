//! Sequential sweep over a list of repositories.

use std::io::Write;

use crate::error::Result;
use crate::gate::{Decision, Gate, KeySource, RunMode};
use crate::github::{ContentsOps, RepositoryRef};
use crate::task::{RepoStatus, Task, TaskContext};

/// Result for a single repository.
#[derive(Debug, Clone)]
pub struct RepoResult {
    pub repo: RepositoryRef,
    pub status: RepoStatus,
}

/// Summary of a sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepSummary {
    pub total_repos: usize,
    pub updated_repos: usize,
    pub unchanged_repos: usize,
    pub skipped_repos: usize,
    pub failed_repos: usize,
    /// The operator ended the run before every repository was visited.
    pub aborted: bool,
}

impl SweepSummary {
    fn record(&mut self, status: &RepoStatus) {
        match status {
            RepoStatus::Updated(_) => self.updated_repos += 1,
            RepoStatus::Unchanged(_) => self.unchanged_repos += 1,
            RepoStatus::Skipped(_) => self.skipped_repos += 1,
            RepoStatus::Failed(_) => self.failed_repos += 1,
        }
    }
}

impl std::fmt::Display for SweepSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} repositories: {} updated, {} unchanged, {} skipped, {} failed",
            self.total_repos,
            self.updated_repos,
            self.unchanged_repos,
            self.skipped_repos,
            self.failed_repos
        )?;
        if self.aborted {
            write!(f, " (stopped by operator)")?;
        }
        Ok(())
    }
}

/// Result of a sweep.
#[derive(Debug)]
pub struct SweepResult {
    pub repo_results: Vec<RepoResult>,
    pub summary: SweepSummary,
}

/// Runs one task over repositories, one at a time.
pub struct Sweep {
    task: Box<dyn Task>,
    mode: RunMode,
    ctx: TaskContext,
}

impl Sweep {
    pub fn new(task: impl Task + 'static) -> Self {
        Self::boxed(Box::new(task))
    }

    pub fn boxed(task: Box<dyn Task>) -> Self {
        Self {
            task,
            mode: RunMode::Step,
            ctx: TaskContext::default(),
        }
    }

    /// Skip the prompt and process every repository.
    pub fn approve_all(mut self) -> Self {
        self.mode = RunMode::All;
        self
    }

    /// Log intended writes instead of making them.
    pub fn dry_run(mut self) -> Self {
        self.ctx.dry_run = true;
        self
    }

    /// Visits each repository in order: ask the gate, then run the task.
    ///
    /// A failing repository is logged and recorded; the sweep moves on. Only
    /// the gate's exit decision, or a broken terminal, ends it early.
    pub fn execute<K: KeySource, W: Write>(
        &self,
        host: &dyn ContentsOps,
        repos: &[RepositoryRef],
        gate: &mut Gate<K, W>,
    ) -> Result<SweepResult> {
        let mut summary = SweepSummary {
            total_repos: repos.len(),
            ..SweepSummary::default()
        };
        let mut repo_results = Vec::with_capacity(repos.len());
        let mut mode = self.mode;

        for repo in repos {
            match gate.ask(mode, &repo.name)? {
                Decision::Proceed(next) => mode = next,
                Decision::Exit => {
                    tracing::info!("stopping before {}", repo.name);
                    summary.aborted = true;
                    break;
                }
            }

            tracing::info!("updating {} {}", repo.name, repo.url);
            let status = match self.task.run(host, repo, &self.ctx) {
                Ok(status) => status,
                Err(e) => {
                    tracing::error!("something went wrong while updating {}: {}", repo.name, e);
                    RepoStatus::Failed(e.to_string())
                }
            };
            tracing::debug!("{} {}: {}", self.task.name(), status.label(), status.detail());

            summary.record(&status);
            repo_results.push(RepoResult {
                repo: repo.clone(),
                status,
            });
        }

        Ok(SweepResult {
            repo_results,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::ScriptedKeys;
    use crate::github::MemoryHost;
    use crate::task::FileRemoval;

    fn host_with(names: &[&str]) -> (MemoryHost, Vec<RepositoryRef>) {
        let host = MemoryHost::new("spatie");
        let repos = names
            .iter()
            .map(|name| {
                host.add_file(name, "SECURITY.md", "mail freek");
                host.add_repo(name, false, "main")
            })
            .collect();
        (host, repos)
    }

    fn gate(keys: &str) -> Gate<ScriptedKeys, Vec<u8>> {
        Gate::new(ScriptedKeys::chars(keys), Vec::new())
    }

    #[test]
    fn test_step_through_every_repo() {
        let (host, repos) = host_with(&["one", "two"]);
        let mut gate = gate("xy");

        let result = Sweep::new(FileRemoval::boilerplate())
            .execute(&host, &repos, &mut gate)
            .unwrap();

        assert_eq!(result.summary.updated_repos, 2);
        assert!(!result.summary.aborted);
        assert_eq!(gate.into_parts().0.remaining(), 0);
    }

    #[test]
    fn test_approve_all_stops_prompting() {
        let (host, repos) = host_with(&["one", "two", "three"]);
        let mut gate = gate("ac");

        let result = Sweep::new(FileRemoval::boilerplate())
            .execute(&host, &repos, &mut gate)
            .unwrap();

        assert_eq!(result.summary.updated_repos, 3);
        let (keys, out) = gate.into_parts();
        assert_eq!(keys.remaining(), 1);
        assert_eq!(String::from_utf8(out).unwrap().matches("Press").count(), 1);
    }

    #[test]
    fn test_exit_touches_nothing_more() {
        let (host, repos) = host_with(&["one", "two", "three"]);
        let mut gate = gate("xc");

        let result = Sweep::new(FileRemoval::boilerplate())
            .execute(&host, &repos, &mut gate)
            .unwrap();

        assert!(result.summary.aborted);
        assert_eq!(result.repo_results.len(), 1);
        assert!(host.file("one", "SECURITY.md").is_none());
        assert!(host.file("two", "SECURITY.md").is_some());
        assert!(host.file("three", "SECURITY.md").is_some());
    }

    #[test]
    fn test_preapproved_run_reads_no_keys() {
        let (host, repos) = host_with(&["one", "two"]);
        let mut gate = gate("");

        let result = Sweep::new(FileRemoval::boilerplate())
            .approve_all()
            .execute(&host, &repos, &mut gate)
            .unwrap();

        assert_eq!(result.summary.updated_repos, 2);
        assert!(!result.summary.aborted);
    }

    #[test]
    fn test_summary_display() {
        let summary = SweepSummary {
            total_repos: 4,
            updated_repos: 1,
            unchanged_repos: 1,
            skipped_repos: 1,
            failed_repos: 1,
            aborted: true,
        };
        assert_eq!(
            summary.to_string(),
            "4 repositories: 1 updated, 1 unchanged, 1 skipped, 1 failed (stopped by operator)"
        );
    }
}
