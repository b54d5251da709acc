//! In-memory host for rehearsing sweeps without touching GitHub.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, SweepError};
use crate::github::{ContentsOps, FileSnapshot, GitHubRepo, RepoOps, RepoOwner, RepositoryRef};

/// A write the host accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteRecord {
    Put { repo: String, path: String, message: String },
    Delete { repo: String, path: String, message: String },
}

#[derive(Default)]
struct State {
    repos: Vec<GitHubRepo>,
    files: BTreeMap<(String, String), (String, String)>,
    dirs: BTreeSet<(String, String)>,
    archived: BTreeSet<String>,
    empty: BTreeSet<String>,
    broken: BTreeMap<String, String>,
    writes: Vec<WriteRecord>,
    pages: Vec<u32>,
    next_sha: u64,
}

impl State {
    fn sha(&mut self) -> String {
        self.next_sha += 1;
        format!("{:040x}", self.next_sha)
    }

    fn check_writable(&self, repo: &str) -> Result<()> {
        if self.archived.contains(repo) {
            return Err(SweepError::Archived { repo: repo.into() });
        }
        if self.empty.contains(repo) {
            return Err(SweepError::EmptyRepository { repo: repo.into() });
        }
        if let Some(message) = self.broken.get(repo) {
            return Err(SweepError::GitHub {
                status: 500,
                message: message.clone(),
            });
        }
        Ok(())
    }
}

/// An organization held in memory, implementing both host traits.
#[derive(Default)]
pub struct MemoryHost {
    org: String,
    state: RefCell<State>,
}

impl MemoryHost {
    pub fn new(org: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            state: RefCell::default(),
        }
    }

    /// Adds a repository and returns a reference to it.
    pub fn add_repo(&self, name: &str, private: bool, default_branch: &str) -> RepositoryRef {
        let repo = GitHubRepo {
            name: name.to_string(),
            full_name: format!("{}/{}", self.org, name),
            html_url: format!("https://github.com/{}/{}", self.org, name),
            default_branch: Some(default_branch.to_string()),
            archived: false,
            is_private: private,
            owner: RepoOwner {
                login: self.org.clone(),
            },
        };
        let reference = RepositoryRef::from(&repo);
        self.state.borrow_mut().repos.push(repo);
        reference
    }

    pub fn add_file(&self, repo: &str, path: &str, content: &str) {
        let mut state = self.state.borrow_mut();
        let sha = state.sha();
        state
            .files
            .insert((repo.into(), path.into()), (content.into(), sha));
    }

    pub fn add_dir(&self, repo: &str, path: &str) {
        self.state.borrow_mut().dirs.insert((repo.into(), path.into()));
    }

    /// Makes every write to the repository fail as read-only.
    pub fn archive(&self, repo: &str) {
        let mut state = self.state.borrow_mut();
        state.archived.insert(repo.into());
        if let Some(r) = state.repos.iter_mut().find(|r| r.name == repo) {
            r.archived = true;
        }
    }

    /// Makes every read and write of the repository fail as empty.
    pub fn mark_empty(&self, repo: &str) {
        self.state.borrow_mut().empty.insert(repo.into());
    }

    /// Makes every write to the repository fail with a server error.
    pub fn break_writes(&self, repo: &str, message: &str) {
        self.state.borrow_mut().broken.insert(repo.into(), message.into());
    }

    /// Current content of a file.
    pub fn file(&self, repo: &str, path: &str) -> Option<String> {
        self.state
            .borrow()
            .files
            .get(&(repo.to_string(), path.to_string()))
            .map(|(content, _)| content.clone())
    }

    /// Every accepted write, in order.
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.state.borrow().writes.clone()
    }

    /// Page numbers requested through [`RepoOps::list_org_page`].
    pub fn requested_pages(&self) -> Vec<u32> {
        self.state.borrow().pages.clone()
    }
}

impl RepoOps for MemoryHost {
    fn list_org_page(&self, org: &str, page: u32, per_page: u32) -> Result<Vec<GitHubRepo>> {
        let mut state = self.state.borrow_mut();
        state.pages.push(page);
        if org != self.org {
            return Err(SweepError::NotFound { path: format!("orgs/{org}") });
        }

        let per_page = per_page.max(1) as usize;
        let skip = (page.max(1) as usize - 1) * per_page;
        Ok(state.repos.iter().skip(skip).take(per_page).cloned().collect())
    }
}

impl ContentsOps for MemoryHost {
    fn get_file(&self, repo: &RepositoryRef, path: &str) -> Result<FileSnapshot> {
        let state = self.state.borrow();
        if state.empty.contains(&repo.name) {
            return Err(SweepError::EmptyRepository {
                repo: repo.name.clone(),
            });
        }

        state
            .files
            .get(&(repo.name.clone(), path.to_string()))
            .map(|(content, sha)| FileSnapshot {
                path: path.to_string(),
                content: content.clone(),
                sha: sha.clone(),
            })
            .ok_or_else(|| SweepError::NotFound { path: path.into() })
    }

    fn put_file(
        &self,
        repo: &RepositoryRef,
        path: &str,
        message: &str,
        content: &str,
        sha: Option<&str>,
    ) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.check_writable(&repo.name)?;

        let key = (repo.name.clone(), path.to_string());
        let current = state.files.get(&key).map(|(_, s)| s.clone());
        if current.as_deref() != sha {
            return Err(SweepError::GitHub {
                status: 409,
                message: format!("{path} does not match {}", sha.unwrap_or("a new file")),
            });
        }

        let new_sha = state.sha();
        state.files.insert(key, (content.to_string(), new_sha));
        state.writes.push(WriteRecord::Put {
            repo: repo.name.clone(),
            path: path.into(),
            message: message.into(),
        });
        Ok(())
    }

    fn delete_file(&self, repo: &RepositoryRef, path: &str, message: &str, sha: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.check_writable(&repo.name)?;

        let key = (repo.name.clone(), path.to_string());
        match state.files.get(&key) {
            None => return Err(SweepError::NotFound { path: path.into() }),
            Some((_, current)) if current != sha => {
                return Err(SweepError::GitHub {
                    status: 409,
                    message: format!("{path} does not match {sha}"),
                });
            }
            Some(_) => {}
        }

        state.files.remove(&key);
        state.writes.push(WriteRecord::Delete {
            repo: repo.name.clone(),
            path: path.into(),
            message: message.into(),
        });
        Ok(())
    }

    fn directory_exists(&self, repo: &RepositoryRef, path: &str) -> Result<bool> {
        let state = self.state.borrow();
        if state.empty.contains(&repo.name) {
            return Err(SweepError::EmptyRepository {
                repo: repo.name.clone(),
            });
        }

        let prefix = format!("{}/", path.trim_end_matches('/'));
        Ok(state.dirs.contains(&(repo.name.clone(), path.to_string()))
            || state
                .files
                .keys()
                .any(|(r, p)| r == &repo.name && p.starts_with(&prefix)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_requires_current_sha() {
        let host = MemoryHost::new("spatie");
        let repo = host.add_repo("laravel-backup", false, "main");
        host.add_file("laravel-backup", "README.md", "old");

        let snapshot = host.get_file(&repo, "README.md").unwrap();
        assert!(host.put_file(&repo, "README.md", "m", "new", None).is_err());
        host.put_file(&repo, "README.md", "m", "new", Some(&snapshot.sha)).unwrap();
        assert!(host.put_file(&repo, "README.md", "m", "newer", Some(&snapshot.sha)).is_err());
        assert_eq!(host.file("laravel-backup", "README.md").as_deref(), Some("new"));
    }

    #[test]
    fn test_directory_from_file_prefix() {
        let host = MemoryHost::new("spatie");
        let repo = host.add_repo("laravel-backup", false, "main");
        host.add_file("laravel-backup", ".github/workflows/run-tests.yml", "on: push");

        assert!(host.directory_exists(&repo, ".github/workflows").unwrap());
        assert!(!host.directory_exists(&repo, ".circleci").unwrap());
    }

    #[test]
    fn test_paging() {
        let host = MemoryHost::new("spatie");
        for i in 0..5 {
            host.add_repo(&format!("repo-{i}"), false, "main");
        }
        let page = host.list_org_page("spatie", 2, 2).unwrap();
        let names: Vec<_> = page.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["repo-2", "repo-3"]);
    }
}
