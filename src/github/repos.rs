//! GitHub repository listing.

use crate::error::Result;
use crate::github::GitHubClient;
use globset::{Glob, GlobMatcher};
use serde::Deserialize;

/// Repository information from GitHub API.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(rename = "private", default)]
    pub is_private: bool,
    pub owner: RepoOwner,
}

/// The owning account of a repository.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

/// Identifies a repository targeted by a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
    pub url: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            url: url.into(),
        }
    }
}

impl From<&GitHubRepo> for RepositoryRef {
    fn from(repo: &GitHubRepo) -> Self {
        Self {
            owner: repo.owner.login.clone(),
            name: repo.name.clone(),
            url: repo.html_url.clone(),
        }
    }
}

/// Which repositories of an organization to keep.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    public_only: bool,
    default_branch: Option<String>,
    name: Option<GlobMatcher>,
}

impl ListFilter {
    /// Creates a filter that keeps every repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only public repositories.
    pub fn public_only(mut self) -> Self {
        self.public_only = true;
        self
    }

    /// Keep only repositories whose default branch has this name.
    pub fn default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = Some(branch.into());
        self
    }

    /// Keep only repositories whose name matches a glob pattern.
    pub fn name_glob(mut self, pattern: &str) -> Result<Self> {
        self.name = Some(Glob::new(pattern)?.compile_matcher());
        Ok(self)
    }

    /// Checks whether a repository passes the filter.
    pub fn matches(&self, repo: &GitHubRepo) -> bool {
        if self.public_only && repo.is_private {
            return false;
        }
        if let Some(ref branch) = self.default_branch {
            if repo.default_branch.as_deref() != Some(branch.as_str()) {
                return false;
            }
        }
        if let Some(ref matcher) = self.name {
            if !matcher.is_match(&repo.name) {
                return false;
            }
        }
        true
    }
}

/// Paging parameters for listing an organization.
#[derive(Debug, Clone, Copy)]
pub struct Paging {
    pub per_page: u32,
    pub first_page: u32,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            per_page: 100,
            first_page: 1,
        }
    }
}

/// Repository listing operations.
pub trait RepoOps {
    /// Fetch one page of an organization's repositories.
    fn list_org_page(&self, org: &str, page: u32, per_page: u32) -> Result<Vec<GitHubRepo>>;

    /// List an organization's repositories, following pages until a short one.
    ///
    /// Order follows the API order, pages concatenated.
    fn list_org_repos(&self, org: &str, paging: Paging, filter: &ListFilter) -> Result<Vec<RepositoryRef>> {
        let per_page = paging.per_page.max(1);
        let mut refs = Vec::new();
        let mut page = paging.first_page.max(1);

        loop {
            let repos = self.list_org_page(org, page, per_page)?;
            let full = repos.len() as u32 >= per_page;
            tracing::debug!("page {} of {} returned {} repositories", page, org, repos.len());

            refs.extend(repos.iter().filter(|r| filter.matches(r)).map(RepositoryRef::from));

            if !full {
                break;
            }
            page += 1;
        }

        Ok(refs)
    }
}

impl RepoOps for GitHubClient {
    fn list_org_page(&self, org: &str, page: u32, per_page: u32) -> Result<Vec<GitHubRepo>> {
        let endpoint = format!(
            "/orgs/{}/repos?per_page={}&page={}&type=all",
            urlencoding::encode(org),
            per_page,
            page
        );
        self.get(&endpoint, org, "repos")
    }
}
