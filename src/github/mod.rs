//! GitHub API integration for organization-wide maintenance.
//!
//! This module provides a blocking client for the GitHub REST API to:
//! - List repositories of an organization, page by page
//! - Read, create, update and delete single files through the contents API
//!
//! Both concerns sit behind traits ([`RepoOps`], [`ContentsOps`]) so the
//! sweep pipeline can run against any host implementation, including the
//! in-memory [`MemoryHost`].
//!
//! # Example
//!
//! ```rust,no_run
//! use org_sweep::github::{GitHubClient, ListFilter, Paging, RepoOps};
//!
//! let client = GitHubClient::new("ghp_your_token_here");
//!
//! let repos = client.list_org_repos("spatie", Paging::default(), &ListFilter::new().public_only())?;
//!
//! for repo in repos {
//!     println!("{}: {}", repo.name, repo.url);
//! }
//! # Ok::<(), org_sweep::error::SweepError>(())
//! ```

mod client;
mod contents;
mod memory;
mod repos;

pub use client::{token_from_env, GitHubClient, TOKEN_VARS};
pub use contents::{decode_content, encode_content, ContentsOps, FileSnapshot};
pub use memory::{MemoryHost, WriteRecord};
pub use repos::{GitHubRepo, ListFilter, Paging, RepoOps, RepoOwner, RepositoryRef};
