//! # org-sweep
//!
//! Batch maintenance for every repository of a GitHub organization.
//!
//! This crate provides:
//! - Listing an organization's repositories, filtered by visibility, default
//!   branch and name
//! - Readme edits: replacing a notice, rewriting a Markdown section
//! - Removing boilerplate community health files
//! - Installing a CI workflow file where none exists
//! - An operator gate that confirms each repository with a single key press
//!
//! All changes are committed through the GitHub contents API, one request at
//! a time, using the fetched blob sha to guard against lost updates.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use org_sweep::prelude::*;
//!
//! let client = GitHubClient::from_env()?;
//! let repos = client.list_org_repos("spatie", Paging::default(), &ListFilter::new().public_only())?;
//!
//! let result = Sweep::new(ReadmeEdit::new(NoticeReplace::security_contact(), "Change copy"))
//!     .dry_run()
//!     .execute(&client, &repos, &mut Gate::terminal())?;
//!
//! println!("{}", result.summary);
//! # Ok::<(), org_sweep::error::SweepError>(())
//! ```
//!
//! ## Transformations
//!
//! ```rust
//! use org_sweep::prelude::*;
//!
//! let readme = "# Package\n\n## Support us\n\nSend a postcard.\n\n## Usage\n\nRun it.\n";
//! let outcome = SectionReplace::new("## Support us", "## Support us\n\nBuy a product.\n").apply(readme);
//!
//! assert!(outcome.is_changed());
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod gate;
pub mod github;
pub mod sweep;
pub mod task;
pub mod transform;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::SweepConfig;
    pub use crate::error::{Result, SweepError};
    pub use crate::gate::{Decision, Gate, Key, KeySource, RunMode, ScriptedKeys, TerminalKeys};
    pub use crate::github::{
        ContentsOps, FileSnapshot, GitHubClient, ListFilter, MemoryHost, Paging, RepoOps,
        RepositoryRef,
    };
    pub use crate::sweep::{RepoResult, Sweep, SweepResult, SweepSummary};
    pub use crate::task::{FileRemoval, ReadmeEdit, RepoStatus, Task, TaskContext, WorkflowInstall};
    pub use crate::transform::{NoticeReplace, Outcome, SectionReplace, Transform};
}

pub use prelude::*;
