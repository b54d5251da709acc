//! Run configuration, loadable from YAML.
//!
//! # Example YAML
//!
//! ```yaml
//! org: spatie
//! page_size: 100
//! public_only: true
//! notice:
//!   old:
//!     - If you discover any security related issues, please email freek@spatie.be instead of using the issue tracker.
//!   new: If you've found a bug regarding security please mail security@spatie.be instead of using the issue tracker.
//! workflow:
//!   default_branch: master
//! ```
//!
//! Omitted fields keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SweepError};
use crate::github::{ListFilter, Paging};
use crate::task::{
    FileRemoval, ReadmeEdit, WorkflowInstall, BOILERPLATE_FILES, PHP_CS_FIXER_WORKFLOW,
};
use crate::transform::notice::{LEGACY_SECURITY_NOTICES, SECURITY_NOTICE};
use crate::transform::section::SUPPORT_US;
use crate::transform::{NoticeReplace, SectionReplace};

/// Settings for a sweep over an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub org: String,
    pub page_size: u32,
    pub start_page: u32,
    pub public_only: bool,
    /// Glob over repository names.
    pub only: Option<String>,
    pub notice: NoticeConfig,
    pub support_section: SectionConfig,
    pub remove_files: RemoveFilesConfig,
    pub workflow: WorkflowConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            org: "spatie".into(),
            page_size: 100,
            start_page: 1,
            public_only: false,
            only: None,
            notice: NoticeConfig::default(),
            support_section: SectionConfig::default(),
            remove_files: RemoveFilesConfig::default(),
            workflow: WorkflowConfig::default(),
        }
    }
}

/// The notice replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeConfig {
    pub old: Vec<String>,
    pub new: String,
    pub commit_message: String,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            old: LEGACY_SECURITY_NOTICES.iter().map(|s| s.to_string()).collect(),
            new: SECURITY_NOTICE.into(),
            commit_message: "Change copy".into(),
        }
    }
}

impl NoticeConfig {
    pub fn to_task(&self) -> ReadmeEdit {
        ReadmeEdit::new(
            NoticeReplace::new(self.old.clone(), self.new.clone()),
            self.commit_message.clone(),
        )
    }
}

/// The readme section rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    pub heading: String,
    pub replacement: String,
    pub commit_message: String,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            heading: "## Support us".into(),
            replacement: SUPPORT_US.into(),
            commit_message: "Update support us section".into(),
        }
    }
}

impl SectionConfig {
    pub fn to_task(&self) -> ReadmeEdit {
        ReadmeEdit::new(
            SectionReplace::new(&self.heading, self.replacement.clone()),
            self.commit_message.clone(),
        )
    }
}

/// The boilerplate file cleanup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoveFilesConfig {
    pub paths: Vec<String>,
    pub commit_message: String,
}

impl Default for RemoveFilesConfig {
    fn default() -> Self {
        Self {
            paths: BOILERPLATE_FILES.iter().map(|s| s.to_string()).collect(),
            commit_message: "Use organisation-wide community health files".into(),
        }
    }
}

impl RemoveFilesConfig {
    pub fn to_task(&self) -> FileRemoval {
        FileRemoval::new(self.paths.clone(), self.commit_message.clone())
    }
}

/// The workflow installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub directory: String,
    pub file_name: String,
    /// Only repositories on this default branch get the workflow.
    pub default_branch: String,
    /// Template file to upload; the built-in php-cs-fixer workflow when unset.
    pub template: Option<String>,
    pub commit_message: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            directory: ".github/workflows".into(),
            file_name: "php-cs-fixer.yml".into(),
            default_branch: "main".into(),
            template: None,
            commit_message: "Add php-cs-fixer workflow".into(),
        }
    }
}

impl WorkflowConfig {
    /// Builds the task, reading the template file when one is configured.
    pub fn to_task(&self) -> Result<WorkflowInstall> {
        let template = match &self.template {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                SweepError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to read workflow template {}: {}", path, e),
                ))
            })?,
            None => PHP_CS_FIXER_WORKFLOW.to_string(),
        };

        Ok(WorkflowInstall::new(
            self.directory.clone(),
            self.file_name.clone(),
            template,
            self.commit_message.clone(),
        ))
    }
}

impl SweepConfig {
    /// Load config from a YAML file.
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            SweepError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config file: {}", e),
            ))
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| {
            SweepError::InvalidConfig(format!("Failed to parse YAML config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a YAML file.
    pub fn to_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_yaml::to_string(self).map_err(|e| {
            SweepError::InvalidConfig(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path.as_ref(), content).map_err(|e| {
            SweepError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config file: {}", e),
            ))
        })
    }

    /// Rejects values no run could work with.
    pub fn validate(&self) -> Result<()> {
        if self.org.trim().is_empty() {
            return Err(SweepError::InvalidConfig("org must not be empty".into()));
        }
        if self.page_size == 0 || self.page_size > 100 {
            return Err(SweepError::InvalidConfig(format!(
                "page_size must be between 1 and 100, got {}",
                self.page_size
            )));
        }
        if self.start_page == 0 {
            return Err(SweepError::InvalidConfig("start_page starts at 1".into()));
        }
        if self.notice.old.iter().any(|o| o.is_empty()) {
            return Err(SweepError::InvalidConfig("notice.old must not contain empty entries".into()));
        }
        Ok(())
    }

    pub fn paging(&self) -> Paging {
        Paging {
            per_page: self.page_size,
            first_page: self.start_page,
        }
    }

    /// Repository filter for a run; workflow runs also filter on default branch.
    pub fn list_filter(&self, for_workflow: bool) -> Result<ListFilter> {
        let mut filter = ListFilter::new();
        if self.public_only {
            filter = filter.public_only();
        }
        if for_workflow {
            filter = filter.default_branch(self.workflow.default_branch.clone());
        }
        if let Some(ref pattern) = self.only {
            filter = filter.name_glob(pattern)?;
        }
        Ok(filter)
    }
}
