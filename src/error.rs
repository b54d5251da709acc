//! Error types for org-sweep.

use thiserror::Error;

/// The main error type for sweep operations.
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] globset::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Base64 decoding failed: {0}")]
    Base64(#[from] base64ct::Error),

    #[error("File content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Not found: {path}")]
    NotFound { path: String },

    #[error("Repository {repo} is archived and read-only")]
    Archived { repo: String },

    #[error("Repository {repo} is empty")]
    EmptyRepository { repo: String },

    #[error("File {path} is too large for the contents API")]
    TooLarge { path: String },

    #[error("GitHub API error ({status}): {message}")]
    GitHub { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Terminal input failed: {0}")]
    Terminal(String),
}

impl SweepError {
    /// Returns true for failures that are part of normal operation:
    /// a missing file, an archived repository or an empty repository.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            SweepError::NotFound { .. }
                | SweepError::Archived { .. }
                | SweepError::EmptyRepository { .. }
        )
    }

    /// Returns true if the failure is a missing file or directory.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SweepError::NotFound { .. })
    }
}

/// Classifies a failed GitHub response.
///
/// GitHub reports read-only and empty repositories through the message body
/// rather than a dedicated status, so the body is checked before the status.
pub fn classify_failure(repo: &str, path: &str, status: u16, body: &str) -> SweepError {
    let lowered = body.to_lowercase();

    if lowered.contains("archived") {
        SweepError::Archived { repo: repo.to_string() }
    } else if lowered.contains("repository is empty") {
        SweepError::EmptyRepository { repo: repo.to_string() }
    } else if status == 404 {
        SweepError::NotFound { path: path.to_string() }
    } else {
        SweepError::GitHub {
            status,
            message: body.to_string(),
        }
    }
}

/// A specialized Result type for sweep operations.
pub type Result<T> = std::result::Result<T, SweepError>;
