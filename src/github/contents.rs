//! Repository contents: reading, writing and deleting single files.

use base64ct::{Base64, Encoding};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SweepError};
use crate::github::{GitHubClient, RepositoryRef};

/// A file as currently stored on the default branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnapshot {
    pub path: String,
    pub content: String,
    /// Blob sha; must still match the server's value when writing back.
    pub sha: String,
}

/// File level operations on a repository.
pub trait ContentsOps {
    /// Fetch a file. Fails with `NotFound` when it does not exist.
    fn get_file(&self, repo: &RepositoryRef, path: &str) -> Result<FileSnapshot>;

    /// Create a file, or update it when `sha` names the current revision.
    fn put_file(
        &self,
        repo: &RepositoryRef,
        path: &str,
        message: &str,
        content: &str,
        sha: Option<&str>,
    ) -> Result<()>;

    /// Delete a file at the given revision.
    fn delete_file(&self, repo: &RepositoryRef, path: &str, message: &str, sha: &str) -> Result<()>;

    /// Check whether a directory exists.
    fn directory_exists(&self, repo: &RepositoryRef, path: &str) -> Result<bool>;
}

#[derive(Deserialize)]
struct ContentItem {
    path: String,
    sha: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Serialize)]
struct PutBody<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Serialize)]
struct DeleteBody<'a> {
    message: &'a str,
    sha: &'a str,
}

/// Encodes text the way the contents API expects it.
pub fn encode_content(text: &str) -> String {
    Base64::encode_string(text.as_bytes())
}

/// Decodes contents API base64, which arrives wrapped at 60 columns.
pub fn decode_content(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = Base64::decode_vec(&compact)?;
    Ok(String::from_utf8(bytes)?)
}

fn contents_endpoint(repo: &RepositoryRef, path: &str) -> String {
    let encoded: Vec<_> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::encode(s).into_owned())
        .collect();
    format!(
        "/repos/{}/{}/contents/{}",
        urlencoding::encode(&repo.owner),
        urlencoding::encode(&repo.name),
        encoded.join("/")
    )
}

/// Turns a contents API response for a single path into a snapshot.
///
/// A directory listing comes back as an array and counts as not found.
/// Files over 1 MB carry `"encoding": "none"` and no inline content.
fn snapshot_from_response(path: &str, value: Value) -> Result<FileSnapshot> {
    if value.is_array() {
        return Err(SweepError::NotFound {
            path: path.to_string(),
        });
    }

    let item: ContentItem = serde_json::from_value(value)?;
    let content = match (item.content, item.encoding.as_deref()) {
        (_, Some("none")) => {
            return Err(SweepError::TooLarge { path: item.path });
        }
        (Some(raw), Some("base64")) => decode_content(&raw)?,
        (Some(raw), _) => raw,
        (None, _) => String::new(),
    };

    Ok(FileSnapshot {
        path: item.path,
        content,
        sha: item.sha,
    })
}

/// Only an array response is a directory; a file at the path, or nothing, is not.
fn directory_from_response(response: Result<Value>) -> Result<bool> {
    match response {
        Ok(value) => Ok(value.is_array()),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

impl ContentsOps for GitHubClient {
    fn get_file(&self, repo: &RepositoryRef, path: &str) -> Result<FileSnapshot> {
        let value: Value = self.get(&contents_endpoint(repo, path), &repo.name, path)?;
        snapshot_from_response(path, value)
    }

    fn put_file(
        &self,
        repo: &RepositoryRef,
        path: &str,
        message: &str,
        content: &str,
        sha: Option<&str>,
    ) -> Result<()> {
        let body = PutBody {
            message,
            content: encode_content(content),
            sha,
        };
        let _: Value = self.put(&contents_endpoint(repo, path), &body, &repo.name, path)?;
        Ok(())
    }

    fn delete_file(&self, repo: &RepositoryRef, path: &str, message: &str, sha: &str) -> Result<()> {
        let body = DeleteBody { message, sha };
        let _: Value = self.delete(&contents_endpoint(repo, path), &body, &repo.name, path)?;
        Ok(())
    }

    fn directory_exists(&self, repo: &RepositoryRef, path: &str) -> Result<bool> {
        directory_from_response(self.get::<Value>(&contents_endpoint(repo, path), &repo.name, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_wrapped_content() {
        // "# Laravel Backup\n" split over two lines as GitHub does.
        let decoded = decode_content("IyBMYXJhdmVs\nIEJhY2t1cAo=\n").unwrap();
        assert_eq!(decoded, "# Laravel Backup\n");
    }

    #[test]
    fn test_encode_content() {
        assert_eq!(encode_content("# Laravel Backup\n"), "IyBMYXJhdmVsIEJhY2t1cAo=");
    }

    #[test]
    fn test_decode_rejects_invalid() {
        assert!(decode_content("not base64!").is_err());
    }

    #[test]
    fn test_contents_endpoint_keeps_slashes() {
        let repo = RepositoryRef::new("spatie", "laravel-backup", "");
        assert_eq!(
            contents_endpoint(&repo, ".github/workflows/php-cs-fixer.yml"),
            "/repos/spatie/laravel-backup/contents/.github/workflows/php-cs-fixer.yml"
        );
    }

    #[test]
    fn test_put_body_omits_missing_sha() {
        let body = PutBody {
            message: "Add workflow",
            content: encode_content("x"),
            sha: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("sha").is_none());
        assert_eq!(json["content"], "eA==");
    }

    #[test]
    fn test_snapshot_decodes_base64_file() {
        let value = json!({
            "type": "file",
            "path": "README.md",
            "sha": "3d21ec53a331a6f037a91c368710b99387d012c1",
            "encoding": "base64",
            "content": "IyBMYXJhdmVs\nIEJhY2t1cAo=\n"
        });
        let snapshot = snapshot_from_response("README.md", value).unwrap();
        assert_eq!(snapshot.path, "README.md");
        assert_eq!(snapshot.content, "# Laravel Backup\n");
        assert_eq!(snapshot.sha, "3d21ec53a331a6f037a91c368710b99387d012c1");
    }

    #[test]
    fn test_snapshot_of_directory_is_not_found() {
        let value = json!([
            { "type": "file", "path": ".github/workflows/run-tests.yml", "sha": "abc" }
        ]);
        let err = snapshot_from_response(".github/workflows", value).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_snapshot_of_large_file_is_rejected() {
        let value = json!({
            "type": "file",
            "path": "README.md",
            "sha": "abc",
            "encoding": "none",
            "content": ""
        });
        let err = snapshot_from_response("README.md", value).unwrap_err();
        assert!(matches!(err, SweepError::TooLarge { ref path } if path == "README.md"));
        assert!(!err.is_expected());
    }

    #[test]
    fn test_snapshot_keeps_unencoded_content() {
        let value = json!({ "path": "README.md", "sha": "abc", "content": "plain" });
        let snapshot = snapshot_from_response("README.md", value).unwrap();
        assert_eq!(snapshot.content, "plain");
    }

    #[test]
    fn test_directory_only_for_array_response() {
        assert!(directory_from_response(Ok(json!([]))).unwrap());
        assert!(
            !directory_from_response(Ok(json!({
                "type": "file",
                "path": ".github/workflows",
                "sha": "abc"
            })))
            .unwrap()
        );
    }

    #[test]
    fn test_directory_missing_is_false() {
        let missing = Err(SweepError::NotFound {
            path: ".github/workflows".into(),
        });
        assert!(!directory_from_response(missing).unwrap());
    }

    #[test]
    fn test_directory_other_errors_propagate() {
        let archived = Err(SweepError::Archived {
            repo: "old-package".into(),
        });
        assert!(matches!(
            directory_from_response(archived),
            Err(SweepError::Archived { .. })
        ));
    }
}
