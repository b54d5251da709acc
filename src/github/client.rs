//! GitHub API client.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{classify_failure, Result, SweepError};

const DEFAULT_API_URL: &str = "https://api.github.com";

/// Environment variables checked for an API token, in order.
pub const TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GITHUB_API_KEY"];

/// Client for interacting with the GitHub API.
#[derive(Clone)]
pub struct GitHubClient {
    pub(crate) token: String,
    pub(crate) base_url: String,
    pub(crate) client: Client,
}

impl GitHubClient {
    /// Create a new GitHub client with the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_API_URL.into(),
            client: Client::new(),
        }
    }

    /// Create a client for GitHub Enterprise with a custom base URL.
    pub fn with_enterprise(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let mut url = base_url.into();
        url::Url::parse(&url)?;
        if url.ends_with('/') {
            url.pop();
        }
        Ok(Self {
            token: token.into(),
            base_url: url,
            client: Client::new(),
        })
    }

    /// Create a client using `GITHUB_TOKEN`, falling back to `GITHUB_API_KEY`.
    pub fn from_env() -> Result<Self> {
        token_from_env().map(Self::new)
    }

    /// Get the default headers for API requests.
    pub(crate) fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| SweepError::InvalidConfig("token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("org-sweep"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Make a GET request to the GitHub API.
    ///
    /// `repo` and `path` only label the error when the request fails.
    pub(crate) fn get<T: DeserializeOwned>(&self, endpoint: &str, repo: &str, path: &str) -> Result<T> {
        let request = self.client.get(self.url(endpoint));
        self.execute(request, repo, path)
    }

    /// Make a PUT request with a JSON body.
    pub(crate) fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        repo: &str,
        path: &str,
    ) -> Result<T> {
        let request = self.client.put(self.url(endpoint)).json(body);
        self.execute(request, repo, path)
    }

    /// Make a DELETE request with a JSON body.
    pub(crate) fn delete<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        repo: &str,
        path: &str,
    ) -> Result<T> {
        let request = self.client.delete(self.url(endpoint)).json(body);
        self.execute(request, repo, path)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn execute<T: DeserializeOwned>(&self, request: RequestBuilder, repo: &str, path: &str) -> Result<T> {
        let response = request.headers(self.headers()?).send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            tracing::debug!("{} {} failed ({}): {}", repo, path, status, body);
            return Err(classify_failure(repo, path, status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| SweepError::GitHub {
            status: status.as_u16(),
            message: format!("Failed to parse response: {}", e),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Reads the API token from the process environment.
pub fn token_from_env() -> Result<String> {
    TOKEN_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
        .ok_or_else(|| {
            SweepError::InvalidConfig(format!(
                "none of {} is set",
                TOKEN_VARS.join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enterprise_url_trailing_slash() {
        let client = GitHubClient::with_enterprise("t", "https://github.example.com/api/v3/").unwrap();
        assert_eq!(client.base_url(), "https://github.example.com/api/v3");
    }

    #[test]
    fn test_enterprise_url_rejects_garbage() {
        assert!(GitHubClient::with_enterprise("t", "not a url").is_err());
    }

    #[test]
    fn test_headers() {
        let headers = GitHubClient::new("abc").headers().unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer abc");
        assert_eq!(headers[USER_AGENT], "org-sweep");
    }

    #[test]
    fn test_headers_reject_newline_token() {
        assert!(GitHubClient::new("abc\ndef").headers().is_err());
    }
}
