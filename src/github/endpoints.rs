// GitHub API endpoint functions.
// Provides typed methods for the tree, commit history, and raw content endpoints.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Response, StatusCode, header::ETAG};
use serde::de::DeserializeOwned;

use crate::error::{CatalogError, Result};

use super::client::GitHubClient;
use super::types::{CommitDetail, CommitSummary, TreeFetch, TreeResponse};

/// Decode a JSON body, rejecting payloads that do not match the schema.
async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|source| CatalogError::Schema {
        endpoint: endpoint.to_string(),
        source,
    })
}

impl GitHubClient {
    /// Get the recursive file tree of a branch, revalidating against `etag`.
    pub async fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        etag: Option<&str>,
    ) -> Result<TreeFetch> {
        let endpoint = format!("/repos/{}/{}/git/trees/{}", owner, repo, branch);
        let response = self
            .get_conditional(&endpoint, &[("recursive", "1")], etag)
            .await?;

        if response.status() == StatusCode::NOT_MODIFIED {
            return Ok(TreeFetch::NotModified);
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let tree: TreeResponse = decode(&endpoint, response).await?;
        Ok(TreeFetch::Modified { tree, etag })
    }

    /// Get commits on a branch since the given timestamp (single page).
    pub async fn get_commits_since(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        since: DateTime<Utc>,
        per_page: u32,
    ) -> Result<Vec<CommitSummary>> {
        let endpoint = format!("/repos/{}/{}/commits", owner, repo);
        let mut params = vec![
            ("since", since.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("per_page", per_page.min(100).to_string()),
        ];
        if branch != "HEAD" {
            params.push(("sha", branch.to_string()));
        }
        let response = self.get_with_params(&endpoint, &params).await?;
        decode(&endpoint, response).await
    }

    /// Get a single commit with its changed files.
    pub async fn get_commit(&self, owner: &str, repo: &str, sha: &str) -> Result<CommitDetail> {
        let endpoint = format!("/repos/{}/{}/commits/{}", owner, repo, sha);
        let response = self.get(&endpoint).await?;
        decode(&endpoint, response).await
    }

    /// Download raw file content.
    pub async fn get_raw(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get_url(url).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
