// GitHub API HTTP client.
// Handles authentication, rate limiting, conditional requests, and response checking.

use std::sync::Mutex;

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, IF_NONE_MATCH, USER_AGENT},
};

use crate::error::{CatalogError, Result};

use super::types::RateLimit;

const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client with optional authentication and rate limit tracking.
pub struct GitHubClient {
    client: Client,
    api_base: String,
    rate_limit: Mutex<RateLimit>,
}

impl GitHubClient {
    /// Create a new GitHub client. Public repositories work without a token.
    pub fn new(api_base: &str, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| CatalogError::Other(e.to_string()))?,
            );
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("icondeck"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(CatalogError::Api)?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            rate_limit: Mutex::new(RateLimit::default()),
        })
    }

    /// Get the most recently observed rate limit information.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit
            .lock()
            .map(|rate| rate.clone())
            .unwrap_or_default()
    }

    /// Make a GET request to the GitHub API.
    pub async fn get(&self, endpoint: &str) -> Result<Response> {
        let url = format!("{}{}", self.api_base, endpoint);
        let response = self.client.get(&url).send().await.map_err(CatalogError::Api)?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.api_base, endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(CatalogError::Api)?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Make a conditional GET request. When `etag` is supplied it is sent as
    /// `If-None-Match`, and a 304 response is passed through to the caller.
    pub async fn get_conditional<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
        etag: Option<&str>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.api_base, endpoint);
        let mut request = self.client.get(&url).query(params);
        if let Some(etag) = etag {
            let value =
                HeaderValue::from_str(etag).map_err(|e| CatalogError::Other(e.to_string()))?;
            request = request.header(IF_NONE_MATCH, value);
        }
        let response = request.send().await.map_err(CatalogError::Api)?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Fetch an absolute URL outside the API (raw file content).
    pub async fn get_url(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await.map_err(CatalogError::Api)?;
        self.check_response(response).await
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &Response) {
        let header = |name: &str| -> Option<u64> {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        };

        let Ok(mut rate) = self.rate_limit.lock() else {
            return;
        };
        if let Some(limit) = header("x-ratelimit-limit") {
            rate.limit = limit;
        }
        if let Some(remaining) = header("x-ratelimit-remaining") {
            rate.remaining = remaining;
        }
        if let Some(reset) = header("x-ratelimit-reset") {
            rate.reset = reset;
        }
    }

    fn reset_display(&self) -> String {
        let reset = self.rate_limit().reset;
        chrono::DateTime::from_timestamp(reset as i64, 0)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        match response.status() {
            StatusCode::OK | StatusCode::NOT_MODIFIED => Ok(response),
            StatusCode::UNAUTHORIZED => Err(CatalogError::Unauthorized),
            StatusCode::NOT_FOUND => {
                let url = response.url().to_string();
                Err(CatalogError::NotFound(url))
            }
            StatusCode::TOO_MANY_REQUESTS => Err(CatalogError::RateLimited {
                reset_at: self.reset_display(),
            }),
            StatusCode::FORBIDDEN => {
                // GitHub reports an exhausted primary rate limit as 403
                let exhausted = response
                    .headers()
                    .get("x-ratelimit-remaining")
                    .and_then(|v| v.to_str().ok())
                    == Some("0");
                if exhausted {
                    Err(CatalogError::RateLimited {
                        reset_at: self.reset_display(),
                    })
                } else {
                    Err(CatalogError::Http {
                        status: 403,
                        body: response.text().await.unwrap_or_default(),
                    })
                }
            }
            status => Err(CatalogError::Http {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}
