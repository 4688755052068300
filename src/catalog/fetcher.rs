// Cache-aware catalog fetcher.
// Produces the icon list and recent-change map, preferring cached data over the network.

use std::future::Future;

use chrono::{DateTime, Datelike, Utc};

use crate::cache::CacheService;
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::github::{CommitDetail, CommitSummary, GitHubClient, RetryPolicy, TreeFetch};

use super::record::{IconRecord, RecentChange, RecentChanges, is_image_path, records_from_tree};

/// Upstream operations the fetcher depends on.
pub trait IconSource: Send + Sync {
    /// Recursive tree listing, conditional on `etag` when supplied.
    fn fetch_tree(&self, etag: Option<&str>) -> impl Future<Output = Result<TreeFetch>> + Send;

    /// Commits since `since`, newest first, at most `limit`.
    fn fetch_commits_since(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<CommitSummary>>> + Send;

    /// A single commit with its changed files.
    fn fetch_commit(&self, sha: &str) -> impl Future<Output = Result<CommitDetail>> + Send;
}

/// The configured GitHub repository as an icon source.
pub struct GitHubSource {
    client: GitHubClient,
    owner: String,
    repo: String,
    branch: String,
}

impl GitHubSource {
    pub fn new(client: GitHubClient, config: &Config) -> Self {
        Self {
            client,
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            branch: config.branch.clone(),
        }
    }

    pub fn client(&self) -> &GitHubClient {
        &self.client
    }
}

impl IconSource for GitHubSource {
    async fn fetch_tree(&self, etag: Option<&str>) -> Result<TreeFetch> {
        self.client
            .get_tree(&self.owner, &self.repo, &self.branch, etag)
            .await
    }

    async fn fetch_commits_since(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<CommitSummary>> {
        self.client
            .get_commits_since(&self.owner, &self.repo, &self.branch, since, limit)
            .await
    }

    async fn fetch_commit(&self, sha: &str) -> Result<CommitDetail> {
        self.client.get_commit(&self.owner, &self.repo, sha).await
    }
}

/// Bounds of the recent-changes lookback.
#[derive(Debug, Clone, Copy)]
pub struct RecentWindow {
    pub lookback: chrono::Duration,
    /// Commits requested from the history endpoint.
    pub commit_limit: u32,
    /// Commits whose file lists are inspected, newest first.
    pub detail_limit: usize,
}

impl Default for RecentWindow {
    fn default() -> Self {
        Self {
            lookback: chrono::Duration::days(30),
            commit_limit: 100,
            detail_limit: 20,
        }
    }
}

/// Fetches the catalog through the cache.
pub struct CatalogFetcher<S> {
    source: S,
    cache: CacheService,
    retry: RetryPolicy,
    raw_base: String,
    window: RecentWindow,
}

impl<S: IconSource> CatalogFetcher<S> {
    pub fn new(source: S, cache: CacheService, retry: RetryPolicy, raw_base: &str) -> Self {
        Self {
            source,
            cache,
            retry,
            raw_base: raw_base.to_string(),
            window: RecentWindow::default(),
        }
    }

    pub fn with_window(mut self, window: RecentWindow) -> Self {
        self.window = window;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }

    /// Current icon list. Serves a fresh snapshot without touching the network,
    /// revalidates a stale or force-flagged one, and falls back to any snapshot
    /// when the network fails.
    pub async fn fetch_icons(&self) -> Result<Vec<IconRecord>> {
        let cached = self.cache.load_icons();
        let forced = self.cache.force_revalidate_pending();

        if let Some(envelope) = &cached {
            if !forced && self.cache.is_fresh(envelope.timestamp) {
                tracing::debug!(count = envelope.icons.len(), "serving icons from cache");
                return Ok(envelope.icons.clone());
            }
        }

        // Validator comes from the snapshot read above, never from this attempt
        let etag = cached.as_ref().and_then(|envelope| envelope.etag.as_deref());
        let source = &self.source;
        tracing::info!(conditional = etag.is_some(), forced, "fetching icon listing");
        let result = self
            .retry
            .run("tree", move || source.fetch_tree(etag))
            .await;

        match result {
            Ok(TreeFetch::NotModified) => {
                let Some(envelope) = cached else {
                    return Err(CatalogError::Other(
                        "listing reported not modified but no snapshot exists".to_string(),
                    ));
                };
                tracing::info!("icon listing not modified");
                self.cache.clear_force_revalidate();
                Ok(self.cache.touch_icons(envelope).icons)
            }
            Ok(TreeFetch::Modified { tree, etag }) => {
                if tree.truncated {
                    tracing::warn!("tree listing truncated by the API; catalog is partial");
                }
                let icons = records_from_tree(&tree, &self.raw_base, Utc::now().year());
                tracing::info!(count = icons.len(), "icon listing fetched");
                self.cache.store_icons(&icons, etag.as_deref());
                self.cache.clear_force_revalidate();
                Ok(icons)
            }
            Err(e) => match cached {
                Some(envelope) => {
                    tracing::warn!(error = %e, "listing fetch failed, serving cached icons");
                    Ok(envelope.icons)
                }
                None => Err(e),
            },
        }
    }

    /// Recently changed icons keyed by filename. Never fails: enrichment
    /// errors yield an empty map.
    pub async fn fetch_recent_changes(&self) -> RecentChanges {
        if let Some(envelope) = self.cache.load_changes() {
            if self.cache.is_fresh(envelope.timestamp) {
                tracing::debug!(count = envelope.changes.len(), "serving recent changes from cache");
                return envelope.changes.into_iter().collect();
            }
        }

        match self.collect_recent_changes().await {
            Ok(changes) => {
                self.cache.store_changes(&changes);
                changes
            }
            Err(e) => {
                tracing::warn!(error = %e, "recent changes unavailable");
                RecentChanges::new()
            }
        }
    }

    async fn collect_recent_changes(&self) -> Result<RecentChanges> {
        let since = Utc::now() - self.window.lookback;
        let limit = self.window.commit_limit;
        let source = &self.source;
        let commits = self
            .retry
            .run("commits", move || source.fetch_commits_since(since, limit))
            .await?;

        let mut changes = RecentChanges::new();
        // One detail request in flight at a time
        for summary in commits.iter().take(self.window.detail_limit) {
            let sha = summary.sha.as_str();
            let detail = match self
                .retry
                .run("commit", move || source.fetch_commit(sha))
                .await
            {
                Ok(detail) => detail,
                Err(e) => {
                    tracing::debug!(sha, error = %e, "skipping commit");
                    continue;
                }
            };
            merge_commit(&mut changes, &detail, summary);
        }

        tracing::info!(count = changes.len(), "recent changes collected");
        Ok(changes)
    }

    /// Mark the icon snapshot for revalidation and drop the change snapshot.
    /// The icon validator is kept so an unchanged upstream costs one 304.
    pub fn request_refresh(&self) {
        self.cache.mark_force_revalidate();
        self.cache.clear_changes();
    }
}

/// Record each image file of `detail` unless its filename is already present.
/// Commits arrive newest first, so the first entry for a filename wins.
fn merge_commit(changes: &mut RecentChanges, detail: &CommitDetail, summary: &CommitSummary) {
    let Some(date) = detail.commit.date().or_else(|| summary.commit.date()) else {
        return;
    };
    let message = detail.commit.summary().to_string();

    for file in detail.files.iter().filter(|f| is_image_path(&f.filename)) {
        let filename = file.filename.rsplit('/').next().unwrap_or(&file.filename);
        changes
            .entry(filename.to_string())
            .or_insert_with(|| RecentChange {
                path: file.filename.clone(),
                date,
                message: message.clone(),
            });
    }
}
