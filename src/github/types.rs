// GitHub API response types.
// Defines the typed schemas that REST payloads must parse into before use.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Kind of a git tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
    Commit,
    #[serde(other)]
    Unknown,
}

/// One entry of a recursive git tree listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Only blobs carry a size.
    pub size: Option<u64>,
}

/// Recursive git tree listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeResponse {
    pub sha: String,
    pub tree: Vec<TreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

/// Outcome of a conditional tree request.
#[derive(Debug, Clone)]
pub enum TreeFetch {
    /// The validator matched; the cached listing is still current.
    NotModified,
    /// A fresh listing with the validator to send next time.
    Modified {
        tree: TreeResponse,
        etag: Option<String>,
    },
}

/// Author or committer signature on a commit.
#[derive(Debug, Clone, Deserialize)]
pub struct Signature {
    pub name: Option<String>,
    pub date: DateTime<Utc>,
}

/// Git-level commit data.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitInfo {
    pub message: String,
    pub author: Option<Signature>,
    pub committer: Option<Signature>,
}

impl CommitInfo {
    /// Authorship timestamp, falling back to the committer's.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.author
            .as_ref()
            .or(self.committer.as_ref())
            .map(|sig| sig.date)
    }

    /// First line of the commit message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default().trim()
    }
}

/// Entry of the commit history list.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
    pub commit: CommitInfo,
}

/// File changed by a commit.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitFile {
    pub filename: String,
    pub status: Option<String>,
}

/// Single commit with its changed files.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub sha: String,
    pub commit: CommitInfo,
    #[serde(default)]
    pub files: Vec<CommitFile>,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree() {
        let json = r#"{
            "sha": "abc",
            "url": "https://api.github.com/repos/o/r/git/trees/abc",
            "tree": [
                {"path": "Teams", "mode": "040000", "type": "tree", "sha": "t1"},
                {"path": "Teams/Teams.png", "mode": "100644", "type": "blob", "sha": "b1", "size": 2048},
                {"path": "vendored", "mode": "160000", "type": "commit", "sha": "c1"}
            ],
            "truncated": false
        }"#;

        let tree: TreeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(tree.tree.len(), 3);
        assert_eq!(tree.tree[0].kind, EntryKind::Tree);
        assert_eq!(tree.tree[1].kind, EntryKind::Blob);
        assert_eq!(tree.tree[1].size, Some(2048));
        assert_eq!(tree.tree[2].kind, EntryKind::Commit);
        assert!(!tree.truncated);
    }

    #[test]
    fn test_tree_without_entries_is_rejected() {
        let json = r#"{"sha": "abc", "message": "Not Found"}"#;
        assert!(serde_json::from_str::<TreeResponse>(json).is_err());
    }

    #[test]
    fn test_commit_summary_and_date() {
        let json = r#"{
            "sha": "deadbeef",
            "commit": {
                "message": "Add new Teams icon\n\nLonger description",
                "author": {"name": "someone", "email": "a@b.c", "date": "2024-05-01T10:00:00Z"},
                "committer": {"name": "GitHub", "email": "noreply@github.com", "date": "2024-05-02T10:00:00Z"}
            },
            "files": [{"filename": "Teams/Teams.png", "status": "added"}]
        }"#;

        let detail: CommitDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.commit.summary(), "Add new Teams icon");
        assert_eq!(
            detail.commit.date().unwrap().to_rfc3339(),
            "2024-05-01T10:00:00+00:00"
        );
        assert_eq!(detail.files[0].filename, "Teams/Teams.png");
    }
}
