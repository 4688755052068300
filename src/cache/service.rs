// Cache service.
// Owns the persisted envelopes, TTL checks, and small preference flags.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::catalog::{IconRecord, RecentChange, RecentChanges};
use crate::error::CatalogError;

use super::store::KeyValueStore;

pub const ICON_CACHE_KEY: &str = "icon-cache";
pub const COMMIT_CACHE_KEY: &str = "commit-cache";
pub const FORCE_REVALIDATE_KEY: &str = "force-revalidate";
pub const DARK_MODE_KEY: &str = "dark-mode";
pub const FIRST_VISIT_KEY: &str = "first-visit";

/// Snapshot of the icon listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconCache {
    pub timestamp: DateTime<Utc>,
    pub icons: Vec<IconRecord>,
    /// Validator from the listing response, sent back as `If-None-Match`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

/// Snapshot of the recent-changes map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitCache {
    pub timestamp: DateTime<Utc>,
    pub changes: Vec<(String, RecentChange)>,
}

/// Check if a snapshot taken at `timestamp` is older than `ttl`.
/// A timestamp ahead of the local clock counts as age zero.
pub fn is_expired(timestamp: DateTime<Utc>, ttl: Duration) -> bool {
    let elapsed = Utc::now()
        .signed_duration_since(timestamp)
        .to_std()
        .unwrap_or(Duration::ZERO);

    elapsed > ttl
}

/// Typed access to the persisted keys. Writes are best-effort: failures are
/// logged and swallowed so a broken store only costs performance.
#[derive(Clone)]
pub struct CacheService {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl CacheService {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Check if a snapshot is still within the TTL.
    pub fn is_fresh(&self, timestamp: DateTime<Utc>) -> bool {
        !is_expired(timestamp, self.ttl)
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = self.store.get(key)?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unreadable cache entry");
                None
            }
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) {
        let result = serde_json::to_vec(value)
            .map_err(CatalogError::from)
            .and_then(|bytes| self.store.set(key, &bytes));
        if let Err(e) = result {
            tracing::warn!(key, error = %e, "cache write failed");
        }
    }

    fn remove(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            tracing::warn!(key, error = %e, "cache remove failed");
        }
    }

    /// Read the icon snapshot regardless of age.
    pub fn load_icons(&self) -> Option<IconCache> {
        self.read_json(ICON_CACHE_KEY)
    }

    /// Persist a freshly fetched listing.
    pub fn store_icons(&self, icons: &[IconRecord], etag: Option<&str>) {
        let envelope = IconCache {
            timestamp: Utc::now(),
            icons: icons.to_vec(),
            etag: etag.map(str::to_string),
        };
        self.write_json(ICON_CACHE_KEY, &envelope);
    }

    /// Restart the TTL of an existing snapshot, keeping its icons and validator.
    pub fn touch_icons(&self, mut envelope: IconCache) -> IconCache {
        envelope.timestamp = Utc::now();
        self.write_json(ICON_CACHE_KEY, &envelope);
        envelope
    }

    /// Read the recent-changes snapshot regardless of age.
    pub fn load_changes(&self) -> Option<CommitCache> {
        self.read_json(COMMIT_CACHE_KEY)
    }

    pub fn store_changes(&self, changes: &RecentChanges) {
        let mut entries: Vec<(String, RecentChange)> = changes
            .iter()
            .map(|(name, change)| (name.clone(), change.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let envelope = CommitCache {
            timestamp: Utc::now(),
            changes: entries,
        };
        self.write_json(COMMIT_CACHE_KEY, &envelope);
    }

    pub fn clear_changes(&self) {
        self.remove(COMMIT_CACHE_KEY);
    }

    /// Ask the next icon fetch to revalidate even if the snapshot is fresh.
    pub fn mark_force_revalidate(&self) {
        self.write_json(FORCE_REVALIDATE_KEY, &true);
    }

    pub fn force_revalidate_pending(&self) -> bool {
        self.read_json(FORCE_REVALIDATE_KEY).unwrap_or(false)
    }

    pub fn clear_force_revalidate(&self) {
        self.remove(FORCE_REVALIDATE_KEY);
    }

    pub fn dark_mode(&self) -> bool {
        self.read_json(DARK_MODE_KEY).unwrap_or(true)
    }

    pub fn set_dark_mode(&self, enabled: bool) {
        self.write_json(DARK_MODE_KEY, &enabled);
    }

    pub fn is_first_visit(&self) -> bool {
        !self.read_json(FIRST_VISIT_KEY).unwrap_or(false)
    }

    pub fn mark_visited(&self) {
        self.write_json(FIRST_VISIT_KEY, &true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::MemoryStore;
    use crate::error::Result;

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Option<Vec<u8>> {
            None
        }

        fn set(&self, _key: &str, _value: &[u8]) -> Result<()> {
            Err(CatalogError::Storage("quota exceeded".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(CatalogError::Storage("disabled".to_string()))
        }
    }

    fn icon(path: &str) -> IconRecord {
        IconRecord::from_path(path, Some(1), "https://raw.example/", 2026).unwrap()
    }

    fn service() -> CacheService {
        CacheService::new(Arc::new(MemoryStore::new()), Duration::from_secs(300))
    }

    #[test]
    fn test_icon_roundtrip() {
        let cache = service();
        let icons = vec![icon("Teams/Teams.png"), icon("Azure/Azure.svg")];

        cache.store_icons(&icons, Some("\"abc\""));

        let envelope = cache.load_icons().unwrap();
        assert_eq!(envelope.icons, icons);
        assert_eq!(envelope.etag.as_deref(), Some("\"abc\""));
        assert!(cache.is_fresh(envelope.timestamp));
    }

    #[test]
    fn test_expiry() {
        let past = Utc::now() - chrono::Duration::seconds(600);
        assert!(is_expired(past, Duration::from_secs(300)));
        assert!(!is_expired(Utc::now(), Duration::from_secs(300)));
    }

    #[test]
    fn test_clock_skew_is_not_expiry() {
        let ahead = Utc::now() + chrono::Duration::seconds(30);
        assert!(!is_expired(ahead, Duration::from_secs(300)));
        assert!(!is_expired(ahead, Duration::ZERO));
    }

    #[test]
    fn test_touch_keeps_etag() {
        let cache = service();
        let envelope = IconCache {
            timestamp: Utc::now() - chrono::Duration::days(3),
            icons: vec![icon("Teams/Teams.png")],
            etag: Some("W/\"v1\"".to_string()),
        };

        let touched = cache.touch_icons(envelope.clone());
        assert!(touched.timestamp > envelope.timestamp);

        let stored = cache.load_icons().unwrap();
        assert_eq!(stored.etag, envelope.etag);
        assert_eq!(stored.icons, envelope.icons);
    }

    #[test]
    fn test_changes_roundtrip() {
        let cache = service();
        let mut changes = RecentChanges::new();
        changes.insert(
            "Teams.png".to_string(),
            RecentChange {
                path: "Teams/Teams.png".to_string(),
                date: Utc::now(),
                message: "Update Teams".to_string(),
            },
        );

        cache.store_changes(&changes);
        let stored = cache.load_changes().unwrap();
        let restored: RecentChanges = stored.changes.into_iter().collect();
        assert_eq!(restored, changes);

        cache.clear_changes();
        assert!(cache.load_changes().is_none());
    }

    #[test]
    fn test_commit_cache_wire_shape() {
        let envelope = CommitCache {
            timestamp: Utc::now(),
            changes: vec![(
                "a.png".to_string(),
                RecentChange {
                    path: "x/a.png".to_string(),
                    date: Utc::now(),
                    message: "m".to_string(),
                },
            )],
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["changes"][0][0], "a.png");
        assert_eq!(value["changes"][0][1]["path"], "x/a.png");
    }

    #[test]
    fn test_flags() {
        let cache = service();

        assert!(!cache.force_revalidate_pending());
        cache.mark_force_revalidate();
        assert!(cache.force_revalidate_pending());
        cache.clear_force_revalidate();
        assert!(!cache.force_revalidate_pending());

        assert!(cache.is_first_visit());
        cache.mark_visited();
        assert!(!cache.is_first_visit());

        cache.set_dark_mode(false);
        assert!(!cache.dark_mode());
    }

    #[test]
    fn test_corrupt_entry_reads_as_absent() {
        let store = MemoryStore::new();
        store.set(ICON_CACHE_KEY, b"{not json").unwrap();
        let cache = CacheService::new(Arc::new(store), Duration::from_secs(60));
        assert!(cache.load_icons().is_none());
    }

    #[test]
    fn test_storage_failures_are_swallowed() {
        let cache = CacheService::new(Arc::new(FailingStore), Duration::from_secs(60));
        cache.store_icons(&[icon("Teams/Teams.png")], None);
        cache.mark_force_revalidate();
        cache.clear_force_revalidate();
        cache.set_dark_mode(true);
        assert!(cache.load_icons().is_none());
    }
}
