// Catalog module.
// Icon records derived from the repository listing and the cache-aware fetcher.

pub mod fetcher;
pub mod record;

pub use fetcher::{CatalogFetcher, GitHubSource, IconSource, RecentWindow};
pub use record::{IconRecord, RecentChange, RecentChanges};
