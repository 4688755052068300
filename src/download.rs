// Bulk archive export.
// Fetches raw icon files one at a time and packs them into a zip archive.

use std::fs;
use std::future::Future;
use std::io::{Seek, Write};
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::catalog::IconRecord;
use crate::error::Result;
use crate::github::GitHubClient;

/// Raw content retrieval.
pub trait RawFetch {
    fn fetch_raw(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>>;
}

impl RawFetch for GitHubClient {
    async fn fetch_raw(&self, url: &str) -> Result<Vec<u8>> {
        self.get_raw(url).await
    }
}

/// Outcome of an archive export.
#[derive(Debug, Default)]
pub struct ArchiveSummary {
    pub written: usize,
    pub bytes: u64,
    /// Paths that could not be fetched.
    pub failed: Vec<String>,
}

/// Append a cache-busting query parameter.
fn cache_busted(url: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}t={}", url, sep, Utc::now().timestamp_millis())
}

/// Fetch one file; on failure retry exactly once after `retry_delay`
/// with a cache-busting URL.
async fn fetch_with_retry<F: RawFetch>(fetcher: &F, icon: &IconRecord, retry_delay: Duration) -> Result<Vec<u8>> {
    match fetcher.fetch_raw(&icon.raw_url).await {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            tracing::debug!(path = %icon.path, error = %e, "raw fetch failed, retrying once");
            tokio::time::sleep(retry_delay).await;
            fetcher.fetch_raw(&cache_busted(&icon.raw_url)).await
        }
    }
}

/// Write `icons` into a zip archive at `dest`, keeping repository paths.
pub async fn download_archive<F: RawFetch>(
    fetcher: &F,
    icons: &[&IconRecord],
    dest: &Path,
    retry_delay: Duration,
) -> Result<ArchiveSummary> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = fs::File::create(dest)?;
    let mut zip = ZipWriter::new(file);
    let summary = write_entries(fetcher, icons, &mut zip, retry_delay).await?;
    zip.finish()?;

    tracing::info!(
        written = summary.written,
        failed = summary.failed.len(),
        dest = %dest.display(),
        "archive written"
    );
    Ok(summary)
}

async fn write_entries<F: RawFetch, W: Write + Seek>(
    fetcher: &F,
    icons: &[&IconRecord],
    zip: &mut ZipWriter<W>,
    retry_delay: Duration,
) -> Result<ArchiveSummary> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut summary = ArchiveSummary::default();

    for icon in icons {
        match fetch_with_retry(fetcher, icon, retry_delay).await {
            Ok(bytes) => {
                zip.start_file(icon.path.as_str(), options)?;
                zip.write_all(&bytes)?;
                summary.written += 1;
                summary.bytes += bytes.len() as u64;
            }
            Err(e) => {
                tracing::warn!(path = %icon.path, error = %e, "skipping icon");
                summary.failed.push(icon.path.clone());
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use std::collections::HashMap;
    use std::io::Read;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serves canned bytes; URLs listed in `flaky` fail on their first request.
    #[derive(Default)]
    struct FakeRaw {
        files: HashMap<String, Vec<u8>>,
        flaky: Mutex<Vec<String>>,
        requests: Mutex<Vec<String>>,
    }

    impl RawFetch for FakeRaw {
        async fn fetch_raw(&self, url: &str) -> Result<Vec<u8>> {
            self.requests.lock().unwrap().push(url.to_string());
            let base = url.split('?').next().unwrap_or(url);
            let mut flaky = self.flaky.lock().unwrap();
            if let Some(pos) = flaky.iter().position(|u| u == base) {
                flaky.remove(pos);
                return Err(CatalogError::Http {
                    status: 503,
                    body: String::new(),
                });
            }
            self.files
                .get(base)
                .cloned()
                .ok_or_else(|| CatalogError::NotFound(url.to_string()))
        }
    }

    fn icon(path: &str) -> IconRecord {
        IconRecord::from_path(path, None, "https://raw.example/", 2026).unwrap()
    }

    #[test]
    fn test_cache_busted() {
        assert!(cache_busted("https://raw.example/a.png").starts_with("https://raw.example/a.png?t="));
        assert!(cache_busted("https://raw.example/a.png?x=1").contains("?x=1&t="));
    }

    #[tokio::test]
    async fn test_archive_with_retry_and_failure() {
        let teams = icon("Teams/Teams.png");
        let azure = icon("Azure/Azure.svg");
        let missing = icon("Word/Word.png");

        let mut raw = FakeRaw::default();
        raw.files.insert(teams.raw_url.clone(), b"png-bytes".to_vec());
        raw.files.insert(azure.raw_url.clone(), b"<svg/>".to_vec());
        raw.flaky.lock().unwrap().push(azure.raw_url.clone());

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("out/icons.zip");
        let summary = download_archive(&raw, &[&teams, &azure, &missing], &dest, Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(summary.written, 2);
        assert_eq!(summary.failed, vec!["Word/Word.png".to_string()]);

        let requests = raw.requests.lock().unwrap();
        // Azure retried with a cache-busting URL, Word tried twice then dropped
        assert_eq!(requests.len(), 5);
        assert!(requests[2].starts_with(&format!("{}?t=", azure.raw_url)));

        let mut archive = zip::ZipArchive::new(fs::File::open(&dest).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        let mut content = String::new();
        archive
            .by_name("Azure/Azure.svg")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<svg/>");
    }
}
