// Subcommand handlers.
// Each runs one catalog operation and prints the outcome to stdout.

use serde::Serialize;

use crate::app::App;
use crate::catalog::{CatalogFetcher, GitHubSource, IconRecord, IconSource};
use crate::cli::{DownloadArgs, SearchArgs};
use crate::config::Config;
use crate::download::download_archive;
use crate::error::{CatalogError, Result};
use crate::search::{self, SearchResult};

/// Start the interactive browser.
pub fn browse(fetcher: CatalogFetcher<GitHubSource>, config: &Config) -> Result<()> {
    let mut app = App::new(fetcher, config.repo_slug());
    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();
    Ok(result?)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonMatch<'a> {
    #[serde(flatten)]
    icon: &'a IconRecord,
    is_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
}

impl<'a> From<&SearchResult<'a>> for JsonMatch<'a> {
    fn from(result: &SearchResult<'a>) -> Self {
        Self {
            icon: result.icon,
            is_new: result.icon.is_new(),
            score: result.score,
        }
    }
}

pub async fn search<S: IconSource>(fetcher: &CatalogFetcher<S>, args: SearchArgs) -> Result<()> {
    let icons = fetcher.fetch_icons().await?;
    let query = args.filter.query();
    let filters = args.filter.filters();

    let mut results = search::search(&icons, query, &filters);
    if let Some(limit) = args.limit {
        results.truncate(limit);
    }

    if args.json {
        let matches: Vec<JsonMatch> = results.iter().map(JsonMatch::from).collect();
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No icons match.");
        if let Some(suggestion) = search::suggest(&icons, query, filters.category.as_deref()) {
            println!("{}", suggestion);
        }
        return Ok(());
    }

    for result in &results {
        let badge = if result.icon.is_new() { "new   " } else { "legacy" };
        match result.score {
            Some(score) => println!("{}  {}  ({:.2})", badge, result.icon.path, score),
            None => println!("{}  {}", badge, result.icon.path),
        }
    }
    println!("{} of {} icons", results.len(), icons.len());
    Ok(())
}

pub async fn categories<S: IconSource>(fetcher: &CatalogFetcher<S>) -> Result<()> {
    let icons = fetcher.fetch_icons().await?;
    for category in search::categories(&icons) {
        let count = icons.iter().filter(|icon| icon.category == category).count();
        println!("{:<40} {}", category, count);
    }
    Ok(())
}

pub async fn recent<S: IconSource>(fetcher: &CatalogFetcher<S>) -> Result<()> {
    let changes = fetcher.fetch_recent_changes().await;
    if changes.is_empty() {
        println!("No recent changes.");
        return Ok(());
    }

    let mut entries: Vec<_> = changes.iter().collect();
    entries.sort_by(|a, b| b.1.date.cmp(&a.1.date).then_with(|| a.0.cmp(b.0)));
    for (filename, change) in entries {
        println!(
            "{}  {:<40} {}",
            change.date.format("%Y-%m-%d"),
            filename,
            change.message
        );
    }
    Ok(())
}

pub async fn refresh<S: IconSource>(fetcher: &CatalogFetcher<S>) -> Result<()> {
    fetcher.request_refresh();
    let icons = fetcher.fetch_icons().await?;
    let changes = fetcher.fetch_recent_changes().await;
    println!(
        "{} icons, {} changed recently",
        icons.len(),
        changes.len()
    );
    Ok(())
}

pub async fn download(
    fetcher: &CatalogFetcher<GitHubSource>,
    config: &Config,
    args: DownloadArgs,
) -> Result<()> {
    let icons = fetcher.fetch_icons().await?;
    let results = search::search(&icons, args.filter.query(), &args.filter.filters());
    if results.is_empty() {
        return Err(CatalogError::Other("no icons match the given filters".to_string()));
    }

    let selected: Vec<&IconRecord> = results.iter().map(|result| result.icon).collect();
    println!("Downloading {} icons to {}", selected.len(), args.output.display());

    let summary = download_archive(
        fetcher.source().client(),
        &selected,
        &args.output,
        config.image_retry_delay,
    )
    .await?;

    println!("Wrote {} icons ({} bytes)", summary.written, summary.bytes);
    if !summary.failed.is_empty() {
        eprintln!("Failed to fetch {} icons:", summary.failed.len());
        for path in &summary.failed {
            eprintln!("  {}", path);
        }
    }
    Ok(())
}
