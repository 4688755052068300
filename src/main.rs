// icondeck entry point.
// Parses the command line, sets up logging and the cache, and dispatches commands.

mod app;
mod cache;
mod catalog;
mod cli;
mod commands;
mod config;
mod download;
mod error;
mod github;
mod search;
mod state;
mod ui;

use std::fs;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cache::{CacheService, FileStore, KeyValueStore, MemoryStore, paths};
use catalog::{CatalogFetcher, GitHubSource, RecentWindow};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use github::GitHubClient;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Browse);
    init_logging(matches!(command, Commands::Browse));

    let config = Config::load(cli.config.as_deref())?;
    let fetcher = build_fetcher(&config, cli.ephemeral)?;
    tracing::debug!(repo = %config.repo_slug(), ephemeral = cli.ephemeral, "starting");

    match command {
        Commands::Browse => commands::browse(fetcher, &config),
        Commands::Search(args) => commands::search(&fetcher, args).await,
        Commands::Categories => commands::categories(&fetcher).await,
        Commands::Recent => commands::recent(&fetcher).await,
        Commands::Refresh => commands::refresh(&fetcher).await,
        Commands::Download(args) => commands::download(&fetcher, &config, args).await,
    }
}

fn build_fetcher(config: &Config, ephemeral: bool) -> Result<CatalogFetcher<GitHubSource>> {
    let store: Arc<dyn KeyValueStore> = match paths::store_dir() {
        Some(dir) if !ephemeral => Arc::new(FileStore::new(dir)),
        _ => Arc::new(MemoryStore::new()),
    };
    let cache = CacheService::new(store, config.cache_ttl);

    let client = GitHubClient::new(&config.api_base, config.token.as_deref())?;
    let window = RecentWindow {
        lookback: chrono::Duration::days(config.lookback_days),
        commit_limit: config.commit_limit,
        detail_limit: config.commit_detail_limit,
    };

    Ok(CatalogFetcher::new(
        GitHubSource::new(client, config),
        cache,
        config.retry,
        &config.raw_base,
    )
    .with_window(window))
}

/// Subcommands log to stderr; the TUI owns the terminal, so it logs to a file.
fn init_logging(interactive: bool) {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("icondeck=info"))
    };

    if !interactive {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
        return;
    }

    let log_file = paths::log_path().and_then(|path| {
        fs::create_dir_all(path.parent()?).ok()?;
        fs::File::create(path).ok()
    });
    if let Some(file) = log_file {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }
}
