// Command-line interface.
// Subcommands and shared filter flags parsed with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::search::{FileType, Filters};

#[derive(Parser)]
#[command(name = "icondeck")]
#[command(about = "Search, preview, and download icons from a GitHub-hosted collection", long_about = None)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to config.toml")]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Keep the cache in memory only (nothing is persisted)"
    )]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Browse the catalog interactively (default)")]
    Browse,

    #[command(about = "Search icons and print matches")]
    Search(SearchArgs),

    #[command(about = "List categories")]
    Categories,

    #[command(about = "Show icons changed recently")]
    Recent,

    #[command(about = "Revalidate the cached catalog")]
    Refresh,

    #[command(about = "Download matching icons into a zip archive")]
    Download(DownloadArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(help = "Search text (empty lists everything)")]
    pub query: Option<String>,

    #[arg(short, long, help = "Only icons in this category")]
    pub category: Option<String>,

    #[arg(
        short = 't',
        long = "type",
        value_enum,
        default_value_t = FileType::All,
        help = "File type"
    )]
    pub file_type: FileType,

    #[arg(short, long, help = "Only current (non-legacy) icons")]
    pub new_only: bool,
}

impl FilterArgs {
    pub fn filters(&self) -> Filters {
        Filters {
            category: self.category.clone(),
            file_type: self.file_type,
            new_only: self.new_only,
        }
    }

    pub fn query(&self) -> &str {
        self.query.as_deref().unwrap_or_default()
    }
}

#[derive(Parser)]
pub struct SearchArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[arg(short, long, help = "Maximum number of results")]
    pub limit: Option<usize>,

    #[arg(long, help = "Print results as JSON")]
    pub json: bool,
}

#[derive(Parser)]
pub struct DownloadArgs {
    #[arg(help = "Archive path to write")]
    pub output: PathBuf,

    #[command(flatten)]
    pub filter: FilterArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "icondeck", "search", "teams", "--type", "svg", "--new-only", "-c", "Teams",
        ])
        .unwrap();
        let Some(Commands::Search(args)) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.filter.query(), "teams");
        let filters = args.filter.filters();
        assert_eq!(filters.file_type, FileType::Svg);
        assert!(filters.new_only);
        assert_eq!(filters.category.as_deref(), Some("Teams"));
    }

    #[test]
    fn test_default_is_browse() {
        let cli = Cli::try_parse_from(["icondeck", "--ephemeral"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.ephemeral);
    }

    #[test]
    fn test_download_requires_output() {
        assert!(Cli::try_parse_from(["icondeck", "download"]).is_err());
        let cli = Cli::try_parse_from(["icondeck", "download", "out.zip", "azure"]).unwrap();
        let Some(Commands::Download(args)) = cli.command else {
            panic!("expected download");
        };
        assert_eq!(args.output, PathBuf::from("out.zip"));
        assert_eq!(args.filter.query(), "azure");
    }
}
