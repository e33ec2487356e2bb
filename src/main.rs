mod checks;
mod config;
mod dashboard;
mod github;
mod pr;
mod report;
mod store;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info, info_span, warn};
use tracing_subscriber::EnvFilter;

use dashboard::{Dashboard, Refresh};
use github::{ApiRoutes, GitHubHttp};
use pr::SnapshotFetcher;
use store::{FileStore, TrackedItemStore};

/// PR Dashboard: track GitHub Pull Requests and see the combined CI
/// status of each, merged from commit statuses and check runs.
#[derive(Parser, Debug)]
#[command(name = "pr-dashboard", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Store file holding the token and tracked PRs (default: .pr-dashboard.json)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Config file (default: .pr-dashboard.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write the dashboard as markdown to this file instead of the terminal
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the GitHub personal access token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Track a pull request (e.g., https://github.com/org/repo/pull/42)
    Add { url: String },
    /// Stop tracking a pull request
    Remove { url: String },
    /// Print the tracked pull request URLs
    List,
    /// Fetch and show every tracked pull request (default)
    Refresh,
}

#[derive(Subcommand, Debug)]
enum TokenAction {
    /// Save a token, replacing any previous one
    Set { value: String },
    /// Delete the saved token
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let config = config::Config::load(cli.config.as_deref())?;
    let store_path = config.store_path(cli.store.as_deref());
    debug!(store = %store_path.display(), api = %config.api_url(), "resolved configuration");

    let store = TrackedItemStore::new(FileStore::new(&store_path));
    let fetcher = SnapshotFetcher::new(
        GitHubHttp::new(config.user_agent()),
        ApiRoutes::new(config.api_url()),
    );
    let mut dashboard = Dashboard::new(store, fetcher);

    match cli.command.unwrap_or(Command::Refresh) {
        Command::Token { action: TokenAction::Set { value } } => {
            dashboard.store_mut().set_credential(value.trim())?;
            println!("Token saved! Refreshing dashboard...");
        }
        Command::Token { action: TokenAction::Clear } => {
            dashboard.store_mut().clear_credential()?;
            println!("Token cleared.");
            return Ok(());
        }
        Command::Add { url } => {
            let url = url.trim();
            if url.is_empty() {
                return Err("PR URL must not be empty".into());
            }
            if !dashboard.store_mut().add_item(url)? {
                println!("This PR is already on the dashboard.");
                return Ok(());
            }
            if pr::parse_pr_url(url).is_none() {
                warn!(url, "tracked URL does not look like a GitHub pull request");
            }
        }
        Command::Remove { url } => {
            dashboard.store_mut().remove_item(url.trim())?;
        }
        Command::List => {
            for url in dashboard.store().items()? {
                println!("{url}");
            }
            return Ok(());
        }
        Command::Refresh => {}
    }

    let _refresh_span = info_span!("dashboard_refresh").entered();
    let refresh = dashboard.refresh().await?;
    if let Refresh::Loaded { generation, .. } = &refresh {
        if !dashboard.is_current(*generation) {
            warn!(generation, "refresh superseded by a newer one, discarding");
            return Ok(());
        }
    }

    let view = report::build(refresh);
    report::output(&view, cli.output.as_deref())?;
    info!("done");

    Ok(())
}
