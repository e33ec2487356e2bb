pub mod fetch;
pub mod types;

pub use fetch::SnapshotFetcher;
pub use types::{FetchOutcome, PrUrl, PullRequestSnapshot};

use thiserror::Error;

use crate::github::FetchError;

const GITHUB_HOST: &str = "github.com/";

#[derive(Debug, Error)]
pub enum PrError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Unexpected pull request payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Parse a GitHub PR URL into its component parts.
///
/// Looks for `github.com/{owner}/{repo}/pull/{number}` anywhere in the
/// string, so scheme, `www.` and trailing segments like `/files` or
/// `#discussion` are tolerated. Returns None when nothing matches.
pub fn parse_pr_url(url: &str) -> Option<PrUrl> {
    url.match_indices(GITHUB_HOST)
        .find_map(|(idx, host)| parse_pr_path(&url[idx + host.len()..]))
}

fn parse_pr_path(path: &str) -> Option<PrUrl> {
    let mut segments = path.splitn(4, '/');
    let owner = segments.next().filter(|s| !s.is_empty())?;
    let repo = segments.next().filter(|s| !s.is_empty())?;
    if segments.next()? != "pull" {
        return None;
    }

    let rest = segments.next()?;
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let pr_number = rest[..digits].parse::<u64>().ok().filter(|n| *n > 0)?;

    Some(PrUrl {
        owner: owner.to_string(),
        repo: repo.to_string(),
        pr_number,
    })
}
