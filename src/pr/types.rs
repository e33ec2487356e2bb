use serde::Serialize;

use super::PrError;
use crate::checks::CheckResult;

pub const INVALID_URL_TITLE: &str = "Invalid PR URL";
pub const LOAD_FAILED_TITLE: &str = "Failed to load PR";

/// Represents the parsed components of a GitHub PR URL.
/// Extracted by parse_pr_url() in pr/mod.rs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrUrl {
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
}

/// Point-in-time view of one tracked PR, ready to render.
/// Rebuilt on every refresh and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestSnapshot {
    pub title: String,
    pub url: String,
    /// At most one entry per check name.
    pub checks: Vec<CheckResult>,
}

impl PullRequestSnapshot {
    /// Placeholder card for an item that could not be resolved.
    pub fn placeholder(title: &str, url: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            checks: Vec::new(),
        }
    }
}

/// Terminal state of one tracked item after a fetch cycle.
#[derive(Debug)]
pub enum FetchOutcome {
    Resolved(PullRequestSnapshot),
    /// The tracked URL is not a GitHub PR URL. No request was made.
    InvalidUrl { url: String },
    /// A request for this item failed; the rest of its work was abandoned.
    LoadFailed { url: String, error: PrError },
}

impl FetchOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, FetchOutcome::Resolved(_))
    }

    /// Project any outcome onto a renderable snapshot, using placeholder
    /// cards for the failure variants.
    pub fn into_snapshot(self) -> PullRequestSnapshot {
        match self {
            FetchOutcome::Resolved(snapshot) => snapshot,
            FetchOutcome::InvalidUrl { url } => PullRequestSnapshot::placeholder(INVALID_URL_TITLE, &url),
            FetchOutcome::LoadFailed { url, .. } => PullRequestSnapshot::placeholder(LOAD_FAILED_TITLE, &url),
        }
    }
}
