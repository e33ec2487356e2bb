use serde::Deserialize;
use tracing::{debug, error, instrument, warn};

use super::types::{FetchOutcome, PrUrl, PullRequestSnapshot};
use super::{parse_pr_url, PrError};
use crate::checks;
use crate::github::{ApiRoutes, HttpFetch};

#[derive(Deserialize)]
struct Head {
    sha: String,
}

#[derive(Deserialize)]
struct PullResponse {
    title: String,
    html_url: String,
    head: Head,
}

/// Resolves one tracked PR URL into a snapshot with its reconciled checks.
pub struct SnapshotFetcher<H> {
    http: H,
    routes: ApiRoutes,
}

impl<H: HttpFetch> SnapshotFetcher<H> {
    pub fn new(http: H, routes: ApiRoutes) -> Self {
        Self { http, routes }
    }

    #[cfg(test)]
    pub fn http(&self) -> &H {
        &self.http
    }

    /// Fetch one tracked PR. Never fails: an unparseable URL or any failed
    /// request yields a placeholder outcome for this item only.
    #[instrument(skip(self, credential))]
    pub async fn fetch(&self, url: &str, credential: &str) -> FetchOutcome {
        let Some(pr) = parse_pr_url(url) else {
            warn!("not a GitHub pull request URL");
            return FetchOutcome::InvalidUrl { url: url.to_string() };
        };

        match self.load(&pr, credential).await {
            Ok(snapshot) => FetchOutcome::Resolved(snapshot),
            Err(err) => {
                error!(error = %err, "failed to load pull request");
                FetchOutcome::LoadFailed {
                    url: url.to_string(),
                    error: err,
                }
            }
        }
    }

    async fn load(&self, pr: &PrUrl, token: &str) -> Result<PullRequestSnapshot, PrError> {
        debug!(owner = %pr.owner, repo = %pr.repo, pr = pr.pr_number, "fetching PR metadata");
        let body = self.http.get_json(&self.routes.pull(pr), token).await?;
        let metadata: PullResponse = serde_json::from_value(body)?;
        let sha = metadata.head.sha;

        debug!(sha = %sha, "fetching check feeds");
        let check_runs_url = self.routes.check_runs(pr, &sha);
        let statuses_url = self.routes.statuses(pr, &sha);
        let (check_runs, statuses) = tokio::join!(
            self.http.get_json(&check_runs_url, token),
            self.http.get_json(&statuses_url, token),
        );
        let check_runs = checks::check_run_entries(&check_runs?);
        let statuses = checks::status_entries(&statuses?);

        Ok(PullRequestSnapshot {
            title: metadata.title,
            url: metadata.html_url,
            checks: checks::reconcile(&statuses, &check_runs),
        })
    }
}
