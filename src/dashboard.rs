use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::join_all;
use tracing::{info, instrument};

use crate::github::HttpFetch;
use crate::pr::{FetchOutcome, PullRequestSnapshot, SnapshotFetcher};
use crate::store::{KeyValueStore, StoreError, TrackedItemStore};

pub const EMPTY_MESSAGE: &str = "Add a PR URL to get started.";
pub const MISSING_TOKEN_MESSAGE: &str = "Please save your GitHub Personal Access Token first.";

/// Result of one refresh cycle.
#[derive(Debug)]
pub enum Refresh {
    /// Nothing is tracked yet.
    Empty,
    /// No token saved; no requests were made.
    MissingCredential,
    /// One outcome per tracked URL, in tracked-list order.
    Loaded {
        generation: u64,
        outcomes: Vec<FetchOutcome>,
    },
}

impl Refresh {
    /// Instructional message shown instead of cards, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Refresh::Empty => Some(EMPTY_MESSAGE),
            Refresh::MissingCredential => Some(MISSING_TOKEN_MESSAGE),
            Refresh::Loaded { .. } => None,
        }
    }

    /// Renderable snapshots, placeholders included.
    pub fn into_snapshots(self) -> Vec<PullRequestSnapshot> {
        match self {
            Refresh::Loaded { outcomes, .. } => outcomes.into_iter().map(FetchOutcome::into_snapshot).collect(),
            Refresh::Empty | Refresh::MissingCredential => Vec::new(),
        }
    }
}

/// Reads the tracked list and fans out one snapshot fetch per item.
pub struct Dashboard<S, H> {
    store: TrackedItemStore<S>,
    fetcher: SnapshotFetcher<H>,
    generation: AtomicU64,
}

impl<S: KeyValueStore, H: HttpFetch> Dashboard<S, H> {
    pub fn new(store: TrackedItemStore<S>, fetcher: SnapshotFetcher<H>) -> Self {
        Self {
            store,
            fetcher,
            generation: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &TrackedItemStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TrackedItemStore<S> {
        &mut self.store
    }

    #[cfg(test)]
    pub fn fetcher(&self) -> &SnapshotFetcher<H> {
        &self.fetcher
    }

    /// Run one refresh cycle.
    ///
    /// The token and the list are read once up front. All item fetches run
    /// concurrently and the cycle completes when every one has settled.
    /// Only store I/O can fail here; item failures become placeholder outcomes.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Refresh, StoreError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let items = self.store.items()?;
        if items.is_empty() {
            info!("no tracked pull requests");
            return Ok(Refresh::Empty);
        }

        let credential = self.store.credential()?;
        if credential.is_empty() {
            info!("no token saved, skipping fetches");
            return Ok(Refresh::MissingCredential);
        }

        info!(generation, items = items.len(), "refreshing dashboard");
        let outcomes = join_all(items.iter().map(|url| self.fetcher.fetch(url, &credential))).await;
        let resolved = outcomes.iter().filter(|o| o.is_resolved()).count();
        info!(generation, resolved, failed = outcomes.len() - resolved, "refresh complete");

        Ok(Refresh::Loaded { generation, outcomes })
    }

    /// Whether `generation` is still the newest refresh started. Results of a
    /// superseded refresh should be dropped instead of rendered.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::testing::FakeHttp;
    use crate::github::ApiRoutes;
    use crate::store::MemoryStore;
    use serde_json::json;

    const API: &str = "https://api.test";

    fn dashboard(http: FakeHttp) -> Dashboard<MemoryStore, FakeHttp> {
        Dashboard::new(
            TrackedItemStore::new(MemoryStore::default()),
            SnapshotFetcher::new(http, ApiRoutes::new(API)),
        )
    }

    fn serve_pr(http: FakeHttp, number: u64, sha: &str) -> FakeHttp {
        http.respond(
            &format!("{API}/repos/o/r/pulls/{number}"),
            json!({
                "title": format!("PR {number}"),
                "html_url": format!("https://github.com/o/r/pull/{number}"),
                "head": {"sha": sha}
            }),
        )
        .respond(
            &format!("{API}/repos/o/r/commits/{sha}/statuses"),
            json!([{"context": "ci/build", "state": "success"}]),
        )
        .respond(
            &format!("{API}/repos/o/r/commits/{sha}/check-runs"),
            json!({"check_runs": [
                {"name": "ci/build", "conclusion": "failure"},
                {"name": "lint", "conclusion": null}
            ]}),
        )
    }

    #[tokio::test]
    async fn test_empty_list() {
        let dashboard = dashboard(FakeHttp::default());
        let refresh = dashboard.refresh().await.unwrap();
        assert!(matches!(refresh, Refresh::Empty));
        assert_eq!(refresh.message(), Some("Add a PR URL to get started."));
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_requests() {
        let mut dashboard = dashboard(FakeHttp::default());
        dashboard.store_mut().add_item("https://github.com/o/r/pull/1").unwrap();

        let refresh = dashboard.refresh().await.unwrap();
        assert!(matches!(refresh, Refresh::MissingCredential));
        assert_eq!(
            refresh.message(),
            Some("Please save your GitHub Personal Access Token first.")
        );
        assert!(refresh.into_snapshots().is_empty());
        assert_eq!(dashboard.fetcher().http().calls(), 0);
    }

    #[tokio::test]
    async fn test_end_to_end_single_item() {
        let mut dashboard = dashboard(serve_pr(FakeHttp::default(), 1, "abc"));
        dashboard.store_mut().set_credential("ghp_test").unwrap();
        dashboard.store_mut().add_item("https://github.com/o/r/pull/1").unwrap();

        let snapshots = dashboard.refresh().await.unwrap().into_snapshots();
        assert_eq!(snapshots.len(), 1);
        let checks: Vec<(&str, &str)> = snapshots[0]
            .checks
            .iter()
            .map(|c| (c.name.as_str(), c.conclusion.as_str()))
            .collect();
        assert_eq!(checks, vec![("ci/build", "success"), ("lint", "pending")]);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_others() {
        let http = serve_pr(FakeHttp::default(), 2, "def").fail(&format!("{API}/repos/o/r/pulls/1"), 500);
        let mut dashboard = dashboard(http);
        dashboard.store_mut().set_credential("ghp_test").unwrap();
        dashboard.store_mut().add_item("https://github.com/o/r/pull/1").unwrap();
        dashboard.store_mut().add_item("https://github.com/o/r/pull/2").unwrap();

        let snapshots = dashboard.refresh().await.unwrap().into_snapshots();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].title, "Failed to load PR");
        assert_eq!(snapshots[0].url, "https://github.com/o/r/pull/1");
        assert!(snapshots[0].checks.is_empty());
        assert_eq!(snapshots[1].title, "PR 2");
        assert_eq!(snapshots[1].checks.len(), 2);
    }

    #[tokio::test]
    async fn test_results_follow_tracked_order() {
        let http = serve_pr(serve_pr(FakeHttp::default(), 1, "aaa"), 2, "bbb");
        let mut dashboard = dashboard(http);
        dashboard.store_mut().set_credential("ghp_test").unwrap();
        dashboard.store_mut().add_item("https://github.com/o/r/pull/2").unwrap();
        dashboard.store_mut().add_item("not a pr").unwrap();
        dashboard.store_mut().add_item("https://github.com/o/r/pull/1").unwrap();

        let titles: Vec<String> = dashboard
            .refresh()
            .await
            .unwrap()
            .into_snapshots()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["PR 2", "Invalid PR URL", "PR 1"]);
    }

    #[tokio::test]
    async fn test_generation_supersedes_older_refresh() {
        let mut dashboard = dashboard(serve_pr(FakeHttp::default(), 1, "abc"));
        dashboard.store_mut().set_credential("ghp_test").unwrap();
        dashboard.store_mut().add_item("https://github.com/o/r/pull/1").unwrap();

        let Refresh::Loaded { generation: first, .. } = dashboard.refresh().await.unwrap() else {
            panic!("expected loaded refresh");
        };
        assert!(dashboard.is_current(first));

        let Refresh::Loaded { generation: second, .. } = dashboard.refresh().await.unwrap() else {
            panic!("expected loaded refresh");
        };
        assert!(second > first);
        assert!(!dashboard.is_current(first));
        assert!(dashboard.is_current(second));
    }
}
