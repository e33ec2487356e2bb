use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL, USER_AGENT};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::pr::PrUrl;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GitHub API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitHub API returned HTTP {0}")]
    Status(u16),
}

/// GET a JSON document with the given token. Injected into the snapshot
/// fetcher so tests can serve canned payloads.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get_json(&self, url: &str, token: &str) -> Result<Value, FetchError>;
}

/// [`HttpFetch`] backed by reqwest. Responses are never cached.
pub struct GitHubHttp {
    client: reqwest::Client,
    user_agent: String,
}

impl GitHubHttp {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait]
impl HttpFetch for GitHubHttp {
    async fn get_json(&self, url: &str, token: &str) -> Result<Value, FetchError> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/vnd.github+json")
            .header(AUTHORIZATION, format!("token {token}"))
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.json::<Value>().await?)
    }
}

/// Builds REST resource URLs under one API root.
#[derive(Debug, Clone)]
pub struct ApiRoutes {
    base: String,
}

impl ApiRoutes {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn pull(&self, pr: &PrUrl) -> String {
        format!("{}/repos/{}/{}/pulls/{}", self.base, pr.owner, pr.repo, pr.pr_number)
    }

    pub fn check_runs(&self, pr: &PrUrl, sha: &str) -> String {
        format!("{}/repos/{}/{}/commits/{}/check-runs", self.base, pr.owner, pr.repo, sha)
    }

    pub fn statuses(&self, pr: &PrUrl, sha: &str) -> String {
        format!("{}/repos/{}/{}/commits/{}/statuses", self.base, pr.owner, pr.repo, sha)
    }
}
