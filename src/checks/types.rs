use serde::Serialize;

/// Conclusion assigned to a check run that has not finished yet.
pub const PENDING: &str = "pending";

/// One entry from either check feed, reduced to a name and a conclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCheckEntry {
    pub name: String,
    /// `state` for a commit status, `conclusion` for a check run.
    /// None while a check run is still in progress.
    pub conclusion: Option<String>,
}

impl RawCheckEntry {
    pub fn new(name: impl Into<String>, conclusion: Option<&str>) -> Self {
        Self {
            name: name.into(),
            conclusion: conclusion.map(str::to_string),
        }
    }
}

/// A single reconciled check, one per distinct name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: String,
    /// Reported value, kept verbatim. Use [`CheckResult::outcome`] to classify it.
    pub conclusion: String,
}

impl CheckResult {
    pub fn outcome(&self) -> CheckOutcome {
        normalize_conclusion(Some(&self.conclusion))
    }
}

/// Coarse classification of a check conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Success,
    Failure,
    Pending,
}

impl std::fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckOutcome::Success => write!(f, "success"),
            CheckOutcome::Failure => write!(f, "failure"),
            CheckOutcome::Pending => write!(f, "pending"),
        }
    }
}

/// Classify a raw conclusion from either feed.
///
/// `success` is a success; `failure`, `error` and `cancelled` are failures.
/// Everything else, including a missing value, is still pending.
pub fn normalize_conclusion(raw: Option<&str>) -> CheckOutcome {
    match raw {
        Some("success") => CheckOutcome::Success,
        Some("failure" | "error" | "cancelled") => CheckOutcome::Failure,
        _ => CheckOutcome::Pending,
    }
}
