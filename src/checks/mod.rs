pub mod types;

pub use types::{CheckOutcome, CheckResult, RawCheckEntry, PENDING};

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, warn};

/// Read entries from a commit statuses payload (a JSON array of
/// `{context, state}`). Any other shape is an empty feed.
pub fn status_entries(payload: &Value) -> Vec<RawCheckEntry> {
    match payload.as_array() {
        Some(statuses) => collect_entries(statuses, "context", "state"),
        None => {
            warn!("statuses payload is not an array, ignoring it");
            Vec::new()
        }
    }
}

/// Read entries from a check-runs payload (`{check_runs: [{name, conclusion}]}`).
/// Any other shape is an empty feed.
pub fn check_run_entries(payload: &Value) -> Vec<RawCheckEntry> {
    match payload.get("check_runs").and_then(Value::as_array) {
        Some(runs) => collect_entries(runs, "name", "conclusion"),
        None => {
            warn!("check-runs payload has no check_runs array, ignoring it");
            Vec::new()
        }
    }
}

fn collect_entries(values: &[Value], name_field: &str, conclusion_field: &str) -> Vec<RawCheckEntry> {
    values
        .iter()
        .filter_map(|value| {
            let name = value.get(name_field)?.as_str()?;
            let conclusion = value.get(conclusion_field).and_then(Value::as_str);
            Some(RawCheckEntry::new(name, conclusion))
        })
        .collect()
}

/// Merge the two check feeds of one commit into a single list with one
/// entry per name.
///
/// Statuses are taken first and win for any name both feeds report; check
/// runs only fill in names the statuses did not mention. Output order is
/// statuses in feed order, then the remaining check runs in feed order.
pub fn reconcile(statuses: &[RawCheckEntry], check_runs: &[RawCheckEntry]) -> Vec<CheckResult> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged = Vec::new();

    for status in statuses {
        if seen.insert(status.name.as_str()) {
            merged.push(CheckResult {
                name: status.name.clone(),
                // A status always carries a state; a malformed one is still running.
                conclusion: status.conclusion.clone().unwrap_or_else(|| PENDING.to_string()),
            });
        }
    }

    for run in check_runs {
        if seen.insert(run.name.as_str()) {
            merged.push(CheckResult {
                name: run.name.clone(),
                conclusion: run.conclusion.clone().unwrap_or_else(|| PENDING.to_string()),
            });
        }
    }

    debug!(
        statuses = statuses.len(),
        check_runs = check_runs.len(),
        merged = merged.len(),
        "reconciled check feeds"
    );
    merged
}
