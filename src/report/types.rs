use crate::checks::CheckOutcome;
use crate::pr::PullRequestSnapshot;

/// What the dashboard shows after a refresh: either a single instructional
/// message or one card per tracked PR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardView {
    Message(&'static str),
    Cards(Vec<PullRequestSnapshot>),
}

/// Icon shown next to a check on a card.
pub fn indicator(outcome: CheckOutcome) -> &'static str {
    match outcome {
        CheckOutcome::Success => "✅",
        CheckOutcome::Failure => "❌",
        CheckOutcome::Pending => "🟡",
    }
}
