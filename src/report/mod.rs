pub mod types;

pub use types::{indicator, DashboardView};

use crate::checks::CheckOutcome;
use crate::dashboard::Refresh;
use crate::pr::PullRequestSnapshot;
use colored::Colorize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

pub const NO_CHECKS_MESSAGE: &str = "No checks found.";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),
}

/// Turn a refresh result into what the dashboard displays.
pub fn build(refresh: Refresh) -> DashboardView {
    match refresh.message() {
        Some(message) => DashboardView::Message(message),
        None => DashboardView::Cards(refresh.into_snapshots()),
    }
}

/// Output the dashboard to the terminal (default) or to a markdown file.
#[instrument(skip(view))]
pub fn output(view: &DashboardView, output_path: Option<&Path>) -> Result<(), ReportError> {
    match output_path {
        None => {
            debug!("writing dashboard to terminal");
            print_terminal_dashboard(view);
            Ok(())
        }
        Some(path) => {
            debug!(path = %path.display(), "writing dashboard to file");
            std::fs::write(path, render_markdown(view))?;
            Ok(())
        }
    }
}

/// Print one card per PR:
///
/// ═══ Fix the flux capacitor ═══
/// https://github.com/o/r/pull/1
///   ✅ ci/build
///   🟡 lint
fn print_terminal_dashboard(view: &DashboardView) {
    println!();
    match view {
        DashboardView::Message(message) => println!("{}", message.yellow()),
        DashboardView::Cards(cards) => {
            for card in cards {
                println!("═══ {} ═══", card.title.bold());
                println!("{}", card.url.dimmed());
                if card.checks.is_empty() {
                    println!("  {NO_CHECKS_MESSAGE}");
                }
                for check in &card.checks {
                    let outcome = check.outcome();
                    println!("  {} {}", indicator(outcome), colorize_name(&check.name, outcome));
                }
                println!();
            }
        }
    }
}

/// Render the dashboard as markdown, one section per PR.
fn render_markdown(view: &DashboardView) -> String {
    let cards = match view {
        DashboardView::Message(message) => return format!("{message}\n"),
        DashboardView::Cards(cards) => cards,
    };

    let mut md = String::from("# PR Dashboard\n\n");
    for card in cards {
        md.push_str(&markdown_card(card));
    }
    md
}

fn markdown_card(card: &PullRequestSnapshot) -> String {
    let mut md = format!("## [{}]({})\n\n", card.title, card.url);
    if card.checks.is_empty() {
        md.push_str(&format!("- {NO_CHECKS_MESSAGE}\n"));
    }
    for check in &card.checks {
        md.push_str(&format!(
            "- {} `{}` ({})\n",
            indicator(check.outcome()),
            check.name,
            check.conclusion
        ));
    }
    md.push('\n');
    md
}

fn colorize_name(name: &str, outcome: CheckOutcome) -> colored::ColoredString {
    match outcome {
        CheckOutcome::Success => name.green(),
        CheckOutcome::Failure => name.red().bold(),
        CheckOutcome::Pending => name.yellow(),
    }
}
