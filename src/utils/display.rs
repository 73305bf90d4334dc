//! Terminal output formatting for the CLI.

use std::io::stdout;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

use crate::models::{DomainQuality, SearchOutcome, SourceTier};

/// How CLI output is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    /// Table when stdout is a terminal, JSON otherwise.
    Auto,
    Table,
    Json,
}

impl OutputStyle {
    fn resolved(self) -> OutputStyle {
        match self {
            OutputStyle::Auto if stdout().is_terminal() => OutputStyle::Table,
            OutputStyle::Auto => OutputStyle::Json,
            other => other,
        }
    }
}

/// Render a search outcome to a printable string.
pub fn render_outcome(outcome: &SearchOutcome, style: OutputStyle) -> String {
    match style.resolved() {
        OutputStyle::Json => {
            serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
        }
        _ => render_outcome_table(outcome),
    }
}

fn render_outcome_table(outcome: &SearchOutcome) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Title", "URL", "Date", "Cites", "Source"]);

    for (index, result) in outcome.results.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(truncate(&result.title, 60)),
            Cell::new(truncate(&result.url, 56)),
            Cell::new(result.published_date.as_deref().unwrap_or("-")),
            Cell::new(
                result
                    .citation_count
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(result.source.as_deref().unwrap_or("-")),
        ]);
    }

    let header = if outcome.backend_used == "error" {
        format!(
            "{} no backend produced results for \"{}\"",
            "error:".red().bold(),
            outcome.query
        )
    } else {
        format!(
            "{} result(s) for \"{}\" via {}",
            outcome.total_results,
            outcome.query,
            outcome.backend_used.bold()
        )
    };

    format!("{header}\n{table}")
}

/// Render a classification verdict for the `classify` subcommand.
pub fn render_classification(url: &str, quality: &DomainQuality, style: OutputStyle) -> String {
    match style.resolved() {
        OutputStyle::Json => serde_json::to_string_pretty(quality)
            .unwrap_or_else(|_| "{}".to_string()),
        _ => {
            let tier = match quality.tier {
                SourceTier::Tier1 => quality.tier.id().green().bold().to_string(),
                SourceTier::Tier2 => quality.tier.id().cyan().to_string(),
                SourceTier::Tier3 => quality.tier.id().yellow().to_string(),
                SourceTier::Excluded => quality.tier.id().red().bold().to_string(),
            };
            format!("{url}\n  tier: {tier}\n  reasoning: {}", quality.reasoning)
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{cut}...")
}
