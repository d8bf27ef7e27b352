use crate::domain::model::{Classification, SlaSummary, TicketEvaluation};
use crate::utils::error::Result;
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    tickets: &'a [TicketEvaluation],
    summary: &'a SlaSummary,
}

pub fn render_json(evaluations: &[TicketEvaluation], summary: &SlaSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport {
        tickets: evaluations,
        summary,
    })?)
}

pub fn render_text(evaluations: &[TicketEvaluation], summary: &SlaSummary) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:<12} {:<10} {:<7} {:>9}  {}",
        "TICKET", "URGENCY", "STATE", "HOURS", "CLASSIFICATION"
    );
    for evaluation in evaluations {
        let _ = writeln!(
            out,
            "{:<12} {:<10} {:<7} {:>9.1}  {} ({})",
            evaluation.ticket_id,
            evaluation.urgency,
            if evaluation.closed { "closed" } else { "open" },
            evaluation.elapsed_hours,
            evaluation.classification,
            evaluation.classification.colour()
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Open tickets: {} of {}", summary.open, summary.total);
    for classification in [
        Classification::OnTime,
        Classification::Approaching,
        Classification::Overdue,
        Classification::Unknown,
    ] {
        let _ = writeln!(
            out,
            "{:<18} {:>5} ({:.0}%)",
            classification.display_name(),
            summary.count(classification),
            summary.share(classification) * 100.0
        );
    }

    match summary.average_close_hours {
        Some(hours) => {
            let _ = writeln!(out, "Average close time: {:.1} h", hours);
        }
        None => {
            let _ = writeln!(out, "Average close time: N/D");
        }
    }
    out
}
