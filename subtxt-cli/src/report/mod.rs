use crate::batch::{FileOutcome, RunReport};
use crate::core::error::SubtxtError;

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Human-readable block for one file
fn format_outcome(outcome: &FileOutcome) -> String {
    let mut output = String::new();
    let total = outcome.total_matches();

    output.push_str(&format!(
        "📝 {} -> {}\n",
        outcome.source_path.display(),
        outcome.output_path.display()
    ));
    output.push_str(&format!("   {} replacement{}\n", total, plural(total)));

    for record in &outcome.match_records {
        output.push_str(&format!("   {:>5}  {}\n", record.match_count, record.find));
    }

    output
}

/// Render a finished run as text.
///
/// Fails with `EmptyReport` when the ingest selection matched no files.
pub fn render_report(report: &RunReport) -> Result<String, SubtxtError> {
    if report.is_empty() {
        return Err(SubtxtError::EmptyReport {
            ingest: report.ingest_dir.clone(),
        });
    }

    let mut output = String::new();

    output.push_str("========================================\n");
    output.push_str("           SUBTXT RUN REPORT\n");
    output.push_str("========================================\n\n");
    output.push_str(&format!("Files considered: {}\n", report.files_considered));
    output.push_str(&format!("Files written: {}\n", report.files_written));
    output.push_str(&format!("Files changed: {}\n", report.files_changed.len()));
    output.push_str(&format!("Replacements made: {}\n\n", report.total_matches()));

    for (i, outcome) in report.outcomes.iter().enumerate() {
        output.push_str(&format_outcome(outcome));
        if i < report.outcomes.len() - 1 {
            output.push_str("\n----------------------------------------\n\n");
        }
    }

    output.push_str("\n========================================\n");
    Ok(output)
}

/// Render a finished run as pretty JSON
pub fn render_json(report: &RunReport) -> Result<String, SubtxtError> {
    if report.is_empty() {
        return Err(SubtxtError::EmptyReport {
            ingest: report.ingest_dir.clone(),
        });
    }
    Ok(serde_json::to_string_pretty(report)?)
}
