/*!
 * Reporting functionality for codecat
 *
 * Renders join and split summaries as tables on stderr, so they never mix
 * with a bundle stream on stdout.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::resolver::JoinSummary;
use crate::splitter::SplitSummary;
use crate::utils::format_file_size;

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    key: String,

    #[tabled(rename = "Value")]
    value: String,
}

impl SummaryRow {
    fn new(key: &str, value: impl ToString) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for join and split runs
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    fn render(&self, rows: Vec<SummaryRow>) -> String {
        match self.format {
            ReportFormat::ConsoleTable => {
                let mut table = Table::new(rows);
                table
                    .with(Style::rounded())
                    .with(Padding::new(1, 1, 0, 0))
                    .with(Modify::new(Columns::new(..)).with(Alignment::left()));
                table.to_string()
            }
        }
    }

    /// Generate a report for a join run
    pub fn join_report(&self, summary: &JoinSummary, duration: Duration) -> String {
        let rows = vec![
            SummaryRow::new("Files Joined", summary.emitted.len()),
            SummaryRow::new("Content Size", format_file_size(summary.content_bytes)),
            SummaryRow::new("Excluded by Path", summary.excluded_by_path),
            SummaryRow::new("Excluded by Package", summary.excluded_by_namespace),
            SummaryRow::new("Skipped on Error", summary.errors),
            SummaryRow::new("Process Time", format!("{:.4?}", duration)),
        ];
        format!("JOIN COMPLETE\n{}", self.render(rows))
    }

    /// Generate a report for a split run
    pub fn split_report(&self, summary: &SplitSummary, duration: Duration) -> String {
        let rows = vec![
            SummaryRow::new("Files Written", summary.written.len()),
            SummaryRow::new("Bytes Written", format_file_size(summary.bytes)),
            SummaryRow::new("Rejected Paths", summary.rejected),
            SummaryRow::new("Discarded Records", summary.discarded),
            SummaryRow::new("Unterminated Records", summary.unterminated),
            SummaryRow::new("Process Time", format!("{:.4?}", duration)),
        ];
        format!("SPLIT COMPLETE\n{}", self.render(rows))
    }

    /// Print a join report to stderr
    pub fn print_join(&self, summary: &JoinSummary, duration: Duration) {
        eprintln!("\n{}", self.join_report(summary, duration));
    }

    /// Print a split report to stderr
    pub fn print_split(&self, summary: &SplitSummary, duration: Duration) {
        eprintln!("\n{}", self.split_report(summary, duration));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_report() {
        let summary = JoinSummary {
            emitted: vec!["main.go".to_string(), "util/a.go".to_string()],
            content_bytes: 2048,
            excluded_by_path: 1,
            ..Default::default()
        };
        let report = Reporter::new(ReportFormat::ConsoleTable)
            .join_report(&summary, Duration::from_millis(5));

        assert!(report.starts_with("JOIN COMPLETE"));
        assert!(report.contains("Files Joined"));
        assert!(report.contains("2.00 KB"));
    }

    #[test]
    fn test_split_report() {
        let summary = SplitSummary {
            written: vec!["a.txt".to_string()],
            bytes: 10,
            rejected: 2,
            ..Default::default()
        };
        let report = Reporter::new(ReportFormat::ConsoleTable)
            .split_report(&summary, Duration::from_millis(1));

        assert!(report.contains("Rejected Paths"));
        assert!(report.contains("10 bytes"));
    }
}
