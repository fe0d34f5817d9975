//! Console output formatter for search envelopes

use colored::Colorize;
use snaxel_domain::{
    Envelope, OutputFormat, ResultItem, SearchSummary, Source, SourceResult,
};

/// Formats search results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render an envelope in the requested format
    pub fn render(envelope: &Envelope, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format(envelope),
            OutputFormat::Summary => Self::format_summary(&SearchSummary::from_envelope(envelope)),
            OutputFormat::Json => Self::format_json(envelope),
        }
    }

    /// Format every source section of an envelope
    pub fn format(envelope: &Envelope) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Search Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Query:".cyan().bold(),
            envelope.query
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Searched:".cyan().bold(),
            envelope.timestamp.to_rfc3339()
        ));

        for (source, result) in &envelope.sources {
            output.push_str(&Self::format_source(*source, result));
        }

        output.push_str(&format!(
            "\n{} {}\n",
            "Total results:".bold(),
            envelope.total_results
        ));
        output.push_str(&Self::footer());

        output
    }

    /// Format one source section (also used for single-source lookups)
    pub fn format_source(source: Source, result: &SourceResult) -> String {
        let mut output = String::new();

        match result {
            SourceResult::Results(items) => {
                output.push_str(&Self::section_header(
                    &format!("{} ({})", source, items.len()),
                    false,
                ));
                if items.is_empty() {
                    output.push_str(&format!("  {}\n", "No results".dimmed()));
                }
                for (index, item) in items.iter().enumerate() {
                    output.push_str(&Self::format_item(index + 1, item));
                }
            }
            SourceResult::Failure(reason) => {
                output.push_str(&Self::section_header(&format!("{} (failed)", source), true));
                output.push_str(&format!(
                    "  {} {}\n",
                    format!("[{}]", reason.kind).red(),
                    reason.message
                ));
            }
        }

        output
    }

    fn format_item(position: usize, item: &ResultItem) -> String {
        let mut output = format!("{:>3}. {}\n", position, item.title.bold());
        output.push_str(&format!("     {}\n", item.url.blue().underline()));
        if let Some(snippet) = &item.snippet {
            output.push_str(&Self::indent(snippet, "     "));
            output.push('\n');
        }
        if let Some(thumbnail) = &item.thumbnail {
            output.push_str(&format!("     {} {}\n", "thumbnail:".dimmed(), thumbnail));
        }
        output
    }

    /// Format per-source counts (the `--all` view)
    pub fn format_summary(summary: &SearchSummary) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Search Summary ===".cyan().bold()
        ));
        output.push_str(&format!("{} {}\n", "Q:".bold(), summary.query));
        output.push_str(&format!(
            "{} {} ({} ok, {} failed)\n\n",
            "Total results:".dimmed(),
            summary.total_results,
            summary.successful_sources,
            summary.failed_sources
        ));

        for line in &summary.sources {
            match &line.error {
                None => output.push_str(&format!(
                    "  {} {:<8} {}\n",
                    "v".green(),
                    line.source.as_str(),
                    line.count
                )),
                Some(error) => output.push_str(&format!(
                    "  {} {:<8} {}\n",
                    "x".red(),
                    line.source.as_str(),
                    error.red()
                )),
            }
        }

        output
    }

    /// Format as JSON
    pub fn format_json(envelope: &Envelope) -> String {
        serde_json::to_string_pretty(envelope).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the `--all` output as JSON: the envelope plus its summary
    pub fn format_all_json(envelope: &Envelope, summary: &SearchSummary) -> String {
        let value = serde_json::json!({
            "results": envelope,
            "summary": summary,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format a single-source result as JSON
    pub fn format_single_json(source: Source, result: &SourceResult) -> String {
        let value = serde_json::json!({
            "source": source,
            "result": result,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str, failed: bool) -> String {
        let title = format!("── {} ──", title);
        let title = if failed {
            title.red().bold()
        } else {
            title.yellow().bold()
        };
        format!("\n{}\n", title)
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
