//! Output formatting utilities for markdown and JSON.

use crate::props::PropertyMapping;
use crate::reload::ReloadStatus;
use clap::ValueEnum;
use serde::Serialize;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    Json,
    #[default]
    #[value(alias = "md")]
    Markdown,
}

/// Pretty JSON, or an error object if serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

/// Escape pipes and line breaks so a value fits in one table cell.
fn cell(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Format a mapping as a markdown table, keys sorted.
pub fn format_mapping_markdown(mapping: &PropertyMapping) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Properties ({})\n\n", mapping.len()));
    if mapping.is_empty() {
        md.push_str("_No properties._\n");
        return md;
    }

    md.push_str("| key | value |\n");
    md.push_str("|-----|-------|\n");
    for (key, value) in mapping.sorted() {
        md.push_str(&format!("| `{}` | {} |\n", cell(key), cell(value)));
    }

    md
}

pub fn format_mapping(mapping: &PropertyMapping, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(mapping),
        OutputFormat::Markdown => format_mapping_markdown(mapping),
    }
}

/// Format scheduler status as markdown.
pub fn format_status_markdown(status: &ReloadStatus) -> String {
    let mut md = String::new();

    md.push_str("## Reload status\n");
    md.push_str(&format!("- **state**: {}\n", status.state));
    if let Some(ref source) = status.source {
        md.push_str(&format!("- **source**: `{}`\n", source.display()));
    }
    md.push_str(&format!("- **cadence**: {} ms\n", status.cadence.as_millis()));
    md.push_str(&format!("- **entries**: {}\n", status.entries));
    md.push_str(&format!(
        "- **reloads**: {} ok, {} failed\n",
        status.successful_reloads, status.failed_reloads
    ));

    if let Some(at) = status.last_success {
        md.push_str(&format!("- **last_success**: {}\n", at.to_rfc3339()));
    }

    if let Some(at) = status.last_failure {
        md.push_str(&format!("- **last_failure**: {}\n", at.to_rfc3339()));
    }

    if let Some(ref err) = status.last_error {
        md.push_str(&format!("- **last_error**: {}\n", err));
    }

    if let Some(at) = status.next_fire {
        md.push_str(&format!("- **next_fire**: {}\n", at.to_rfc3339()));
    }

    md
}

pub fn format_status(status: &ReloadStatus, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(status),
        OutputFormat::Markdown => format_status_markdown(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reload::SchedulerState;
    use std::path::PathBuf;
    use std::time::Duration;

    fn status() -> ReloadStatus {
        ReloadStatus {
            state: SchedulerState::Scheduled,
            source: Some(PathBuf::from("conf/app.properties")),
            cadence: Duration::from_millis(5000),
            entries: 2,
            successful_reloads: 3,
            failed_reloads: 1,
            last_success: None,
            last_failure: None,
            last_error: Some("cannot find configuration file: x".into()),
            next_fire: None,
        }
    }

    #[test]
    fn test_output_format_value_names() {
        assert_eq!(OutputFormat::from_str("JSON", true), Ok(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("md", false), Ok(OutputFormat::Markdown));
        assert_eq!(OutputFormat::from_str("markdown", false), Ok(OutputFormat::Markdown));
        assert!(OutputFormat::from_str("yaml", true).is_err());
    }

    #[test]
    fn test_mapping_markdown_is_sorted_and_escaped() {
        let mapping: PropertyMapping = [("b", "2"), ("a", "x|y")].into_iter().collect();
        let md = format_mapping_markdown(&mapping);
        assert!(md.starts_with("# Properties (2)"));
        let a = md.find("`a`").unwrap();
        let b = md.find("`b`").unwrap();
        assert!(a < b);
        assert!(md.contains("x\\|y"));
    }

    #[test]
    fn test_empty_mapping_markdown() {
        let md = format_mapping_markdown(&PropertyMapping::new());
        assert!(md.contains("_No properties._"));
    }

    #[test]
    fn test_mapping_json() {
        let mapping: PropertyMapping = [("k", "v")].into_iter().collect();
        let json: serde_json::Value =
            serde_json::from_str(&format_mapping(&mapping, OutputFormat::Json)).unwrap();
        assert_eq!(json["k"], "v");
    }

    #[test]
    fn test_status_markdown() {
        let md = format_status_markdown(&status());
        assert!(md.contains("- **state**: scheduled"));
        assert!(md.contains("- **cadence**: 5000 ms"));
        assert!(md.contains("3 ok, 1 failed"));
        assert!(md.contains("last_error"));
        assert!(!md.contains("next_fire"));
    }

    #[test]
    fn test_status_json() {
        let json: serde_json::Value =
            serde_json::from_str(&format_status(&status(), OutputFormat::Json)).unwrap();
        assert_eq!(json["failed_reloads"], 1);
        assert_eq!(json["cadence_ms"], 5000);
    }
}
