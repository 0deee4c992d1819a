//! Output formatters for CLI commands.
//!
//! Every command result can be printed as JSON, compact text or a colored
//! human-readable rendering. Step listings and run reports have their own
//! pretty renderings; everything else goes through [`format_output`].

use crate::commands::run::RunReport;
use anyhow::Result;
use colored::Colorize;
use oae_core::cli::OutputFormat;
use oae_steps::catalog::StepDefinition;
use serde::Serialize;

/// Format data according to the specified output format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use oae_cli::formatters::format_output;
/// use oae_core::cli::OutputFormat;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Target {
///     url: String,
/// }
///
/// let target = Target { url: "http://localhost:8080/".to_string() };
/// let output = format_output(&target, OutputFormat::Json)?;
/// assert!(output.contains("\"url\""));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// Formats a step listing.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_steps(steps: &[&StepDefinition], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(&steps),
        OutputFormat::Text => Ok(text::steps(steps)),
        OutputFormat::Pretty => Ok(pretty::steps(steps)),
    }
}

/// Formats the report of a feature run.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_report(report: &RunReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::report(report)),
        OutputFormat::Json | OutputFormat::Text => format_output(report, format),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Format data as JSON with 2-space indentation.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    /// Format data as compact JSON.
    pub fn format_compact<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string(data)?)
    }
}

/// Plain text output formatting.
pub mod text {
    use super::{Result, Serialize, StepDefinition, json};

    /// Format data as compact JSON, for piping to other commands.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        json::format_compact(data)
    }

    /// One tab-separated line per step: keyword, concern, pattern.
    #[must_use]
    pub fn steps(steps: &[&StepDefinition]) -> String {
        steps
            .iter()
            .map(|step| format!("{}\t{}\t{}", step.keyword, step.concern, step.pattern))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Colorize, Result, RunReport, Serialize, StepDefinition};

    /// Format data as colorized, indented JSON-like output.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        Ok(format_value(&value, 0))
    }

    fn format_value(value: &serde_json::Value, indent: usize) -> String {
        use serde_json::Value;

        let indent_str = "  ".repeat(indent);
        let next_indent_str = "  ".repeat(indent + 1);

        match value {
            Value::Null => "null".dimmed().to_string(),
            Value::Bool(b) => b.to_string().yellow().to_string(),
            Value::Number(n) => n.to_string().cyan().to_string(),
            Value::String(s) => format!("\"{}\"", s.green()),
            Value::Array(arr) => {
                if arr.is_empty() {
                    return "[]".to_string();
                }

                let items: Vec<String> = arr
                    .iter()
                    .map(|item| format!("{next_indent_str}{}", format_value(item, indent + 1)))
                    .collect();
                format!("[\n{}\n{indent_str}]", items.join(",\n"))
            }
            Value::Object(obj) => {
                if obj.is_empty() {
                    return "{}".to_string();
                }

                let entries: Vec<String> = obj
                    .iter()
                    .map(|(key, val)| {
                        format!(
                            "{next_indent_str}\"{}\": {}",
                            key.blue().bold(),
                            format_value(val, indent + 1)
                        )
                    })
                    .collect();
                format!("{{\n{}\n{indent_str}}}", entries.join(",\n"))
            }
        }
    }

    /// Steps grouped under their concern, with an example and summary each.
    #[must_use]
    pub fn steps(steps: &[&StepDefinition]) -> String {
        if steps.is_empty() {
            return "no matching steps".dimmed().to_string();
        }

        let mut out = String::new();
        let mut concern = None;
        for step in steps {
            if concern != Some(step.concern) {
                if concern.is_some() {
                    out.push('\n');
                }
                out.push_str(&format!("{}\n", step.concern.bold().underline()));
                concern = Some(step.concern);
            }
            out.push_str(&format!(
                "  {} {}\n      {}\n",
                format!("{:<5}", step.keyword.as_str()).cyan(),
                step.example,
                step.summary.dimmed()
            ));
        }
        out.push_str(&format!("\n{} steps", steps.len()));
        out
    }

    /// One-line verdict followed by the step counts.
    #[must_use]
    pub fn report(report: &RunReport) -> String {
        let summary = &report.summary;
        let verdict = if summary.failed {
            "FAILED".red().bold()
        } else {
            "PASSED".green().bold()
        };

        let mut out = format!(
            "{verdict} {} against {} in {} ms\n",
            report.features,
            report.server.blue(),
            report.duration_ms
        );
        out.push_str(&format!(
            "  {} passed, {} failed, {} skipped",
            summary.passed_steps.to_string().green(),
            summary.failed_steps.to_string().red(),
            summary.skipped_steps.to_string().yellow()
        ));
        if summary.parsing_errors > 0 || summary.hook_errors > 0 {
            out.push_str(&format!(
                "\n  {} parsing errors, {} hook errors",
                summary.parsing_errors, summary.hook_errors
            ));
        }
        out
    }
}
