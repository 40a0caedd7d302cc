//! Rendering of submissions and lookup results in the selected format

use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::OutputFormat;
use crate::core::wizard::Submission;

/// Serialize a finished flow's payload
pub fn format_submission(submission: &Submission, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Auto | OutputFormat::Yaml => {
            serde_yml::to_string(submission).into_diagnostic()
        }
        OutputFormat::Json => serde_json::to_string_pretty(submission).into_diagnostic(),
        OutputFormat::Md => {
            let mut table = Builder::default();
            table.push_record(["Field", "Value"]);
            for (field, value) in &submission.fields {
                table.push_record([field.label().to_string(), value.to_string()]);
            }
            Ok(format!(
                "## {}\n\n{}",
                submission.flow.title(),
                table.build().with(Style::markdown())
            ))
        }
    }
}

/// Several payloads: a JSON array, or documents separated by `---` / blank lines
pub fn format_submissions(submissions: &[Submission], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(submissions).into_diagnostic(),
        OutputFormat::Md => Ok(submissions
            .iter()
            .map(|s| format_submission(s, format))
            .collect::<Result<Vec<_>>>()?
            .join("\n\n")),
        OutputFormat::Auto | OutputFormat::Yaml => Ok(submissions
            .iter()
            .map(|s| format_submission(s, format))
            .collect::<Result<Vec<_>>>()?
            .join("---\n")),
    }
}

/// A flat list: one item per line, or a one-column table / JSON array
pub fn format_list(header: &str, items: &[&str], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Auto => Ok(items.join("\n")),
        OutputFormat::Yaml => serde_yml::to_string(&items).into_diagnostic(),
        OutputFormat::Json => serde_json::to_string_pretty(items).into_diagnostic(),
        OutputFormat::Md => {
            let mut table = Builder::default();
            table.push_record([header]);
            for item in items {
                table.push_record([*item]);
            }
            Ok(table.build().with(Style::markdown()).to_string())
        }
    }
}
