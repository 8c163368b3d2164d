//! Rendering of generated results for the terminal.

use crate::batch::{self, EmailResult};
use anyhow::Result;

/// Placeholder reference shown by `--help` and `/placeholders`
pub const PLACEHOLDER_HELP: &str = "\
Available placeholders:
  firstname, first    first name
  lastname, last      last name
  middlename, middle  middle name (second of three or more names)
  f, l, m             first, last and middle initial

Examples: firstname.lastname@company.com, f.lastname@company.com, firstnamel@company.com";

/// How one-shot results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputStyle {
    /// `name<TAB>email`, one per line
    #[default]
    Table,
    Json,
    /// Newline-joined emails, the same text "copy all" exports
    EmailsOnly,
}

pub fn render(results: &[EmailResult], style: OutputStyle) -> Result<String> {
    Ok(match style {
        OutputStyle::Table => table(results),
        OutputStyle::Json => json(results)?,
        OutputStyle::EmailsOnly => batch::emails_text(results),
    })
}

pub fn table(results: &[EmailResult]) -> String {
    results
        .iter()
        .map(|result| format!("{}\t{}", result.name, result.email))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn json(results: &[EmailResult]) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

/// Numbered listing used by the interactive session
pub fn numbered(results: &[EmailResult], copied: bool) -> String {
    let mut out = format!("Generated emails ({})", results.len());
    if copied {
        out.push_str(" (copied)");
    }
    let width = results.len().to_string().len();
    for (i, result) in results.iter().enumerate() {
        let email = if result.email.is_empty() {
            "<no email>"
        } else {
            result.email.as_str()
        };
        out.push_str(&format!(
            "\n  {:>width$}. {}  {}",
            i + 1,
            result.name,
            email,
            width = width
        ));
    }
    out
}
