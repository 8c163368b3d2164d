//! Batch generation over a comma-separated list of names.

use crate::synth::{self, is_name_whitespace, FormatSpec, RenderMode};
use serde::Serialize;

/// One generated address, paired with the name it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailResult {
    pub name: String,
    pub email: String,
}

/// Split on commas, trim each entry and drop the empty ones.
pub fn split_names(input: &str) -> Vec<&str> {
    input
        .split(',')
        .map(|name| name.trim_matches(is_name_whitespace))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Generate one result per name, in input order, against a shared template.
///
/// No deduplication and no size limit. A template without `@` still lists
/// every name, each with an empty email.
pub fn generate(input: &str, template: &str, mode: RenderMode) -> Vec<EmailResult> {
    if FormatSpec::parse(template).is_none() {
        tracing::warn!(template, "format has no '@'; every email will be empty");
    }

    let results: Vec<EmailResult> = split_names(input)
        .into_iter()
        .map(|name| EmailResult {
            name: name.to_string(),
            email: synth::synthesize(name, template, mode),
        })
        .collect();

    tracing::debug!(
        count = results.len(),
        mode = mode.as_str(),
        "generated emails"
    );
    results
}

/// The bulk export text: every email, newline-joined.
pub fn emails_text(results: &[EmailResult]) -> String {
    results
        .iter()
        .map(|result| result.email.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMAT: &str = "firstname.lastname@company.com";

    #[test]
    fn test_split_names() {
        assert_eq!(
            split_names(" John Doe,Jane Smith ,, ,\tRobert Johnson "),
            vec!["John Doe", "Jane Smith", "Robert Johnson"]
        );
        assert!(split_names("").is_empty());
        assert!(split_names(" , ,").is_empty());
    }

    #[test]
    fn test_split_names_keeps_next_line() {
        assert_eq!(split_names(",\u{85},"), vec!["\u{85}"]);

        let results = generate("A\u{85}B Cd", FORMAT, RenderMode::Cascade);
        assert_eq!(results[0].email, "ab.cd@company.com");
    }

    #[test]
    fn test_generate_preserves_order_and_duplicates() {
        let results = generate("John Doe, Robert Johnson, John Doe", FORMAT, RenderMode::Cascade);
        let emails: Vec<&str> = results.iter().map(|r| r.email.as_str()).collect();
        assert_eq!(
            emails,
            vec![
                "john.doe@company.com",
                "robert.johnson@company.com",
                "john.doe@company.com"
            ]
        );
        assert_eq!(results[1].name, "Robert Johnson");
    }

    #[test]
    fn test_generate_empty_input() {
        assert!(generate("", FORMAT, RenderMode::Cascade).is_empty());
        assert!(generate(" ,  , ", FORMAT, RenderMode::Cascade).is_empty());
    }

    #[test]
    fn test_generate_invalid_format_keeps_names() {
        let results = generate("John Doe, Madonna", "firstname.lastname", RenderMode::Cascade);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "John Doe");
        assert_eq!(results[1].name, "Madonna");
        assert!(results.iter().all(|r| r.email.is_empty()));
    }

    #[test]
    fn test_generate_is_repeatable() {
        let input = "Mary Williams, Jo'Ann O'Brien, Madonna";
        assert_eq!(
            generate(input, FORMAT, RenderMode::Cascade),
            generate(input, FORMAT, RenderMode::Cascade)
        );
    }

    #[test]
    fn test_emails_text() {
        let results = generate("John Doe, Madonna", FORMAT, RenderMode::Cascade);
        assert_eq!(
            emails_text(&results),
            "john.doe@company.com\nmadonna.@company.com"
        );
        assert_eq!(emails_text(&[]), "");
    }
}
