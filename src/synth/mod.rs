//! Name-to-email synthesis.
//!
//! Three stages per name:
//! - `FormatSpec::parse` splits the template into local pattern and domain
//! - `NameRecord::parse` splits the display name into first/middle/last
//! - `render_local_part` substitutes placeholders and sanitizes
//!
//! The domain is appended untouched.

mod format;
mod name;
mod render;

pub use format::FormatSpec;
pub use name::{is_name_whitespace, NameRecord};
pub use render::{render_local_part, RenderMode};

/// Build the address for one name. An invalid template (no `@`) yields an
/// empty string rather than an error.
pub fn synthesize(name: &str, template: &str, mode: RenderMode) -> String {
    let Some(spec) = FormatSpec::parse(template) else {
        return String::new();
    };

    let record = NameRecord::parse(name);
    let local = render_local_part(&spec.local_pattern, &record, mode);
    tracing::trace!(
        name,
        tokens = record.tokens().len(),
        local = %local,
        mode = mode.as_str(),
        "rendered local part"
    );
    format!("{}@{}", local, spec.domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesize() {
        assert_eq!(
            synthesize("John Doe", "firstname.lastname@company.com", RenderMode::Cascade),
            "john.doe@company.com"
        );
        assert_eq!(
            synthesize("Madonna", "firstname.lastname@company.com", RenderMode::Cascade),
            "madonna.@company.com"
        );
        assert_eq!(
            synthesize("Ann Lee", "flastname@company.com", RenderMode::Cascade),
            "alee@company.com"
        );
    }

    #[test]
    fn test_invalid_template_yields_empty() {
        assert_eq!(synthesize("John Doe", "firstname.lastname", RenderMode::Cascade), "");
        assert_eq!(synthesize("John Doe", "", RenderMode::Tokenized), "");
    }

    #[test]
    fn test_domain_untouched() {
        // Letters and case in the domain survive every pass
        assert_eq!(
            synthesize("Jo'Ann O'Brien", "firstname.lastname@Film-Mail.COM", RenderMode::Cascade),
            "joann.obrien@Film-Mail.COM"
        );
        assert_eq!(
            synthesize("John Doe", "f@ weird domain ", RenderMode::Cascade),
            "j@ weird domain "
        );
    }
}
