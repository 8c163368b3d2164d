/// A format template split into its local-part pattern and domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    pub local_pattern: String,
    pub domain: String,
}

impl FormatSpec {
    /// Parse a template like "firstname.lastname@company.com".
    ///
    /// Splits at the first `@`; anything after it, further `@` signs included,
    /// is the domain. Neither side is trimmed or validated.
    /// Returns `None` when the template has no `@` at all.
    pub fn parse(template: &str) -> Option<Self> {
        let (local_pattern, domain) = template.split_once('@')?;
        Some(FormatSpec {
            local_pattern: local_pattern.to_string(),
            domain: domain.to_string(),
        })
    }
}

impl std::fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.local_pattern, self.domain)
    }
}
