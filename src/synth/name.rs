/// Whitespace as a browser's `trim()` and `\s` see it: Unicode White_Space
/// without NEL (U+0085), plus the byte-order mark.
pub fn is_name_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

/// A display name broken into whitespace-delimited tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameRecord {
    tokens: Vec<String>,
}

impl NameRecord {
    pub fn parse(raw: &str) -> Self {
        let tokens = raw
            .split(is_name_whitespace)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect();
        NameRecord { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// First token, or empty for a blank name.
    pub fn first(&self) -> &str {
        self.tokens.first().map(String::as_str).unwrap_or("")
    }

    /// Final token, only when there are at least two.
    pub fn last(&self) -> &str {
        match self.tokens.as_slice() {
            [_, .., last] => last.as_str(),
            _ => "",
        }
    }

    /// Second token, only when there are at least three. Further middle
    /// tokens are ignored.
    pub fn middle(&self) -> &str {
        match self.tokens.as_slice() {
            [_, middle, _, ..] => middle.as_str(),
            _ => "",
        }
    }
}
