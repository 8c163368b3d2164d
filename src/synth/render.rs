//! Placeholder substitution for the local part of an address.
//!
//! Two renderers share the same placeholder vocabulary:
//! - `Cascade` runs nine fixed replacement passes over the whole string, in
//!   order. Later passes see the text produced by earlier ones, so names that
//!   contain `f`, `l`, `m` or a placeholder word get rewritten again.
//! - `Tokenized` scans the pattern once and substitutes each placeholder
//!   exactly once. Output differs from `Cascade` whenever the cascade would
//!   have re-scanned substituted text.
//!
//! Both finish with the same sanitization step.

use super::name::NameRecord;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// How placeholders in a local-part pattern are substituted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Cascade,
    Tokenized,
}

impl RenderMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cascade" => Some(Self::Cascade),
            "tokenized" => Some(Self::Tokenized),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cascade => "cascade",
            Self::Tokenized => "tokenized",
        }
    }
}

/// Which name component a placeholder stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    First,
    Last,
    Middle,
}

impl Slot {
    fn value<'a>(&self, name: &'a NameRecord) -> &'a str {
        match self {
            Slot::First => name.first(),
            Slot::Last => name.last(),
            Slot::Middle => name.middle(),
        }
    }

    fn initial(&self, name: &NameRecord) -> String {
        self.value(name)
            .chars()
            .next()
            .map(String::from)
            .unwrap_or_default()
    }
}

/// One replacement pass of the cascade
struct Pass {
    matcher: Regex,
    slot: Slot,
    initial: bool,
}

impl Pass {
    /// Whole placeholder word, ASCII case-insensitive
    fn word(word: &str, slot: Slot) -> Self {
        let matcher = RegexBuilder::new(&regex::escape(word))
            .case_insensitive(true)
            .unicode(false)
            .build()
            .expect("placeholder word is a valid regex");
        Pass {
            matcher,
            slot,
            initial: false,
        }
    }

    /// Single lowercase letter, case-sensitive, replaced by an initial
    fn letter(letter: char, slot: Slot) -> Self {
        let matcher = Regex::new(&regex::escape(&letter.to_string()))
            .expect("placeholder letter is a valid regex");
        Pass {
            matcher,
            slot,
            initial: true,
        }
    }

    fn apply(&self, input: &str, name: &NameRecord) -> String {
        let replacement = if self.initial {
            self.slot.initial(name)
        } else {
            self.slot.value(name).to_string()
        };

        let mut out = String::with_capacity(input.len());
        let mut last_end = 0;
        for m in self.matcher.find_iter(input) {
            out.push_str(&input[last_end..m.start()]);
            expand_replacement(&replacement, input, m.start(), m.end(), &mut out);
            last_end = m.end();
        }
        out.push_str(&input[last_end..]);
        out
    }
}

/// Expand `$` sequences in a cascade replacement for a match at
/// `input[start..end]`: `$$` is a dollar, `$&` the match, `` $` `` the text
/// before it and `$'` the text after it. Any other `$` is kept as is.
fn expand_replacement(
    replacement: &str,
    input: &str,
    start: usize,
    end: usize,
    out: &mut String,
) {
    let mut chars = replacement.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('$') => out.push('$'),
            Some('&') => out.push_str(&input[start..end]),
            Some('`') => out.push_str(&input[..start]),
            Some('\'') => out.push_str(&input[end..]),
            _ => {
                out.push('$');
                continue;
            }
        }
        chars.next();
    }
}

/// The nine passes. Order is significant.
static CASCADE: Lazy<Vec<Pass>> = Lazy::new(|| {
    vec![
        Pass::word("firstname", Slot::First),
        Pass::word("lastname", Slot::Last),
        Pass::word("middlename", Slot::Middle),
        Pass::word("first", Slot::First),
        Pass::word("last", Slot::Last),
        Pass::word("middle", Slot::Middle),
        Pass::letter('f', Slot::First),
        Pass::letter('l', Slot::Last),
        Pass::letter('m', Slot::Middle),
    ]
});

/// Placeholder words, longest first so `firstname` wins over `first`
const WORDS: [(&str, Slot); 6] = [
    ("middlename", Slot::Middle),
    ("firstname", Slot::First),
    ("lastname", Slot::Last),
    ("middle", Slot::Middle),
    ("first", Slot::First),
    ("last", Slot::Last),
];

static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9._-]").expect("sanitizer regex is valid"));

/// Substitute placeholders in `pattern` and sanitize the result.
pub fn render_local_part(pattern: &str, name: &NameRecord, mode: RenderMode) -> String {
    let raw = match mode {
        RenderMode::Cascade => render_cascade(pattern, name),
        RenderMode::Tokenized => render_tokenized(pattern, name),
    };
    sanitize(&raw)
}

fn render_cascade(pattern: &str, name: &NameRecord) -> String {
    CASCADE
        .iter()
        .fold(pattern.to_string(), |text, pass| pass.apply(&text, name))
}

fn render_tokenized(pattern: &str, name: &NameRecord) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    'scan: while let Some(c) = rest.chars().next() {
        for (word, slot) in WORDS {
            let matched = rest
                .get(..word.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(word));
            if matched {
                out.push_str(slot.value(name));
                rest = &rest[word.len()..];
                continue 'scan;
            }
        }

        match c {
            'f' => out.push_str(&Slot::First.initial(name)),
            'l' => out.push_str(&Slot::Last.initial(name)),
            'm' => out.push_str(&Slot::Middle.initial(name)),
            other => out.push(other),
        }
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// Lowercase and drop everything outside `[a-z0-9._-]`.
pub fn sanitize(raw: &str) -> String {
    DISALLOWED.replace_all(&raw.to_lowercase(), "").into_owned()
}
