use fancy_regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.,:;\-()]").expect("valid regex"));

/// Requirement text with everything but word characters, whitespace and
/// `. , : ; - ( )` removed, trimmed at both ends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whitespace-delimited tokens
    #[inline]
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }
}

impl fmt::Display for NormalizedText {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedText {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strip disallowed characters and trim. Never fails; empty in, empty out.
#[inline]
pub fn normalize(text: &str) -> NormalizedText {
    let stripped = DISALLOWED_CHARS.replace_all(text, "");
    NormalizedText(stripped.trim().to_string())
}
