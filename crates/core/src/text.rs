//! Plain-text helpers for upstream trivia strings.

use std::borrow::Cow;

/// Decode HTML entities (`&amp;`, `&quot;`, `&#039;`, ...) into plain text.
///
/// Unknown or malformed entities are left untouched.
#[must_use]
pub fn decode_entities(raw: &str) -> String {
    match html_escape::decode_html_entities(raw) {
        Cow::Borrowed(s) => s.to_owned(),
        Cow::Owned(s) => s,
    }
}

/// Returns true when the text is empty after trimming whitespace.
#[must_use]
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
