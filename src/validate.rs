//! Input validation for the text field.
//!
//! The rule is deliberately loose: anything that looks like a URL, or any text
//! free of `<` and `>`, may be encoded. The only thing refused is markup.

use regex::Regex;
use std::sync::OnceLock;

/// Shown inline whenever input or generation is refused.
pub const INVALID_INPUT_MESSAGE: &str = "Please enter a valid URL or plain text (no code or tags).";

fn url_pattern() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| {
        Regex::new(r"(?i)^(https?://)?([A-Za-z0-9_-]+\.)+[A-Za-z0-9_-]+(/[A-Za-z0-9_ ./?%&=-]*)?$")
            .expect("static URL pattern compiles")
    })
}

fn plain_text_pattern() -> &'static Regex {
    static PLAIN: OnceLock<Regex> = OnceLock::new();
    PLAIN.get_or_init(|| Regex::new(r"^[^<>]+$").expect("static plain text pattern compiles"))
}

/// Returns `true` if `text` matches the loose URL shape.
pub fn is_url(text: &str) -> bool {
    url_pattern().is_match(text)
}

/// Returns `true` if `text` is a URL or non-empty plain text without angle brackets.
///
/// The empty string is *not* valid here; [`validate`] adds that case for
/// keystroke handling, while generation requires non-empty input.
pub fn is_valid_input(text: &str) -> bool {
    is_url(text) || plain_text_pattern().is_match(text)
}

/// Keystroke validation: accepts the empty string or any valid input.
///
/// # Example
///
/// ```
/// use qreator::validate::validate;
///
/// assert!(validate(""));
/// assert!(validate("https://example.com/path?q=1"));
/// assert!(validate("hello world"));
/// assert!(!validate("<script>"));
/// ```
pub fn validate(text: &str) -> bool {
    text.is_empty() || is_valid_input(text)
}
