use std::borrow::Cow;
use std::sync::LazyLock;

use lumen_core::constants::EMAIL_PLACEHOLDER;
use regex::Regex;

// ── Email ──────────────────────────────────────────────────────────────────
pub static RE_EMAIL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}").ok()
});

/// Whether `text` contains something that looks like an email address.
pub fn contains_email(text: &str) -> bool {
    RE_EMAIL.as_ref().is_some_and(|re| re.is_match(text))
}

/// Replace every email-like substring with the placeholder.
///
/// Returns the input unchanged (borrowed) when nothing matched. If the
/// pattern failed to compile, the whole value is replaced: an unscanned value
/// must not leave the pipeline.
pub fn redact_emails(text: &str) -> Cow<'_, str> {
    match RE_EMAIL.as_ref() {
        Some(re) => re.replace_all(text, EMAIL_PLACEHOLDER),
        None => Cow::Owned(EMAIL_PLACEHOLDER.to_string()),
    }
}
