use once_cell::sync::Lazy;
use regex::Regex;

use crate::text_processing::truncate_chars;

/// Maximum length of a sanitized sub-project name, in characters.
pub const MAX_NAME_CHARS: usize = 200;

/// Normalize a sub-project name for display.
///
/// Keeps letters (umlauts and ß included), digits, whitespace, hyphen, period
/// and comma; collapses all whitespace runs, line breaks included, into a
/// single space; trims; truncates to [`MAX_NAME_CHARS`] characters.
pub fn sanitize_name(raw: &str) -> String {
    static DISALLOWED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s\-.,]").unwrap());
    static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

    let kept = DISALLOWED_RE.replace_all(raw, "");
    let collapsed = WS_RE.replace_all(&kept, " ");
    truncate_chars(collapsed.trim(), MAX_NAME_CHARS)
        .trim_end()
        .to_string()
}
