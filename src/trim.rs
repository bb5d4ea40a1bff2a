//! Leading-noise trimming: strip ISO-8601 timestamp tokens and GUIDs that
//! log frameworks prepend to otherwise readable lines.

use std::sync::OnceLock;

use regex::Regex;

const GUID_LEN_WITH_SEPARATOR: usize = 37;

fn iso_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T").unwrap())
}

fn guid_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
            .unwrap()
    })
}

/// Strip a leading ISO-8601 timestamp token, or a leading GUID plus one
/// separator character, from `s`.
///
/// The input is whitespace-trimmed first. A string with no whitespace never
/// errors; the timestamp check simply does not apply to it. A GUID with
/// nothing after its separator trims to the empty string.
pub fn trim_event(s: &str) -> String {
    let trimmed = s.trim();

    if let Some((head, tail)) = split_once_whitespace(trimmed) {
        if iso_prefix().is_match(head) {
            return tail.to_string();
        }
    }

    if guid_prefix().is_match(trimmed) {
        return skip_chars(trimmed, GUID_LEN_WITH_SEPARATOR);
    }

    trimmed.to_string()
}

/// Split on the first whitespace run: the token before it, and the rest with
/// leading whitespace removed. `None` when the string has no whitespace.
fn split_once_whitespace(s: &str) -> Option<(&str, &str)> {
    let at = s.find(char::is_whitespace)?;
    Some((&s[..at], s[at..].trim_start()))
}

/// Everything after the first `n` characters; empty when the string is shorter.
fn skip_chars(s: &str, n: usize) -> String {
    match s.char_indices().nth(n) {
        Some((at, _)) => s[at..].to_string(),
        None => String::new(),
    }
}
