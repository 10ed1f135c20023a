//! Plain-text find/replace over the raw document. Pure functions in char
//! offsets; the session decides about wrap-around and selection.

use crate::sync::TextRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub whole_words: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            whole_words: false,
        }
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn chars_match(a: char, b: char, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a == b || a.to_lowercase().eq(b.to_lowercase())
    }
}

fn matches_at(text: &[char], at: usize, needle: &[char], opts: &SearchOptions) -> bool {
    if at + needle.len() > text.len() {
        return false;
    }
    if !needle
        .iter()
        .enumerate()
        .all(|(i, &nc)| chars_match(text[at + i], nc, opts.case_sensitive))
    {
        return false;
    }
    if opts.whole_words {
        let before_ok = at == 0 || !is_word_char(text[at - 1]);
        let after = at + needle.len();
        let after_ok = after >= text.len() || !is_word_char(text[after]);
        if !before_ok || !after_ok {
            return false;
        }
    }
    true
}

/// First match at or after `from` (a char offset). No wrap-around.
pub fn find_next(text: &str, needle: &str, from: usize, opts: &SearchOptions) -> Option<TextRange> {
    if needle.is_empty() {
        return None;
    }
    let text: Vec<char> = text.chars().collect();
    let needle: Vec<char> = needle.chars().collect();
    let last_start = text.len().checked_sub(needle.len())?;
    for at in from..=last_start {
        if matches_at(&text, at, &needle, opts) {
            return Some(TextRange {
                start: at,
                end: at + needle.len(),
            });
        }
    }
    None
}

/// Number of non-overlapping matches in the whole text.
pub fn count_occurrences(text: &str, needle: &str, opts: &SearchOptions) -> usize {
    let mut count = 0;
    let mut from = 0;
    while let Some(range) = find_next(text, needle, from, opts) {
        count += 1;
        from = range.end;
    }
    count
}

/// Replaces every non-overlapping match; returns the new text and how many
/// replacements were made.
pub fn replace_all(
    text: &str,
    needle: &str,
    replacement: &str,
    opts: &SearchOptions,
) -> (String, usize) {
    if needle.is_empty() {
        return (text.to_string(), 0);
    }
    let chars: Vec<char> = text.chars().collect();
    let needle_chars: Vec<char> = needle.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut count = 0;
    let mut at = 0;
    while at < chars.len() {
        if matches_at(&chars, at, &needle_chars, opts) {
            out.push_str(replacement);
            at += needle_chars.len();
            count += 1;
        } else {
            out.push(chars[at]);
            at += 1;
        }
    }
    (out, count)
}
