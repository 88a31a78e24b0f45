//! Fragment accumulation for streamed replies.
//!
//! Streamed fragments arrive as model tokens that may or may not carry
//! their own whitespace. Naive concatenation runs Latin words together at
//! token boundaries, while CJK text needs no separator, so `merge` decides
//! per boundary and `finalize` cleans punctuation spacing once the stream
//! closes.

use once_cell::sync::Lazy;
use regex::Regex;

/// Punctuation that should be followed by a space before a Latin letter.
const TERMINAL_PUNCTUATION: [char; 6] = ['.', '!', '?', ':', ';', ','];

#[expect(clippy::unwrap_used, reason = "pattern is a compile-time constant")]
static PUNCTUATION_BEFORE_LETTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.!?:;,])([A-Za-z])").unwrap());

#[expect(clippy::unwrap_used, reason = "pattern is a compile-time constant")]
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Merge one incoming fragment into the accumulated text.
///
/// A single space is inserted when a Latin letter or terminal punctuation
/// meets a Latin letter across the boundary; everything else concatenates
/// directly. An empty fragment leaves the text unchanged.
#[must_use]
pub fn merge(accumulated: &str, fragment: &str) -> String {
    if fragment.is_empty() {
        return accumulated.to_string();
    }

    let boundary_needs_space = match (accumulated.chars().last(), fragment.chars().next()) {
        (Some(last), Some(first)) if first.is_ascii_alphabetic() => {
            last.is_ascii_alphabetic() || TERMINAL_PUNCTUATION.contains(&last)
        }
        _ => false,
    };

    if boundary_needs_space {
        format!("{accumulated} {fragment}")
    } else {
        format!("{accumulated}{fragment}")
    }
}

/// One-time cleanup applied when the stream closes.
///
/// Ensures a space after terminal punctuation that abuts a Latin letter,
/// collapses whitespace runs, and trims the ends. Idempotent.
#[must_use]
pub fn finalize(text: &str) -> String {
    let spaced = PUNCTUATION_BEFORE_LETTER.replace_all(text, "$1 $2");
    let collapsed = WHITESPACE_RUN.replace_all(&spaced, " ");
    collapsed.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_inserts_space_between_latin_words() {
        assert_eq!(merge("Hello", "world"), "Hello world");
    }

    #[test]
    fn merge_inserts_space_after_punctuation() {
        assert_eq!(merge("Hi.", "there"), "Hi. there");
        assert_eq!(merge("Wait,", "what"), "Wait, what");
    }

    #[test]
    fn merge_concatenates_cjk_directly() {
        assert_eq!(merge("你好", "世界"), "你好世界");
    }

    #[test]
    fn merge_empty_fragment_is_noop() {
        assert_eq!(merge("anything", ""), "anything");
        assert_eq!(merge("", ""), "");
    }

    #[test]
    fn merge_keeps_existing_whitespace() {
        // The fragment starts with a space, so no extra separator.
        assert_eq!(merge("Hello", " world"), "Hello world");
    }

    #[test]
    fn merge_no_space_before_punctuation() {
        assert_eq!(merge("Hello", "."), "Hello.");
    }

    #[test]
    fn finalize_spaces_punctuation_and_collapses_runs() {
        assert_eq!(finalize("I understand.Let's  talk"), "I understand. Let's talk");
        assert_eq!(finalize("  padded  "), "padded");
    }

    #[test]
    fn finalize_leaves_cjk_untouched() {
        assert_eq!(finalize("你好。世界"), "你好。世界");
    }

    #[test]
    fn finalize_is_idempotent() {
        let samples = [
            "I understand.Let's talk",
            "Hi.there,now",
            "  a   b  ",
            "你好,world",
            "",
        ];
        for sample in samples {
            let once = finalize(sample);
            assert_eq!(finalize(&once), once, "not idempotent for {sample:?}");
        }
    }
}
