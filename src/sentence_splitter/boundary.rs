//! Accept/suppress decision for a single delimiter match.
//!
//! The splitter turns every delimiter-pattern hit into a [`DelimiterMatch`]
//! borrowed from the source text and asks [`decide_boundary`] what to do with
//! it. The decision depends only on the tuple and the exception list.

use super::abbreviations::{trim_leading_marks, AbbreviationChecker};

/// Closing quotation marks and brackets that stay with the ending sentence
pub const CLOSING_MARKS: &[char] = &[
    '"', '\'', ')', ']', '}', '\u{201D}', '\u{2019}', '\u{00BB}', '\u{203A}', '\u{300D}',
    '\u{300F}', '\u{FF09}', '\u{FF3D}',
];

/// Literal view of one delimiter hit and its immediate surroundings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterMatch<'a> {
    /// Non-whitespace run before the delimiter, opening marks stripped
    pub preceding_word: &'a str,
    /// Text matched by the delimiter pattern
    pub delimiter: &'a str,
    /// Closing marks directly after the delimiter
    pub closing: &'a str,
    /// Whitespace directly after the closing marks
    pub whitespace: &'a str,
    /// First character after the whitespace, `None` at end of text
    pub next_char: Option<char>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryDecision {
    /// End the sentence after delimiter, closing marks and whitespace
    Accept,
    /// Treat the delimiter as sentence-internal
    Suppress,
}

impl<'a> DelimiterMatch<'a> {
    /// Build the tuple for the delimiter at `start..end`. `word_start` is the
    /// byte offset just past the last whitespace before the delimiter, or the
    /// sentence start when that is later.
    pub fn from_text(text: &'a str, word_start: usize, start: usize, end: usize) -> Self {
        let preceding_word = trim_leading_marks(&text[word_start..start]);

        let rest = &text[end..];
        let after_closing = rest.trim_start_matches(CLOSING_MARKS);
        let closing = &rest[..rest.len() - after_closing.len()];
        let after_whitespace = after_closing.trim_start();
        let whitespace = &after_closing[..after_closing.len() - after_whitespace.len()];

        Self {
            preceding_word,
            delimiter: &text[start..end],
            closing,
            whitespace,
            next_char: after_whitespace.chars().next(),
        }
    }

    /// Bytes from the delimiter start to the start of the next sentence
    pub fn consumed_len(&self) -> usize {
        self.delimiter.len() + self.closing.len() + self.whitespace.len()
    }

    /// Delimiter plus closing marks, the sentence terminator
    pub fn terminator_len(&self) -> usize {
        self.delimiter.len() + self.closing.len()
    }
}

/// Decide whether a delimiter ends the sentence
pub fn decide_boundary(m: &DelimiterMatch<'_>, exceptions: &AbbreviationChecker) -> BoundaryDecision {
    // Delimiter at end of text always terminates
    if m.next_char.is_none() {
        return BoundaryDecision::Accept;
    }

    if exceptions.suppresses(m.preceding_word, m.delimiter) {
        return BoundaryDecision::Suppress;
    }

    // Glued between ASCII alphanumerics: 3.14, the inner dots of U.S.A.
    if m.closing.is_empty() && m.whitespace.is_empty() {
        let glued_before = m
            .preceding_word
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric());
        let glued_after = m.next_char.is_some_and(|c| c.is_ascii_alphanumeric());
        if glued_before && glued_after {
            return BoundaryDecision::Suppress;
        }
    }

    BoundaryDecision::Accept
}
