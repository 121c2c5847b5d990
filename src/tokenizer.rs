//! Word tokenizer.
//!
//! Splits a sentence into [`Token`]s in logical source order. Word tokens
//! carry their byte/char span in the source plus a lowercase comparison form;
//! separators keep only their surface so the sentence can be rebuilt exactly.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::profile::LanguageProfile;
use crate::span::{BytePos, CharPos, TextSpan};

/// A word-bearing token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordToken {
    pub surface: String,
    /// Lowercase comparison form used for vocabulary lookups
    pub lower: String,
    pub span: TextSpan,
    /// Pronunciation supplied by an external tokenizer, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<String>,
}

impl WordToken {
    pub fn new(surface: &str, span: TextSpan) -> Self {
        Self {
            surface: surface.to_string(),
            lower: surface.to_lowercase(),
            span,
            reading: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Token {
    Word(WordToken),
    Separator { surface: String },
}

impl Token {
    pub fn separator(surface: &str) -> Self {
        Token::Separator {
            surface: surface.to_string(),
        }
    }

    pub fn surface(&self) -> &str {
        match self {
            Token::Word(word) => &word.surface,
            Token::Separator { surface } => surface,
        }
    }

    pub fn is_word(&self) -> bool {
        matches!(self, Token::Word(_))
    }

    pub fn as_word(&self) -> Option<&WordToken> {
        match self {
            Token::Word(word) => Some(word),
            Token::Separator { .. } => None,
        }
    }

    /// True for separators made only of whitespace
    pub fn is_blank_separator(&self) -> bool {
        match self {
            Token::Separator { surface } => surface.chars().all(char::is_whitespace),
            Token::Word(_) => false,
        }
    }
}

/// Tokenize `text`; spans are relative to `text`
pub fn tokenize(text: &str, profile: &LanguageProfile) -> Vec<Token> {
    tokenize_at(text, BytePos(0), CharPos(0), profile)
}

/// Tokenize `source[range]`; spans are absolute in `source`
pub fn tokenize_span(source: &str, range: Range<usize>, profile: &LanguageProfile) -> Vec<Token> {
    let char_start = CharPos(source[..range.start].chars().count());
    tokenize_at(&source[range.clone()], BytePos(range.start), char_start, profile)
}

/// Tokenize `text` that starts at `base`/`char_base` in its source
pub(crate) fn tokenize_at(
    text: &str,
    base: BytePos,
    char_base: CharPos,
    profile: &LanguageProfile,
) -> Vec<Token> {
    let mut builder = TokenBuilder::new(text, base, char_base, profile.removes_spaces());

    if profile.splits_each_char() {
        for (offset, grapheme) in text.grapheme_indices(true) {
            if grapheme.chars().any(char::is_alphanumeric) {
                builder.push_word(offset, offset + grapheme.len());
            } else {
                builder.push_separator(offset, offset + grapheme.len());
            }
        }
    } else {
        for m in profile.word_pattern().find_iter(text) {
            builder.push_separator(builder.cursor, m.start());
            builder.push_word(m.start(), m.end());
        }
        builder.push_separator(builder.cursor, text.len());
    }

    builder.tokens
}

/// Accumulates tokens while tracking the char offset incrementally
struct TokenBuilder<'a> {
    text: &'a str,
    base: BytePos,
    /// Byte offset in `text` up to which tokens have been emitted
    cursor: usize,
    char_cursor: CharPos,
    drop_blank: bool,
    tokens: Vec<Token>,
}

impl<'a> TokenBuilder<'a> {
    fn new(text: &'a str, base: BytePos, char_base: CharPos, drop_blank: bool) -> Self {
        Self {
            text,
            base,
            cursor: 0,
            char_cursor: char_base,
            drop_blank,
            tokens: Vec::new(),
        }
    }

    fn push_word(&mut self, start: usize, end: usize) {
        let surface = &self.text[start..end];
        let span = TextSpan::covering(surface, self.base.advance(start), self.char_cursor);
        self.char_cursor = span.char_end;
        self.cursor = end;
        self.tokens.push(Token::Word(WordToken::new(surface, span)));
    }

    fn push_separator(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let surface = &self.text[start..end];
        self.char_cursor = self.char_cursor.advance(surface.chars().count());
        self.cursor = end;
        if self.drop_blank && surface.chars().all(char::is_whitespace) {
            return;
        }
        self.tokens.push(Token::separator(surface));
    }
}
