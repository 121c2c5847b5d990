//! Import token streams produced by external tokenizers.
//!
//! Morphological analysers for Japanese and Chinese emit either one token per
//! line with a blank line between sentences, or a JSON result of the form
//! `{"sentences": [...], "tokens": [{"text", "is_word", "reading"}]}`. Both
//! are turned into ordinary [`Sentence`]s so matching and annotation work on
//! them unchanged. Spans refer to the concatenated sentence texts.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExternalFormatError;
use crate::profile::LanguageProfile;
use crate::sentence_splitter::Sentence;
use crate::span::{BytePos, CharPos, TextSpan};
use crate::tokenizer::{Token, WordToken};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalToken {
    pub text: String,
    pub is_word: bool,
    #[serde(default)]
    pub reading: Option<String>,
}

/// JSON result of an external parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalParseResult {
    pub sentences: Vec<String>,
    pub tokens: Vec<ExternalToken>,
}

impl ExternalParseResult {
    pub fn from_json(json: &str) -> Result<Self, ExternalFormatError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Distribute the flat token list over the sentences. Text a parser
    /// skipped between tokens is kept as a separator.
    pub fn into_sentences(&self, profile: &LanguageProfile) -> Result<Vec<Sentence>, ExternalFormatError> {
        let mut assembler = SentenceAssembler::new(profile);
        let mut tokens = self.tokens.iter().peekable();
        // First sentence the pending token was searched in
        let mut stalled_at = None;

        for (index, sentence_text) in self.sentences.iter().enumerate() {
            let mut cursor = 0;
            while let Some(token) = tokens.peek() {
                let Some(found) = sentence_text[cursor..].find(token.text.as_str()) else {
                    stalled_at.get_or_insert(index);
                    break;
                };
                let at = cursor + found;
                assembler.push(&sentence_text[cursor..at], false, None);
                assembler.push(&token.text, token.is_word, token.reading.clone());
                cursor = at + token.text.len();
                stalled_at = None;
                tokens.next();
            }
            assembler.push(&sentence_text[cursor..], false, None);
            assembler.close();
        }

        if let Some(token) = tokens.next() {
            return Err(ExternalFormatError::Misaligned {
                token: token.text.clone(),
                sentence: stalled_at.unwrap_or(0),
            });
        }

        Ok(assembler.finish())
    }
}

/// Parse the one-token-per-line format; a blank line ends a sentence.
/// Tokens containing an alphanumeric character are words.
pub fn parse_line_stream(text: &str, profile: &LanguageProfile) -> Vec<Sentence> {
    let mut assembler = SentenceAssembler::new(profile);
    for line in text.lines() {
        if line.is_empty() {
            assembler.close();
            continue;
        }
        let is_word = line.chars().any(char::is_alphanumeric);
        assembler.push(line, is_word, None);
    }
    assembler.finish()
}

/// Builds sentences from tokens while tracking offsets
struct SentenceAssembler<'p> {
    profile: &'p LanguageProfile,
    sentences: Vec<Sentence>,
    tokens: Vec<Token>,
    text: String,
    start: BytePos,
    char_start: CharPos,
    cursor: BytePos,
    char_cursor: CharPos,
}

impl<'p> SentenceAssembler<'p> {
    fn new(profile: &'p LanguageProfile) -> Self {
        Self {
            profile,
            sentences: Vec::new(),
            tokens: Vec::new(),
            text: String::new(),
            start: BytePos(0),
            char_start: CharPos(0),
            cursor: BytePos(0),
            char_cursor: CharPos(0),
        }
    }

    fn push(&mut self, surface: &str, is_word: bool, reading: Option<String>) {
        if surface.is_empty() {
            return;
        }
        let span = TextSpan::covering(surface, self.cursor, self.char_cursor);
        self.cursor = span.end;
        self.char_cursor = span.char_end;
        self.text.push_str(surface);

        if is_word {
            let mut word = WordToken::new(surface, span);
            word.reading = reading.filter(|r| !r.is_empty());
            self.tokens.push(Token::Word(word));
        } else if !(self.profile.removes_spaces() && surface.chars().all(char::is_whitespace)) {
            self.tokens.push(Token::separator(surface));
        }
    }

    fn close(&mut self) {
        if self.text.is_empty() {
            return;
        }

        let terminator = self
            .tokens
            .last()
            .filter(|t| !t.is_word() && self.profile.delimiter_pattern().is_match(t.surface()))
            .map(|t| t.surface().to_string());

        let span = TextSpan::new(self.start, self.cursor, self.char_start, self.char_cursor);
        self.sentences.push(Sentence {
            index: self.sentences.len(),
            span,
            tokens: std::mem::take(&mut self.tokens),
            terminator,
        });
        self.text.clear();
        self.start = self.cursor;
        self.char_start = self.char_cursor;
    }

    fn finish(mut self) -> Vec<Sentence> {
        self.close();
        debug!(
            language = self.profile.code(),
            sentences = self.sentences.len(),
            "Imported external token stream"
        );
        self.sentences
    }
}
