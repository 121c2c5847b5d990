//! Sentence splitter.
//!
//! Scans the profile's delimiter pattern over the text and asks the pure
//! [`decide_boundary`] function whether each hit ends a sentence. Sentences
//! partition the source: a boundary sits after the delimiter, any closing
//! quotes or brackets, and the whitespace that follows them.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::profile::LanguageProfile;
use crate::span::{BytePos, CharPos, TextSpan};
use crate::tokenizer::{tokenize_at, Token, WordToken};

pub mod abbreviations;
pub mod boundary;
pub mod normalization;

pub use abbreviations::AbbreviationChecker;
pub use boundary::{decide_boundary, BoundaryDecision, DelimiterMatch, CLOSING_MARKS};
pub use normalization::{normalize_sentence, normalize_sentence_into, normalize_sentence_with};

/// Byte ranges of one sentence before tokenization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceBoundary {
    pub span: Range<usize>,
    /// Delimiter plus closing marks, absent for trailing unterminated text
    pub terminator: Option<Range<usize>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// 0-based position in the document
    pub index: usize,
    pub span: TextSpan,
    pub tokens: Vec<Token>,
    /// Text that terminated the sentence, e.g. `."`
    pub terminator: Option<String>,
}

impl Sentence {
    /// Concatenated token surfaces
    pub fn surface(&self) -> String {
        self.tokens.iter().map(Token::surface).collect()
    }

    /// Display form with line breaks and whitespace collapsed
    pub fn normalized(&self, joiner: &str) -> String {
        normalize_sentence_with(&self.surface(), joiner)
    }

    /// Word tokens with their position in `tokens`
    pub fn words(&self) -> impl Iterator<Item = (usize, &WordToken)> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .filter_map(|(position, token)| token.as_word().map(|word| (position, word)))
    }

    pub fn word_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_word()).count()
    }

    /// Token at `position`; out-of-range positions are a caller bug
    pub fn token(&self, position: usize) -> &Token {
        &self.tokens[position]
    }
}

/// Compute sentence byte ranges without tokenizing
pub fn sentence_boundaries(text: &str, profile: &LanguageProfile) -> Vec<SentenceBoundary> {
    let mut boundaries = Vec::new();
    let mut sentence_start = 0;
    // Delimiter hits inside an already consumed closing/whitespace run are skipped
    let mut scan_floor = 0;
    // Byte just past the last whitespace seen, advanced forward only
    let mut word_start = 0;
    let mut whitespace_scanned = 0;

    for m in profile.delimiter_pattern().find_iter(text) {
        if m.start() < scan_floor {
            continue;
        }

        if let Some((i, c)) = text[whitespace_scanned..m.start()]
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
        {
            word_start = whitespace_scanned + i + c.len_utf8();
        }
        whitespace_scanned = m.start();

        let tuple = DelimiterMatch::from_text(text, word_start.max(sentence_start), m.start(), m.end());
        if decide_boundary(&tuple, profile.exceptions()) == BoundaryDecision::Suppress {
            continue;
        }

        let end = m.start() + tuple.consumed_len();
        boundaries.push(SentenceBoundary {
            span: sentence_start..end,
            terminator: Some(m.start()..m.start() + tuple.terminator_len()),
        });
        sentence_start = end;
        scan_floor = end;
    }

    if sentence_start < text.len() {
        boundaries.push(SentenceBoundary {
            span: sentence_start..text.len(),
            terminator: None,
        });
    }

    boundaries
}

/// Split `text` into tokenized sentences, yielding them lazily
pub fn segment_iter<'a>(
    text: &'a str,
    profile: &'a LanguageProfile,
) -> impl Iterator<Item = Sentence> + 'a {
    let mut char_pos = CharPos(0);
    sentence_boundaries(text, profile)
        .into_iter()
        .enumerate()
        .map(move |(index, boundary)| {
            let slice = &text[boundary.span.clone()];
            let start = BytePos(boundary.span.start);
            let tokens = tokenize_at(slice, start, char_pos, profile);
            let span = TextSpan::covering(slice, start, char_pos);
            char_pos = span.char_end;

            Sentence {
                index,
                span,
                tokens,
                terminator: boundary.terminator.map(|range| text[range].to_string()),
            }
        })
}

/// Split `text` into tokenized sentences
pub fn segment(text: &str, profile: &LanguageProfile) -> Vec<Sentence> {
    let sentences: Vec<Sentence> = segment_iter(text, profile).collect();
    debug!(
        language = profile.code(),
        bytes = text.len(),
        sentences = sentences.len(),
        "Segmented text"
    );
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{get_profile, ProfileConfig};
    use std::sync::Arc;

    fn english() -> Arc<LanguageProfile> {
        get_profile("en").unwrap()
    }

    fn raw_sentences<'a>(text: &'a str, profile: &LanguageProfile) -> Vec<&'a str> {
        sentence_boundaries(text, profile)
            .into_iter()
            .map(|b| &text[b.span])
            .collect()
    }

    #[test]
    fn test_basic_split() {
        let text = "Hello world. This is Dr. Smith! Is it 3.14? Yes";
        assert_eq!(
            raw_sentences(text, &english()),
            vec!["Hello world. ", "This is Dr. Smith! ", "Is it 3.14? ", "Yes"]
        );
    }

    #[test]
    fn test_closing_marks_stay_with_sentence() {
        let text = "He said \"Stop.\" Then he left.";
        let boundaries = sentence_boundaries(text, &english());
        assert_eq!(&text[boundaries[0].span.clone()], "He said \"Stop.\" ");
        assert_eq!(&text[boundaries[0].terminator.clone().unwrap()], ".\"");
        assert_eq!(&text[boundaries[1].terminator.clone().unwrap()], ".");
    }

    #[test]
    fn test_dotted_initialism() {
        let text = "He moved to the U.S.A. yesterday. Then back.";
        assert_eq!(
            raw_sentences(text, &english()),
            vec!["He moved to the U.S.A. yesterday. ", "Then back."]
        );
    }

    #[test]
    fn test_exception_at_end_of_text_terminates() {
        let sentences = segment("See Dr.", &english());
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].terminator.as_deref(), Some("."));
    }

    #[test]
    fn test_edge_cases() {
        assert!(segment("", &english()).is_empty());

        let single = segment("no delimiter here", &english());
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].terminator, None);

        let blank = segment("   ", &english());
        assert_eq!(blank.len(), 1);
        assert_eq!(blank[0].word_count(), 0);
    }

    #[test]
    fn test_delimiter_runs() {
        let text = "Really?! Yes... ok";
        assert_eq!(raw_sentences(text, &english()), vec!["Really?! ", "Yes... ", "ok"]);
    }

    #[test]
    fn test_sentences_partition_source() {
        let text = "One. Two!\n\"Three?\" Four";
        let sentences = segment(text, &english());
        let rebuilt: String = sentences.iter().map(Sentence::surface).collect();
        assert_eq!(rebuilt, text);

        let mut expected_start = 0;
        for (i, sentence) in sentences.iter().enumerate() {
            assert_eq!(sentence.index, i);
            assert_eq!(sentence.span.start.0, expected_start);
            expected_start = sentence.span.end.0;
        }
        assert_eq!(expected_start, text.len());
    }

    #[test]
    fn test_word_spans_are_absolute() {
        let text = "Première phrase. Deuxième phrase.";
        let sentences = segment(text, &get_profile("fr").unwrap());
        let (position, word) = sentences[1].words().next().unwrap();
        assert_eq!(position, 0);
        assert_eq!(word.span.slice(text), "Deuxième");
        assert_eq!(word.span.char_start, CharPos(17));
        assert_eq!(sentences[1].span.char_start, CharPos(17));
    }

    #[test]
    fn test_japanese_split() {
        let japanese = get_profile("ja").unwrap();
        let text = "今日は晴れ。明日は雨！";
        assert_eq!(raw_sentences(text, &japanese), vec!["今日は晴れ。", "明日は雨！"]);
    }

    #[test]
    fn test_custom_exceptions_are_case_sensitive() {
        let profile = LanguageProfile::new(
            ProfileConfig::new("xx", "Test").with_exceptions(["Abs."]),
        )
        .unwrap();
        assert_eq!(raw_sentences("See Abs. Here", &profile).len(), 1);
        assert_eq!(raw_sentences("See abs. Here", &profile).len(), 2);
    }

    #[test]
    fn test_bare_exception_keeps_other_delimiters() {
        let profile = LanguageProfile::new(
            ProfileConfig::new("xx", "Test").with_exceptions(["Prof"]),
        )
        .unwrap();
        assert_eq!(raw_sentences("Ask Prof. Lee", &profile).len(), 1);
        assert_eq!(raw_sentences("Ask Prof! Next", &profile), vec!["Ask Prof! ", "Next"]);
    }

    #[test]
    fn test_long_glued_delimiter_run() {
        let text = format!("{}1 Done.", "1.".repeat(100_000));
        let boundaries = sentence_boundaries(&text, &english());
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].span, 0..text.len());
    }

    #[test]
    fn test_normalized_sentence() {
        let sentences = segment("Line one\ncontinues here. Next.", &english());
        assert_eq!(sentences[0].normalized(" "), "Line one continues here.");
    }
}
