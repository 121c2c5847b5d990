//! Term matcher.
//!
//! Binds runs of word tokens to vocabulary terms, longest expression first.
//! Every word token ends up in exactly one [`MatchedSpan`]; separators are
//! never members.

use serde::{Deserialize, Serialize};

use crate::sentence_splitter::Sentence;
use crate::tokenizer::Token;
use crate::vocabulary::{lookup_key, Term, TermStatus, VocabularySnapshot};

pub mod cloze;
pub mod status;

pub use cloze::{mask_term, CLOZE_PLACEHOLDER};
pub use status::status_in_range;

/// A run of word tokens bound to at most one term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedSpan {
    /// Positions of the member word tokens in the sentence
    pub positions: Vec<usize>,
    /// Source text from the first to the last member, separators included
    pub surface: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<Term>,
    /// Pronunciation supplied by an external tokenizer for every member word
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<String>,
}

impl MatchedSpan {
    fn from_positions(tokens: &[Token], positions: Vec<usize>, term: Option<Term>) -> Self {
        let first = positions[0];
        let last = positions[positions.len() - 1];
        let surface = tokens[first..=last].iter().map(Token::surface).collect();
        let reading = positions
            .iter()
            .map(|&p| tokens[p].as_word().and_then(|w| w.reading.as_deref()))
            .collect::<Option<String>>();
        Self {
            positions,
            surface,
            term,
            reading,
        }
    }

    /// Position of the first member word
    pub fn start(&self) -> usize {
        self.positions[0]
    }

    pub fn word_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_known(&self) -> bool {
        self.term.is_some()
    }

    pub fn status(&self) -> Option<TermStatus> {
        self.term.as_ref().map(|t| t.status)
    }

    pub fn translation(&self) -> &str {
        self.term.as_ref().map(|t| t.translation.as_str()).unwrap_or("")
    }

    /// Term romanization, falling back to the imported reading
    pub fn romanization(&self) -> &str {
        self.term
            .as_ref()
            .map(|t| t.romanization.as_str())
            .filter(|r| !r.is_empty())
            .or(self.reading.as_deref())
            .unwrap_or("")
    }
}

/// A sentence together with its matched spans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedSentence {
    pub sentence: Sentence,
    pub spans: Vec<MatchedSpan>,
}

impl MatchedSentence {
    pub fn new(sentence: Sentence, snapshot: &VocabularySnapshot) -> Self {
        let spans = match_tokens(&sentence.tokens, snapshot);
        Self { sentence, spans }
    }

    /// Span whose first member sits at `position`
    pub fn span_starting_at(&self, position: usize) -> Option<&MatchedSpan> {
        self.spans.iter().find(|span| span.start() == position)
    }
}

/// Match a token sequence against a vocabulary snapshot
pub fn match_tokens(tokens: &[Token], snapshot: &VocabularySnapshot) -> Vec<MatchedSpan> {
    let max_words = snapshot.max_word_count();
    let mut spans = Vec::new();
    let mut position = 0;

    while position < tokens.len() {
        if !tokens[position].is_word() {
            position += 1;
            continue;
        }

        let run = word_run(tokens, position, max_words);
        let mut bound = None;
        for word_count in (1..=run.len()).rev() {
            let key = lookup_key(run[..word_count].iter().map(|&p| lower(tokens, p)), snapshot.joiner());
            if let Some(term) = snapshot.lookup(&key, word_count) {
                // An unspaced key may cover a different token count than recorded
                bound = Some((word_count, term.clone().with_word_count(word_count)));
                break;
            }
        }

        let (word_count, term) = match bound {
            Some((word_count, term)) => (word_count, Some(term)),
            None => (1, None),
        };
        position = run[word_count - 1] + 1;
        spans.push(MatchedSpan::from_positions(tokens, run[..word_count].to_vec(), term));
    }

    spans
}

/// Match every sentence of a document
pub fn match_sentences(sentences: Vec<Sentence>, snapshot: &VocabularySnapshot) -> Vec<MatchedSentence> {
    sentences
        .into_iter()
        .map(|sentence| MatchedSentence::new(sentence, snapshot))
        .collect()
}

/// Positions of up to `limit` consecutive words starting at `start`. Only
/// whitespace separators may sit between them.
fn word_run(tokens: &[Token], start: usize, limit: usize) -> Vec<usize> {
    let mut run = vec![start];
    for (position, token) in tokens.iter().enumerate().skip(start + 1) {
        if run.len() == limit {
            break;
        }
        match token {
            Token::Word(_) => run.push(position),
            _ if token.is_blank_separator() => continue,
            _ => break,
        }
    }
    run
}

fn lower(tokens: &[Token], position: usize) -> &str {
    match &tokens[position] {
        Token::Word(word) => &word.lower,
        Token::Separator { surface } => surface,
    }
}
