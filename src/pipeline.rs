//! End-to-end reading view: segment, tokenize and match a text.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::annotation::{decode_annotation_line, encode_annotation, AnnotationDocument, UpdatedFields};
use crate::error::AnnotationError;
use crate::matcher::{mask_term, status_in_range, MatchedSentence, MatchedSpan};
use crate::profile::LanguageProfile;
use crate::sentence_splitter::{segment_iter, Sentence};
use crate::vocabulary::{TermRepository, VocabularySnapshot};

/// A profile paired with the vocabulary snapshot for one matching pass
#[derive(Debug, Clone)]
pub struct Pipeline {
    profile: Arc<LanguageProfile>,
    snapshot: Arc<VocabularySnapshot>,
}

impl Pipeline {
    pub fn new(profile: Arc<LanguageProfile>, snapshot: Arc<VocabularySnapshot>) -> Self {
        Self { profile, snapshot }
    }

    /// Snapshot the repository's terms for the profile's language
    pub fn from_repository(profile: Arc<LanguageProfile>, repository: &dyn TermRepository) -> Result<Self> {
        let snapshot = VocabularySnapshot::from_repository(repository, &profile)?;
        Ok(Self::new(profile, Arc::new(snapshot)))
    }

    pub fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    pub fn snapshot(&self) -> &VocabularySnapshot {
        &self.snapshot
    }

    /// Matched sentences, produced one at a time so a caller can stop early
    pub fn read_sentences<'a>(&'a self, text: &'a str) -> impl Iterator<Item = MatchedSentence> + 'a {
        segment_iter(text, &self.profile).map(move |sentence| MatchedSentence::new(sentence, &self.snapshot))
    }

    /// Match sentences produced elsewhere, e.g. by an external tokenizer
    pub fn read_tokenized(&self, sentences: Vec<Sentence>) -> ReadingView {
        let sentences = sentences
            .into_iter()
            .map(|sentence| MatchedSentence::new(sentence, &self.snapshot))
            .collect();
        self.view(sentences)
    }

    pub fn read_text(&self, text: &str) -> ReadingView {
        let view = self.view(self.read_sentences(text).collect());
        let stats = view.stats();
        info!(
            language = self.profile.code(),
            sentences = stats.sentences,
            words = stats.words,
            unknown = stats.unknown,
            "Built reading view"
        );
        view
    }

    fn view(&self, sentences: Vec<MatchedSentence>) -> ReadingView {
        ReadingView {
            language: self.profile.code().to_string(),
            right_to_left: self.profile.is_right_to_left(),
            sentences,
        }
    }
}

/// Sentences of one text with their matched spans
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingView {
    pub language: String,
    /// Rendering hint; spans are always in logical order
    pub right_to_left: bool,
    pub sentences: Vec<MatchedSentence>,
}

/// Word counts of a reading view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewStats {
    pub sentences: usize,
    /// Word tokens
    pub words: usize,
    /// Matched spans
    pub spans: usize,
    /// Spans without a term
    pub unknown: usize,
    /// Spans per term status code
    pub by_status: BTreeMap<u16, usize>,
}

impl ReadingView {
    pub fn stats(&self) -> ViewStats {
        let mut stats = ViewStats {
            sentences: self.sentences.len(),
            ..ViewStats::default()
        };
        for sentence in &self.sentences {
            stats.words += sentence.sentence.word_count();
            for span in &sentence.spans {
                stats.spans += 1;
                match span.status() {
                    Some(status) => *stats.by_status.entry(status.code()).or_insert(0) += 1,
                    None => stats.unknown += 1,
                }
            }
        }
        stats
    }

    /// Known spans whose status lies in the encoded range
    pub fn filter_by_status(&self, range_code: u32) -> Vec<&MatchedSpan> {
        self.spans()
            .filter(|span| {
                span.status()
                    .is_some_and(|status| status_in_range(status.code(), range_code))
            })
            .collect()
    }

    pub fn unknown_spans(&self) -> Vec<&MatchedSpan> {
        self.spans().filter(|span| !span.is_known()).collect()
    }

    pub fn spans(&self) -> impl Iterator<Item = &MatchedSpan> + '_ {
        self.sentences.iter().flat_map(|sentence| sentence.spans.iter())
    }

    pub fn annotation(&self) -> AnnotationDocument {
        encode_annotation(&self.sentences)
    }

    /// Decode one edited line against this view
    pub fn decode_line(&self, document: &str, line_index: usize) -> Result<UpdatedFields, AnnotationError> {
        decode_annotation_line(document, line_index, &self.sentences)
    }

    /// Sentence text with the first occurrence of `surface` masked
    pub fn cloze(&self, sentence_index: usize, surface: &str, placeholder: &str) -> Option<String> {
        self.sentences
            .get(sentence_index)
            .map(|sentence| mask_term(&sentence.sentence.surface(), surface, placeholder))
    }
}
