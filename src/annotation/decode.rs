use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::escape::split_line;
use super::AnnotationDocument;
use crate::error::AnnotationError;
use crate::matcher::MatchedSentence;
use crate::tokenizer::Token;
use crate::vocabulary::{TermId, TermUpdate};

const MIN_FIELDS: usize = 2;
const MAX_FIELDS: usize = 3;

/// Values read back for one matched span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldUpdate {
    pub surface: String,
    /// Term the span was bound to when the document was encoded
    pub term_id: Option<TermId>,
    pub translation: String,
    pub romanization: String,
    /// Whether translation or romanization differs from the bound term
    pub changed: bool,
}

/// Decoded values keyed by the token position of each span's first word
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedFields {
    /// 1-based line index the fields came from
    pub line: usize,
    pub fields: BTreeMap<usize, FieldUpdate>,
}

impl UpdatedFields {
    pub fn get(&self, position: usize) -> Option<&FieldUpdate> {
        self.fields.get(&position)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Repository updates for bound spans whose values were edited
    pub fn term_updates(&self) -> Vec<TermUpdate> {
        self.fields
            .values()
            .filter(|field| field.changed)
            .filter_map(|field| {
                field.term_id.map(|id| TermUpdate {
                    id,
                    translation: Some(field.translation.clone()),
                    romanization: Some(field.romanization.clone()),
                    status: None,
                })
            })
            .collect()
    }
}

/// Decode line `line_index` (1-based) of a possibly hand-edited document
/// against the sentences it was encoded from
pub fn decode_annotation_line(
    document: &str,
    line_index: usize,
    original: &[MatchedSentence],
) -> Result<UpdatedFields, AnnotationError> {
    let available = original.len();
    if line_index == 0 || line_index > available {
        return Err(AnnotationError::LineOutOfRange {
            requested: line_index,
            available,
        });
    }

    let document = parse_document(document, available)?;
    let line = document
        .line(line_index)
        .ok_or(AnnotationError::LineOutOfRange {
            requested: line_index,
            available,
        })?;

    decode_line(line, line_index, &original[line_index - 1])
}

/// Decode every line of a document
pub fn decode_annotation(
    document: &str,
    original: &[MatchedSentence],
) -> Result<Vec<UpdatedFields>, AnnotationError> {
    let parsed = parse_document(document, original.len())?;
    let decoded = parsed
        .lines()
        .iter()
        .zip(original)
        .enumerate()
        .map(|(i, (line, sentence))| decode_line(line, i + 1, sentence))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(lines = decoded.len(), "Decoded annotation document");
    Ok(decoded)
}

fn parse_document(document: &str, expected_lines: usize) -> Result<AnnotationDocument, AnnotationError> {
    let parsed = AnnotationDocument::from_text(document)?;
    if parsed.len() != expected_lines {
        return Err(AnnotationError::ParseAnnotationFailed {
            reason: format!(
                "document has {} lines but {} sentences were annotated",
                parsed.len(),
                expected_lines
            ),
        });
    }
    Ok(parsed)
}

fn decode_line(
    line: &str,
    line_index: usize,
    sentence: &MatchedSentence,
) -> Result<UpdatedFields, AnnotationError> {
    let line_failed = |reason: String| AnnotationError::ParseLineFailed {
        line: line_index,
        reason,
    };

    let groups = split_line(line).map_err(line_failed)?;
    for (i, group) in groups.iter().enumerate() {
        if group.len() == 1 && group[0].is_empty() {
            return Err(line_failed(format!("column group {} is empty", i + 1)));
        }
        if group.len() > MAX_FIELDS {
            return Err(line_failed(format!(
                "column group {} has {} fields, at most {MAX_FIELDS} are allowed",
                i + 1,
                group.len()
            )));
        }
    }

    let tokens = &sentence.sentence.tokens;
    let mut updated = UpdatedFields {
        line: line_index,
        fields: BTreeMap::new(),
    };
    let mut cursor = 0;

    for (i, group) in groups.into_iter().enumerate() {
        if group.len() < MIN_FIELDS {
            return Err(AnnotationError::InsufficientColumns { found: group.len() });
        }

        let mut fields = group.into_iter();
        let surface = fields.next().unwrap_or_default();
        let translation = fields.next().unwrap_or_default();
        let romanization = fields.next().unwrap_or_default();
        if surface.is_empty() {
            return Err(line_failed(format!("column group {} has an empty surface", i + 1)));
        }

        let span = loop {
            if cursor >= tokens.len() {
                return Err(line_failed(format!(
                    "surface '{surface}' does not match any remaining word"
                )));
            }
            if let Token::Separator { surface: separator } = &tokens[cursor] {
                if separator.trim() == surface {
                    return Err(AnnotationError::PunctuationTerm { position: cursor });
                }
            } else if let Some(span) = sentence.span_starting_at(cursor) {
                if span.surface == surface {
                    break span;
                }
            }
            cursor += 1;
        };
        cursor = span.positions[span.positions.len() - 1] + 1;

        let changed = translation != span.translation() || romanization != span.romanization();
        updated.fields.insert(
            span.start(),
            FieldUpdate {
                surface,
                term_id: span.term.as_ref().map(|t| t.id),
                translation,
                romanization,
                changed,
            },
        );
    }

    Ok(updated)
}
