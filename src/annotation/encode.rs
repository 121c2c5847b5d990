use tracing::debug;

use super::escape::{escape_field_into, FIELD_SEPARATOR, GROUP_SEPARATOR};
use super::AnnotationDocument;
use crate::matcher::MatchedSentence;

/// Encode one sentence as a single annotation line
pub fn encode_sentence(sentence: &MatchedSentence) -> String {
    let mut line = String::new();
    for (i, span) in sentence.spans.iter().enumerate() {
        if i > 0 {
            line.push(GROUP_SEPARATOR);
        }
        escape_field_into(&span.surface, &mut line);
        line.push(FIELD_SEPARATOR);
        escape_field_into(span.translation(), &mut line);
        line.push(FIELD_SEPARATOR);
        escape_field_into(span.romanization(), &mut line);
    }
    line
}

/// Encode matched sentences, one line each, in document order
pub fn encode_annotation(sentences: &[MatchedSentence]) -> AnnotationDocument {
    let lines: Vec<String> = sentences.iter().map(encode_sentence).collect();
    debug!(lines = lines.len(), "Encoded annotation document");
    AnnotationDocument::new(lines)
}
