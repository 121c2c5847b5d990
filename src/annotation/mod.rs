//! Line-oriented annotation documents.
//!
//! One line per sentence, one TAB-separated column group per word span:
//! `surface|translation|romanization`. Separators are not written; decoding
//! re-aligns groups against the original tokenization.

use std::fmt;

use crate::error::AnnotationError;

pub mod decode;
pub mod encode;
pub mod escape;

pub use decode::{decode_annotation, decode_annotation_line, FieldUpdate, UpdatedFields};
pub use encode::{encode_annotation, encode_sentence};

/// Flat editable form of an annotated document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationDocument {
    lines: Vec<String>,
}

impl AnnotationDocument {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Split document text into lines. Every line ends with `\n`; a missing
    /// final terminator and `\r\n` endings are tolerated.
    pub fn from_text(text: &str) -> Result<Self, AnnotationError> {
        if let Some(offset) = text.find('\0') {
            return Err(AnnotationError::ParseAnnotationFailed {
                reason: format!("NUL byte at offset {offset}"),
            });
        }

        let lines = text
            .split_terminator('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Ok(Self { lines })
    }

    /// Line by 1-based index
    pub fn line(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for AnnotationDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
