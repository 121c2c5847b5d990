//! Error types for the glossa engine.
//!
//! Segmentation, tokenization, matching and ranking cannot fail; the closed
//! sets below cover profile loading, annotation decoding and imported token
//! streams. Batch and CLI code wraps these in `anyhow::Error`.

use thiserror::Error;

/// Failures while decoding a (possibly hand-edited) annotation document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    /// The document as a whole cannot be split into per-sentence lines
    #[error("annotation document could not be parsed: {reason}")]
    ParseAnnotationFailed { reason: String },

    /// One line could not be parsed into whole column groups
    #[error("annotation line {line} could not be parsed: {reason}")]
    ParseLineFailed {
        /// 1-based line index
        line: usize,
        reason: String,
    },

    /// Requested line index is not in `1..=available`
    #[error("annotation line {requested} is out of range (document has {available} sentences)")]
    LineOutOfRange { requested: usize, available: usize },

    /// A column group was attached to a separator (punctuation) token
    #[error("annotation group is attached to punctuation at token position {position}")]
    PunctuationTerm {
        /// Token position within the sentence
        position: usize,
    },

    /// A column group carried fewer than surface + translation
    #[error("annotation group has {found} column(s), at least 2 are required")]
    InsufficientColumns { found: usize },
}

/// Failures while building a language profile
#[derive(Error, Debug)]
pub enum ProfileError {
    /// A rule pattern failed to compile
    #[error("invalid {field} pattern '{pattern}' for language '{code}': {reason}")]
    InvalidPattern {
        code: String,
        field: &'static str,
        pattern: String,
        reason: String,
    },

    /// No profile is registered for the code
    #[error("language '{0}' has no profile")]
    UnknownLanguage(String),

    /// Profile source text is not valid TOML for a profile
    #[error("failed to parse profile: {0}")]
    Parse(String),
}

/// Failures while importing token streams produced by external tokenizers
#[derive(Error, Debug)]
pub enum ExternalFormatError {
    #[error("external parse result is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A token could not be located in any remaining sentence text
    #[error("token '{token}' does not occur in sentence {sentence} or later")]
    Misaligned { token: String, sentence: usize },
}
