//! Per-language segmentation rules.
//!
//! A profile is described by a plain [`ProfileConfig`] (deserialized from
//! TOML) and compiled once into a [`LanguageProfile`] that caches the compiled
//! patterns. Pattern fields hold regex character-class bodies such as
//! `.!?:;` and are compiled as `[body]+`.

use regex_automata::meta::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProfileError;
use crate::sentence_splitter::abbreviations::AbbreviationChecker;

pub mod loader;

pub use loader::{get_profile, list_available_languages, ProfileRegistry, ProfileSource};

/// Default sentence delimiters for space-separated languages
pub const DEFAULT_SENTENCE_DELIMITERS: &str = ".!?:;";

/// Default word characters: any letter or combining mark
pub const DEFAULT_WORD_CHARACTERS: &str = r"\p{L}\p{M}";

/// Serializable language rules, validated by [`LanguageProfile::new`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub code: String,
    pub name: String,
    #[serde(default = "default_sentence_delimiters")]
    pub sentence_delimiters: String,
    /// Case-sensitive literals that suppress a sentence break, e.g. `Dr.`
    #[serde(default)]
    pub exceptions: Vec<String>,
    #[serde(default = "default_word_characters")]
    pub word_characters: String,
    #[serde(default)]
    pub right_to_left: bool,
    #[serde(default)]
    pub split_each_char: bool,
    #[serde(default)]
    pub remove_spaces: bool,
}

fn default_sentence_delimiters() -> String {
    DEFAULT_SENTENCE_DELIMITERS.to_string()
}

fn default_word_characters() -> String {
    DEFAULT_WORD_CHARACTERS.to_string()
}

impl ProfileConfig {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            sentence_delimiters: default_sentence_delimiters(),
            exceptions: Vec::new(),
            word_characters: default_word_characters(),
            right_to_left: false,
            split_each_char: false,
            remove_spaces: false,
        }
    }

    pub fn with_sentence_delimiters(mut self, body: &str) -> Self {
        self.sentence_delimiters = body.to_string();
        self
    }

    pub fn with_word_characters(mut self, body: &str) -> Self {
        self.word_characters = body.to_string();
        self
    }

    pub fn with_exceptions<I, S>(mut self, exceptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exceptions = exceptions.into_iter().map(Into::into).collect();
        self
    }

    pub fn right_to_left(mut self, value: bool) -> Self {
        self.right_to_left = value;
        self
    }

    pub fn split_each_char(mut self, value: bool) -> Self {
        self.split_each_char = value;
        self
    }

    pub fn remove_spaces(mut self, value: bool) -> Self {
        self.remove_spaces = value;
        self
    }
}

/// Compiled, immutable language profile shared by every pipeline stage
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    config: ProfileConfig,
    delimiter_pattern: Regex,
    word_pattern: Regex,
    exceptions: AbbreviationChecker,
}

impl LanguageProfile {
    /// Validate and compile a profile configuration
    pub fn new(config: ProfileConfig) -> Result<Self, ProfileError> {
        let delimiter_pattern =
            compile_class(&config.code, "sentence delimiter", &config.sentence_delimiters)?;
        let word_pattern = compile_class(&config.code, "word character", &config.word_characters)?;
        let exceptions = AbbreviationChecker::from_exceptions(&config.exceptions);

        debug!(
            code = %config.code,
            exceptions = config.exceptions.len(),
            "Compiled language profile"
        );

        Ok(Self {
            config,
            delimiter_pattern,
            word_pattern,
            exceptions,
        })
    }

    /// Parse and compile a profile from TOML text
    pub fn from_toml(source: &str) -> Result<Self, ProfileError> {
        let config: ProfileConfig =
            toml::from_str(source).map_err(|e| ProfileError::Parse(e.to_string()))?;
        Self::new(config)
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    pub fn code(&self) -> &str {
        &self.config.code
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn delimiter_pattern(&self) -> &Regex {
        &self.delimiter_pattern
    }

    pub fn word_pattern(&self) -> &Regex {
        &self.word_pattern
    }

    pub fn exceptions(&self) -> &AbbreviationChecker {
        &self.exceptions
    }

    /// Rendering hint only; token order is always logical source order
    pub fn is_right_to_left(&self) -> bool {
        self.config.right_to_left
    }

    pub fn splits_each_char(&self) -> bool {
        self.config.split_each_char
    }

    pub fn removes_spaces(&self) -> bool {
        self.config.remove_spaces
    }

    /// Separator used between words when building multi-word lookup keys
    pub fn word_joiner(&self) -> &'static str {
        if self.config.split_each_char || self.config.remove_spaces {
            ""
        } else {
            " "
        }
    }
}

fn compile_class(code: &str, field: &'static str, body: &str) -> Result<Regex, ProfileError> {
    let invalid = |reason: String| ProfileError::InvalidPattern {
        code: code.to_string(),
        field,
        pattern: body.to_string(),
        reason,
    };

    if body.trim().is_empty() {
        return Err(invalid("pattern is empty".to_string()));
    }

    Regex::new(&format!("[{body}]+")).map_err(|e| invalid(e.to_string()))
}
