//! Vocabulary records and point-in-time snapshots.
//!
//! Terms live in an external store reached through [`TermRepository`]. The
//! matcher never reads the store directly; callers build a
//! [`VocabularySnapshot`] once per pass and share it behind an `Arc`.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use unicode_segmentation::UnicodeSegmentation;

use crate::profile::LanguageProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId(pub u64);

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Learning status of a term
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum TermStatus {
    Level1,
    Level2,
    Level3,
    Level4,
    Level5,
    Ignored,
    WellKnown,
}

impl TermStatus {
    pub const IGNORED_CODE: u16 = 98;
    pub const WELL_KNOWN_CODE: u16 = 99;

    pub fn code(self) -> u16 {
        match self {
            TermStatus::Level1 => 1,
            TermStatus::Level2 => 2,
            TermStatus::Level3 => 3,
            TermStatus::Level4 => 4,
            TermStatus::Level5 => 5,
            TermStatus::Ignored => Self::IGNORED_CODE,
            TermStatus::WellKnown => Self::WELL_KNOWN_CODE,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(TermStatus::Level1),
            2 => Some(TermStatus::Level2),
            3 => Some(TermStatus::Level3),
            4 => Some(TermStatus::Level4),
            5 => Some(TermStatus::Level5),
            Self::IGNORED_CODE => Some(TermStatus::Ignored),
            Self::WELL_KNOWN_CODE => Some(TermStatus::WellKnown),
            _ => None,
        }
    }

    /// Check this status against an encoded range such as `15` or `599`
    pub fn in_range(self, range_code: u32) -> bool {
        crate::matcher::status_in_range(self.code(), range_code)
    }
}

impl TryFrom<u16> for TermStatus {
    type Error = String;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        TermStatus::from_code(code).ok_or_else(|| format!("invalid term status {code}"))
    }
}

impl From<TermStatus> for u16 {
    fn from(status: TermStatus) -> Self {
        status.code()
    }
}

/// A vocabulary entry as consumed by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub id: TermId,
    pub language: String,
    pub text: String,
    /// Lowercase comparison form; derived from `text` when absent
    #[serde(default)]
    pub text_lc: String,
    /// Number of words the term spans; derived when absent
    #[serde(default)]
    pub word_count: usize,
    pub status: TermStatus,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub romanization: String,
}

impl Term {
    pub fn new(id: u64, language: &str, text: &str, status: TermStatus) -> Self {
        Self {
            id: TermId(id),
            language: language.to_string(),
            text: text.to_string(),
            text_lc: text.to_lowercase(),
            word_count: text.split_whitespace().count().max(1),
            status,
            translation: String::new(),
            romanization: String::new(),
        }
    }

    pub fn with_translation(mut self, translation: &str) -> Self {
        self.translation = translation.to_string();
        self
    }

    pub fn with_romanization(mut self, romanization: &str) -> Self {
        self.romanization = romanization.to_string();
        self
    }

    /// Override the word count, needed for terms in unspaced scripts
    pub fn with_word_count(mut self, word_count: usize) -> Self {
        self.word_count = word_count.max(1);
        self
    }

    /// Fill derived fields left empty by a deserialized record
    pub fn normalized(mut self) -> Self {
        if self.text_lc.is_empty() {
            self.text_lc = self.text.to_lowercase();
        }
        if self.word_count == 0 {
            self.word_count = self.text.split_whitespace().count().max(1);
        }
        self
    }
}

/// Field edits produced by decoding an annotation document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermUpdate {
    pub id: TermId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub romanization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TermStatus>,
}

/// Persistence collaborator for terms
pub trait TermRepository: Send + Sync {
    fn find_by_language(&self, language: &str) -> Result<Vec<Term>>;

    /// Terms of `language` whose lowercase text is one of `texts_lc`
    fn find_by_text(&self, language: &str, texts_lc: &[String]) -> Result<Vec<Term>>;

    /// Apply a batch of updates, returning how many terms changed
    fn apply_updates(&self, updates: &[TermUpdate]) -> Result<usize>;
}

/// Term store held in memory, used by the CLI and tests
#[derive(Debug, Default)]
pub struct InMemoryTermRepository {
    terms: RwLock<Vec<Term>>,
}

impl InMemoryTermRepository {
    pub fn new(terms: Vec<Term>) -> Self {
        Self {
            terms: RwLock::new(terms.into_iter().map(Term::normalized).collect()),
        }
    }

    /// Load a JSON array of terms
    pub fn from_json(json: &str) -> Result<Self> {
        let terms: Vec<Term> = serde_json::from_str(json)?;
        info!(terms = terms.len(), "Loaded vocabulary");
        Ok(Self::new(terms))
    }

    pub fn to_json(&self) -> Result<String> {
        let terms = self.read()?;
        Ok(serde_json::to_string_pretty(&*terms)?)
    }

    pub fn len(&self) -> usize {
        self.terms.read().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Term>>> {
        match self.terms.read() {
            Ok(guard) => Ok(guard),
            Err(_) => bail!("term store lock poisoned"),
        }
    }
}

impl TermRepository for InMemoryTermRepository {
    fn find_by_language(&self, language: &str) -> Result<Vec<Term>> {
        Ok(self
            .read()?
            .iter()
            .filter(|t| t.language == language)
            .cloned()
            .collect())
    }

    fn find_by_text(&self, language: &str, texts_lc: &[String]) -> Result<Vec<Term>> {
        Ok(self
            .read()?
            .iter()
            .filter(|t| t.language == language && texts_lc.contains(&t.text_lc))
            .cloned()
            .collect())
    }

    fn apply_updates(&self, updates: &[TermUpdate]) -> Result<usize> {
        let mut terms = match self.terms.write() {
            Ok(guard) => guard,
            Err(_) => bail!("term store lock poisoned"),
        };

        let mut changed = 0;
        for update in updates {
            let Some(term) = terms.iter_mut().find(|t| t.id == update.id) else {
                bail!("term {} does not exist", update.id);
            };
            let before = term.clone();
            if let Some(translation) = &update.translation {
                term.translation.clone_from(translation);
            }
            if let Some(romanization) = &update.romanization {
                term.romanization.clone_from(romanization);
            }
            if let Some(status) = update.status {
                term.status = status;
            }
            if *term != before {
                changed += 1;
            }
        }

        debug!(updates = updates.len(), changed, "Applied term updates");
        Ok(changed)
    }
}

/// Immutable lookup table from lookup key to candidate terms
#[derive(Debug, Clone, Default)]
pub struct VocabularySnapshot {
    /// Candidates per key, ordered by the tie-break rule
    entries: HashMap<String, Vec<Term>>,
    max_word_count: usize,
    joiner: String,
}

impl VocabularySnapshot {
    /// Build a snapshot; `joiner` separates words inside lookup keys
    pub fn new(terms: impl IntoIterator<Item = Term>, joiner: &str) -> Self {
        let mut entries: HashMap<String, Vec<Term>> = HashMap::new();
        let mut max_word_count = 0;

        for term in terms.into_iter().map(Term::normalized) {
            let key = lookup_key(term.text_lc.split_whitespace(), joiner);
            // Unspaced keys can span as many tokens as they have graphemes
            let span_bound = if joiner.is_empty() {
                term.word_count.max(key.graphemes(true).count())
            } else {
                term.word_count
            };
            max_word_count = max_word_count.max(span_bound);
            entries.entry(key).or_default().push(term);
        }

        for candidates in entries.values_mut() {
            candidates.sort_by(|a, b| {
                a.word_count
                    .cmp(&b.word_count)
                    .then_with(|| a.text.cmp(&b.text))
                    .then_with(|| a.id.cmp(&b.id))
            });
        }

        Self {
            entries,
            max_word_count,
            joiner: joiner.to_string(),
        }
    }

    /// Build a snapshot using the profile's word joiner
    pub fn for_profile(terms: impl IntoIterator<Item = Term>, profile: &LanguageProfile) -> Self {
        Self::new(terms, profile.word_joiner())
    }

    /// Load every term of the profile's language from a repository
    pub fn from_repository(repository: &dyn TermRepository, profile: &LanguageProfile) -> Result<Self> {
        let terms = repository.find_by_language(profile.code())?;
        let snapshot = Self::for_profile(terms, profile);
        info!(
            language = profile.code(),
            keys = snapshot.entries.len(),
            max_word_count = snapshot.max_word_count,
            "Built vocabulary snapshot"
        );
        Ok(snapshot)
    }

    /// Term bound to `key` with exactly `word_count` words, after tie-break.
    /// Unspaced keys do not encode word boundaries, so with an empty joiner
    /// any candidate for the key matches whatever the token count.
    pub fn lookup(&self, key: &str, word_count: usize) -> Option<&Term> {
        let candidates = self.entries.get(key)?;
        if self.joiner.is_empty() {
            return candidates.first();
        }
        candidates.iter().find(|t| t.word_count == word_count)
    }

    /// Hex digest over every term's id, text, status, translation and
    /// romanization, stable across runs
    pub fn fingerprint(&self) -> String {
        let mut terms: Vec<&Term> = self.entries.values().flatten().collect();
        terms.sort_by_key(|t| t.id);

        let mut hasher = Sha256::new();
        for term in terms {
            hasher.update(term.id.0.to_le_bytes());
            for field in [&term.text, &term.translation, &term.romanization] {
                hasher.update(field.as_bytes());
                hasher.update([0u8]);
            }
            hasher.update(term.status.code().to_le_bytes());
            hasher.update((term.word_count as u64).to_le_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    /// Longest word count of any term, at least 1
    pub fn max_word_count(&self) -> usize {
        self.max_word_count.max(1)
    }

    pub fn joiner(&self) -> &str {
        &self.joiner
    }

    /// Number of distinct lookup keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Join lowercase word forms into a lookup key
pub fn lookup_key<'a>(words: impl Iterator<Item = &'a str>, joiner: &str) -> String {
    let mut key = String::new();
    for (i, word) in words.enumerate() {
        if i > 0 {
            key.push_str(joiner);
        }
        key.push_str(word);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(TermStatus::from_code(98), Some(TermStatus::Ignored));
        assert_eq!(TermStatus::from_code(6), None);
        assert_eq!(TermStatus::WellKnown.code(), 99);
        assert!(TermStatus::Level3.in_range(15));
        assert!(TermStatus::WellKnown.in_range(599));
    }

    #[test]
    fn test_term_json_fills_derived_fields() {
        let json = r#"[{"id": 7, "language": "en", "text": "Look Up", "status": 2}]"#;
        let repo = InMemoryTermRepository::from_json(json).unwrap();
        let terms = repo.find_by_language("en").unwrap();
        assert_eq!(terms[0].text_lc, "look up");
        assert_eq!(terms[0].word_count, 2);
        assert_eq!(terms[0].status, TermStatus::Level2);
    }

    #[test]
    fn test_invalid_status_is_rejected() {
        let json = r#"[{"id": 1, "language": "en", "text": "x", "status": 7}]"#;
        assert!(InMemoryTermRepository::from_json(json).is_err());
    }

    #[test]
    fn test_snapshot_tie_break() {
        let snapshot = VocabularySnapshot::new(
            vec![
                Term::new(5, "en", "apple", TermStatus::Level1),
                Term::new(3, "en", "Apple", TermStatus::Level2),
                Term::new(2, "en", "apple", TermStatus::Level3),
            ],
            " ",
        );
        // "Apple" < "apple" in byte order
        assert_eq!(snapshot.lookup("apple", 1).unwrap().id, TermId(3));
        assert!(snapshot.lookup("apple", 2).is_none());
    }

    #[test]
    fn test_snapshot_tie_break_by_id() {
        let snapshot = VocabularySnapshot::new(
            vec![
                Term::new(9, "en", "pear", TermStatus::Level1),
                Term::new(4, "en", "pear", TermStatus::Level2),
            ],
            " ",
        );
        assert_eq!(snapshot.lookup("pear", 1).unwrap().id, TermId(4));
    }

    #[test]
    fn test_snapshot_unspaced_keys() {
        let snapshot = VocabularySnapshot::new(
            vec![Term::new(1, "ja", "日本", TermStatus::Level1).with_word_count(2)],
            "",
        );
        assert_eq!(snapshot.max_word_count(), 2);
        assert!(snapshot.lookup("日本", 2).is_some());
    }

    #[test]
    fn test_unspaced_term_without_word_count() {
        let json = r#"[{"id": 1, "language": "zh", "text": "喜欢", "status": 3}]"#;
        let repo = InMemoryTermRepository::from_json(json).unwrap();
        let snapshot = VocabularySnapshot::new(repo.find_by_language("zh").unwrap(), "");

        assert_eq!(snapshot.max_word_count(), 2);
        // One imported token or two split characters
        assert_eq!(snapshot.lookup("喜欢", 1).unwrap().id, TermId(1));
        assert_eq!(snapshot.lookup("喜欢", 2).unwrap().id, TermId(1));
    }

    #[test]
    fn test_fingerprint_tracks_term_edits() {
        let terms = vec![
            Term::new(1, "en", "cat", TermStatus::Level1),
            Term::new(2, "en", "dog", TermStatus::Level2),
        ];
        let base = VocabularySnapshot::new(terms.clone(), " ");
        let reordered = VocabularySnapshot::new(terms.iter().rev().cloned(), " ");
        assert_eq!(base.fingerprint(), reordered.fingerprint());

        let mut edited = terms.clone();
        edited[0].translation = "Katze".to_string();
        assert_ne!(base.fingerprint(), VocabularySnapshot::new(edited, " ").fingerprint());

        let mut promoted = terms;
        promoted[1].status = TermStatus::WellKnown;
        assert_ne!(base.fingerprint(), VocabularySnapshot::new(promoted, " ").fingerprint());
    }

    #[test]
    fn test_repository_updates() {
        let repo = InMemoryTermRepository::new(vec![Term::new(1, "en", "cat", TermStatus::Level1)]);
        let changed = repo
            .apply_updates(&[TermUpdate {
                id: TermId(1),
                translation: Some("Katze".to_string()),
                romanization: None,
                status: Some(TermStatus::Level4),
            }])
            .unwrap();
        assert_eq!(changed, 1);

        let term = &repo.find_by_text("en", &["cat".to_string()]).unwrap()[0];
        assert_eq!(term.translation, "Katze");
        assert_eq!(term.status, TermStatus::Level4);

        let missing = repo.apply_updates(&[TermUpdate {
            id: TermId(42),
            translation: None,
            romanization: None,
            status: None,
        }]);
        assert!(missing.is_err());
    }
}
