//! Orthographic similarity between vocabulary entries.
//!
//! Scores are Dice coefficients over letter bigrams, computed per word so that
//! pairs never straddle a space.

use std::cmp::Ordering;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::settings::EngineSettings;
use crate::vocabulary::{Term, TermId, TermRepository};

/// Overlapping two-character substrings; empty for strings shorter than 2
pub fn letter_pairs(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    chars.windows(2).map(|pair| pair.iter().collect()).collect()
}

/// Deduplicated union of the letter pairs of each whitespace-separated word
pub fn word_letter_pairs(s: &str) -> Vec<String> {
    let mut pairs: Vec<String> = Vec::new();
    for word in s.split_whitespace() {
        for pair in letter_pairs(word) {
            if !pairs.contains(&pair) {
                pairs.push(pair);
            }
        }
    }
    pairs
}

/// Dice coefficient of the word letter pairs of `a` and `b`, in `[0, 1]`.
/// Case-sensitive; 0 when either side has no pairs.
pub fn similarity(a: &str, b: &str) -> f64 {
    let pairs_a = word_letter_pairs(a);
    let mut pool = word_letter_pairs(b);
    if pairs_a.is_empty() || pool.is_empty() {
        return 0.0;
    }

    let total = pairs_a.len() + pool.len();
    let mut matches = 0usize;
    for pair in &pairs_a {
        if let Some(i) = pool.iter().position(|candidate| candidate == pair) {
            pool.swap_remove(i);
            matches += 1;
        }
    }

    (2 * matches) as f64 / total as f64
}

/// Ids of the terms of `language` most similar to `candidate`
pub fn rank_similar_terms(
    terms: &[Term],
    language: &str,
    candidate: &str,
    max_count: i64,
    min_score: f64,
) -> Vec<TermId> {
    let Ok(max_count) = usize::try_from(max_count) else {
        return Vec::new();
    };
    if max_count == 0 {
        return Vec::new();
    }

    let candidate = candidate.to_lowercase();
    let mut scored: Vec<(f64, TermId)> = terms
        .iter()
        .filter(|term| term.language == language && term.text_lc != candidate)
        .map(|term| (similarity(&candidate, &term.text_lc), term.id))
        .filter(|(score, _)| *score >= min_score)
        .collect();

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.cmp(&b.1))
    });
    scored.truncate(max_count);
    scored.into_iter().map(|(_, id)| id).collect()
}

/// "Did you mean" suggestions backed by a term repository
pub struct SimilarityRanker {
    repository: Arc<dyn TermRepository>,
    settings: EngineSettings,
}

impl SimilarityRanker {
    pub fn new(repository: Arc<dyn TermRepository>, settings: EngineSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// Suggested terms for `candidate`, best first
    pub fn suggest(&self, language: &str, candidate: &str) -> Result<Vec<Term>> {
        if !self.settings.suggestions_enabled() {
            return Ok(Vec::new());
        }

        let terms = self.repository.find_by_language(language)?;
        let ranked = rank_similar_terms(
            &terms,
            language,
            candidate,
            self.settings.similar_terms_count,
            self.settings.min_similarity,
        );
        debug!(language, candidate, pool = terms.len(), found = ranked.len(), "Ranked similar terms");

        Ok(ranked
            .into_iter()
            .filter_map(|id| terms.iter().find(|t| t.id == id).cloned())
            .collect())
    }
}
