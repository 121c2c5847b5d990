use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::matcher::CLOZE_PLACEHOLDER;

/// User-tunable engine scalars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// How many similar terms to suggest; zero or negative disables suggestions
    pub similar_terms_count: i64,
    /// Minimum similarity score for a suggestion
    pub min_similarity: f64,
    /// Replacement text for cloze sentences
    pub placeholder: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            similar_terms_count: 5,
            min_similarity: 0.3,
            placeholder: CLOZE_PLACEHOLDER.to_string(),
        }
    }
}

impl EngineSettings {
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).context("Invalid engine settings")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn suggestions_enabled(&self) -> bool {
        self.similar_terms_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.similar_terms_count, 5);
        assert!((settings.min_similarity - 0.3).abs() < f64::EPSILON);
        assert!(settings.suggestions_enabled());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = EngineSettings::from_toml("similar_terms_count = 0").unwrap();
        assert!(!settings.suggestions_enabled());
        assert_eq!(settings.placeholder, CLOZE_PLACEHOLDER);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(EngineSettings::from_toml("min_similarity = \"high\"").is_err());
    }
}
