use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use anyhow::Context;
use tracing::info;

use super::LanguageProfile;
use crate::error::ProfileError;

static BUILTIN_PROFILES: OnceLock<Result<ProfileRegistry, String>> = OnceLock::new();

macro_rules! embed_profile {
    ($code:expr, $path:expr) => {
        ($code, include_str!($path))
    };
}

/// Read access to the active profile for a language
pub trait ProfileSource {
    fn profile(&self, code: &str) -> Result<Arc<LanguageProfile>, ProfileError>;
}

/// Set of compiled profiles keyed by language code
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: HashMap<String, Arc<LanguageProfile>>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every profile shipped in `configs/languages`
    pub fn builtin() -> Result<Self, ProfileError> {
        let embedded = [
            embed_profile!("en", "../../configs/languages/english.toml"),
            embed_profile!("de", "../../configs/languages/german.toml"),
            embed_profile!("fr", "../../configs/languages/french.toml"),
            embed_profile!("ja", "../../configs/languages/japanese.toml"),
            embed_profile!("zh", "../../configs/languages/chinese.toml"),
            embed_profile!("th", "../../configs/languages/thai.toml"),
            embed_profile!("he", "../../configs/languages/hebrew.toml"),
        ];

        let mut registry = Self::new();
        for (code, toml_content) in embedded {
            let profile = LanguageProfile::from_toml(toml_content)
                .map_err(|e| ProfileError::Parse(format!("embedded {code} profile: {e}")))?;

            if profile.code() != code {
                return Err(ProfileError::Parse(format!(
                    "Profile code mismatch: expected {}, got {}",
                    code,
                    profile.code()
                )));
            }

            registry.insert(profile);
        }

        Ok(registry)
    }

    /// Load a profile file from disk, replacing any profile with the same code
    pub fn load_file(&mut self, path: &Path) -> anyhow::Result<Arc<LanguageProfile>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile {}", path.display()))?;
        let profile = LanguageProfile::from_toml(&content)
            .with_context(|| format!("Invalid profile {}", path.display()))?;
        info!(code = profile.code(), path = %path.display(), "Loaded language profile");
        Ok(self.insert(profile))
    }

    pub fn insert(&mut self, profile: LanguageProfile) -> Arc<LanguageProfile> {
        let profile = Arc::new(profile);
        self.profiles
            .insert(profile.code().to_string(), Arc::clone(&profile));
        profile
    }

    pub fn get(&self, code: &str) -> Result<Arc<LanguageProfile>, ProfileError> {
        self.profiles
            .get(code)
            .cloned()
            .ok_or_else(|| ProfileError::UnknownLanguage(code.to_string()))
    }

    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

impl ProfileSource for ProfileRegistry {
    fn profile(&self, code: &str) -> Result<Arc<LanguageProfile>, ProfileError> {
        self.get(code)
    }
}

fn builtin_registry() -> Result<&'static ProfileRegistry, ProfileError> {
    BUILTIN_PROFILES
        .get_or_init(|| ProfileRegistry::builtin().map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| ProfileError::Parse(e.clone()))
}

/// Look up one of the built-in profiles
pub fn get_profile(code: &str) -> Result<Arc<LanguageProfile>, ProfileError> {
    builtin_registry()?.get(code)
}

pub fn list_available_languages() -> Vec<&'static str> {
    builtin_registry().map(|r| r.codes()).unwrap_or_default()
}
