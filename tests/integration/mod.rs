// Shared helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glossa::{get_profile, InMemoryTermRepository, LanguageProfile, Pipeline};
use tempfile::TempDir;

/// Temporary directory tree of input texts
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();
        Self { temp_dir, root_path }
    }

    /// Write a text file below the root, creating parent directories
    pub fn create_text_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    pub fn write_vocabulary(&self, json: &str) -> PathBuf {
        self.create_text_file("vocabulary.json", json)
    }
}

pub fn english() -> Arc<LanguageProfile> {
    get_profile("en").expect("English profile should be built in")
}

/// Pipeline over the built-in profile for `language` and a JSON vocabulary
pub fn pipeline_for(language: &str, vocabulary_json: &str) -> (Pipeline, InMemoryTermRepository) {
    let profile = get_profile(language).expect("profile should be built in");
    let repository = InMemoryTermRepository::from_json(vocabulary_json).expect("vocabulary should parse");
    let pipeline = Pipeline::from_repository(profile, &repository).expect("snapshot should build");
    (pipeline, repository)
}
