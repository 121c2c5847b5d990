use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;
use tracing::{info, warn};

use crate::incremental::generate_aux_file_path;

pub const RESTART_LOG_NAME: &str = ".glossa_restart.json";

/// Files already annotated in earlier runs over the same root
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct RestartLog {
    /// Language the recorded annotations were produced with
    #[serde(default)]
    language: Option<String>,
    /// Fingerprint of the vocabulary snapshot used for those annotations
    #[serde(default)]
    vocabulary: Option<String>,
    completed_files: BTreeSet<String>,
    last_updated: u64,
}

/// Summary of a restart log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartStats {
    pub completed_files: usize,
    pub last_updated: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

impl RestartLog {
    /// Load the log for `root_dir`; missing or unreadable logs start empty
    pub async fn load(root_dir: &Path) -> Self {
        let log_path = Self::log_path(root_dir);
        match fs::read_to_string(&log_path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring corrupt restart log {}: {}", log_path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Load the log and discard it when it was written for another language
    /// or another vocabulary
    pub async fn load_for_run(root_dir: &Path, language: &str, vocabulary: &str) -> Self {
        let mut log = Self::load(root_dir).await;
        if log.language.as_deref().is_some_and(|previous| previous != language) {
            info!(
                previous = log.language.as_deref().unwrap_or_default(),
                language, "Language changed, discarding restart log"
            );
            log.clear();
        } else if log.vocabulary.as_deref().is_some_and(|previous| previous != vocabulary) {
            info!(language, "Vocabulary changed, discarding restart log");
            log.clear();
        }
        log.language = Some(language.to_string());
        log.vocabulary = Some(vocabulary.to_string());
        log
    }

    pub async fn save(&self, root_dir: &Path) -> Result<()> {
        let log_path = Self::log_path(root_dir);
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&log_path, content)
            .await
            .with_context(|| format!("Failed to write restart log {}", log_path.display()))?;
        Ok(())
    }

    pub fn is_completed(&self, file_path: &Path) -> bool {
        self.completed_files
            .contains(file_path.to_string_lossy().as_ref())
    }

    pub fn mark_completed(&mut self, file_path: &Path) {
        self.completed_files
            .insert(file_path.to_string_lossy().to_string());
        self.last_updated = now_secs();
    }

    pub fn completed_files(&self) -> Vec<PathBuf> {
        self.completed_files.iter().map(PathBuf::from).collect()
    }

    pub fn completed_count(&self) -> usize {
        self.completed_files.len()
    }

    pub fn clear(&mut self) {
        self.completed_files.clear();
        self.last_updated = now_secs();
    }

    fn log_path(root_dir: &Path) -> PathBuf {
        root_dir.join(RESTART_LOG_NAME)
    }

    /// Drop entries whose source or annotation file has disappeared and
    /// return them
    pub async fn verify_completed_files(&mut self) -> Vec<PathBuf> {
        let mut invalid_files = Vec::new();
        let mut valid_files = BTreeSet::new();

        for file_path_str in &self.completed_files {
            let file_path = PathBuf::from(file_path_str);
            let source_ok = fs::try_exists(&file_path).await.unwrap_or(false);
            let aux_ok = fs::try_exists(generate_aux_file_path(&file_path))
                .await
                .unwrap_or(false);
            if source_ok && aux_ok {
                valid_files.insert(file_path_str.clone());
            } else {
                invalid_files.push(file_path);
            }
        }

        self.completed_files = valid_files;
        invalid_files
    }

    pub fn stats(&self) -> RestartStats {
        RestartStats {
            completed_files: self.completed_files.len(),
            last_updated: self.last_updated,
        }
    }
}

/// Decide whether a file needs (re)annotation
pub fn should_process_file(file_path: &Path, restart_log: &RestartLog, overwrite_all: bool) -> bool {
    if overwrite_all {
        return true;
    }
    !(restart_log.is_completed(file_path) && generate_aux_file_path(file_path).exists())
}
