// Batch annotation of many text files with one shared pipeline. Files are
// independent, so each runs as its own task against the same snapshot.

use anyhow::{bail, Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

use crate::annotation::AnnotationDocument;
use crate::incremental::generate_aux_file_path;
use crate::pipeline::Pipeline;
use crate::reader::{ReaderConfig, TextReader};
use crate::restart_log::{should_process_file, RestartLog};

#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub overwrite_all: bool,
    pub fail_fast: bool,
    pub use_mmap: bool,
    pub show_progress: bool,
    /// Files annotated at the same time
    pub max_concurrent: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            overwrite_all: false,
            fail_fast: false,
            use_mmap: false,
            show_progress: false,
            max_concurrent: num_cpus::get().max(1),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Success,
    Skipped,
    Failed,
}

/// Per-file processing statistics
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FileStats {
    pub path: String,
    pub chars_processed: u64,
    pub sentences_detected: u64,
    pub words: u64,
    /// Word spans without a vocabulary term
    pub unknown_words: u64,
    pub processing_time_ms: u64,
    /// Segmentation and matching time, a subset of `processing_time_ms`
    pub annotation_time_ms: u64,
    pub chars_per_sec: f64,
    pub status: FileStatus,
    pub error: Option<String>,
}

impl FileStats {
    fn empty(path: &Path, status: FileStatus, error: Option<String>) -> Self {
        Self {
            path: path.display().to_string(),
            chars_processed: 0,
            sentences_detected: 0,
            words: 0,
            unknown_words: 0,
            processing_time_ms: 0,
            annotation_time_ms: 0,
            chars_per_sec: 0.0,
            status,
            error,
        }
    }
}

/// Totals for one batch run, written as the stats JSON file
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RunStats {
    pub language: String,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub total_chars: u64,
    pub total_sentences: u64,
    pub run_time_ms: u64,
    pub files: Vec<FileStats>,
}

impl RunStats {
    pub async fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write stats file {}", path.display()))
    }
}

struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
}

impl ProgressReporter {
    fn new(enabled: bool, total_files: u64) -> Self {
        let progress_bar = enabled.then(|| {
            let pb = ProgressBar::new(total_files);
            if let Ok(style) =
                ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files {msg}")
            {
                pb.set_style(style.progress_chars("##-"));
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        Self { progress_bar }
    }

    fn file_completed(&self, path: &Path) {
        if let Some(pb) = &self.progress_bar {
            pb.set_message(format!("Annotated: {}", path.display()));
            pb.inc(1);
        }
    }

    fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message("Complete");
        }
    }
}

/// Write an annotation document, one `\n`-terminated line per sentence
pub async fn write_annotation_file(aux_path: &Path, document: &AnnotationDocument) -> Result<()> {
    let file = tokio::fs::File::create(aux_path)
        .await
        .with_context(|| format!("Failed to create {}", aux_path.display()))?;
    let mut writer = BufWriter::new(file);
    for line in document.lines() {
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }
    writer.flush().await?;
    Ok(())
}

/// Read, annotate and write the annotation file for one text
pub async fn process_file(path: &Path, pipeline: Arc<Pipeline>, reader: &TextReader) -> Result<FileStats> {
    let start = Instant::now();
    let (text, read_stats) = reader.read_text(path).await?;
    if let Some(error) = read_stats.read_error {
        return Ok(FileStats::empty(path, FileStatus::Failed, Some(error)));
    }

    let annotation_start = Instant::now();
    let (document, stats) = tokio::task::spawn_blocking(move || {
        let view = pipeline.read_text(&text);
        (view.annotation(), view.stats())
    })
    .await
    .context("Annotation task panicked")?;
    let annotation_time_ms = annotation_start.elapsed().as_millis() as u64;

    write_annotation_file(&generate_aux_file_path(path), &document).await?;

    let elapsed = start.elapsed();
    let chars = read_stats.chars_read;
    debug!(path = %path.display(), sentences = stats.sentences, "Annotated file");

    Ok(FileStats {
        path: path.display().to_string(),
        chars_processed: chars,
        sentences_detected: stats.sentences as u64,
        words: stats.words as u64,
        unknown_words: stats.unknown as u64,
        processing_time_ms: elapsed.as_millis() as u64,
        annotation_time_ms,
        chars_per_sec: if elapsed.as_secs_f64() > 0.0 {
            chars as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        },
        status: FileStatus::Success,
        error: None,
    })
}

/// Annotate every file that is not already complete, updating the restart
/// log as files finish
pub async fn process_files_parallel(
    files: &[PathBuf],
    pipeline: Arc<Pipeline>,
    config: &ProcessingConfig,
    restart_log: &mut RestartLog,
) -> Result<RunStats> {
    let run_start = Instant::now();
    let mut run = RunStats {
        language: pipeline.profile().code().to_string(),
        files_processed: 0,
        files_skipped: 0,
        files_failed: 0,
        total_chars: 0,
        total_sentences: 0,
        run_time_ms: 0,
        files: Vec::with_capacity(files.len()),
    };

    let (pending, skipped): (Vec<&PathBuf>, Vec<&PathBuf>) = files
        .iter()
        .partition(|path| should_process_file(path, restart_log, config.overwrite_all));
    for path in skipped {
        debug!("Skipping completed file: {}", path.display());
        run.files_skipped += 1;
        run.files.push(FileStats::empty(path, FileStatus::Skipped, None));
    }

    info!(
        "Annotating {} files ({} already complete) with up to {} workers",
        pending.len(),
        run.files_skipped,
        config.max_concurrent
    );

    let reader = Arc::new(TextReader::new(ReaderConfig {
        fail_fast: config.fail_fast,
        use_mmap: config.use_mmap,
    }));
    let progress = ProgressReporter::new(config.show_progress, pending.len() as u64);

    let mut results = stream::iter(pending)
        .map(|path| {
            let pipeline = Arc::clone(&pipeline);
            let reader = Arc::clone(&reader);
            async move { (path, process_file(path, pipeline, &reader).await) }
        })
        .buffer_unordered(config.max_concurrent.max(1));

    while let Some((path, result)) = results.next().await {
        progress.file_completed(path);
        let stats = match result {
            Ok(stats) => stats,
            Err(e) if config.fail_fast => {
                progress.finish();
                bail!("Failed to annotate {}: {:#}", path.display(), e);
            }
            Err(e) => FileStats::empty(path, FileStatus::Failed, Some(format!("{e:#}"))),
        };

        match stats.status {
            FileStatus::Success => {
                restart_log.mark_completed(path);
                run.files_processed += 1;
                run.total_chars += stats.chars_processed;
                run.total_sentences += stats.sentences_detected;
            }
            FileStatus::Failed if config.fail_fast => {
                progress.finish();
                bail!(
                    "Failed to annotate {}: {}",
                    path.display(),
                    stats.error.as_deref().unwrap_or("unknown error")
                );
            }
            FileStatus::Failed => {
                warn!(
                    "Failed to annotate {}: {}",
                    path.display(),
                    stats.error.as_deref().unwrap_or("unknown error")
                );
                run.files_failed += 1;
            }
            FileStatus::Skipped => run.files_skipped += 1,
        }
        run.files.push(stats);
    }
    progress.finish();

    run.files.sort_by(|a, b| a.path.cmp(&b.path));
    run.run_time_ms = run_start.elapsed().as_millis() as u64;
    info!(
        "Batch complete: {} annotated, {} skipped, {} failed in {}ms",
        run.files_processed, run.files_skipped, run.files_failed, run.run_time_ms
    );
    Ok(run)
}
