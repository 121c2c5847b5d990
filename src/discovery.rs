use anyhow::{anyhow, Result};
use futures::stream::{self, Stream, StreamExt};
use glob::glob;
use ignore::{WalkBuilder, WalkState};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// File extension of input texts
pub const TEXT_EXTENSION: &str = "txt";

#[derive(Debug, Clone, Default)]
pub struct DiscoveryConfig {
    /// Stop at the first inaccessible file instead of reporting it
    pub fail_fast: bool,
}

/// A discovered text file and any problem found while checking it
#[derive(Debug, Clone)]
pub struct FileValidation {
    pub path: PathBuf,
    pub error: Option<String>,
}

impl FileValidation {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

fn is_text_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == TEXT_EXTENSION)
}

/// Stream every `*.txt` file under `root_dir`, walking serially with glob
pub fn discover_files(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> impl Stream<Item = Result<FileValidation>> {
    let pattern = format!("{}/**/*.{TEXT_EXTENSION}", root_dir.as_ref().display());
    debug!("Starting file discovery with pattern: {}", pattern);

    let paths = match glob(&pattern) {
        Ok(paths) => Some(paths),
        Err(e) => {
            warn!("Invalid discovery pattern {}: {}", pattern, e);
            None
        }
    };
    let pattern_error = paths.is_none().then(|| anyhow!("Failed to create glob pattern: {pattern}"));

    stream::unfold(
        (paths, pattern_error, config),
        |(mut paths, mut pattern_error, config)| async move {
            if let Some(e) = pattern_error.take() {
                return Some((Err(e), (None, None, config)));
            }
            loop {
                let next = paths.as_mut()?.next()?;
                match next {
                    Ok(path) => {
                        let validation = validate_file(path, &config).await;
                        return Some((validation, (paths, None, config)));
                    }
                    Err(e) if config.fail_fast => {
                        return Some((Err(anyhow!("Glob iteration error: {e}")), (None, None, config)));
                    }
                    Err(e) => warn!("Glob iteration error (continuing): {}", e),
                }
            }
        },
    )
}

/// Stream every `*.txt` file under `root_dir` using a parallel walker.
/// Files are streamed as soon as they are found, in no particular order.
pub fn discover_files_parallel(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> impl Stream<Item = Result<FileValidation>> {
    let root_path = root_dir.as_ref().to_path_buf();
    let config = Arc::new(config);
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        info!("Starting directory traversal in: {}", root_path.display());
        let traversal_start = std::time::Instant::now();

        // Walker threads take half the cores, annotation workers the rest
        let walker = WalkBuilder::new(&root_path)
            .threads((num_cpus::get() / 2).max(1))
            .follow_links(false)
            .hidden(false)
            .ignore(false)
            .git_ignore(false)
            .build_parallel();

        let (found_tx, found_rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            walker.run(|| {
                let found_tx = found_tx.clone();
                Box::new(move |entry| {
                    if let Ok(entry) = entry {
                        if entry.file_type().is_some_and(|ft| ft.is_file()) && is_text_file(entry.path()) {
                            debug!("Found text file: {}", entry.path().display());
                            if found_tx.send(entry.path().to_path_buf()).is_err() {
                                return WalkState::Quit;
                            }
                        }
                    }
                    WalkState::Continue
                })
            });
        });

        let mut file_count = 0;
        while let Ok(path) = found_rx.recv() {
            file_count += 1;
            let validation = validate_file(path, &config).await;
            let stop = validation.is_err();
            if tx.send(validation).is_err() {
                debug!("Receiver dropped, stopping discovery");
                break;
            }
            if stop {
                break;
            }
        }

        info!(
            "Discovery completed in {:.2}ms, streamed {} files",
            traversal_start.elapsed().as_millis(),
            file_count
        );
    });

    stream::unfold(rx, |mut receiver| async move {
        receiver.recv().await.map(|result| (result, receiver))
    })
}

/// Check that a discovered path is a readable regular file. Only fails in
/// fail-fast mode; otherwise the problem is recorded on the validation.
async fn validate_file(path: PathBuf, config: &DiscoveryConfig) -> Result<FileValidation> {
    let error = match fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => None,
        Ok(_) => Some(format!("Path is not a file: {}", path.display())),
        Err(e) => {
            let error = format!("Cannot access file {}: {}", path.display(), e);
            if config.fail_fast {
                return Err(anyhow!(error));
            }
            Some(error)
        }
    };

    if let Some(error) = &error {
        warn!("{}", error);
    }
    Ok(FileValidation { path, error })
}

async fn collect(stream: impl Stream<Item = Result<FileValidation>>, label: &str) -> Result<Vec<FileValidation>> {
    let mut stream = Box::pin(stream);
    let mut files = Vec::new();
    while let Some(result) = stream.next().await {
        files.push(result?);
    }

    let invalid_count = files.iter().filter(|f| !f.is_valid()).count();
    if invalid_count > 0 {
        warn!("Found {} files with validation issues", invalid_count);
    }
    info!(
        "{} discovery summary: {} valid, {} invalid",
        label,
        files.len() - invalid_count,
        invalid_count
    );
    Ok(files)
}

pub async fn collect_discovered_files(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> Result<Vec<FileValidation>> {
    collect(discover_files(root_dir, config), "Serial").await
}

pub async fn collect_discovered_files_parallel(
    root_dir: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> Result<Vec<FileValidation>> {
    let mut files = collect(discover_files_parallel(root_dir, config), "Parallel").await?;
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Paths of all valid text files under `root_dir`
pub async fn find_text_files<P: AsRef<Path>>(root_dir: P) -> Result<Vec<PathBuf>> {
    let validations = collect_discovered_files(root_dir, DiscoveryConfig::default()).await?;
    Ok(validations
        .into_iter()
        .filter(FileValidation::is_valid)
        .map(|v| v.path)
        .collect())
}
