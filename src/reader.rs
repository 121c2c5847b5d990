use anyhow::{anyhow, Context, Result};
use memmap2::Mmap;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
    /// Return an error instead of an empty text with `read_error` set
    pub fail_fast: bool,
    /// Read through a memory map instead of async buffered I/O
    pub use_mmap: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ReadStats {
    pub file_path: String,
    pub bytes_read: u64,
    pub chars_read: u64,
    pub duration_ms: u64,
    pub read_error: Option<String>,
}

/// Reads whole input texts. Line endings are kept so sentence spans map
/// back onto the file byte for byte.
pub struct TextReader {
    config: ReaderConfig,
}

impl TextReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub async fn read_text<P: AsRef<Path>>(&self, file_path: P) -> Result<(String, ReadStats)> {
        let path = file_path.as_ref();
        let start_time = std::time::Instant::now();
        debug!("Starting read of file: {}", path.display());

        let result = if self.config.use_mmap {
            read_file_mmap(path)
        } else {
            read_file_async(path).await
        };

        let mut stats = ReadStats {
            file_path: path.display().to_string(),
            ..ReadStats::default()
        };

        match result {
            Ok(text) => {
                stats.bytes_read = text.len() as u64;
                stats.chars_read = text.chars().count() as u64;
                stats.duration_ms = start_time.elapsed().as_millis() as u64;
                info!(
                    "Read {}: {} bytes, {} chars in {}ms",
                    path.display(),
                    stats.bytes_read,
                    stats.chars_read,
                    stats.duration_ms
                );
                Ok((text, stats))
            }
            Err(e) if self.config.fail_fast => Err(e),
            Err(e) => {
                let error_msg = format!("{e:#}");
                warn!("{}", error_msg);
                stats.duration_ms = start_time.elapsed().as_millis() as u64;
                stats.read_error = Some(error_msg);
                Ok((String::new(), stats))
            }
        }
    }

}

/// Read a UTF-8 text file with tokio
pub async fn read_file_async<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let path = file_path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to open file {}", path.display()))?;
    String::from_utf8(bytes).map_err(|e| anyhow!("UTF-8 decoding error in {}: {}", path.display(), e))
}

/// Read a UTF-8 text file through a memory map
pub fn read_file_mmap<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let path = file_path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("Failed to open file {}", path.display()))?;
    if file.metadata()?.len() == 0 {
        return Ok(String::new());
    }
    // SAFETY: the map is only read while the file is open and copied out
    // before it is dropped; concurrent truncation is not supported.
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to map file {}", path.display()))?;
    let text = std::str::from_utf8(&mmap)
        .map_err(|e| anyhow!("UTF-8 decoding error in {}: {}", path.display(), e))?;
    Ok(text.to_string())
}
