// Helpers for the per-file annotation outputs written next to each input text.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Suffix appended to the input file stem for its annotation document
pub const AUX_FILE_SUFFIX: &str = "_annotation.tsv";

/// `dir/story.txt` → `dir/story_annotation.tsv`
pub fn generate_aux_file_path(source_path: &Path) -> PathBuf {
    let file_stem = source_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    source_path.with_file_name(format!("{file_stem}{AUX_FILE_SUFFIX}"))
}

pub fn aux_file_exists<P: AsRef<Path>>(source_path: P) -> bool {
    generate_aux_file_path(source_path.as_ref()).exists()
}

/// Read the annotation document written for `source_path`
pub fn read_aux_file<P: AsRef<Path>>(source_path: P) -> Result<String, io::Error> {
    fs::read_to_string(generate_aux_file_path(source_path.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_aux_path_naming() {
        let path = Path::new("/texts/de/story.txt");
        assert_eq!(
            generate_aux_file_path(path),
            PathBuf::from("/texts/de/story_annotation.tsv")
        );
    }

    #[test]
    fn test_read_aux_file() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("story.txt");
        assert!(!aux_file_exists(&source));

        fs::write(generate_aux_file_path(&source), "Once||\n").unwrap();
        assert!(aux_file_exists(&source));
        assert_eq!(read_aux_file(&source).unwrap(), "Once||\n");
    }
}
