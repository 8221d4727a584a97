use std::path::{Path, PathBuf};

use glob::glob;

use crate::error::{PhotolabError, Result};

/// Expand a file filter (glob pattern) relative to a directory into a
/// sorted list of full paths.
pub fn file_paths(input_dir: &Path, files_filter: &str) -> Result<Vec<PathBuf>> {
    let pattern = input_dir.join(files_filter);
    let pattern = pattern.to_string_lossy();
    let mut paths: Vec<PathBuf> = glob(&pattern)
        .map_err(|e| PhotolabError::Pattern(e.to_string()))?
        .filter_map(|entry| entry.ok())
        .collect();
    paths.sort();
    if paths.is_empty() {
        return Err(PhotolabError::EmptyFileList);
    }
    Ok(paths)
}
