pub mod render;
pub mod suites;

use std::path::{Path, PathBuf};

use anyhow::{Result, ensure};
use walkdir::WalkDir;

/// Expand files and directories into the list of report files to load.
/// Directories are scanned recursively for `*.json`; the result is
/// sorted so document order doesn't depend on filesystem iteration.
pub fn collect_report_files(reports: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in reports {
        if path.is_dir() {
            for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
                if entry.file_type().is_file() && has_json_extension(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else {
            ensure!(path.is_file(), "report file not found: {}", path.display());
            files.push(path.clone());
        }
    }
    files.sort();
    ensure!(!files.is_empty(), "no report files found");
    Ok(files)
}

fn has_json_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}
