use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const HTML_SUFFIX: &str = ".html";

/// Recursively collect `*.html` files under `root`, deduplicated and sorted by
/// path string. The position in the returned list is the document index.
pub fn discover_html_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("source folder {} does not exist or is not a directory", root.display());
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        if entry.file_type().is_file() && entry.path().to_string_lossy().ends_with(HTML_SUFFIX) {
            files.push(entry.into_path());
        }
    }

    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    files.dedup();
    Ok(files)
}

/// `path` relative to `root` with `/` separators.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
