//! Input folder discovery.
//!
//! The source list of a run is every supported image file directly inside
//! the input folder. Subdirectories are not descended into, and hidden
//! files (leading `.`) are skipped.
//!
//! ```text
//! input_images_folder/
//! ├── 001-dawn.jpg      ✓
//! ├── portrait.JPEG     ✓  extension match ignores case
//! ├── scan.png          ✓
//! ├── notes.txt         ✗  unsupported extension
//! ├── .cover.jpg        ✗  hidden
//! └── archive/          ✗  not descended into
//! ```
//!
//! The list is sorted by file name so runs are reproducible and the
//! preview always shows the same image.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Input folder not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extensions accepted as input, lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// True for a regular file with a supported extension.
pub fn is_supported_image(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let hidden = path
        .file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('.'));
    if hidden {
        return false;
    }
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// List the supported images directly inside `dir`, sorted by file name.
pub fn scan_input_folder(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.exists() {
        return Err(ScanError::NotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }

    let mut images: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| is_supported_image(p))
        .collect();
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    tracing::debug!("found {} image(s) in {}", images.len(), dir.display());
    Ok(images)
}
