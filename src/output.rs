//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every image is shown by its positional index and file name, with paths
//! and errors as indented context lines below it:
//!
//! ```text
//! Cleared 3 files from output_images_folder
//! Processing 4 images
//!     Filters: tone(0.50) → resize(50%)
//!     001 dawn.jpg
//!         Saved: output_images_folder/dawn.jpg
//!     002 broken.png
//!         Error: decode failed: Failed to decode input/broken.png: ...
//! Processing complete! 3 saved, 1 failed
//! ```
//!
//! Progress lines arrive in completion order, so indices may appear out of
//! sequence.
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::pipeline::FilterChain;
use crate::process::ProcessEvent;
use std::path::{Path, PathBuf};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name_of(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn join_steps<S: AsRef<str>>(steps: &[S]) -> String {
    if steps.is_empty() {
        "none".to_string()
    } else {
        steps
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

/// One-line description of a chain, e.g. `tone(0.50) → blur(1.00)`.
pub fn format_chain(chain: &FilterChain) -> String {
    let steps: Vec<String> = chain.steps().iter().map(ToString::to_string).collect();
    join_steps(&steps)
}

// ============================================================================
// Batch progress
// ============================================================================

/// Format a single batch progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::OutputCleared { removed, failed } => {
            let mut lines = vec![format!("Cleared {} from output", plural(*removed, "file"))];
            if *failed > 0 {
                lines.push(format!(
                    "{}{} could not be removed",
                    indent(1),
                    plural(*failed, "file")
                ));
            }
            lines
        }
        ProcessEvent::BatchStarted { image_count, steps } => vec![
            format!("Processing {}", plural(*image_count, "image")),
            format!("{}Filters: {}", indent(1), join_steps(steps)),
        ],
        ProcessEvent::ImageProcessed {
            index,
            source_path,
            output_path,
        } => vec![
            format!("{}{} {}", indent(1), format_index(*index), file_name_of(source_path)),
            format!("{}Saved: {}", indent(2), output_path),
        ],
        ProcessEvent::ImageFailed {
            index,
            source_path,
            error,
        } => vec![
            format!("{}{} {}", indent(1), format_index(*index), file_name_of(source_path)),
            format!("{}Error: {}", indent(2), error),
        ],
        ProcessEvent::BatchFinished { succeeded, failed } => vec![format!(
            "Processing complete! {} saved, {} failed",
            succeeded, failed
        )],
    }
}

// ============================================================================
// Check command
// ============================================================================

/// Format the list of inputs a run would process.
///
/// ```text
/// Input: input_images_folder
///     001 a.jpg
///     002 b.png
/// 2 images, preview: a.jpg
/// ```
pub fn format_check_output(input_dir: &Path, sources: &[PathBuf]) -> Vec<String> {
    let mut lines = vec![format!("Input: {}", input_dir.display())];
    for (i, source) in sources.iter().enumerate() {
        lines.push(format!(
            "{}{} {}",
            indent(1),
            format_index(i + 1),
            file_name_of(&source.to_string_lossy())
        ));
    }
    match sources.first() {
        Some(first) => lines.push(format!(
            "{}, preview: {}",
            plural(sources.len(), "image"),
            file_name_of(&first.to_string_lossy())
        )),
        None => lines.push("No images found".to_string()),
    }
    lines
}

/// Print check output to stdout.
pub fn print_check_output(input_dir: &Path, sources: &[PathBuf]) {
    for line in format_check_output(input_dir, sources) {
        println!("{}", line);
    }
}

// ============================================================================
// Preview
// ============================================================================

/// A preview render that was saved to disk.
pub struct PreviewSummary<'a> {
    /// Input image the preview was rendered from.
    pub source: &'a Path,
    /// Where the preview was written.
    pub saved_to: &'a Path,
    pub dimensions: (u32, u32),
    /// The Preview-mode chain that produced it.
    pub chain: &'a FilterChain,
}

/// Format the result of a preview render.
///
/// ```text
/// Preview of dawn.jpg → preview.png (64x48)
///     Filters: tone(0.00) → resize(100%) → blur(0.00) → sharpen(0.00) → edge(0.00)
/// ```
pub fn format_preview_output(preview: Option<&PreviewSummary<'_>>) -> Vec<String> {
    match preview {
        Some(preview) => {
            let (w, h) = preview.dimensions;
            vec![
                format!(
                    "Preview of {} → {} ({}x{})",
                    file_name_of(&preview.source.to_string_lossy()),
                    preview.saved_to.display(),
                    w,
                    h
                ),
                format!("{}Filters: {}", indent(1), format_chain(preview.chain)),
            ]
        }
        None => vec!["No images to preview".to_string()],
    }
}

/// Print preview output to stdout.
pub fn print_preview_output(preview: Option<&PreviewSummary<'_>>) {
    for line in format_preview_output(preview) {
        println!("{}", line);
    }
}
