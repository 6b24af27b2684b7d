//! Preview rendering.
//!
//! The preview is the first source image run through the **full** chain:
//! every transform is applied, identity or not. It never touches the output
//! folder, and a failing preview never affects batch runs.

use crate::imaging::{BackendError, ImageBackend, ParameterSet};
use crate::pipeline::{BuildMode, StepError, build_chain};
use image::DynamicImage;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("preview decode failed: {0}")]
    Decode(#[source] BackendError),
    #[error("preview transform failed: {0}")]
    Transform(#[from] StepError),
}

/// Render `params` applied to a fresh decode of `sources[0]`.
///
/// Returns `Ok(None)` when there are no sources.
pub fn render_preview(
    backend: &impl ImageBackend,
    sources: &[PathBuf],
    params: &ParameterSet,
) -> Result<Option<DynamicImage>, PreviewError> {
    let Some(first) = sources.first() else {
        return Ok(None);
    };

    let chain = build_chain(params, BuildMode::Preview);
    tracing::debug!("rendering preview of {}", first.display());
    let image = backend.decode(first).map_err(PreviewError::Decode)?;
    Ok(Some(chain.apply(backend, image)?))
}
