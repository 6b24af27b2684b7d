//! Filter chain construction.
//!
//! [`build_chain`] turns a [`ParameterSet`] snapshot into a [`FilterChain`]:
//! an immutable, canonically ordered list of transforms. The same snapshot
//! feeds both the batch path and the preview path; they differ only in which
//! transforms they keep.
//!
//! ```text
//! ParameterSet ─┬─ BuildMode::Batch   → non-identity transforms only
//!               └─ BuildMode::Preview → all five, always
//! ```
//!
//! Skipping identity transforms on the batch path avoids pointless work on
//! the write path. The preview keeps all five so it tracks slider motion
//! through identity positions too.

use crate::imaging::{BackendError, ImageBackend, ParameterSet, Transform};
use image::DynamicImage;
use thiserror::Error;

/// Which path a chain is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Skip transforms whose parameter is at its identity value.
    Batch,
    /// Include every transform unconditionally.
    Preview,
}

/// A transform step that failed while folding a chain.
#[derive(Error, Debug)]
#[error("step {index} ({transform}) failed: {source}")]
pub struct StepError {
    /// Zero-based position in the chain.
    pub index: usize,
    pub transform: Transform,
    pub source: BackendError,
}

/// Ordered, immutable sequence of transforms.
///
/// Steps are always kept in canonical order
/// (tone-map → resize → blur → sharpen → edge-enhance), whatever order they
/// were supplied in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChain {
    steps: Vec<Transform>,
}

impl FilterChain {
    /// Build a chain from arbitrary steps, sorted into canonical order.
    pub fn from_steps(steps: impl IntoIterator<Item = Transform>) -> Self {
        let mut steps: Vec<Transform> = steps.into_iter().collect();
        steps.sort_by_key(Transform::rank);
        Self { steps }
    }

    pub fn steps(&self) -> &[Transform] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Fold the chain over `image`, left to right.
    ///
    /// Each step consumes the previous step's output.
    pub fn apply(
        &self,
        backend: &impl ImageBackend,
        image: DynamicImage,
    ) -> Result<DynamicImage, StepError> {
        self.steps
            .iter()
            .enumerate()
            .try_fold(image, |img, (index, transform)| {
                backend
                    .apply(img, transform)
                    .map_err(|source| StepError {
                        index,
                        transform: *transform,
                        source,
                    })
            })
    }
}

/// Build the filter chain for `params`.
pub fn build_chain(params: &ParameterSet, mode: BuildMode) -> FilterChain {
    let steps = params.transforms().into_iter().filter(|t| match mode {
        BuildMode::Batch => !t.is_identity(),
        BuildMode::Preview => true,
    });
    FilterChain::from_steps(steps)
}
