//! # Photo Filters
//!
//! A batch image-filter engine. A folder of photos goes in; every photo comes
//! out through the same chain of five parameterized filters: sepia tone map,
//! crop-to-fit resize, Gaussian blur, unsharp-mask sharpen and edge
//! enhancement.
//!
//! # Architecture
//!
//! One [`ParameterSet`](imaging::ParameterSet) snapshot drives two paths:
//!
//! ```text
//!                 ┌─ Batch   → clear output → one job per image (rayon) → BatchReport
//! ParameterSet ───┤
//!                 └─ Preview → first image through all five transforms → DynamicImage
//! ```
//!
//! Each job decodes one file, folds the [`FilterChain`](pipeline::FilterChain)
//! over it and encodes the result under the same file name in the output
//! folder. Jobs are isolated: a corrupt file fails its own job and nothing
//! else.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Transform math, the five pixel transforms, the `ImageBackend` trait and its `image`-crate implementation |
//! | [`pipeline`] | Builds the canonically ordered `FilterChain` from a `ParameterSet` |
//! | [`process`] | Job runner, parallel batch dispatcher, output folder clearing, progress events |
//! | [`preview`] | Full-chain render of the first input |
//! | [`engine`] | `Engine`: fixed sources and output folder, `run_batch` / `render_preview` / `spawn_batch` |
//! | [`scan`] | Input folder discovery (`.jpg`, `.jpeg`, `.png`) |
//! | [`config`] | `config.toml` loading, validation and merging over stock defaults |
//! | [`output`] | CLI output formatting for progress events and command results |
//!
//! # Design Decisions
//!
//! ## Canonical Order
//!
//! Transforms are not commutative: blurring then shrinking is not shrinking
//! then blurring. The chain always runs tone → resize → blur → sharpen →
//! edge, however the parameters were assembled.
//!
//! ## Batch Skips Identity, Preview Does Not
//!
//! A batch run only applies transforms whose parameter moved off its
//! identity value, so an untouched parameter set re-encodes the inputs
//! unchanged. The preview always applies all five, which keeps its cost
//! stable while a slider passes through an identity position.
//!
//! ## Bounded Parallelism
//!
//! Jobs run on the rayon pool, sized once at startup from
//! `processing.max_processes`. A thousand-image folder never means a
//! thousand threads.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, encoding and every transform go through the `image` crate. No
//! system libraries, no external tools.

pub mod config;
pub mod engine;
pub mod imaging;
pub mod output;
pub mod pipeline;
pub mod preview;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
