//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image` crate codecs, format from file extension |
//! | **Tone map** | ITU-R 601 luma + `#704214`→`#C0A080` duotone LUT |
//! | **Resize** | center crop + `resize_exact` (Catmull-Rom) |
//! | **Blur** | `DynamicImage::blur` |
//! | **Sharpen** | unsharp mask (radius 2, threshold 1) |
//! | **Edge enhance** | 3x3 kernel + unclamped blend |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and sample math (unit testable)
//! - **Parameters**: [`ParameterSet`] and [`Transform`] value types
//! - **Transforms**: The five pixel transforms
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;
pub mod transforms;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{TONE_HIGHLIGHT, TONE_SHADOW, center_crop_box, scaled_dimensions};
pub use params::{
    BLUR_RANGE, EDGE_RANGE, ParameterSet, Quality, RESIZE_RANGE, SHARPEN_RANGE, TONE_RANGE,
    Transform,
};
pub use rust_backend::RustBackend;
pub use transforms::TransformError;
