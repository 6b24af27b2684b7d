//! Pure Rust image processing backend, no system libraries.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` (pure Rust decoders) |
//! | Transforms | [`transforms`](super::transforms) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at the configured quality |
//! | Encode → other formats | `image::DynamicImage::save_with_format` |

use super::backend::{BackendError, ImageBackend};
use super::params::{Quality, Transform};
use super::transforms;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageFormat, ImageReader, ImageResult};
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend {
    quality: Quality,
}

impl RustBackend {
    pub fn new() -> Self {
        Self::with_quality(Quality::default())
    }

    /// Backend that writes JPEG output at `quality`.
    pub fn with_quality(quality: Quality) -> Self {
        Self { quality }
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| BackendError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Output format for `path`, inferred from its extension.
fn output_format(path: &Path) -> Result<ImageFormat, BackendError> {
    ImageFormat::from_path(path).map_err(|_| {
        BackendError::UnsupportedFormat(
            path.extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        )
    })
}

/// Save a DynamicImage to the given path in `format`.
///
/// The file is only touched once the format is known. If encoding fails
/// after the file was created, the partial file is removed.
fn save_image(
    img: &DynamicImage,
    path: &Path,
    format: ImageFormat,
    quality: Quality,
) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let mut writer = std::io::BufWriter::new(file);
    let result = match format {
        ImageFormat::Jpeg => write_jpeg(img, &mut writer, quality),
        other => img.write_to(&mut writer, other),
    }
    .map_err(|e| BackendError::Encode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
    .and_then(|()| writer.flush().map_err(BackendError::Io));

    if result.is_err() {
        drop(writer);
        let _ = std::fs::remove_file(path);
    }
    result
}

/// Encode as JPEG. JPEG has no alpha and no 16-bit mode, so anything
/// beyond L8/Rgb8 is flattened to Rgb8 first.
fn write_jpeg<W: Write>(img: &DynamicImage, writer: W, quality: Quality) -> ImageResult<()> {
    let img = match img.color() {
        ColorType::L8 | ColorType::Rgb8 => Cow::Borrowed(img),
        _ => Cow::Owned(DynamicImage::ImageRgb8(img.to_rgb8())),
    };
    let encoder = JpegEncoder::new_with_quality(writer, quality.value() as u8);
    img.write_with_encoder(encoder)
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        load_image(path)
    }

    fn apply(
        &self,
        image: DynamicImage,
        transform: &Transform,
    ) -> Result<DynamicImage, BackendError> {
        Ok(transforms::apply(image, transform)?)
    }

    fn encode(&self, image: &DynamicImage, path: &Path) -> Result<(), BackendError> {
        let format = output_format(path)?;
        save_image(image, path, format, self.quality)
    }
}
