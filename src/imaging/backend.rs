//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations a filter job
//! needs: decode a file, apply one transform, encode a file.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): pure Rust, using the
//! `image` crate codecs and the [`transforms`](super::transforms) module.
//! Tests swap in a recording mock to observe which transforms ran.

use super::params::Transform;
use super::transforms::TransformError;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {}: {}", .path.display(), .message)]
    Decode { path: PathBuf, message: String },
    #[error("Failed to encode {}: {}", .path.display(), .message)]
    Encode { path: PathBuf, message: String },
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("Transform failed: {0}")]
    Transform(#[from] TransformError),
}

/// Trait for image processing backends.
///
/// Backends are shared by reference across all concurrently running jobs
/// of a batch, hence the `Sync` bound.
pub trait ImageBackend: Sync {
    /// Decode an image file.
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Apply one transform, consuming the input image.
    fn apply(&self, image: DynamicImage, transform: &Transform)
    -> Result<DynamicImage, BackendError>;

    /// Encode an image, inferring the format from the path's extension.
    fn encode(&self, image: &DynamicImage, path: &Path) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::transforms;
    use image::{Rgb, RgbImage};
    use std::sync::Mutex;

    /// Mock backend that records operations without touching the filesystem.
    ///
    /// Decoding returns a synthetic gradient; any path containing `corrupt`
    /// fails to decode. Transforms run for real so dimensions stay honest.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    pub struct MockBackend {
        pub dimensions: (u32, u32),
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Decode(String),
        Apply(Transform),
        Encode(String),
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::with_dimensions(16, 12)
        }

        pub fn with_dimensions(width: u32, height: u32) -> Self {
            Self {
                dimensions: (width, height),
                operations: Mutex::new(Vec::new()),
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        /// Transforms applied so far, in recording order.
        pub fn applied(&self) -> Vec<Transform> {
            self.get_operations()
                .into_iter()
                .filter_map(|op| match op {
                    RecordedOp::Apply(t) => Some(t),
                    _ => None,
                })
                .collect()
        }
    }

    impl ImageBackend for MockBackend {
        fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
            let name = path.to_string_lossy().to_string();
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Decode(name.clone()));

            if name.contains("corrupt") {
                return Err(BackendError::Decode {
                    path: path.to_path_buf(),
                    message: "mock corrupt file".to_string(),
                });
            }
            let (w, h) = self.dimensions;
            Ok(DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |x, y| {
                Rgb([(x * 16 % 256) as u8, (y * 16 % 256) as u8, 128])
            })))
        }

        fn apply(
            &self,
            image: DynamicImage,
            transform: &Transform,
        ) -> Result<DynamicImage, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Apply(*transform));
            Ok(transforms::apply(image, transform)?)
        }

        fn encode(&self, _image: &DynamicImage, path: &Path) -> Result<(), BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Encode(path.to_string_lossy().to_string()));
            Ok(())
        }
    }

    #[test]
    fn mock_records_decode() {
        let backend = MockBackend::with_dimensions(8, 6);

        let img = backend.decode(Path::new("/test/image.jpg")).unwrap();
        assert_eq!((img.width(), img.height()), (8, 6));

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Decode(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_fails_corrupt_paths() {
        let backend = MockBackend::new();
        let result = backend.decode(Path::new("/test/corrupt.png"));
        assert!(matches!(result, Err(BackendError::Decode { .. })));
    }

    #[test]
    fn mock_records_apply() {
        let backend = MockBackend::with_dimensions(10, 10);
        let img = backend.decode(Path::new("/a.png")).unwrap();

        let out = backend
            .apply(img, &Transform::Resize { scale_percent: 50 })
            .unwrap();
        assert_eq!((out.width(), out.height()), (5, 5));
        assert_eq!(
            backend.applied(),
            vec![Transform::Resize { scale_percent: 50 }]
        );
    }

    #[test]
    fn transform_error_converts_to_backend_error() {
        let backend = MockBackend::with_dimensions(2, 2);
        let img = backend.decode(Path::new("/a.png")).unwrap();

        let result = backend.apply(img, &Transform::Resize { scale_percent: 10 });
        assert!(matches!(result, Err(BackendError::Transform(_))));
    }

    #[test]
    fn decode_error_message_names_path() {
        let err = BackendError::Decode {
            path: PathBuf::from("/in/bad.jpg"),
            message: "truncated".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to decode /in/bad.jpg: truncated");
    }
}
