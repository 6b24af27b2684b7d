//! Shared test utilities for the photo-filters test suite.
//!
//! Synthetic images are built in memory so no binary fixtures are needed.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! create_test_jpeg(&tmp.path().join("a.jpg"), 64, 48);
//! assert_eq!(list_files(tmp.path()), vec!["a.jpg"]);
//! ```

use image::{
    DynamicImage, GrayImage, ImageEncoder, Luma, Rgb, RgbImage, Rgba, RgbaImage,
};
use std::path::Path;

// =========================================================================
// In-memory images
// =========================================================================

/// RGB gradient with some structure in every channel.
pub fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) * 37 % 256) as u8,
        ])
    }))
}

/// Greyscale gradient with a checker overlay so blurs have edges to soften.
pub fn gradient_gray(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| {
        let base = (x * 200 / width.max(1)) as u8;
        Luma([if (x / 4 + y / 4) % 2 == 0 { base } else { base.saturating_add(55) }])
    }))
}

/// RGBA gradient with a varying alpha channel.
pub fn gradient_rgba(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x * y) % 256) as u8,
            (255 - (x + y) % 128) as u8,
        ])
    }))
}

// =========================================================================
// Files on disk
// =========================================================================

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Create a small valid RGB PNG file with the given dimensions.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    gradient_rgb(width, height)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

/// File names directly inside `dir`, sorted. Directories are skipped.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
