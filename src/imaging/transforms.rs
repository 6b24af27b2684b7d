//! The five filter transforms.
//!
//! Each transform consumes an image and returns a new one. None of them
//! touch shared state, so they are safe to run concurrently on distinct
//! images. Every transform returns its input untouched at its identity
//! value; otherwise pixel math works on 8-bit channels:
//!
//! | Transform | Implementation |
//! |---|---|
//! | Tone map | ITU-R 601 luma → duotone LUT → blend with original |
//! | Resize | centered crop to target aspect, then Catmull-Rom `resize_exact` |
//! | Blur | `image::DynamicImage::blur` (separable Gaussian) |
//! | Sharpen | unsharp mask over a radius-2 Gaussian |
//! | Edge enhance | 3x3 edge kernel → unclamped blend with original |
//!
//! Luma8, LumaA8, Rgb8 and Rgba8 images keep their color type; 16-bit and
//! float images are reduced to Rgb8/Rgba8 before per-sample math. Alpha
//! channels pass through unchanged.

use super::calculations::{
    SHARPEN_RADIUS, SHARPEN_THRESHOLD, blend_sample, center_crop_box, duotone_lut,
    edge_enhance_sample, luma, scaled_dimensions, sharpen_percent, unsharp_sample,
};
use super::params::Transform;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("image has no pixels")]
    EmptyImage,
    #[error("{scale_percent}% of {width}x{height} collapses to {target_width}x{target_height}")]
    DegenerateSize {
        width: u32,
        height: u32,
        scale_percent: u32,
        target_width: u32,
        target_height: u32,
    },
    #[error("unsupported color mode {0:?}")]
    UnsupportedColor(ColorType),
    #[error("sample buffer does not match {0}x{1}")]
    BufferSize(u32, u32),
}

/// Result type for transforms.
pub type Result<T> = std::result::Result<T, TransformError>;

/// Run one transform.
pub fn apply(image: DynamicImage, transform: &Transform) -> Result<DynamicImage> {
    match *transform {
        Transform::ToneMap { intensity } => tone_map(image, intensity),
        Transform::Resize { scale_percent } => resize(image, scale_percent),
        Transform::Blur { radius } => blur(image, radius),
        Transform::Sharpen { factor } => sharpen(image, factor),
        Transform::EdgeEnhance { factor } => edge_enhance(image, factor),
    }
}

/// Blend a sepia duotone render over the image at `intensity`.
///
/// The result is RGB, or RGBA when the source has alpha.
pub fn tone_map(image: DynamicImage, intensity: f32) -> Result<DynamicImage> {
    if intensity == 0.0 {
        return Ok(image);
    }
    let source = if image.color().has_alpha() {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    };
    let (color, width, height) = (source.color(), source.width(), source.height());
    let channels = color.channel_count() as usize;

    let lut = duotone_lut();
    let mut samples = source.into_bytes();
    for px in samples.chunks_exact_mut(channels) {
        let tone = lut[luma(px[0], px[1], px[2]) as usize];
        for c in 0..3 {
            px[c] = blend_sample(px[c], tone[c], intensity);
        }
    }
    from_samples(color, width, height, samples)
}

/// Crop-to-fit resize to `scale_percent` of the current size.
pub fn resize(image: DynamicImage, scale_percent: u32) -> Result<DynamicImage> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(TransformError::EmptyImage);
    }
    let (target_width, target_height) = scaled_dimensions((width, height), scale_percent);
    if (target_width, target_height) == (width, height) {
        return Ok(image);
    }
    if target_width == 0 || target_height == 0 {
        return Err(TransformError::DegenerateSize {
            width,
            height,
            scale_percent,
            target_width,
            target_height,
        });
    }

    let (x, y, crop_w, crop_h) = center_crop_box((width, height), (target_width, target_height));
    let cropped = if (crop_w, crop_h) == (width, height) {
        image
    } else {
        image.crop_imm(x, y, crop_w, crop_h)
    };
    Ok(cropped.resize_exact(target_width, target_height, FilterType::CatmullRom))
}

/// Gaussian blur with sigma `radius`.
pub fn blur(image: DynamicImage, radius: f32) -> Result<DynamicImage> {
    if radius <= 0.0 {
        return Ok(image);
    }
    Ok(image.blur(radius))
}

/// Unsharp mask at `round(factor * 100)` percent.
pub fn sharpen(image: DynamicImage, factor: f32) -> Result<DynamicImage> {
    let percent = sharpen_percent(factor);
    if percent == 0 {
        return Ok(image);
    }
    let source = to_8bit(image);
    let (color, width, height) = (source.color(), source.width(), source.height());
    let blurred = source.blur(SHARPEN_RADIUS);

    let channels = color.channel_count() as usize;
    let alpha = color.has_alpha();
    let mut samples = source.into_bytes();
    for (i, (sample, soft)) in samples.iter_mut().zip(blurred.as_bytes()).enumerate() {
        if alpha && i % channels == channels - 1 {
            continue;
        }
        *sample = unsharp_sample(*sample, *soft, percent, SHARPEN_THRESHOLD);
    }
    from_samples(color, width, height, samples)
}

/// Blend the edge-enhanced image over the original at `factor`.
///
/// `factor` is not clamped: above 1 the result overshoots the enhanced image.
pub fn edge_enhance(image: DynamicImage, factor: f32) -> Result<DynamicImage> {
    if factor == 0.0 {
        return Ok(image);
    }
    let source = to_8bit(image);
    let (color, width, height) = (source.color(), source.width(), source.height());
    if width == 0 || height == 0 {
        return Err(TransformError::EmptyImage);
    }

    let channels = color.channel_count() as usize;
    let color_channels = if color.has_alpha() {
        channels - 1
    } else {
        channels
    };
    let original = source.as_bytes();
    let mut samples = original.to_vec();
    for y in 0..height {
        for x in 0..width {
            let base = (y as usize * width as usize + x as usize) * channels;
            for c in 0..color_channels {
                let enhanced =
                    edge_enhance_sample(original, (width, height), channels, (x, y), c);
                samples[base + c] = blend_sample(original[base + c], enhanced, factor);
            }
        }
    }
    from_samples(color, width, height, samples)
}

/// Reduce an image to one of the four 8-bit layouts the per-sample
/// transforms work on.
fn to_8bit(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => image,
        other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

/// Rebuild an 8-bit image of `color` from interleaved samples.
fn from_samples(
    color: ColorType,
    width: u32,
    height: u32,
    samples: Vec<u8>,
) -> Result<DynamicImage> {
    let image = match color {
        ColorType::L8 => GrayImage::from_raw(width, height, samples).map(DynamicImage::ImageLuma8),
        ColorType::La8 => {
            GrayAlphaImage::from_raw(width, height, samples).map(DynamicImage::ImageLumaA8)
        }
        ColorType::Rgb8 => RgbImage::from_raw(width, height, samples).map(DynamicImage::ImageRgb8),
        ColorType::Rgba8 => {
            RgbaImage::from_raw(width, height, samples).map(DynamicImage::ImageRgba8)
        }
        other => return Err(TransformError::UnsupportedColor(other)),
    };
    image.ok_or(TransformError::BufferSize(width, height))
}
