//! Pure calculation functions for the transforms.
//!
//! All functions here are pure and testable without any I/O or images:
//! dimension math for crop-to-fit resizing and the per-sample arithmetic
//! behind tone mapping, blending, unsharp masking and edge enhancement.

/// Dark anchor of the duotone ramp, `#704214`.
pub const TONE_SHADOW: [u8; 3] = [0x70, 0x42, 0x14];
/// Light anchor of the duotone ramp, `#C0A080`.
pub const TONE_HIGHLIGHT: [u8; 3] = [0xC0, 0xA0, 0x80];

/// Gaussian radius of the unsharp mask.
pub const SHARPEN_RADIUS: f32 = 2.0;
/// Minimum brightness difference the unsharp mask acts on.
pub const SHARPEN_THRESHOLD: i32 = 1;

/// Edge-enhance convolution weights, row-major 3x3.
pub const EDGE_ENHANCE_KERNEL: [i32; 9] = [-1, -1, -1, -1, 10, -1, -1, -1, -1];
/// Divisor applied to the kernel sum.
pub const EDGE_ENHANCE_SCALE: i32 = 2;

/// Target dimensions for a resize to `scale_percent` of the source.
///
/// Each edge is `round(edge * scale_percent / 100)`.
///
/// # Examples
/// ```
/// # use photo_filters::imaging::scaled_dimensions;
/// assert_eq!(scaled_dimensions((640, 480), 50), (320, 240));
/// assert_eq!(scaled_dimensions((101, 33), 50), (51, 17));
/// ```
pub fn scaled_dimensions(source: (u32, u32), scale_percent: u32) -> (u32, u32) {
    let scale = scale_percent as f64 / 100.0;
    let (w, h) = source;
    (
        (w as f64 * scale).round() as u32,
        (h as f64 * scale).round() as u32,
    )
}

/// Centered crop box `(x, y, width, height)` matching the target aspect ratio.
///
/// The box keeps the full extent of the source along one axis and trims
/// the other symmetrically, so scaling the box to `target` never stretches.
pub fn center_crop_box(source: (u32, u32), target: (u32, u32)) -> (u32, u32, u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    let (crop_w, crop_h) = if src_aspect > tgt_aspect {
        // Source is wider: keep full height, trim width
        let w = ((src_h as f64 * tgt_aspect).round() as u32).clamp(1, src_w);
        (w, src_h)
    } else if src_aspect < tgt_aspect {
        // Source is taller: keep full width, trim height
        let h = ((src_w as f64 / tgt_aspect).round() as u32).clamp(1, src_h);
        (src_w, h)
    } else {
        (src_w, src_h)
    };

    ((src_w - crop_w) / 2, (src_h - crop_h) / 2, crop_w, crop_h)
}

/// Greyscale value of an RGB sample (ITU-R 601-2, 16-bit fixed point).
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

/// Two-color lookup table from [`TONE_SHADOW`] (level 0) to
/// [`TONE_HIGHLIGHT`] (level 255).
pub fn duotone_lut() -> [[u8; 3]; 256] {
    let mut lut = [[0u8; 3]; 256];
    for (level, entry) in lut.iter_mut().enumerate() {
        for c in 0..3 {
            let dark = TONE_SHADOW[c] as i32;
            let light = TONE_HIGHLIGHT[c] as i32;
            entry[c] = (dark + level as i32 * (light - dark) / 255) as u8;
        }
    }
    lut
}

/// Linear blend `a + t * (b - a)`, rounded and clamped.
///
/// `t` is not clamped: values above 1 extrapolate past `b`, values below 0
/// extrapolate past `a`.
pub fn blend_sample(a: u8, b: u8, t: f32) -> u8 {
    let a = a as f32;
    (a + t * (b as f32 - a)).round().clamp(0.0, 255.0) as u8
}

/// Unsharp-mask amount in percent for a sharpen factor.
pub fn sharpen_percent(factor: f32) -> i32 {
    (factor * 100.0).round() as i32
}

/// One unsharp-mask sample: push `src` away from its blurred value.
pub fn unsharp_sample(src: u8, blurred: u8, percent: i32, threshold: i32) -> u8 {
    let diff = src as i32 - blurred as i32;
    if diff.abs() < threshold {
        return src;
    }
    let value = src as f32 + diff as f32 * percent as f32 / 100.0;
    value.round().clamp(0.0, 255.0) as u8
}

/// Apply [`EDGE_ENHANCE_KERNEL`] at one channel of one pixel.
///
/// `samples` is an interleaved buffer with `channels` values per pixel.
/// Out-of-bounds neighbours repeat the nearest edge pixel.
pub fn edge_enhance_sample(
    samples: &[u8],
    (width, height): (u32, u32),
    channels: usize,
    (x, y): (u32, u32),
    channel: usize,
) -> u8 {
    let mut acc = 0i32;
    for (i, weight) in EDGE_ENHANCE_KERNEL.iter().enumerate() {
        let nx = (x as i64 + (i % 3) as i64 - 1).clamp(0, width as i64 - 1) as usize;
        let ny = (y as i64 + (i / 3) as i64 - 1).clamp(0, height as i64 - 1) as usize;
        let idx = (ny * width as usize + nx) * channels + channel;
        acc += weight * samples[idx] as i32;
    }
    let value = (acc as f32 / EDGE_ENHANCE_SCALE as f32).round();
    value.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // scaled_dimensions tests
    // =========================================================================

    #[test]
    fn scaled_half() {
        assert_eq!(scaled_dimensions((800, 600), 50), (400, 300));
    }

    #[test]
    fn scaled_identity() {
        assert_eq!(scaled_dimensions((123, 457), 100), (123, 457));
    }

    #[test]
    fn scaled_double() {
        assert_eq!(scaled_dimensions((64, 48), 200), (128, 96));
    }

    #[test]
    fn scaled_rounds_to_nearest() {
        // 15 * 0.1 = 1.5 rounds up, 14 * 0.1 = 1.4 rounds down
        assert_eq!(scaled_dimensions((15, 14), 10), (2, 1));
    }

    #[test]
    fn scaled_can_collapse_to_zero() {
        assert_eq!(scaled_dimensions((4, 4), 10), (0, 0));
    }

    // =========================================================================
    // center_crop_box tests
    // =========================================================================

    #[test]
    fn crop_same_aspect_keeps_everything() {
        assert_eq!(center_crop_box((800, 600), (400, 300)), (0, 0, 800, 600));
    }

    #[test]
    fn crop_wider_source_trims_width() {
        // 800x600 into 1:1 → 600x600 box, 100px trimmed each side
        assert_eq!(center_crop_box((800, 600), (300, 300)), (100, 0, 600, 600));
    }

    #[test]
    fn crop_taller_source_trims_height() {
        assert_eq!(center_crop_box((600, 800), (300, 300)), (0, 100, 600, 600));
    }

    #[test]
    fn crop_rounding_after_scale() {
        // 101x33 at 50% → 51x17; aspect differs slightly, box stays inside source
        let (x, y, w, h) = center_crop_box((101, 33), (51, 17));
        assert!(x + w <= 101);
        assert!(y + h <= 33);
        assert_eq!(h, 33);
    }

    // =========================================================================
    // Sample arithmetic tests
    // =========================================================================

    #[test]
    fn luma_extremes() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
    }

    #[test]
    fn luma_weights_green_most() {
        assert!(luma(0, 255, 0) > luma(255, 0, 0));
        assert!(luma(255, 0, 0) > luma(0, 0, 255));
    }

    #[test]
    fn duotone_lut_endpoints_match_anchors() {
        let lut = duotone_lut();
        assert_eq!(lut[0], TONE_SHADOW);
        assert_eq!(lut[255], TONE_HIGHLIGHT);
    }

    #[test]
    fn duotone_lut_is_monotonic() {
        let lut = duotone_lut();
        for pair in lut.windows(2) {
            for c in 0..3 {
                assert!(pair[0][c] <= pair[1][c]);
            }
        }
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend_sample(10, 200, 0.0), 10);
        assert_eq!(blend_sample(10, 200, 1.0), 200);
        assert_eq!(blend_sample(0, 100, 0.5), 50);
    }

    #[test]
    fn blend_extrapolates_and_clamps() {
        // 100 + 2 * (150 - 100) = 200
        assert_eq!(blend_sample(100, 150, 2.0), 200);
        // 100 + 2 * (200 - 100) = 300 → 255
        assert_eq!(blend_sample(100, 200, 2.0), 255);
        assert_eq!(blend_sample(100, 0, 2.0), 0);
    }

    #[test]
    fn sharpen_percent_rounds() {
        assert_eq!(sharpen_percent(0.0), 0);
        assert_eq!(sharpen_percent(1.0), 100);
        assert_eq!(sharpen_percent(1.25), 125);
    }

    #[test]
    fn unsharp_below_threshold_is_unchanged() {
        assert_eq!(unsharp_sample(100, 100, 200, SHARPEN_THRESHOLD), 100);
    }

    #[test]
    fn unsharp_pushes_away_from_blur() {
        // diff = 20, 100% → +20
        assert_eq!(unsharp_sample(120, 100, 100, SHARPEN_THRESHOLD), 140);
        assert_eq!(unsharp_sample(80, 100, 100, SHARPEN_THRESHOLD), 60);
        assert_eq!(unsharp_sample(250, 100, 100, SHARPEN_THRESHOLD), 255);
    }

    #[test]
    fn edge_enhance_flat_region_is_unchanged() {
        // Kernel sums to 2, divided by 2: flat areas keep their value
        let samples = vec![77u8; 3 * 3];
        assert_eq!(edge_enhance_sample(&samples, (3, 3), 1, (1, 1), 0), 77);
        assert_eq!(edge_enhance_sample(&samples, (3, 3), 1, (0, 0), 0), 77);
    }

    #[test]
    fn edge_enhance_boosts_isolated_peak() {
        let mut samples = vec![10u8; 3 * 3];
        samples[4] = 50;
        // (10 * 50 - 8 * 10) / 2 = 210
        assert_eq!(edge_enhance_sample(&samples, (3, 3), 1, (1, 1), 0), 210);
    }

    #[test]
    fn edge_enhance_reads_requested_channel() {
        // 1x1 RGB image: every neighbour is the pixel itself
        let samples = vec![1u8, 2, 3];
        assert_eq!(edge_enhance_sample(&samples, (1, 1), 3, (0, 0), 2), 3);
    }
}
