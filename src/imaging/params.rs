//! Parameter types for the filter pipeline.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the control surface (which owns slider or flag values),
//! the [`pipeline`](crate::pipeline) builder (which decides which transforms
//! run), and the [`backend`](super::backend) (which does the pixel work).
//!
//! ## Types
//!
//! - [`ParameterSet`]: The five control values. `Copy`, so every build reads
//!   one consistent snapshot.
//! - [`Transform`]: One transform identifier paired with its parameter.
//! - [`Quality`]: Lossy encoding quality (1-100, default 90). Clamped on construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Valid range of [`ParameterSet::tone`].
pub const TONE_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Valid range of [`ParameterSet::resize`], in percent.
pub const RESIZE_RANGE: RangeInclusive<u32> = 10..=200;
/// Valid range of [`ParameterSet::blur`].
pub const BLUR_RANGE: RangeInclusive<f32> = 0.0..=2.0;
/// Valid range of [`ParameterSet::sharpen`].
pub const SHARPEN_RANGE: RangeInclusive<f32> = 0.0..=2.0;
/// Valid range of [`ParameterSet::edge`].
pub const EDGE_RANGE: RangeInclusive<f32> = 0.0..=2.0;

/// The five filter control values.
///
/// The default is the identity value of every transform, so a default
/// parameter set leaves images untouched. Ranges are enforced by the
/// controls that produce a parameter set (CLI flags, config validation),
/// never by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterSet {
    /// Duotone blend ratio, 0 = original.
    pub tone: f32,
    /// Scale in percent, 100 = original size.
    pub resize: u32,
    /// Gaussian blur radius, 0 = no blur.
    pub blur: f32,
    /// Unsharp-mask strength, 1.0 = 100% amount.
    pub sharpen: f32,
    /// Edge-enhance blend ratio, 0 = original, above 1 extrapolates.
    pub edge: f32,
}

impl ParameterSet {
    /// Identity values of every transform.
    pub const IDENTITY: Self = Self {
        tone: 0.0,
        resize: 100,
        blur: 0.0,
        sharpen: 0.0,
        edge: 0.0,
    };

    /// All five transforms in canonical order:
    /// tone-map → resize → blur → sharpen → edge-enhance.
    pub fn transforms(&self) -> [Transform; 5] {
        [
            Transform::ToneMap {
                intensity: self.tone,
            },
            Transform::Resize {
                scale_percent: self.resize,
            },
            Transform::Blur { radius: self.blur },
            Transform::Sharpen {
                factor: self.sharpen,
            },
            Transform::EdgeEnhance { factor: self.edge },
        ]
    }

    /// Name of the first value outside its valid range, if any.
    pub fn out_of_range(&self) -> Option<&'static str> {
        if !TONE_RANGE.contains(&self.tone) {
            Some("tone")
        } else if !RESIZE_RANGE.contains(&self.resize) {
            Some("resize")
        } else if !BLUR_RANGE.contains(&self.blur) {
            Some("blur")
        } else if !SHARPEN_RANGE.contains(&self.sharpen) {
            Some("sharpen")
        } else if !EDGE_RANGE.contains(&self.edge) {
            Some("edge")
        } else {
            None
        }
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A transform identifier paired with its parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Sepia duotone blended with the original at `intensity`.
    ToneMap { intensity: f32 },
    /// Crop-to-fit resize to `scale_percent` of the source size.
    Resize { scale_percent: u32 },
    /// Separable Gaussian blur.
    Blur { radius: f32 },
    /// Unsharp mask, radius 2, threshold 1, amount `round(factor * 100)`%.
    Sharpen { factor: f32 },
    /// Edge-enhance kernel blended with the original at `factor`.
    EdgeEnhance { factor: f32 },
}

impl Transform {
    /// Position in the canonical chain order.
    pub fn rank(&self) -> usize {
        match self {
            Transform::ToneMap { .. } => 0,
            Transform::Resize { .. } => 1,
            Transform::Blur { .. } => 2,
            Transform::Sharpen { .. } => 3,
            Transform::EdgeEnhance { .. } => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transform::ToneMap { .. } => "tone",
            Transform::Resize { .. } => "resize",
            Transform::Blur { .. } => "blur",
            Transform::Sharpen { .. } => "sharpen",
            Transform::EdgeEnhance { .. } => "edge",
        }
    }

    /// Whether the parameter equals the transform's identity value.
    pub fn is_identity(&self) -> bool {
        match *self {
            Transform::ToneMap { intensity } => intensity == 0.0,
            Transform::Resize { scale_percent } => scale_percent == 100,
            Transform::Blur { radius } => radius == 0.0,
            Transform::Sharpen { factor } => factor == 0.0,
            Transform::EdgeEnhance { factor } => factor == 0.0,
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Transform::ToneMap { intensity } => write!(f, "tone({intensity:.2})"),
            Transform::Resize { scale_percent } => write!(f, "resize({scale_percent}%)"),
            Transform::Blur { radius } => write!(f, "blur({radius:.2})"),
            Transform::Sharpen { factor } => write!(f, "sharpen({factor:.2})"),
            Transform::EdgeEnhance { factor } => write!(f, "edge({factor:.2})"),
        }
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}
