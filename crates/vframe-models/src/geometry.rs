//! Frame geometry, aspect ratios and crop rectangles.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::{ModelError, ModelResult};

/// Output crop aspect ratio, written `W:H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// 9:16, the vertical short-form format.
    pub const PORTRAIT: AspectRatio = AspectRatio::new(9, 16);

    pub const SQUARE: AspectRatio = AspectRatio::new(1, 1);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height.
    pub fn as_f64(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::PORTRAIT
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Parses `W:H` with positive integer sides, as given on the command line.
impl FromStr for AspectRatio {
    type Err = AspectRatioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(':')
            .ok_or_else(|| AspectRatioParseError::MissingSeparator(s.to_string()))?;
        let side = |part: &str| -> Result<u32, AspectRatioParseError> {
            match part.trim().parse::<u32>() {
                Ok(0) | Err(_) => Err(AspectRatioParseError::InvalidSide(part.to_string())),
                Ok(v) => Ok(v),
            }
        };
        Ok(AspectRatio::new(side(w)?, side(h)?))
    }
}

#[derive(Debug, Error)]
pub enum AspectRatioParseError {
    #[error("Aspect ratio `{0}` must be written W:H")]
    MissingSeparator(String),
    #[error("Aspect ratio side `{0}` is not a positive integer")]
    InvalidSide(String),
}

/// Source frame size and the aspect ratio of the output crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FrameGeometry {
    pub frame_width: u32,
    pub frame_height: u32,
    #[serde(default)]
    pub target_aspect: AspectRatio,
}

impl FrameGeometry {
    pub fn new(frame_width: u32, frame_height: u32, target_aspect: AspectRatio) -> Self {
        Self {
            frame_width,
            frame_height,
            target_aspect,
        }
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(ModelError::invalid_geometry(format!(
                "frame size {}x{} must be non-zero",
                self.frame_width, self.frame_height
            )));
        }
        if self.target_aspect.width == 0 || self.target_aspect.height == 0 {
            return Err(ModelError::invalid_geometry(format!(
                "target aspect {} must be non-zero",
                self.target_aspect
            )));
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.frame_width as f64
    }

    pub fn height(&self) -> f64 {
        self.frame_height as f64
    }

    /// Frame centre in source pixels.
    pub fn center(&self) -> (f64, f64) {
        (self.width() / 2.0, self.height() / 2.0)
    }

    /// Largest crop of the target aspect ratio that fits the frame (zoom 1.0).
    pub fn base_crop_size(&self) -> (f64, f64) {
        let target = self.target_aspect.as_f64();
        let frame = self.width() / self.height();

        if frame > target {
            (self.height() * target, self.height())
        } else {
            (self.width(), self.width() / target)
        }
    }

    /// Crop size at the given zoom (zoom > 1 means a tighter crop).
    pub fn crop_size(&self, zoom: f64) -> (f64, f64) {
        let (w, h) = self.base_crop_size();
        let zoom = zoom.max(1.0);
        (w / zoom, h / zoom)
    }

    /// Valid centre range `(min_x, max_x, min_y, max_y)` keeping the crop inside the frame.
    pub fn center_bounds(&self, zoom: f64) -> (f64, f64, f64, f64) {
        let (crop_w, crop_h) = self.crop_size(zoom);
        let half_w = (crop_w / 2.0).min(self.width() / 2.0);
        let half_h = (crop_h / 2.0).min(self.height() / 2.0);
        (half_w, self.width() - half_w, half_h, self.height() - half_h)
    }

    /// Clamp a centre so the crop at `zoom` stays within the frame.
    pub fn clamp_center(&self, cx: f64, cy: f64, zoom: f64) -> (f64, f64) {
        let (min_x, max_x, min_y, max_y) = self.center_bounds(zoom);
        (cx.clamp(min_x, max_x), cy.clamp(min_y, max_y))
    }

    /// Integer crop rectangle for a camera state.
    pub fn crop_rect(&self, cx: f64, cy: f64, zoom: f64) -> CropRect {
        let (crop_w, crop_h) = self.crop_size(zoom);
        let width = (crop_w.round() as i64).clamp(1, self.frame_width as i64);
        let height = (crop_h.round() as i64).clamp(1, self.frame_height as i64);
        let x = (cx - width as f64 / 2.0)
            .round()
            .clamp(0.0, (self.frame_width as i64 - width) as f64) as i64;
        let y = (cy - height as f64 / 2.0)
            .round()
            .clamp(0.0, (self.frame_height as i64 - height) as f64) as i64;

        CropRect {
            x: x as i32,
            y: y as i32,
            width: width as i32,
            height: height as i32,
        }
    }
}

/// Crop rectangle in integer source pixels, as consumed by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CropRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CropRect {
    /// Whether the rectangle lies fully inside a frame of the given size.
    pub fn fits_within(&self, frame_width: u32, frame_height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x as i64 + self.width as i64 <= frame_width as i64
            && self.y as i64 + self.height as i64 <= frame_height as i64
    }
}
