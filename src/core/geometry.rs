use serde::{Deserialize, Serialize};

use crate::error::{Result, TaxsegError};

/// US-Letter page size in points.
pub const LETTER_WIDTH_PT: f32 = 612.0;
pub const LETTER_HEIGHT_PT: f32 = 792.0;

/// Rectangle in PDF points with the origin at the page's top-left corner.
///
/// The default is the top-left corner box where IRS forms print their form
/// identifier. The size was tuned by hand on real returns; reading the full
/// page would also pick up references to other forms in the body text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClipRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for ClipRegion {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 150.0,
            height: 70.0,
        }
    }
}

impl ClipRegion {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn x1(&self) -> f32 {
        self.x + self.width
    }

    pub fn y1(&self) -> f32 {
        self.y + self.height
    }

    pub fn validate(&self) -> Result<()> {
        if ![self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
        {
            // NaN slips through every ordered comparison below.
            return Err(TaxsegError::InvalidConfig(format!(
                "clip region must be finite, got ({}, {}) {}x{}",
                self.x, self.y, self.width, self.height
            )));
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(TaxsegError::InvalidConfig(format!(
                "clip region must have positive size, got {}x{}",
                self.width, self.height
            )));
        }
        if self.x < 0.0 || self.y < 0.0 {
            return Err(TaxsegError::InvalidConfig(format!(
                "clip region origin must not be negative, got ({}, {})",
                self.x, self.y
            )));
        }
        Ok(())
    }

    /// Integer pixel box for poppler at 72 dpi, where one pixel is one point.
    /// The box is widened outward so no part of the region is lost.
    pub fn to_pixel_box(&self) -> (u32, u32, u32, u32) {
        let x = self.x.floor() as u32;
        let y = self.y.floor() as u32;
        let w = (self.x1().ceil() as u32).saturating_sub(x).max(1);
        let h = (self.y1().ceil() as u32).saturating_sub(y).max(1);
        (x, y, w, h)
    }
}
