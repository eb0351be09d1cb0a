//! The `region` path segment: which part of the source image to work on.
//!
//! ```text
//! full            whole image
//! square          centered square, side = shorter dimension
//! 10,20,300,400   x,y,w,h in pixels
//! pct:10,5,50,50  x,y,w,h as percentages of the image size
//! ```
//!
//! Resolving a region against real image dimensions is
//! [`crop_region`](crate::imaging::crop_region)'s job; this module only knows
//! syntax and image-independent validity.

use super::parse_decimal;

/// The cropping rectangle a client asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Region {
    /// The segment could not be parsed.
    None,
    Full,
    Square,
    Pixel { x: f64, y: f64, w: f64, h: f64 },
    Percent { x: f64, y: f64, w: f64, h: f64 },
}

impl Region {
    /// Parse a region segment. Anything outside the grammar becomes
    /// [`Region::None`].
    pub fn parse(segment: &str) -> Self {
        match segment {
            "full" => return Region::Full,
            "square" => return Region::Square,
            _ => {}
        }

        let (percent, coords) = match segment.strip_prefix("pct:") {
            Some(rest) => (true, rest),
            None => (false, segment),
        };

        let values: Option<Vec<f64>> = coords.split(',').map(parse_decimal).collect();
        let [x, y, w, h] = match values.as_deref() {
            Some(&[x, y, w, h]) => [x, y, w, h],
            _ => return Region::None,
        };

        if percent {
            Region::Percent { x, y, w, h }
        } else {
            Region::Pixel { x, y, w, h }
        }
    }

    /// General validity, independent of any particular image.
    ///
    /// Percent regions must also stay inside the 0–100 range on both axes.
    pub fn valid(&self) -> bool {
        match *self {
            Region::None => false,
            Region::Full | Region::Square => true,
            Region::Pixel { x, y, w, h } => w > 0.0 && h > 0.0 && x >= 0.0 && y >= 0.0,
            Region::Percent { x, y, w, h } => {
                w > 0.0 && h > 0.0 && x >= 0.0 && y >= 0.0 && x + w <= 100.0 && y + h <= 100.0
            }
        }
    }
}
