//! The `size` path segment: how the cropped region is scaled.
//!
//! | Segment  | Variant | Aspect ratio |
//! |----------|---------|--------------|
//! | `full`   | [`Size::Full`] | kept (no scaling) |
//! | `max`    | [`Size::Max`] | kept, bounded by server limits |
//! | `w,`     | [`Size::ScaleToWidth`] | kept |
//! | `,h`     | [`Size::ScaleToHeight`] | kept |
//! | `pct:n`  | [`Size::ScalePercent`] | kept |
//! | `w,h`    | [`Size::Exact`] | distorted |
//! | `!w,h`   | [`Size::BestFit`] | kept, fits inside w×h |

use super::{parse_decimal, parse_dimension};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Size {
    /// The segment could not be parsed.
    None,
    Full,
    Max,
    ScaleToWidth { w: u32 },
    ScaleToHeight { h: u32 },
    ScalePercent { pct: f64 },
    Exact { w: u32, h: u32 },
    BestFit { w: u32, h: u32 },
}

impl Size {
    pub fn parse(segment: &str) -> Self {
        match segment {
            "full" => return Size::Full,
            "max" => return Size::Max,
            _ => {}
        }

        if let Some(pct) = segment.strip_prefix("pct:") {
            return match parse_decimal(pct) {
                Some(pct) => Size::ScalePercent { pct },
                None => Size::None,
            };
        }

        let (best_fit, dims) = match segment.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, segment),
        };

        let Some((w, h)) = dims.split_once(',') else {
            return Size::None;
        };
        if h.contains(',') {
            return Size::None;
        }

        // An empty side means "derive from the aspect ratio"; it reads as 0
        // so best-fit requests missing a side fail validation.
        let side = |s: &str| if s.is_empty() { Some(0) } else { parse_dimension(s) };
        let (Some(wv), Some(hv)) = (side(w), side(h)) else {
            return Size::None;
        };

        if best_fit {
            Size::BestFit { w: wv, h: hv }
        } else if w.is_empty() {
            Size::ScaleToHeight { h: hv }
        } else if h.is_empty() {
            Size::ScaleToWidth { w: wv }
        } else {
            Size::Exact { w: wv, h: hv }
        }
    }

    /// Every numeric field present must be strictly positive.
    pub fn valid(&self) -> bool {
        match *self {
            Size::None => false,
            Size::Full | Size::Max => true,
            Size::ScaleToWidth { w } => w > 0,
            Size::ScaleToHeight { h } => h > 0,
            Size::ScalePercent { pct } => pct > 0.0,
            Size::Exact { w, h } | Size::BestFit { w, h } => w > 0 && h > 0,
        }
    }

    /// Requested width, or 0 when the width is derived.
    pub fn width(&self) -> u32 {
        match *self {
            Size::ScaleToWidth { w } | Size::Exact { w, .. } | Size::BestFit { w, .. } => w,
            _ => 0,
        }
    }

    /// Requested height, or 0 when the height is derived.
    pub fn height(&self) -> u32 {
        match *self {
            Size::ScaleToHeight { h } | Size::Exact { h, .. } | Size::BestFit { h, .. } => h,
            _ => 0,
        }
    }
}
