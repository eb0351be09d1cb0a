//! Pure calculation functions for request geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//! Fractional results are truncated toward zero throughout, so the same
//! request always resolves to the same pixels.

use super::params::{Constraint, Rect};
use crate::iiif::{Region, Size};

/// Highest resolution level [`desired_level`] will ever ask for.
pub const MAX_PROGRESSION_LEVEL: u32 = 6;

/// Resolve a region against the source image dimensions.
///
/// # Examples
/// ```
/// # use iiif_jp2::iiif::Region;
/// # use iiif_jp2::imaging::{Rect, crop_region};
/// // Portrait square crops are centered vertically
/// assert_eq!(crop_region(&Region::Square, 400, 950), Rect::new(0, 275, 400, 675));
/// ```
pub fn crop_region(region: &Region, width: u32, height: u32) -> Rect {
    match *region {
        Region::Square if width < height => {
            let top = (height - width) / 2;
            Rect::new(0, top, width, top + width)
        }
        Region::Square if height < width => {
            let left = (width - height) / 2;
            Rect::new(left, 0, left + height, height)
        }
        Region::Pixel { x, y, w, h } => {
            Rect::new(x as u32, y as u32, (x + w) as u32, (y + h) as u32)
        }
        Region::Percent { x, y, w, h } => {
            let (fw, fh) = (width as f64, height as f64);
            Rect::new(
                (x * fw / 100.0) as u32,
                (y * fh / 100.0) as u32,
                ((x + w) * fw / 100.0) as u32,
                ((y + h) * fh / 100.0) as u32,
            )
        }
        // Full, a square source, and unparsed regions use the whole image
        _ => Rect::from_size(width, height),
    }
}

/// Scale `(width, height)` by the largest factor that fits inside
/// `max_width × max_height`, preserving the aspect ratio.
pub fn best_fit(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let (fw, fh) = (width as f64, height as f64);
    let mut sf = max_width as f64 / fw;
    if sf * fh > max_height as f64 {
        sf = max_height as f64 / fh;
    }
    ((sf * fw) as u32, (sf * fh) as u32)
}

/// Output dimensions for a size request applied to a crop.
///
/// `max` uses the server constraint in place of client-supplied numbers;
/// every other size ignores the constraint (the caller checks limits
/// afterwards).
pub fn resize(size: &Size, crop: &Rect, constraint: &Constraint) -> (u32, u32) {
    let (w, h) = (crop.width(), crop.height());
    match *size {
        Size::Max => resize_within_constraint(crop, constraint),
        Size::ScaleToWidth { w: sw } => best_fit(w, h, sw, u32::MAX),
        Size::ScaleToHeight { h: sh } => best_fit(w, h, u32::MAX, sh),
        Size::ScalePercent { pct } => (
            (w as f64 * pct / 100.0) as u32,
            (h as f64 * pct / 100.0) as u32,
        ),
        Size::Exact { w: ew, h: eh } => (ew, eh),
        Size::BestFit { w: bw, h: bh } => best_fit(w, h, bw, bh),
        Size::Full | Size::None => (w, h),
    }
}

/// The largest output for `crop` that satisfies every server maximum without
/// upscaling.
pub fn resize_within_constraint(crop: &Rect, constraint: &Constraint) -> (u32, u32) {
    let (cw, ch) = (crop.width(), crop.height());
    let max_w = constraint.width.min(cw);
    let max_h = constraint.height.min(ch);

    let (sw, sh) = best_fit(cw, ch, max_w, max_h);
    let area = sw as u64 * sh as u64;
    if area <= constraint.area {
        return (sw, sh);
    }

    let mult = (constraint.area as f64 / area as f64).sqrt();
    ((mult * sw as f64) as u32, (mult * sh as f64) as u32)
}

/// Output dimensions as they leave the server: width and height trade places
/// for quarter turns.
pub fn rotated_dimensions(width: u32, height: u32, quarter_turn: bool) -> (u32, u32) {
    if quarter_turn {
        (height, width)
    } else {
        (width, height)
    }
}

fn scaled_dimension(level: u32, dimension: u32) -> f64 {
    dimension as f64 / 2f64.powi(level as i32)
}

/// Coarsest JPEG2000 resolution level that still yields at least
/// `out_width × out_height` pixels from `crop`.
///
/// A zero output dimension means "derived from the other axis" and never
/// constrains the choice. The result knows nothing about the file, so pass
/// it through [`clamp_level`].
pub fn desired_level(crop: &Rect, out_width: u32, out_height: u32) -> u32 {
    let (cw, ch) = (crop.width(), crop.height());
    let mut level = MAX_PROGRESSION_LEVEL;
    while level > 0 {
        let fits_w = out_width == 0 || scaled_dimension(level, cw) >= out_width as f64;
        let fits_h = out_height == 0 || scaled_dimension(level, ch) >= out_height as f64;
        if fits_w && fits_h {
            break;
        }
        level -= 1;
    }
    level
}

/// Bound a level to what the file actually contains.
pub fn clamp_level(level: u32, available: u32) -> u32 {
    level.min(available)
}
