//! Parameter types for image operations.
//!
//! These structs describe *what* to decode, not *how*. They are the interface
//! between the request planning in [`operations`](super::operations) and a
//! [`Decoder`](super::backend::Decoder) that does the actual pixel work.
//!
//! ## Types
//!
//! - [`Rect`]: Integer rectangle in source pixels, half-open on the max edges.
//! - [`Constraint`]: Server maximums for output width, height and area.

/// An integer rectangle `[min_x, max_x) × [min_y, max_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct Rect {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Rect {
    pub fn new(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// A rectangle anchored at the origin.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn width(&self) -> u32 {
        self.max_x.saturating_sub(self.min_x)
    }

    pub fn height(&self) -> u32 {
        self.max_y.saturating_sub(self.min_y)
    }
}

/// Maximum output dimensions a server is willing to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    pub width: u32,
    pub height: u32,
    pub area: u64,
}

impl Constraint {
    pub fn unlimited() -> Self {
        Self {
            width: u32::MAX,
            height: u32::MAX,
            area: u64::MAX,
        }
    }

    /// True if `width × height` breaks any of the maximums.
    pub fn smaller_than_any(&self, width: u32, height: u32) -> bool {
        width > self.width || height > self.height || width as u64 * height as u64 > self.area
    }
}

impl Default for Constraint {
    fn default() -> Self {
        Self::unlimited()
    }
}
