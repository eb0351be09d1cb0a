//! The `rotation` path segment: optional mirroring plus clockwise degrees.

use super::parse_decimal;

/// Degrees of clockwise rotation and whether the image is mirrored first.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    pub mirror: bool,
    pub degrees: f64,
}

impl Rotation {
    /// Parse `[!]degrees`. Returns `None` when the segment is not a
    /// non-negative decimal.
    ///
    /// Exactly 360 is folded to 0: it is the same picture, and IIIF level 2
    /// would otherwise require accepting 360 alongside 0.
    pub fn parse(segment: &str) -> Option<Self> {
        let (mirror, value) = match segment.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, segment),
        };

        let mut degrees = parse_decimal(value)?;
        if degrees == 360.0 {
            degrees = 0.0;
        }

        Some(Rotation { mirror, degrees })
    }

    /// `0 <= degrees < 360`.
    pub fn valid(&self) -> bool {
        self.degrees >= 0.0 && self.degrees < 360.0
    }

    /// Whether the output swaps its width and height.
    pub fn is_quarter_turn(&self) -> bool {
        self.degrees == 90.0 || self.degrees == 270.0
    }

    /// Whether this is a multiple of 90 degrees.
    pub fn is_right_angle(&self) -> bool {
        [0.0, 90.0, 180.0, 270.0].contains(&self.degrees)
    }
}
