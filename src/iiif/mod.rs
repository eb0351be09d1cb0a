//! IIIF Image API 2.x request model.
//!
//! | Module       | Purpose                                                |
//! |--------------|--------------------------------------------------------|
//! | `id`         | Identifier escaping                                    |
//! | `region`     | `full`, `square`, pixel and percent regions            |
//! | `size`       | Every size form, `full` through `!w,h`                 |
//! | `rotation`   | Mirroring plus degrees                                 |
//! | `quality`    | `default`, `color`, `gray`, ...                        |
//! | `format`     | Output formats and their MIME types                    |
//! | `command`    | Right-to-left path tokenizer producing a [`Command`]   |
//! | `features`   | Capability sets, compliance levels, request support    |
//! | `info`       | info.json and the `profile` array                      |

mod command;
mod features;
mod format;
mod id;
mod info;
mod quality;
mod region;
mod rotation;
mod size;

pub use command::{Command, CommandError, Problem};
pub use features::{ConformanceLevel, Feature, FeatureComparison, FeatureSet, TileSize};
pub use format::Format;
pub use id::Id;
pub use info::{CONTEXT_URL, ImageInfo, Info, PROTOCOL_URL, Profile, ProfileExtras, scale_factors};
pub use quality::Quality;
pub use region::Region;
pub use rotation::Rotation;
pub use size::Size;

/// A non-negative decimal: digits with at most one `.`, and at least one
/// digit somewhere. No signs, exponents or whitespace.
pub(crate) fn parse_decimal(s: &str) -> Option<f64> {
    let mut dots = 0;
    let mut digits = 0;
    for c in s.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }
    s.parse().ok()
}

/// A non-negative integer pixel count.
pub(crate) fn parse_dimension(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals() {
        assert_eq!(parse_decimal("30"), Some(30.0));
        assert_eq!(parse_decimal("66.67"), Some(66.67));
        assert_eq!(parse_decimal(".5"), Some(0.5));
        assert_eq!(parse_decimal("5."), Some(5.0));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("."), None);
        assert_eq!(parse_decimal("1.2.3"), None);
        assert_eq!(parse_decimal("-1"), None);
        assert_eq!(parse_decimal("1e3"), None);
    }

    #[test]
    fn dimensions() {
        assert_eq!(parse_dimension("512"), Some(512));
        assert_eq!(parse_dimension("0"), Some(0));
        assert_eq!(parse_dimension(""), None);
        assert_eq!(parse_dimension("5.5"), None);
        assert_eq!(parse_dimension("+5"), None);
        assert_eq!(parse_dimension("99999999999"), None);
    }
}
