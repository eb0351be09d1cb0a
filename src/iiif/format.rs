//! The output format half of the final path segment.

use std::fmt;
use std::str::FromStr;

/// A file format a client may request. `Unknown` is a sentinel distinct from
/// every valid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Unknown,
    Jpg,
    Tif,
    Png,
    Gif,
    Jp2,
    Pdf,
    Webp,
}

impl Format {
    /// The definitive list of requestable formats.
    pub const ALL: [Format; 7] = [
        Format::Jpg,
        Format::Tif,
        Format::Png,
        Format::Gif,
        Format::Jp2,
        Format::Pdf,
        Format::Webp,
    ];

    pub fn parse(value: &str) -> Self {
        value.parse().unwrap_or(Format::Unknown)
    }

    pub fn valid(self) -> bool {
        self != Format::Unknown
    }

    /// The extension used in URLs (`jpg`, `tif`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Unknown => "",
            Format::Jpg => "jpg",
            Format::Tif => "tif",
            Format::Png => "png",
            Format::Gif => "gif",
            Format::Jp2 => "jp2",
            Format::Pdf => "pdf",
            Format::Webp => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Format::Unknown => "application/octet-stream",
            Format::Jpg => "image/jpeg",
            Format::Tif => "image/tiff",
            Format::Png => "image/png",
            Format::Gif => "image/gif",
            Format::Jp2 => "image/jp2",
            Format::Pdf => "application/pdf",
            Format::Webp => "image/webp",
        }
    }
}

impl FromStr for Format {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL.into_iter().find(|f| f.as_str() == s).ok_or(())
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_format_round_trips() {
        for format in Format::ALL {
            assert_eq!(Format::parse(format.as_str()), format);
            assert!(format.valid());
        }
    }

    #[test]
    fn unknown_extension() {
        assert_eq!(Format::parse("foo"), Format::Unknown);
        assert_eq!(Format::parse("jpeg"), Format::Unknown);
        assert!(!Format::Unknown.valid());
    }

    #[test]
    fn mime_types() {
        assert_eq!(Format::Jpg.mime_type(), "image/jpeg");
        assert_eq!(Format::Jp2.mime_type(), "image/jp2");
    }
}
