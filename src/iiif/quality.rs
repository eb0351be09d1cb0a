//! The `quality` half of the final path segment (color model / depth).

use std::fmt;
use std::str::FromStr;

/// A IIIF quality a client may request.
///
/// `Native` is the IIIF 1.1 spelling of `Default` and is accepted for older
/// viewers. `Unknown` is what an unrecognised string parses to; it never
/// validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    Unknown,
    Color,
    Gray,
    Bitonal,
    Default,
    Native,
}

impl Quality {
    /// Every recognised quality, in IIIF order.
    pub const ALL: [Quality; 5] = [
        Quality::Color,
        Quality::Gray,
        Quality::Bitonal,
        Quality::Default,
        Quality::Native,
    ];

    /// Parse a URL segment, falling back to [`Quality::Unknown`].
    pub fn parse(value: &str) -> Self {
        value.parse().unwrap_or(Quality::Unknown)
    }

    pub fn valid(self) -> bool {
        self != Quality::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Unknown => "",
            Quality::Color => "color",
            Quality::Gray => "gray",
            Quality::Bitonal => "bitonal",
            Quality::Default => "default",
            Quality::Native => "native",
        }
    }
}

impl FromStr for Quality {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quality::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
