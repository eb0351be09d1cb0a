//! Image identifiers as they travel through IIIF URLs.

use std::fmt;

/// An opaque, unescaped identifier for a source image.
///
/// Identifiers arrive percent-escaped (`path%2Fto%2Fimage.jp2`) so they can
/// hold slashes; [`Id::from_url`] undoes that and [`Id::escaped`] redoes it
/// when the id is echoed back into a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Id(String);

impl Id {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Query-unescape a raw URL segment: `+` is a space and `%XX` is a byte.
    /// Segments that don't decode to UTF-8 give an empty id, which fails
    /// validation downstream.
    pub fn from_url(raw: &str) -> Self {
        let spaced = raw.replace('+', " ");
        match urlencoding::decode(&spaced) {
            Ok(decoded) => Self(decoded.into_owned()),
            Err(_) => Self::default(),
        }
    }

    /// Query-escape for use inside a URL path.
    pub fn escaped(&self) -> String {
        urlencoding::encode(&self.0).replace("%20", "+")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
