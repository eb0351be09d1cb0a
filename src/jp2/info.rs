//! Header facts scanned from a JP2 file.

use serde::Serialize;
use std::fmt;

/// How the `colr` box specifies its colour space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMethod {
    /// Method byte 1: an enumerated colour space code follows.
    Enumerated,
    /// Method byte 2: a restricted ICC profile follows.
    RestrictedIcc,
    /// Anything else, including no `colr` box read yet.
    #[default]
    Other,
}

impl From<u8> for ColorMethod {
    fn from(value: u8) -> Self {
        match value {
            1 => ColorMethod::Enumerated,
            2 => ColorMethod::RestrictedIcc,
            _ => ColorMethod::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ColorSpace {
    #[default]
    Unknown,
    #[serde(rename = "RGB")]
    Rgb,
    Grayscale,
    #[serde(rename = "YCC")]
    Ycc,
}

impl ColorSpace {
    /// Map an enumerated colour space code. Only sRGB, greyscale and sYCC
    /// are recognised.
    pub fn from_enumerated(code: u16) -> Self {
        match code {
            16 => ColorSpace::Rgb,
            17 => ColorSpace::Grayscale,
            18 => ColorSpace::Ycc,
            _ => ColorSpace::Unknown,
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColorSpace::Rgb => "RGB",
            ColorSpace::Grayscale => "Grayscale",
            ColorSpace::Ycc => "YCC",
            ColorSpace::Unknown => "Unknown",
        })
    }
}

/// Everything [`scan`](super::scan) reads from a JP2 header.
///
/// Field names follow the JPEG2000 marker segment names (`xsiz`, `lcod`,
/// ...). The SIZ values describe the codestream and can stand in for the
/// `ihdr` values when those look wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Jp2Info {
    // ihdr
    pub width: u32,
    pub height: u32,
    pub comps: u16,
    pub bpc: u8,

    // colr
    pub color_method: ColorMethod,
    pub color_space: ColorSpace,
    pub prec: u8,
    pub approx: u8,

    // SIZ
    pub lsiz: u16,
    pub rsiz: u16,
    pub xsiz: u32,
    pub ysiz: u32,
    pub xosiz: u32,
    pub yosiz: u32,
    pub xtsiz: u32,
    pub ytsiz: u32,
    pub xtosiz: u32,
    pub ytosiz: u32,
    pub csiz: u16,

    // COD
    pub lcod: u16,
    pub scod: u8,
    pub sgcod: u32,
    /// Number of wavelet decomposition levels.
    pub levels: u8,
}

impl Jp2Info {
    pub fn tile_width(&self) -> u32 {
        self.xtsiz.saturating_sub(self.xtosiz)
    }

    pub fn tile_height(&self) -> u32 {
        self.ytsiz.saturating_sub(self.ytosiz)
    }
}
