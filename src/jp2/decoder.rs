//! A [`Decoder`] backed only by the scanned JP2 header.
//!
//! No pixels are decoded. [`Jp2HeaderDecoder::decode_image`] returns the
//! [`DecodePlan`] a JPEG2000 codec would be handed: the source area, the
//! output size, and the resolution level to decode at.

use super::info::Jp2Info;
use super::scanner::scan_file;
use crate::imaging::{DecodeError, Decoder, Rect, clamp_level, desired_level};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Codec work for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecodePlan {
    pub crop: Rect,
    pub width: u32,
    pub height: u32,
    /// Resolution level to decode; 0 is full size.
    pub level: u32,
}

#[derive(Debug, Clone)]
pub struct Jp2HeaderDecoder {
    info: Jp2Info,
    crop: Option<Rect>,
    resize: Option<(u32, u32)>,
}

impl Jp2HeaderDecoder {
    pub fn new(info: Jp2Info) -> Self {
        Self {
            info,
            crop: None,
            resize: None,
        }
    }

    pub fn open(path: &Path) -> Result<Self, DecodeError> {
        Ok(Self::new(scan_file(path)?))
    }
}

impl Decoder for Jp2HeaderDecoder {
    type Image = DecodePlan;

    fn width(&self) -> u32 {
        self.info.width
    }

    fn height(&self) -> u32 {
        self.info.height
    }

    fn tile_width(&self) -> u32 {
        self.info.tile_width()
    }

    fn tile_height(&self) -> u32 {
        self.info.tile_height()
    }

    fn levels(&self) -> u32 {
        self.info.levels as u32
    }

    fn set_crop(&mut self, crop: Rect) {
        self.crop = Some(crop);
    }

    fn set_resize(&mut self, width: u32, height: u32) {
        self.resize = Some((width, height));
    }

    /// Without a crop the whole image is read; without a resize the crop is
    /// decoded at its own size. One zero output side keeps the crop's aspect
    /// ratio, and the level only leaves 0 when the output is actually scaled.
    fn decode_image(&mut self) -> Result<DecodePlan, DecodeError> {
        let crop = self
            .crop
            .unwrap_or_else(|| Rect::from_size(self.info.width, self.info.height));
        if crop.width() == 0 || crop.height() == 0 {
            return Err(DecodeError::Failed(format!(
                "cannot decode an empty {}x{} area",
                crop.width(),
                crop.height()
            )));
        }

        let (width, height) = self.resize.unwrap_or((crop.width(), crop.height()));
        if width == 0 && height == 0 {
            return Err(DecodeError::Failed("cannot decode to 0x0".to_string()));
        }

        let level = if (width, height) == (crop.width(), crop.height()) {
            0
        } else {
            clamp_level(desired_level(&crop, width, height), self.levels())
        };
        let (width, height) = keep_aspect(&crop, width, height);

        debug!(?crop, width, height, level, "JP2 decode plan");
        Ok(DecodePlan {
            crop,
            width,
            height,
            level,
        })
    }
}

/// Fill in a zero output side from the crop's aspect ratio, never below one
/// pixel.
fn keep_aspect(crop: &Rect, width: u32, height: u32) -> (u32, u32) {
    let (cw, ch) = (u64::from(crop.width()), u64::from(crop.height()));
    let derive = |given: u32, num: u64, den: u64| {
        u32::try_from(u64::from(given) * num / den)
            .unwrap_or(u32::MAX)
            .max(1)
    };
    match (width, height) {
        (0, h) => (derive(h, cw, ch), h),
        (w, 0) => (w, derive(w, ch, cw)),
        size => size,
    }
}
