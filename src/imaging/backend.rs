//! Decoder trait and shared error type.
//!
//! A [`Decoder`] is the seam between request planning and pixel work. The
//! planner reads the source's dimensions, tells the decoder which region to
//! read and how big the output should be, and then asks it to decode.
//!
//! The crate ships [`Jp2HeaderDecoder`](crate::jp2::Jp2HeaderDecoder), which
//! "decodes" to a [`DecodePlan`](crate::jp2::DecodePlan) describing the
//! codec work a real JPEG2000 decoder would do.

use super::params::Rect;
use crate::jp2::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("reading image header: {0}")]
    Scan(#[from] ScanError),
    #[error("decode failed: {0}")]
    Failed(String),
}

/// A source image that can be cropped and scaled on decode.
///
/// `set_crop` and `set_resize` must be called before `decode_image`.
pub trait Decoder {
    /// Whatever the decoder produces.
    type Image;

    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Native tile width, 0 when the source isn't tiled.
    fn tile_width(&self) -> u32;
    fn tile_height(&self) -> u32;
    /// Number of resolution levels below full size.
    fn levels(&self) -> u32;

    fn set_crop(&mut self, crop: Rect);
    fn set_resize(&mut self, width: u32, height: u32);

    fn decode_image(&mut self) -> Result<Self::Image, DecodeError>;
}
