//! JPEG2000 (JP2) headers without a codec.
//!
//! - [`scan`] / [`scan_file`] read dimensions, tiling, resolution levels and
//!   colour space from the first few hundred bytes of a JP2.
//! - [`Jp2HeaderDecoder`] turns a scanned header into a [`Decoder`]
//!   whose output is the [`DecodePlan`] for a request.
//!
//! [`Decoder`]: crate::imaging::Decoder

mod decoder;
mod info;
mod scanner;

pub use decoder::{DecodePlan, Jp2HeaderDecoder};
pub use info::{ColorMethod, ColorSpace, Jp2Info};
pub use scanner::{JP2_SIGNATURE, ScanError, scan, scan_file};
