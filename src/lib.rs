//! # iiif-jp2
//!
//! The request side of a IIIF Image API 2.x server for JPEG2000 sources.
//! A client encodes crop, resize, rotation, quality and output format into a
//! URL path; this crate turns that path into concrete pixel geometry and the
//! JPEG2000 resolution level a codec should decode at, reading nothing but the
//! file header.
//!
//! # Pipeline
//!
//! ```text
//! 1. Parse      "id/full/!512,512/0/default.jpg"  →  iiif::Command
//! 2. Negotiate  Command + FeatureSet              →  400 / 501 or go ahead
//! 3. Resolve    Command + source size + limits    →  crop Rect + output size
//! 4. Decode     crop + output + JP2 header        →  progression level
//! ```
//!
//! Each stage is a plain function over plain data, so the whole flow can be
//! exercised without a JPEG2000 codec: [`jp2::Jp2HeaderDecoder`] implements
//! [`imaging::Decoder`] and "decodes" to the plan a real codec would be
//! handed.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`iiif`] | URL grammar, feature sets, compliance profiles, info.json |
//! | [`imaging`] | Crop/resize geometry, limits, progression levels, the `Decoder` seam |
//! | [`jp2`] | Forward-only JP2 header scanner and the header-backed decoder |
//! | [`config`] | `iiif-jp2.toml` loading, merging with stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Problems, Not First Errors
//!
//! A bad request reports every broken segment at once (`invalid region,
//! invalid format`), always in URL order, so a client fixes its URL in one
//! round trip and the message is stable enough to assert on.
//!
//! ## Capability Is Separate From Syntax
//!
//! `square` or `!512,512` are valid IIIF whether or not a given server
//! supports them. Parsing never looks at the [`iiif::FeatureSet`];
//! negotiation does, and answers 501 rather than 400.
//!
//! ## Header Scanning Without a Codec
//!
//! Dimensions, tiling and decomposition levels sit in the first few hundred
//! bytes of a JP2. [`jp2::scan`] reads them forward-only from any
//! [`std::io::Read`], which keeps info.json and level selection cheap and
//! independent of whichever codec eventually decodes pixels.

pub mod config;
pub mod iiif;
pub mod imaging;
pub mod jp2;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
