//! High-level request operations.
//!
//! These functions combine calculations with decoder execution. They take a
//! parsed [`Command`], the server's [`FeatureSet`] and [`Constraint`], work out
//! the crop and output size, and hand them to a [`Decoder`].

use super::backend::{DecodeError, Decoder};
use super::calculations::{crop_region, resize, rotated_dimensions};
use super::params::{Constraint, Rect};
use crate::iiif::{Command, FeatureSet, ImageInfo};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error("unsupported {}", .0.join(", "))]
    Unsupported(Vec<&'static str>),
    #[error("requested {width}x{height} exceeds server maximums")]
    ExceedsLimits { width: u32, height: u32 },
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl RequestError {
    /// HTTP status a server should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            RequestError::Invalid(_) => 400,
            RequestError::Unsupported(_) | RequestError::ExceedsLimits { .. } => 501,
            RequestError::Decode(_) => 500,
        }
    }
}

/// Resolved geometry for one image request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestPlan {
    /// Source pixels to read.
    pub crop: Rect,
    /// Size the crop is scaled to, before rotation.
    pub width: u32,
    pub height: u32,
}

/// Validate, negotiate and resolve `command` against a source of
/// `width × height` pixels.
///
/// A zero output side means "keep the aspect ratio"; a region or size that
/// rounds to nothing at all is invalid.
///
/// Fails with [`RequestError::Invalid`] for malformed or info commands,
/// [`RequestError::Unsupported`] when `features` can't serve a part, and
/// [`RequestError::ExceedsLimits`] when the rotated output breaks
/// `constraint`.
pub fn plan_request(
    command: &Command,
    features: &FeatureSet,
    constraint: &Constraint,
    width: u32,
    height: u32,
) -> Result<RequestPlan, RequestError> {
    if command.info {
        return Err(RequestError::Invalid(
            "info requests have no image operations".to_string(),
        ));
    }
    if !command.valid() {
        return Err(RequestError::Invalid(command.problem_summary()));
    }

    let unsupported = features.unsupported_parts(command);
    if !unsupported.is_empty() {
        return Err(RequestError::Unsupported(unsupported));
    }

    let crop = crop_region(&command.region, width, height);
    if crop.width() == 0 || crop.height() == 0 {
        return Err(RequestError::Invalid(format!(
            "region {}x{} has no whole pixels",
            crop.width(),
            crop.height()
        )));
    }
    let (out_w, out_h) = resize(&command.size, &crop, constraint);
    if out_w == 0 && out_h == 0 {
        return Err(RequestError::Invalid(
            "size scales the region to nothing".to_string(),
        ));
    }

    let rotation = command.rotation_or_default();
    let (final_w, final_h) = rotated_dimensions(out_w, out_h, rotation.is_quarter_turn());
    if constraint.smaller_than_any(final_w, final_h) {
        return Err(RequestError::ExceedsLimits {
            width: final_w,
            height: final_h,
        });
    }

    debug!(
        id = %command.id,
        crop = ?crop,
        width = out_w,
        height = out_h,
        "planned request"
    );

    Ok(RequestPlan {
        crop,
        width: out_w,
        height: out_h,
    })
}

/// Plan `command` against the decoder's image and decode it.
///
/// The decoder sees `set_crop` and `set_resize` before `decode_image`.
/// Rotation and quality changes are left to the caller.
pub fn apply<D: Decoder>(
    command: &Command,
    features: &FeatureSet,
    constraint: &Constraint,
    decoder: &mut D,
) -> Result<D::Image, RequestError> {
    let plan = plan_request(
        command,
        features,
        constraint,
        decoder.width(),
        decoder.height(),
    )?;

    decoder.set_crop(plan.crop);
    decoder.set_resize(plan.width, plan.height);
    Ok(decoder.decode_image()?)
}

/// What info.json needs to know about a decoder's image.
pub fn image_info(decoder: &impl Decoder) -> ImageInfo {
    ImageInfo {
        width: decoder.width(),
        height: decoder.height(),
        tile_width: decoder.tile_width(),
        tile_height: decoder.tile_height(),
        levels: decoder.levels(),
    }
}
