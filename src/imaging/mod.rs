//! Request geometry and the decoder seam.
//!
//! | Step | Function |
//! |---|---|
//! | **Crop** | [`crop_region`]: region → source rectangle |
//! | **Scale** | [`resize`]: size → output dimensions, `max` via [`Constraint`] |
//! | **Limits** | [`Constraint::smaller_than_any`] on the rotated output |
//! | **Level** | [`desired_level`] + [`clamp_level`] for JPEG2000 decoding |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: [`Rect`] and [`Constraint`]
//! - **Backend**: [`Decoder`] trait + [`DecodeError`]
//! - **Operations**: High-level functions combining calculations + decoder

pub mod backend;
mod calculations;
pub mod operations;
mod params;

pub use backend::{DecodeError, Decoder};
pub use calculations::{
    MAX_PROGRESSION_LEVEL, best_fit, clamp_level, crop_region, desired_level, resize,
    resize_within_constraint, rotated_dimensions,
};
pub use operations::{RequestError, RequestPlan, apply, image_info, plan_request};
pub use params::{Constraint, Rect};
