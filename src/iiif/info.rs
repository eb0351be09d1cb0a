//! info.json responses and the IIIF `profile` value.
//!
//! IIIF defines `profile` as a heterogeneous array: the first element is
//! always the conformance URL string, the second an object listing extra
//! formats, qualities and supported features:
//!
//! ```json
//! "profile": [
//!   "http://iiif.io/api/image/2/level2.json",
//!   { "formats": ["tif"], "supports": ["mirroring", "regionSquare"] }
//! ]
//! ```
//!
//! [`Profile`] has hand-written serde impls for exactly that shape.

use super::{Feature, FeatureSet, Format, Quality, TileSize};
use crate::imaging::Constraint;
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const CONTEXT_URL: &str = "http://iiif.io/api/image/2/context.json";
pub const PROTOCOL_URL: &str = "http://iiif.io/api/image";

/// Scale factors stop before either dimension would drop below this.
const MIN_SCALED_DIMENSION: u32 = 16;

/// Capabilities beyond the advertised conformance level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileExtras {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formats: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualities: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supports: Vec<String>,
    /// Server maximums, only advertised for images larger than them.
    #[serde(rename = "maxWidth", default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    #[serde(rename = "maxHeight", default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u32>,
    #[serde(rename = "maxArea", default, skip_serializing_if = "Option::is_none")]
    pub max_area: Option<u64>,
}

impl ProfileExtras {
    /// Bucket features by whether their name is a format, a quality, or
    /// anything else. Each list is sorted.
    pub fn from_features(features: impl IntoIterator<Item = Feature>) -> Self {
        let mut extras = ProfileExtras::default();
        for feature in features {
            let name = feature.name();
            if Quality::parse(name).valid() {
                extras.qualities.push(name.to_string());
            } else if Format::parse(name).valid() {
                extras.formats.push(name.to_string());
            } else {
                extras.supports.push(name.to_string());
            }
        }
        extras.formats.sort();
        extras.qualities.sort();
        extras.supports.sort();
        extras
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
            && self.qualities.is_empty()
            && self.supports.is_empty()
            && self.max_width.is_none()
            && self.max_height.is_none()
            && self.max_area.is_none()
    }

    /// Record every limit of `constraint` that is actually set.
    fn set_limits(&mut self, constraint: &Constraint) {
        let unlimited = Constraint::unlimited();
        self.max_width = (constraint.width != unlimited.width).then_some(constraint.width);
        self.max_height = (constraint.height != unlimited.height).then_some(constraint.height);
        self.max_area = (constraint.area != unlimited.area).then_some(constraint.area);
    }
}

/// The `profile` entry of info.json.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub conformance_url: String,
    pub extras: ProfileExtras,
}

impl Serialize for Profile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.conformance_url)?;
        tuple.serialize_element(&self.extras)?;
        tuple.end()
    }
}

struct ProfileVisitor;

impl<'de> Visitor<'de> for ProfileVisitor {
    type Value = Profile;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a [conformance URL, {formats, qualities, supports}] array")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Profile, A::Error> {
        let conformance_url: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let extras: ProfileExtras = seq.next_element()?.unwrap_or_default();
        Ok(Profile {
            conformance_url,
            extras,
        })
    }
}

impl<'de> Deserialize<'de> for Profile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(ProfileVisitor)
    }
}

/// Minimal valid IIIF info.json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@id")]
    pub id: String,
    pub protocol: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiles: Vec<TileSize>,
    pub profile: Profile,
}

/// Image facts needed to describe it in info.json.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub levels: u32,
}

impl FeatureSet {
    /// Conformance URL of the best level covered, plus whatever this set
    /// offers beyond it.
    pub fn profile(&self) -> Profile {
        let level = self.conformance_level();
        let extras = FeatureSet::compare(self, &level.feature_set()).only_a;
        Profile {
            conformance_url: level.profile_url().to_string(),
            extras: ProfileExtras::from_features(extras),
        }
    }

    /// info.json for one image. `id_url` is the full URL of the image's base
    /// URI, not just the identifier.
    ///
    /// When the image is larger than `constraint` allows, the profile also
    /// carries the server's `maxWidth`, `maxHeight` and `maxArea`.
    ///
    /// Tiled images advertise their native tile size with power-of-two
    /// scale factors, one per resolution level; untiled images fall back to
    /// the tile sizes configured on the feature set.
    pub fn info(&self, id_url: &str, image: &ImageInfo, constraint: &Constraint) -> Info {
        let tiles = if image.tile_width > 0 {
            vec![TileSize {
                width: image.tile_width,
                height: (image.tile_height > 0).then_some(image.tile_height),
                scale_factors: scale_factors(image.width, image.height, image.levels),
            }]
        } else {
            self.tile_sizes.clone()
        };

        let mut profile = self.profile();
        if constraint.smaller_than_any(image.width, image.height) {
            profile.extras.set_limits(constraint);
        }

        Info {
            context: CONTEXT_URL.to_string(),
            id: id_url.to_string(),
            protocol: PROTOCOL_URL.to_string(),
            width: image.width,
            height: image.height,
            tiles,
            profile,
        }
    }
}

/// Power-of-two scale factors for `levels` resolution levels, stopping
/// before either dimension would be scaled under 16 pixels.
pub fn scale_factors(width: u32, height: u32, levels: u32) -> Vec<u32> {
    let mut factors = Vec::new();
    let mut scale: u32 = 1;
    for _ in 0..levels {
        if width / scale < MIN_SCALED_DIMENSION || height / scale < MIN_SCALED_DIMENSION {
            break;
        }
        factors.push(scale);
        scale <<= 1;
    }
    factors
}
