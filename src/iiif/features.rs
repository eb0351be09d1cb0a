//! Server capabilities: what a IIIF endpoint can actually do.
//!
//! A [`FeatureSet`] is a set of typed [`Feature`]s plus the tile sizes the
//! server advertises. It answers two questions:
//!
//! - **Can this request be served?** [`FeatureSet::supported`]. A request
//!   that parses fine but needs a missing feature is a capability failure
//!   (501), not a syntax error (400).
//! - **What do we advertise?** [`FeatureSet::compare`] and
//!   [`FeatureSet::includes`] drive the profile built in
//!   [`info`](super::info).
//!
//! The three IIIF compliance levels are available as
//! [`FeatureSet::level0`], [`level1`](FeatureSet::level1) and
//! [`level2`](FeatureSet::level2), each a strict superset of the previous.
//! Feature names only become strings at the serialization boundary.

use super::{Command, Format, Quality, Region, Rotation, Size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// One IIIF 2.1 capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    // Region ("full" needs no feature)
    RegionByPx,
    RegionByPct,
    RegionSquare,

    // Size ("full" and "max" need no feature)
    SizeByWhListed,
    SizeByW,
    SizeByH,
    SizeByPct,
    SizeByForcedWh,
    SizeByWh,
    SizeByConfinedWh,
    SizeByDistortedWh,
    SizeAboveFull,

    // Rotation and mirroring
    RotationBy90s,
    RotationArbitrary,
    Mirroring,

    // Quality
    Default,
    Color,
    Gray,
    Bitonal,

    // Format
    Jpg,
    Png,
    Tif,
    Gif,
    Jp2,
    Pdf,
    Webp,

    // HTTP
    BaseUriRedirect,
    Cors,
    JsonldMediaType,
    ProfileLinkHeader,
    CanonicalLinkHeader,
}

impl Feature {
    pub const ALL: [Feature; 31] = [
        Feature::RegionByPx,
        Feature::RegionByPct,
        Feature::RegionSquare,
        Feature::SizeByWhListed,
        Feature::SizeByW,
        Feature::SizeByH,
        Feature::SizeByPct,
        Feature::SizeByForcedWh,
        Feature::SizeByWh,
        Feature::SizeByConfinedWh,
        Feature::SizeByDistortedWh,
        Feature::SizeAboveFull,
        Feature::RotationBy90s,
        Feature::RotationArbitrary,
        Feature::Mirroring,
        Feature::Default,
        Feature::Color,
        Feature::Gray,
        Feature::Bitonal,
        Feature::Jpg,
        Feature::Png,
        Feature::Tif,
        Feature::Gif,
        Feature::Jp2,
        Feature::Pdf,
        Feature::Webp,
        Feature::BaseUriRedirect,
        Feature::Cors,
        Feature::JsonldMediaType,
        Feature::ProfileLinkHeader,
        Feature::CanonicalLinkHeader,
    ];

    /// The name IIIF uses in `supports`, `qualities` and `formats` lists.
    pub fn name(self) -> &'static str {
        match self {
            Feature::RegionByPx => "regionByPx",
            Feature::RegionByPct => "regionByPct",
            Feature::RegionSquare => "regionSquare",
            Feature::SizeByWhListed => "sizeByWhListed",
            Feature::SizeByW => "sizeByW",
            Feature::SizeByH => "sizeByH",
            Feature::SizeByPct => "sizeByPct",
            Feature::SizeByForcedWh => "sizeByForcedWh",
            Feature::SizeByWh => "sizeByWh",
            Feature::SizeByConfinedWh => "sizeByConfinedWh",
            Feature::SizeByDistortedWh => "sizeByDistortedWh",
            Feature::SizeAboveFull => "sizeAboveFull",
            Feature::RotationBy90s => "rotationBy90s",
            Feature::RotationArbitrary => "rotationArbitrary",
            Feature::Mirroring => "mirroring",
            Feature::Default => "default",
            Feature::Color => "color",
            Feature::Gray => "gray",
            Feature::Bitonal => "bitonal",
            Feature::Jpg => "jpg",
            Feature::Png => "png",
            Feature::Tif => "tif",
            Feature::Gif => "gif",
            Feature::Jp2 => "jp2",
            Feature::Pdf => "pdf",
            Feature::Webp => "webp",
            Feature::BaseUriRedirect => "baseUriRedirect",
            Feature::Cors => "cors",
            Feature::JsonldMediaType => "jsonldMediaType",
            Feature::ProfileLinkHeader => "profileLinkHeader",
            Feature::CanonicalLinkHeader => "canonicalLinkHeader",
        }
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| format!("unknown IIIF feature: {s}"))
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A tile size advertised in info.json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSize {
    pub width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(rename = "scaleFactors", alias = "scale_factors")]
    pub scale_factors: Vec<u32>,
}

/// The result of [`FeatureSet::compare`]: enabled features split by owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureComparison {
    pub both: BTreeSet<Feature>,
    pub only_a: BTreeSet<Feature>,
    pub only_b: BTreeSet<Feature>,
}

/// A canonical IIIF compliance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConformanceLevel {
    Level0,
    Level1,
    Level2,
}

impl ConformanceLevel {
    pub fn profile_url(self) -> &'static str {
        match self {
            ConformanceLevel::Level0 => "http://iiif.io/api/image/2/level0.json",
            ConformanceLevel::Level1 => "http://iiif.io/api/image/2/level1.json",
            ConformanceLevel::Level2 => "http://iiif.io/api/image/2/level2.json",
        }
    }

    pub fn feature_set(self) -> FeatureSet {
        match self {
            ConformanceLevel::Level0 => FeatureSet::level0(),
            ConformanceLevel::Level1 => FeatureSet::level1(),
            ConformanceLevel::Level2 => FeatureSet::level2(),
        }
    }
}

const LEVEL0: &[Feature] = &[Feature::SizeByWhListed, Feature::Default, Feature::Jpg];

const LEVEL1: &[Feature] = &[
    Feature::RegionByPx,
    Feature::SizeByWhListed,
    Feature::SizeByW,
    Feature::SizeByH,
    Feature::SizeByPct,
    Feature::Default,
    Feature::Jpg,
    Feature::BaseUriRedirect,
    Feature::Cors,
    Feature::JsonldMediaType,
];

const LEVEL2: &[Feature] = &[
    Feature::RegionByPx,
    Feature::RegionByPct,
    Feature::SizeByWhListed,
    Feature::SizeByW,
    Feature::SizeByH,
    Feature::SizeByPct,
    Feature::SizeByForcedWh,
    Feature::SizeByWh,
    Feature::RotationBy90s,
    Feature::Default,
    Feature::Color,
    Feature::Gray,
    Feature::Bitonal,
    Feature::Jpg,
    Feature::Png,
    Feature::BaseUriRedirect,
    Feature::Cors,
    Feature::JsonldMediaType,
];

/// Everything on top of level 2 that this crate's request handling covers.
const BEYOND_LEVEL2: &[Feature] = &[
    Feature::RegionSquare,
    Feature::SizeAboveFull,
    Feature::Mirroring,
    Feature::Tif,
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    features: BTreeSet<Feature>,
    pub tile_sizes: Vec<TileSize>,
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
            tile_sizes: Vec::new(),
        }
    }
}

impl FeatureSet {
    pub fn level0() -> Self {
        LEVEL0.iter().copied().collect()
    }

    pub fn level1() -> Self {
        LEVEL1.iter().copied().collect()
    }

    pub fn level2() -> Self {
        LEVEL2.iter().copied().collect()
    }

    /// Level 2 plus every optional feature the request engine handles.
    pub fn all() -> Self {
        LEVEL2.iter().chain(BEYOND_LEVEL2).copied().collect()
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    pub fn enable(&mut self, feature: Feature) {
        self.features.insert(feature);
    }

    pub fn disable(&mut self, feature: Feature) {
        self.features.remove(&feature);
    }

    /// Builder-style [`enable`](Self::enable).
    pub fn with(mut self, feature: Feature) -> Self {
        self.enable(feature);
        self
    }

    /// Builder-style [`disable`](Self::disable).
    pub fn without(mut self, feature: Feature) -> Self {
        self.disable(feature);
        self
    }

    // =========================================================================
    // Request support
    // =========================================================================

    pub fn supports_region(&self, region: &Region) -> bool {
        match region {
            Region::Pixel { .. } => self.contains(Feature::RegionByPx),
            Region::Percent { .. } => self.contains(Feature::RegionByPct),
            Region::Square => self.contains(Feature::RegionSquare),
            Region::Full | Region::None => true,
        }
    }

    pub fn supports_size(&self, size: &Size) -> bool {
        match size {
            Size::ScaleToWidth { .. } => self.contains(Feature::SizeByW),
            Size::ScaleToHeight { .. } => self.contains(Feature::SizeByH),
            Size::ScalePercent { .. } => self.contains(Feature::SizeByPct),
            Size::Exact { .. } => self.contains(Feature::SizeByForcedWh),
            Size::BestFit { .. } => self.contains(Feature::SizeByWh),
            Size::Full | Size::Max | Size::None => true,
        }
    }

    pub fn supports_rotation(&self, rotation: &Rotation) -> bool {
        // Mirroring is checked on its own so the degree checks stay simple
        if rotation.mirror && !self.contains(Feature::Mirroring) {
            return false;
        }

        if rotation.degrees == 0.0 {
            true
        } else if rotation.is_right_angle() {
            self.contains(Feature::RotationBy90s) || self.contains(Feature::RotationArbitrary)
        } else {
            self.contains(Feature::RotationArbitrary)
        }
    }

    pub fn supports_quality(&self, quality: Quality) -> bool {
        match quality {
            Quality::Color => self.contains(Feature::Color),
            Quality::Gray => self.contains(Feature::Gray),
            Quality::Bitonal => self.contains(Feature::Bitonal),
            Quality::Default | Quality::Native => self.contains(Feature::Default),
            Quality::Unknown => false,
        }
    }

    pub fn supports_format(&self, format: Format) -> bool {
        match format {
            Format::Jpg => self.contains(Feature::Jpg),
            Format::Tif => self.contains(Feature::Tif),
            Format::Png => self.contains(Feature::Png),
            Format::Gif => self.contains(Feature::Gif),
            Format::Jp2 => self.contains(Feature::Jp2),
            Format::Pdf => self.contains(Feature::Pdf),
            Format::Webp => self.contains(Feature::Webp),
            Format::Unknown => false,
        }
    }

    /// Names of the command parts this feature set cannot serve.
    ///
    /// Info requests never need an operation feature. Listed-size level 0
    /// servers (`sizeByWhListed`) are not modelled: such a server should
    /// check its advertised sizes directly.
    pub fn unsupported_parts(&self, command: &Command) -> Vec<&'static str> {
        if command.info {
            return Vec::new();
        }

        let mut parts = Vec::new();
        if !self.supports_region(&command.region) {
            parts.push("region");
        }
        if !self.supports_size(&command.size) {
            parts.push("size");
        }
        if !self.supports_rotation(&command.rotation_or_default()) {
            parts.push("rotation");
        }
        if !self.supports_quality(command.quality) {
            parts.push("quality");
        }
        if !self.supports_format(command.format) {
            parts.push("format");
        }
        parts
    }

    /// Whether every part of `command` can be served.
    pub fn supported(&self, command: &Command) -> bool {
        self.unsupported_parts(command).is_empty()
    }

    // =========================================================================
    // Set comparison
    // =========================================================================

    /// Split the enabled features of `a` and `b` into shared and exclusive.
    pub fn compare(a: &FeatureSet, b: &FeatureSet) -> FeatureComparison {
        FeatureComparison {
            both: a.features.intersection(&b.features).copied().collect(),
            only_a: a.features.difference(&b.features).copied().collect(),
            only_b: b.features.difference(&a.features).copied().collect(),
        }
    }

    /// True if everything enabled in `subset` is enabled here too.
    pub fn includes(&self, subset: &FeatureSet) -> bool {
        FeatureSet::compare(self, subset).only_b.is_empty()
    }

    /// The highest canonical level this set fully covers.
    pub fn conformance_level(&self) -> ConformanceLevel {
        [ConformanceLevel::Level2, ConformanceLevel::Level1]
            .into_iter()
            .find(|level| self.includes(&level.feature_set()))
            .unwrap_or(ConformanceLevel::Level0)
    }
}
