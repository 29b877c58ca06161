//! Garment regions and the mask/color pairs that drive recoloring.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::ColorTriplet;
use crate::error::{RecolorError, Result};
use crate::raster::RasterImage;

/// A recolorable garment region.
///
/// The declaration order is the composite order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Body,
    Sleeves,
    Trims,
}

impl Region {
    /// All regions in composite order.
    pub const ALL: [Region; 3] = [Region::Body, Region::Sleeves, Region::Trims];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Sleeves => "sleeves",
            Self::Trims => "trims",
        }
    }

    /// Body and sleeves must always be supplied.
    pub fn is_required(&self) -> bool {
        !matches!(self, Self::Trims)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ColorSet
// ============================================================================

/// Target colors keyed by region: `primary` for body, `secondary` for
/// sleeves, `tertiary` for trims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColorSet {
    pub primary: Option<ColorTriplet>,
    pub secondary: Option<ColorTriplet>,
    pub tertiary: Option<ColorTriplet>,
}

impl ColorSet {
    /// Creates a color set with the two required colors.
    pub fn new(primary: ColorTriplet, secondary: ColorTriplet) -> Self {
        Self {
            primary: Some(primary),
            secondary: Some(secondary),
            tertiary: None,
        }
    }

    /// Parses the colors from hex strings.
    pub fn from_hex(primary: &str, secondary: &str, tertiary: Option<&str>) -> Result<Self> {
        Ok(Self {
            primary: Some(ColorTriplet::from_hex(primary)?),
            secondary: Some(ColorTriplet::from_hex(secondary)?),
            tertiary: tertiary.map(ColorTriplet::from_hex).transpose()?,
        })
    }

    pub fn with_tertiary(mut self, tertiary: ColorTriplet) -> Self {
        self.tertiary = Some(tertiary);
        self
    }

    /// Returns the color assigned to a region.
    pub fn get(&self, region: Region) -> Option<ColorTriplet> {
        match region {
            Region::Body => self.primary,
            Region::Sleeves => self.secondary,
            Region::Trims => self.tertiary,
        }
    }
}

// ============================================================================
// RegionMasks
// ============================================================================

/// Editable-region masks (255 = editable, 0 = locked) keyed by region.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionMasks {
    pub body: Option<RasterImage>,
    pub sleeves: Option<RasterImage>,
    pub trims: Option<RasterImage>,
}

impl RegionMasks {
    /// Creates a mask set with the two required regions.
    pub fn new(body: RasterImage, sleeves: RasterImage) -> Self {
        Self {
            body: Some(body),
            sleeves: Some(sleeves),
            trims: None,
        }
    }

    pub fn with_trims(mut self, trims: RasterImage) -> Self {
        self.trims = Some(trims);
        self
    }

    pub fn get(&self, region: Region) -> Option<&RasterImage> {
        match region {
            Region::Body => self.body.as_ref(),
            Region::Sleeves => self.sleeves.as_ref(),
            Region::Trims => self.trims.as_ref(),
        }
    }

    /// Applies `f` to every supplied mask, keeping the region keys.
    pub fn try_map<F>(&self, mut f: F) -> Result<Self>
    where
        F: FnMut(Region, &RasterImage) -> Result<RasterImage>,
    {
        let mut apply = |region: Region, mask: Option<&RasterImage>| {
            mask.map(|m| f(region, m)).transpose()
        };
        Ok(Self {
            body: apply(Region::Body, self.body.as_ref())?,
            sleeves: apply(Region::Sleeves, self.sleeves.as_ref())?,
            trims: apply(Region::Trims, self.trims.as_ref())?,
        })
    }
}

/// Fails with [`RecolorError::MissingRegion`] unless body and sleeves each
/// have both a mask and a color.
///
/// Performs no decoding, so it is cheap enough to run before any buffer work.
pub fn ensure_required_regions(colors: &ColorSet, masks: &RegionMasks) -> Result<()> {
    for region in Region::ALL.into_iter().filter(Region::is_required) {
        if masks.get(region).is_none() || colors.get(region).is_none() {
            return Err(RecolorError::MissingRegion(region));
        }
    }
    Ok(())
}

/// Pairs each region with its mask and color, in composite order.
///
/// Regions missing either half are dropped; callers enforce the required ones
/// with [`ensure_required_regions`] first.
pub fn paired_regions<'a>(
    colors: &ColorSet,
    masks: &'a RegionMasks,
) -> Vec<(Region, &'a RasterImage, ColorTriplet)> {
    Region::ALL
        .into_iter()
        .filter_map(|region| match (masks.get(region), colors.get(region)) {
            (Some(mask), Some(color)) => Some((region, mask, color)),
            (None, None) => None,
            _ => {
                tracing::debug!(%region, "region has a mask or a color but not both, skipping");
                None
            }
        })
        .collect()
}
