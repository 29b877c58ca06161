//! Silhouette mask loading and logo protection.
//!
//! Silhouette masks are authored with the garment region in **black** on a
//! white background. Loading a mask resizes it to the template with
//! nearest-neighbor sampling and inverts it, so the garment becomes white
//! (editable) and everything else black (locked).

pub mod logo;
pub mod svg;

pub use logo::{LogoBox, apply_logo_boxes};

use crate::error::{RecolorError, Result};
use crate::raster::RasterImage;

/// Channel-0 value at or above which a mask pixel counts as editable.
pub const EDITABLE_THRESHOLD: u8 = 200;

/// How much of a mask is editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskCoverage {
    /// No pixel reaches [`EDITABLE_THRESHOLD`].
    Empty,
    /// Some pixels are editable.
    Partial,
    /// Every pixel is fully white.
    Full,
}

/// Classifies a mask by its first channel.
pub fn mask_coverage(mask: &RasterImage) -> MaskCoverage {
    let mut any_editable = false;
    let mut all_white = true;
    for px in mask.pixels() {
        any_editable |= px[0] >= EDITABLE_THRESHOLD;
        all_white &= px[0] == u8::MAX;
    }
    match (any_editable, all_white) {
        (false, _) => MaskCoverage::Empty,
        (true, true) => MaskCoverage::Full,
        (true, false) => MaskCoverage::Partial,
    }
}

/// Inverts every channel (`255 - v`). Applying it twice restores the input.
pub fn invert_mask(mask: &RasterImage) -> RasterImage {
    let mut inverted = mask.clone();
    for v in inverted.bytes_mut() {
        *v = u8::MAX - *v;
    }
    inverted
}

/// Decodes a silhouette mask, fits it to `target_width x target_height`, and
/// inverts it into an editable-region mask.
///
/// Raster masks of a different size are resized with nearest-neighbor
/// sampling only (see [`RasterImage::resize_nearest`]). SVG masks are rendered
/// directly at the target size. The channel layout of the decoded mask is
/// kept.
///
/// A mask with nothing editable (a region the garment does not have, such as
/// the sleeves of a tank top) or with everything editable is only logged.
///
/// # Errors
///
/// - [`RecolorError::InvalidMaskDimensions`] if a target or decoded dimension is zero.
/// - [`RecolorError::Image`] / [`RecolorError::Svg`] if decoding fails.
pub fn load_silhouette_mask(
    mask_bytes: &[u8],
    target_width: u32,
    target_height: u32,
) -> Result<RasterImage> {
    if target_width == 0 || target_height == 0 {
        return Err(RecolorError::InvalidMaskDimensions {
            width: target_width,
            height: target_height,
        });
    }

    let decoded = if svg::looks_like_svg(mask_bytes) {
        svg::rasterize_svg_mask(mask_bytes, target_width, target_height)?
    } else {
        RasterImage::decode(mask_bytes)?
    };
    if decoded.size().is_empty() {
        return Err(RecolorError::InvalidMaskDimensions {
            width: decoded.width(),
            height: decoded.height(),
        });
    }

    let fitted = decoded.resize_nearest(target_width, target_height)?;
    let mask = invert_mask(&fitted);

    match mask_coverage(&mask) {
        MaskCoverage::Empty => {
            tracing::warn!(
                width = target_width,
                height = target_height,
                "silhouette mask has no editable pixels after inversion"
            );
        }
        MaskCoverage::Full => {
            tracing::warn!("silhouette mask is entirely editable; was it authored inverted?");
        }
        MaskCoverage::Partial => {}
    }

    Ok(mask)
}
