//! Region-by-region recoloring of a garment template.

use crate::error::{RecolorError, Result};
use crate::layer::{ColorLayer, RenderContext, apply_all};
use crate::raster::RasterImage;
use crate::region::{ColorSet, RegionMasks, ensure_required_regions, paired_regions};

/// Recolors an encoded template and returns the result as PNG (RGBA).
///
/// Required regions are checked before the template is decoded, so a call
/// missing the body or sleeves does no buffer work at all.
///
/// # Errors
///
/// - [`RecolorError::MissingRegion`] if body or sleeves lack a mask or color.
/// - [`RecolorError::InvalidTemplateDimensions`] for a zero-sized template.
/// - [`RecolorError::InvalidMaskDimensions`] for a zero-sized mask.
/// - [`RecolorError::Image`] if the template cannot be decoded.
pub fn recolor_template(
    template_bytes: &[u8],
    colors: &ColorSet,
    masks: &RegionMasks,
) -> Result<Vec<u8>> {
    ensure_required_regions(colors, masks)?;
    let template = RasterImage::decode_rgba(template_bytes)?;
    recolor_raster(&template, colors, masks)?.encode_png()
}

/// Recolors a decoded template.
///
/// One color layer is built per region (body with `primary`, sleeves with
/// `secondary`, and trims with `tertiary` when both the mask and color are
/// present) and multiplied onto the template in that order. Every layer is
/// built before any compositing starts, so input errors never leave a
/// half-finished image behind.
pub fn recolor_raster(
    template: &RasterImage,
    colors: &ColorSet,
    masks: &RegionMasks,
) -> Result<RasterImage> {
    ensure_required_regions(colors, masks)?;

    let size = template.size();
    if size.is_empty() {
        return Err(RecolorError::InvalidTemplateDimensions {
            width: size.width,
            height: size.height,
        });
    }

    let layers = paired_regions(colors, masks)
        .into_iter()
        .map(|(region, mask, color)| {
            ColorLayer::build(region, mask, color, size.width, size.height)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut ctx = RenderContext::new(template.clone());
    apply_all(&mut ctx, &layers)?;
    tracing::debug!(
        width = size.width,
        height = size.height,
        regions = ?ctx.applied,
        "template recolored"
    );
    Ok(ctx.into_image())
}
