//! Flat color layers whose alpha comes from a region mask.

use super::blend::composite_multiply;
use super::{LayerEffect, RenderContext};
use crate::color::ColorTriplet;
use crate::error::{RecolorError, Result};
use crate::raster::RasterImage;
use crate::region::Region;

/// Builds a `width x height` RGBA layer filled with `color`, whose alpha is
/// the mask's first channel copied verbatim.
///
/// Partial mask intensities give partial opacity, so soft mask edges blend
/// smoothly. A mask of a different size is resized with nearest-neighbor
/// sampling first.
///
/// # Errors
///
/// [`RecolorError::InvalidMaskDimensions`] if the mask or the target size is
/// zero in either direction.
pub fn create_color_layer(
    mask: &RasterImage,
    color: ColorTriplet,
    width: u32,
    height: u32,
) -> Result<RasterImage> {
    if mask.size().is_empty() {
        return Err(RecolorError::InvalidMaskDimensions {
            width: mask.width(),
            height: mask.height(),
        });
    }
    if width == 0 || height == 0 {
        return Err(RecolorError::InvalidMaskDimensions { width, height });
    }

    let fitted = mask.resize_nearest(width, height)?;
    let [r, g, b] = color.as_array();
    let mut bytes = Vec::with_capacity(fitted.size().area() * 4);
    for px in fitted.pixels() {
        bytes.extend_from_slice(&[r, g, b, px[0]]);
    }
    RasterImage::new(width, height, 4, bytes)
}

// ============================================================================
// ColorLayer
// ============================================================================

/// A region's color layer, ready to be multiplied onto the template.
#[derive(Debug, Clone)]
pub struct ColorLayer {
    pub region: Region,
    pub color: ColorTriplet,
    pub pixels: RasterImage,
}

impl ColorLayer {
    /// Builds the layer for `region` at the given template size.
    pub fn build(
        region: Region,
        mask: &RasterImage,
        color: ColorTriplet,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        Ok(Self {
            region,
            color,
            pixels: create_color_layer(mask, color, width, height)?,
        })
    }
}

impl LayerEffect for ColorLayer {
    fn transform(&self, ctx: &mut RenderContext) -> Result<()> {
        composite_multiply(&mut ctx.image, &self.pixels)
    }

    fn emit(&self, ctx: &mut RenderContext) {
        ctx.applied.push(self.region);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_is_mask_channel_zero() {
        let mut mask = RasterImage::filled(3, 1, 2, 0).unwrap();
        mask.pixel_mut(0, 0).copy_from_slice(&[255, 9]);
        mask.pixel_mut(1, 0).copy_from_slice(&[128, 9]);

        let layer = create_color_layer(&mask, ColorTriplet::new(10, 20, 30), 3, 1).unwrap();
        assert_eq!(layer.channels(), 4);
        assert_eq!(layer.pixel(0, 0), &[10, 20, 30, 255]);
        assert_eq!(layer.pixel(1, 0), &[10, 20, 30, 128]);
        assert_eq!(layer.pixel(2, 0), &[10, 20, 30, 0]);
    }

    #[test]
    fn resizes_mask_to_target() {
        let mask = RasterImage::filled(2, 3, 1, 255).unwrap();
        let layer = create_color_layer(&mask, ColorTriplet::new(1, 1, 1), 4, 6).unwrap();
        assert_eq!((layer.width(), layer.height()), (4, 6));
        assert!(layer.pixels().all(|px| px[3] == 255));
    }

    #[test]
    fn empty_dimensions_are_rejected() {
        let empty = RasterImage::filled(0, 0, 1, 0).unwrap();
        assert!(matches!(
            create_color_layer(&empty, ColorTriplet::new(0, 0, 0), 4, 4),
            Err(RecolorError::InvalidMaskDimensions { width: 0, height: 0 })
        ));

        let mask = RasterImage::filled(2, 2, 1, 255).unwrap();
        assert!(matches!(
            create_color_layer(&mask, ColorTriplet::new(0, 0, 0), 0, 4),
            Err(RecolorError::InvalidMaskDimensions { width: 0, height: 4 })
        ));
    }

    #[test]
    fn applying_records_region() {
        let mask = RasterImage::filled(2, 2, 1, 255).unwrap();
        let layer =
            ColorLayer::build(Region::Sleeves, &mask, ColorTriplet::new(0, 0, 255), 2, 2).unwrap();
        let mut ctx = RenderContext::new(RasterImage::from_rgba_pixel(2, 2, [255; 4]));
        layer.apply(&mut ctx).unwrap();
        assert_eq!(ctx.applied, vec![Region::Sleeves]);
        assert_eq!(ctx.image.pixel(1, 1), &[0, 0, 255, 255]);
    }
}
