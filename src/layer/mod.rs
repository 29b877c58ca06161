//! Color layers and the context they are composited through.
//!
//! # Architecture
//!
//! Each layer implements [`LayerEffect`], which defines:
//! - How the layer transforms the working image
//! - What it records for later stages once applied
//!
//! The working image flows through the layers inside a [`RenderContext`].
//! Layers are applied strictly in sequence; each one blends against the
//! output of the previous one, never against the pristine template.

pub mod blend;
pub mod color;

pub use blend::{composite_multiply, multiply_over};
pub use color::{ColorLayer, create_color_layer};

use crate::error::Result;
use crate::raster::RasterImage;
use crate::region::Region;

// ============================================================================
// Render Context
// ============================================================================

/// Context that flows through the compositing sequence.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// The RGBA image being composited.
    pub image: RasterImage,

    /// Regions whose layers have been applied, in order.
    pub applied: Vec<Region>,
}

impl RenderContext {
    /// Creates a context around the working image (expanded to RGBA).
    pub fn new(image: RasterImage) -> Self {
        Self {
            image: image.to_rgba(),
            applied: Vec::new(),
        }
    }

    /// Consumes the context, returning the composited image.
    pub fn into_image(self) -> RasterImage {
        self.image
    }
}

// ============================================================================
// Layer Trait
// ============================================================================

/// A layer that knows how to apply itself to a [`RenderContext`].
///
/// The separation of [`transform`](Self::transform) and [`emit`](Self::emit)
/// keeps bookkeeping out of the pixel math.
pub trait LayerEffect {
    /// Transforms the image in the render context.
    fn transform(&self, ctx: &mut RenderContext) -> Result<()>;

    /// Records what this layer did. Called after a successful transform.
    fn emit(&self, _ctx: &mut RenderContext) {}

    /// Transforms, then emits.
    fn apply(&self, ctx: &mut RenderContext) -> Result<()> {
        self.transform(ctx)?;
        self.emit(ctx);
        Ok(())
    }
}

/// Applies `layers` to `ctx` in slice order.
pub fn apply_all<L: LayerEffect>(ctx: &mut RenderContext, layers: &[L]) -> Result<()> {
    layers.iter().try_for_each(|layer| layer.apply(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorTriplet;

    #[test]
    fn context_expands_to_rgba() {
        let ctx = RenderContext::new(RasterImage::filled(2, 2, 3, 10).unwrap());
        assert_eq!(ctx.image.channels(), 4);
        assert_eq!(ctx.image.pixel(0, 0), &[10, 10, 10, 255]);
        assert!(ctx.applied.is_empty());
    }

    #[test]
    fn later_layers_blend_against_earlier_output() {
        // Two half-opaque gray layers over white: the second one multiplies
        // the already-darkened result, so the order accumulates.
        let mask = RasterImage::filled(1, 1, 1, 128).unwrap();
        let gray = ColorTriplet::new(128, 128, 128);
        let layers = [
            ColorLayer::build(Region::Body, &mask, gray, 1, 1).unwrap(),
            ColorLayer::build(Region::Sleeves, &mask, gray, 1, 1).unwrap(),
        ];

        let mut once = RenderContext::new(RasterImage::from_rgba_pixel(1, 1, [255; 4]));
        layers[0].apply(&mut once).unwrap();

        let mut twice = RenderContext::new(RasterImage::from_rgba_pixel(1, 1, [255; 4]));
        apply_all(&mut twice, &layers).unwrap();

        assert!(twice.image.pixel(0, 0)[0] < once.image.pixel(0, 0)[0]);
        assert_eq!(twice.applied, vec![Region::Body, Region::Sleeves]);
    }
}
