//! SVG silhouette rasterization using resvg/usvg.
//!
//! Silhouettes authored as vector art are rendered straight at the template
//! size, so they never go through a resize step.

use image::{DynamicImage, RgbaImage};
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{Options, ShapeRendering, Tree};

use crate::error::{RecolorError, Result};
use crate::raster::RasterImage;

/// Returns true if the buffer looks like SVG markup rather than a raster codec.
pub fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(512)]);
    let text = head.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// Renders an SVG silhouette to a single-channel mask of exactly
/// `width x height`.
///
/// The drawing is scaled to cover the target and centered, matching the
/// cover fit used for raster masks. Unpainted areas are white, since
/// silhouettes are authored as black shapes on white. Anti-aliasing is turned
/// off so edges stay hard.
pub fn rasterize_svg_mask(svg_data: &[u8], width: u32, height: u32) -> Result<RasterImage> {
    let mut opts = Options::default();
    opts.shape_rendering = ShapeRendering::CrispEdges;
    let tree = Tree::from_data(svg_data, &opts).map_err(|e| RecolorError::svg(e.to_string()))?;

    let mut pixmap = Pixmap::new(width, height).ok_or(RecolorError::InvalidMaskDimensions {
        width,
        height,
    })?;
    pixmap.fill(Color::WHITE);

    let svg_size = tree.size();
    let scale = (width as f32 / svg_size.width()).max(height as f32 / svg_size.height());
    let tx = (width as f32 - svg_size.width() * scale) / 2.0;
    let ty = (height as f32 - svg_size.height() * scale) / 2.0;
    let transform = Transform::from_row(scale, 0.0, 0.0, scale, tx, ty);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap_to_luma(pixmap)
}

/// Converts an opaque tiny_skia pixmap into a one-channel luma raster.
///
/// The pixmap is filled opaque before rendering, so its premultiplied bytes
/// are already straight RGBA.
fn pixmap_to_luma(pixmap: Pixmap) -> Result<RasterImage> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let rgba = RgbaImage::from_raw(width, height, pixmap.take()).ok_or(
        RecolorError::InvalidBuffer {
            expected: width as usize * height as usize * 4,
            actual: 0,
        },
    )?;
    let luma = DynamicImage::ImageRgba8(rgba).to_luma8();
    Ok(RasterImage::from_dynamic(DynamicImage::ImageLuma8(luma)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect x="0" y="0" width="5" height="10" fill="#000000"/></svg>"##;

    #[test]
    fn detects_svg_markup() {
        assert!(looks_like_svg(SQUARE_SVG.as_bytes()));
        assert!(looks_like_svg(
            b"\n  <?xml version=\"1.0\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\"/>"
        ));
        assert!(!looks_like_svg(b"\x89PNG\r\n\x1a\n"));
        assert!(!looks_like_svg(b"<html></html>"));
    }

    #[test]
    fn renders_black_shape_on_white() {
        let mask = rasterize_svg_mask(SQUARE_SVG.as_bytes(), 20, 20).unwrap();
        assert_eq!(mask.channels(), 1);
        assert_eq!((mask.width(), mask.height()), (20, 20));
        assert_eq!(mask.pixel(2, 10), &[0]);
        assert_eq!(mask.pixel(17, 10), &[255]);
    }

    #[test]
    fn crisp_edges_are_binary() {
        let circle = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><circle cx="5" cy="5" r="3.3" fill="#000"/></svg>"##;
        let mask = rasterize_svg_mask(circle.as_bytes(), 37, 37).unwrap();
        assert!(mask.bytes().iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn invalid_svg_is_an_error() {
        assert!(matches!(
            rasterize_svg_mask(b"<svg", 4, 4),
            Err(RecolorError::Svg(_))
        ));
    }
}
