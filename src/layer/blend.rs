//! Multiply-blend compositing.

use crate::error::{RecolorError, Result};
use crate::raster::RasterImage;

/// Multiplies a straight-alpha RGBA source pixel onto a destination pixel.
///
/// The blend function is `B(cb, cs) = cb * cs`, mixed by the source alpha:
///
/// ```text
/// co = cb * (1 - as) + cb * cs * as
/// ao = ab
/// ```
///
/// Texture and shading survive while the hue moves toward the source. The
/// destination alpha is returned untouched, so partially transparent
/// template pixels (anti-aliased edges, soft shadows) keep their exact
/// opacity. A source with zero alpha returns `dst` unchanged, bit for bit.
pub fn multiply_over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    if src[3] == 0 {
        return dst;
    }

    let sa = src[3] as f32 / 255.0;
    let blend = |s: u8, d: u8| -> u8 {
        let cs = s as f32 / 255.0;
        let cb = d as f32 / 255.0;
        let out = cb * (1.0 - sa) + cb * cs * sa;
        (out * 255.0).round().clamp(0.0, 255.0) as u8
    };

    [
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        dst[3],
    ]
}

/// Multiplies `layer` onto `dest` in place. Both must be RGBA of equal size.
pub fn composite_multiply(dest: &mut RasterImage, layer: &RasterImage) -> Result<()> {
    if dest.channels() != 4 || layer.channels() != 4 {
        return Err(RecolorError::UnsupportedChannels(
            dest.channels().min(layer.channels()),
        ));
    }
    if dest.size() != layer.size() {
        return Err(RecolorError::InvalidMaskDimensions {
            width: layer.width(),
            height: layer.height(),
        });
    }

    for (d, s) in dest.pixels_mut().zip(layer.pixels()) {
        let out = multiply_over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_color_over_white_is_the_color() {
        assert_eq!(
            multiply_over([255, 255, 255, 255], [0x11, 0x22, 0x33, 255]),
            [0x11, 0x22, 0x33, 255]
        );
    }

    #[test]
    fn multiply_darkens_and_keeps_shading() {
        // Mid-gray fabric under full red: red channel keeps the shading.
        assert_eq!(
            multiply_over([128, 128, 128, 255], [255, 0, 0, 255]),
            [128, 0, 0, 255]
        );
        let light = multiply_over([200, 200, 200, 255], [100, 150, 200, 255]);
        let dark = multiply_over([50, 50, 50, 255], [100, 150, 200, 255]);
        assert!(light.iter().zip(dark.iter()).take(3).all(|(l, d)| l > d));
    }

    #[test]
    fn transparent_source_is_a_no_op() {
        let dst = [13, 77, 201, 255];
        assert_eq!(multiply_over(dst, [255, 0, 0, 0]), dst);
        let clear = [9, 8, 7, 0];
        assert_eq!(multiply_over(clear, [1, 2, 3, 0]), clear);
    }

    #[test]
    fn half_alpha_mixes_halfway() {
        let out = multiply_over([200, 200, 200, 255], [0, 0, 0, 128]);
        // 200 * (1 - 128/255) ~= 99.6
        assert_eq!(out, [100, 100, 100, 255]);
    }

    #[test]
    fn destination_alpha_is_never_changed() {
        for da in [0u8, 1, 128, 254, 255] {
            for sa in [1u8, 64, 200, 255] {
                assert_eq!(multiply_over([90, 90, 90, da], [10, 20, 30, sa])[3], da);
            }
        }
    }

    #[test]
    fn composite_checks_sizes() {
        let mut dest = RasterImage::from_rgba_pixel(2, 2, [255; 4]);
        let layer = RasterImage::from_rgba_pixel(3, 2, [0, 0, 0, 255]);
        assert!(composite_multiply(&mut dest, &layer).is_err());

        let gray = RasterImage::filled(2, 2, 1, 0).unwrap();
        assert!(matches!(
            composite_multiply(&mut dest, &gray),
            Err(RecolorError::UnsupportedChannels(1))
        ));
    }

    #[test]
    fn composite_multiply_applies_per_pixel() {
        let mut dest = RasterImage::from_rgba_pixel(2, 1, [255, 255, 255, 255]);
        let mut layer = RasterImage::from_rgba_pixel(2, 1, [0, 255, 0, 255]);
        layer.pixel_mut(1, 0)[3] = 0;
        composite_multiply(&mut dest, &layer).unwrap();
        assert_eq!(dest.pixel(0, 0), &[0, 255, 0, 255]);
        assert_eq!(dest.pixel(1, 0), &[255, 255, 255, 255]);
    }
}
