//! Logo protection: forcing rectangles of a mask to the locked value.

use serde::{Deserialize, Serialize};

use crate::raster::{RasterImage, RectPx, SizePx};

/// A rectangle, in template pixel coordinates, that must stay byte-identical
/// to the template.
///
/// Coordinates are not validated; boxes may extend past the image or cover
/// all of it, and are clamped before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct LogoBox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl LogoBox {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Clamps `[x, x+w) x [y, y+h)` to `[0, width) x [0, height)`.
    ///
    /// Returns `None` when nothing of the box lies inside the image.
    pub fn clamp_to(&self, size: SizePx) -> Option<RectPx> {
        let x0 = i64::from(self.x).clamp(0, i64::from(size.width));
        let y0 = i64::from(self.y).clamp(0, i64::from(size.height));
        let x1 = (i64::from(self.x) + i64::from(self.w)).clamp(0, i64::from(size.width));
        let y1 = (i64::from(self.y) + i64::from(self.h)).clamp(0, i64::from(size.height));

        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(RectPx::new(
            x0 as u32,
            y0 as u32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        ))
    }
}

/// Returns a copy of `mask` with every box painted to 0 (locked) on all
/// channels.
///
/// The input is never modified. Overlapping boxes are harmless, and an empty
/// `boxes` slice yields an unchanged copy.
pub fn apply_logo_boxes(mask: &RasterImage, boxes: &[LogoBox]) -> RasterImage {
    let mut protected = mask.clone();
    if boxes.is_empty() {
        return protected;
    }

    let size = mask.size();
    let channels = mask.channels() as usize;
    let row_stride = size.width as usize * channels;

    for logo in boxes {
        let Some(rect) = logo.clamp_to(size) else {
            tracing::debug!(?logo, "logo box lies outside the mask, skipping");
            continue;
        };

        let bytes = protected.bytes_mut();
        for y in rect.y..rect.bottom() {
            let row = y as usize * row_stride;
            let start = row + rect.x as usize * channels;
            let end = row + rect.right() as usize * channels;
            bytes[start..end].fill(0);
        }
    }

    protected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_image_bounds() {
        let size = SizePx::new(10, 8);
        assert_eq!(
            LogoBox::new(-3, 2, 5, 100).clamp_to(size),
            Some(RectPx::new(0, 2, 2, 6))
        );
        assert_eq!(
            LogoBox::new(0, 0, 10, 8).clamp_to(size),
            Some(RectPx::new(0, 0, 10, 8))
        );
        assert_eq!(LogoBox::new(10, 0, 4, 4).clamp_to(size), None);
        assert_eq!(LogoBox::new(2, 2, 0, 4).clamp_to(size), None);
        assert_eq!(LogoBox::new(2, 2, -4, 4).clamp_to(size), None);
        assert_eq!(
            LogoBox::new(i32::MAX, 0, i32::MAX, 1).clamp_to(size),
            None
        );
    }

    #[test]
    fn paints_box_to_zero_on_every_channel() {
        let mask = RasterImage::filled(6, 4, 2, 255).unwrap();
        let protected = apply_logo_boxes(&mask, &[LogoBox::new(1, 1, 2, 2)]);

        for y in 0..4 {
            for x in 0..6 {
                let expected: &[u8] = if (1..3).contains(&x) && (1..3).contains(&y) {
                    &[0, 0]
                } else {
                    &[255, 255]
                };
                assert_eq!(protected.pixel(x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn input_is_untouched() {
        let mask = RasterImage::filled(4, 4, 1, 255).unwrap();
        let before = mask.clone();
        let _ = apply_logo_boxes(&mask, &[LogoBox::new(0, 0, 4, 4)]);
        assert_eq!(mask, before);
    }

    #[test]
    fn empty_boxes_is_a_copy() {
        let mask = RasterImage::filled(3, 3, 1, 128).unwrap();
        assert_eq!(apply_logo_boxes(&mask, &[]), mask);
    }

    #[test]
    fn overlapping_boxes_are_idempotent() {
        let mask = RasterImage::filled(8, 8, 1, 255).unwrap();
        let once = apply_logo_boxes(&mask, &[LogoBox::new(2, 2, 4, 4)]);
        let twice = apply_logo_boxes(
            &mask,
            &[LogoBox::new(2, 2, 4, 4), LogoBox::new(3, 3, 3, 3), LogoBox::new(2, 2, 4, 4)],
        );
        assert_eq!(once, twice);
    }

    #[test]
    fn box_covering_everything_locks_the_mask() {
        let mask = RasterImage::filled(5, 5, 1, 255).unwrap();
        let protected = apply_logo_boxes(&mask, &[LogoBox::new(-10, -10, 100, 100)]);
        assert!(protected.bytes().iter().all(|&v| v == 0));
    }
}
