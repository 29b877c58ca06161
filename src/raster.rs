//! Raster buffers for templates, masks, and color layers.
//!
//! A [`RasterImage`] is a plain `{width, height, channels, bytes}` value in
//! row-major, interleaved-channel order. Pixel math elsewhere in the crate is
//! written as free functions over this struct; the `image` crate is only used
//! at the edges for decoding, encoding, and resizing.

use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{
    DynamicImage, ExtendedColorType, GrayAlphaImage, GrayImage, ImageEncoder, RgbImage, RgbaImage,
};

use crate::error::{RecolorError, Result};

/// A rectangle in pixel coordinates, already clipped to an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    /// X offset from the left edge of the image
    pub x: u32,
    /// Y offset from the top edge of the image
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RectPx {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the right edge coordinate (x + width), exclusive.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Returns the bottom edge coordinate (y + height), exclusive.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of pixels.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns true if either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A decoded bitmap.
///
/// Invariant: `bytes.len() == width * height * channels`, with `channels`
/// in `1..=4` (gray, gray+alpha, RGB, RGBA).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    channels: u8,
    bytes: Vec<u8>,
}

impl RasterImage {
    /// Wraps a raw buffer, checking the length invariant.
    pub fn new(width: u32, height: u32, channels: u8, bytes: Vec<u8>) -> Result<Self> {
        if !(1..=4).contains(&channels) {
            return Err(RecolorError::UnsupportedChannels(channels));
        }
        let expected = width as usize * height as usize * channels as usize;
        if bytes.len() != expected {
            return Err(RecolorError::InvalidBuffer {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            bytes,
        })
    }

    /// Creates an image where every byte is `value`.
    ///
    /// Channel counts outside 1..=4 are rejected the same way [`Self::new`]
    /// rejects them.
    pub fn filled(width: u32, height: u32, channels: u8, value: u8) -> Result<Self> {
        let len = width as usize * height as usize * channels as usize;
        Self::new(width, height, channels, vec![value; len])
    }

    /// Creates an RGBA image with every pixel set to `pixel`.
    pub fn from_rgba_pixel(width: u32, height: u32, pixel: [u8; 4]) -> Self {
        let bytes = pixel.repeat(width as usize * height as usize);
        Self {
            width,
            height,
            channels: 4,
            bytes,
        }
    }

    /// Decodes any format supported by `image`, keeping its channel layout.
    pub fn decode(encoded: &[u8]) -> Result<Self> {
        Ok(Self::from_dynamic(image::load_from_memory(encoded)?))
    }

    /// Decodes and forces four RGBA channels, synthesizing opaque alpha.
    pub fn decode_rgba(encoded: &[u8]) -> Result<Self> {
        let rgba = image::load_from_memory(encoded)?.to_rgba8();
        Ok(Self::from_rgba_image(rgba))
    }

    pub fn from_rgba_image(img: RgbaImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            channels: 4,
            bytes: img.into_raw(),
        }
    }

    /// Converts from `image`'s dynamic representation.
    ///
    /// 8-bit layouts are kept as-is; anything else becomes RGBA8.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        let (channels, bytes) = match img {
            DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (2, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (4, buf.into_raw()),
            other => (4, other.to_rgba8().into_raw()),
        };
        Self {
            width,
            height,
            channels,
            bytes,
        }
    }

    /// Converts to `image`'s dynamic representation.
    pub fn to_dynamic(&self) -> Result<DynamicImage> {
        let (w, h) = (self.width, self.height);
        let bytes = self.bytes.clone();
        let img = match self.channels {
            1 => GrayImage::from_raw(w, h, bytes).map(DynamicImage::ImageLuma8),
            2 => GrayAlphaImage::from_raw(w, h, bytes).map(DynamicImage::ImageLumaA8),
            3 => RgbImage::from_raw(w, h, bytes).map(DynamicImage::ImageRgb8),
            4 => RgbaImage::from_raw(w, h, bytes).map(DynamicImage::ImageRgba8),
            other => return Err(RecolorError::UnsupportedChannels(other)),
        };
        img.ok_or(RecolorError::InvalidBuffer {
            expected: self.size().area() * self.channels as usize,
            actual: self.bytes.len(),
        })
    }

    /// Returns a four-channel copy. Gray is expanded, missing alpha is 255.
    pub fn to_rgba(&self) -> RasterImage {
        if self.channels == 4 {
            return self.clone();
        }
        let mut bytes = Vec::with_capacity(self.size().area() * 4);
        for px in self.pixels() {
            let rgba = match px {
                &[l] => [l, l, l, 255],
                &[l, a] => [l, l, l, a],
                &[r, g, b] => [r, g, b, 255],
                _ => unreachable!("channel count is validated on construction"),
            };
            bytes.extend_from_slice(&rgba);
        }
        Self {
            width: self.width,
            height: self.height,
            channels: 4,
            bytes,
        }
    }

    /// Encodes losslessly as PNG in the image's own channel layout.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let color = match self.channels {
            1 => ExtendedColorType::L8,
            2 => ExtendedColorType::La8,
            3 => ExtendedColorType::Rgb8,
            4 => ExtendedColorType::Rgba8,
            other => return Err(RecolorError::UnsupportedChannels(other)),
        };
        let mut out = Vec::new();
        PngEncoder::new(&mut out).write_image(&self.bytes, self.width, self.height, color)?;
        Ok(out)
    }

    /// Resizes to exactly `width x height` with **nearest-neighbor** sampling.
    ///
    /// The image is scaled to cover the target and center-cropped. Nearest
    /// sampling is required: masks must keep hard 0/255 edges, and any
    /// smoothing filter would invent intermediate intensities that leak into
    /// the alpha of the color layers. Returns a plain copy when the size
    /// already matches.
    pub fn resize_nearest(&self, width: u32, height: u32) -> Result<RasterImage> {
        if self.width == width && self.height == height {
            return Ok(self.clone());
        }
        let resized = self
            .to_dynamic()?
            .resize_to_fill(width, height, FilterType::Nearest);
        Ok(Self::from_dynamic(resized))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn size(&self) -> SizePx {
        SizePx::new(self.width, self.height)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Iterates pixels as channel slices in row-major order.
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.bytes.chunks_exact(self.channels as usize)
    }

    pub fn pixels_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        self.bytes.chunks_exact_mut(self.channels as usize)
    }

    /// Returns the channels of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let start = (y as usize * self.width as usize + x as usize) * self.channels as usize;
        &self.bytes[start..start + self.channels as usize]
    }

    /// Mutable channel access to the pixel at `(x, y)`.
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let channels = self.channels as usize;
        let start = (y as usize * self.width as usize + x as usize) * channels;
        &mut self.bytes[start..start + channels]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_checks_buffer_length() {
        assert!(RasterImage::new(2, 2, 4, vec![0; 16]).is_ok());
        assert!(matches!(
            RasterImage::new(2, 2, 4, vec![0; 15]),
            Err(RecolorError::InvalidBuffer {
                expected: 16,
                actual: 15
            })
        ));
        assert!(matches!(
            RasterImage::new(1, 1, 5, vec![0; 5]),
            Err(RecolorError::UnsupportedChannels(5))
        ));
    }

    #[test]
    fn rect_px_edges() {
        let rect = RectPx::new(10, 20, 100, 200);
        assert_eq!(rect.right(), 110);
        assert_eq!(rect.bottom(), 220);
        assert!(rect.contains(10, 20));
        assert!(!rect.contains(110, 20));
    }

    #[test]
    fn size_px_helpers() {
        assert_eq!(SizePx::new(100, 150).area(), 15_000);
        assert!(SizePx::new(0, 10).is_empty());
        assert!(!SizePx::new(1, 1).is_empty());
    }

    #[test]
    fn filled_rejects_channel_counts_like_new() {
        for channels in [0, 5] {
            assert!(matches!(
                RasterImage::filled(2, 2, channels, 0),
                Err(RecolorError::UnsupportedChannels(c)) if c == channels
            ));
            assert!(matches!(
                RasterImage::new(2, 2, channels, vec![0; 2 * 2 * channels as usize]),
                Err(RecolorError::UnsupportedChannels(c)) if c == channels
            ));
        }
        assert_eq!(RasterImage::filled(2, 1, 3, 9).unwrap().bytes(), &[9; 6]);
    }

    #[test]
    fn png_roundtrip_keeps_layout() {
        let mut img = RasterImage::filled(3, 2, 2, 0).unwrap();
        img.pixel_mut(2, 1).copy_from_slice(&[200, 17]);
        let decoded = RasterImage::decode(&img.encode_png().unwrap()).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn decode_rgba_synthesizes_alpha() {
        let gray = RasterImage::filled(2, 2, 1, 90).unwrap();
        let rgba = RasterImage::decode_rgba(&gray.encode_png().unwrap()).unwrap();
        assert_eq!(rgba.channels(), 4);
        assert_eq!(rgba.pixel(1, 1), &[90, 90, 90, 255]);
    }

    #[test]
    fn to_rgba_expands_gray() {
        let img = RasterImage::new(1, 1, 2, vec![40, 7]).unwrap();
        assert_eq!(img.to_rgba().bytes(), &[40, 40, 40, 7]);
    }

    #[test]
    fn nearest_resize_never_invents_values() {
        // Hard-edged checkerboard of 0/255 upscaled by a non-integer factor.
        let mut mask = RasterImage::filled(4, 4, 1, 0).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                if (x + y) % 2 == 0 {
                    mask.pixel_mut(x, y)[0] = 255;
                }
            }
        }
        let resized = mask.resize_nearest(10, 10).unwrap();
        assert_eq!(resized.size(), SizePx::new(10, 10));
        assert!(resized.bytes().iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn resize_to_same_size_is_identity() {
        let img = RasterImage::from_rgba_pixel(3, 3, [1, 2, 3, 4]);
        assert_eq!(img.resize_nearest(3, 3).unwrap(), img);
    }
}
