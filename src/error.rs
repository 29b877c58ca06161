//! Error type shared by every stage of the recoloring pipeline.

use crate::region::Region;

pub type Result<T> = std::result::Result<T, RecolorError>;

/// Broad category of a [`RecolorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad caller input, raised before any compositing happens.
    Input,
    /// The pipeline produced an output that must be discarded.
    Invariant,
}

#[derive(thiserror::Error, Debug)]
pub enum RecolorError {
    #[error("invalid color format: {0:?} (expected #RRGGBB)")]
    InvalidColorFormat(String),

    #[error("invalid template dimensions: {width}x{height}")]
    InvalidTemplateDimensions { width: u32, height: u32 },

    #[error("invalid mask dimensions: {width}x{height}")]
    InvalidMaskDimensions { width: u32, height: u32 },

    #[error("missing required region: {0}")]
    MissingRegion(Region),

    #[error("raster buffer holds {actual} bytes, expected {expected}")]
    InvalidBuffer { expected: usize, actual: usize },

    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(u8),

    #[error("svg mask error: {0}")]
    Svg(String),

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("geometry changed: {0}")]
    GeometryChanged(String),

    #[error("color out of tolerance for {region}: distance {distance:.1} > {tolerance:.1}")]
    ColorOutOfTolerance {
        region: Region,
        distance: f64,
        tolerance: f64,
    },
}

impl RecolorError {
    pub fn svg(msg: impl Into<String>) -> Self {
        Self::Svg(msg.into())
    }

    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::GeometryChanged(msg.into())
    }

    /// Classifies the error for callers deciding whether the output is usable.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::GeometryChanged(_) | Self::ColorOutOfTolerance { .. } => ErrorClass::Invariant,
            _ => ErrorClass::Input,
        }
    }
}
