//! Silhouette lock: comparing alpha channels before and after recoloring.

use serde::Serialize;

use super::{GEOMETRY_TOLERANCE, GuardOutcome};
use crate::error::{RecolorError, Result};
use crate::raster::RasterImage;

/// Alpha comparison between a template and its recolored result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryReport {
    pub width: u32,
    pub height: u32,
    /// Pixels whose alpha differs.
    pub mismatched: usize,
    pub total: usize,
    /// `mismatched / total`.
    pub ratio: f64,
    pub tolerance: f64,
    pub outcome: GuardOutcome,
}

/// Compares alpha pixel by pixel. Images without alpha are treated as opaque.
///
/// The outcome is [`GuardOutcome::Fatal`] when dimensions differ or when the
/// mismatch ratio exceeds `tolerance`; it is never a warning.
pub fn check_geometry(base: &RasterImage, result: &RasterImage, tolerance: f64) -> GeometryReport {
    let (width, height) = (base.width(), base.height());
    let total = base.size().area();

    if base.size() != result.size() {
        let reason = format!(
            "dimensions differ: {}x{} before, {}x{} after",
            width,
            height,
            result.width(),
            result.height()
        );
        return GeometryReport {
            width,
            height,
            mismatched: total,
            total,
            ratio: 1.0,
            tolerance,
            outcome: GuardOutcome::Fatal(reason),
        };
    }

    let base = base.to_rgba();
    let result = result.to_rgba();
    let mismatched = base
        .bytes()
        .iter()
        .skip(3)
        .step_by(4)
        .zip(result.bytes().iter().skip(3).step_by(4))
        .filter(|(a, b)| a != b)
        .count();

    let ratio = if total == 0 {
        0.0
    } else {
        mismatched as f64 / total as f64
    };

    let outcome = if ratio > tolerance {
        GuardOutcome::Fatal(format!(
            "{mismatched} of {total} pixels changed alpha ({:.3}% > {:.3}%)",
            ratio * 100.0,
            tolerance * 100.0
        ))
    } else {
        GuardOutcome::Ok
    };

    GeometryReport {
        width,
        height,
        mismatched,
        total,
        ratio,
        tolerance,
        outcome,
    }
}

/// Decodes both images with forced alpha and fails with
/// [`RecolorError::GeometryChanged`] if more than 0.5% of pixels changed
/// opacity, or if the dimensions differ.
pub fn assert_geometry_locked(base_bytes: &[u8], result_bytes: &[u8]) -> Result<()> {
    let base = RasterImage::decode_rgba(base_bytes)?;
    let result = RasterImage::decode_rgba(result_bytes)?;
    let report = check_geometry(&base, &result, GEOMETRY_TOLERANCE);
    match report.outcome {
        GuardOutcome::Fatal(reason) => Err(RecolorError::GeometryChanged(reason)),
        _ => Ok(()),
    }
}
