//! Advisory check that each recolored region landed near its target color.

use serde::Serialize;

use super::{ColorPolicy, GuardOutcome, GuardSettings};
use crate::color::{ColorTriplet, rgb_distance};
use crate::error::{RecolorError, Result};
use crate::raster::RasterImage;
use crate::region::{ColorSet, Region, RegionMasks, paired_regions};

/// Sampled mean color of one region compared against its target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorSample {
    pub region: Region,
    pub target: ColorTriplet,
    /// Mean RGB over the sampled pixels, `None` if nothing was sampled.
    pub mean: Option<[f64; 3]>,
    pub pixels: usize,
    /// Euclidean RGB distance between `mean` and `target`.
    pub distance: Option<f64>,
    /// CIEDE2000 between the rounded mean and `target`. Diagnostic only.
    pub delta_e: Option<f32>,
    pub outcome: GuardOutcome,
}

/// Averages the RGB of `result` over pixels where `mask` channel 0 is
/// strictly above `threshold`.
///
/// The mask is fitted to the result with nearest-neighbor resizing so no
/// interpolated edge values leak into the sample set.
pub fn sample_region_mean(
    result: &RasterImage,
    mask: &RasterImage,
    threshold: u8,
) -> Result<(Option<[f64; 3]>, usize)> {
    if mask.size().is_empty() {
        return Err(RecolorError::InvalidMaskDimensions {
            width: mask.width(),
            height: mask.height(),
        });
    }
    let mask = mask.resize_nearest(result.width(), result.height())?;
    let result = result.to_rgba();

    let mut sum = [0u64; 3];
    let mut count = 0usize;
    for (px, m) in result.pixels().zip(mask.pixels()) {
        if m[0] > threshold {
            sum[0] += px[0] as u64;
            sum[1] += px[1] as u64;
            sum[2] += px[2] as u64;
            count += 1;
        }
    }

    if count == 0 {
        return Ok((None, 0));
    }
    let n = count as f64;
    Ok((
        Some([sum[0] as f64 / n, sum[1] as f64 / n, sum[2] as f64 / n]),
        count,
    ))
}

/// Samples every region that has both a mask and a color.
///
/// Drift past `settings.color_tolerance` is a [`GuardOutcome::Warning`]
/// under [`ColorPolicy::Warn`] and [`GuardOutcome::Fatal`] under
/// [`ColorPolicy::Reject`]. Either way this function only reports; deciding
/// what a fatal sample means is left to the caller.
pub fn check_color_targets(
    result: &RasterImage,
    masks: &RegionMasks,
    colors: &ColorSet,
    settings: &GuardSettings,
) -> Result<Vec<ColorSample>> {
    paired_regions(colors, masks)
        .into_iter()
        .map(|(region, mask, target)| {
            let (mean, pixels) = sample_region_mean(result, mask, settings.sample_threshold)?;
            Ok(evaluate(region, target, mean, pixels, settings))
        })
        .collect()
}

fn evaluate(
    region: Region,
    target: ColorTriplet,
    mean: Option<[f64; 3]>,
    pixels: usize,
    settings: &GuardSettings,
) -> ColorSample {
    let Some(mean) = mean else {
        tracing::warn!(%region, "no pixels above the sample threshold, skipping color check");
        return ColorSample {
            region,
            target,
            mean: None,
            pixels,
            distance: None,
            delta_e: None,
            outcome: GuardOutcome::Warning(format!("{region}: no pixels to sample")),
        };
    };

    let expected = [target.r as f64, target.g as f64, target.b as f64];
    let distance = rgb_distance(mean, expected);
    let rounded = ColorTriplet::new(
        mean[0].round() as u8,
        mean[1].round() as u8,
        mean[2].round() as u8,
    );
    let delta_e = rounded.delta_e(&target);

    let outcome = if distance > settings.color_tolerance {
        tracing::warn!(
            %region,
            target = %target,
            mean = %rounded,
            distance,
            tolerance = settings.color_tolerance,
            "region color drifted from target"
        );
        let reason = format!(
            "{region}: mean {rounded} is {distance:.1} from {target} (tolerance {})",
            settings.color_tolerance
        );
        match settings.color_policy {
            ColorPolicy::Warn => GuardOutcome::Warning(reason),
            ColorPolicy::Reject => GuardOutcome::Fatal(reason),
        }
    } else {
        GuardOutcome::Ok
    };

    ColorSample {
        region,
        target,
        mean: Some(mean),
        pixels,
        distance: Some(distance),
        delta_e: Some(delta_e),
        outcome,
    }
}

/// Decodes `result_bytes` and runs [`check_color_targets`] with default
/// settings.
///
/// Color drift never produces an error here; only decode and resize
/// failures do.
pub fn assert_color_targets(
    result_bytes: &[u8],
    masks: &RegionMasks,
    colors: &ColorSet,
) -> Result<Vec<ColorSample>> {
    let result = RasterImage::decode_rgba(result_bytes)?;
    check_color_targets(&result, masks, colors, &GuardSettings::default())
}
