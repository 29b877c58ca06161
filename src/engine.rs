//! Recolor engine: the full load, protect, composite and verify sequence.

use serde::Serialize;

use crate::compositor::recolor_raster;
use crate::error::{RecolorError, Result};
use crate::guard::{
    ColorPolicy, ColorSample, GeometryReport, GuardOutcome, GuardSettings, check_color_targets,
    check_geometry,
};
use crate::mask::{LogoBox, apply_logo_boxes, load_silhouette_mask};
use crate::profile::{ColorSettings, RecolorRecipe};
use crate::raster::{RasterImage, SizePx};
use crate::region::{ColorSet, Region, RegionMasks};

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from a [`RecolorRecipe`].
pub trait Configurable {
    /// Applies a recipe's settings to this instance.
    ///
    /// Fails without changing anything if the recipe's colors are malformed.
    fn apply_profile(&mut self, profile: &RecolorRecipe) -> Result<()>;

    /// Exports the current settings as a recipe.
    fn export_profile(&self) -> RecolorRecipe;
}

// ============================================================================
// Job and Output
// ============================================================================

/// Encoded input buffers for one recolor.
///
/// Masks are silhouette masks as authored (white = locked, black =
/// editable); the engine inverts them. Each may be PNG (or any raster codec
/// `image` reads) or SVG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecolorJob<'a> {
    pub template: &'a [u8],
    pub body: Option<&'a [u8]>,
    pub sleeves: Option<&'a [u8]>,
    pub trims: Option<&'a [u8]>,
}

impl<'a> RecolorJob<'a> {
    pub fn new(template: &'a [u8], body: &'a [u8], sleeves: &'a [u8]) -> Self {
        Self {
            template,
            body: Some(body),
            sleeves: Some(sleeves),
            trims: None,
        }
    }

    pub fn with_trims(mut self, trims: &'a [u8]) -> Self {
        self.trims = Some(trims);
        self
    }

    fn mask(&self, region: Region) -> Option<&'a [u8]> {
        match region {
            Region::Body => self.body,
            Region::Sleeves => self.sleeves,
            Region::Trims => self.trims,
        }
    }
}

/// Guard results for one recolor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub geometry: GeometryReport,
    pub colors: Vec<ColorSample>,
}

impl QualityReport {
    /// The most severe outcome across all guards.
    pub fn outcome(&self) -> GuardOutcome {
        self.colors
            .iter()
            .map(|sample| sample.outcome.clone())
            .fold(self.geometry.outcome.clone(), GuardOutcome::worst)
    }

    pub fn has_warnings(&self) -> bool {
        self.colors.iter().any(|s| s.outcome.is_warning()) || self.geometry.outcome.is_warning()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        std::iter::once(&self.geometry.outcome)
            .chain(self.colors.iter().map(|s| &s.outcome))
            .filter(|o| o.is_warning())
            .filter_map(GuardOutcome::reason)
    }
}

/// A recolored PNG together with the guard results that vetted it.
#[derive(Debug, Clone)]
pub struct RecolorOutput {
    /// PNG-encoded RGBA image.
    pub png: Vec<u8>,
    pub report: QualityReport,
}

// ============================================================================
// Recolorer
// ============================================================================

/// Main recolor engine.
///
/// `Recolorer` holds the target colors, the protected logo boxes and the
/// guard thresholds; each [`RecolorJob`] supplies only the buffers.
///
/// # Sequence
///
/// 1. Required regions (body and sleeves, mask and color) are checked
///    before anything is decoded
/// 2. The template is decoded to RGBA
/// 3. Silhouette masks are loaded at template size, then logo boxes locked
/// 4. Layers are multiplied onto the template (body, sleeves, trims)
/// 5. The geometry guard runs; a moved silhouette is an error
/// 6. The color guard runs; drift is reported, and is an error only under
///    [`ColorPolicy::Reject`]
///
/// # Example
///
/// ```no_run
/// use garment_recolor::{ColorSet, RecolorJob, Recolorer};
///
/// let template = std::fs::read("tee.png").unwrap();
/// let body = std::fs::read("tee-body.png").unwrap();
/// let sleeves = std::fs::read("tee-sleeves.png").unwrap();
///
/// let colors = ColorSet::from_hex("#1b2a49", "#f4f4f4", None).unwrap();
/// let output = Recolorer::new(colors)
///     .recolor(&RecolorJob::new(&template, &body, &sleeves))
///     .unwrap();
/// assert!(output.report.outcome().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recolorer {
    pub colors: ColorSet,
    pub logo_boxes: Vec<LogoBox>,
    pub settings: GuardSettings,
}

impl Recolorer {
    /// Creates an engine with default guard settings and no logo boxes.
    pub fn new(colors: ColorSet) -> Self {
        Self {
            colors,
            ..Default::default()
        }
    }

    /// Creates an engine from a recipe.
    pub fn from_recipe(recipe: &RecolorRecipe) -> Result<Self> {
        let mut recolorer = Self::default();
        recolorer.apply_profile(recipe)?;
        Ok(recolorer)
    }

    pub fn with_settings(mut self, settings: GuardSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_logo_boxes(mut self, boxes: impl IntoIterator<Item = LogoBox>) -> Self {
        self.logo_boxes.extend(boxes);
        self
    }

    /// Runs a recolor job end to end.
    ///
    /// # Errors
    ///
    /// - [`RecolorError::MissingRegion`] before any decoding.
    /// - Input errors from decoding the template or loading masks.
    /// - [`RecolorError::GeometryChanged`] if the silhouette moved.
    /// - [`RecolorError::ColorOutOfTolerance`] only under [`ColorPolicy::Reject`].
    #[tracing::instrument(skip_all, fields(logo_boxes = self.logo_boxes.len()))]
    pub fn recolor(&self, job: &RecolorJob<'_>) -> Result<RecolorOutput> {
        let settings = self.settings.sanitized();
        self.ensure_required(job)?;

        let template = RasterImage::decode_rgba(job.template)?;
        let size = template.size();
        if size.is_empty() {
            return Err(RecolorError::InvalidTemplateDimensions {
                width: size.width,
                height: size.height,
            });
        }

        let masks = self.load_masks(job, size)?;
        let recolored = recolor_raster(&template, &self.colors, &masks)?;

        let geometry = check_geometry(&template, &recolored, settings.geometry_tolerance);
        if let GuardOutcome::Fatal(reason) = &geometry.outcome {
            tracing::error!(ratio = geometry.ratio, "{reason}");
            return Err(RecolorError::geometry(reason.clone()));
        }

        let colors = check_color_targets(&recolored, &masks, &self.colors, &settings)?;
        if settings.color_policy == ColorPolicy::Reject {
            if let Some(sample) = colors.iter().find(|s| s.outcome.is_fatal()) {
                return Err(RecolorError::ColorOutOfTolerance {
                    region: sample.region,
                    distance: sample.distance.unwrap_or(f64::INFINITY),
                    tolerance: settings.color_tolerance,
                });
            }
        }

        let png = recolored.encode_png()?;
        let report = QualityReport { geometry, colors };
        tracing::debug!(
            width = size.width,
            height = size.height,
            warnings = report.warnings().count(),
            "recolor finished"
        );
        Ok(RecolorOutput { png, report })
    }

    fn ensure_required(&self, job: &RecolorJob<'_>) -> Result<()> {
        for region in Region::ALL.into_iter().filter(Region::is_required) {
            if job.mask(region).is_none() || self.colors.get(region).is_none() {
                return Err(RecolorError::MissingRegion(region));
            }
        }
        Ok(())
    }

    /// Loads, inverts and logo-protects every mask that will be used.
    ///
    /// An optional region needs both its mask and its color; a lone half is
    /// never decoded.
    fn load_masks(&self, job: &RecolorJob<'_>, size: SizePx) -> Result<RegionMasks> {
        let mut masks = RegionMasks::default();
        for region in Region::ALL {
            let Some(bytes) = job.mask(region) else {
                continue;
            };
            if self.colors.get(region).is_none() {
                tracing::debug!(%region, "mask supplied without a color, not loading");
                continue;
            }

            let mask = load_silhouette_mask(bytes, size.width, size.height)?;
            let mask = apply_logo_boxes(&mask, &self.logo_boxes);
            match region {
                Region::Body => masks.body = Some(mask),
                Region::Sleeves => masks.sleeves = Some(mask),
                Region::Trims => masks.trims = Some(mask),
            }
        }
        Ok(masks)
    }
}

impl Configurable for Recolorer {
    /// Applies colors, logo boxes and guard thresholds from a recipe.
    ///
    /// # Example
    ///
    /// ```
    /// use garment_recolor::{ColorSettings, Configurable, RecolorRecipe, Recolorer};
    ///
    /// let mut recolorer = Recolorer::default();
    /// let recipe = RecolorRecipe::new(ColorSettings::new("#ff0000", "#00ff00"));
    /// recolorer.apply_profile(&recipe).unwrap();
    /// assert!(recolorer.colors.primary.is_some());
    /// ```
    fn apply_profile(&mut self, profile: &RecolorRecipe) -> Result<()> {
        self.colors = profile.color_set()?;
        self.logo_boxes = profile.logo_boxes.clone();
        self.settings = profile.guard_settings();
        Ok(())
    }

    fn export_profile(&self) -> RecolorRecipe {
        RecolorRecipe {
            colors: ColorSettings::from(&self.colors),
            logo_boxes: self.logo_boxes.clone(),
            guards: Some(self.settings),
        }
    }
}
