//! garment-recolor: Region-based recoloring for garment mockups
//!
//! This crate recolors a garment template (a photo or render of a blank
//! product) per region, using authored silhouette masks, while keeping the
//! fabric's shading and the garment's outline intact. Every recolor is
//! checked afterwards: the silhouette must not move, and each region's mean
//! color should land near its target.
//!
//! # Example
//!
//! ```no_run
//! use garment_recolor::{ColorSet, LogoBox, RecolorJob, Recolorer};
//!
//! let template = std::fs::read("hoodie.png").unwrap();
//! let body = std::fs::read("hoodie-body.png").unwrap();
//! let sleeves = std::fs::read("hoodie-sleeves.svg").unwrap();
//!
//! let colors = ColorSet::from_hex("#2f4f4f", "#d2b48c", None).unwrap();
//! let recolorer = Recolorer::new(colors).with_logo_boxes([LogoBox::new(410, 220, 96, 64)]);
//!
//! let output = recolorer
//!     .recolor(&RecolorJob::new(&template, &body, &sleeves))
//!     .unwrap();
//! for warning in output.report.warnings() {
//!     eprintln!("{warning}");
//! }
//! std::fs::write("hoodie-recolored.png", &output.png).unwrap();
//! ```
//!
//! # Building Blocks
//!
//! Each stage is also usable on its own:
//!
//! ```
//! use garment_recolor::{
//!     ColorSet, RasterImage, RegionMasks, assert_geometry_locked, recolor_template,
//! };
//!
//! let template = RasterImage::from_rgba_pixel(4, 4, [255, 255, 255, 255]);
//! let template = template.encode_png().unwrap();
//!
//! let colors = ColorSet::from_hex("#112233", "#445566", None).unwrap();
//! let masks = RegionMasks::new(
//!     RasterImage::filled(4, 4, 1, 255).unwrap(),
//!     RasterImage::filled(4, 4, 1, 0).unwrap(),
//! );
//!
//! let recolored = recolor_template(&template, &colors, &masks).unwrap();
//! assert_geometry_locked(&template, &recolored).unwrap();
//! ```
//!
//! # Recipes
//!
//! Colors, logo boxes and guard thresholds can be stored as JSON with
//! [`RecolorRecipe`] and applied through the [`Configurable`] trait.

mod color;
mod compositor;
mod engine;
mod error;
mod guard;
mod layer;
mod mask;
mod profile;
mod raster;
mod region;

pub use color::{ColorTriplet, hex_to_rgb, rgb_distance, rgb_to_hex};
pub use compositor::{recolor_raster, recolor_template};
pub use engine::{Configurable, QualityReport, RecolorJob, RecolorOutput, Recolorer};
pub use error::{ErrorClass, RecolorError, Result};
pub use guard::{
    COLOR_TOLERANCE, ColorPolicy, ColorSample, GEOMETRY_TOLERANCE, GeometryReport, GuardOutcome,
    GuardSettings, SAMPLE_THRESHOLD, assert_color_targets, assert_geometry_locked,
    check_color_targets, check_geometry, sample_region_mean,
};
pub use layer::{
    ColorLayer, LayerEffect, RenderContext, apply_all, composite_multiply, create_color_layer,
    multiply_over,
};
pub use mask::svg::{looks_like_svg, rasterize_svg_mask};
pub use mask::{
    EDITABLE_THRESHOLD, LogoBox, MaskCoverage, apply_logo_boxes, invert_mask,
    load_silhouette_mask, mask_coverage,
};
pub use profile::{ColorSettings, RecolorRecipe};
pub use raster::{RasterImage, RectPx, SizePx};
pub use region::{ColorSet, Region, RegionMasks, ensure_required_regions, paired_regions};
