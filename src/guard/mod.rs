//! Post-hoc correctness guards.
//!
//! Geometry is a hard invariant: a recolor that moves the silhouette is
//! unusable. Color accuracy is advisory: a drifted mean color is worth a
//! second look but the output stays valid. Both guards report a
//! [`GuardOutcome`] so callers can tell the two apart without matching on
//! error types.

pub mod color;
pub mod geometry;

pub use color::{ColorSample, assert_color_targets, check_color_targets, sample_region_mean};
pub use geometry::{GeometryReport, assert_geometry_locked, check_geometry};

use serde::{Deserialize, Serialize};

/// Maximum fraction of pixels whose alpha may differ between template and result.
pub const GEOMETRY_TOLERANCE: f64 = 0.005;

/// Maximum Euclidean RGB distance between a region's mean color and its target.
pub const COLOR_TOLERANCE: f64 = 50.0;

/// Mask channel-0 values strictly above this are sampled by the color guard.
pub const SAMPLE_THRESHOLD: u8 = 200;

// ============================================================================
// GuardOutcome
// ============================================================================

/// Result of a single guard check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "camelCase")]
pub enum GuardOutcome {
    Ok,
    /// Acceptable output worth a second look.
    Warning(String),
    /// Unusable output.
    Fatal(String),
}

impl GuardOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning(_))
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Ok => None,
            Self::Warning(reason) | Self::Fatal(reason) => Some(reason),
        }
    }

    fn severity(&self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Warning(_) => 1,
            Self::Fatal(_) => 2,
        }
    }

    /// Returns the more severe of the two; ties keep `self`.
    pub fn worst(self, other: Self) -> Self {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }
}

// ============================================================================
// GuardSettings
// ============================================================================

/// What the engine does when a region's color drifts past tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum ColorPolicy {
    /// Log and report the drift; the output is still returned.
    #[default]
    Warn,
    /// Treat drift as fatal.
    Reject,
}

/// Guard thresholds. Defaults match the module constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct GuardSettings {
    /// Fraction of pixels (0.0-1.0) allowed to change alpha.
    pub geometry_tolerance: f64,

    /// Euclidean RGB distance allowed between sampled mean and target.
    pub color_tolerance: f64,

    /// Mask values strictly above this are sampled.
    pub sample_threshold: u8,

    pub color_policy: ColorPolicy,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            geometry_tolerance: GEOMETRY_TOLERANCE,
            color_tolerance: COLOR_TOLERANCE,
            sample_threshold: SAMPLE_THRESHOLD,
            color_policy: ColorPolicy::Warn,
        }
    }
}

impl GuardSettings {
    /// Returns a copy with tolerances clamped to sane ranges.
    pub fn sanitized(mut self) -> Self {
        self.geometry_tolerance = if self.geometry_tolerance.is_finite() {
            self.geometry_tolerance.clamp(0.0, 1.0)
        } else {
            GEOMETRY_TOLERANCE
        };
        self.color_tolerance = if self.color_tolerance.is_finite() {
            self.color_tolerance.max(0.0)
        } else {
            COLOR_TOLERANCE
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worst_prefers_fatal_then_warning() {
        let ok = GuardOutcome::Ok;
        let warn = GuardOutcome::Warning("w".into());
        let fatal = GuardOutcome::Fatal("f".into());

        assert_eq!(ok.clone().worst(warn.clone()), warn);
        assert_eq!(warn.clone().worst(ok.clone()), warn);
        assert_eq!(warn.clone().worst(fatal.clone()), fatal);
        assert_eq!(fatal.clone().worst(warn), fatal);
        assert!(ok.reason().is_none());
    }

    #[test]
    fn defaults_match_constants() {
        let settings = GuardSettings::default();
        assert_eq!(settings.geometry_tolerance, 0.005);
        assert_eq!(settings.color_tolerance, 50.0);
        assert_eq!(settings.sample_threshold, 200);
        assert_eq!(settings.color_policy, ColorPolicy::Warn);
    }

    #[test]
    fn sanitized_clamps_out_of_range_values() {
        let settings = GuardSettings {
            geometry_tolerance: 3.0,
            color_tolerance: f64::NAN,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(settings.geometry_tolerance, 1.0);
        assert_eq!(settings.color_tolerance, COLOR_TOLERANCE);
    }

    #[test]
    fn outcome_serializes_tagged() {
        let json = serde_json::to_string(&GuardOutcome::Warning("drift".into())).unwrap();
        assert_eq!(json, r#"{"status":"warning","reason":"drift"}"#);
        let ok = serde_json::to_string(&GuardOutcome::Ok).unwrap();
        assert_eq!(ok, r#"{"status":"ok"}"#);
    }

    #[test]
    fn partial_settings_json_uses_defaults() {
        let settings: GuardSettings =
            serde_json::from_str(r#"{"colorTolerance": 30.0, "colorPolicy": "reject"}"#).unwrap();
        assert_eq!(settings.color_tolerance, 30.0);
        assert_eq!(settings.geometry_tolerance, GEOMETRY_TOLERANCE);
        assert_eq!(settings.color_policy, ColorPolicy::Reject);
    }
}
