//! Serializable recolor recipe.
//!
//! A [`RecolorRecipe`] captures the colors, protected logo boxes and guard
//! thresholds for a recolor in a format that can be stored as JSON next to
//! the template and masks it applies to.
//!
//! # Example
//!
//! ```
//! use garment_recolor::{ColorSettings, LogoBox, RecolorRecipe};
//!
//! let recipe = RecolorRecipe::new(ColorSettings::new("#1b2a49", "#f4f4f4"))
//!     .with_logo_box(LogoBox::new(40, 30, 20, 12));
//!
//! let json = recipe.to_json().unwrap();
//! let restored = RecolorRecipe::from_json(&json).unwrap();
//! let colors = restored.color_set().unwrap();
//! assert_eq!(colors.primary.unwrap().to_hex(), "#1b2a49");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::guard::GuardSettings;
use crate::mask::LogoBox;
use crate::region::ColorSet;

// ============================================================================
// Color Settings
// ============================================================================

/// Hex colors per region, kept as strings so a recipe can be loaded before
/// it is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ColorSettings {
    /// Body color.
    pub primary: String,

    /// Sleeves color.
    pub secondary: String,

    /// Trims color. Trims stay untouched without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tertiary: Option<String>,
}

impl ColorSettings {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
            tertiary: None,
        }
    }

    pub fn with_tertiary(mut self, tertiary: impl Into<String>) -> Self {
        self.tertiary = Some(tertiary.into());
        self
    }
}

impl From<&ColorSet> for ColorSettings {
    fn from(colors: &ColorSet) -> Self {
        Self {
            primary: colors.primary.map(|c| c.to_hex()).unwrap_or_default(),
            secondary: colors.secondary.map(|c| c.to_hex()).unwrap_or_default(),
            tertiary: colors.tertiary.map(|c| c.to_hex()),
        }
    }
}

// ============================================================================
// Recolor Recipe
// ============================================================================

/// Complete recolor configuration that can be serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct RecolorRecipe {
    pub colors: ColorSettings,

    /// Rectangles kept bit-identical to the template.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logo_boxes: Vec<LogoBox>,

    /// Guard thresholds; defaults apply when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guards: Option<GuardSettings>,
}

impl RecolorRecipe {
    pub fn new(colors: ColorSettings) -> Self {
        Self {
            colors,
            ..Default::default()
        }
    }

    pub fn with_logo_box(mut self, logo_box: LogoBox) -> Self {
        self.logo_boxes.push(logo_box);
        self
    }

    pub fn with_guards(mut self, guards: GuardSettings) -> Self {
        self.guards = Some(guards);
        self
    }

    /// Parses the hex colors.
    ///
    /// Fails with [`RecolorError::InvalidColorFormat`](crate::RecolorError::InvalidColorFormat)
    /// naming the first malformed color.
    pub fn color_set(&self) -> Result<ColorSet> {
        ColorSet::from_hex(
            &self.colors.primary,
            &self.colors.secondary,
            self.colors.tertiary.as_deref(),
        )
    }

    /// Guard settings to use, falling back to defaults.
    pub fn guard_settings(&self) -> GuardSettings {
        self.guards.unwrap_or_default().sanitized()
    }

    /// Serializes the recipe to JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the recipe to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a recipe from JSON.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
