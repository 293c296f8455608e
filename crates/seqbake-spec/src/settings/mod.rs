//! Settings documents for sprite sheet and bake runs.
//!
//! A [`SeqBakeConfig`] is the JSON document users pass on the command line:
//!
//! ```
//! use seqbake_spec::SeqBakeConfig;
//!
//! let config = SeqBakeConfig::from_json(r#"{ "sprite_sheet": { "columns": 4 } }"#).unwrap();
//! assert_eq!(config.sprite_sheet.columns, 4);
//! assert_eq!(config.bake.width, 1024);
//! ```

mod bake;
mod sprite;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

pub use bake::{
    BakeMode, BakeSettings, ColorManagement, CombinedToggles, Extension, Interpolation,
    LightingToggles, NormalMapSettings, NormalSpace, PassOptions, PassToggles, PassType,
    Projection, SelectedToActive, Swizzle, TextureSampling,
};
pub use sprite::{FrameRange, SheetLayout, SortMode, SourceType, SpriteSheetSettings};

/// Top-level configuration document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeqBakeConfig {
    /// Sprite sheet settings.
    pub sprite_sheet: SpriteSheetSettings,
    /// Sequenced bake settings.
    pub bake: BakeSettings,
}

impl SeqBakeConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a configuration file.
    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serializes the configuration to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The directory sprite sheets are read from and written to in
    /// directory mode. Falls back to the bake output path when the sprite
    /// directory is empty, so freshly baked maps can be packed directly.
    pub fn sprite_directory(&self) -> &Path {
        if self.sprite_sheet.directory.as_os_str().is_empty() {
            &self.bake.output_path
        } else {
            &self.sprite_sheet.directory
        }
    }
}
