//! SeqBake settings library
//!
//! This crate provides the configuration types, validation, and status
//! reporting shared by the sprite sheet and sequenced bake backends.
//!
//! # Example
//!
//! ```
//! use seqbake_spec::{validate_config, PassType, SeqBakeConfig};
//!
//! let mut config = SeqBakeConfig::default();
//! config.bake.passes.set(PassType::Normal, true);
//!
//! let result = validate_config(&config);
//! assert!(result.is_ok());
//! assert_eq!(config.bake.passes.enabled(), vec![PassType::Normal]);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error and warning codes, validation results, the backend error trait
//! - [`format`]: Output image formats and bit depths
//! - [`settings`]: Sprite sheet and bake settings documents
//! - [`validation`]: Settings validation functions
//! - [`report`]: Report collector used by every stage

pub mod error;
pub mod format;
pub mod report;
pub mod settings;
pub mod validation;

pub use error::{
    BackendError, ErrorCode, SettingsError, ValidationError, ValidationResult, ValidationWarning,
    WarningCode,
};
pub use format::{ColorDepth, ImageFormat};
pub use report::{ReportEntry, Reports, Severity};
pub use settings::{
    BakeMode, BakeSettings, ColorManagement, CombinedToggles, Extension, FrameRange, Interpolation,
    LightingToggles, NormalMapSettings, NormalSpace, PassOptions, PassToggles, PassType,
    Projection, SelectedToActive, SeqBakeConfig, SheetLayout, SortMode, SourceType,
    SpriteSheetSettings, Swizzle, TextureSampling,
};
pub use validation::{
    validate_bake_settings, validate_config, validate_sprite_settings, MAX_DIMENSION,
    MAX_SHEET_DIMENSION,
};
