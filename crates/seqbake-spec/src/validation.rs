//! Settings validation.
//!
//! Configuration errors abort a run before any work is done; warnings are
//! reported and the run proceeds.

use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
use crate::settings::{BakeSettings, SeqBakeConfig, SourceType, SpriteSheetSettings};

/// Largest accepted image or cell dimension in pixels.
pub const MAX_DIMENSION: u32 = 8192;

/// Largest sprite sheet edge in pixels.
pub const MAX_SHEET_DIMENSION: u32 = 16_384;

/// Validates sprite sheet settings.
pub fn validate_sprite_settings(settings: &SpriteSheetSettings) -> ValidationResult {
    let mut result = ValidationResult::default();

    if settings.columns == 0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::EmptyGrid,
            "columns must be at least 1",
            "sprite_sheet.columns",
        ));
    }
    if settings.rows == 0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::EmptyGrid,
            "rows must be at least 1",
            "sprite_sheet.rows",
        ));
    }
    check_dimension(settings.cell_width, "sprite_sheet.cell_width", &mut result);
    check_dimension(settings.cell_height, "sprite_sheet.cell_height", &mut result);
    check_sheet_edge(settings.columns, settings.cell_width, "sprite_sheet.columns", &mut result);
    check_sheet_edge(settings.rows, settings.cell_height, "sprite_sheet.rows", &mut result);

    if settings.start_frame == 0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidStartFrame,
            "start_frame is 1-based and must be at least 1",
            "sprite_sheet.start_frame",
        ));
    }
    if settings.end_frame < settings.start_frame {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidFrameRange,
            format!(
                "end_frame {} precedes start_frame {}",
                settings.end_frame, settings.start_frame
            ),
            "sprite_sheet.end_frame",
        ));
    }

    match settings.source_type {
        SourceType::Vse if settings.vse_output_path.as_os_str().is_empty() => {
            result.add_error(ValidationError::with_path(
                ErrorCode::MissingPath,
                "an output path is required for sequencer sheets",
                "sprite_sheet.vse_output_path",
            ));
        }
        SourceType::Compositor if settings.compositor_output_path.as_os_str().is_empty() => {
            result.add_error(ValidationError::with_path(
                ErrorCode::MissingPath,
                "an output path is required for compositor sheets",
                "sprite_sheet.compositor_output_path",
            ));
        }
        _ => {}
    }

    let capacity = settings.layout().capacity();
    let requested = settings.frame_range().len();
    if capacity > 0 && requested > capacity {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::RangeExceedsGrid,
            format!(
                "{} frames requested but the grid holds {}; extra frames are dropped",
                requested, capacity
            ),
            "sprite_sheet.end_frame",
        ));
    }

    if settings.use_alpha && !settings.image_format.supports_alpha() {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::AlphaUnsupported,
            format!("{} cannot store an alpha channel", settings.image_format),
            "sprite_sheet.image_format",
        ));
    }

    result
}

/// Validates bake settings.
///
/// The output path is not checked here: a missing output path is a run
/// precondition reported by the orchestrator.
pub fn validate_bake_settings(settings: &BakeSettings) -> ValidationResult {
    let mut result = ValidationResult::default();

    check_dimension(settings.width, "bake.width", &mut result);
    check_dimension(settings.height, "bake.height", &mut result);

    let gamma = settings.color_management.gamma;
    if gamma.is_nan() || gamma <= 0.0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidGamma,
            format!("gamma must be positive, got {}", gamma),
            "bake.color_management.gamma",
        ));
    }

    let normal = &settings.normal;
    let axes = [normal.red.axis(), normal.green.axis(), normal.blue.axis()];
    if axes[0] == axes[1] || axes[0] == axes[2] || axes[1] == axes[2] {
        result.add_error(ValidationError::with_path(
            ErrorCode::DuplicateSwizzleAxis,
            format!(
                "normal swizzle {}/{}/{} uses an axis twice",
                normal.red.as_str(),
                normal.green.as_str(),
                normal.blue.as_str()
            ),
            "bake.normal",
        ));
    }

    let s2a = &settings.selected_to_active;
    if s2a.extrusion < 0.0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::NegativeDistance,
            "extrusion must not be negative",
            "bake.selected_to_active.extrusion",
        ));
    }
    if s2a.max_ray_distance < 0.0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::NegativeDistance,
            "max_ray_distance must not be negative",
            "bake.selected_to_active.max_ray_distance",
        ));
    }
    if s2a.enabled && s2a.cage && s2a.cage_name().is_none() {
        result.add_error(ValidationError::with_path(
            ErrorCode::MissingCageObject,
            "cage is enabled but no cage object is named",
            "bake.selected_to_active.cage_object",
        ));
    }

    if settings.passes.enabled().is_empty() {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::NoPassesEnabled,
            "no bake pass is enabled",
            "bake.passes",
        ));
    }
    if settings.use_alpha && !settings.image_format.supports_alpha() {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::AlphaUnsupported,
            format!("{} cannot store an alpha channel", settings.image_format),
            "bake.image_format",
        ));
    }
    if settings.use_float && !settings.image_format.is_float() {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::FloatUnsupported,
            format!("{} is saved at 8 bits per channel", settings.image_format),
            "bake.use_float",
        ));
    }

    result
}

/// Validates both halves of a configuration document.
pub fn validate_config(config: &SeqBakeConfig) -> ValidationResult {
    let mut result = validate_sprite_settings(&config.sprite_sheet);
    result.merge(validate_bake_settings(&config.bake));
    result
}

fn check_dimension(value: u32, path: &str, result: &mut ValidationResult) {
    if value == 0 || value > MAX_DIMENSION {
        result.add_error(ValidationError::with_path(
            ErrorCode::DimensionOutOfRange,
            format!("{} must be in 1..={}, got {}", path, MAX_DIMENSION, value),
            path,
        ));
    }
}

fn check_sheet_edge(cells: u32, cell_size: u32, path: &str, result: &mut ValidationResult) {
    let edge = u64::from(cells) * u64::from(cell_size);
    if edge > u64::from(MAX_SHEET_DIMENSION) {
        result.add_error(ValidationError::with_path(
            ErrorCode::SheetTooLarge,
            format!(
                "{} cells of {}px make a {}px sheet edge, limit is {}",
                cells, cell_size, edge, MAX_SHEET_DIMENSION
            ),
            path,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ImageFormat;
    use crate::settings::{PassType, Swizzle};

    fn codes(result: &ValidationResult) -> Vec<&'static str> {
        result.errors.iter().map(|e| e.code.code()).collect()
    }

    #[test]
    fn test_default_sprite_settings_are_valid() {
        let result = validate_sprite_settings(&SpriteSheetSettings::default());
        assert!(result.is_ok(), "{:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_empty_grid_rejected() {
        let settings = SpriteSheetSettings {
            columns: 0,
            rows: 0,
            ..Default::default()
        };
        let result = validate_sprite_settings(&settings);
        assert_eq!(codes(&result), vec!["E001", "E001"]);
    }

    #[test]
    fn test_cell_size_bounds() {
        let settings = SpriteSheetSettings {
            rows: 1,
            cell_width: 0,
            cell_height: MAX_DIMENSION + 1,
            ..Default::default()
        };
        let result = validate_sprite_settings(&settings);
        assert_eq!(codes(&result), vec!["E002", "E002"]);
    }

    #[test]
    fn test_sheet_edge_limit() {
        let settings = SpriteSheetSettings {
            columns: 70_000,
            rows: 2,
            cell_width: 70_000,
            cell_height: MAX_DIMENSION,
            ..Default::default()
        };
        let result = validate_sprite_settings(&settings);
        assert_eq!(codes(&result), vec!["E002", "E007"]);
        assert_eq!(
            result.errors[1].path.as_deref(),
            Some("sprite_sheet.columns")
        );

        let settings = SpriteSheetSettings {
            columns: 2,
            rows: 2,
            cell_width: MAX_DIMENSION,
            cell_height: MAX_DIMENSION,
            ..Default::default()
        };
        assert!(validate_sprite_settings(&settings).is_ok());
    }

    #[test]
    fn test_frame_range_checks() {
        let settings = SpriteSheetSettings {
            start_frame: 0,
            end_frame: 0,
            ..Default::default()
        };
        assert_eq!(codes(&validate_sprite_settings(&settings)), vec!["E003"]);

        let settings = SpriteSheetSettings {
            start_frame: 10,
            end_frame: 4,
            ..Default::default()
        };
        assert_eq!(codes(&validate_sprite_settings(&settings)), vec!["E004"]);
    }

    #[test]
    fn test_range_larger_than_grid_warns() {
        let settings = SpriteSheetSettings {
            columns: 2,
            rows: 2,
            start_frame: 1,
            end_frame: 10,
            ..Default::default()
        };
        let result = validate_sprite_settings(&settings);
        assert!(result.is_ok());
        assert_eq!(result.warnings[0].code, WarningCode::RangeExceedsGrid);
    }

    #[test]
    fn test_sequencer_source_requires_output_path() {
        let settings = SpriteSheetSettings {
            source_type: SourceType::Vse,
            ..Default::default()
        };
        assert_eq!(codes(&validate_sprite_settings(&settings)), vec!["E005"]);
    }

    #[test]
    fn test_bake_defaults_warn_without_passes() {
        let result = validate_bake_settings(&BakeSettings::default());
        assert!(result.is_ok());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, WarningCode::NoPassesEnabled);
    }

    #[test]
    fn test_bake_error_cases() {
        let mut settings = BakeSettings::default();
        settings.passes.set(PassType::Normal, true);
        settings.width = 0;
        settings.color_management.gamma = 0.0;
        settings.normal.green = Swizzle::NegX;
        settings.selected_to_active.extrusion = -0.5;
        settings.selected_to_active.enabled = true;
        settings.selected_to_active.cage = true;
        let result = validate_bake_settings(&settings);
        assert_eq!(codes(&result), vec!["E002", "E006", "E010", "E011", "E012"]);
    }

    #[test]
    fn test_float_on_png_warns() {
        let mut settings = BakeSettings::default();
        settings.passes.set(PassType::Roughness, true);
        settings.use_float = true;
        settings.image_format = ImageFormat::Png;
        let result = validate_bake_settings(&settings);
        assert!(result.is_ok());
        assert_eq!(result.warnings[0].code, WarningCode::FloatUnsupported);

        settings.image_format = ImageFormat::OpenExr;
        assert!(validate_bake_settings(&settings).warnings.is_empty());
    }

    #[test]
    fn test_validate_config_merges() {
        let mut config = SeqBakeConfig::default();
        config.sprite_sheet.columns = 0;
        config.bake.height = 0;
        let result = validate_config(&config);
        assert_eq!(codes(&result), vec!["E001", "E002"]);
    }
}
