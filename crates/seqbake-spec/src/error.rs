//! Error types for settings validation and processing.

use thiserror::Error;

/// Error codes for settings validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Layout errors (E001-E007)
    /// E001: Grid must have at least one column and one row
    EmptyGrid,
    /// E002: Cell or image dimension outside 1..=8192
    DimensionOutOfRange,
    /// E003: Start frame must be at least 1
    InvalidStartFrame,
    /// E004: End frame precedes start frame
    InvalidFrameRange,
    /// E005: Required path is empty
    MissingPath,
    /// E006: Gamma must be positive
    InvalidGamma,
    /// E007: Sheet edge larger than 16384 pixels
    SheetTooLarge,

    // Bake errors (E010-E012)
    /// E010: Normal map swizzle uses the same axis twice
    DuplicateSwizzleAxis,
    /// E011: Negative extrusion or ray distance
    NegativeDistance,
    /// E012: Cage enabled without a cage object
    MissingCageObject,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::EmptyGrid => "E001",
            ErrorCode::DimensionOutOfRange => "E002",
            ErrorCode::InvalidStartFrame => "E003",
            ErrorCode::InvalidFrameRange => "E004",
            ErrorCode::MissingPath => "E005",
            ErrorCode::InvalidGamma => "E006",
            ErrorCode::SheetTooLarge => "E007",
            ErrorCode::DuplicateSwizzleAxis => "E010",
            ErrorCode::NegativeDistance => "E011",
            ErrorCode::MissingCageObject => "E012",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Warning codes for settings validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: No bake pass is enabled
    NoPassesEnabled,
    /// W002: Frame range is larger than the grid can hold
    RangeExceedsGrid,
    /// W003: Alpha requested for a format without an alpha channel
    AlphaUnsupported,
    /// W004: Float buffer requested for an 8-bit-only format
    FloatUnsupported,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::NoPassesEnabled => "W001",
            WarningCode::RangeExceedsGrid => "W002",
            WarningCode::AlphaUnsupported => "W003",
            WarningCode::FloatUnsupported => "W004",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Path to the offending field (e.g., "sprite_sheet.columns").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error with a field path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validation warning with code, message, and optional field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The warning code.
    pub code: WarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// Path to the field the warning refers to.
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Creates a new validation warning.
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation warning with a field path.
    pub fn with_path(
        code: WarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Top-level error type for settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of settings validation.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether validation passed (no errors).
    pub ok: bool,
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of validation warnings.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Creates a successful validation result.
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
        self.ok = false;
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Merges another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.ok &= other.ok;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.ok
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}

/// Common trait for backend errors.
///
/// Each backend error type implements this trait so that reports carry a
/// stable code (e.g. "SPRITE_003", "BAKE_007") and a category regardless of
/// which backend produced them.
pub trait BackendError: std::error::Error {
    /// Get the error code for reporting.
    ///
    /// Returns a static string like "SPRITE_001" or "BAKE_002". Codes are
    /// stable and can be matched programmatically.
    fn code(&self) -> &'static str;

    /// Get a human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Get the error category for grouping related errors.
    ///
    /// Returns a category like "sprite" or "bake".
    fn category(&self) -> &'static str;
}
