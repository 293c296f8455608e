//! Error types for the sprite sheet backend.

use std::path::PathBuf;

use seqbake_spec::{BackendError, ImageFormat};
use thiserror::Error;

/// Result type for sprite sheet operations.
pub type SpriteResult<T> = Result<T, SpriteError>;

/// Errors that can occur while resolving frames or packing a sheet.
#[derive(Debug, Error)]
pub enum SpriteError {
    /// Source directory is missing or cannot be listed.
    #[error("Cannot read directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source directory holds no image files.
    #[error("No image files found in {path}")]
    NoImages { path: PathBuf },

    /// An image file could not be decoded.
    #[error("Failed to load {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// An image could not be encoded.
    #[error("Failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// The file system codec cannot write this format.
    #[error("Saving {0} images is not supported")]
    UnsupportedFormat(ImageFormat),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),

    /// Output directory could not be created.
    #[error("Cannot create output directory {path}: {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The host timeline has no tracks.
    #[error("The sequencer has no tracks")]
    NoTracks,

    /// No track matches the channel selection.
    #[error("No sequencer track matches {selection}")]
    NoMatchingTracks { selection: String },

    /// The host failed to render a frame.
    #[error("Rendering frame {frame} failed: {message}")]
    RenderFailed { frame: i32, message: String },

    /// A pixel buffer does not match its declared dimensions.
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// The sheet layout cannot hold any frame.
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// The host reported an error.
    #[error("Host error: {0}")]
    Host(String),

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpriteError {
    /// Creates a decode error.
    pub fn decode(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Creates an encode error.
    pub fn encode(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Encode {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Creates a render failure for a frame.
    pub fn render_failed(frame: i32, message: impl Into<String>) -> Self {
        Self::RenderFailed {
            frame,
            message: message.into(),
        }
    }
}

impl BackendError for SpriteError {
    fn code(&self) -> &'static str {
        match self {
            SpriteError::DirectoryUnreadable { .. } => "SPRITE_001",
            SpriteError::NoImages { .. } => "SPRITE_002",
            SpriteError::Decode { .. } => "SPRITE_003",
            SpriteError::Encode { .. } => "SPRITE_004",
            SpriteError::UnsupportedFormat(_) => "SPRITE_005",
            SpriteError::Png(_) => "SPRITE_006",
            SpriteError::CreateOutputDir { .. } => "SPRITE_007",
            SpriteError::NoTracks => "SPRITE_008",
            SpriteError::NoMatchingTracks { .. } => "SPRITE_009",
            SpriteError::RenderFailed { .. } => "SPRITE_010",
            SpriteError::InvalidDimensions(_) => "SPRITE_011",
            SpriteError::InvalidLayout(_) => "SPRITE_012",
            SpriteError::Host(_) => "SPRITE_013",
            SpriteError::Io(_) => "SPRITE_014",
        }
    }

    fn category(&self) -> &'static str {
        "sprite"
    }
}
