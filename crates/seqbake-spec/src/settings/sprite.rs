//! Sprite sheet settings.
//!
//! Defaults reproduce the add-on's property defaults: an 8x8 grid of
//! 128 px cells covering frames 1..=64, overwrite on, temporary images
//! cleared after packing.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::format::ImageFormat;

/// Where sprite sheet frames come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Numbered image files in a directory (or one sequence per subdirectory).
    #[default]
    Directory,
    /// Frames rendered from the video sequencer tracks.
    Vse,
    /// Frames rendered from the compositor output.
    Compositor,
}

impl SourceType {
    /// Default base name used for sheets built from this source, when the
    /// source itself does not provide one (directory sequences use the
    /// directory name instead).
    pub fn default_label(&self) -> &'static str {
        match self {
            SourceType::Directory => "Directory",
            SourceType::Vse => "VSE",
            SourceType::Compositor => "Compositor",
        }
    }
}

/// Ordering applied to the files of a directory sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Ascending by the number in the filename stem.
    #[default]
    Numeric,
    /// Byte-wise alphabetical by file name.
    AlphabeticalCaseSensitive,
    /// Alphabetical by lower-cased file name.
    AlphabeticalCaseInsensitive,
}

/// Grid geometry of a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    /// Number of cell columns.
    pub columns: u32,
    /// Number of cell rows.
    pub rows: u32,
    /// Width of one cell in pixels.
    pub cell_width: u32,
    /// Height of one cell in pixels.
    pub cell_height: u32,
    /// Whether the saved sheet keeps its alpha channel.
    pub use_alpha: bool,
}

impl SheetLayout {
    /// Creates a layout without alpha.
    pub fn new(columns: u32, rows: u32, cell_width: u32, cell_height: u32) -> Self {
        Self {
            columns,
            rows,
            cell_width,
            cell_height,
            use_alpha: false,
        }
    }

    /// Enables or disables the alpha channel.
    pub fn with_alpha(mut self, use_alpha: bool) -> Self {
        self.use_alpha = use_alpha;
        self
    }

    /// Maximum number of frames the grid can hold.
    pub fn capacity(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Sheet width in pixels, `None` if it overflows `u32`.
    pub fn sheet_width(&self) -> Option<u32> {
        self.columns.checked_mul(self.cell_width)
    }

    /// Sheet height in pixels, `None` if it overflows `u32`.
    pub fn sheet_height(&self) -> Option<u32> {
        self.rows.checked_mul(self.cell_height)
    }
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self::new(8, 8, 128, 128)
    }
}

/// A 1-based inclusive frame range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    /// First frame (1-based).
    pub start: u32,
    /// Last frame (inclusive).
    pub end: u32,
}

impl FrameRange {
    /// Creates a new range.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Number of frames in the range (zero when `end < start`).
    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start) as usize + 1
        }
    }

    /// Returns true if the range holds no frames.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the frame numbers of the range.
    pub fn frames(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}

/// Settings for one sprite sheet run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteSheetSettings {
    /// Frame source.
    pub source_type: SourceType,
    /// Source and output directory for directory sequences.
    pub directory: PathBuf,
    /// Output directory for sheets built from the video sequencer.
    pub vse_output_path: PathBuf,
    /// Output directory for sheets (and rendered frames) from the compositor.
    pub compositor_output_path: PathBuf,
    /// Only strips on this sequencer channel are rendered.
    pub vse_channel: u32,
    /// Render every unmuted channel instead of `vse_channel`.
    pub use_all_vse_channels: bool,
    /// Number of columns.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
    /// Cell width in pixels.
    pub cell_width: u32,
    /// Cell height in pixels.
    pub cell_height: u32,
    /// First frame to include (1-based).
    pub start_frame: u32,
    /// Last frame to include (inclusive).
    pub end_frame: u32,
    /// Reverse the frame order.
    pub reversed: bool,
    /// File ordering for directory sequences.
    pub sort_mode: SortMode,
    /// Keep the alpha channel in the saved sheet.
    pub use_alpha: bool,
    /// Output format.
    pub image_format: ImageFormat,
    /// Output base name; empty selects a name derived from the source.
    pub file_name: String,
    /// Replace existing files instead of numbering new ones.
    pub overwrite: bool,
    /// Open generated sheets when the run completes.
    pub open_images: bool,
    /// Open the output directory when the run completes.
    pub open_output_directory: bool,
    /// Delete intermediate rendered frames after packing.
    pub clear_generated_images: bool,
}

impl Default for SpriteSheetSettings {
    fn default() -> Self {
        Self {
            source_type: SourceType::Directory,
            directory: PathBuf::new(),
            vse_output_path: PathBuf::new(),
            compositor_output_path: PathBuf::new(),
            vse_channel: 1,
            use_all_vse_channels: false,
            columns: 8,
            rows: 8,
            cell_width: 128,
            cell_height: 128,
            start_frame: 1,
            end_frame: 64,
            reversed: false,
            sort_mode: SortMode::Numeric,
            use_alpha: false,
            image_format: ImageFormat::Png,
            file_name: String::new(),
            overwrite: true,
            open_images: false,
            open_output_directory: false,
            clear_generated_images: true,
        }
    }
}

impl SpriteSheetSettings {
    /// The grid layout described by these settings.
    pub fn layout(&self) -> SheetLayout {
        SheetLayout::new(self.columns, self.rows, self.cell_width, self.cell_height)
            .with_alpha(self.use_alpha)
    }

    /// The configured frame range.
    pub fn frame_range(&self) -> FrameRange {
        FrameRange::new(self.start_frame, self.end_frame)
    }

    /// Output directory for the configured source type.
    pub fn output_dir(&self) -> &Path {
        match self.source_type {
            SourceType::Directory => &self.directory,
            SourceType::Vse => &self.vse_output_path,
            SourceType::Compositor => &self.compositor_output_path,
        }
    }

    /// The user-supplied file name, if one is set.
    pub fn custom_file_name(&self) -> Option<&str> {
        let name = self.file_name.trim();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}
