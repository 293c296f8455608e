//! Grid packing of frame sequences into sprite sheets.
//!
//! Cells are filled row-major starting in the bottom-left corner: left to
//! right, then bottom to top. Frames beyond the grid's capacity are dropped.

use seqbake_spec::{Reports, SheetLayout, MAX_SHEET_DIMENSION};
use serde::Serialize;

use crate::error::{SpriteError, SpriteResult};
use crate::frame::{FrameSequence, PixelBuffer, CHANNELS};
use crate::resize::resize_nearest;

/// Where one frame was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// Index of the frame in the sequence.
    pub frame_index: usize,
    /// Cell index (row-major from the bottom-left).
    pub cell: usize,
    /// Left edge of the cell in pixels.
    pub x: u32,
    /// Top edge of the cell in pixels, counted from the top of the sheet.
    pub top: u32,
}

/// A packed sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    /// Sheet pixels, `(columns * cell_width) x (rows * cell_height)`.
    pub image: PixelBuffer,
    /// Grid geometry.
    pub layout: SheetLayout,
    /// One entry per placed frame.
    pub placements: Vec<Placement>,
    /// Frames left out because the grid was full.
    pub dropped: usize,
    /// Frames skipped because they had no pixels.
    pub skipped: usize,
}

impl SpriteSheet {
    /// Number of placed frames.
    pub fn placed(&self) -> usize {
        self.placements.len()
    }
}

/// Top-left pixel of cell `index`, with rows counted from the top of the sheet.
///
/// The cell's grid origin is `x = (index % columns) * cell_width`,
/// `y = (index / columns) * cell_height` measured from the bottom, so its top
/// row is `sheet_height - y - cell_height`.
pub fn cell_origin(layout: &SheetLayout, index: usize) -> (u32, u32) {
    let columns = layout.columns as usize;
    let x = (index % columns) as u32 * layout.cell_width;
    let rows_above = (layout.rows as usize).saturating_sub(index / columns + 1);
    (x, rows_above as u32 * layout.cell_height)
}

/// Packs `sequence` into a sheet.
pub fn pack(
    sequence: &FrameSequence,
    layout: &SheetLayout,
    reports: &mut Reports,
) -> SpriteResult<SpriteSheet> {
    if layout.capacity() == 0 || layout.cell_width == 0 || layout.cell_height == 0 {
        return Err(SpriteError::InvalidLayout(format!(
            "{}x{} grid of {}x{} cells holds no frame",
            layout.columns, layout.rows, layout.cell_width, layout.cell_height
        )));
    }

    let (width, height) = match (layout.sheet_width(), layout.sheet_height()) {
        (Some(w), Some(h)) if w <= MAX_SHEET_DIMENSION && h <= MAX_SHEET_DIMENSION => (w, h),
        _ => {
            return Err(SpriteError::InvalidLayout(format!(
                "{}x{} grid of {}x{} cells exceeds the {}px sheet limit",
                layout.columns,
                layout.rows,
                layout.cell_width,
                layout.cell_height,
                MAX_SHEET_DIMENSION
            )))
        }
    };
    let mut image = PixelBuffer::new(width, height);
    let capacity = layout.capacity();
    let cell_stride = layout.cell_width as usize * CHANNELS;
    let mut placements = Vec::with_capacity(sequence.len().min(capacity));
    let mut skipped = 0;
    let mut consumed = 0;

    for (frame_index, frame) in sequence.frames.iter().enumerate() {
        if placements.len() >= capacity {
            break;
        }
        consumed = frame_index + 1;

        if frame.image.is_empty() {
            reports.warning(format!(
                "frame {} has no pixels ({}x{}), skipped",
                frame.key,
                frame.width(),
                frame.height()
            ));
            skipped += 1;
            continue;
        }

        let cell = placements.len();
        let (x, top) = cell_origin(layout, cell);
        let scaled = resize_nearest(&frame.image, layout.cell_width, layout.cell_height);
        let offset = x as usize * CHANNELS;
        for r in 0..layout.cell_height {
            let dst = image.row_mut(top + r);
            dst[offset..offset + cell_stride].copy_from_slice(scaled.row(r));
        }

        placements.push(Placement {
            frame_index,
            cell,
            x,
            top,
        });
    }

    let dropped = sequence.len() - consumed;
    if dropped > 0 {
        log::debug!(
            "{} frames do not fit the {}x{} grid",
            dropped,
            layout.columns,
            layout.rows
        );
    }

    Ok(SpriteSheet {
        image,
        layout: *layout,
        placements,
        dropped,
        skipped,
    })
}
