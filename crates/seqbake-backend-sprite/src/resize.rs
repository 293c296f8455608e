//! Nearest-neighbor resampling.

use crate::frame::{PixelBuffer, CHANNELS};

/// Source index for each destination index along one axis.
///
/// Destination `i` reads source `min(floor(i / scale), src_len - 1)` with
/// `scale = dst_len / src_len`.
pub fn nearest_indices(src_len: u32, dst_len: u32) -> Vec<usize> {
    if src_len == 0 {
        return Vec::new();
    }
    let scale = dst_len as f64 / src_len as f64;
    let last = src_len as usize - 1;
    (0..dst_len)
        .map(|i| ((i as f64 / scale) as usize).min(last))
        .collect()
}

/// Resizes `src` to `width x height` with nearest-neighbor sampling.
///
/// Works a destination row at a time: each row is gathered from one source
/// row through a precomputed column table, and rows that map to the same
/// source row as the previous one are copied whole.
pub fn resize_nearest(src: &PixelBuffer, width: u32, height: u32) -> PixelBuffer {
    if src.width == width && src.height == height {
        return src.clone();
    }
    let mut dst = PixelBuffer::new(width, height);
    if src.is_empty() || width == 0 || height == 0 {
        return dst;
    }

    let columns = nearest_indices(src.width, width);
    let rows = nearest_indices(src.height, height);
    let stride = dst.stride();

    for (y, &sy) in rows.iter().enumerate() {
        if y > 0 && rows[y - 1] == sy {
            let start = y * stride;
            dst.data.copy_within(start - stride..start, start);
            continue;
        }
        let src_row = src.row(sy as u32);
        let dst_row = dst.row_mut(y as u32);
        for (px, &sx) in dst_row.chunks_exact_mut(CHANNELS).zip(&columns) {
            let offset = sx * CHANNELS;
            px.copy_from_slice(&src_row[offset..offset + CHANNELS]);
        }
    }
    dst
}
