//! Frames and frame sequences.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::error::{SpriteError, SpriteResult};

/// Number of channels in every pixel buffer (RGBA).
pub const CHANNELS: usize = 4;

/// RGBA `f32` pixel buffer, stored top-down and row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Interleaved RGBA samples, `width * height * 4` long.
    pub data: Vec<f32>,
}

impl PixelBuffer {
    /// Creates a zeroed (transparent black) buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width as usize * height as usize * CHANNELS],
        }
    }

    /// Wraps existing samples, checking their length.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> SpriteResult<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(SpriteError::InvalidDimensions(format!(
                "expected {} samples for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Converts 8-bit RGBA bytes.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> SpriteResult<Self> {
        let data = bytes.iter().map(|&b| b as f32 / 255.0).collect();
        Self::from_data(width, height, data)
    }

    /// A buffer filled with one color.
    pub fn filled(width: u32, height: u32, rgba: [f32; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Returns true if the buffer has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Samples per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    /// One row of samples (row 0 is the top row).
    #[inline]
    pub fn row(&self, y: u32) -> &[f32] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// A mutable row of samples.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [f32] {
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.data[start..start + stride]
    }

    /// The pixel at `(x, y)`, counted from the top-left corner.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Sets the pixel at `(x, y)`.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [f32; 4]) {
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        self.data[idx..idx + CHANNELS].copy_from_slice(&rgba);
    }

    /// Converts to 8-bit RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.data.iter().map(|&v| to_u8(v)).collect()
    }

    /// Converts to 8-bit RGB bytes, dropping alpha.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for px in self.data.chunks_exact(CHANNELS) {
            bytes.extend(px[..3].iter().map(|&v| to_u8(v)));
        }
        bytes
    }

    /// RGB samples without alpha.
    pub fn to_rgb32f(&self) -> Vec<f32> {
        let mut samples = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for px in self.data.chunks_exact(CHANNELS) {
            samples.extend_from_slice(&px[..3]);
        }
        samples
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Ordering key of a frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameKey {
    /// Numeric filename stem or timeline frame number.
    Number(i64),
    /// Unnumbered file, ordered by name.
    Name(String),
}

impl FrameKey {
    /// The frame number, if any.
    pub fn number(&self) -> Option<i64> {
        match self {
            FrameKey::Number(n) => Some(*n),
            FrameKey::Name(_) => None,
        }
    }
}

impl Ord for FrameKey {
    /// Numbers ascend and come before names; names compare byte-wise.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FrameKey::Number(a), FrameKey::Number(b)) => a.cmp(b),
            (FrameKey::Number(_), FrameKey::Name(_)) => Ordering::Less,
            (FrameKey::Name(_), FrameKey::Number(_)) => Ordering::Greater,
            (FrameKey::Name(a), FrameKey::Name(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for FrameKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for FrameKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameKey::Number(n) => write!(f, "{}", n),
            FrameKey::Name(name) => write!(f, "{}", name),
        }
    }
}

/// One image of a sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Pixels.
    pub image: PixelBuffer,
    /// Ordering key.
    pub key: FrameKey,
    /// File the frame was loaded from.
    pub origin: Option<PathBuf>,
}

impl Frame {
    /// Creates a frame without an origin path.
    pub fn new(image: PixelBuffer, key: FrameKey) -> Self {
        Self {
            image,
            key,
            origin: None,
        }
    }

    /// Sets the origin path.
    pub fn with_origin(mut self, path: impl Into<PathBuf>) -> Self {
        self.origin = Some(path.into());
        self
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height
    }

    /// Origin path, if loaded from disk.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

/// An ordered list of frames from one source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameSequence {
    /// Frames in packing order.
    pub frames: Vec<Frame>,
    /// Whether the order was reversed.
    pub reversed: bool,
    /// Source name used for the default sheet name.
    pub label: String,
}

impl FrameSequence {
    /// Creates a sequence.
    pub fn new(label: impl Into<String>, frames: Vec<Frame>, reversed: bool) -> Self {
        Self {
            frames,
            reversed,
            label: label.into(),
        }
    }

    /// An empty sequence for a source.
    pub fn empty(label: impl Into<String>, reversed: bool) -> Self {
        Self::new(label, Vec::new(), reversed)
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if there are no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame keys in order.
    pub fn keys(&self) -> Vec<FrameKey> {
        self.frames.iter().map(|f| f.key.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_data_checks_length() {
        assert!(PixelBuffer::from_data(2, 2, vec![0.0; 16]).is_ok());
        let err = PixelBuffer::from_data(2, 2, vec![0.0; 15]).unwrap_err();
        assert!(matches!(err, SpriteError::InvalidDimensions(_)));
    }

    #[test]
    fn test_pixel_access() {
        let mut buffer = PixelBuffer::new(3, 2);
        buffer.set_pixel(2, 1, [1.0, 0.5, 0.25, 1.0]);
        assert_eq!(buffer.pixel(2, 1), [1.0, 0.5, 0.25, 1.0]);
        assert_eq!(&buffer.row(1)[8..12], &[1.0, 0.5, 0.25, 1.0]);
        assert_eq!(buffer.pixel(0, 0), [0.0; 4]);
    }

    #[test]
    fn test_byte_conversion() {
        let buffer = PixelBuffer::filled(1, 1, [1.0, 0.0, 2.0, 0.5]);
        assert_eq!(buffer.to_rgba8(), vec![255, 0, 255, 128]);
        assert_eq!(buffer.to_rgb8(), vec![255, 0, 255]);
    }

    #[test]
    fn test_frame_key_order() {
        let mut keys = vec![
            FrameKey::Name("b".into()),
            FrameKey::Number(10),
            FrameKey::Name("a".into()),
            FrameKey::Number(2),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                FrameKey::Number(2),
                FrameKey::Number(10),
                FrameKey::Name("a".into()),
                FrameKey::Name("b".into()),
            ]
        );
    }
}
