//! Image file decoding and encoding.
//!
//! PNG output goes through a fixed-settings `png` encoder so the same sheet
//! always produces byte-identical files. Other formats are encoded with the
//! `image` crate.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageBuffer, Rgb, Rgba};
use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use seqbake_spec::ImageFormat;
use serde::Serialize;

use crate::error::{SpriteError, SpriteResult};
use crate::frame::PixelBuffer;

/// How an image is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// File format.
    pub format: ImageFormat,
    /// Keep the alpha channel (ignored by formats without alpha).
    pub use_alpha: bool,
}

impl SaveOptions {
    /// Creates save options.
    pub fn new(format: ImageFormat, use_alpha: bool) -> Self {
        Self { format, use_alpha }
    }
}

/// A file written by a codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedImage {
    /// Where the file was written.
    pub path: PathBuf,
    /// Hex-encoded BLAKE3 hash of the file contents.
    pub hash: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Loads and saves pixel buffers.
pub trait ImageCodec {
    /// Decodes an image file into an RGBA buffer.
    fn load(&self, path: &Path) -> SpriteResult<PixelBuffer>;

    /// Encodes a buffer and writes it to `path`.
    fn save(&self, image: &PixelBuffer, path: &Path, options: SaveOptions)
        -> SpriteResult<SavedImage>;
}

/// Codec backed by the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCodec;

impl ImageCodec for FsCodec {
    fn load(&self, path: &Path) -> SpriteResult<PixelBuffer> {
        let decoded = image::open(path).map_err(|e| SpriteError::decode(path, e))?;
        let rgba = decoded.into_rgba32f();
        let (width, height) = rgba.dimensions();
        PixelBuffer::from_data(width, height, rgba.into_raw())
    }

    fn save(
        &self,
        image: &PixelBuffer,
        path: &Path,
        options: SaveOptions,
    ) -> SpriteResult<SavedImage> {
        let data = encode(image, path, options)?;
        std::fs::write(path, &data)?;
        Ok(SavedImage {
            path: path.to_path_buf(),
            hash: hash_bytes(&data),
            width: image.width,
            height: image.height,
        })
    }
}

/// Encodes a buffer into the bytes of an image file.
pub fn encode(image: &PixelBuffer, path: &Path, options: SaveOptions) -> SpriteResult<Vec<u8>> {
    let alpha = options.use_alpha && options.format.supports_alpha();
    let target = match options.format {
        ImageFormat::Png => {
            let mut data = Vec::new();
            write_png(image, alpha, &mut data)?;
            return Ok(data);
        }
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        ImageFormat::Bmp => image::ImageFormat::Bmp,
        ImageFormat::Tiff => image::ImageFormat::Tiff,
        ImageFormat::Tga => image::ImageFormat::Tga,
        ImageFormat::OpenExr => image::ImageFormat::OpenExr,
        ImageFormat::Hdr => image::ImageFormat::Hdr,
        ImageFormat::Cineon | ImageFormat::Dpx => {
            return Err(SpriteError::UnsupportedFormat(options.format))
        }
    };

    let dynamic = to_dynamic(image, options.format, alpha)
        .ok_or_else(|| SpriteError::encode(path, "pixel buffer does not match its dimensions"))?;
    let mut cursor = Cursor::new(Vec::new());
    dynamic
        .write_to(&mut cursor, target)
        .map_err(|e| SpriteError::encode(path, e))?;
    Ok(cursor.into_inner())
}

fn to_dynamic(image: &PixelBuffer, format: ImageFormat, alpha: bool) -> Option<DynamicImage> {
    let (w, h) = (image.width, image.height);
    let dynamic = match (format.is_float(), alpha) {
        (true, true) if format == ImageFormat::OpenExr => DynamicImage::ImageRgba32F(
            ImageBuffer::<Rgba<f32>, _>::from_raw(w, h, image.data.clone())?,
        ),
        // Radiance HDR stores RGB only.
        (true, _) => {
            DynamicImage::ImageRgb32F(ImageBuffer::<Rgb<f32>, _>::from_raw(w, h, image.to_rgb32f())?)
        }
        (false, true) => {
            DynamicImage::ImageRgba8(ImageBuffer::<Rgba<u8>, _>::from_raw(w, h, image.to_rgba8())?)
        }
        (false, false) => {
            DynamicImage::ImageRgb8(ImageBuffer::<Rgb<u8>, _>::from_raw(w, h, image.to_rgb8())?)
        }
    };
    Some(dynamic)
}

/// Writes an 8-bit PNG with fixed compression and no filtering.
pub fn write_png<W: Write>(image: &PixelBuffer, alpha: bool, writer: W) -> SpriteResult<()> {
    let mut encoder = Encoder::new(writer, image.width, image.height);
    encoder.set_color(if alpha { ColorType::Rgba } else { ColorType::Rgb });
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(Compression::Default);
    encoder.set_filter(FilterType::NoFilter);

    let mut png_writer = encoder.write_header()?;
    let data = if alpha {
        image.to_rgba8()
    } else {
        image.to_rgb8()
    };
    png_writer.write_image_data(&data)?;
    Ok(())
}

/// Compute the BLAKE3 hash of encoded image data.
pub fn hash_bytes(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}
