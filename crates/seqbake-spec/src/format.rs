//! Output image format types.

use serde::{Deserialize, Serialize};

/// Image file format used for baked maps and sprite sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    /// Portable Network Graphics.
    #[default]
    Png,
    /// JPEG.
    #[serde(alias = "jpg")]
    Jpeg,
    /// Windows bitmap.
    Bmp,
    /// Tagged Image File Format.
    #[serde(alias = "tif")]
    Tiff,
    /// Truevision Targa.
    Tga,
    /// OpenEXR (floating point).
    #[serde(alias = "exr")]
    OpenExr,
    /// Radiance HDR (floating point).
    Hdr,
    /// Kodak Cineon.
    Cineon,
    /// SMPTE Digital Picture Exchange.
    Dpx,
}

impl ImageFormat {
    /// All formats, in the order they are offered to users.
    pub const ALL: [ImageFormat; 9] = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Bmp,
        ImageFormat::Tiff,
        ImageFormat::Tga,
        ImageFormat::OpenExr,
        ImageFormat::Hdr,
        ImageFormat::Cineon,
        ImageFormat::Dpx,
    ];

    /// Returns the file extension for this format (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Tiff => "tif",
            ImageFormat::Tga => "tga",
            ImageFormat::OpenExr => "exr",
            ImageFormat::Hdr => "hdr",
            ImageFormat::Cineon => "cin",
            ImageFormat::Dpx => "dpx",
        }
    }

    /// Display label as shown in format pickers.
    pub fn label(&self) -> &'static str {
        match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Bmp => "BMP",
            ImageFormat::Tiff => "TIFF",
            ImageFormat::Tga => "TGA",
            ImageFormat::OpenExr => "OpenEXR",
            ImageFormat::Hdr => "Radiance HDR",
            ImageFormat::Cineon => "Cineon",
            ImageFormat::Dpx => "DPX",
        }
    }

    /// Whether the encoded file can carry an alpha channel.
    pub fn supports_alpha(&self) -> bool {
        matches!(
            self,
            ImageFormat::Png
                | ImageFormat::Bmp
                | ImageFormat::Tiff
                | ImageFormat::Tga
                | ImageFormat::OpenExr
                | ImageFormat::Dpx
        )
    }

    /// Whether the format stores floating-point samples.
    pub fn is_float(&self) -> bool {
        matches!(self, ImageFormat::OpenExr | ImageFormat::Hdr)
    }

    /// Parses a format from a user-facing name or extension (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpeg" | "jpg" => Some(ImageFormat::Jpeg),
            "bmp" => Some(ImageFormat::Bmp),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "tga" | "targa" => Some(ImageFormat::Tga),
            "openexr" | "open_exr" | "exr" => Some(ImageFormat::OpenExr),
            "hdr" | "radiance" => Some(ImageFormat::Hdr),
            "cineon" | "cin" => Some(ImageFormat::Cineon),
            "dpx" => Some(ImageFormat::Dpx),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageFormat::from_name(s).ok_or_else(|| format!("unknown image format: {}", s))
    }
}

/// Bit depth used when saving baked images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorDepth {
    /// 8 bits per channel.
    Eight,
    /// 16 bits per channel (half float for EXR).
    Sixteen,
    /// 32 bits per channel float.
    ThirtyTwo,
}

impl ColorDepth {
    /// Depth used for a bake with or without a float buffer.
    pub fn for_float_buffer(use_float: bool) -> Self {
        if use_float {
            ColorDepth::ThirtyTwo
        } else {
            ColorDepth::Eight
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_and_name_agree() {
        for format in ImageFormat::ALL {
            assert_eq!(ImageFormat::from_name(format.extension()), Some(format));
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ImageFormat::OpenExr).unwrap();
        assert_eq!(json, "\"open_exr\"");
        let parsed: ImageFormat = serde_json::from_str("\"exr\"").unwrap();
        assert_eq!(parsed, ImageFormat::OpenExr);
        let parsed: ImageFormat = serde_json::from_str("\"jpg\"").unwrap();
        assert_eq!(parsed, ImageFormat::Jpeg);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("webp".parse::<ImageFormat>().is_err());
        assert_eq!(".PNG".parse::<ImageFormat>(), Ok(ImageFormat::Png));
    }

    #[test]
    fn test_color_depth_for_float() {
        assert_eq!(ColorDepth::for_float_buffer(false), ColorDepth::Eight);
        assert_eq!(ColorDepth::for_float_buffer(true), ColorDepth::ThirtyTwo);
    }
}
