//! Texture decoder (DDS/PNG/BMP blob -> RGBA8)
//!
//! Payloads are identified by content first (a `DDS` magic), then by the
//! extension of the declared name. Every format goes through one
//! normalization step so callers only ever see a top-down RGBA8 buffer.
//! Broken payloads of a known format degrade to a shared magenta
//! placeholder instead of failing the conversion.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::error::DecodeError;

/// Width and height of the fallback image
pub const FALLBACK_SIZE: u32 = 64;

/// Fallback pixel color (opaque magenta)
pub const FALLBACK_COLOR: [u8; 4] = [255, 0, 255, 255];

const DDS_MAGIC: &[u8; 3] = b"DDS";

static FALLBACK: OnceLock<Arc<DecodedImage>> = OnceLock::new();

/// A decoded texture: `width × height` RGBA8 pixels, rows top to bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    image: RgbaImage,
}

impl DecodedImage {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Raw RGBA8 bytes (`width * height * 4`)
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// True when this is the process-wide placeholder returned by [`fallback`]
    pub fn is_fallback(&self) -> bool {
        FALLBACK
            .get()
            .is_some_and(|fallback| std::ptr::eq(self, Arc::as_ptr(fallback)))
    }
}

/// The shared placeholder texture, built on first use and never mutated.
pub fn fallback() -> Arc<DecodedImage> {
    FALLBACK
        .get_or_init(|| {
            Arc::new(DecodedImage::new(RgbaImage::from_pixel(
                FALLBACK_SIZE,
                FALLBACK_SIZE,
                Rgba(FALLBACK_COLOR),
            )))
        })
        .clone()
}

/// Image container formats the decoder understands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    Dds,
    Png,
    Bmp,
}

impl TextureFormat {
    /// Detect the format from the payload magic, then from the name's extension.
    pub fn detect(name: &str, data: &[u8]) -> Result<Self, DecodeError> {
        if data.starts_with(DDS_MAGIC) {
            return Ok(TextureFormat::Dds);
        }

        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "png" => Ok(TextureFormat::Png),
            "bmp" => Ok(TextureFormat::Bmp),
            _ => Err(DecodeError::UnknownFormat {
                name: name.to_string(),
            }),
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            TextureFormat::Dds => ImageFormat::Dds,
            TextureFormat::Png => ImageFormat::Png,
            TextureFormat::Bmp => ImageFormat::Bmp,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TextureFormat::Dds => "dds",
            TextureFormat::Png => "png",
            TextureFormat::Bmp => "bmp",
        }
    }
}

/// Decode a texture blob.
///
/// Returns [`fallback`] for an empty payload or a payload its codec rejects.
/// Only a name with no recognizable format (and no DDS magic) is an error.
pub fn decode(name: &str, data: &[u8]) -> Result<Arc<DecodedImage>, DecodeError> {
    if data.is_empty() {
        tracing::warn!("Empty texture {:?}, using fallback image", name);
        return Ok(fallback());
    }

    let format = TextureFormat::detect(name, data)?;

    match decode_rgba8(format, data) {
        Ok(image) if image.width() == 0 || image.height() == 0 => {
            tracing::warn!(
                "Decoded {} texture {:?} has no pixels ({}x{}), using fallback image",
                format.name(),
                name,
                image.width(),
                image.height()
            );
            Ok(fallback())
        }
        Ok(image) => {
            tracing::debug!(
                "Decoded {} texture {:?}: {}x{}",
                format.name(),
                name,
                image.width(),
                image.height()
            );
            Ok(Arc::new(DecodedImage::new(image)))
        }
        Err(e) => {
            tracing::warn!(
                "Failed to decode {} texture {:?}: {}, using fallback image",
                format.name(),
                name,
                e
            );
            Ok(fallback())
        }
    }
}

/// Decode a payload of a known format into RGBA8.
///
/// DDS support is whatever the image crate's decoder handles: DXT1/3/5
/// with both dimensions a multiple of 4. Other DDS layouts (uncompressed
/// A8R8G8B8, 1x1 or 2x2 mip tails) are codec errors here.
pub fn decode_rgba8(format: TextureFormat, data: &[u8]) -> image::ImageResult<RgbaImage> {
    let image = image::load_from_memory_with_format(data, format.image_format())?;
    Ok(normalize(image))
}

/// Convert any decoded color layout to RGBA8.
///
/// Layouts without an alpha channel (DXT1, 24-bit BMP, RGB PNG) come out
/// fully opaque.
fn normalize(image: DynamicImage) -> RgbaImage {
    match image {
        DynamicImage::ImageRgba8(rgba) => rgba,
        other => other.to_rgba8(),
    }
}
