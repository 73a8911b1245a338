//! Image cropping for uploaded pictures

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use crate::storage::{StorageError, StorageResult};

/// Target box for a cover crop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            width: 150,
            height: 150,
        }
    }
}

impl CropOptions {
    pub fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }
}

/// A cropped picture and the format sniffed from its bytes
#[derive(Debug, Clone)]
pub struct CroppedImage {
    pub data: Vec<u8>,
    pub format: ImageFormat,
}

impl CroppedImage {
    pub fn content_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// Resize and center-crop `data` to fill the target box, re-encoded in the
/// source format. Images smaller than the box are never enlarged: each side
/// is capped at the source dimension.
///
/// CPU bound; call from a blocking thread.
pub fn crop_image(data: &[u8], options: CropOptions) -> StorageResult<CroppedImage> {
    let format = image::guess_format(data)
        .map_err(|e| StorageError::Image(format!("unrecognized image: {e}")))?;
    let source = image::load_from_memory_with_format(data, format)
        .map_err(|e| StorageError::Image(e.to_string()))?;

    let width = options.width.min(source.width()).max(1);
    let height = options.height.min(source.height()).max(1);
    let cropped = source.resize_to_fill(width, height, FilterType::Lanczos3);

    let cropped = match format {
        // No alpha channel in JPEG
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(cropped.to_rgb8()),
        ImageFormat::WebP | ImageFormat::Gif => DynamicImage::ImageRgba8(cropped.to_rgba8()),
        _ => cropped,
    };

    let mut out = Cursor::new(Vec::new());
    cropped
        .write_to(&mut out, format)
        .map_err(|e| StorageError::Image(e.to_string()))?;

    Ok(CroppedImage {
        data: out.into_inner(),
        format,
    })
}
