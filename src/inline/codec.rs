//! Image re-encoding for data URIs.
//!
//! The file's extension picks the format; the image is decoded and encoded
//! again in that same format even when nothing changes.

use crate::{error::PipelineError, utils::mime};
use base64::Engine;
use image::{DynamicImage, ImageError, ImageFormat};
use std::{fs, io::Cursor, path::Path};

/// A re-encoded image ready to embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime: &'static str,
    pub payload: String,
}

impl EncodedImage {
    /// `data:<mime>;base64,<payload>`
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.payload)
    }
}

/// Decode `path` and re-encode it as base64 in its own format.
pub fn reencode(path: &Path) -> Result<EncodedImage, PipelineError> {
    let codec = |source: ImageError| PipelineError::Codec {
        path: path.to_path_buf(),
        source,
    };

    let format = ImageFormat::from_path(path).map_err(codec)?;
    let bytes = fs::read(path).map_err(|e| codec(ImageError::IoError(e)))?;
    let decoded = image::load_from_memory_with_format(&bytes, format).map_err(codec)?;

    let mut encoded = Cursor::new(Vec::new());
    encodable(decoded, format)
        .write_to(&mut encoded, format)
        .map_err(codec)?;

    let mut payload = String::new();
    base64::engine::general_purpose::STANDARD.encode_string(encoded.get_ref(), &mut payload);

    Ok(EncodedImage {
        mime: mime::from_path(path),
        payload,
    })
}

/// Narrow the pixel layout to one the target encoder accepts.
fn encodable(image: DynamicImage, format: ImageFormat) -> DynamicImage {
    match format {
        ImageFormat::Png => image,
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        _ => DynamicImage::ImageRgba8(image.to_rgba8()),
    }
}
