//! Pure Rust raster backend — the `image` crate, statically linked.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Measure | `ImageReader::with_guessed_format` + `into_dimensions` (header read, no full decode) |
//! | Decode (JPEG, PNG, GIF, WebP, TIFF, BMP) | `image` crate decoders |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → JPEG with quality | `image::codecs::jpeg::JpegEncoder::new_with_quality` |
//! | Encode → everything else | `DynamicImage::write_to` (format from extension token) |
//!
//! Everything runs in memory: encoded bytes in, encoded bytes out. Policy and
//! dimension decisions live in [`calculations`](super::calculations); this
//! file only resamples and encodes.

use super::backend::{BackendError, Dimensions, RasterBackend};
use super::calculations::target_dimensions;
use super::params::RenderJob;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

/// Production backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an image from an in-memory buffer, sniffing the format from magic
/// bytes rather than trusting any extension.
fn decode(source: &[u8]) -> Result<DynamicImage, BackendError> {
    ImageReader::new(Cursor::new(source))
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| BackendError::Decode(e.to_string()))
}

/// Map a lowercase format token to the encoder's format, rejecting tokens the
/// compiled-in encoder set doesn't cover.
fn output_format(token: &str) -> Result<ImageFormat, BackendError> {
    ImageFormat::from_extension(token)
        .filter(|fmt| fmt.writing_enabled())
        .ok_or_else(|| BackendError::Encode(format!("unsupported output format: '{token}'")))
}

/// Encode an image to the given format token, applying quality where the
/// encoder supports it.
fn encode(
    img: &DynamicImage,
    token: &str,
    quality: Option<super::params::Quality>,
) -> Result<Vec<u8>, BackendError> {
    let format = output_format(token)?;
    let mut buf = Cursor::new(Vec::new());

    match format {
        ImageFormat::Jpeg => {
            // JPEG can't carry alpha; quality maps directly onto the encoder
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let q = quality.unwrap_or_default().value() as u8;
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, q);
            rgb.write_with_encoder(encoder)
                .map_err(|e| BackendError::Encode(e.to_string()))?;
        }
        _ => {
            img.write_to(&mut buf, format)
                .map_err(|e| BackendError::Encode(e.to_string()))?;
        }
    }

    Ok(buf.into_inner())
}

impl RasterBackend for RustBackend {
    fn measure(&self, source: &[u8]) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::new(Cursor::new(source))
            .with_guessed_format()
            .map_err(BackendError::Io)?
            .into_dimensions()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(Dimensions { width, height })
    }

    fn render(&self, source: &[u8], job: &RenderJob) -> Result<Vec<u8>, BackendError> {
        let img = decode(source)?;
        let (target_w, target_h) = target_dimensions(
            (img.width(), img.height()),
            (job.width, job.height),
            job.policy,
        );

        let resized = if (target_w, target_h) == (img.width(), img.height()) {
            img
        } else {
            img.resize_exact(target_w, target_h, FilterType::Lanczos3)
        };

        encode(&resized, &job.format, job.quality)
    }
}
