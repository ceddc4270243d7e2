//! Image normalization before upload
//!
//! Turns a user-selected image of any size and format into a bounded
//! JPEG: decode, aspect-preserving downscale, lossy encode, reject if
//! the result still exceeds the byte ceiling. Pure over its inputs; the
//! caller owns all file system and UI interaction.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

use crate::error::NormalizeError;

/// Default longest-edge ceiling in pixels
pub const DEFAULT_MAX_DIMENSION: u32 = 800;
/// Default JPEG quality factor
pub const DEFAULT_QUALITY: f32 = 0.5;
/// Default ceiling on the encoded output size
pub const DEFAULT_MAX_ENCODED_BYTES: usize = 500_000;

/// Bounds applied to every normalized image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    /// Longest edge of the output, in pixels. Must be positive.
    pub max_dimension: u32,
    /// Lossy quality factor in (0, 1], mapped onto the codec's 1-100 scale.
    pub quality: f32,
    /// Hard ceiling on the encoded size. Oversized output is rejected,
    /// not re-compressed, so pick this conservatively.
    pub max_encoded_bytes: usize,
}

impl Default for Constraints {
    fn default() -> Self {
        Constraints {
            max_dimension: DEFAULT_MAX_DIMENSION,
            quality: DEFAULT_QUALITY,
            max_encoded_bytes: DEFAULT_MAX_ENCODED_BYTES,
        }
    }
}

/// Normalize raw image bytes into an upload-ready JPEG.
///
/// Deterministic: the same input bytes and constraints always produce
/// byte-identical output. Never upscales; images already inside
/// `max_dimension` keep their pixel dimensions.
pub fn normalize(raw: &[u8], constraints: &Constraints) -> Result<Vec<u8>, NormalizeError> {
    let img = image::load_from_memory(raw).map_err(NormalizeError::Decode)?;

    let (width, height) = (img.width(), img.height());
    let (target_w, target_h) = target_dimensions(width, height, constraints.max_dimension);

    let resized = if (target_w, target_h) == (width, height) {
        img
    } else {
        img.resize_exact(target_w, target_h, FilterType::Lanczos3)
    };

    // JPEG has no alpha channel
    let rgb = resized.to_rgb8();

    let mut encoded = Vec::new();
    let mut encoder =
        JpegEncoder::new_with_quality(&mut encoded, quality_percent(constraints.quality));
    encoder.encode_image(&rgb).map_err(NormalizeError::Encode)?;

    if encoded.len() > constraints.max_encoded_bytes {
        return Err(NormalizeError::TooLarge {
            size: encoded.len(),
            limit: constraints.max_encoded_bytes,
        });
    }

    Ok(encoded)
}

/// Compute output dimensions preserving aspect ratio.
///
/// Landscape and square images scale by width, portrait by height, so
/// the longer edge lands exactly on `max_dimension`. The shorter edge
/// rounds to the nearest pixel with a floor of 1.
fn target_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width.max(height) <= max_dimension {
        return (width, height);
    }

    let scale = if width >= height {
        f64::from(max_dimension) / f64::from(width)
    } else {
        f64::from(max_dimension) / f64::from(height)
    };

    let target_w = ((f64::from(width) * scale).round() as u32).max(1);
    let target_h = ((f64::from(height) * scale).round() as u32).max(1);
    (target_w, target_h)
}

/// Map the (0, 1] quality factor onto the codec's 1-100 scale.
fn quality_percent(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    /// PNG-encode a synthetic gradient so normalize has real pixels to chew on
    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn decode(jpeg: &[u8]) -> DynamicImage {
        assert_eq!(image::guess_format(jpeg).unwrap(), ImageFormat::Jpeg);
        image::load_from_memory(jpeg).unwrap()
    }

    #[test]
    fn test_downscales_landscape_to_ceiling() {
        let out = normalize(&png_bytes(1600, 1200), &Constraints::default()).unwrap();
        let img = decode(&out);
        assert_eq!((img.width(), img.height()), (800, 600));
        assert!(out.len() <= DEFAULT_MAX_ENCODED_BYTES);
    }

    #[test]
    fn test_downscales_portrait_to_ceiling() {
        let out = normalize(&png_bytes(1200, 1600), &Constraints::default()).unwrap();
        let img = decode(&out);
        assert_eq!((img.width(), img.height()), (600, 800));
    }

    #[test]
    fn test_never_upscales_small_images() {
        let out = normalize(&png_bytes(400, 300), &Constraints::default()).unwrap();
        let img = decode(&out);
        assert_eq!((img.width(), img.height()), (400, 300));
    }

    #[test]
    fn test_square_image_scales_by_width() {
        let out = normalize(&png_bytes(1000, 1000), &Constraints::default()).unwrap();
        let img = decode(&out);
        assert_eq!((img.width(), img.height()), (800, 800));
    }

    #[test]
    fn test_longer_edge_lands_exactly_on_ceiling() {
        let out = normalize(&png_bytes(1000, 333), &Constraints::default()).unwrap();
        let img = decode(&out);
        assert_eq!(img.width(), 800);
        // 333 * 800/1000 = 266.4 -> 266
        assert_eq!(img.height(), 266);
    }

    #[test]
    fn test_aspect_ratio_preserved_within_rounding() {
        let out = normalize(&png_bytes(1777, 999), &Constraints::default()).unwrap();
        let img = decode(&out);
        let source_ratio = 1777.0 / 999.0;
        let out_ratio = f64::from(img.width()) / f64::from(img.height());
        // One rounding unit on the short edge
        let tolerance = source_ratio / f64::from(img.height());
        assert!((source_ratio - out_ratio).abs() <= tolerance);
    }

    #[test]
    fn test_extreme_ratio_keeps_dimensions_at_least_one() {
        let out = normalize(&png_bytes(3000, 2), &Constraints::default()).unwrap();
        let img = decode(&out);
        assert_eq!(img.width(), 800);
        assert!(img.height() >= 1);
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let raw = png_bytes(1234, 567);
        let a = normalize(&raw, &Constraints::default()).unwrap();
        let b = normalize(&raw, &Constraints::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_malformed_bytes_yield_decode_error() {
        let err = normalize(b"definitely not an image", &Constraints::default()).unwrap_err();
        assert!(matches!(err, NormalizeError::Decode(_)));
    }

    #[test]
    fn test_truncated_image_yields_decode_error() {
        let mut raw = png_bytes(200, 200);
        raw.truncate(raw.len() / 2);
        let err = normalize(&raw, &Constraints::default()).unwrap_err();
        assert!(matches!(err, NormalizeError::Decode(_)));
    }

    #[test]
    fn test_oversized_output_is_rejected_not_recompressed() {
        let constraints = Constraints { max_encoded_bytes: 64, ..Constraints::default() };
        let err = normalize(&png_bytes(1600, 1200), &constraints).unwrap_err();
        match err {
            NormalizeError::TooLarge { size, limit } => {
                assert!(size > limit);
                assert_eq!(limit, 64);
            }
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_quality_factor_bounds_are_usable() {
        let raw = png_bytes(640, 480);
        let full = Constraints { quality: 1.0, ..Constraints::default() };
        let floor = Constraints { quality: 0.001, ..Constraints::default() };
        let high = normalize(&raw, &full).unwrap();
        let low = normalize(&raw, &floor).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_transparent_input_is_flattened_to_jpeg() {
        let rgba = image::RgbaImage::from_pixel(600, 400, image::Rgba([10, 20, 30, 128]));
        let mut raw = Vec::new();
        DynamicImage::ImageRgba8(rgba)
            .write_to(&mut Cursor::new(&mut raw), ImageFormat::Png)
            .unwrap();

        let out = normalize(&raw, &Constraints::default()).unwrap();
        let img = decode(&out);
        assert_eq!((img.width(), img.height()), (600, 400));
    }
}
