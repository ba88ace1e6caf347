//! Pixel-buffer carrier normalization.
//!
//! Decodes an input image into a raw RGB buffer at original resolution.
//! The original container format does not matter on input, but output is
//! always PNG so the embedded LSBs survive losslessly.

use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

use crate::error::StegoError;

/// Channels used for embedding (R, G, B - alpha is never touched).
pub const CHANNELS: usize = 3;

/// A normalized pixel-buffer carrier.
pub struct PixelCarrier {
    pixels: RgbImage,
}

impl PixelCarrier {
    /// Decodes image bytes into an RGB pixel buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StegoError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| StegoError::UnsupportedFormat(format!("image decode: {e}")))?;
        Ok(Self {
            pixels: image.to_rgb8(),
        })
    }

    /// Wraps an already-decoded RGB buffer.
    pub fn from_rgb(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    /// Embedding capacity in bits: one LSB per channel value.
    pub fn capacity_bits(&self) -> usize {
        let (width, height) = self.pixels.dimensions();
        width as usize * height as usize * CHANNELS
    }

    /// The normalized pixel buffer.
    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Mutable access for the embedder.
    pub fn pixels_mut(&mut self) -> &mut RgbImage {
        &mut self.pixels
    }

    /// Encodes the carrier as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, StegoError> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(self.pixels.clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| StegoError::CarrierProcessing(format!("PNG encode: {e}")))?;
        Ok(bytes)
    }
}

/// Builds a synthetic test image with varied pixel values.
#[cfg(test)]
pub fn test_image(width: u32, height: u32) -> PixelCarrier {
    let pixels = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            ((x * 17) % 256) as u8,
            ((y * 23) % 256) as u8,
            (((x + y) * 31) % 256) as u8,
        ])
    });
    PixelCarrier::from_rgb(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity() {
        let carrier = test_image(100, 50);
        assert_eq!(carrier.capacity_bits(), 100 * 50 * 3);
    }

    #[test]
    fn test_png_roundtrip_lossless() {
        let carrier = test_image(64, 64);
        let png = carrier.to_png_bytes().unwrap();
        let reloaded = PixelCarrier::from_bytes(&png).unwrap();
        assert_eq!(reloaded.pixels().as_raw(), carrier.pixels().as_raw());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            PixelCarrier::from_bytes(b"not an image"),
            Err(StegoError::UnsupportedFormat(_))
        ));
    }
}
