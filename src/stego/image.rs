//! LSB bit embedding for pixel buffers (images and video frames).
//!
//! Payload bits are distributed across the LSBs of pixel channel values in
//! raster order, R then G then B per pixel. A fixed-size length header is
//! embedded first so extraction reads the header, then exactly the stated
//! number of bits:
//!
//! ```text
//! [4 bytes] magic "VBI1"
//! [4 bytes] blob length in bytes (big-endian)
//! then blob bits
//! ```

use crate::carrier::PixelCarrier;
use crate::ecc;
use crate::error::StegoError;

/// Magic prefix of an embedded image header.
pub const IMAGE_MAGIC: &[u8; 4] = b"VBI1";

/// Header size in bits.
pub const HEADER_BITS: usize = 64;

/// Embeds a blob into the carrier's channel LSBs in raster order.
pub fn embed(carrier: &mut PixelCarrier, blob: &[u8]) -> Result<(), StegoError> {
    let needed_bits = HEADER_BITS + blob.len() * 8;
    let capacity_bits = carrier.capacity_bits();
    if needed_bits > capacity_bits {
        return Err(StegoError::CapacityExceeded {
            needed_bits,
            capacity_bits,
        });
    }

    let mut framed = Vec::with_capacity(8 + blob.len());
    framed.extend_from_slice(IMAGE_MAGIC);
    framed.extend_from_slice(&(blob.len() as u32).to_be_bytes());
    framed.extend_from_slice(blob);
    let bits = ecc::bytes_to_bits(&framed);

    // ImageBuffer iterates pixels in raster order; channels are R,G,B.
    for (channel, &bit) in carrier
        .pixels_mut()
        .pixels_mut()
        .flat_map(|pixel| pixel.0.iter_mut())
        .zip(bits.iter())
    {
        *channel = (*channel & 0xFE) | bit;
    }
    Ok(())
}

/// Extracts an embedded blob from the carrier's channel LSBs.
pub fn extract(carrier: &PixelCarrier) -> Result<Vec<u8>, StegoError> {
    let capacity_bits = carrier.capacity_bits();
    if capacity_bits < HEADER_BITS {
        return Err(StegoError::CorruptPayload);
    }

    let mut lsbs = carrier
        .pixels()
        .pixels()
        .flat_map(|pixel| pixel.0.iter())
        .map(|&channel| channel & 1);

    let header_bits: Vec<u8> = lsbs.by_ref().take(HEADER_BITS).collect();
    let header = ecc::bits_to_bytes(&header_bits);
    if &header[..4] != IMAGE_MAGIC {
        return Err(StegoError::CorruptPayload);
    }
    let blob_len = u32::from_be_bytes([header[4], header[5], header[6], header[7]]) as usize;
    if HEADER_BITS + blob_len * 8 > capacity_bits {
        return Err(StegoError::CorruptPayload);
    }

    let blob_bits: Vec<u8> = lsbs.take(blob_len * 8).collect();
    Ok(ecc::bits_to_bytes(&blob_bits))
}
