//! Zero-width watermarking for plain text.
//!
//! Each bit of the encrypted blob maps to one of two zero-width code
//! points appended as a single contiguous run after the visible host
//! text - never interleaved within words, so visible rendering and
//! copy/paste both survive:
//!
//! - bit 0 → U+200B ZERO WIDTH SPACE
//! - bit 1 → U+200C ZERO WIDTH NON-JOINER
//!
//! Extraction scans the trailing run of alphabet code points. Any other
//! code point (including other zero-width characters a transport may
//! inject) terminates the run. A transport that strips zero-width
//! characters destroys the watermark irrecoverably; that surfaces as
//! `WatermarkNotFound` or `TruncatedWatermark`.

use crate::carrier::TextCarrier;
use crate::error::StegoError;

/// Code point carrying a 0 bit.
pub const BIT_ZERO: char = '\u{200B}';
/// Code point carrying a 1 bit.
pub const BIT_ONE: char = '\u{200C}';

/// Smallest valid blob: a CBC IV plus one cipher block.
const MIN_BLOB_BYTES: usize = 32;

/// Appends the blob as a zero-width code point run after the host text.
pub fn embed(carrier: &TextCarrier, blob: &[u8]) -> String {
    let mut out = String::with_capacity(carrier.text().len() + blob.len() * 8 * 3);
    out.push_str(carrier.text());
    for &byte in blob {
        for shift in (0..8).rev() {
            out.push(if (byte >> shift) & 1 == 1 {
                BIT_ONE
            } else {
                BIT_ZERO
            });
        }
    }
    out
}

/// Recovers the blob from the trailing zero-width run of a watermarked
/// text.
///
/// No trailing alphabet code points at all is `WatermarkNotFound`; a run
/// that is not a positive multiple of 8 bits, or decodes to fewer bytes
/// than an IV plus one cipher block, is `TruncatedWatermark`.
pub fn extract(carrier: &TextCarrier) -> Result<Vec<u8>, StegoError> {
    let mut bits: Vec<u8> = Vec::new();
    for c in carrier.text().chars().rev() {
        match c {
            BIT_ZERO => bits.push(0),
            BIT_ONE => bits.push(1),
            _ => break,
        }
    }
    if bits.is_empty() {
        return Err(StegoError::WatermarkNotFound);
    }
    if bits.len() % 8 != 0 {
        return Err(StegoError::TruncatedWatermark);
    }
    bits.reverse();

    let blob = crate::ecc::bits_to_bytes(&bits);
    if blob.len() < MIN_BLOB_BYTES {
        return Err(StegoError::TruncatedWatermark);
    }
    Ok(blob)
}
