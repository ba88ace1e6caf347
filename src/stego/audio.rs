//! LSB bit embedding for PCM audio.
//!
//! Each bit overwrites the least significant bit of one sample, iterating
//! samples in index order with no interleaving or shuffling. A fixed-size
//! header goes in first so extraction knows exactly how many bits follow -
//! no carrier-wide scan on decode:
//!
//! ```text
//! header (9 bytes = 72 bits, never ECC-coded):
//!   [4 bytes] magic "VBA1"
//!   [1 byte ] flags (bit 0: body is Hamming(7,4)-coded)
//!   [4 bytes] blob length in bytes (big-endian)
//! body: blob bits, ECC-expanded when flagged
//! ```
//!
//! The header stays uncoded because the ECC flag must be readable before
//! the body can be interpreted.

use crate::carrier::PcmCarrier;
use crate::ecc;
use crate::error::StegoError;

/// Magic prefix of an embedded audio header.
pub const AUDIO_MAGIC: &[u8; 4] = b"VBA1";

/// Header size in bits.
pub const HEADER_BITS: usize = 72;

/// Flags bit 0: body bits are Hamming(7,4) codewords.
const FLAG_ECC: u8 = 0b0000_0001;

/// Number of body bits a blob occupies once embedded.
pub fn body_bits(blob_len: usize, use_ecc: bool) -> usize {
    if use_ecc {
        ecc::encoded_len(blob_len * 8)
    } else {
        blob_len * 8
    }
}

/// Embeds a blob into the carrier's sample LSBs.
///
/// Fails with `CapacityExceeded` before any sample is modified if the
/// header plus (optionally ECC-expanded) body does not fit.
pub fn embed(carrier: &mut PcmCarrier, blob: &[u8], use_ecc: bool) -> Result<(), StegoError> {
    let needed_bits = HEADER_BITS + body_bits(blob.len(), use_ecc);
    let capacity_bits = carrier.capacity_bits();
    if needed_bits > capacity_bits {
        return Err(StegoError::CapacityExceeded {
            needed_bits,
            capacity_bits,
        });
    }

    let mut header = Vec::with_capacity(9);
    header.extend_from_slice(AUDIO_MAGIC);
    header.push(if use_ecc { FLAG_ECC } else { 0 });
    header.extend_from_slice(&(blob.len() as u32).to_be_bytes());

    let mut bits = ecc::bytes_to_bits(&header);
    let blob_bits = ecc::bytes_to_bits(blob);
    if use_ecc {
        bits.extend(ecc::hamming_encode(&blob_bits));
    } else {
        bits.extend(blob_bits);
    }

    for (sample, &bit) in carrier.samples_mut().iter_mut().zip(bits.iter()) {
        *sample = (*sample & !1) | bit as i16;
    }
    Ok(())
}

/// Extracts an embedded blob from the carrier's sample LSBs.
///
/// A missing or implausible header is `CorruptPayload` - the input is
/// either not a stego WAV or has been truncated.
pub fn extract(carrier: &PcmCarrier) -> Result<Vec<u8>, StegoError> {
    let samples = carrier.samples();
    if samples.len() < HEADER_BITS {
        return Err(StegoError::CorruptPayload);
    }

    let header_bits: Vec<u8> = samples[..HEADER_BITS]
        .iter()
        .map(|&s| (s & 1) as u8)
        .collect();
    let header = ecc::bits_to_bytes(&header_bits);
    if &header[..4] != AUDIO_MAGIC {
        return Err(StegoError::CorruptPayload);
    }
    let use_ecc = header[4] & FLAG_ECC != 0;
    let blob_len = u32::from_be_bytes([header[5], header[6], header[7], header[8]]) as usize;

    let body_len = body_bits(blob_len, use_ecc);
    if HEADER_BITS + body_len > samples.len() {
        return Err(StegoError::CorruptPayload);
    }

    let raw: Vec<u8> = samples[HEADER_BITS..HEADER_BITS + body_len]
        .iter()
        .map(|&s| (s & 1) as u8)
        .collect();
    let blob_bits = if use_ecc {
        ecc::hamming_decode(&raw).bits
    } else {
        raw
    };

    let mut blob = ecc::bits_to_bytes(&blob_bits);
    // ECC tail padding can yield a trailing spare nibble's worth of bits.
    blob.truncate(blob_len);
    Ok(blob)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::wav::sine_carrier;

    #[test]
    fn test_embed_extract_roundtrip() {
        let mut carrier = sine_carrier(10000);
        let blob = b"hidden in sample noise";
        embed(&mut carrier, blob, false).unwrap();
        assert_eq!(extract(&carrier).unwrap(), blob);
    }

    #[test]
    fn test_embed_extract_roundtrip_ecc() {
        let mut carrier = sine_carrier(10000);
        let blob = b"protected by hamming codes";
        embed(&mut carrier, blob, true).unwrap();
        assert_eq!(extract(&carrier).unwrap(), blob);
    }

    #[test]
    fn test_ecc_survives_one_flip_per_codeword() {
        let mut carrier = sine_carrier(10000);
        let blob = b"resilient";
        embed(&mut carrier, blob, true).unwrap();

        // Flip one sample LSB in every 7-bit body group.
        let body_len = body_bits(blob.len(), true);
        let samples = carrier.samples_mut();
        for start in (0..body_len).step_by(7) {
            let idx = HEADER_BITS + start + (start / 7 % 7);
            samples[idx] ^= 1;
        }
        assert_eq!(extract(&carrier).unwrap(), blob);
    }

    #[test]
    fn test_without_ecc_flip_corrupts() {
        let mut carrier = sine_carrier(10000);
        let blob = b"fragile";
        embed(&mut carrier, blob, false).unwrap();
        carrier.samples_mut()[HEADER_BITS] ^= 1;
        assert_ne!(extract(&carrier).unwrap(), blob);
    }

    #[test]
    fn test_capacity_boundary() {
        // 72 header bits + 8 body bits fit exactly in 80 samples.
        let mut exact = sine_carrier(80);
        embed(&mut exact, &[0xAB], false).unwrap();
        assert_eq!(extract(&exact).unwrap(), [0xAB]);

        let mut short = sine_carrier(79);
        assert!(matches!(
            embed(&mut short, &[0xAB], false),
            Err(StegoError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_samples_untouched_on_capacity_error() {
        let mut carrier = sine_carrier(100);
        let before = carrier.samples().to_vec();
        let _ = embed(&mut carrier, &[0u8; 64], false);
        assert_eq!(carrier.samples(), before.as_slice());
    }

    #[test]
    fn test_plain_audio_rejected() {
        let carrier = sine_carrier(10000);
        assert!(matches!(
            extract(&carrier),
            Err(StegoError::CorruptPayload)
        ));
    }

    #[test]
    fn test_implausible_length_rejected() {
        let mut carrier = sine_carrier(200);
        embed(&mut carrier, &[1, 2, 3], false).unwrap();
        // Corrupt the length field (bits 40..72) to a huge value.
        for i in 40..48 {
            let s = &mut carrier.samples_mut()[i];
            *s |= 1;
        }
        assert!(matches!(
            extract(&carrier),
            Err(StegoError::CorruptPayload)
        ));
    }
}
