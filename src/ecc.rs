//! Hamming(7,4) forward error correction and bit packing.
//!
//! Every 4 data bits expand to a 7-bit codeword laid out as
//! `p1 p2 d1 p3 d2 d3 d4` with parity equations:
//!
//! ```text
//! p1 = d1 ^ d2 ^ d4
//! p2 = d1 ^ d3 ^ d4
//! p3 = d2 ^ d3 ^ d4
//! ```
//!
//! Decoding recomputes the syndrome; a nonzero syndrome names the one
//! erroneous position (1-based) among the 7 and that bit is flipped before
//! the data bits are extracted. Double-bit errors alias to a wrong single
//! position and are undetectable by design - no correction is claimed for
//! them.
//!
//! The expansion costs 7/4 of the capacity in exchange for tolerating one
//! flipped bit per codeword. It is an encode-time option on the audio
//! path, not a default.
//!
//! Bits here are `u8` values of 0 or 1, packed MSB-first within a byte.

/// Unpacks bytes into bits, most significant bit first.
pub fn bytes_to_bits(data: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(data.len() * 8);
    for &byte in data {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

/// Packs bits (MSB first) back into bytes. A trailing partial byte is
/// left-aligned and zero-filled.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bits.len().div_ceil(8));
    let mut byte = 0u8;
    let mut count = 0;
    for &bit in bits {
        byte = (byte << 1) | (bit & 1);
        count += 1;
        if count == 8 {
            out.push(byte);
            byte = 0;
            count = 0;
        }
    }
    if count > 0 {
        out.push(byte << (8 - count));
    }
    out
}

/// Number of encoded bits produced for `data_bits` input bits.
///
/// Input is processed in 4-bit groups; a partial tail group is zero-padded
/// to 4 bits before encoding.
pub fn encoded_len(data_bits: usize) -> usize {
    data_bits.div_ceil(4) * 7
}

/// Result of decoding a Hamming(7,4) bit stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Recovered data bits, 4 per complete 7-bit codeword.
    pub bits: Vec<u8>,
    /// Number of codewords in which a single-bit error was corrected.
    pub corrected: usize,
}

/// Encodes data bits into Hamming(7,4) codewords.
pub fn hamming_encode(bits: &[u8]) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(encoded_len(bits.len()));
    for chunk in bits.chunks(4) {
        let mut d = [0u8; 4];
        for (i, &bit) in chunk.iter().enumerate() {
            d[i] = bit & 1;
        }
        let [d1, d2, d3, d4] = d;
        let p1 = d1 ^ d2 ^ d4;
        let p2 = d1 ^ d3 ^ d4;
        let p3 = d2 ^ d3 ^ d4;
        encoded.extend_from_slice(&[p1, p2, d1, p3, d2, d3, d4]);
    }
    encoded
}

/// Decodes Hamming(7,4) codewords, correcting up to one flipped bit per
/// 7-bit group. Trailing bits that do not fill a codeword are dropped.
pub fn hamming_decode(bits: &[u8]) -> Decoded {
    let mut decoded = Vec::with_capacity(bits.len() / 7 * 4);
    let mut corrected = 0;
    for group in bits.chunks_exact(7) {
        let mut chunk = [0u8; 7];
        for (i, &bit) in group.iter().enumerate() {
            chunk[i] = bit & 1;
        }
        let [p1, p2, d1, p3, d2, d3, d4] = chunk;
        let s1 = p1 ^ d1 ^ d2 ^ d4;
        let s2 = p2 ^ d1 ^ d3 ^ d4;
        let s3 = p3 ^ d2 ^ d3 ^ d4;
        let syndrome = ((s3 << 2) | (s2 << 1) | s1) as usize;
        if syndrome != 0 {
            chunk[syndrome - 1] ^= 1;
            corrected += 1;
        }
        decoded.extend_from_slice(&[chunk[2], chunk[4], chunk[5], chunk[6]]);
    }
    Decoded {
        bits: decoded,
        corrected,
    }
}
