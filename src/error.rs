//! Unified error taxonomy for the engine.
//!
//! Every error is terminal for the call that produced it: the engine never
//! retries, because retrying deterministic bad input is meaningless. Callers
//! decide whether to prompt the user again.

use thiserror::Error;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug)]
pub enum StegoError {
    /// The password is empty. Checked before any carrier byte is touched.
    #[error("Password must not be empty")]
    InvalidKey,

    /// The payload is empty, or its kind is not allowed for this carrier
    /// (audio carriers accept text messages only).
    #[error("Invalid payload for this carrier: {0}")]
    InvalidPayload(String),

    /// The carrier cannot be parsed or normalized (non-PCM WAV, undecodable
    /// image, non-UTF-8 text).
    #[error("Unsupported carrier format: {0}")]
    UnsupportedFormat(String),

    /// The payload does not fit the carrier's embedding capacity.
    #[error("Payload too large: need {needed_bits} bits, carrier holds {capacity_bits}")]
    CapacityExceeded {
        needed_bits: usize,
        capacity_bits: usize,
    },

    /// Frame extraction or remux failed (video path).
    #[error("Carrier processing failed: {0}")]
    CarrierProcessing(String),

    /// Decryption failed its padding check - typically a wrong password.
    #[error("Decryption failed (wrong password or corrupted data)")]
    Decrypt,

    /// No zero-width watermark run found at the end of the text.
    #[error("No watermark found in text")]
    WatermarkNotFound,

    /// A watermark run was found but is too short or not byte-aligned,
    /// usually because a transport stripped some zero-width characters.
    #[error("Watermark is truncated or damaged")]
    TruncatedWatermark,

    /// The length/magic header did not check out after decryption:
    /// wrong password on the stream-cipher path, or non-stego input.
    #[error("Hidden payload is corrupt or absent (wrong password or not a stego file)")]
    CorruptPayload,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
