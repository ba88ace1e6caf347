//! Per-media-type encode/decode pipelines.
//!
//! Each entrypoint sequences key derivation, payload encryption, carrier
//! normalization, and embedding (or the reverse), and enforces the
//! capacity and format invariants along the way. Every call is an
//! independent, synchronous computation over owned data - no shared
//! mutable state, nothing persisted, identical inputs give identical
//! results (up to the fresh IV/salt).

use crate::carrier::{PcmCarrier, PixelCarrier, TextCarrier};
use crate::crypto::{
    decrypt_cbc, decrypt_ctr, derive_audio_key, derive_direct_key, encrypt_cbc, encrypt_ctr,
    keys::check_password, SALT_LEN,
};
use crate::error::StegoError;
use crate::payload::Payload;
use crate::stego::{audio, image, text, FfmpegFrameBridge, VideoFrameBridge};

use rand::rngs::OsRng;
use rand::RngCore;

/// The supported carrier media types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierKind {
    /// 16-bit PCM WAV audio.
    Audio,
    /// Lossless-decodable image, re-emitted as PNG.
    Image,
    /// Video container; the first frame carries the payload.
    Video,
    /// UTF-8 text with an appended zero-width watermark.
    Text,
}

impl CarrierKind {
    /// Infers the carrier kind from a file extension (lowercased, no dot).
    /// Unknown extensions fall back to `Text`.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "wav" => CarrierKind::Audio,
            "png" | "bmp" | "jpg" | "jpeg" | "gif" | "tif" | "tiff" | "webp" => CarrierKind::Image,
            "mp4" | "mkv" | "mov" | "avi" | "webm" => CarrierKind::Video,
            _ => CarrierKind::Text,
        }
    }
}

/// Advisory progress callback, called with a fraction in `[0, 1]`.
pub type ProgressFn<'a> = &'a (dyn Fn(f32) + Sync);

/// Options for encoding.
#[derive(Default)]
pub struct EncodeOptions<'a> {
    /// Apply Hamming(7,4) to the embedded body. Audio path only; the
    /// flag is recorded in the embedded header so decode never guesses.
    pub ecc: bool,
    /// Optional progress callback. Advisory only - never affects output.
    pub progress: Option<ProgressFn<'a>>,
}

/// Options for decoding.
#[derive(Default)]
pub struct DecodeOptions<'a> {
    /// Showcase mode: when payload validation fails after decryption,
    /// return the lossy UTF-8 reading of the decrypted bytes instead of
    /// `CorruptPayload`. Off by default - fail closed.
    pub permissive: bool,
    /// Optional progress callback. Advisory only.
    pub progress: Option<ProgressFn<'a>>,
}

/// Result of an encode: the stego bytes and their file extension.
#[derive(Debug, Clone)]
pub struct StegoOutput {
    pub bytes: Vec<u8>,
    /// Target extension without the dot: `wav`, `png`, `mkv`, or `txt`.
    pub extension: String,
}

// Stage fractions reported to the progress callback. These mirror the
// original UI's stage split (encrypting / embedding / finalizing).
const STAGE_START: f32 = 0.0;
const STAGE_ENCRYPT: f32 = 0.3;
const STAGE_EMBED: f32 = 0.7;
const STAGE_DONE: f32 = 1.0;

fn report(progress: &Option<ProgressFn<'_>>, fraction: f32) {
    if let Some(cb) = progress {
        cb(fraction);
    }
}

/// Encodes a payload into a carrier of the given kind.
pub fn encode(
    carrier: &[u8],
    kind: CarrierKind,
    payload: &Payload,
    password: &str,
    options: &EncodeOptions<'_>,
) -> Result<StegoOutput, StegoError> {
    match kind {
        CarrierKind::Audio => encode_audio(carrier, payload, password, options),
        CarrierKind::Image => encode_image(carrier, payload, password, options),
        CarrierKind::Video => {
            encode_video_with_bridge(&FfmpegFrameBridge::default(), carrier, payload, password, options)
        }
        CarrierKind::Text => encode_text(carrier, payload, password, options),
    }
}

/// Decodes a payload from a stego artifact of the given kind.
pub fn decode(
    stego: &[u8],
    kind: CarrierKind,
    password: &str,
    options: &DecodeOptions<'_>,
) -> Result<Payload, StegoError> {
    match kind {
        CarrierKind::Audio => decode_audio(stego, password, options),
        CarrierKind::Image => decode_image(stego, password, options),
        CarrierKind::Video => {
            decode_video_with_bridge(&FfmpegFrameBridge::default(), stego, password, options)
        }
        CarrierKind::Text => decode_text(stego, password, options),
    }
}

/// Computes how many payload bytes a carrier can hold (header overhead
/// and, where relevant, cipher overhead excluded from the carrier side
/// but not estimated for the payload). Returns `None` for text carriers,
/// whose appended watermark has no capacity ceiling.
pub fn capacity_bytes(carrier: &[u8], kind: CarrierKind) -> Result<Option<usize>, StegoError> {
    match kind {
        CarrierKind::Audio => {
            let carrier = PcmCarrier::from_bytes(carrier)?;
            Ok(Some(
                carrier.capacity_bits().saturating_sub(audio::HEADER_BITS) / 8,
            ))
        }
        CarrierKind::Image => {
            let carrier = PixelCarrier::from_bytes(carrier)?;
            Ok(Some(
                carrier.capacity_bits().saturating_sub(image::HEADER_BITS) / 8,
            ))
        }
        CarrierKind::Video => {
            let frame = FfmpegFrameBridge::default().extract_frame(carrier)?;
            capacity_bytes(&frame, CarrierKind::Image)
        }
        CarrierKind::Text => {
            TextCarrier::from_bytes(carrier)?;
            Ok(None)
        }
    }
}

// ---- audio ----

fn encode_audio(
    carrier: &[u8],
    payload: &Payload,
    password: &str,
    options: &EncodeOptions<'_>,
) -> Result<StegoOutput, StegoError> {
    check_password(password)?;
    if !payload.is_message() {
        return Err(StegoError::InvalidPayload(
            "audio carriers hold text messages only".into(),
        ));
    }
    report(&options.progress, STAGE_START);

    let frame = payload.to_frame()?;
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let key = derive_audio_key(password, &salt)?;
    report(&options.progress, STAGE_ENCRYPT);

    // Blob layout: salt || iv || ciphertext. The salt travels with the
    // ciphertext so decode can rerun the same scrypt derivation.
    let mut blob = Vec::with_capacity(SALT_LEN + 16 + frame.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&encrypt_ctr(&key, &frame));
    report(&options.progress, STAGE_EMBED);

    let mut carrier = PcmCarrier::from_bytes(carrier)?;
    audio::embed(&mut carrier, &blob, options.ecc)?;
    let bytes = carrier.to_wav_bytes()?;
    report(&options.progress, STAGE_DONE);

    Ok(StegoOutput {
        bytes,
        extension: "wav".to_string(),
    })
}

fn decode_audio(
    stego: &[u8],
    password: &str,
    options: &DecodeOptions<'_>,
) -> Result<Payload, StegoError> {
    check_password(password)?;
    report(&options.progress, STAGE_START);

    let carrier = PcmCarrier::from_bytes(stego)?;
    let blob = audio::extract(&carrier)?;
    if blob.len() < SALT_LEN {
        return Err(StegoError::CorruptPayload);
    }
    report(&options.progress, STAGE_EMBED);

    let salt: [u8; SALT_LEN] = blob[..SALT_LEN].try_into().expect("length checked");
    let key = derive_audio_key(password, &salt)?;
    let plain = decrypt_ctr(&key, &blob[SALT_LEN..])?;
    report(&options.progress, STAGE_DONE);

    finish_decode(plain, options)
}

// ---- image ----

fn encode_image(
    carrier: &[u8],
    payload: &Payload,
    password: &str,
    options: &EncodeOptions<'_>,
) -> Result<StegoOutput, StegoError> {
    check_password(password)?;
    report(&options.progress, STAGE_START);

    let key = derive_direct_key(password)?;
    let blob = encrypt_cbc(&key, &payload.to_frame()?);
    report(&options.progress, STAGE_ENCRYPT);

    let mut carrier = PixelCarrier::from_bytes(carrier)?;
    image::embed(&mut carrier, &blob)?;
    report(&options.progress, STAGE_EMBED);

    let bytes = carrier.to_png_bytes()?;
    report(&options.progress, STAGE_DONE);

    Ok(StegoOutput {
        bytes,
        extension: "png".to_string(),
    })
}

fn decode_image(
    stego: &[u8],
    password: &str,
    options: &DecodeOptions<'_>,
) -> Result<Payload, StegoError> {
    check_password(password)?;
    report(&options.progress, STAGE_START);

    let carrier = PixelCarrier::from_bytes(stego)?;
    let blob = image::extract(&carrier)?;
    report(&options.progress, STAGE_EMBED);

    let key = derive_direct_key(password)?;
    let plain = decrypt_cbc(&key, &blob)?;
    report(&options.progress, STAGE_DONE);

    finish_decode(plain, options)
}

// ---- video ----

/// Encodes into a video's first frame using an explicit frame bridge.
///
/// The default entrypoints use [`FfmpegFrameBridge`]; tests and embedders
/// of other multimedia toolkits inject their own.
pub fn encode_video_with_bridge(
    bridge: &dyn VideoFrameBridge,
    carrier: &[u8],
    payload: &Payload,
    password: &str,
    options: &EncodeOptions<'_>,
) -> Result<StegoOutput, StegoError> {
    check_password(password)?;
    report(&options.progress, STAGE_START);

    let frame_png = bridge.extract_frame(carrier)?;
    report(&options.progress, STAGE_ENCRYPT);

    // The frame IS an image carrier from here on.
    let key = derive_direct_key(password)?;
    let blob = encrypt_cbc(&key, &payload.to_frame()?);
    let mut frame = PixelCarrier::from_bytes(&frame_png)?;
    image::embed(&mut frame, &blob)?;
    report(&options.progress, STAGE_EMBED);

    let (bytes, extension) = bridge.recombine(carrier, &frame.to_png_bytes()?)?;
    report(&options.progress, STAGE_DONE);

    Ok(StegoOutput { bytes, extension })
}

/// Decodes from a video's first frame using an explicit frame bridge.
pub fn decode_video_with_bridge(
    bridge: &dyn VideoFrameBridge,
    stego: &[u8],
    password: &str,
    options: &DecodeOptions<'_>,
) -> Result<Payload, StegoError> {
    check_password(password)?;
    report(&options.progress, STAGE_START);

    let frame_png = bridge.extract_frame(stego)?;
    report(&options.progress, STAGE_EMBED);

    decode_image(&frame_png, password, options)
}

// ---- text ----

fn encode_text(
    carrier: &[u8],
    payload: &Payload,
    password: &str,
    options: &EncodeOptions<'_>,
) -> Result<StegoOutput, StegoError> {
    check_password(password)?;
    report(&options.progress, STAGE_START);

    let key = derive_direct_key(password)?;
    let blob = encrypt_cbc(&key, &payload.to_frame()?);
    report(&options.progress, STAGE_ENCRYPT);

    let carrier = TextCarrier::from_bytes(carrier)?;
    let watermarked = text::embed(&carrier, &blob);
    report(&options.progress, STAGE_DONE);

    Ok(StegoOutput {
        bytes: watermarked.into_bytes(),
        extension: "txt".to_string(),
    })
}

fn decode_text(
    stego: &[u8],
    password: &str,
    options: &DecodeOptions<'_>,
) -> Result<Payload, StegoError> {
    check_password(password)?;
    report(&options.progress, STAGE_START);

    let carrier = TextCarrier::from_bytes(stego)?;
    let blob = text::extract(&carrier)?;
    report(&options.progress, STAGE_EMBED);

    let key = derive_direct_key(password)?;
    let plain = decrypt_cbc(&key, &blob)?;
    report(&options.progress, STAGE_DONE);

    finish_decode(plain, options)
}

// ---- shared tail ----

/// Validates the decrypted payload frame, honoring permissive mode.
fn finish_decode(plain: Vec<u8>, options: &DecodeOptions<'_>) -> Result<Payload, StegoError> {
    match Payload::from_frame(&plain) {
        Ok(payload) => Ok(payload),
        Err(StegoError::CorruptPayload) if options.permissive => Ok(Payload::Message(
            String::from_utf8_lossy(&plain).into_owned(),
        )),
        Err(e) => Err(e),
    }
}
