//! # Veilbox - hide encrypted payloads in innocuous carriers
//!
//! Veilbox embeds encrypted payloads (text messages or arbitrary files)
//! inside carrier media - WAV audio, PNG images, video frames, and plain
//! text - leaving the carrier perceptually unchanged, and recovers the
//! payload given the correct password.
//!
//! ## Overview
//!
//! Four independent embedding strategies share one payload pipeline:
//!
//! - **Audio**: payload encrypted with AES-256-CTR under a scrypt-derived
//!   key, bits written to sample LSBs, optional Hamming(7,4) error
//!   correction.
//! - **Image**: payload encrypted with AES-256-CBC under a SHA-256
//!   normalized key, bits written to pixel channel LSBs, output always
//!   PNG.
//! - **Video**: the first frame is extracted, treated as an image
//!   carrier, and remuxed back with the original audio track (ffmpeg
//!   behind a trait).
//! - **Text**: the encrypted payload is appended as a run of zero-width
//!   code points that render as nothing.
//!
//! Every encode/decode call is a self-contained synchronous computation:
//! no shared state, nothing persisted, safe to run concurrently.
//!
//! ## Example
//!
//! ```rust
//! use veilbox::{decode, encode, CarrierKind, DecodeOptions, EncodeOptions, Payload};
//!
//! let carrier = b"an unremarkable sentence";
//! let payload = Payload::Message("meet at dawn".to_string());
//!
//! let stego = encode(
//!     carrier,
//!     CarrierKind::Text,
//!     &payload,
//!     "password",
//!     &EncodeOptions::default(),
//! )
//! .unwrap();
//!
//! let recovered = decode(
//!     &stego.bytes,
//!     CarrierKind::Text,
//!     "password",
//!     &DecodeOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(recovered, payload);
//! ```
//!
//! ## Modules
//!
//! - [`crypto`]: key derivation and the two payload ciphers
//! - [`ecc`]: Hamming(7,4) forward error correction and bit packing
//! - [`carrier`]: per-media carrier normalization
//! - [`stego`]: the embedding/extraction strategies
//! - [`engine`]: the per-media-type pipelines

pub mod carrier;
pub mod crypto;
pub mod ecc;
pub mod engine;
pub mod error;
pub mod payload;
pub mod stego;

pub use engine::{
    capacity_bytes, decode, decode_video_with_bridge, encode, encode_video_with_bridge,
    CarrierKind, DecodeOptions, EncodeOptions, StegoOutput,
};
pub use error::StegoError;
pub use payload::Payload;
pub use stego::{FfmpegFrameBridge, VideoFrameBridge};
