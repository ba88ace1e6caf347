//! Carrier normalization - one canonical in-memory form per media type.
//!
//! - WAV audio becomes an ordered array of 16-bit PCM samples plus the
//!   header metadata needed to rebuild the container.
//! - Images become a raw RGB pixel buffer at original resolution.
//! - Text becomes a validated UTF-8 string.
//!
//! Each normalizer exposes its embedding capacity in bits so the engine
//! can fail fast before anything is modified.

pub mod pixels;
pub mod text;
pub mod wav;

pub use pixels::PixelCarrier;
pub use text::TextCarrier;
pub use wav::PcmCarrier;
