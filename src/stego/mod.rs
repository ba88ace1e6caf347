//! Embedding and extraction strategies, one per carrier family.
//!
//! - [`audio`]: LSB embedding over PCM samples, optional Hamming(7,4)
//! - [`image`]: LSB embedding over pixel channels in raster order
//! - [`text`]: zero-width code point watermarking
//! - [`video`]: first-frame bridge delegating to the image strategy

pub mod audio;
pub mod image;
pub mod text;
pub mod video;

pub use video::{FfmpegFrameBridge, VideoFrameBridge};
