//! Text carrier normalization.
//!
//! A text carrier is just the host string as an ordered sequence of
//! Unicode code points. Watermark code points are appended after the
//! visible text, never interleaved into it, so the only validation needed
//! is UTF-8 encodability.

use crate::error::StegoError;

/// A normalized UTF-8 text carrier.
pub struct TextCarrier {
    text: String,
}

impl TextCarrier {
    /// Validates input bytes as UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StegoError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| StegoError::UnsupportedFormat("text carrier is not valid UTF-8".into()))?
            .to_string();
        Ok(Self { text })
    }

    /// Wraps a host string directly.
    pub fn from_str(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    /// The host text.
    pub fn text(&self) -> &str {
        &self.text
    }
}
