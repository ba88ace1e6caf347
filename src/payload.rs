//! Payload framing - the plaintext wire format shared by every carrier path.
//!
//! A payload is either a text message or a file (name + content type +
//! bytes). Both variants serialize to one tagged frame that is encrypted
//! as-is, so the extraction side can validate a magic and explicit lengths
//! after decryption instead of trusting whatever bytes came back:
//!
//! ```text
//! [4 bytes] magic "VBP1"
//! [1 byte ] kind: 0 = message, 1 = file
//! kind 1 only:
//!   [2 bytes] name_len      [name_len bytes]  filename (UTF-8)
//!   [2 bytes] ctype_len     [ctype_len bytes] content type (UTF-8)
//! [4 bytes] content_len     [content_len bytes] content
//! ```
//!
//! All integers are big-endian.

use crate::error::StegoError;

/// Magic prefix of a serialized payload frame.
pub const PAYLOAD_MAGIC: &[u8; 4] = b"VBP1";

const KIND_MESSAGE: u8 = 0;
const KIND_FILE: u8 = 1;

/// A payload to hide: a text message or an arbitrary file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A UTF-8 text message.
    Message(String),
    /// A file with its original name and content type.
    File {
        name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl Payload {
    /// Returns true for the `Message` variant.
    pub fn is_message(&self) -> bool {
        matches!(self, Payload::Message(_))
    }

    /// Serializes the payload into its tagged frame.
    ///
    /// Fails with `InvalidPayload` when the payload is empty or a file's
    /// name/content-type exceeds the u16 length fields.
    pub fn to_frame(&self) -> Result<Vec<u8>, StegoError> {
        match self {
            Payload::Message(text) => {
                if text.is_empty() {
                    return Err(StegoError::InvalidPayload("empty message".into()));
                }
                let content = text.as_bytes();
                let mut frame = Vec::with_capacity(9 + content.len());
                frame.extend_from_slice(PAYLOAD_MAGIC);
                frame.push(KIND_MESSAGE);
                frame.extend_from_slice(&(content.len() as u32).to_be_bytes());
                frame.extend_from_slice(content);
                Ok(frame)
            }
            Payload::File {
                name,
                content_type,
                bytes,
            } => {
                if bytes.is_empty() {
                    return Err(StegoError::InvalidPayload("empty file".into()));
                }
                if name.len() > u16::MAX as usize || content_type.len() > u16::MAX as usize {
                    return Err(StegoError::InvalidPayload(
                        "filename or content type too long".into(),
                    ));
                }
                let mut frame =
                    Vec::with_capacity(13 + name.len() + content_type.len() + bytes.len());
                frame.extend_from_slice(PAYLOAD_MAGIC);
                frame.push(KIND_FILE);
                frame.extend_from_slice(&(name.len() as u16).to_be_bytes());
                frame.extend_from_slice(name.as_bytes());
                frame.extend_from_slice(&(content_type.len() as u16).to_be_bytes());
                frame.extend_from_slice(content_type.as_bytes());
                frame.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
                frame.extend_from_slice(bytes);
                Ok(frame)
            }
        }
    }

    /// Parses a payload frame back into a payload.
    ///
    /// Any structural mismatch - bad magic, unknown kind, short buffer,
    /// length fields pointing past the end - is `CorruptPayload`. This is
    /// the check that turns a wrong-password decrypt into a clean error
    /// instead of silent garbage.
    pub fn from_frame(frame: &[u8]) -> Result<Self, StegoError> {
        let mut cursor = Cursor::new(frame);
        if cursor.take(4)? != PAYLOAD_MAGIC.as_slice() {
            return Err(StegoError::CorruptPayload);
        }
        match cursor.take_u8()? {
            KIND_MESSAGE => {
                let len = cursor.take_u32()? as usize;
                let content = cursor.take(len)?;
                let text =
                    String::from_utf8(content.to_vec()).map_err(|_| StegoError::CorruptPayload)?;
                cursor.expect_end()?;
                Ok(Payload::Message(text))
            }
            KIND_FILE => {
                let name_len = cursor.take_u16()? as usize;
                let name = String::from_utf8(cursor.take(name_len)?.to_vec())
                    .map_err(|_| StegoError::CorruptPayload)?;
                let ctype_len = cursor.take_u16()? as usize;
                let content_type = String::from_utf8(cursor.take(ctype_len)?.to_vec())
                    .map_err(|_| StegoError::CorruptPayload)?;
                let content_len = cursor.take_u32()? as usize;
                let bytes = cursor.take(content_len)?.to_vec();
                cursor.expect_end()?;
                Ok(Payload::File {
                    name,
                    content_type,
                    bytes,
                })
            }
            _ => Err(StegoError::CorruptPayload),
        }
    }
}

/// Minimal bounds-checked reader over a frame.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], StegoError> {
        let end = self.pos.checked_add(len).ok_or(StegoError::CorruptPayload)?;
        if end > self.data.len() {
            return Err(StegoError::CorruptPayload);
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn take_u8(&mut self) -> Result<u8, StegoError> {
        Ok(self.take(1)?[0])
    }

    fn take_u16(&mut self) -> Result<u16, StegoError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn take_u32(&mut self) -> Result<u32, StegoError> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn expect_end(&self) -> Result<(), StegoError> {
        if self.pos == self.data.len() {
            Ok(())
        } else {
            Err(StegoError::CorruptPayload)
        }
    }
}
