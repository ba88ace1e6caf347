//! Cryptographic primitives for payload encryption.
//!
//! This module provides:
//! - Key derivation from passwords (scrypt for the audio path, SHA-256
//!   normalization for the block-cipher paths)
//! - AES-256-CTR stream encryption (audio)
//! - AES-256-CBC encryption with PKCS#7 padding (image, video, text)

pub mod block;
pub mod keys;
pub mod stream;

pub use block::{decrypt_cbc, encrypt_cbc};
pub use keys::{check_password, derive_audio_key, derive_direct_key, KeyMaterial, SALT_LEN};
pub use stream::{decrypt_ctr, encrypt_ctr};
