//! Password-to-key derivation.
//!
//! Two derivation purposes exist, one per cipher family:
//!
//! - **Audio purpose**: memory-hard scrypt with a per-call random salt.
//!   The salt rides inside the embedded blob so the extractor can rerun
//!   the same derivation.
//! - **Direct purpose** (image, video frame, text): SHA-256 of the
//!   password. Block ciphers need a fixed-length key; a single hash is
//!   the documented normalization step.
//!
//! Derivation never fails for a non-empty password. Empty passwords are
//! rejected with `InvalidKey` before any carrier byte is touched.

use scrypt::Params;
use sha2::{Digest, Sha256};

use crate::error::StegoError;

/// Salt length for the scrypt derivation, in bytes.
pub const SALT_LEN: usize = 16;

/// scrypt cost parameter (log2 N = 14, i.e. N = 16384).
const SCRYPT_LOG_N: u8 = 14;
/// scrypt block size parameter.
const SCRYPT_R: u32 = 8;
/// scrypt parallelization parameter.
const SCRYPT_P: u32 = 1;

/// Derived symmetric key material (AES-256 sized).
pub type KeyMaterial = [u8; 32];

/// Rejects empty passwords up front.
pub fn check_password(password: &str) -> Result<(), StegoError> {
    if password.is_empty() {
        Err(StegoError::InvalidKey)
    } else {
        Ok(())
    }
}

/// Derives a 256-bit key from a password and salt using scrypt
/// (N = 2^14, r = 8, p = 1).
pub fn derive_audio_key(password: &str, salt: &[u8; SALT_LEN]) -> Result<KeyMaterial, StegoError> {
    check_password(password)?;
    let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, 32)
        .map_err(|e| StegoError::UnsupportedFormat(format!("scrypt parameters: {e}")))?;
    let mut key = [0u8; 32];
    scrypt::scrypt(password.as_bytes(), salt, &params, &mut key)
        .map_err(|e| StegoError::UnsupportedFormat(format!("scrypt derivation: {e}")))?;
    Ok(key)
}

/// Derives a 256-bit key from a password by hashing it with SHA-256.
pub fn derive_direct_key(password: &str) -> Result<KeyMaterial, StegoError> {
    check_password(password)?;
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    Ok(hasher.finalize().into())
}
