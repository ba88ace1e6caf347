//! Block-cipher payload encryption for the image, video, and text paths.
//!
//! AES-256 in CBC mode with PKCS#7 padding. The IV is randomly generated
//! per call and prefixed to the ciphertext so decryption can recover it
//! positionally.
//!
//! Output format: `iv (16 bytes) || ciphertext (multiple of 16 bytes)`.
//!
//! CBC padding gives a first line of defense against wrong passwords: a
//! bad key fails the unpad check with probability about 255/256. The
//! payload frame's magic check behind it catches the remainder.

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::crypto::keys::KeyMaterial;
use crate::error::StegoError;

/// IV length for CBC mode (one AES block).
pub const IV_LEN: usize = 16;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Encrypts plaintext with AES-256-CBC and PKCS#7 padding under a fresh
/// random IV. Returns `iv || ciphertext`.
pub fn encrypt_cbc(key: &KeyMaterial, plaintext: &[u8]) -> Vec<u8> {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let ciphertext =
        Aes256CbcEnc::new(key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut out = Vec::with_capacity(IV_LEN + ciphertext.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&ciphertext);
    out
}

/// Decrypts `iv || ciphertext` produced by [`encrypt_cbc`].
///
/// Fails with `Decrypt` when the input is too short, not block-aligned,
/// or the PKCS#7 padding does not verify (typically a wrong password).
pub fn decrypt_cbc(key: &KeyMaterial, data: &[u8]) -> Result<Vec<u8>, StegoError> {
    if data.len() < IV_LEN + BLOCK_LEN || (data.len() - IV_LEN) % BLOCK_LEN != 0 {
        return Err(StegoError::Decrypt);
    }
    let iv: [u8; IV_LEN] = data[..IV_LEN].try_into().expect("slice length checked");
    Aes256CbcDec::new(key.into(), &iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(&data[IV_LEN..])
        .map_err(|_| StegoError::Decrypt)
}
