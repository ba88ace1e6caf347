//! Stream-cipher payload encryption for the audio path.
//!
//! AES-256 in counter mode: a keyed keystream indexed by position is XORed
//! with the plaintext, so ciphertext length equals plaintext length and no
//! padding is involved. The counter runs big-endian over the full 128-bit
//! block, seeded from a random 16-byte IV.
//!
//! Output format: `iv (16 bytes) || ciphertext`.

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::crypto::keys::KeyMaterial;
use crate::error::StegoError;

/// IV length for the counter mode cipher.
pub const IV_LEN: usize = 16;

type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Encrypts plaintext with AES-256-CTR under a fresh random IV.
///
/// Returns `iv || ciphertext`; the ciphertext is exactly as long as the
/// plaintext.
pub fn encrypt_ctr(key: &KeyMaterial, plaintext: &[u8]) -> Vec<u8> {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let mut buffer = plaintext.to_vec();
    let mut cipher = Aes256Ctr::new(key.into(), &iv.into());
    cipher.apply_keystream(&mut buffer);

    let mut out = Vec::with_capacity(IV_LEN + buffer.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&buffer);
    out
}

/// Decrypts `iv || ciphertext` produced by [`encrypt_ctr`].
///
/// CTR decryption cannot fail cryptographically - a wrong key simply
/// produces different bytes - so the caller must validate the payload
/// frame afterwards. Only a structurally short input errors here.
pub fn decrypt_ctr(key: &KeyMaterial, data: &[u8]) -> Result<Vec<u8>, StegoError> {
    if data.len() < IV_LEN {
        return Err(StegoError::CorruptPayload);
    }
    let iv: [u8; IV_LEN] = data[..IV_LEN].try_into().expect("slice length checked");
    let mut buffer = data[IV_LEN..].to_vec();
    let mut cipher = Aes256Ctr::new(key.into(), &iv.into());
    cipher.apply_keystream(&mut buffer);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::derive_audio_key;

    fn test_key() -> KeyMaterial {
        derive_audio_key("stream test", &[3u8; 16]).unwrap()
    }

    #[test]
    fn test_roundtrip() {
        let key = test_key();
        let plaintext = b"counter mode keeps length";
        let blob = encrypt_ctr(&key, plaintext);
        let decrypted = decrypt_ctr(&key, &blob).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_ciphertext_length_equals_plaintext() {
        let key = test_key();
        for len in [0usize, 1, 15, 16, 17, 1000] {
            let plaintext = vec![0xA5u8; len];
            let blob = encrypt_ctr(&key, &plaintext);
            assert_eq!(blob.len(), IV_LEN + len);
        }
    }

    #[test]
    fn test_wrong_key_gives_different_bytes() {
        let key = test_key();
        let other = derive_audio_key("different", &[3u8; 16]).unwrap();
        let plaintext = b"sensitive bytes, long enough to not collide";
        let blob = encrypt_ctr(&key, plaintext);
        let garbage = decrypt_ctr(&other, &blob).unwrap();
        assert_ne!(garbage, plaintext);
    }

    #[test]
    fn test_short_input_rejected() {
        let key = test_key();
        assert!(matches!(
            decrypt_ctr(&key, &[0u8; 15]),
            Err(StegoError::CorruptPayload)
        ));
    }

    #[test]
    fn test_fresh_iv_per_call() {
        let key = test_key();
        let a = encrypt_ctr(&key, b"same input");
        let b = encrypt_ctr(&key, b"same input");
        assert_ne!(a[..IV_LEN], b[..IV_LEN]);
    }
}
