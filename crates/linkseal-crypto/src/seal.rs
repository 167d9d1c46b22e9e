//! Sealing and opening of transport blobs with AES-128-GCM.
//!
//! A transport blob is `base64url(IV || ciphertext || tag)`, unpadded. The
//! IV is drawn fresh from the OS CSPRNG inside [`seal`] on every call; no
//! public API accepts an IV, so reuse under one key cannot be expressed.

use aes_gcm::{
    Aes128Gcm, Key, Nonce,
    aead::{Aead, KeyInit},
};
use rand::{RngCore, rngs::OsRng};

use crate::{encoding, errors::CryptoError, key::SecretKey};

/// Size of the GCM initialization vector (96 bits).
pub const IV_SIZE: usize = 12;

/// Size of the GCM authentication tag (128 bits).
pub const TAG_SIZE: usize = 16;

/// Seal a plaintext into a transport blob.
///
/// Output is `base64url(IV || ciphertext || tag)` with a fresh random IV.
/// No associated data is authenticated.
///
/// # Errors
///
/// - `CryptoError::Unavailable` if the OS CSPRNG fails while drawing the IV.
pub fn seal(plaintext: &[u8], key: &SecretKey) -> Result<String, CryptoError> {
    let mut iv = [0u8; IV_SIZE];
    OsRng.try_fill_bytes(&mut iv).map_err(|_| CryptoError::Unavailable)?;

    let cipher = Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(key.bytes()));
    let Ok(ciphertext) = cipher.encrypt(Nonce::from_slice(&iv), plaintext) else {
        unreachable!("AES-GCM encryption cannot fail with valid inputs");
    };

    let mut blob = Vec::with_capacity(IV_SIZE + ciphertext.len());
    blob.extend_from_slice(&iv);
    blob.extend_from_slice(&ciphertext);

    Ok(encoding::encode(&blob))
}

/// Open a transport blob, returning the plaintext.
///
/// # Errors
///
/// - `CryptoError::MalformedBlob` if the string is not base64url or decodes
///   to fewer than IV + tag bytes
/// - `CryptoError::AuthenticationFailed` on tag mismatch — a wrong key and
///   tampered ciphertext are deliberately indistinguishable
pub fn open(blob: &str, key: &SecretKey) -> Result<Vec<u8>, CryptoError> {
    let bytes = encoding::decode(blob).ok_or(CryptoError::MalformedBlob)?;
    if bytes.len() < IV_SIZE + TAG_SIZE {
        return Err(CryptoError::MalformedBlob);
    }
    let (iv, ciphertext) = bytes.split_at(IV_SIZE);

    let cipher = Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(key.bytes()));
    cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailed)
}
