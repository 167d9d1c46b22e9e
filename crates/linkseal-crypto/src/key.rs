//! The 128-bit secret key and its URL-fragment string form.

use rand::{RngCore, rngs::OsRng};
use zeroize::Zeroize;

use crate::{encoding, errors::CryptoError};

/// Size of a secret key in bytes (128 bits).
pub const KEY_SIZE: usize = 16;

/// Length of the exported key string (unpadded base64url of 16 bytes).
pub const KEY_STRING_LEN: usize = 22;

/// Probe the OS secure random source.
///
/// Call once before offering encryption at all: if entropy is unavailable
/// the whole encrypting surface must be disabled, not retried per attempt.
///
/// # Errors
///
/// - `CryptoError::Unavailable` if the OS CSPRNG fails.
pub fn ensure_available() -> Result<(), CryptoError> {
    let mut probe = [0u8; 1];
    OsRng.try_fill_bytes(&mut probe).map_err(|_| CryptoError::Unavailable)
}

/// A 128-bit symmetric key.
///
/// Lives only in process memory or inside a URL fragment. Never serialized
/// into a request body or header, never logged (the `Debug` impl is
/// redacted), and zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey([u8; KEY_SIZE]);

impl SecretKey {
    /// Generate a fresh key from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// - `CryptoError::Unavailable` if the OS CSPRNG fails.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut bytes = [0u8; KEY_SIZE];
        OsRng.try_fill_bytes(&mut bytes).map_err(|_| CryptoError::Unavailable)?;
        Ok(Self(bytes))
    }

    /// Construct from raw bytes.
    ///
    /// Exposed for tests and for callers that already hold key material;
    /// normal flows use [`SecretKey::generate`].
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Import a key from its string form.
    ///
    /// Accepts the canonical unpadded base64url form; trailing `=` padding
    /// is tolerated.
    ///
    /// # Errors
    ///
    /// - `CryptoError::InvalidKey` if the string does not decode or the
    ///   decoded length is not exactly 16 bytes.
    pub fn import(key_str: &str) -> Result<Self, CryptoError> {
        let mut decoded = encoding::decode(key_str).ok_or(CryptoError::InvalidKey)?;
        let result = <[u8; KEY_SIZE]>::try_from(decoded.as_slice())
            .map(Self)
            .map_err(|_| CryptoError::InvalidKey);
        decoded.zeroize();
        result
    }

    /// Export as a 22-character unpadded base64url string.
    pub fn export(&self) -> String {
        let exported = encoding::encode(&self.0);
        debug_assert_eq!(exported.len(), KEY_STRING_LEN);
        exported
    }

    /// Raw key bytes, for the sealing layer.
    pub(crate) fn bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_key_exports_22_chars() {
        let key = SecretKey::generate().unwrap();
        let exported = key.export();

        assert_eq!(exported.len(), KEY_STRING_LEN);
        assert!(!exported.contains('='));
        assert!(!exported.contains('+'));
        assert!(!exported.contains('/'));
    }

    #[test]
    fn export_import_roundtrip() {
        let key = SecretKey::generate().unwrap();
        let imported = SecretKey::import(&key.export()).unwrap();

        assert_eq!(imported, key);
    }

    #[test]
    fn import_accepts_padded_form() {
        let key = SecretKey::from_bytes([0x42; KEY_SIZE]);
        let padded = format!("{}==", key.export());

        assert_eq!(SecretKey::import(&padded).unwrap(), key);
    }

    #[test]
    fn import_rejects_wrong_length() {
        // 8 bytes and 32 bytes both decode fine but are not keys
        let short = encoding::encode(&[0u8; 8]);
        let long = encoding::encode(&[0u8; 32]);

        assert_eq!(SecretKey::import(&short), Err(CryptoError::InvalidKey));
        assert_eq!(SecretKey::import(&long), Err(CryptoError::InvalidKey));
    }

    #[test]
    fn import_rejects_garbage() {
        assert_eq!(SecretKey::import("not base64!!"), Err(CryptoError::InvalidKey));
        assert_eq!(SecretKey::import(""), Err(CryptoError::InvalidKey));
    }

    #[test]
    fn two_generated_keys_differ() {
        let a = SecretKey::generate().unwrap();
        let b = SecretKey::generate().unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn debug_is_redacted() {
        let key = SecretKey::from_bytes([0xAB; KEY_SIZE]);
        let rendered = format!("{key:?}");

        assert_eq!(rendered, "SecretKey(..)");
        assert!(!rendered.contains("171"));
    }

    #[test]
    fn availability_probe_succeeds() {
        ensure_available().unwrap();
    }
}
