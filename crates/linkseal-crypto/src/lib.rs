//! Linkseal Cryptographic Core
//!
//! Sealing and opening of secret payloads with AES-128-GCM, plus the
//! 128-bit key type whose string form rides in a URL fragment. The server
//! only ever stores the sealed blob; the key never appears in a request.
//!
//! ```text
//! SecretKey (16 random bytes, base64url string in the link fragment)
//!        │
//!        ▼
//! AES-128-GCM seal, fresh random 12-byte IV per call
//!        │
//!        ▼
//! base64url( IV || ciphertext || tag )  →  stored by the server
//! ```
//!
//! # Security
//!
//! Zero knowledge:
//! - The key is generated client-side and travels only in the URL fragment
//! - Key bytes are zeroized on drop and never logged
//!
//! Authenticity:
//! - AES-128-GCM provides tamper-proof encryption
//! - A failed authentication tag rejects the blob with a single error that
//!   covers both "wrong key" and "tampered data"; callers cannot tell the
//!   two apart, so decryption cannot be used as an oracle
//!
//! IV uniqueness:
//! - Every seal draws a fresh 12-byte IV from the OS CSPRNG inside the call;
//!   there is no API that accepts a caller-supplied or counter-derived IV

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod encoding;
mod errors;
mod key;
mod seal;

pub use errors::CryptoError;
pub use key::{KEY_SIZE, KEY_STRING_LEN, SecretKey, ensure_available};
pub use seal::{IV_SIZE, TAG_SIZE, open, seal};
