//! URL-safe base64 helpers shared by key and blob encoding.
//!
//! Output is always unpadded URL-safe base64 (`-`/`_`, no `=`), safe for a
//! URL fragment. Decoding tolerates trailing padding so strings that passed
//! through a re-padding intermediary still import.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

/// Encode bytes as unpadded URL-safe base64.
pub(crate) fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded URL-safe base64, accepting trailing `=` padding.
pub(crate) fn decode(value: &str) -> Option<Vec<u8>> {
    URL_SAFE_NO_PAD.decode(value.trim_end_matches('=')).ok()
}
