//! Fuzz target for transport blob opening
//!
//! This fuzzer tests the full receive path on arbitrary blob strings:
//! - Non-base64url input
//! - Blobs shorter than IV + tag
//! - Random IV/ciphertext/tag combinations
//!
//! The fuzzer should NEVER panic, and (with overwhelming probability)
//! never authenticate random input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use linkseal_crypto::{SecretKey, open};

fuzz_target!(|data: &[u8]| {
    let key = SecretKey::from_bytes([0x5A; 16]);

    // Raw bytes interpreted as the transport string.
    if let Ok(blob) = std::str::from_utf8(data) {
        let _ = open(blob, &key);
    }

    // Same bytes as a validly-encoded blob body: exercises the IV split and
    // AEAD open on arbitrary binary input.
    let encoded = {
        use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
        URL_SAFE_NO_PAD.encode(data)
    };
    let _ = open(&encoded, &key);
});
