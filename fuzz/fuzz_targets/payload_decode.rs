//! Fuzz target for Payload::decode
//!
//! This fuzzer tests payload deserialization with:
//! - Truncated buffers (mid-discriminator, mid-length-prefix, mid-string)
//! - Length prefixes claiming more bytes than remain
//! - Invalid UTF-8 in text content and file metadata
//! - Unknown discriminator bytes
//!
//! The fuzzer should NEVER panic. All invalid inputs must return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use linkseal_proto::Payload;

fuzz_target!(|data: &[u8]| {
    // Decoding must fail cleanly or produce a payload that re-encodes.
    if let Ok(payload) = Payload::decode(data) {
        let bytes = payload.to_bytes().expect("decoded payloads re-encode");
        let again = Payload::decode(&bytes).expect("re-encoded payloads decode");
        assert_eq!(again, payload);
    }
});
