//! Linkseal Payload Format
//!
//! Bit-exact binary format for the plaintext that gets sealed into a
//! transport blob. The first byte discriminates the content kind, the rest
//! is kind-specific:
//!
//! ```text
//! text: [0x00] [utf8 bytes .................................]
//! file: [0x01] [len:u16 BE] [filename] [len:u16 BE] [content type] [data]
//! ```
//!
//! Both sides of the protocol must agree on this layout byte for byte: the
//! sender encodes before sealing, the receiver decodes after opening.
//! Encoding and decoding are pure (no I/O, no crypto) so they can be tested
//! and fuzzed in isolation.
//!
//! # Invariants
//!
//! - The discriminator byte is `0x00` (text) or `0x01` (file); any other
//!   value is invalid.
//! - A declared metadata length never exceeds the remaining buffer.
//! - Round-trip encoding must produce identical values.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod errors;
mod payload;

pub use errors::PayloadError;
pub use payload::{Payload, TYPE_FILE, TYPE_TEXT};
