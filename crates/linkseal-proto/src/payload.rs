//! Type-tagged payload combining a discriminator and content.
//!
//! A `Payload` is the plaintext unit the crypto layer seals: either a text
//! secret or a file with its metadata. The server never sees this structure,
//! only the sealed blob around it.

use bytes::BufMut;

use crate::errors::PayloadError;

/// Discriminator byte for text payloads.
pub const TYPE_TEXT: u8 = 0x00;

/// Discriminator byte for file payloads.
pub const TYPE_FILE: u8 = 0x01;

/// Maximum byte length of a length-prefixed metadata string.
const METADATA_MAX: usize = u16::MAX as usize;

/// Plaintext content of a secret, before sealing / after opening.
///
/// # Invariants
///
/// - Serialization Consistency: encoding a `Payload` and decoding the result
///   MUST produce an equivalent value. Verified by round-trip tests.
///
/// - Exact Framing: `decode` consumes the whole buffer. File data is simply
///   "everything after the metadata", so there is no trailing slack to
///   smuggle bytes in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A text secret.
    Text {
        /// The secret text.
        content: String,
    },

    /// A file secret with the metadata needed to reconstruct a download.
    File {
        /// Original filename.
        filename: String,
        /// MIME content type.
        content_type: String,
        /// Raw file bytes.
        data: Vec<u8>,
    },
}

impl Payload {
    /// Create a text payload.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text { content: content.into() }
    }

    /// Create a file payload.
    pub fn file(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self::File {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Number of content bytes this payload carries (excluding framing).
    ///
    /// For text this is the UTF-8 length, for files the raw data length.
    /// This is the quantity size limits are applied to.
    pub fn content_len(&self) -> usize {
        match self {
            Self::Text { content } => content.len(),
            Self::File { data, .. } => data.len(),
        }
    }

    /// Encode into the wire format, appending to `dst`.
    ///
    /// # Errors
    ///
    /// - `PayloadError::MetadataTooLong` if filename or content type exceeds
    ///   65535 UTF-8 bytes (the 2-byte length prefix cannot express more).
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<(), PayloadError> {
        match self {
            Self::Text { content } => {
                dst.put_u8(TYPE_TEXT);
                dst.put_slice(content.as_bytes());
            },
            Self::File { filename, content_type, data } => {
                dst.put_u8(TYPE_FILE);
                put_prefixed(dst, "filename", filename)?;
                put_prefixed(dst, "content type", content_type)?;
                dst.put_slice(data);
            },
        }
        Ok(())
    }

    /// Encode into a fresh buffer.
    ///
    /// # Errors
    ///
    /// Same as [`Payload::encode`].
    pub fn to_bytes(&self) -> Result<Vec<u8>, PayloadError> {
        let mut buf = Vec::with_capacity(1 + self.content_len() + 4);
        self.encode(&mut buf)?;
        Ok(buf)
    }

    /// Decode from the wire format.
    ///
    /// # Errors
    ///
    /// - `PayloadError::Truncated` if the buffer is empty or a declared
    ///   length exceeds the remaining bytes
    /// - `PayloadError::UnknownType` for a discriminator other than
    ///   `0x00`/`0x01`
    /// - `PayloadError::InvalidUtf8` if text or metadata is not UTF-8
    pub fn decode(buf: &[u8]) -> Result<Self, PayloadError> {
        let (&discriminator, rest) = buf
            .split_first()
            .ok_or(PayloadError::Truncated { needed: 1, remaining: 0 })?;

        match discriminator {
            TYPE_TEXT => {
                let content = utf8("text content", rest)?;
                Ok(Self::Text { content })
            },
            TYPE_FILE => {
                let (filename, rest) = take_prefixed("filename", rest)?;
                let (content_type, rest) = take_prefixed("content type", rest)?;
                Ok(Self::File { filename, content_type, data: rest.to_vec() })
            },
            found => Err(PayloadError::UnknownType { found }),
        }
    }
}

/// Write a 2-byte big-endian length followed by the string's UTF-8 bytes.
fn put_prefixed(
    dst: &mut impl BufMut,
    field: &'static str,
    value: &str,
) -> Result<(), PayloadError> {
    let len = value.len();
    if len > METADATA_MAX {
        return Err(PayloadError::MetadataTooLong { field, len, max: METADATA_MAX });
    }
    dst.put_u16(len as u16);
    dst.put_slice(value.as_bytes());
    Ok(())
}

/// Read a 2-byte big-endian length-prefixed UTF-8 string, returning it and
/// the remaining buffer.
fn take_prefixed<'a>(
    field: &'static str,
    buf: &'a [u8],
) -> Result<(String, &'a [u8]), PayloadError> {
    let (prefix, rest) = buf
        .split_first_chunk::<2>()
        .ok_or(PayloadError::Truncated { needed: 2, remaining: buf.len() })?;
    let len = u16::from_be_bytes(*prefix) as usize;

    if len > rest.len() {
        return Err(PayloadError::Truncated { needed: len, remaining: rest.len() });
    }
    let (value, rest) = rest.split_at(len);
    Ok((utf8(field, value)?, rest))
}

/// Decode UTF-8 bytes into an owned string.
fn utf8(field: &'static str, bytes: &[u8]) -> Result<String, PayloadError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| PayloadError::InvalidUtf8 { field })
}
