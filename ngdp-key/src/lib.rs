//! # ngdp-key
//!
//! The 16-byte content key that addresses an immutable blob in a
//! content-distribution protocol: hex decoding and URL-fragment emission.

pub mod error;

pub use error::{Error, Result};

use ngdp_buffer::StringBuilder;

/// A 16-byte identifier derived from content, addressing an immutable blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentKey([u8; 16]);

impl ContentKey {
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Decode a 32-character hex string, case-insensitively.
    ///
    /// Preserves a source quirk: a non-hex nibble decodes as `0` rather
    /// than failing the whole key, so a malformed key parses silently as
    /// partially zeroed. The only fatal condition is the wrong length.
    pub fn from_hex(hex: &str) -> Result<Self> {
        if hex.len() != 32 {
            return Err(Error::InvalidLength { len: hex.len() });
        }

        let bytes = hex.as_bytes();
        let mut key = [0u8; 16];
        for (i, byte) in key.iter_mut().enumerate() {
            let hi = decode_nibble(bytes[i * 2]);
            let lo = decode_nibble(bytes[i * 2 + 1]);
            *byte = (hi << 4) | lo;
        }
        Ok(Self(key))
    }

    /// Emit the 37-character `hh/hh/<32 hex>` URL fragment.
    pub fn write_url_fragment(&self, builder: &mut StringBuilder<'_>) {
        builder.append_hex_byte(self.0[0]);
        builder.append_char('/');
        builder.append_hex_byte(self.0[1]);
        builder.append_char('/');
        for byte in &self.0 {
            builder.append_hex_byte(*byte);
        }
    }

    /// Convenience wrapper around [`Self::write_url_fragment`] returning an
    /// owned `String`.
    pub fn url_fragment(&self) -> String {
        let mut builder = StringBuilder::new();
        self.write_url_fragment(&mut builder);
        builder.as_str().to_string()
    }
}

fn decode_nibble(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}
