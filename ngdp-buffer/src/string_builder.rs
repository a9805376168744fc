//! String builder over a [`Buffer`]

use crate::buffer::Buffer;

/// Incrementally builds a byte string in a [`Buffer`].
///
/// `as_cstr` ensures a trailing zero byte exists without counting it as
/// part of the logical string, for transient interop with C-string
/// consumers; the byte at `len()` is not part of the logical string.
pub struct StringBuilder<'a> {
    buffer: Buffer<'a>,
}

impl<'a> StringBuilder<'a> {
    pub fn new() -> Self {
        Self {
            buffer: Buffer::empty(),
        }
    }

    pub fn with_inline_storage(storage: &'a mut [u8]) -> Self {
        Self {
            buffer: Buffer::with_inline_storage(storage),
        }
    }

    pub fn append_char(&mut self, c: char) {
        let mut encoded = [0u8; 4];
        self.buffer.append(c.encode_utf8(&mut encoded).as_bytes());
    }

    pub fn append_str(&mut self, s: &str) {
        self.buffer.append(s.as_bytes());
    }

    /// Append a byte as two lowercase hex digits.
    pub fn append_hex_byte(&mut self, byte: u8) {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        self.buffer
            .append(&[HEX[(byte >> 4) as usize], HEX[(byte & 0x0f) as usize]]);
    }

    /// Append a base-10 rendering of `value`.
    pub fn append_integer(&mut self, value: i64) {
        self.append_str(&value.to_string());
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(self.buffer.as_slice()).unwrap_or_default()
    }

    /// Ensure a terminating zero byte exists at `len()` without
    /// incrementing `len()`, then return the string plus that terminator.
    pub fn as_cstr(&mut self) -> &[u8] {
        let len = self.buffer.len();
        self.buffer.write_trailing(&[0]);
        self.buffer.raw_bytes(len + 1)
    }
}

impl<'a> Default for StringBuilder<'a> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_char_string_hex_and_integer() {
        let mut builder = StringBuilder::new();
        builder.append_str("key=");
        builder.append_hex_byte(0xAB);
        builder.append_char('!');
        builder.append_integer(-42);
        assert_eq!(builder.as_str(), "key=ab!-42");
    }

    #[test]
    fn hex_byte_is_always_two_lowercase_digits() {
        let mut builder = StringBuilder::new();
        builder.append_hex_byte(0x0f);
        assert_eq!(builder.as_str(), "0f");
    }

    #[test]
    fn as_cstr_terminates_without_growing_logical_length() {
        let mut builder = StringBuilder::new();
        builder.append_str("abc");
        let with_nul = builder.as_cstr();
        assert_eq!(with_nul, b"abc\0");
        assert_eq!(builder.len(), 3);
    }
}
