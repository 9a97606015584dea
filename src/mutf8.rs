//! Java's "Modified UTF-8", the string encoding of NBT.
//!
//! This differs from UTF-8 in two ways:
//!
//! * U+0000 is written as the two bytes `C0 80`, so encoded strings never
//!   contain a zero byte.
//! * Text is encoded one UTF-16 code unit at a time. Characters outside the
//!   Basic Multilingual Plane become a surrogate pair and each half is written
//!   as its own three byte sequence, rather than one four byte sequence.
//!
//! A code unit therefore takes at most three bytes.
//!
//! ```
//! use nbtree::mutf8;
//!
//! assert_eq!(mutf8::encode("a\0"), vec![b'a', 0xC0, 0x80]);
//! assert_eq!(mutf8::encode("😀").len(), 6);
//! assert_eq!(mutf8::decode(&[0xC0, 0x80]).unwrap(), "\0");
//! ```

use std::borrow::Cow;

use crate::error::{Error, Result};

/// Strategy used to turn strings into bytes and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// Java's Modified UTF-8, used by all Java edition data.
    #[default]
    ModifiedUtf8,
    /// Standard UTF-8.
    Utf8,
}

impl TextEncoding {
    pub fn encode<'a>(&self, s: &'a str) -> Cow<'a, [u8]> {
        match self {
            TextEncoding::ModifiedUtf8 => Cow::Owned(encode(s)),
            TextEncoding::Utf8 => Cow::Borrowed(s.as_bytes()),
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            TextEncoding::ModifiedUtf8 => decode(bytes),
            TextEncoding::Utf8 => std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|_| nonunicode(bytes)),
        }
    }

    /// Number of bytes `s` encodes to.
    pub fn byte_count(&self, s: &str) -> usize {
        match self {
            TextEncoding::ModifiedUtf8 => byte_count(s),
            TextEncoding::Utf8 => s.len(),
        }
    }
}

fn unit_len(unit: u16) -> usize {
    match unit {
        0x0001..=0x007F => 1,
        0x0000 | 0x0080..=0x07FF => 2,
        _ => 3,
    }
}

/// Number of bytes [`encode`] produces for `s`.
pub fn byte_count(s: &str) -> usize {
    s.encode_utf16().map(unit_len).sum()
}

/// Upper bound of the encoded size of `units` UTF-16 code units.
pub fn max_byte_count(units: usize) -> usize {
    units * 3
}

/// Upper bound of the UTF-16 code units decoded from `bytes` bytes.
pub fn max_char_count(bytes: usize) -> usize {
    bytes
}

pub fn encode(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(byte_count(s));
    for unit in s.encode_utf16() {
        match unit_len(unit) {
            1 => out.push(unit as u8),
            2 => {
                out.push(0xC0 | (unit >> 6) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | (unit >> 12) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    out
}

/// Length of the sequence started by `lead`, if it can start one.
fn sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC0..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        _ => None,
    }
}

/// Number of UTF-16 code units [`decode_units`] produces for `bytes`.
pub fn char_count(bytes: &[u8]) -> Result<usize> {
    let mut count = 0;
    let mut i = 0;
    while i < bytes.len() {
        let len = sequence_len(bytes[i]).ok_or_else(|| nonunicode(bytes))?;
        if i + len > bytes.len() {
            return Err(nonunicode(bytes));
        }
        i += len;
        count += 1;
    }
    Ok(count)
}

/// Decode to UTF-16 code units. Surrogate halves are rebuilt independently
/// and are not checked to pair up.
pub fn decode_units(bytes: &[u8]) -> Result<Vec<u16>> {
    let mut units = Vec::with_capacity(char_count(bytes)?);
    let mut i = 0;

    let cont = |b: u8| {
        if b & 0xC0 == 0x80 {
            Ok((b & 0x3F) as u16)
        } else {
            Err(nonunicode(bytes))
        }
    };

    while i < bytes.len() {
        let b = bytes[i];
        // char_count has already checked every sequence is complete.
        let len = sequence_len(b).ok_or_else(|| nonunicode(bytes))?;
        let unit = match len {
            1 => b as u16,
            2 => ((b & 0x1F) as u16) << 6 | cont(bytes[i + 1])?,
            _ => ((b & 0x0F) as u16) << 12 | cont(bytes[i + 1])? << 6 | cont(bytes[i + 2])?,
        };
        i += len;
        units.push(unit);
    }

    Ok(units)
}

/// Decode a string. Fails if the bytes are not Modified UTF-8, or if they
/// hold a surrogate half without its partner, which Rust strings cannot
/// represent.
pub fn decode(bytes: &[u8]) -> Result<String> {
    let units = decode_units(bytes)?;
    String::from_utf16(&units).map_err(|_| nonunicode(bytes))
}

fn nonunicode(data: &[u8]) -> Error {
    Error::malformed(format!(
        "invalid nbt string: nonunicode: {}",
        String::from_utf8_lossy(data)
    ))
}
