//! Textual bit strings.
//!
//! Codes and the encoded stream are kept as ASCII `'0'`/`'1'` text. That is
//! also the byte form the default cipher layout encrypts, so the encoded
//! stream, the report excerpt and the decrypted plaintext are all the same
//! bytes.

use crate::error::BitIoError;
use std::fmt;
use std::str::FromStr;

/// A sequence of bits stored as `'0'`/`'1'` characters.
///
/// # Invariants
/// - every byte of the inner string is `b'0'` or `b'1'`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitString(String);

impl BitString {
    pub fn new() -> Self {
        Self(String::new())
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self(String::with_capacity(bits))
    }

    /// Validate raw bytes as a bit string.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitChar` naming the first offending byte.
    pub fn from_ascii(bytes: &[u8]) -> Result<Self, BitIoError> {
        if let Some(position) = bytes.iter().position(|b| !matches!(b, b'0' | b'1')) {
            return Err(BitIoError::InvalidBitChar {
                position,
                found: bytes[position],
            });
        }
        let text: String = bytes.iter().map(|&b| b as char).collect();
        Ok(Self(text))
    }

    pub fn push(&mut self, bit: bool) {
        self.0.push(if bit { '1' } else { '0' });
    }

    pub fn extend_from(&mut self, other: &BitString) {
        self.0.push_str(&other.0);
    }

    pub fn pop(&mut self) -> Option<bool> {
        self.0.pop().map(|c| c == '1')
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.bytes().map(|b| b == b'1')
    }

    pub fn starts_with(&self, prefix: &BitString) -> bool {
        self.0.starts_with(prefix.as_str())
    }

    /// The first `max_bits` bits, with `...` appended when truncated.
    pub fn excerpt(&self, max_bits: usize) -> String {
        if self.0.len() > max_bits {
            format!("{}...", &self.0[..max_bits])
        } else {
            self.0.clone()
        }
    }
}

impl FromStr for BitString {
    type Err = BitIoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_ascii(s.as_bytes())
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bits = BitString::new();
        for bit in iter {
            bits.push(bit);
        }
        bits
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
