//! Packing bit strings into bytes and back.
//!
//! [`BitWriter`] and [`BitReader`] work MSB-first: the first bit of a
//! [`BitString`] lands in the most significant bit of the first byte.
//!
//! # Padding Rules
//! - BitWriter: pads the final partial byte with zero bits
//! - BitReader: cannot tell padding from data; the caller supplies the
//!   exact bit count (the packed frame stores it in its header)
//!
//! # Example
//! ```
//! use huffseal_core::bitio::{BitReader, BitWriter};
//! use huffseal_core::bits::BitString;
//!
//! let bits: BitString = "10111".parse().unwrap();
//! let mut writer = BitWriter::new();
//! writer.write_bit_string(&bits);
//! let bytes = writer.finish();
//! assert_eq!(bytes, vec![0b1011_1000]);
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bit_string(5).unwrap(), bits);
//! ```

use crate::bits::BitString;
use crate::error::{BitIoError, Result};

/// Writes bits MSB-first into a byte buffer.
///
/// # Invariants
/// - `bit_count` is always < 8
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one bit.
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.bit_buffer |= 0x80 >> self.bit_count;
        }
        self.bit_count += 1;

        if self.bit_count == 8 {
            self.bytes.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
    }

    /// Append every bit of `bits`.
    pub fn write_bit_string(&mut self, bits: &BitString) {
        for bit in bits.bits() {
            self.write_bit(bit);
        }
    }

    /// Flush the partial byte (zero padded) and return the output.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
        }
        self.bytes
    }

    /// Total number of bits written (including the partial byte).
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }
}

/// Reads bits MSB-first from a byte buffer.
///
/// # Invariants
/// - `bit_position` never exceeds `data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Current bit position (0 = MSB of first byte)
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            bit_position: 0,
        }
    }

    /// Read a single bit.
    ///
    /// # Errors
    /// Returns `BitIoError::UnexpectedEof` at the end of the buffer.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.is_empty() {
            return Err(BitIoError::UnexpectedEof.into());
        }
        let byte = self.data[self.bit_position / 8];
        let bit = byte & (0x80 >> (self.bit_position % 8)) != 0;
        self.bit_position += 1;
        Ok(bit)
    }

    /// Read exactly `count` bits into a bit string.
    ///
    /// # Errors
    /// Returns `BitIoError::UnexpectedEof` if fewer than `count` bits remain;
    /// nothing is consumed in that case.
    pub fn read_bit_string(&mut self, count: usize) -> Result<BitString> {
        if count > self.bits_remaining() {
            return Err(BitIoError::UnexpectedEof.into());
        }
        let mut bits = BitString::with_capacity(count);
        for _ in 0..count {
            bits.push(self.read_bit()?);
        }
        Ok(bits)
    }

    pub fn bits_remaining(&self) -> usize {
        self.data.len() * 8 - self.bit_position
    }

    pub fn position(&self) -> usize {
        self.bit_position
    }

    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.data.len() * 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn bits(s: &str) -> BitString {
        s.parse().unwrap()
    }

    #[test]
    fn test_full_byte() {
        let mut writer = BitWriter::new();
        writer.write_bit_string(&bits("10110011"));
        assert_eq!(writer.bit_len(), 8);

        let bytes = writer.finish();
        assert_eq!(bytes, vec![0b10110011]);

        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_bit_string(8).unwrap(), bits("10110011"));
        assert!(reader.is_empty());
    }

    #[test]
    fn test_padding() {
        let mut writer = BitWriter::new();
        writer.write_bit(true);
        assert_eq!(writer.finish(), vec![0b10000000]);
    }

    #[test]
    fn test_across_bytes() {
        let input = bits("1010101111110000101");
        let mut writer = BitWriter::new();
        writer.write_bit_string(&input);
        let bytes = writer.finish();
        assert_eq!(bytes, vec![0b10101011, 0b11110000, 0b10100000]);

        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_bit_string(input.len()).unwrap(), input);
        assert_eq!(reader.bits_remaining(), 5);
        assert_eq!(reader.position(), 19);
    }

    #[test]
    fn test_read_past_end() {
        let data = [0xFF];
        let mut reader = BitReader::new(&data);
        assert!(reader.read_bit_string(9).is_err());
        // nothing consumed by the failed read
        assert_eq!(reader.bits_remaining(), 8);
        reader.read_bit_string(8).unwrap();
        assert!(matches!(
            reader.read_bit(),
            Err(Error::BitIo(BitIoError::UnexpectedEof))
        ));
    }

    #[test]
    fn test_empty() {
        let writer = BitWriter::new();
        assert!(writer.finish().is_empty());

        let mut reader = BitReader::new(&[]);
        assert_eq!(reader.read_bit_string(0).unwrap(), BitString::new());
    }
}
