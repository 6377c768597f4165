//! Packed plaintext frame for the optional [`PlaintextLayout::Packed`] layout.
//!
//! The default layout encrypts the bit string's `'0'`/`'1'` characters as-is,
//! eight ciphertext bits per payload bit. The packed layout stores eight
//! payload bits per byte instead and wraps them in a small frame so that
//! `reveal` can reject anything that did not come out of `pack`.
//!
//! # Frame Format
//!
//! ```text
//! +------------------+
//! | Magic (4 bytes)  |  0x48 0x46 0x42 0x31 ("HFB1")
//! +------------------+
//! | bit_len (4)      |  u32 little-endian, number of payload bits
//! +------------------+
//! | crc32 (4)        |  u32 over bit_len and packed bytes
//! +------------------+
//! | packed bits      |  ceil(bit_len / 8) bytes, MSB-first,
//! | (variable)       |  final byte zero padded
//! +------------------+
//! ```
//!
//! [`PlaintextLayout::Packed`]: crate::crypto::PlaintextLayout::Packed

use crate::bitio::{BitReader, BitWriter};
use crate::bits::BitString;
use crate::error::{BitIoError, DecryptionError, Result};

/// Magic number for packed frames: "HFB1"
const MAGIC: [u8; 4] = [0x48, 0x46, 0x42, 0x31];

/// Size of the frame header in bytes
pub const HEADER_SIZE: usize = 12;

/// Pack a bit string into a framed byte buffer.
///
/// # Errors
/// Returns `BitIoError::LengthOverflow` if the bit string is longer than
/// `u32::MAX` bits.
pub fn pack(bits: &BitString) -> Result<Vec<u8>> {
    let bit_len =
        u32::try_from(bits.len()).map_err(|_| BitIoError::LengthOverflow(bits.len()))?;

    let mut writer = BitWriter::new();
    writer.write_bit_string(bits);
    let packed = writer.finish();

    let crc32 = compute_crc(bit_len, &packed);

    let mut frame = Vec::with_capacity(HEADER_SIZE + packed.len());
    frame.extend_from_slice(&MAGIC);
    frame.extend_from_slice(&bit_len.to_le_bytes());
    frame.extend_from_slice(&crc32.to_le_bytes());
    frame.extend_from_slice(&packed);

    Ok(frame)
}

/// Parse a framed byte buffer back into a bit string.
///
/// # Errors
/// - `DecryptionError::MalformedFrame` for a short buffer, wrong magic, a
///   length that disagrees with the payload size, or non-zero padding bits
/// - `DecryptionError::IntegrityMismatch` if the CRC does not match
pub fn unpack(frame: &[u8]) -> std::result::Result<BitString, DecryptionError> {
    if frame.len() < HEADER_SIZE {
        return Err(DecryptionError::MalformedFrame(format!(
            "need at least {HEADER_SIZE} bytes, got {}",
            frame.len()
        )));
    }

    let (header, packed) = frame.split_at(HEADER_SIZE);
    let (magic, rest) = header.split_at(4);
    let (len_bytes, crc_bytes) = rest.split_at(4);

    if magic != MAGIC {
        return Err(DecryptionError::MalformedFrame(format!(
            "invalid magic {magic:02x?}"
        )));
    }

    let bit_len = u32::from_le_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]);
    let expected_crc = u32::from_le_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);

    let bit_len_usize = bit_len as usize;
    let expected_bytes = bit_len_usize.div_ceil(8);
    if packed.len() != expected_bytes {
        return Err(DecryptionError::MalformedFrame(format!(
            "header says {bit_len} bits ({expected_bytes} bytes), payload has {} bytes",
            packed.len()
        )));
    }

    let actual_crc = compute_crc(bit_len, packed);
    if actual_crc != expected_crc {
        return Err(DecryptionError::IntegrityMismatch {
            expected: expected_crc,
            actual: actual_crc,
        });
    }

    let mut reader = BitReader::new(packed);
    let bits = reader
        .read_bit_string(bit_len_usize)
        .map_err(|e| DecryptionError::MalformedFrame(e.to_string()))?;

    let padding = reader.bits_remaining();
    let padding_bits = reader
        .read_bit_string(padding)
        .map_err(|e| DecryptionError::MalformedFrame(e.to_string()))?;
    if padding_bits.bits().any(|bit| bit) {
        return Err(DecryptionError::MalformedFrame(
            "non-zero padding bits".to_string(),
        ));
    }

    Ok(bits)
}

/// CRC32 over the length field and the packed payload.
fn compute_crc(bit_len: u32, packed: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&bit_len.to_le_bytes());
    hasher.update(packed);
    hasher.finalize()
}
