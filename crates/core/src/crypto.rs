//! Sealing the encoded bit string with AES-256-CBC.
//!
//! [`protect`] draws a fresh 256-bit key and a fresh 128-bit IV for every
//! call and encrypts with PKCS#7 padding. The key is returned to the caller
//! separately and is never part of the [`EncryptionEnvelope`].
//!
//! [`reveal`] reverses the process and refuses to hand back anything that
//! is not a well-formed bit string: a padding failure, an empty plaintext or
//! a single byte other than `'0'`/`'1'` is a [`DecryptionError`]. CBC has no
//! authentication tag, so that content check is what stops a tampered
//! ciphertext from reaching the decoder.
//!
//! # Envelope
//!
//! ```json
//! {"iv": "<32 hex digits>", "ciphertext": "<base64>"}
//! ```
//!
//! The packed layout adds `"layout": "packed"`; the default ASCII layout
//! omits the field so its JSON stays exactly two keys.

use crate::bits::BitString;
use crate::error::{BitIoError, DecryptionError, Result};
use crate::packing;
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use aes::cipher::generic_array::GenericArray;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES-256 key size in bytes
pub const KEY_SIZE: usize = 32;

/// CBC initialization vector size in bytes
pub const IV_SIZE: usize = 16;

/// AES block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// Ephemeral AES-256 key, wiped from memory on drop.
///
/// `Debug` never prints the key bytes. [`to_hex`](Self::to_hex) does, for
/// showing the key to the user; its result is wiped on drop too.
#[derive(ZeroizeOnDrop)]
pub struct SessionKey([u8; KEY_SIZE]);

impl SessionKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Parse a key from 64 hex digits.
    pub fn from_hex(hex_key: &str) -> std::result::Result<Self, DecryptionError> {
        let mut bytes = [0u8; KEY_SIZE];
        if let Err(e) = hex::decode_to_slice(hex_key.trim(), &mut bytes) {
            bytes.zeroize();
            return Err(DecryptionError::InvalidKey(e.to_string()));
        }
        let key = Self(bytes);
        bytes.zeroize();
        Ok(key)
    }

    /// The key as 64 lowercase hex digits.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&self.0))
    }

    fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        let mut key = [0u8; KEY_SIZE];
        rng.try_fill_bytes(&mut key)?;
        Ok(Self(key))
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey(<redacted>)")
    }
}

/// How the bit string becomes cipher plaintext.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaintextLayout {
    /// One ASCII byte (`'0'`/`'1'`) per bit; compatible with exported reports
    #[default]
    Ascii,
    /// Eight bits per byte inside a CRC-checked frame (see [`crate::packing`])
    Packed,
}

impl PlaintextLayout {
    pub fn is_ascii(&self) -> bool {
        matches!(self, PlaintextLayout::Ascii)
    }
}

impl fmt::Display for PlaintextLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaintextLayout::Ascii => f.write_str("ascii"),
            PlaintextLayout::Packed => f.write_str("packed"),
        }
    }
}

/// IV and ciphertext, ready for transport or export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionEnvelope {
    /// Hex-encoded 16-byte IV
    pub iv: String,

    /// Base64-encoded ciphertext
    pub ciphertext: String,

    #[serde(default, skip_serializing_if = "PlaintextLayout::is_ascii")]
    pub layout: PlaintextLayout,
}

impl EncryptionEnvelope {
    fn new(iv: &[u8; IV_SIZE], ciphertext: &[u8], layout: PlaintextLayout) -> Self {
        Self {
            iv: hex::encode(iv),
            ciphertext: BASE64.encode(ciphertext),
            layout,
        }
    }

    /// Serialize as a flat JSON object.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse an envelope previously produced by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> std::result::Result<Self, DecryptionError> {
        serde_json::from_str(json).map_err(|e| DecryptionError::MalformedEnvelope(e.to_string()))
    }

    /// Decode the IV.
    pub fn iv_bytes(&self) -> std::result::Result<[u8; IV_SIZE], DecryptionError> {
        let bytes = hex::decode(&self.iv).map_err(|e| DecryptionError::InvalidIv(e.to_string()))?;
        bytes.try_into().map_err(|bytes: Vec<u8>| {
            DecryptionError::InvalidIv(format!("expected {IV_SIZE} bytes, got {}", bytes.len()))
        })
    }

    /// Decode the ciphertext.
    pub fn ciphertext_bytes(&self) -> std::result::Result<Vec<u8>, DecryptionError> {
        BASE64
            .decode(&self.ciphertext)
            .map_err(|e| DecryptionError::InvalidCiphertextEncoding(e.to_string()))
    }

    /// Flip every bit of one ciphertext byte (index taken modulo the length).
    ///
    /// Exists to exercise the tamper path; a flipped byte must make
    /// [`reveal`] fail.
    pub fn flip_ciphertext_byte(&mut self, index: usize) -> std::result::Result<(), DecryptionError> {
        let mut bytes = self.ciphertext_bytes()?;
        if bytes.is_empty() {
            return Err(DecryptionError::TruncatedCiphertext {
                len: 0,
                block: BLOCK_SIZE,
            });
        }
        let len = bytes.len();
        bytes[index % len] ^= 0xFF;
        self.ciphertext = BASE64.encode(&bytes);
        Ok(())
    }
}

/// Encrypt `bits` under a fresh key and IV from the operating system's CSPRNG.
///
/// # Errors
/// - `Error::Random` if the OS random source fails
/// - `BitIoError::LengthOverflow` if a packed frame cannot describe the length
pub fn protect(
    bits: &BitString,
    layout: PlaintextLayout,
) -> Result<(SessionKey, EncryptionEnvelope)> {
    protect_with(&mut OsRng, bits, layout)
}

/// [`protect`] with a caller-supplied cryptographic RNG.
pub fn protect_with<R: RngCore + CryptoRng>(
    rng: &mut R,
    bits: &BitString,
    layout: PlaintextLayout,
) -> Result<(SessionKey, EncryptionEnvelope)> {
    let key = SessionKey::generate(rng)?;
    let mut iv = [0u8; IV_SIZE];
    rng.try_fill_bytes(&mut iv)?;

    let plaintext = match layout {
        PlaintextLayout::Ascii => bits.as_bytes().to_vec(),
        PlaintextLayout::Packed => packing::pack(bits)?,
    };

    let ciphertext = seal(&key, &iv, &plaintext);

    tracing::info!(
        bits = bits.len(),
        plaintext_bytes = plaintext.len(),
        ciphertext_bytes = ciphertext.len(),
        %layout,
        "bit string sealed"
    );

    Ok((key, EncryptionEnvelope::new(&iv, &ciphertext, layout)))
}

/// Decrypt an envelope back into the bit string it was made from.
///
/// # Errors
/// Any [`DecryptionError`]; see the module docs.
pub fn reveal(
    key: &SessionKey,
    envelope: &EncryptionEnvelope,
) -> std::result::Result<BitString, DecryptionError> {
    let iv = envelope.iv_bytes()?;
    let ciphertext = envelope.ciphertext_bytes()?;

    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(DecryptionError::TruncatedCiphertext {
            len: ciphertext.len(),
            block: BLOCK_SIZE,
        });
    }

    let plaintext = Aes256CbcDec::new(GenericArray::from_slice(&key.0), &iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| DecryptionError::BadPadding)?;

    let bits = match envelope.layout {
        PlaintextLayout::Ascii => BitString::from_ascii(&plaintext).map_err(|e| match e {
            BitIoError::InvalidBitChar { position, found } => {
                DecryptionError::NonBinaryPlaintext {
                    position,
                    byte: found,
                }
            }
            other => DecryptionError::MalformedFrame(other.to_string()),
        })?,
        PlaintextLayout::Packed => packing::unpack(&plaintext)?,
    };

    if bits.is_empty() {
        return Err(DecryptionError::EmptyPlaintext);
    }

    tracing::debug!(bits = bits.len(), "envelope opened");
    Ok(bits)
}

fn seal(key: &SessionKey, iv: &[u8; IV_SIZE], plaintext: &[u8]) -> Vec<u8> {
    Aes256CbcEnc::new(GenericArray::from_slice(&key.0), &(*iv).into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}
