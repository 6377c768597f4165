//! Error types for the huffseal pipeline.
//!
//! Stage-fatal problems (nothing to analyze, a table/input mismatch, a broken
//! random source) are returned as `Err`. Decryption problems have their own
//! enum because the pipeline captures them and degrades to a failed
//! verification instead of aborting.

use thiserror::Error;

/// Top-level error type for all operations in the system.
///
/// Each variant corresponds to a specific failure domain:
/// - Huffman: frequency analysis or tree construction
/// - Codec: encoding a symbol the code table does not know
/// - Decryption: anything that goes wrong between envelope and bitstring
/// - Bit I/O: reading/writing packed bits
/// - Envelope: JSON serialization of the envelope
/// - Random: the OS random source refused to produce key material
/// - I/O: file system operations
#[derive(Debug, Error)]
pub enum Error {
    /// Huffman analysis or construction error (empty input or alphabet)
    #[error("huffman error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Encode-time lookup failure
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Envelope could not be opened back into a bitstring
    #[error("decryption error: {0}")]
    Decryption(#[from] DecryptionError),

    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Envelope could not be serialized
    #[error("envelope serialization error: {0}")]
    Envelope(#[from] serde_json::Error),

    /// Key or IV generation failed
    #[error("random source error: {0}")]
    Random(#[from] rand::Error),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Frequency analysis and tree construction errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HuffmanError {
    /// The input text has no symbols
    #[error("empty input: nothing to analyze")]
    EmptyInput,

    /// Tree builder called with an empty frequency table
    #[error("empty alphabet: cannot build a huffman tree")]
    EmptyAlphabet,
}

/// Bit codec errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The code table has no entry for a symbol of the input
    #[error("no code for symbol {symbol:?} at position {position}")]
    UnknownSymbol { symbol: char, position: usize },
}

/// Bit-level I/O errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// A bit string contained something other than '0' or '1'
    #[error("invalid bit character {found:#04x} at position {position}")]
    InvalidBitChar { position: usize, found: u8 },

    /// A bit string is too long for a 32-bit length field
    #[error("{0} bits exceed the 32-bit length field")]
    LengthOverflow(usize),
}

/// Failures on the envelope → bitstring path.
///
/// Every variant means the decrypted content must not reach the decoder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecryptionError {
    /// The envelope JSON could not be parsed
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Key is not 64 hex digits
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// IV is not valid hex or not 16 bytes long
    #[error("invalid IV: {0}")]
    InvalidIv(String),

    /// Ciphertext is not valid base64
    #[error("invalid ciphertext encoding: {0}")]
    InvalidCiphertextEncoding(String),

    /// Ciphertext length is zero or not a multiple of the block size
    #[error("ciphertext length {len} is not a positive multiple of {block}")]
    TruncatedCiphertext { len: usize, block: usize },

    /// PKCS#7 padding check failed after decryption
    #[error("bad padding (wrong key, wrong IV, or tampered ciphertext)")]
    BadPadding,

    /// Decryption produced no bytes at all
    #[error("decrypted plaintext is empty")]
    EmptyPlaintext,

    /// Decrypted text contains a byte other than '0' or '1'
    #[error("decrypted plaintext is not binary: byte {byte:#04x} at offset {position}")]
    NonBinaryPlaintext { position: usize, byte: u8 },

    /// Packed plaintext frame is structurally invalid
    #[error("malformed packed frame: {0}")]
    MalformedFrame(String),

    /// Packed plaintext frame failed its CRC check
    #[error("packed frame CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    IntegrityMismatch { expected: u32, actual: u32 },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
