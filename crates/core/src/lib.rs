//! huffseal-core: Huffman compression with a sealed, verified round trip
//!
//! This library provides the core components for a learning-focused system that:
//! - Analyzes symbol frequencies of a text
//! - Builds a Huffman tree and derives an optimal prefix code
//! - Encodes the text into a bit string
//! - Seals the bit string with AES-256-CBC under a per-run random key
//! - Opens, decodes and verifies the result against the original
//! - Reports entropy, average code length, efficiency and compression
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `frequency`: Symbol counting
//! - `huffman`: Tree construction with deterministic tie-breaking
//! - `codebook`: Code table (and inverse) derived from the tree
//! - `bits`: `'0'`/`'1'` bit strings
//! - `codec`: Encode/decode between text and bit strings
//! - `bitio` / `packing`: Optional 8-bits-per-byte plaintext frame
//! - `crypto`: Key/IV generation, AES-256-CBC, envelope serialization
//! - `verify`: Round-trip comparison
//! - `metrics`: Information-theoretic measurements
//! - `pipeline`: All of the above as one function
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and recoverable
//! - **Deterministic codes**: Identical input yields identical code tables
//! - **Ephemeral keys**: Keys never leave memory and are wiped on drop
//! - **Visible failure**: A broken round trip is a reported outcome, not a crash

pub mod bitio;
pub mod bits;
pub mod codebook;
pub mod codec;
pub mod crypto;
pub mod error;
pub mod frequency;
pub mod huffman;
pub mod metrics;
pub mod packing;
pub mod pipeline;
pub mod verify;

// Re-export commonly used types
pub use bits::BitString;
pub use codebook::CodeTable;
pub use crypto::{EncryptionEnvelope, PlaintextLayout, SessionKey};
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use huffman::HuffmanNode;
pub use metrics::Metrics;
pub use pipeline::{run, PipelineOptions, PipelineReport};
