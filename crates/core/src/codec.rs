//! Encoding text to a bit string and decoding it back.
//!
//! Decoding is deliberately forgiving at the tail: bits left over after the
//! last complete code are reported as a [`DecodingAnomaly`] alongside the
//! symbols decoded so far, instead of failing. Leftover bits mean either a
//! corrupted stream or a mismatched table, and the round-trip verifier turns
//! them into a failed verdict.
//!
//! A candidate longer than the table's longest code can never match, so
//! decoding stops there and the rest of the stream is left undecoded.

use crate::bits::BitString;
use crate::codebook::CodeTable;
use crate::error::{CodecError, Result};

/// Bits that did not complete a code at the end of a decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodingAnomaly {
    /// The unmatched trailing bits
    pub leftover: BitString,
    /// Offset of the first leftover bit within the stream
    pub bit_offset: usize,
}

/// Result of decoding a bit string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub anomaly: Option<DecodingAnomaly>,
}

impl Decoded {
    /// Decoded nothing, e.g. because decryption failed upstream.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            anomaly: None,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.anomaly.is_none()
    }
}

/// Concatenate the code of every symbol of `text`, in order.
///
/// # Errors
/// Returns `CodecError::UnknownSymbol` for the first symbol with no code.
pub fn encode(text: &str, table: &CodeTable) -> Result<BitString> {
    let mut bits = BitString::new();

    for (position, symbol) in text.chars().enumerate() {
        let code = table
            .code(symbol)
            .ok_or(CodecError::UnknownSymbol { symbol, position })?;
        bits.extend_from(code);
    }

    Ok(bits)
}

/// Decode `bits` with the inverse of `table`.
///
/// Accumulates bits until they match a code, emits that symbol and starts
/// over. Never fails; see [`Decoded::anomaly`].
///
/// The anomaly's `leftover` holds at most `table.max_code_len()` bits.
pub fn decode(bits: &BitString, table: &CodeTable) -> Decoded {
    let max_len = table.max_code_len();
    let mut text = String::new();
    let mut candidate = BitString::with_capacity(max_len);
    let mut candidate_start = 0;

    for (offset, bit) in bits.bits().enumerate() {
        if candidate.is_empty() {
            candidate_start = offset;
        }
        candidate.push(bit);

        if let Some(symbol) = table.symbol(&candidate) {
            text.push(symbol);
            candidate.clear();
        } else if candidate.len() >= max_len {
            tracing::debug!(bit_offset = candidate_start, "no code matches, decode stopped");
            break;
        }
    }

    let anomaly = if candidate.is_empty() {
        None
    } else {
        tracing::warn!(
            leftover_bits = candidate.len(),
            bit_offset = candidate_start,
            "decode finished with unmatched trailing bits"
        );
        Some(DecodingAnomaly {
            leftover: candidate,
            bit_offset: candidate_start,
        })
    };

    Decoded { text, anomaly }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::frequency::analyze;
    use crate::huffman::build_tree;

    fn table_for(text: &str) -> CodeTable {
        CodeTable::from_tree(&build_tree(&analyze(text).unwrap()).unwrap())
    }

    #[test]
    fn test_encode_known_stream() {
        let table = table_for("AAAABBC");
        let bits = encode("AAAABBC", &table).unwrap();
        assert_eq!(bits.as_str(), "1111010100");
        assert_eq!(bits.len(), 10);
    }

    #[test]
    fn test_decode_known_stream() {
        let table = table_for("AAAABBC");
        let decoded = decode(&"1111010100".parse().unwrap(), &table);
        assert_eq!(decoded.text, "AAAABBC");
        assert!(decoded.is_clean());
    }

    #[test]
    fn test_round_trip() {
        let text = "Information theory, founded by Claude Shannon in 1948.\nIt quantifies information.";
        let table = table_for(text);
        let bits = encode(text, &table).unwrap();
        let decoded = decode(&bits, &table);
        assert_eq!(decoded.text, text);
        assert!(decoded.is_clean());
    }

    #[test]
    fn test_single_symbol_stream() {
        let table = table_for("eeeee");
        let bits = encode("eeeee", &table).unwrap();
        assert_eq!(bits.as_str(), "00000");

        let decoded = decode(&bits, &table);
        assert_eq!(decoded.text, "eeeee");
        assert!(decoded.is_clean());
    }

    #[test]
    fn test_unknown_symbol() {
        let table = table_for("abc");
        let result = encode("abxc", &table);
        assert!(matches!(
            result,
            Err(Error::Codec(CodecError::UnknownSymbol {
                symbol: 'x',
                position: 2
            }))
        ));
    }

    #[test]
    fn test_trailing_bits_reported() {
        let table = table_for("AAAABBC");
        // "1" "01" then a dangling "0"
        let decoded = decode(&"1010".parse().unwrap(), &table);
        assert_eq!(decoded.text, "AB");
        let anomaly = decoded.anomaly.unwrap();
        assert_eq!(anomaly.leftover.as_str(), "0");
        assert_eq!(anomaly.bit_offset, 3);
    }

    #[test]
    fn test_mismatched_table_decodes_something_else() {
        let text = "hello world";
        let bits = encode(text, &table_for(text)).unwrap();
        let decoded = decode(&bits, &table_for("completely different alphabet"));
        assert_ne!(decoded.text, text);
    }

    #[test]
    fn test_dead_end_stops_early() {
        // "0" is the only code; a run of ones never matches
        let table = table_for("aaaa");
        let mut bits = BitString::from_iter(std::iter::repeat(false).take(3));
        bits.extend_from(&BitString::from_iter(std::iter::repeat(true).take(200_000)));

        let decoded = decode(&bits, &table);
        assert_eq!(decoded.text, "aaa");
        let anomaly = decoded.anomaly.unwrap();
        assert_eq!(anomaly.leftover.as_str(), "1");
        assert_eq!(anomaly.bit_offset, 3);
    }

    #[test]
    fn test_leftover_bounded_by_longest_code() {
        let table = table_for("AAAABBC");
        let bits: BitString = "0".repeat(1001).parse().unwrap();
        let decoded = decode(&bits, &table);
        // "00" is C; the final lone "0" is left over
        assert_eq!(decoded.text, "C".repeat(500));
        let anomaly = decoded.anomaly.unwrap();
        assert!(anomaly.leftover.len() <= table.max_code_len());
        assert_eq!(anomaly.bit_offset, 1000);
    }

    #[test]
    fn test_encode_multibyte_symbols() {
        let text = "世界世界🦀";
        let table = table_for(text);
        let bits = encode(text, &table).unwrap();
        assert_eq!(bits.len() as u64, table.encoded_len(&analyze(text).unwrap()));
        assert_eq!(decode(&bits, &table).text, text);
    }

    #[test]
    fn test_empty_stream() {
        let decoded = decode(&BitString::new(), &table_for("ab"));
        assert_eq!(decoded, Decoded::empty());
    }
}
