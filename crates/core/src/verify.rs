//! Round-trip verification.
//!
//! Compares the recovered text with the original symbol by symbol. Leftover
//! decoding bits fail the verdict even when the texts happen to match.

use crate::codec::{Decoded, DecodingAnomaly};

/// Outcome of comparing the recovered text with the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub ok: bool,

    /// Symbols in the original text
    pub original_len: usize,

    /// Symbols in the recovered text
    pub recovered_len: usize,

    /// Index of the first differing symbol, or of the first symbol present
    /// in only one of the two texts
    pub first_mismatch: Option<usize>,

    /// Trailing bits left by the decoder, if any
    pub anomaly: Option<DecodingAnomaly>,
}

impl Verification {
    /// One-line human readable verdict.
    pub fn summary(&self) -> String {
        if self.ok {
            return format!("PASSED: {} symbols recovered exactly", self.original_len);
        }
        let mut reason = match self.first_mismatch {
            Some(index) => format!(
                "FAILED: first mismatch at symbol {index} ({} original vs {} recovered)",
                self.original_len, self.recovered_len
            ),
            None => format!("FAILED: {} symbols recovered", self.recovered_len),
        };
        if let Some(anomaly) = &self.anomaly {
            reason.push_str(&format!(
                ", {} undecoded trailing bits at offset {}",
                anomaly.leftover.len(),
                anomaly.bit_offset
            ));
        }
        reason
    }
}

/// Compare `original` with a decode result.
pub fn verify(original: &str, recovered: &Decoded) -> Verification {
    let original_len = original.chars().count();
    let recovered_len = recovered.text.chars().count();

    let first_mismatch = original
        .chars()
        .zip(recovered.text.chars())
        .position(|(a, b)| a != b)
        .or_else(|| (original_len != recovered_len).then(|| original_len.min(recovered_len)));

    let ok = first_mismatch.is_none() && recovered.anomaly.is_none();
    if ok {
        tracing::info!(symbols = original_len, "round trip verified");
    } else {
        tracing::warn!(
            original_len,
            recovered_len,
            ?first_mismatch,
            anomaly = recovered.anomaly.is_some(),
            "round trip verification failed"
        );
    }

    Verification {
        ok,
        original_len,
        recovered_len,
        first_mismatch,
        anomaly: recovered.anomaly.clone(),
    }
}
