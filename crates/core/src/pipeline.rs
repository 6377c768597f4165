//! The full compress → seal → open → decode → verify pipeline.
//!
//! [`run`] is a plain function from input text to a [`PipelineReport`].
//! Stages run strictly in order, each consuming the complete output of the
//! previous one:
//!
//! ```text
//! analyze → build_tree → CodeTable → encode → protect
//!         → reveal → decode → verify → Metrics
//! ```
//!
//! # Failure handling
//!
//! Empty input, an empty alphabet, an encode-time lookup miss or a broken
//! random source abort the run with `Err`. Everything after `protect` is
//! allowed to fail softly: a [`DecryptionError`] is recorded in the report,
//! the recovered text is empty, verification fails, and metrics are still
//! computed so the failure can be shown.
//!
//! The session key is handed back in the report so the caller can open an
//! exported envelope later. It is wiped when the report is dropped and is
//! never logged.

use crate::bits::BitString;
use crate::codebook::CodeTable;
use crate::codec::{self, Decoded};
use crate::crypto::{self, EncryptionEnvelope, PlaintextLayout, SessionKey};
use crate::error::{DecryptionError, Result};
use crate::frequency::{self, FrequencyTable};
use crate::huffman;
use crate::metrics::Metrics;
use crate::verify::{self, Verification};

/// Knobs for a pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Plaintext layout handed to the cipher
    pub layout: PlaintextLayout,

    /// Flip one ciphertext byte between sealing and opening, to show the
    /// failure path end to end
    pub corrupt_ciphertext: bool,
}

/// Every artifact of a run, in stage order.
#[derive(Debug)]
pub struct PipelineReport {
    pub input: String,
    pub frequencies: FrequencyTable,
    pub codes: CodeTable,
    pub encoded: BitString,

    /// Key the envelope was sealed with; keep it out-of-band
    pub key: SessionKey,

    pub envelope: EncryptionEnvelope,

    /// Why the envelope could not be opened, if it could not
    pub decryption_failure: Option<DecryptionError>,

    pub recovered: Decoded,
    pub verification: Verification,
    pub metrics: Metrics,
}

impl PipelineReport {
    pub fn verified(&self) -> bool {
        self.verification.ok
    }
}

/// Run every stage on `text`.
///
/// # Errors
/// - `HuffmanError::EmptyInput` if `text` is empty
/// - `HuffmanError::EmptyAlphabet` / `CodecError::UnknownSymbol` on
///   internal sequencing bugs
/// - `Error::Random` if key material cannot be generated
pub fn run(text: &str, options: &PipelineOptions) -> Result<PipelineReport> {
    let span = tracing::info_span!("pipeline", symbols = text.chars().count());
    let _guard = span.enter();

    let frequencies = frequency::analyze(text)?;
    tracing::info!(distinct = frequencies.len(), "symbols analyzed");

    let tree = huffman::build_tree(&frequencies)?;
    let codes = CodeTable::from_tree(&tree);
    drop(tree);
    tracing::info!(codes = codes.len(), max_len = codes.max_code_len(), "codes generated");

    let encoded = codec::encode(text, &codes)?;
    tracing::info!(bits = encoded.len(), "text encoded");

    let (key, mut envelope) = crypto::protect(&encoded, options.layout)?;

    let opened = if options.corrupt_ciphertext {
        tracing::warn!("corrupting ciphertext before opening");
        envelope
            .flip_ciphertext_byte(0)
            .and_then(|()| crypto::reveal(&key, &envelope))
    } else {
        crypto::reveal(&key, &envelope)
    };

    let (recovered, decryption_failure) = match opened {
        Ok(bits) => (codec::decode(&bits, &codes), None),
        Err(e) => {
            tracing::warn!(error = %e, "envelope could not be opened");
            (Decoded::empty(), Some(e))
        }
    };

    let verification = verify::verify(text, &recovered);
    let metrics = Metrics::compute(
        &frequencies,
        &codes,
        encoded.len() as u64,
        verification.ok,
    );

    Ok(PipelineReport {
        input: text.to_string(),
        frequencies,
        codes,
        encoded,
        key,
        envelope,
        decryption_failure,
        recovered,
        verification,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, HuffmanError};

    #[test]
    fn test_known_scenario() {
        let report = run("AAAABBC", &PipelineOptions::default()).unwrap();

        assert_eq!(report.encoded.as_str(), "1111010100");
        assert_eq!(report.recovered.text, "AAAABBC");
        assert!(report.verified());
        assert!(report.decryption_failure.is_none());
        assert_eq!(report.metrics.original_bits, 56);
        assert_eq!(report.metrics.compressed_bits, 10);
        assert!(report.metrics.verified);
    }

    #[test]
    fn test_empty_input_aborts() {
        let result = run("", &PipelineOptions::default());
        assert!(matches!(
            result,
            Err(Error::Huffman(HuffmanError::EmptyInput))
        ));
    }

    #[test]
    fn test_corruption_degrades_to_failed_verification() {
        let options = PipelineOptions {
            corrupt_ciphertext: true,
            ..PipelineOptions::default()
        };
        let report = run("some text worth protecting", &options).unwrap();

        assert!(!report.verified());
        assert!(report.decryption_failure.is_some());
        assert!(report.recovered.text.is_empty());
        // metrics still describe the compression
        assert_eq!(report.metrics.original_bits, 26 * 8);
        assert!(!report.metrics.verified);
    }

    #[test]
    fn test_packed_layout() {
        let options = PipelineOptions {
            layout: PlaintextLayout::Packed,
            ..PipelineOptions::default()
        };
        let report = run("packed bits take an eighth of the room", &options).unwrap();
        assert!(report.verified());
        assert_eq!(report.envelope.layout, PlaintextLayout::Packed);
    }

    #[test]
    fn test_returned_key_opens_envelope() {
        let report = run("keep the key out-of-band", &PipelineOptions::default()).unwrap();
        let opened = crypto::reveal(&report.key, &report.envelope).unwrap();
        assert_eq!(opened, report.encoded);
    }

    #[test]
    fn test_metrics_match_encoded_stream() {
        let report = run("mississippi", &PipelineOptions::default()).unwrap();
        assert_eq!(
            report.metrics.compressed_bits,
            report.codes.encoded_len(&report.frequencies)
        );
        assert_eq!(report.metrics.compressed_bits, report.encoded.len() as u64);
    }
}
