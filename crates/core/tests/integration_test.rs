//! Integration tests for the full huffseal pipeline.
//!
//! These tests verify end-to-end behavior: text -> frequencies -> tree ->
//! codes -> bits -> envelope -> bits -> text, with verification that the
//! output matches the input, plus the failure paths in between.

use huffseal_core::{
    codec::{decode, encode},
    crypto::{protect, protect_with, reveal, PlaintextLayout, SessionKey, KEY_SIZE},
    error::{DecryptionError, Error, HuffmanError},
    frequency::analyze,
    huffman::build_tree,
    metrics::Metrics,
    run, CodeTable, EncryptionEnvelope, PipelineOptions,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SHANNON: &str = "La théorie de l'information, développée par Claude Shannon en 1948, \
constitue le fondement mathématique de la communication numérique. Elle quantifie \
l'information, définit l'entropie comme mesure de l'incertitude, et établit les limites \
théoriques de la compression et de la transmission des données.";

/// Drive every stage by hand, the way the pipeline does.
#[test]
fn test_stage_by_stage_round_trip() {
    let frequencies = analyze(SHANNON).expect("analysis failed");
    let tree = build_tree(&frequencies).expect("tree construction failed");
    let codes = CodeTable::from_tree(&tree);
    assert!(codes.is_prefix_free());

    let encoded = encode(SHANNON, &codes).expect("encoding failed");
    assert_eq!(encoded.len() as u64, codes.encoded_len(&frequencies));

    let (key, envelope) = protect(&encoded, PlaintextLayout::Ascii).expect("sealing failed");

    // Envelope survives JSON transport
    let json = envelope.to_json().expect("serialization failed");
    let received = EncryptionEnvelope::from_json(&json).expect("parsing failed");

    let opened = reveal(&key, &received).expect("opening failed");
    assert_eq!(opened, encoded);

    let decoded = decode(&opened, &codes);
    assert!(decoded.is_clean());
    assert_eq!(decoded.text, SHANNON, "output doesn't match input");
}

/// The documented scenario: AAAABBC.
#[test]
fn test_aaaabbc_scenario() {
    let report = run("AAAABBC", &PipelineOptions::default()).expect("pipeline failed");

    assert_eq!(report.frequencies.count('A'), Some(4));
    assert_eq!(report.frequencies.count('B'), Some(2));
    assert_eq!(report.frequencies.count('C'), Some(1));

    assert_eq!(report.codes.code('A').unwrap().as_str(), "1");
    assert_eq!(report.codes.code('B').unwrap().as_str(), "01");
    assert_eq!(report.codes.code('C').unwrap().as_str(), "00");

    assert_eq!(report.encoded.as_str(), "1111010100");
    assert_eq!(report.metrics.original_bits, 56);
    assert_eq!(report.metrics.compressed_bits, 10);
    assert!((report.metrics.compression_rate() - 82.142_857).abs() < 1e-4);

    assert_eq!(report.recovered.text, "AAAABBC");
    assert!(report.verified());
}

/// A single distinct symbol gets code "0" and survives the round trip.
#[test]
fn test_degenerate_alphabet() {
    let text = "x".repeat(37);
    let report = run(&text, &PipelineOptions::default()).expect("pipeline failed");

    assert_eq!(report.codes.len(), 1);
    assert_eq!(report.codes.code('x').unwrap().as_str(), "0");
    assert_eq!(report.encoded.len(), 37);
    assert_eq!(report.recovered.text, text);
    assert!(report.verified());
}

#[test]
fn test_empty_input_rejected_before_analysis() {
    assert!(matches!(
        run("", &PipelineOptions::default()),
        Err(Error::Huffman(HuffmanError::EmptyInput))
    ));
}

/// Tampering is a reported outcome, not a crash.
#[test]
fn test_tampered_run_reports_failure() {
    for layout in [PlaintextLayout::Ascii, PlaintextLayout::Packed] {
        let options = PipelineOptions {
            layout,
            corrupt_ciphertext: true,
        };
        let report = run(SHANNON, &options).expect("pipeline should not abort");

        assert!(!report.verified(), "{layout} layout verified tampered data");
        assert!(report.decryption_failure.is_some());
        assert_eq!(report.verification.recovered_len, 0);
        assert!(report.metrics.entropy > 0.0);
        assert!(!report.metrics.verified);
    }
}

/// An envelope opened with the wrong key never decodes to text.
#[test]
fn test_wrong_key() {
    let codes = CodeTable::from_tree(&build_tree(&analyze("wrong key test").unwrap()).unwrap());
    let encoded = encode("wrong key test", &codes).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let (_key, envelope) = protect_with(&mut rng, &encoded, PlaintextLayout::Ascii).unwrap();

    let other = SessionKey::from_bytes([0x5A; KEY_SIZE]);
    assert!(reveal(&other, &envelope).is_err());
}

/// Swapping the IV of two envelopes garbles the first block.
#[test]
fn test_swapped_iv() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let bits = encode(SHANNON, &CodeTable::from_tree(&build_tree(&analyze(SHANNON).unwrap()).unwrap())).unwrap();

    let (key, mut envelope) = protect_with(&mut rng, &bits, PlaintextLayout::Ascii).unwrap();
    let (_, other) = protect_with(&mut rng, &bits, PlaintextLayout::Ascii).unwrap();
    envelope.iv = other.iv;

    assert!(matches!(
        reveal(&key, &envelope),
        Err(DecryptionError::NonBinaryPlaintext { .. })
    ));
}

/// Decoding with the wrong table leaves a failed verdict.
#[test]
fn test_mismatched_table_fails_verification() {
    let text = "abcabcabcabd";
    let codes = CodeTable::from_tree(&build_tree(&analyze(text).unwrap()).unwrap());
    let other = CodeTable::from_tree(&build_tree(&analyze("zzzzzzzzzyx").unwrap()).unwrap());

    let decoded = decode(&encode(text, &codes).unwrap(), &other);
    let verification = huffseal_core::verify::verify(text, &decoded);
    assert!(!verification.ok);
}

#[test]
fn test_unicode_text() {
    let text = "Grüße, 世界! 🦀🦀🦀 ñandú";
    let report = run(text, &PipelineOptions::default()).expect("pipeline failed");
    assert_eq!(report.recovered.text, text);
    assert_eq!(report.metrics.original_bits, text.chars().count() as u64 * 8);
    assert!(report.verified());
}

#[test]
fn test_metrics_are_pure() {
    let report = run(SHANNON, &PipelineOptions::default()).unwrap();
    let again = Metrics::compute(
        &report.frequencies,
        &report.codes,
        report.encoded.len() as u64,
        report.verified(),
    );
    assert_eq!(again, report.metrics);
    assert!(report.metrics.average_length >= report.metrics.entropy);
    assert!(report.metrics.efficiency > 90.0);
}

#[test]
fn test_packed_envelope_is_smaller() {
    let ascii = run(SHANNON, &PipelineOptions::default()).unwrap();
    let packed = run(
        SHANNON,
        &PipelineOptions {
            layout: PlaintextLayout::Packed,
            corrupt_ciphertext: false,
        },
    )
    .unwrap();

    assert!(packed.verified());
    assert!(packed.envelope.ciphertext.len() * 4 < ascii.envelope.ciphertext.len());
}
