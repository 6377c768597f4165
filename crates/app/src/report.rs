//! Plain-text report of a verified run.
//!
//! A report is only produced for a run whose round trip verified. The
//! session key is never written to it.

use crate::stages::{display_symbol, preview};
use huffseal_core::PipelineReport;
use std::fmt::{self, Write as _};
use std::path::Path;

/// Bits of the encoded stream included in the report.
pub const BIT_EXCERPT: usize = 500;

/// Characters of base64 ciphertext included in the report.
pub const CIPHERTEXT_EXCERPT: usize = 500;

const RULE: &str = "═══════════════════════════════════════════════════════════════";

/// Render the report, or `None` if verification failed.
pub fn render(report: &PipelineReport) -> Option<String> {
    if !report.verified() {
        return None;
    }
    let mut out = String::new();
    write_sections(&mut out, report).ok()?;
    Some(out)
}

fn write_sections(out: &mut String, report: &PipelineReport) -> fmt::Result {
    let m = &report.metrics;

    writeln!(out, "{RULE}")?;
    writeln!(out, "REPORT: TEXT COMPRESSION AND ENCRYPTION")?;
    writeln!(out, "{RULE}")?;
    writeln!(out)?;
    writeln!(out, "Algorithm: Huffman (optimal prefix code)")?;
    writeln!(out, "Cipher: AES-256 (CBC mode, PKCS#7 padding)")?;
    writeln!(out, "Plaintext layout: {}", report.envelope.layout)?;

    section(out, 1, "ORIGINAL TEXT")?;
    writeln!(out, "{}", report.input)?;
    writeln!(out)?;
    writeln!(
        out,
        "Symbols: {} | Size: {} bits | Distinct: {}",
        report.frequencies.total(),
        m.original_bits,
        report.frequencies.len()
    )?;

    section(out, 2, "SYMBOL ANALYSIS (descending frequency)")?;
    let total = report.frequencies.total() as f64;
    for (rank, entry) in report.frequencies.by_descending_frequency().iter().enumerate() {
        let code = report
            .codes
            .code(entry.symbol)
            .map_or(String::new(), |c| c.to_string());
        writeln!(
            out,
            "{:>3}. '{:<3}' | Count: {:>4} | Prob: {:>7.3}% | Code: {}",
            rank + 1,
            display_symbol(entry.symbol),
            entry.count,
            entry.count as f64 / total * 100.0,
            code
        )?;
    }

    section(out, 3, "HUFFMAN CODES")?;
    for (symbol, code) in report.codes.iter() {
        writeln!(out, "'{}' → {}", display_symbol(symbol), code)?;
    }

    section(out, 4, "COMPRESSION")?;
    writeln!(out, "Compressed text (binary excerpt):")?;
    writeln!(out, "{}", report.encoded.excerpt(BIT_EXCERPT))?;
    writeln!(out)?;
    writeln!(out, "Length: {} bits", report.encoded.len())?;

    section(out, 5, "AES-256 ENCRYPTION")?;
    writeln!(out, "IV (128 bits / 32 hex):")?;
    writeln!(out, "{}", report.envelope.iv)?;
    writeln!(out)?;
    writeln!(out, "Ciphertext (base64):")?;
    writeln!(out, "{}", preview(&report.envelope.ciphertext, CIPHERTEXT_EXCERPT))?;
    writeln!(out)?;
    writeln!(out, "Key: not recorded (shown on screen only)")?;

    section(out, 6, "VERIFICATION")?;
    writeln!(out, "{}", report.verification.summary())?;

    section(out, 7, "EFFICIENCY")?;
    writeln!(out, "Original size        {:>10} bits", m.original_bits)?;
    writeln!(out, "Compressed size      {:>10} bits", m.compressed_bits)?;
    writeln!(out, "Gain                 {:>10} bits", m.gain_bits())?;
    writeln!(out, "Compression rate     {:>10.2} %", m.compression_rate())?;
    writeln!(out, "Ratio                {:>10.3} :1", m.compression_ratio())?;
    writeln!(out, "Entropy (H)          {:>10.4} bits/symbol", m.entropy)?;
    writeln!(out, "Average length (L)   {:>10.4} bits/symbol", m.average_length)?;
    writeln!(out, "Efficiency           {:>10.2} % (H/L x 100)", m.efficiency)?;
    writeln!(out, "Redundancy           {:>10.2} % (100 - efficiency)", m.redundancy)?;
    writeln!(out)?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "End of report")?;
    writeln!(out, "{RULE}")
}

/// Render and write the report to `path`.
///
/// Returns `Ok(false)` without touching the file system if verification
/// failed.
pub fn write(path: &Path, report: &PipelineReport) -> huffseal_core::Result<bool> {
    let Some(text) = render(report) else {
        tracing::warn!(path = %path.display(), "report refused: verification failed");
        return Ok(false);
    };
    std::fs::write(path, text)?;
    tracing::info!(path = %path.display(), "report written");
    Ok(true)
}

fn section(out: &mut String, number: usize, title: &str) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "{number}. {title}")?;
    writeln!(out, "{RULE}")?;
    writeln!(out)
}
