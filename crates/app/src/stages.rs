//! Stage-by-stage walk-through of a completed run.
//!
//! The pipeline itself runs in one call; this module replays its artifacts in
//! the order they were produced, one stage at a time.

use huffseal_core::PipelineReport;

/// Bits of the encoded stream shown on screen.
const BIT_PREVIEW: usize = 200;

/// Characters of ciphertext and text shown on screen.
const TEXT_PREVIEW: usize = 240;

/// The six steps of the walk-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Text,
    Analysis,
    Huffman,
    Compression,
    Encryption,
    Results,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Text,
        Stage::Analysis,
        Stage::Huffman,
        Stage::Compression,
        Stage::Encryption,
        Stage::Results,
    ];

    /// 1-based position in the walk-through.
    pub fn number(self) -> usize {
        self as usize + 1
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::Text => "Input text",
            Stage::Analysis => "Frequency analysis",
            Stage::Huffman => "Huffman codes",
            Stage::Compression => "Compression",
            Stage::Encryption => "AES-256 encryption",
            Stage::Results => "Decryption and verification",
        }
    }

    /// Print this stage's view of the report.
    pub fn print(self, report: &PipelineReport) {
        println!(
            "=== Stage {}/{}: {} ===",
            self.number(),
            Stage::ALL.len(),
            self.title()
        );
        match self {
            Stage::Text => print_text(report),
            Stage::Analysis => print_analysis(report),
            Stage::Huffman => print_codes(report),
            Stage::Compression => print_compression(report),
            Stage::Encryption => print_encryption(report),
            Stage::Results => print_results(report),
        }
        println!();
    }
}

/// Print every stage in order.
pub fn print_walkthrough(report: &PipelineReport) {
    for stage in Stage::ALL {
        stage.print(report);
    }
}

/// Printable form of a symbol: space and control characters are made visible.
pub fn display_symbol(symbol: char) -> String {
    match symbol {
        ' ' => "␣".to_string(),
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '\t' => "\\t".to_string(),
        c if c.is_control() => c.escape_unicode().to_string(),
        c => c.to_string(),
    }
}

/// The first `max` characters of `text`, with `...` appended when truncated.
pub fn preview(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

fn print_text(report: &PipelineReport) {
    println!("{}", preview(&report.input, TEXT_PREVIEW));
    println!(
        "Symbols: {} | Size: {} bits | Distinct: {}",
        report.frequencies.total(),
        report.metrics.original_bits,
        report.frequencies.len()
    );
}

fn print_analysis(report: &PipelineReport) {
    println!("{:>4}  {:<6} {:>8} {:>10}", "#", "Symbol", "Count", "Prob");
    for (rank, entry) in report.frequencies.by_descending_frequency().iter().enumerate() {
        let probability = entry.count as f64 / report.frequencies.total() as f64;
        println!(
            "{:>4}  {:<6} {:>8} {:>9.3}%",
            rank + 1,
            display_symbol(entry.symbol),
            entry.count,
            probability * 100.0
        );
    }
}

fn print_codes(report: &PipelineReport) {
    let mut codes: Vec<_> = report.codes.iter().collect();
    codes.sort_by(|a, b| a.1.len().cmp(&b.1.len()).then(a.1.as_str().cmp(b.1.as_str())));

    for (symbol, code) in codes {
        println!("  '{}' → {}", display_symbol(symbol), code);
    }
    println!(
        "{} codes, longest {} bits, prefix-free: {}",
        report.codes.len(),
        report.codes.max_code_len(),
        report.codes.len() < 2 || report.codes.is_prefix_free()
    );
}

fn print_compression(report: &PipelineReport) {
    println!("{}", report.encoded.excerpt(BIT_PREVIEW));
    println!(
        "Length: {} bits (was {} bits, {:.2}% smaller)",
        report.encoded.len(),
        report.metrics.original_bits,
        report.metrics.compression_rate()
    );
}

fn print_encryption(report: &PipelineReport) {
    let envelope = &report.envelope;
    println!("Mode: CBC, PKCS#7 padding, fresh 256-bit key and IV");
    println!("Plaintext layout: {}", envelope.layout);
    // stdout only, never through tracing or the report
    println!("Key (256 bits / 64 hex): {}", report.key.to_hex().as_str());
    println!("IV: {}", envelope.iv);
    println!("Ciphertext (base64, {} chars):", envelope.ciphertext.len());
    println!("{}", preview(&envelope.ciphertext, TEXT_PREVIEW));
}

fn print_results(report: &PipelineReport) {
    match &report.decryption_failure {
        Some(e) => println!("Decryption failed: {e}"),
        None => {
            println!("Recovered text:");
            println!("{}", preview(&report.recovered.text, TEXT_PREVIEW));
        }
    }
    println!("{}", report.verification.summary());
}
