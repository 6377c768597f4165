//! Information-theoretic metrics for a completed run.
//!
//! - Entropy H = −Σ p·log2(p), bits per symbol
//! - Average code length L = Σ p·len(code), bits per symbol
//! - Efficiency H/L and its complement, redundancy
//! - Original size (8 bits per symbol baseline) versus compressed size,
//!   as a rate, a ratio and an absolute gain
//!
//! # Design
//!
//! `Metrics` is a read-only snapshot computed from artifacts the pipeline
//! already produced. Nothing here re-counts symbols or rebuilds a tree.

use crate::codebook::CodeTable;
use crate::frequency::FrequencyTable;

/// Fixed per-symbol size of the uncompressed baseline.
pub const BITS_PER_SYMBOL: u64 = 8;

/// Snapshot of compression quality and the verification outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    // === Information theory ===
    /// Shannon entropy H, bits/symbol
    pub entropy: f64,

    /// Average code length L, bits/symbol
    pub average_length: f64,

    /// H / L × 100
    pub efficiency: f64,

    /// 100 − efficiency
    pub redundancy: f64,

    // === Sizes ===
    /// Symbols × 8
    pub original_bits: u64,

    /// Length of the encoded stream
    pub compressed_bits: u64,

    // === Outcome ===
    /// Round trip reproduced the input exactly
    pub verified: bool,
}

impl Metrics {
    /// Compute all metrics.
    ///
    /// `compressed_bits` is the length of the encoded stream the pipeline
    /// produced; `verified` is the round-trip verdict.
    pub fn compute(
        frequencies: &FrequencyTable,
        codes: &CodeTable,
        compressed_bits: u64,
        verified: bool,
    ) -> Self {
        let entropy = entropy(frequencies);
        let average_length = codes.average_length(frequencies);
        let efficiency = if average_length > 0.0 {
            entropy / average_length * 100.0
        } else {
            0.0
        };

        Self {
            entropy,
            average_length,
            efficiency,
            redundancy: 100.0 - efficiency,
            original_bits: frequencies.total() * BITS_PER_SYMBOL,
            compressed_bits,
            verified,
        }
    }

    /// (1 − compressed/original) × 100.
    ///
    /// Returns 0.0 if there is no original data.
    pub fn compression_rate(&self) -> f64 {
        if self.original_bits == 0 {
            0.0
        } else {
            (1.0 - self.compressed_bits as f64 / self.original_bits as f64) * 100.0
        }
    }

    /// original / compressed.
    ///
    /// Returns 0.0 if nothing was compressed.
    pub fn compression_ratio(&self) -> f64 {
        if self.compressed_bits == 0 {
            0.0
        } else {
            self.original_bits as f64 / self.compressed_bits as f64
        }
    }

    /// Bits saved (negative if the code is larger than the baseline).
    pub fn gain_bits(&self) -> i64 {
        self.original_bits as i64 - self.compressed_bits as i64
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Efficiency ===");
        println!("Original size:     {:>8} bits", self.original_bits);
        println!("Compressed size:   {:>8} bits", self.compressed_bits);
        println!("Gain:              {:>8} bits", self.gain_bits());
        println!("Compression rate:  {:>8.2}%", self.compression_rate());
        println!("Ratio:             {:>8.3}:1", self.compression_ratio());
        println!();
        println!("Entropy (H):       {:>8.4} bits/symbol", self.entropy);
        println!("Average length (L):{:>8.4} bits/symbol", self.average_length);
        println!("Efficiency:        {:>8.2}% (H/L x 100)", self.efficiency);
        println!("Redundancy:        {:>8.2}% (100 - efficiency)", self.redundancy);
        println!();
    }

    /// Print just the final result (pass/fail).
    pub fn print_result(&self) {
        if self.verified {
            println!("✓ Verification passed: recovered text is identical to the original");
            println!(
                "  {} bits → {} bits ({:.2}% smaller)",
                self.original_bits,
                self.compressed_bits,
                self.compression_rate()
            );
        } else {
            println!("✗ Verification failed: recovered text does not match the original");
        }
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "original_bits={}\n\
             compressed_bits={}\n\
             gain_bits={}\n\
             compression_rate={:.2}\n\
             compression_ratio={:.3}\n\
             entropy={:.4}\n\
             average_length={:.4}\n\
             efficiency={:.2}\n\
             redundancy={:.2}\n\
             verified={}\n",
            self.original_bits,
            self.compressed_bits,
            self.gain_bits(),
            self.compression_rate(),
            self.compression_ratio(),
            self.entropy,
            self.average_length,
            self.efficiency,
            self.redundancy,
            self.verified,
        )
    }
}

/// Shannon entropy of a frequency table, in bits per symbol.
pub fn entropy(frequencies: &FrequencyTable) -> f64 {
    -frequencies
        .probabilities()
        .filter(|(_, p)| *p > 0.0)
        .map(|(_, p)| p * p.log2())
        .sum::<f64>()
}
