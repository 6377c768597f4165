//! Symbol frequency analysis.
//!
//! A symbol is one Unicode scalar value. The table keeps its entries in
//! first-occurrence order; the tree builder uses that order as the insertion
//! sequence for tie-breaking, which makes code tables reproducible.

use crate::error::{HuffmanError, Result};
use std::collections::HashMap;

/// Occurrence statistics for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolCount {
    pub symbol: char,
    pub count: u64,
}

/// Symbol → count mapping with derived probabilities.
///
/// # Invariants
/// - every count is positive
/// - counts sum to `total`
/// - each symbol appears exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<SymbolCount>,
    index: HashMap<char, usize>,
    total: u64,
}

impl FrequencyTable {
    /// Build a table from `(symbol, count)` pairs in the given order.
    ///
    /// Pairs with a zero count are skipped and repeated symbols are summed,
    /// so the invariants hold for any input.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (char, u64)>,
    {
        let mut table = Self {
            entries: Vec::new(),
            index: HashMap::new(),
            total: 0,
        };
        for (symbol, count) in counts {
            if count > 0 {
                table.add(symbol, count);
            }
        }
        table
    }

    fn add(&mut self, symbol: char, count: u64) {
        match self.index.get(&symbol) {
            Some(&i) => self.entries[i].count += count,
            None => {
                self.index.insert(symbol, self.entries.len());
                self.entries.push(SymbolCount { symbol, count });
            }
        }
        self.total += count;
    }

    /// Total number of symbols counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-occurrence order.
    pub fn entries(&self) -> &[SymbolCount] {
        &self.entries
    }

    pub fn count(&self, symbol: char) -> Option<u64> {
        self.index.get(&symbol).map(|&i| self.entries[i].count)
    }

    /// Probability of `symbol` (count / total), `None` if absent.
    pub fn probability(&self, symbol: char) -> Option<f64> {
        self.count(symbol)
            .map(|count| count as f64 / self.total as f64)
    }

    /// Iterate `(symbol, probability)` in first-occurrence order.
    pub fn probabilities(&self) -> impl Iterator<Item = (char, f64)> + '_ {
        let total = self.total as f64;
        self.entries
            .iter()
            .map(move |e| (e.symbol, e.count as f64 / total))
    }

    /// Entries sorted by descending count. Ties keep first-occurrence order.
    pub fn by_descending_frequency(&self) -> Vec<SymbolCount> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
    }
}

/// Count every symbol of `text`.
///
/// # Errors
/// Returns `HuffmanError::EmptyInput` if `text` has no symbols.
pub fn analyze(text: &str) -> Result<FrequencyTable> {
    if text.is_empty() {
        return Err(HuffmanError::EmptyInput.into());
    }

    let mut table = FrequencyTable::from_counts(std::iter::empty());
    for symbol in text.chars() {
        table.add(symbol, 1);
    }

    tracing::debug!(
        symbols = table.total(),
        distinct = table.len(),
        "frequency analysis complete"
    );
    Ok(table)
}
