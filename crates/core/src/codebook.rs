//! Code table generation.
//!
//! Walks a Huffman tree depth-first, appending `0` for a left edge and `1`
//! for a right edge, and records the accumulated path at each leaf. A lone
//! leaf root gets the code `0`.

use crate::bits::BitString;
use crate::frequency::FrequencyTable;
use crate::huffman::HuffmanNode;
use std::collections::{BTreeMap, HashMap};

/// Symbol → code mapping and its inverse.
///
/// # Invariants
/// - every code is non-empty
/// - `inverse` is the exact inverse of `forward`
/// - with two or more symbols, no code is a prefix of another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    forward: BTreeMap<char, BitString>,
    inverse: HashMap<BitString, char>,
}

impl CodeTable {
    /// Derive the code table from a tree.
    pub fn from_tree(root: &HuffmanNode) -> Self {
        let mut table = Self {
            forward: BTreeMap::new(),
            inverse: HashMap::new(),
        };

        match root {
            HuffmanNode::Leaf { symbol, .. } => {
                let mut code = BitString::with_capacity(1);
                code.push(false);
                table.insert(*symbol, code);
            }
            HuffmanNode::Internal { .. } => {
                let mut path = BitString::new();
                table.walk(root, &mut path);
            }
        }

        tracing::debug!(
            codes = table.len(),
            max_len = table.max_code_len(),
            "code table generated"
        );
        table
    }

    fn walk(&mut self, node: &HuffmanNode, path: &mut BitString) {
        match node {
            HuffmanNode::Leaf { symbol, .. } => self.insert(*symbol, path.clone()),
            HuffmanNode::Internal { left, right, .. } => {
                path.push(false);
                self.walk(left, path);
                path.pop();

                path.push(true);
                self.walk(right, path);
                path.pop();
            }
        }
    }

    fn insert(&mut self, symbol: char, code: BitString) {
        debug_assert!(!code.is_empty(), "empty code for {symbol:?}");
        let previous = self.inverse.insert(code.clone(), symbol);
        debug_assert!(previous.is_none(), "code collision for {symbol:?}");
        self.forward.insert(symbol, code);
    }

    /// Code for `symbol`.
    pub fn code(&self, symbol: char) -> Option<&BitString> {
        self.forward.get(&symbol)
    }

    /// Symbol whose code is exactly `code`.
    pub fn symbol(&self, code: &BitString) -> Option<char> {
        self.inverse.get(code).copied()
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// `(symbol, code)` pairs ordered by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (char, &BitString)> + '_ {
        self.forward.iter().map(|(symbol, code)| (*symbol, code))
    }

    pub fn max_code_len(&self) -> usize {
        self.forward.values().map(BitString::len).max().unwrap_or(0)
    }

    /// Whether no code is a proper prefix of another (and all are distinct).
    pub fn is_prefix_free(&self) -> bool {
        // In sorted order a prefix always sorts directly before a code that
        // extends it, so checking neighbours is enough.
        let mut codes: Vec<&BitString> = self.forward.values().collect();
        codes.sort();
        codes.windows(2).all(|pair| !pair[1].starts_with(pair[0]))
    }

    /// Average code length L = Σ p · len(code), in bits per symbol.
    ///
    /// Symbols missing from the table contribute nothing.
    pub fn average_length(&self, frequencies: &FrequencyTable) -> f64 {
        frequencies
            .probabilities()
            .filter_map(|(symbol, p)| self.code(symbol).map(|code| p * code.len() as f64))
            .sum()
    }

    /// Σ count · len(code): the exact length of the encoded stream.
    pub fn encoded_len(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .entries()
            .iter()
            .filter_map(|e| self.code(e.symbol).map(|code| e.count * code.len() as u64))
            .sum()
    }
}
