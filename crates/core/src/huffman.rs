//! Huffman tree construction.
//!
//! # Algorithm
//!
//! Every distinct symbol starts as a leaf weighted by its count. The two
//! lightest nodes are repeatedly removed from a min-heap and merged under a
//! new internal node whose weight is their sum, until one node (the root)
//! remains. The first node removed becomes the left child.
//!
//! # Determinism
//!
//! Heap entries are ordered by `(frequency, sequence)`. Leaves receive
//! sequence numbers in first-occurrence order and each merged node takes the
//! next unused number, so equal weights always resolve the same way and
//! identical input always yields the identical tree.
//!
//! # Degenerate alphabet
//!
//! With a single distinct symbol there is nothing to merge: the root is the
//! lone leaf. The code table gives it the one-bit code `0`.

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A node of a Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        symbol: char,
        frequency: u64,
    },
    Internal {
        frequency: u64,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    pub fn frequency(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { frequency, .. } | HuffmanNode::Internal { frequency, .. } => {
                *frequency
            }
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    /// Number of leaves below (and including) this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 1,
            HuffmanNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Length of the longest root-to-leaf path, in edges.
    pub fn depth(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 0,
            HuffmanNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn merge(left: HuffmanNode, right: HuffmanNode) -> HuffmanNode {
        HuffmanNode::Internal {
            frequency: left.frequency() + right.frequency(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// A node waiting in the build heap.
#[derive(Debug)]
struct QueuedNode {
    frequency: u64,
    sequence: u64,
    node: HuffmanNode,
}

// Ordering for the heap (min-heap: lightest, then earliest, first)
impl PartialEq for QueuedNode {
    fn eq(&self, other: &Self) -> bool {
        self.frequency == other.frequency && self.sequence == other.sequence
    }
}

impl Eq for QueuedNode {}

impl PartialOrd for QueuedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap
        other
            .frequency
            .cmp(&self.frequency)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Build the Huffman tree for a frequency table.
///
/// Runs in O(n log n) for n distinct symbols.
///
/// # Errors
/// Returns `HuffmanError::EmptyAlphabet` if the table has no symbols.
pub fn build_tree(table: &FrequencyTable) -> Result<HuffmanNode> {
    let mut heap: BinaryHeap<QueuedNode> = table
        .entries()
        .iter()
        .zip(0u64..)
        .map(|(entry, sequence)| QueuedNode {
            frequency: entry.count,
            sequence,
            node: HuffmanNode::Leaf {
                symbol: entry.symbol,
                frequency: entry.count,
            },
        })
        .collect();

    let mut next_sequence = heap.len() as u64;

    loop {
        let first = heap.pop().ok_or(HuffmanError::EmptyAlphabet)?;
        let Some(second) = heap.pop() else {
            tracing::debug!(
                leaves = first.node.leaf_count(),
                depth = first.node.depth(),
                "huffman tree built"
            );
            return Ok(first.node);
        };

        let merged = HuffmanNode::merge(first.node, second.node);
        heap.push(QueuedNode {
            frequency: merged.frequency(),
            sequence: next_sequence,
            node: merged,
        });
        next_sequence += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::frequency::analyze;

    fn leaf(symbol: char, frequency: u64) -> HuffmanNode {
        HuffmanNode::Leaf { symbol, frequency }
    }

    #[test]
    fn test_known_tree() {
        // C(1) and B(2) merge first, then that subtree (3) with A(4)
        let tree = build_tree(&analyze("AAAABBC").unwrap()).unwrap();

        let expected = HuffmanNode::merge(
            HuffmanNode::merge(leaf('C', 1), leaf('B', 2)),
            leaf('A', 4),
        );
        assert_eq!(tree, expected);
        assert_eq!(tree.frequency(), 7);
    }

    #[test]
    fn test_single_symbol_is_lone_leaf() {
        let tree = build_tree(&analyze("zzzz").unwrap()).unwrap();
        assert_eq!(tree, leaf('z', 4));
        assert!(tree.is_leaf());
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn test_empty_alphabet() {
        let table = FrequencyTable::from_counts(std::iter::empty());
        let result = build_tree(&table);
        assert!(matches!(
            result,
            Err(Error::Huffman(HuffmanError::EmptyAlphabet))
        ));
    }

    #[test]
    fn test_ties_follow_first_occurrence() {
        // All weights equal: x and y merge first, then z with w, then the pairs
        let tree = build_tree(&analyze("xyzw").unwrap()).unwrap();

        let expected = HuffmanNode::merge(
            HuffmanNode::merge(leaf('x', 1), leaf('y', 1)),
            HuffmanNode::merge(leaf('z', 1), leaf('w', 1)),
        );
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_reproducible() {
        let text = "she sells sea shells by the sea shore";
        let a = build_tree(&analyze(text).unwrap()).unwrap();
        let b = build_tree(&analyze(text).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_root_weight_and_leaves() {
        let text = "abracadabra";
        let table = analyze(text).unwrap();
        let tree = build_tree(&table).unwrap();

        assert_eq!(tree.frequency(), table.total());
        assert_eq!(tree.leaf_count(), table.len());
    }

    #[test]
    fn test_internal_nodes_have_two_children() {
        fn check(node: &HuffmanNode) {
            if let HuffmanNode::Internal {
                frequency,
                left,
                right,
            } = node
            {
                assert_eq!(*frequency, left.frequency() + right.frequency());
                check(left);
                check(right);
            }
        }
        check(&build_tree(&analyze("mississippi river").unwrap()).unwrap());
    }
}
