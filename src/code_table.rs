//! Code assignment from a Huffman tree

use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanNode, HuffmanTree, NodeId};

/// Bit code of one symbol, most significant (first emitted) bit first.
pub type Code = Vec<bool>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Walk the tree depth-first, appending `0` for every left branch and
    /// `1` for every right branch. A tree made of a single leaf gives its
    /// symbol the one-bit code `0`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = vec![None; 256];
        build_codes(tree, tree.root(), Vec::new(), &mut codes);
        Self { codes }
    }

    pub fn get(&self, symbol: u8) -> Option<&[bool]> {
        self.codes[symbol as usize].as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &[bool])> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(i, code)| code.as_deref().map(|c| (i as u8, c)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when no code is a prefix of a different code.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&[bool]> = self.iter().map(|(_, c)| c).collect();
        // A prefix sorts immediately before some code it prefixes.
        codes.sort();
        codes.windows(2).all(|pair| !pair[1].starts_with(pair[0]))
    }

    /// Total encoded length in bits of an input with these frequencies.
    pub fn weighted_length(&self, freq: &FrequencyTable) -> u64 {
        freq.iter()
            .map(|(symbol, count)| self.get(symbol).map_or(0, |c| c.len() as u64) * count)
            .sum()
    }
}

fn build_codes(tree: &HuffmanTree, id: NodeId, prefix: Code, codes: &mut [Option<Code>]) {
    match *tree.node(id) {
        HuffmanNode::Leaf { symbol, .. } => {
            let code = if prefix.is_empty() { vec![false] } else { prefix };
            codes[symbol as usize] = Some(code);
        }
        HuffmanNode::Branch { left, right, .. } => {
            let mut p = prefix.clone();
            p.push(false);
            build_codes(tree, left, p, codes);
            let mut p = prefix;
            p.push(true);
            build_codes(tree, right, p, codes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_for(data: &[u8]) -> (CodeTable, FrequencyTable) {
        let freq = FrequencyTable::count(data);
        let tree = HuffmanTree::build(&freq).unwrap();
        (CodeTable::from_tree(&tree), freq)
    }

    #[test]
    fn test_known_codes() {
        let (table, freq) = table_for(b"aaaabbbcc");
        assert_eq!(table.get(b'a'), Some(&[false][..]));
        assert_eq!(table.get(b'c'), Some(&[true, false][..]));
        assert_eq!(table.get(b'b'), Some(&[true, true][..]));
        assert_eq!(table.get(b'x'), None);
        assert_eq!(table.len(), 3);
        assert_eq!(table.weighted_length(&freq), 14);
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let (table, freq) = table_for(b"zzzzzz");
        assert_eq!(table.get(b'z'), Some(&[false][..]));
        assert_eq!(table.weighted_length(&freq), 6);
    }

    #[test]
    fn test_prefix_free() {
        let data: Vec<u8> = (0..=255u8).flat_map(|b| std::iter::repeat(b).take(b as usize % 17 + 1)).collect();
        let (table, _) = table_for(&data);
        assert_eq!(table.len(), 256);
        assert!(table.is_prefix_free());
        assert!(table.iter().all(|(_, code)| !code.is_empty()));
    }

    #[test]
    fn test_prefix_detection() {
        let mut codes = vec![None; 256];
        codes[0] = Some(vec![false]);
        codes[1] = Some(vec![false, true]);
        let table = CodeTable { codes };
        assert!(!table.is_prefix_free());
    }

    #[test]
    fn test_uniform_alphabet_is_balanced() {
        let data: Vec<u8> = (0..=255u8).collect();
        let (table, _) = table_for(&data);
        assert!(table.iter().all(|(_, code)| code.len() == 8));
    }
}
