//! Huffman tree construction and its pre-order serialization
//!
//! Nodes live in an arena and refer to their children by index, so the
//! tree is acyclic by construction and walks never chase boxed pointers.
//!
//! Serialized form (bit-level, MSB first, zero-padded to a whole byte):
//! a branch is a `0` bit followed by its left and right subtrees, a leaf is
//! a `1` bit followed by the 8-bit symbol.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::error::CodecError;
use crate::frequency::FrequencyTable;

/// Deepest level a leaf can sit at in a tree over a 256-symbol alphabet.
pub const MAX_DEPTH: usize = 255;

/// Index of a node inside its [`HuffmanTree`] arena.
pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf { symbol: u8, weight: u64 },
    Branch { left: NodeId, right: NodeId, weight: u64 },
}

impl HuffmanNode {
    pub fn weight(&self) -> u64 {
        match *self {
            HuffmanNode::Leaf { weight, .. } | HuffmanNode::Branch { weight, .. } => weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<HuffmanNode>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build the optimal prefix tree for `freq`, or `None` when no symbol
    /// has a non-zero count.
    ///
    /// Equal weights are popped in arena order (leaves in ascending symbol
    /// order, then branches in creation order). The first node popped
    /// becomes the left child.
    pub fn build(freq: &FrequencyTable) -> Option<Self> {
        let mut nodes: Vec<HuffmanNode> = freq
            .iter()
            .map(|(symbol, weight)| HuffmanNode::Leaf { symbol, weight })
            .collect();

        let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = nodes
            .iter()
            .enumerate()
            .map(|(id, node)| Reverse((node.weight(), id)))
            .collect();

        while let Some(Reverse((lw, left))) = heap.pop() {
            let Some(Reverse((rw, right))) = heap.pop() else {
                tracing::trace!(leaves = freq.distinct(), nodes = nodes.len(), "built huffman tree");
                return Some(Self { nodes, root: left });
            };
            let weight = lw + rw;
            nodes.push(HuffmanNode::Branch { left, right, weight });
            heap.push(Reverse((weight, nodes.len() - 1)));
        }
        None
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &HuffmanNode {
        &self.nodes[id]
    }

    /// The lone symbol when the tree is a single leaf.
    pub fn single_symbol(&self) -> Option<u8> {
        match self.nodes[self.root] {
            HuffmanNode::Leaf { symbol, .. } => Some(symbol),
            HuffmanNode::Branch { .. } => None,
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, HuffmanNode::Leaf { .. }))
            .count()
    }

    /// Encode the tree shape and symbols in pre-order.
    pub fn serialize(&self) -> Result<Vec<u8>, CodecError> {
        let mut writer = BitWriter::endian(Vec::new(), BigEndian);
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match self.nodes[id] {
                HuffmanNode::Leaf { symbol, .. } => {
                    writer.write_bit(true)?;
                    writer.write(8, symbol)?;
                }
                HuffmanNode::Branch { left, right, .. } => {
                    writer.write_bit(false)?;
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        writer.byte_align()?;
        Ok(writer.into_writer())
    }

    /// Rebuild a tree written by [`HuffmanTree::serialize`]. Node weights are
    /// not part of the serialized form and come back as zero.
    pub fn deserialize(data: &[u8]) -> Result<Self, CodecError> {
        let mut parser = TreeParser {
            reader: BitReader::endian(data, BigEndian),
            nodes: Vec::new(),
            seen: [false; 256],
        };
        let root = parser.parse(0)?;

        let TreeParser { mut reader, nodes, .. } = parser;
        while !reader.byte_aligned() {
            if read_tree_bit(&mut reader)? {
                return Err(CodecError::malformed("non-zero padding after tree"));
            }
        }
        if !reader.into_reader().is_empty() {
            return Err(CodecError::malformed("trailing bytes after tree"));
        }
        Ok(Self { nodes, root })
    }
}

struct TreeParser<'a> {
    reader: BitReader<&'a [u8], BigEndian>,
    nodes: Vec<HuffmanNode>,
    seen: [bool; 256],
}

impl TreeParser<'_> {
    fn parse(&mut self, depth: usize) -> Result<NodeId, CodecError> {
        if read_tree_bit(&mut self.reader)? {
            let symbol: u8 = self
                .reader
                .read(8)
                .map_err(|_| CodecError::malformed("tree truncated inside a leaf"))?;
            if std::mem::replace(&mut self.seen[symbol as usize], true) {
                return Err(CodecError::malformed(format!("symbol {symbol} appears twice")));
            }
            self.nodes.push(HuffmanNode::Leaf { symbol, weight: 0 });
        } else {
            if depth >= MAX_DEPTH {
                return Err(CodecError::malformed("tree deeper than the alphabet allows"));
            }
            let left = self.parse(depth + 1)?;
            let right = self.parse(depth + 1)?;
            self.nodes.push(HuffmanNode::Branch { left, right, weight: 0 });
        }
        Ok(self.nodes.len() - 1)
    }
}

fn read_tree_bit(reader: &mut BitReader<&[u8], BigEndian>) -> Result<bool, CodecError> {
    reader
        .read_bit()
        .map_err(|_| CodecError::malformed("tree truncated"))
}
