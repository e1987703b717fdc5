//! Self-describing compressed container
//!
//! Wire layout: the 4-byte magic `HUFP`, a format version byte, then the
//! bincode encoding of [`CompressedContainer`].

use serde::{Deserialize, Serialize};

use crate::bits::{self, PackedBits};
use crate::code_table::CodeTable;
use crate::error::CodecError;
use crate::frequency::FrequencyTable;
use crate::integrity::{self, Digest};
use crate::tree::HuffmanTree;

pub const MAGIC: [u8; 4] = *b"HUFP";
pub const FORMAT_VERSION: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerFormat {
    /// Compressed from an empty input; no tree and no payload.
    Empty,
    Huffman,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressedContainer {
    pub format: ContainerFormat,
    pub original_len: u64,
    /// SHA-256 of the uncompressed bytes.
    pub digest: Digest,
    /// Pre-order serialized Huffman tree.
    pub tree: Vec<u8>,
    /// Meaningful bits in `payload`, excluding padding.
    pub bit_count: u64,
    pub payload: Vec<u8>,
}

impl CompressedContainer {
    fn empty() -> Self {
        Self {
            format: ContainerFormat::Empty,
            original_len: 0,
            digest: integrity::digest(&[]),
            tree: Vec::new(),
            bit_count: 0,
            payload: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.format == ContainerFormat::Empty
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let body = bincode::serialize(self).map_err(|e| CodecError::Serialization(e.to_string()))?;
        let mut output = Vec::with_capacity(MAGIC.len() + 1 + body.len());
        output.extend_from_slice(&MAGIC);
        output.push(FORMAT_VERSION);
        output.extend_from_slice(&body);
        Ok(output)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, CodecError> {
        if data.len() < MAGIC.len() + 1 {
            return Err(CodecError::malformed("data too short"));
        }
        let (magic, rest) = data.split_at(MAGIC.len());
        if magic != MAGIC.as_slice() {
            return Err(CodecError::malformed("bad magic"));
        }
        let (version, body) = (rest[0], &rest[1..]);
        if version != FORMAT_VERSION {
            return Err(CodecError::malformed(format!("unsupported format version {version}")));
        }

        let container: CompressedContainer =
            bincode::deserialize(body).map_err(|e| CodecError::malformed(e.to_string()))?;
        let used = bincode::serialized_size(&container)
            .map_err(|e| CodecError::Serialization(e.to_string()))?;
        if used != body.len() as u64 {
            return Err(CodecError::malformed("trailing bytes after container"));
        }
        Ok(container)
    }

    /// Length in bytes of the packed payload.
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
}

/// Compress `data` into a container.
pub fn compress(data: &[u8]) -> Result<CompressedContainer, CodecError> {
    compress_counted(data, &FrequencyTable::count(data))
}

/// Compress `data` given its already computed frequency table.
pub(crate) fn compress_counted(
    data: &[u8],
    freq: &FrequencyTable,
) -> Result<CompressedContainer, CodecError> {
    let Some(tree) = HuffmanTree::build(freq) else {
        tracing::debug!("empty input, emitting empty container");
        return Ok(CompressedContainer::empty());
    };
    let table = CodeTable::from_tree(&tree);
    let PackedBits { bytes, bit_count } = bits::pack(data, &table)?;

    tracing::debug!(
        original_len = data.len(),
        symbols = table.len(),
        bit_count,
        "packed huffman payload"
    );
    Ok(CompressedContainer {
        format: ContainerFormat::Huffman,
        original_len: data.len() as u64,
        digest: integrity::digest(data),
        tree: tree.serialize()?,
        bit_count,
        payload: bytes,
    })
}

/// Decode a container and check the result against its stored digest.
pub fn decompress(container: &CompressedContainer) -> Result<Vec<u8>, CodecError> {
    let output = match container.format {
        ContainerFormat::Empty => {
            if container.original_len != 0
                || container.bit_count != 0
                || !container.tree.is_empty()
                || !container.payload.is_empty()
            {
                return Err(CodecError::malformed("empty container carries data"));
            }
            Vec::new()
        }
        ContainerFormat::Huffman => {
            if container.original_len == 0 {
                return Err(CodecError::malformed("huffman container with zero length"));
            }
            let tree = HuffmanTree::deserialize(&container.tree)?;
            bits::unpack(
                &container.payload,
                container.bit_count,
                &tree,
                container.original_len,
            )?
        }
    };

    integrity::verify(&output, &container.digest)?;
    tracing::debug!(len = output.len(), "decompressed and verified");
    Ok(output)
}
