//! huffpack: Huffman compression with a verifiable container format.
//!
//! The compress path runs:
//! - frequency analysis over the input bytes
//! - optimal prefix-tree construction
//! - code assignment and MSB-first bit packing
//! - container assembly with the serialized tree and a SHA-256 digest
//!
//! Decompression reads the tree back from the container, decodes exactly the
//! recorded number of bits and rejects any output whose digest differs from
//! the stored one.

pub mod bits;
pub mod code_table;
pub mod config;
pub mod container;
pub mod error;
pub mod file;
pub mod frequency;
pub mod integrity;
pub mod stats;
pub mod tree;

pub use crate::config::CodecConfig;
pub use crate::container::{compress, decompress, CompressedContainer, ContainerFormat};
pub use crate::error::CodecError;

use crate::frequency::FrequencyTable;

/// Compression engine applying a [`CodecConfig`] around the container codec.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    /// Create a codec with the given configuration
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Compress `data`, counting large inputs on several threads.
    pub fn compress(&self, data: &[u8]) -> Result<CompressedContainer, CodecError> {
        self.check_size(data.len() as u64)?;

        let freq = if data.len() >= self.config.parallel_threshold {
            FrequencyTable::count_parallel(data, self.config.shard_size)
        } else {
            FrequencyTable::count(data)
        };
        container::compress_counted(data, &freq)
    }

    /// Decompress a container, refusing declared sizes above the limit
    /// before anything is allocated.
    pub fn decompress(&self, container: &CompressedContainer) -> Result<Vec<u8>, CodecError> {
        self.check_size(container.original_len)?;
        container::decompress(container)
    }

    /// Compress straight to the serialized container bytes.
    pub fn compress_to_bytes(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        self.compress(data)?.to_bytes()
    }

    /// Parse serialized container bytes and decompress them.
    pub fn decompress_bytes(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        self.decompress(&CompressedContainer::from_bytes(data)?)
    }

    fn check_size(&self, size: u64) -> Result<(), CodecError> {
        let limit = self.config.max_input_size as u64;
        if size > limit {
            return Err(CodecError::InputTooLarge { size, limit });
        }
        Ok(())
    }
}
