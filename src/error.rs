//! Error types for huffpack

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    /// The packed bitstream does not decode cleanly against its tree.
    #[error("corrupt stream: {0}")]
    CorruptStream(String),

    /// The container header or the serialized tree cannot be parsed.
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    #[error("integrity check failed: expected digest {expected}, got {actual}")]
    Integrity { expected: String, actual: String },

    #[error("input of {size} bytes exceeds the configured limit of {limit} bytes")]
    InputTooLarge { size: u64, limit: u64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        CodecError::CorruptStream(msg.into())
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        CodecError::MalformedContainer(msg.into())
    }
}
