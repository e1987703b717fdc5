//! Configuration for huffpack

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Largest input (in bytes) accepted by compress, and the largest
    /// declared original length accepted by decompress.
    pub max_input_size: usize,
    /// Inputs at least this large are counted on several threads.
    pub parallel_threshold: usize,
    /// Minimum number of bytes handed to each counting thread.
    pub shard_size: usize,
    pub compressed_extension: String,
    pub decompressed_extension: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_input_size: 100 * 1024 * 1024, // 100 MB
            parallel_threshold: 4 * 1024 * 1024,
            shard_size: 1024 * 1024,
            compressed_extension: "huffman".to_string(),
            decompressed_extension: "decompressed".to_string(),
        }
    }
}

impl CodecConfig {
    /// Load a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn from_json_file(path: &Path) -> Result<Self, CodecError> {
        let text = std::fs::read_to_string(path)?;
        let config: CodecConfig = serde_json::from_str(&text)
            .map_err(|e| CodecError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CodecError> {
        if self.shard_size == 0 {
            return Err(CodecError::Config("shard_size must be greater than zero".into()));
        }
        for (name, ext) in [
            ("compressed_extension", &self.compressed_extension),
            ("decompressed_extension", &self.decompressed_extension),
        ] {
            if ext.is_empty() || ext.contains(['.', '/', '\\']) {
                return Err(CodecError::Config(format!(
                    "{name} must be a bare, non-empty extension, got {ext:?}"
                )));
            }
        }
        if self.compressed_extension == self.decompressed_extension {
            return Err(CodecError::Config(
                "compressed and decompressed extensions must differ".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        assert!(CodecConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_input_size": 1024, "compressed_extension": "hp" }}"#).unwrap();
        let config = CodecConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.max_input_size, 1024);
        assert_eq!(config.compressed_extension, "hp");
        assert_eq!(config.shard_size, CodecConfig::default().shard_size);
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = CodecConfig {
            shard_size: 0,
            ..CodecConfig::default()
        };
        assert!(matches!(config.validate(), Err(CodecError::Config(_))));

        let config = CodecConfig {
            compressed_extension: "tar.gz".into(),
            ..CodecConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = CodecConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, CodecError::Config(_)));
    }
}
