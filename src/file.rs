//! File-level compress and decompress, with default output naming

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CodecError;
use crate::frequency::FrequencyTable;
use crate::stats::{self, CompressionStats};
use crate::{Codec, CompressedContainer};

/// Outcome of a file operation, for the caller to report.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub stats: CompressionStats,
    /// Entropy of the uncompressed bytes in bits per byte.
    pub entropy: f64,
}

/// `notes.txt` becomes `notes.txt.huffman`.
pub fn default_compressed_path(input: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// `notes.txt.huffman` becomes `notes.txt.decompressed`; any other name gets
/// `.decompressed` appended.
pub fn default_decompressed_path(
    input: &Path,
    compressed_extension: &str,
    decompressed_extension: &str,
) -> PathBuf {
    if input.extension().is_some_and(|ext| ext == compressed_extension) {
        input.with_extension(decompressed_extension)
    } else {
        default_compressed_path(input, decompressed_extension)
    }
}

pub fn compress_file(
    input: &Path,
    output: Option<&Path>,
    codec: &Codec,
) -> Result<FileReport, CodecError> {
    let data = fs::read(input)?;
    let container = codec.compress(&data)?;
    let bytes = container.to_bytes()?;

    let output = output.map_or_else(
        || default_compressed_path(input, &codec.config().compressed_extension),
        Path::to_path_buf,
    );
    fs::write(&output, &bytes)?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        original = data.len(),
        compressed = bytes.len(),
        "compressed file"
    );

    Ok(FileReport {
        input: input.to_path_buf(),
        output,
        stats: CompressionStats::new(data.len(), container.payload_len(), bytes.len()),
        entropy: stats::entropy(&FrequencyTable::count(&data)),
    })
}

pub fn decompress_file(
    input: &Path,
    output: Option<&Path>,
    codec: &Codec,
) -> Result<FileReport, CodecError> {
    let bytes = fs::read(input)?;
    let container = CompressedContainer::from_bytes(&bytes)?;
    let data = codec.decompress(&container)?;

    let config = codec.config();
    let output = output.map_or_else(
        || {
            default_decompressed_path(
                input,
                &config.compressed_extension,
                &config.decompressed_extension,
            )
        },
        Path::to_path_buf,
    );
    fs::write(&output, &data)?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        restored = data.len(),
        "decompressed file, integrity verified"
    );

    Ok(FileReport {
        input: input.to_path_buf(),
        output,
        stats: CompressionStats::new(data.len(), container.payload_len(), bytes.len()),
        entropy: stats::entropy(&FrequencyTable::count(&data)),
    })
}
