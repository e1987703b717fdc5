//! Compression statistics for reporting

use crate::code_table::CodeTable;
use crate::frequency::FrequencyTable;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionStats {
    pub original_size: usize,
    /// Packed payload bytes, excluding the container header and tree.
    pub payload_size: usize,
    /// Full serialized container.
    pub container_size: usize,
}

impl CompressionStats {
    pub fn new(original_size: usize, payload_size: usize, container_size: usize) -> Self {
        Self {
            original_size,
            payload_size,
            container_size,
        }
    }

    /// Packed size over original size. 1.0 for an empty input.
    pub fn ratio(&self) -> f64 {
        if self.original_size == 0 {
            1.0
        } else {
            self.payload_size as f64 / self.original_size as f64
        }
    }

    /// Container size over original size, header and tree included.
    pub fn overall_ratio(&self) -> f64 {
        if self.original_size == 0 {
            1.0
        } else {
            self.container_size as f64 / self.original_size as f64
        }
    }

    /// Fraction of the original size saved by the payload.
    pub fn space_saving(&self) -> f64 {
        1.0 - self.ratio()
    }
}

/// Shannon entropy of the byte distribution, in bits per byte.
pub fn entropy(freq: &FrequencyTable) -> f64 {
    let total = freq.total();
    if total == 0 {
        return 0.0;
    }
    let len = total as f64;
    let mut entropy = 0.0;
    for (_, f) in freq.iter() {
        let p = f as f64 / len;
        entropy -= p * p.log2();
    }
    entropy
}

/// Average code length in bits per input byte.
pub fn mean_code_length(table: &CodeTable, freq: &FrequencyTable) -> f64 {
    let total = freq.total();
    if total == 0 {
        return 0.0;
    }
    table.weighted_length(freq) as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::HuffmanTree;

    #[test]
    fn test_entropy_computation() {
        let uniform = FrequencyTable::count(&[42u8; 100]);
        assert!(entropy(&uniform) < 0.01, "single symbol data should have ~0 entropy");

        let spread: Vec<u8> = (0..=255u8).collect();
        let e = entropy(&FrequencyTable::count(&spread));
        assert!((e - 8.0).abs() < 1e-9);

        assert_eq!(entropy(&FrequencyTable::count(b"")), 0.0);
    }

    #[test]
    fn test_mean_code_length_bounds() {
        let data = b"this is an example of a huffman tree";
        let freq = FrequencyTable::count(data);
        let table = CodeTable::from_tree(&HuffmanTree::build(&freq).unwrap());
        let h = entropy(&freq);
        let l = mean_code_length(&table, &freq);
        assert!(l >= h - 1e-9 && l < h + 1.0, "h={h} l={l}");
    }

    #[test]
    fn test_ratios() {
        let stats = CompressionStats::new(200, 50, 120);
        assert!((stats.ratio() - 0.25).abs() < 1e-12);
        assert!((stats.space_saving() - 0.75).abs() < 1e-12);
        assert!((stats.overall_ratio() - 0.6).abs() < 1e-12);

        let empty = CompressionStats::new(0, 0, 53);
        assert_eq!(empty.ratio(), 1.0);
        assert_eq!(empty.overall_ratio(), 1.0);
    }
}
