//! Bit packing and tree-driven unpacking of the encoded payload

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::code_table::CodeTable;
use crate::error::CodecError;
use crate::tree::{HuffmanNode, HuffmanTree};

/// Byte-padded bitstream plus the number of meaningful bits in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBits {
    pub bytes: Vec<u8>,
    pub bit_count: u64,
}

/// Concatenate the code of every byte of `data`, MSB first, and zero-pad the
/// result to a whole byte.
pub fn pack(data: &[u8], table: &CodeTable) -> Result<PackedBits, CodecError> {
    let mut writer = BitWriter::endian(Vec::new(), BigEndian);
    let mut bit_count = 0u64;
    for &b in data {
        let code = table
            .get(b)
            .ok_or_else(|| CodecError::corrupt(format!("no code for byte {b:#04x}")))?;
        for &bit in code {
            writer.write_bit(bit)?;
        }
        bit_count += code.len() as u64;
    }
    writer.byte_align()?;
    Ok(PackedBits {
        bytes: writer.into_writer(),
        bit_count,
    })
}

/// Decode exactly `bit_count` bits of `payload` against `tree`, expecting
/// `original_len` symbols.
pub fn unpack(
    payload: &[u8],
    bit_count: u64,
    tree: &HuffmanTree,
    original_len: u64,
) -> Result<Vec<u8>, CodecError> {
    let capacity = payload.len() as u64 * 8;
    if bit_count > capacity || capacity - bit_count >= 8 {
        return Err(CodecError::corrupt(format!(
            "bit count {bit_count} does not fit a payload of {} bytes",
            payload.len()
        )));
    }
    // Every symbol costs at least one bit.
    if original_len > bit_count {
        return Err(CodecError::corrupt(format!(
            "{original_len} symbols cannot fit in {bit_count} bits"
        )));
    }

    let mut reader = BitReader::endian(payload, BigEndian);
    let output = match tree.single_symbol() {
        Some(symbol) => unpack_single(&mut reader, symbol, bit_count, original_len)?,
        None => unpack_tree(&mut reader, tree, bit_count, original_len)?,
    };

    while !reader.byte_aligned() {
        if reader.read_bit()? {
            return Err(CodecError::corrupt("non-zero padding bits"));
        }
    }
    Ok(output)
}

/// A lone symbol is coded as one `0` bit per occurrence.
fn unpack_single(
    reader: &mut BitReader<&[u8], BigEndian>,
    symbol: u8,
    bit_count: u64,
    original_len: u64,
) -> Result<Vec<u8>, CodecError> {
    if bit_count != original_len {
        return Err(CodecError::corrupt(format!(
            "single-symbol stream of {original_len} bytes must carry {original_len} bits, found {bit_count}"
        )));
    }
    for _ in 0..bit_count {
        if reader.read_bit()? {
            return Err(CodecError::corrupt("unexpected 1 bit in single-symbol stream"));
        }
    }
    Ok(vec![symbol; original_len as usize])
}

fn unpack_tree(
    reader: &mut BitReader<&[u8], BigEndian>,
    tree: &HuffmanTree,
    bit_count: u64,
    original_len: u64,
) -> Result<Vec<u8>, CodecError> {
    let mut output = Vec::with_capacity(original_len as usize);
    let root = tree.root();
    let mut node = root;
    for _ in 0..bit_count {
        let bit = reader.read_bit()?;
        node = match *tree.node(node) {
            HuffmanNode::Branch { left, right, .. } => {
                if bit {
                    right
                } else {
                    left
                }
            }
            HuffmanNode::Leaf { .. } => return Err(CodecError::corrupt("descent passed a leaf")),
        };
        if let HuffmanNode::Leaf { symbol, .. } = *tree.node(node) {
            if output.len() as u64 == original_len {
                return Err(CodecError::corrupt(format!(
                    "stream decodes to more than {original_len} symbols"
                )));
            }
            output.push(symbol);
            node = root;
        }
    }

    if node != root {
        return Err(CodecError::corrupt("bitstream ended in the middle of a code"));
    }
    if output.len() as u64 != original_len {
        return Err(CodecError::corrupt(format!(
            "decoded {} symbols, expected {original_len}",
            output.len()
        )));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;

    fn encode(data: &[u8]) -> (PackedBits, HuffmanTree) {
        let tree = HuffmanTree::build(&FrequencyTable::count(data)).unwrap();
        let packed = pack(data, &CodeTable::from_tree(&tree)).unwrap();
        (packed, tree)
    }

    #[test]
    fn test_pack_known_bits() {
        // a=0 c=10 b=11
        let (packed, _) = encode(b"aaaabbbcc");
        assert_eq!(packed.bit_count, 14);
        // 0000 111111 1010 + 00
        assert_eq!(packed.bytes, vec![0b0000_1111, 0b1110_1000]);
    }

    #[test]
    fn test_unpack_recovers_input() {
        let data = b"hello world hello world hello";
        let (packed, tree) = encode(data);
        let decoded = unpack(&packed.bytes, packed.bit_count, &tree, data.len() as u64).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_single_symbol() {
        let (packed, tree) = encode(b"zzzzzz");
        assert_eq!(packed.bit_count, 6);
        assert_eq!(packed.bytes, vec![0]);
        assert_eq!(unpack(&packed.bytes, packed.bit_count, &tree, 6).unwrap(), b"zzzzzz");

        assert!(matches!(
            unpack(&[0b0010_0000], 6, &tree, 6),
            Err(CodecError::CorruptStream(_))
        ));
    }

    #[test]
    fn test_truncated_stream() {
        let (mut packed, tree) = encode(b"aaaabbbcc");
        // drop the last bit of the final "10" code
        packed.bit_count -= 1;
        assert!(matches!(
            unpack(&packed.bytes, packed.bit_count, &tree, 9),
            Err(CodecError::CorruptStream(_))
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let (packed, tree) = encode(b"aaaabbbcc");
        assert!(unpack(&packed.bytes, packed.bit_count, &tree, 8).is_err());
        assert!(unpack(&packed.bytes, packed.bit_count, &tree, 10).is_err());
    }

    #[test]
    fn test_bad_bit_count() {
        let (mut packed, tree) = encode(b"aaaabbbcc");
        packed.bit_count = 17;
        assert!(unpack(&packed.bytes, packed.bit_count, &tree, 9).is_err());
        packed.bit_count = 14;
        packed.bytes.push(0);
        assert!(unpack(&packed.bytes, packed.bit_count, &tree, 9).is_err());
    }

    #[test]
    fn test_nonzero_padding() {
        let (mut packed, tree) = encode(b"aaaabbbcc");
        packed.bytes[1] |= 0b0000_0001;
        assert!(matches!(
            unpack(&packed.bytes, packed.bit_count, &tree, 9),
            Err(CodecError::CorruptStream(_))
        ));
    }

    #[test]
    fn test_empty_stream() {
        let (_, tree) = encode(b"ab");
        assert_eq!(unpack(&[], 0, &tree, 0).unwrap(), Vec::<u8>::new());
    }
}
