//! Code-length alphabet handling for dynamic Huffman blocks.
//!
//! Each dynamic block transmits its LITLEN and DIST code-length tables
//! compressed with a third alphabet of 19 symbols (CLEN), whose own 3-bit
//! lengths arrive first in a fixed scrambled order. Symbols 16..18 are
//! run-length directives.

use crate::bits::BitReader;
use crate::error::{UngzError, UngzResult};
use crate::huffman::HuffmanTree;

/// Stream order of the CLEN code lengths (RFC 1951, 3.2.7).
pub const CLEN_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Read the `HCLEN + 4` three-bit CLEN lengths and scatter them through the
/// fixed permutation. Entries beyond `HCLEN + 4` stay zero.
pub fn read_clen_lengths(reader: &mut BitReader, hclen: usize) -> UngzResult<[u8; 19]> {
    let mut lengths = [0u8; 19];
    for &idx in CLEN_ORDER.iter().take(hclen + 4) {
        lengths[idx] = reader.read_bits(3)? as u8;
    }
    Ok(lengths)
}

/// Expands the RLE-coded code-length stream into length vectors.
///
/// One instance serves both tables of a block: the repeat state survives
/// between calls, so a code 16 at the start of the DIST table legally
/// repeats the last LITLEN length.
pub struct CodeLengthDecoder {
    prev: Option<u8>,
}

impl CodeLengthDecoder {
    pub fn new() -> Self {
        Self { prev: None }
    }

    /// Decode CLEN symbols until exactly `count` lengths have accumulated.
    ///
    /// Symbol semantics: 0..15 emit that length and become the new repeat
    /// value; 16 repeats it 3..6 times (2 extra bits); 17 emits 3..10 zeros
    /// (3 extra bits); 18 emits 11..138 zeros (7 extra bits). A run that
    /// would push past `count` is a stream error, as is a repeat before any
    /// length was seen.
    pub fn expand(
        &mut self,
        reader: &mut BitReader,
        clen_tree: &HuffmanTree,
        count: usize,
    ) -> UngzResult<Vec<u8>> {
        let mut lengths = Vec::with_capacity(count);
        while lengths.len() < count {
            let symbol = clen_tree.decode(reader)?;
            let (value, run) = match symbol {
                0..=15 => {
                    let len = symbol as u8;
                    self.prev = Some(len);
                    (len, 1)
                }
                16 => {
                    let prev = self.prev.ok_or(UngzError::MalformedLengthTable(
                        "repeat directive before any length",
                    ))?;
                    (prev, 3 + reader.read_bits(2)? as usize)
                }
                17 => (0, 3 + reader.read_bits(3)? as usize),
                18 => (0, 11 + reader.read_bits(7)? as usize),
                _ => return Err(UngzError::InvalidSymbol),
            };
            if lengths.len() + run > count {
                return Err(UngzError::MalformedLengthTable(
                    "run overflows the announced table size",
                ));
            }
            lengths.resize(lengths.len() + run, value);
        }
        Ok(lengths)
    }
}

impl Default for CodeLengthDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::BitWriter;

    /// CLEN table with one-bit codes for symbols `a` (code 0) and `b`
    /// (code 1).
    fn two_symbol_tree(a: usize, b: usize) -> HuffmanTree {
        let mut lengths = [0u8; 19];
        lengths[a] = 1;
        lengths[b] = 1;
        HuffmanTree::from_lengths(&lengths).unwrap()
    }

    #[test]
    fn clen_permutation_scatter() {
        // Ten entries: the written slots follow the scrambled order, the
        // remaining nine stay zero.
        let mut writer = BitWriter::new();
        for v in [1u32, 2, 3, 4, 5, 6, 7, 0, 1, 2] {
            writer.write_bits(v, 3);
        }
        let data = writer.finish();
        let mut reader = BitReader::new(&data);

        let lengths = read_clen_lengths(&mut reader, 6).unwrap();
        let mut expected = [0u8; 19];
        for (i, v) in [1u8, 2, 3, 4, 5, 6, 7, 0, 1, 2].into_iter().enumerate() {
            expected[CLEN_ORDER[i]] = v;
        }
        assert_eq!(lengths, expected);
    }

    #[test]
    fn zero_run_directives() {
        // Symbol 18 with 7 extra bits all ones emits the maximum run of 138
        // zeros; symbol 17 with 0 extra emits 3.
        let tree = two_symbol_tree(17, 18);
        let mut writer = BitWriter::new();
        writer.write_code(1, 1); // 18
        writer.write_bits(0b111_1111, 7);
        writer.write_code(0, 1); // 17
        writer.write_bits(0, 3);
        let data = writer.finish();
        let mut reader = BitReader::new(&data);

        let mut decoder = CodeLengthDecoder::new();
        let lengths = decoder.expand(&mut reader, &tree, 141).unwrap();
        assert_eq!(lengths.len(), 141);
        assert!(lengths.iter().all(|&l| l == 0));
    }

    #[test]
    fn repeat_copies_previous_length() {
        let tree = two_symbol_tree(9, 16);
        let mut writer = BitWriter::new();
        writer.write_code(0, 1); // literal length 9
        writer.write_code(1, 1); // 16
        writer.write_bits(0b11, 2); // 3 + 3 copies
        let data = writer.finish();
        let mut reader = BitReader::new(&data);

        let mut decoder = CodeLengthDecoder::new();
        let lengths = decoder.expand(&mut reader, &tree, 7).unwrap();
        assert_eq!(lengths, vec![9u8; 7]);
    }

    #[test]
    fn repeat_state_survives_between_tables() {
        let tree = two_symbol_tree(9, 16);
        let mut writer = BitWriter::new();
        writer.write_code(0, 1); // length 9 ends the first table
        writer.write_code(1, 1); // 16 opens the second table
        writer.write_bits(0, 2); // 3 copies
        let data = writer.finish();
        let mut reader = BitReader::new(&data);

        let mut decoder = CodeLengthDecoder::new();
        assert_eq!(decoder.expand(&mut reader, &tree, 1).unwrap(), vec![9]);
        assert_eq!(decoder.expand(&mut reader, &tree, 3).unwrap(), vec![9; 3]);
    }

    #[test]
    fn repeat_without_previous_length() {
        let tree = two_symbol_tree(0, 16);
        let mut writer = BitWriter::new();
        writer.write_code(1, 1); // 16 with nothing before it
        writer.write_bits(0, 2);
        let data = writer.finish();
        let mut reader = BitReader::new(&data);

        let mut decoder = CodeLengthDecoder::new();
        assert!(matches!(
            decoder.expand(&mut reader, &tree, 4),
            Err(UngzError::MalformedLengthTable(_))
        ));
    }

    #[test]
    fn run_overflowing_table_size() {
        let tree = two_symbol_tree(0, 18);
        let mut writer = BitWriter::new();
        writer.write_code(1, 1); // 18
        writer.write_bits(0, 7); // 11 zeros into a 5-entry table
        let data = writer.finish();
        let mut reader = BitReader::new(&data);

        let mut decoder = CodeLengthDecoder::new();
        assert!(matches!(
            decoder.expand(&mut reader, &tree, 5),
            Err(UngzError::MalformedLengthTable(_))
        ));
    }
}
