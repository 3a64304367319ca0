//! DEFLATE decoder for dynamic Huffman blocks.
//!
//! Drives the block loop over a raw DEFLATE payload: per block it reads the
//! BFINAL/BTYPE header, reconstructs the two Huffman trees from their
//! compressed length tables, then expands literals and length/distance
//! pairs against the sliding window. Stored (BTYPE=00) and fixed-Huffman
//! (BTYPE=01) blocks are rejected.

use std::io::Write;

use crate::bits::BitReader;
use crate::codelen::{self, CodeLengthDecoder};
use crate::error::{UngzError, UngzResult};
use crate::huffman::HuffmanTree;
use crate::window::Window;

/// LITLEN symbol terminating a block.
const END_OF_BLOCK: u16 = 256;

/// Dynamic Huffman block type (BTYPE bits).
const BLOCK_DYNAMIC: u8 = 2;

/// Extra bits consumed after LITLEN symbol `257 + i`.
pub(crate) const LENGTH_EXTRA_BITS: [u32; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

/// Base match length for LITLEN symbol `257 + i`; code 285 is the lone
/// zero-extra entry at the top, fixed at 258.
pub(crate) const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115,
    131, 163, 195, 227, 258,
];

/// Extra bits consumed after each distance symbol.
pub(crate) const DISTANCE_EXTRA_BITS: [u32; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12,
    13, 13,
];

/// Base distance for each distance symbol; tops out at 24577 + 2^13 - 1 =
/// 32768, the window size.
pub(crate) const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Sequential decoder over one member's DEFLATE payload.
pub struct Inflater<'a> {
    reader: BitReader<'a>,
    window: Window,
    blocks: usize,
}

impl<'a> Inflater<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: BitReader::new(data),
            window: Window::new(),
            blocks: 0,
        }
    }

    /// Decode every block through the final one, streaming output into
    /// `writer`. Returns the total number of decoded bytes.
    pub fn inflate<W: Write>(&mut self, writer: &mut W) -> UngzResult<u64> {
        loop {
            let bfinal = self.reader.read_bits(1)?;
            let btype = self.reader.read_bits(2)? as u8;
            if btype != BLOCK_DYNAMIC {
                return Err(UngzError::UnsupportedBlockType(btype));
            }

            self.dynamic_block(writer)?;
            self.blocks += 1;
            self.window.spill(writer)?;

            if bfinal == 1 {
                break;
            }
        }
        self.window.finish(writer)?;
        Ok(self.window.total_written())
    }

    /// Rebuild the block's trees from their compressed length tables, then
    /// run the symbol loop.
    fn dynamic_block<W: Write>(&mut self, writer: &mut W) -> UngzResult<()> {
        let hlit = self.reader.read_bits(5)? as usize;
        let hdist = self.reader.read_bits(5)? as usize;
        let hclen = self.reader.read_bits(4)? as usize;

        let clen_lengths = codelen::read_clen_lengths(&mut self.reader, hclen)?;
        let clen_tree = HuffmanTree::from_lengths(&clen_lengths)?;

        let mut table_decoder = CodeLengthDecoder::new();
        let litlen_lengths = table_decoder.expand(&mut self.reader, &clen_tree, hlit + 257)?;
        let dist_lengths = table_decoder.expand(&mut self.reader, &clen_tree, hdist + 1)?;

        let litlen_tree = HuffmanTree::from_lengths(&litlen_lengths)?;
        let dist_tree = HuffmanTree::from_lengths(&dist_lengths)?;

        self.decode_symbols(writer, &litlen_tree, &dist_tree)
    }

    /// Literal/match loop until the end-of-block symbol.
    fn decode_symbols<W: Write>(
        &mut self,
        writer: &mut W,
        litlen_tree: &HuffmanTree,
        dist_tree: &HuffmanTree,
    ) -> UngzResult<()> {
        loop {
            let symbol = litlen_tree.decode(&mut self.reader)?;
            match symbol {
                0..=255 => self.window.push(symbol as u8),
                END_OF_BLOCK => return Ok(()),
                257..=285 => {
                    let length = self.read_length(symbol)?;
                    let distance = self.read_distance(dist_tree)?;
                    self.window.copy_match(distance, length)?;
                }
                _ => return Err(UngzError::InvalidSymbol),
            }
            self.window.maybe_spill(writer)?;
        }
    }

    #[inline]
    fn read_length(&mut self, symbol: u16) -> UngzResult<usize> {
        let idx = (symbol - 257) as usize;
        let mut length = LENGTH_BASE[idx] as usize;
        let extra = LENGTH_EXTRA_BITS[idx];
        if extra > 0 {
            length += self.reader.read_bits(extra)? as usize;
        }
        Ok(length)
    }

    #[inline]
    fn read_distance(&mut self, dist_tree: &HuffmanTree) -> UngzResult<usize> {
        let symbol = dist_tree.decode(&mut self.reader)? as usize;
        if symbol >= DISTANCE_BASE.len() {
            return Err(UngzError::InvalidSymbol);
        }
        let mut distance = DISTANCE_BASE[symbol] as usize;
        let extra = DISTANCE_EXTRA_BITS[symbol];
        if extra > 0 {
            distance += self.reader.read_bits(extra)? as usize;
        }
        Ok(distance)
    }

    /// Blocks decoded so far.
    pub fn blocks(&self) -> usize {
        self.blocks
    }
}
