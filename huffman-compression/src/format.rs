//! Layout of a compressed file:
//!
//! ```text
//! 'H' 'F'                      magic
//! u32 big-endian               number of encoded symbols
//! preorder tree, bit packed    leaf: 0 + 8 symbol bits, branch: 1 + left + right
//! payload                      one code per input symbol, in input order
//! 0-7 zero bits                padding up to a byte boundary
//! ```
//!
//! The symbol count tells the decoder where the payload ends, so padding
//! bits are never taken for symbols.

use std::io::{Read, Write};

use crate::{
    bit_io::{BitReader, BitWriter},
    error::{HuffmanError, Result},
    frequency::MAX_SYMBOLS,
    tree::Tree,
};

pub const MAGIC: [u8; 2] = *b"HF";

/// Magic plus symbol count.
pub const FRAMING_BITS: u64 = (MAGIC.len() as u64 + 4) * 8;

/// Flag bit plus the symbol byte.
pub const LEAF_BITS: u64 = 9;

/// 256 leaves can not nest deeper than this in a strict binary tree.
pub const MAX_TREE_DEPTH: usize = MAX_SYMBOLS - 1;

pub fn write_header<W: Write>(writer: &mut BitWriter<W>, symbol_count: u32) -> Result<()> {
    for byte in MAGIC.iter().chain(symbol_count.to_be_bytes().iter()) {
        writer.write_byte(*byte)?;
    }
    Ok(())
}

/// Checks the magic and returns the symbol count.
pub fn read_header<R: Read>(reader: &mut BitReader<R>) -> Result<u32> {
    let mut magic = Vec::with_capacity(MAGIC.len());
    for _ in 0..MAGIC.len() {
        match reader.read_byte() {
            Ok(byte) => magic.push(byte),
            Err(HuffmanError::UnexpectedEof) => return Err(HuffmanError::CorruptHeader(magic)),
            Err(err) => return Err(err),
        }
    }
    if magic != MAGIC {
        return Err(HuffmanError::CorruptHeader(magic));
    }

    let mut count = [0; 4];
    for byte in count.iter_mut() {
        *byte = reader.read_byte()?;
    }
    Ok(u32::from_be_bytes(count))
}

pub fn write_tree<W: Write>(writer: &mut BitWriter<W>, tree: &Tree) -> Result<()> {
    match tree {
        Tree::Leaf { symbol, .. } => {
            writer.write_bit(false)?;
            writer.write_byte(*symbol)?;
        }
        Tree::Branch { left, right, .. } => {
            writer.write_bit(true)?;
            write_tree(writer, left)?;
            write_tree(writer, right)?;
        }
    }
    Ok(())
}

/// Rebuilds a tree written by [`write_tree`]. Leaf counts are not stored,
/// so every rebuilt leaf has a count of zero.
pub fn read_tree<R: Read>(reader: &mut BitReader<R>) -> Result<Tree> {
    read_subtree(reader, 0)
}

fn read_subtree<R: Read>(reader: &mut BitReader<R>, depth: usize) -> Result<Tree> {
    if reader.read_bit()? {
        if depth == MAX_TREE_DEPTH {
            return Err(HuffmanError::MalformedTree(MAX_TREE_DEPTH));
        }
        let left = read_subtree(reader, depth + 1)?;
        let right = read_subtree(reader, depth + 1)?;
        Ok(Tree::join(left, right))
    } else {
        let symbol = reader.read_byte()?;
        Ok(Tree::Leaf { symbol, count: 0 })
    }
}
