//! Static Huffman compression of byte streams.
//!
//! A compressed file holds the magic `HF`, the number of encoded symbols,
//! the code tree in preorder and the encoded symbols, see [`format`].

use std::io::Cursor;

pub mod bit_io;
pub mod code_table;
pub mod decode;
pub mod encode;
pub mod error;
pub mod file;
pub mod format;
pub mod frequency;
pub mod merge_list;
pub mod tree;

pub use decode::Decoder;
pub use encode::{CompressOptions, Encoder};
pub use error::{HuffmanError, Result};
pub use file::{compress_file, uncompress_file};

pub fn compress(input: &[u8], options: CompressOptions) -> Result<Vec<u8>> {
    let encoder = Encoder::new(Cursor::new(input))?;
    encoder.ensure_compressible(options.force)?;
    encoder.encode(Vec::new())
}

pub fn uncompress(input: &[u8]) -> Result<Vec<u8>> {
    Decoder::new(Cursor::new(input))?.decode(Vec::new())
}
