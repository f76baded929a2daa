use std::io::{Read, Write};

use log::debug;

use crate::{
    bit_io::BitReader,
    error::{HuffmanError, Result},
    format,
    tree::Tree,
};

const WRITE_CHUNK: usize = 8 * 1024;

/// Decompression of one compressed stream. [`Decoder::new`] validates the
/// header and rebuilds the tree before anything is written.
#[derive(Debug)]
pub struct Decoder<R: Read> {
    reader: BitReader<R>,
    tree: Tree,
    symbol_count: u32,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Result<Self> {
        let mut reader = BitReader::new(reader);
        let symbol_count = format::read_header(&mut reader)?;
        let tree = format::read_tree(&mut reader)?;
        debug!("huffman tree: {tree}");
        debug!("{symbol_count} symbols to decode");

        Ok(Self {
            reader,
            tree,
            symbol_count,
        })
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn symbol_count(&self) -> u32 {
        self.symbol_count
    }

    /// Writes every decoded symbol and returns the flushed writer.
    pub fn decode<W: Write>(mut self, mut writer: W) -> Result<W> {
        let mut chunk = Vec::with_capacity(WRITE_CHUNK);
        for _ in 0..self.symbol_count {
            chunk.push(self.next_symbol()?);
            if chunk.len() == WRITE_CHUNK {
                writer.write_all(&chunk)?;
                chunk.clear();
            }
        }
        writer.write_all(&chunk)?;

        if self.reader.has_more_bytes() {
            return Err(HuffmanError::TrailingData);
        }
        debug!(
            "decoded {} symbols, {} padding bits left",
            self.symbol_count,
            self.reader.pending_bits()
        );

        writer.flush()?;
        Ok(writer)
    }

    // A lone-leaf tree resolves without reading any bit.
    fn next_symbol(&mut self) -> Result<u8> {
        let mut current = &self.tree;
        loop {
            match current {
                Tree::Leaf { symbol, .. } => return Ok(*symbol),
                Tree::Branch { left, right, .. } => {
                    let next: &Tree = if self.reader.read_bit()? { right } else { left };
                    current = next;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::Decoder;
    use crate::{
        encode::Encoder,
        error::{Category, HuffmanError},
    };

    fn compressed(input: &[u8]) -> Vec<u8> {
        Encoder::new(Cursor::new(input))
            .unwrap()
            .encode(Vec::new())
            .unwrap()
    }

    #[test]
    fn test_decodes_what_was_encoded() {
        let input = b"abracadabra, abracadabra";
        let decoder = Decoder::new(Cursor::new(compressed(input))).unwrap();
        assert_eq!(decoder.symbol_count(), input.len() as u32);
        assert_eq!(decoder.tree().leaves(), 7);

        let output = decoder.decode(Vec::new()).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_padding_is_not_decoded() {
        // a = 0 and b = 1, so every padding bit would read as a symbol
        let input = b"ab";
        let bytes = compressed(input);
        assert_eq!(bytes.len(), 6 + 3);

        let output = Decoder::new(Cursor::new(bytes))
            .unwrap()
            .decode(Vec::new())
            .unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_single_symbol_repeats() {
        let input = vec![b'q'; 1000];
        let bytes = compressed(&input);
        // header and one 9 bit leaf
        assert_eq!(bytes.len(), 6 + 2);

        let output = Decoder::new(Cursor::new(bytes))
            .unwrap()
            .decode(Vec::new())
            .unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_truncated_payload() {
        let input = "the payload is cut in half".repeat(4).into_bytes();
        let mut bytes = compressed(&input);
        bytes.truncate(bytes.len() - 10);

        let result = Decoder::new(Cursor::new(bytes))
            .unwrap()
            .decode(Vec::new());
        assert!(matches!(result, Err(HuffmanError::UnexpectedEof)));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = compressed(b"aabbbcccc");
        bytes.push(0);

        let err = Decoder::new(Cursor::new(bytes))
            .unwrap()
            .decode(Vec::new())
            .unwrap_err();
        assert!(matches!(err, HuffmanError::TrailingData));
        assert_eq!(err.category(), Category::Format);
    }

    #[test]
    fn test_corrupt_header() {
        let mut bytes = compressed(b"aabbbcccc");
        bytes[1] = b'G';

        let err = Decoder::new(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, HuffmanError::CorruptHeader(_)));
        assert_eq!(err.category(), Category::Format);
    }
}
