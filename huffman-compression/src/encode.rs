use std::io::{Read, Seek, Write};

use log::{debug, info};

use crate::{
    bit_io::BitWriter,
    code_table::CodeTable,
    error::{HuffmanError, Result},
    format,
    frequency::{for_each_chunk, FrequencyTable},
    tree::Tree,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct CompressOptions {
    /// Write the output even when it is not smaller than the input.
    pub force: bool,
}

/// Compression of one input, split in two passes over it: [`Encoder::new`]
/// counts symbols and derives the codes, [`Encoder::encode`] rewinds the
/// input and writes the compressed file.
#[derive(Debug)]
pub struct Encoder<R> {
    reader: R,
    frequencies: FrequencyTable,
    tree: Tree,
    codes: CodeTable,
    symbol_count: u32,
}

impl<R: Read + Seek> Encoder<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let frequencies = FrequencyTable::from_reader(&mut reader)?;
        let symbol_count = u32::try_from(frequencies.total())
            .map_err(|_| HuffmanError::InputTooLarge(frequencies.total()))?;
        debug!("frequency of each symbol in the input:\n{frequencies}");

        let tree = Tree::new(frequencies.present()).ok_or(HuffmanError::EmptyInput)?;
        debug!("huffman tree: {tree}");

        let codes = CodeTable::from_tree(&tree);
        debug!("huffman code of each symbol:\n{codes}");

        let encoder = Self {
            reader,
            frequencies,
            tree,
            codes,
            symbol_count,
        };
        debug!(
            "uncompressed size is {} bits, compressed size is {} bits",
            encoder.original_bits(),
            encoder.compressed_bits()
        );
        Ok(encoder)
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    pub fn original_bits(&self) -> u64 {
        self.frequencies.uncompressed_bits()
    }

    /// Exact size of the file [`Encoder::encode`] writes, in bits.
    pub fn compressed_bits(&self) -> u64 {
        self.codes.compressed_bits(&self.frequencies)
    }

    /// Fails unless compressing shrinks the input or `force` is set.
    pub fn ensure_compressible(&self, force: bool) -> Result<()> {
        let original_bits = self.original_bits();
        let compressed_bits = self.compressed_bits();
        if compressed_bits < original_bits {
            return Ok(());
        }
        if force {
            info!("compressed size {compressed_bits} is not below {original_bits}, forced anyway");
            return Ok(());
        }
        Err(HuffmanError::NotCompressible {
            original_bits,
            compressed_bits,
        })
    }

    /// Writes the compressed file and returns the flushed writer.
    pub fn encode<W: Write>(mut self, writer: W) -> Result<W> {
        let mut writer = BitWriter::new(writer);
        format::write_header(&mut writer, self.symbol_count)?;
        format::write_tree(&mut writer, &self.tree)?;

        self.reader.rewind()?;
        let codes = &self.codes;
        let encoded = for_each_chunk(&mut self.reader, |chunk| {
            for &symbol in chunk {
                writer.write_bits(codes.code(symbol))?;
            }
            Ok(())
        })?;
        if encoded != u64::from(self.symbol_count) {
            return Err(HuffmanError::InputChanged {
                first: u64::from(self.symbol_count),
                second: encoded,
            });
        }

        debug!("wrote {} bits before padding", writer.bits_written());
        Ok(writer.finish()?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Read, Seek, SeekFrom};

    use super::{CompressOptions, Encoder};
    use crate::error::{Category, HuffmanError};

    // Gains one byte every time it is rewound, like a file being appended to.
    #[derive(Debug)]
    struct Growing(Cursor<Vec<u8>>);

    impl Read for Growing {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.0.read(buf)
        }
    }

    impl Seek for Growing {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.0.get_mut().push(b'!');
            self.0.seek(pos)
        }
    }

    #[test]
    fn test_file_size_matches_estimate() {
        let input = "she sells sea shells by the sea shore ".repeat(8).into_bytes();
        let encoder = Encoder::new(Cursor::new(&input)).unwrap();
        let estimate = encoder.compressed_bits();
        encoder.ensure_compressible(false).unwrap();

        let output = encoder.encode(Vec::new()).unwrap();
        assert_eq!(output.len() as u64 * 8, estimate);
        assert_eq!(&output[..2], b"HF");
        assert_eq!(&output[2..6], &(input.len() as u32).to_be_bytes());
    }

    #[test]
    fn test_small_input_is_not_compressible() {
        let encoder = Encoder::new(Cursor::new(b"aabbcc")).unwrap();
        assert_eq!(encoder.original_bits(), 48);
        assert_eq!(encoder.compressed_bits(), 88);

        let err = encoder.ensure_compressible(false).unwrap_err();
        assert_eq!(err.category(), Category::Policy);
        assert!(matches!(
            err,
            HuffmanError::NotCompressible {
                original_bits: 48,
                compressed_bits: 88
            }
        ));
        assert!(encoder.ensure_compressible(true).is_ok());
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let result = Encoder::new(Cursor::new(Vec::<u8>::new()));
        assert!(matches!(result, Err(HuffmanError::EmptyInput)));
    }

    #[test]
    fn test_payload_bits_follow_the_codes() {
        // c = 0, a = 10, b = 11
        let encoder = Encoder::new(Cursor::new(b"abcabc")).unwrap();
        let output = encoder.encode(Vec::new()).unwrap();

        // header, 29 tree bits, then 10 11 0 10 11 0 and 1 padding bit
        assert_eq!(output.len(), 6 + 5);
        assert_eq!(output[9], 0b0001_0101);
        assert_eq!(output[10], 0b1010_1100);
    }

    #[test]
    fn test_default_options_do_not_force() {
        assert!(!CompressOptions::default().force);
    }

    #[test]
    fn test_input_changed_between_passes() {
        let input = "grows while we look away ".repeat(4).into_bytes();
        let encoder = Encoder::new(Growing(Cursor::new(input.clone()))).unwrap();

        let err = encoder.encode(Vec::new()).unwrap_err();
        assert_eq!(err.category(), Category::Input);
        let expected = input.len() as u64;
        match err {
            HuffmanError::InputChanged { first, second } => {
                assert_eq!(first, expected);
                assert_eq!(second, expected + 1);
            }
            other => panic!("expected a changed input, got {other:?}"),
        }
    }
}
