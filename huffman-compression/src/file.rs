use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::Path,
};

use log::{info, warn};

use crate::{
    decode::Decoder,
    encode::{CompressOptions, Encoder},
    error::{HuffmanError, Result},
};

const LONE_LEAF_WARN_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub read_bytes: u64,
    pub written_bytes: u64,
}

/// Compresses `input_file` into `output_file`. The output is created only
/// once the size check has passed.
pub fn compress_file(
    input_file: impl AsRef<Path>,
    output_file: impl AsRef<Path>,
    options: CompressOptions,
) -> Result<Summary> {
    let input_file = input_file.as_ref();
    let output_file = output_file.as_ref();

    let encoder = Encoder::new(BufReader::new(File::open(input_file)?))?;
    encoder.ensure_compressible(options.force)?;

    let summary = Summary {
        read_bytes: encoder.frequencies().total(),
        written_bytes: encoder.compressed_bits() / 8,
    };

    let writer = BufWriter::new(File::create(output_file)?);
    discard_on_error(output_file, encoder.encode(writer))?;

    info!(
        "compressed {} into {}: {} -> {} bytes",
        input_file.display(),
        output_file.display(),
        summary.read_bytes,
        summary.written_bytes
    );
    Ok(summary)
}

/// Uncompresses `input_file` into `output_file`. The output is created only
/// once the header and the tree have been read back.
pub fn uncompress_file(
    input_file: impl AsRef<Path>,
    output_file: impl AsRef<Path>,
) -> Result<Summary> {
    let input_file = input_file.as_ref();
    let output_file = output_file.as_ref();

    let read_bytes = fs::metadata(input_file)?.len();
    let decoder = Decoder::new(BufReader::new(File::open(input_file)?))?;
    let summary = Summary {
        read_bytes,
        written_bytes: u64::from(decoder.symbol_count()),
    };

    if decoder.tree().is_leaf() {
        // a lone leaf spends no payload bits, any count is possible
        if summary.written_bytes > LONE_LEAF_WARN_BYTES {
            warn!(
                "{} expands to {} copies of a single byte",
                input_file.display(),
                summary.written_bytes
            );
        }
    } else if summary.written_bytes > read_bytes * 8 {
        // every symbol of a branching tree takes at least one bit
        return Err(HuffmanError::UnexpectedEof);
    }

    let writer = BufWriter::new(File::create(output_file)?);
    discard_on_error(output_file, decoder.decode(writer))?;

    info!(
        "uncompressed {} into {}: {} -> {} bytes",
        input_file.display(),
        output_file.display(),
        summary.read_bytes,
        summary.written_bytes
    );
    Ok(summary)
}

fn discard_on_error<T>(output_file: &Path, result: Result<T>) -> Result<T> {
    if result.is_err() {
        if let Err(err) = fs::remove_file(output_file) {
            warn!(
                "failed to remove partial output {}: {err}",
                output_file.display()
            );
        }
    }
    result
}
