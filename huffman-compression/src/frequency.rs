use std::{
    fmt,
    io::{self, Read},
};

use log::debug;

use crate::error::Result;

pub const MAX_SYMBOLS: usize = 256;
const READ_CHUNK: usize = 8 * 1024;

/// Occurrence count of every byte value in one pass over the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; MAX_SYMBOLS],
    total: u64,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self {
            counts: [0; MAX_SYMBOLS],
            total: 0,
        }
    }
}

impl FrequencyTable {
    /// Consumes `reader` until it is exhausted.
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        let mut table = Self::default();
        for_each_chunk(reader, |chunk| {
            table.extend(chunk.iter().copied());
            Ok(())
        })?;
        debug!("counted {} input symbols", table.total);
        Ok(table)
    }

    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn uncompressed_bits(&self) -> u64 {
        self.total * 8
    }

    /// Symbols with a non-zero count, lowest symbol value first.
    pub fn present(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }

    pub fn distinct(&self) -> usize {
        self.present().count()
    }
}

/// Feeds `reader` to `f` chunk by chunk until it is exhausted and returns
/// the number of bytes read.
pub(crate) fn for_each_chunk<R: Read>(
    reader: &mut R,
    mut f: impl FnMut(&[u8]) -> Result<()>,
) -> Result<u64> {
    let mut buffer = [0; READ_CHUNK];
    let mut total = 0_u64;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => return Ok(total),
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        f(&buffer[..read])?;
        total += read as u64;
    }
}

impl Extend<u8> for FrequencyTable {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        for symbol in iter {
            self.counts[symbol as usize] += 1;
            self.total += 1;
        }
    }
}

impl FromIterator<u8> for FrequencyTable {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        let mut table = Self::default();
        table.extend(iter);
        table
    }
}

impl fmt::Display for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, count) in self.present() {
            writeln!(f, "{symbol} frequency is {count}")?;
        }
        Ok(())
    }
}
