use std::{
    io::{self, Read, Write},
    iter::Peekable,
};

use bitvec::prelude::*;

use crate::error::{HuffmanError, Result};

/// Bits packed most-significant first, the order codes are written in.
pub type Bits = BitVec<u8, Msb0>;
pub type BitStr = BitSlice<u8, Msb0>;

// whole bytes are handed to the writer once this many bits are pending
const FLUSH_BITS: usize = 8 * 8 * 1024;

/// Packs bits into bytes. Whatever is left of the last byte is zero-filled
/// by [`BitWriter::finish`].
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: W,
    pending: Bits,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            pending: Bits::with_capacity(FLUSH_BITS + 64),
            bits_written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.pending.push(bit);
        self.bits_written += 1;
        self.flush_whole_bytes()
    }

    pub fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.write_bits(byte.view_bits::<Msb0>())
    }

    pub fn write_bits(&mut self, bits: &BitStr) -> io::Result<()> {
        self.pending.extend_from_bitslice(bits);
        self.bits_written += bits.len() as u64;
        self.flush_whole_bytes()
    }

    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Pads the pending byte with zeros, flushes and hands the writer back.
    pub fn finish(mut self) -> io::Result<W> {
        let padded = self.pending.len().div_ceil(8) * 8;
        self.pending.resize(padded, false);
        self.inner.write_all(self.pending.as_raw_slice())?;
        self.pending.clear();
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn flush_whole_bytes(&mut self) -> io::Result<()> {
        if self.pending.len() < FLUSH_BITS {
            return Ok(());
        }
        let whole_bytes = self.pending.len() / 8;
        self.inner
            .write_all(&self.pending.as_raw_slice()[..whole_bytes])?;
        let rest = self.pending[whole_bytes * 8..].to_bitvec();
        self.pending.clear();
        self.pending.extend_from_bitslice(&rest);
        Ok(())
    }
}

/// Reads bits most-significant first. The end of the stream is known from
/// the underlying byte count, so the reader looks one byte ahead.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    bytes: Peekable<io::Bytes<R>>,
    current: u8,
    remaining: u8,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            bytes: inner.bytes().peekable(),
            current: 0,
            remaining: 0,
        }
    }

    pub fn read_bit(&mut self) -> Result<bool> {
        if self.remaining == 0 {
            self.current = self.next_byte()?;
            self.remaining = 8;
        }
        let bit = self.current.view_bits::<Msb0>()[usize::from(8 - self.remaining)];
        self.remaining -= 1;
        Ok(bit)
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        if self.remaining == 0 {
            return self.next_byte();
        }
        let mut byte = 0_u8;
        let bits = byte.view_bits_mut::<Msb0>();
        for index in 0..8 {
            bits.set(index, self.read_bit()?);
        }
        Ok(byte)
    }

    /// True once every bit of every byte has been consumed.
    pub fn is_eof(&mut self) -> bool {
        self.remaining == 0 && self.bytes.peek().is_none()
    }

    /// Bits of the current byte that have not been read yet.
    pub fn pending_bits(&self) -> u8 {
        self.remaining
    }

    /// True when at least one more whole byte follows the current one.
    pub fn has_more_bytes(&mut self) -> bool {
        self.bytes.peek().is_some()
    }

    fn next_byte(&mut self) -> Result<u8> {
        match self.bytes.next() {
            Some(byte) => Ok(byte?),
            None => Err(HuffmanError::UnexpectedEof),
        }
    }
}
