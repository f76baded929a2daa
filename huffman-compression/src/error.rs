use std::io;

use derive_more::Display;

pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(Debug, Display)]
pub enum HuffmanError {
    #[display(fmt = "i/o error: {}", _0)]
    Io(io::Error),

    #[display(fmt = "input is empty, there is nothing to compress")]
    EmptyInput,

    #[display(fmt = "input holds {} symbols, more than the header can count", _0)]
    InputTooLarge(u64),

    #[display(
        fmt = "input held {} symbols when counted and {} when encoded",
        first,
        second
    )]
    InputChanged { first: u64, second: u64 },

    #[display(
        fmt = "file was not compressed: {} bits compressed vs {} bits original (use -f to force)",
        compressed_bits,
        original_bits
    )]
    NotCompressible {
        original_bits: u64,
        compressed_bits: u64,
    },

    #[display(fmt = "magic does not match, found {:?}", _0)]
    CorruptHeader(Vec<u8>),

    #[display(fmt = "tree is nested deeper than {} levels", _0)]
    MalformedTree(usize),

    #[display(fmt = "unexpected end of stream")]
    UnexpectedEof,

    #[display(fmt = "unexpected data after the last encoded symbol")]
    TrailingData,
}

/// Coarse grouping used by callers that only care about why a run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Io,
    Input,
    Policy,
    Format,
}

impl HuffmanError {
    pub fn category(&self) -> Category {
        match self {
            HuffmanError::Io(_) => Category::Io,
            HuffmanError::EmptyInput
            | HuffmanError::InputTooLarge(_)
            | HuffmanError::InputChanged { .. } => Category::Input,
            HuffmanError::NotCompressible { .. } => Category::Policy,
            HuffmanError::CorruptHeader(_)
            | HuffmanError::MalformedTree(_)
            | HuffmanError::UnexpectedEof
            | HuffmanError::TrailingData => Category::Format,
        }
    }
}

impl std::error::Error for HuffmanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HuffmanError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for HuffmanError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            return HuffmanError::UnexpectedEof;
        }
        HuffmanError::Io(err)
    }
}
