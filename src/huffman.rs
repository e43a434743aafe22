use std::fmt::Display;
use std::io;

mod code;
mod frequency;
mod tree;

pub use code::{Code, ParseCodeError};
pub use frequency::{FrequencyTable, SymbolCounter};
pub use tree::HuffmanTree;

pub type Symbol = u8;
pub type Frequency = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolFrequency {
    pub symbol: Symbol,
    pub frequency: Frequency,
}

impl SymbolFrequency {
    pub fn new(symbol: Symbol, frequency: Frequency) -> Self {
        Self { symbol, frequency }
    }
}

impl From<(Symbol, Frequency)> for SymbolFrequency {
    fn from(value: (Symbol, Frequency)) -> Self {
        Self {
            symbol: value.0,
            frequency: value.1,
        }
    }
}

#[derive(Debug)]
pub enum CodingError {
    UnknownSymbol(Symbol),
    BitWriterError(io::Error),
    BitReaderError(io::Error),
}

impl Display for CodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownSymbol(symbol) => {
                write!(f, "Symbol {:#04X} is not present in the Huffman tree", symbol)
            }
            Self::BitWriterError(error) => write!(f, "Failed to write code bits: {}", error),
            Self::BitReaderError(error) => write!(f, "Failed to read code bits: {}", error),
        }
    }
}

impl std::error::Error for CodingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnknownSymbol(_) => None,
            Self::BitWriterError(error) | Self::BitReaderError(error) => Some(error),
        }
    }
}
