//! Wire format of the frequency table header block.
//!
//! ```text
//! magic      2 bytes  "HZ"
//! version    u8       1
//! entries    u16 BE   0..=256
//! entry      symbol u8, frequency u64 BE   (strictly ascending symbols)
//! ```

use std::fmt::Display;
use std::io::{self, Read};

use crate::huffman::{Frequency, FrequencyTable, Symbol};

const MAGIC: [u8; 2] = *b"HZ";
const VERSION: u8 = 1;
const MAX_ENTRIES: u16 = 256;
const ENTRY_SIZE: usize = 1 + 8;
const PREAMBLE_SIZE: usize = 2 + 1 + 2;

#[derive(Debug)]
pub enum HeaderError {
    Io(io::Error),
    Truncated,
    BadMagic([u8; 2]),
    UnsupportedVersion(u8),
    TooManyEntries(u16),
    UnorderedSymbols { previous: Symbol, current: Symbol },
    FrequencyOverflow,
}

impl Display for HeaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "I/O error while reading header: {}", error),
            Self::Truncated => write!(f, "Header ends prematurely"),
            Self::BadMagic(magic) => {
                write!(f, "Unknown magic bytes {:02X}{:02X}", magic[0], magic[1])
            }
            Self::UnsupportedVersion(version) => {
                write!(f, "Unsupported header version {}", version)
            }
            Self::TooManyEntries(entries) => write!(
                f,
                "Header announces {} entries, but at most {} symbols exist",
                entries, MAX_ENTRIES
            ),
            Self::UnorderedSymbols { previous, current } => write!(
                f,
                "Symbol {} follows symbol {}, symbols must be strictly ascending",
                current, previous
            ),
            Self::FrequencyOverflow => write!(f, "Sum of all frequencies overflows"),
        }
    }
}

impl std::error::Error for HeaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<io::Error> for HeaderError {
    fn from(value: io::Error) -> Self {
        if value.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated
        } else {
            Self::Io(value)
        }
    }
}

pub(super) fn encode_header(frequencies: &FrequencyTable) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(PREAMBLE_SIZE + frequencies.len() * ENTRY_SIZE);
    bytes.extend(MAGIC);
    bytes.push(VERSION);
    // a table holds at most one entry per symbol
    bytes.extend((frequencies.len() as u16).to_be_bytes());
    for entry in frequencies.iter() {
        bytes.push(entry.symbol);
        bytes.extend(entry.frequency.to_be_bytes());
    }
    bytes
}

pub(super) fn decode_header<R: Read>(reader: &mut R) -> Result<FrequencyTable, HeaderError> {
    let mut magic = [0; 2];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(HeaderError::BadMagic(magic));
    }

    let mut version = [0; 1];
    reader.read_exact(&mut version)?;
    if version[0] != VERSION {
        return Err(HeaderError::UnsupportedVersion(version[0]));
    }

    let mut entries = [0; 2];
    reader.read_exact(&mut entries)?;
    let entries = u16::from_be_bytes(entries);
    if entries > MAX_ENTRIES {
        return Err(HeaderError::TooManyEntries(entries));
    }

    let mut frequencies = FrequencyTable::new();
    let mut previous_symbol: Option<Symbol> = None;
    let mut total: Frequency = 0;
    for _ in 0..entries {
        let mut entry = [0; ENTRY_SIZE];
        reader.read_exact(&mut entry)?;
        let symbol = entry[0];
        let mut frequency = [0; 8];
        frequency.copy_from_slice(&entry[1..]);
        let frequency = Frequency::from_be_bytes(frequency);

        if let Some(previous) = previous_symbol {
            if symbol <= previous {
                return Err(HeaderError::UnorderedSymbols {
                    previous,
                    current: symbol,
                });
            }
        }
        total = total
            .checked_add(frequency)
            .ok_or(HeaderError::FrequencyOverflow)?;
        frequencies.insert(symbol, frequency);
        previous_symbol = Some(symbol);
    }
    Ok(frequencies)
}
