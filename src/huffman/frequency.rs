use std::collections::BTreeMap;
use std::io::{self, Read};

use super::{Frequency, Symbol, SymbolFrequency};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Occurrence counts of every possible byte value
pub struct SymbolCounter {
    symbol_frequencies: [Frequency; 256],
}

impl SymbolCounter {
    pub fn new() -> Self {
        Self {
            symbol_frequencies: [Frequency::default(); 256],
        }
    }

    pub fn increment_symbol(&mut self, symbol: Symbol) {
        self.symbol_frequencies[symbol as usize] += 1;
    }

    pub fn count_symbols(&mut self, symbols: &[Symbol]) {
        for &symbol in symbols {
            self.increment_symbol(symbol);
        }
    }

    pub fn to_frequency_table(&self) -> FrequencyTable {
        (0..=u8::MAX)
            .zip(self.symbol_frequencies.iter().copied())
            .filter(|&(_, f)| f > 0)
            .collect()
    }
}

impl Default for SymbolCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Mapping from symbol to frequency, iterated in ascending symbol order.
///
/// The iteration order decides the order in which leaves enter the merge
/// queue of [`super::HuffmanTree::new`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    frequencies: BTreeMap<Symbol, Frequency>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every byte of the reader until it is exhausted.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut counter = SymbolCounter::new();
        let mut buffer = [0; READ_CHUNK_SIZE];
        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(count) => counter.count_symbols(&buffer[..count]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(counter.to_frequency_table())
    }

    pub fn insert(&mut self, symbol: Symbol, frequency: Frequency) -> Option<Frequency> {
        self.frequencies.insert(symbol, frequency)
    }

    pub fn get(&self, symbol: Symbol) -> Option<Frequency> {
        self.frequencies.get(&symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Number of symbols the table was counted from.
    pub fn total(&self) -> Frequency {
        self.frequencies
            .values()
            .fold(0, |sum, &frequency| sum.saturating_add(frequency))
    }

    pub fn iter(&self) -> impl Iterator<Item = SymbolFrequency> + '_ {
        self.frequencies
            .iter()
            .map(|(&symbol, &frequency)| SymbolFrequency::new(symbol, frequency))
    }
}

impl FromIterator<(Symbol, Frequency)> for FrequencyTable {
    fn from_iter<T: IntoIterator<Item = (Symbol, Frequency)>>(iter: T) -> Self {
        Self {
            frequencies: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<SymbolFrequency> for FrequencyTable {
    fn from_iter<T: IntoIterator<Item = SymbolFrequency>>(iter: T) -> Self {
        iter.into_iter()
            .map(|sf| (sf.symbol, sf.frequency))
            .collect()
    }
}
