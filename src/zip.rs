//! End to end compression and decompression of byte streams.
//!
//! Encoding reads its input twice: once to count symbol frequencies and once
//! more to emit the codes, so the input never has to be held in memory.

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::binary_stream::{BitReader, BitWriter};
use crate::error::Error;
use crate::huffman::{CodingError, Frequency, FrequencyTable, HuffmanTree};
use crate::Result;

const READ_CHUNK_SIZE: usize = 8 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeSummary {
    pub input_bytes: Frequency,
    pub distinct_symbols: usize,
    pub payload_bits: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeSummary {
    pub expected_symbols: Frequency,
    pub decoded_symbols: Frequency,
}

impl DecodeSummary {
    pub fn is_complete(&self) -> bool {
        self.decoded_symbols == self.expected_symbols
    }
}

pub fn encode<R: Read + Seek, W: Write>(mut input: R, output: W) -> Result<EncodeSummary> {
    log::info!("Counting symbol frequencies");
    let frequencies = FrequencyTable::from_reader(&mut input).map_err(Error::FailedToReadInput)?;
    let tree = HuffmanTree::new(&frequencies);
    log::trace!("Huffman tree\n{}", tree);

    input
        .seek(SeekFrom::Start(0))
        .map_err(Error::FailedToReadInput)?;
    let mut writer = BitWriter::new(output);
    writer
        .write_header(&frequencies)
        .map_err(Error::FailedToWriteHeader)?;
    log::info!("Writing codes of {} symbols", frequencies.total());
    write_payload(&tree, &mut input, &mut writer)?;
    let payload_bits = writer.bits_written();
    writer
        .close()
        .map_err(|e| Error::Coding(CodingError::BitWriterError(e)))?;

    Ok(EncodeSummary {
        input_bytes: frequencies.total(),
        distinct_symbols: frequencies.len(),
        payload_bits,
    })
}

fn write_payload<R: Read, W: Write>(
    tree: &HuffmanTree,
    input: &mut R,
    writer: &mut BitWriter<W>,
) -> Result<()> {
    let mut buffer = [0; READ_CHUNK_SIZE];
    loop {
        let count = match input.read(&mut buffer) {
            Ok(0) => return Ok(()),
            Ok(count) => count,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::FailedToReadInput(e)),
        };
        for &symbol in &buffer[..count] {
            tree.write_code(symbol, writer)?;
        }
    }
}

/// Decodes symbols until the payload is exhausted or as many symbols as
/// the frequency table accounts for were written.
pub fn decode<R: Read, W: Write>(input: R, mut output: W) -> Result<DecodeSummary> {
    let mut reader = BitReader::new(input);
    let frequencies = reader.read_header()?;
    let tree = HuffmanTree::new(&frequencies);
    let expected_symbols = frequencies.total();
    log::info!("Decoding {} symbols", expected_symbols);

    let mut decoded_symbols: Frequency = 0;
    while decoded_symbols < expected_symbols {
        match tree.read_code(&mut reader)? {
            Some(symbol) => {
                output
                    .write_all(&[symbol])
                    .map_err(Error::FailedToWriteOutput)?;
                decoded_symbols += 1;
            }
            None => {
                let has_next = reader
                    .has_next()
                    .map_err(|e| Error::Coding(CodingError::BitReaderError(e)))?;
                if !has_next {
                    break;
                }
            }
        }
    }
    output.flush().map_err(Error::FailedToWriteOutput)?;

    let summary = DecodeSummary {
        expected_symbols,
        decoded_symbols,
    };
    if !summary.is_complete() {
        log::warn!(
            "Payload ended after {} of {} symbols",
            decoded_symbols,
            expected_symbols
        );
    }
    Ok(summary)
}
