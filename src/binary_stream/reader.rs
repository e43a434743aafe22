use std::io::{self, Read};

use super::header::{self, HeaderError};
use crate::huffman::FrequencyTable;

/// State for reading individual bits from a Reader
pub struct BitReader<T: Read> {
    /// the underlying input stream
    reader: T,
    /// last byte fetched from the input stream
    buffer: u8,
    /// how many bits of the buffer have not been read yet
    bits_remaining: u8,
    /// total number of bits handed out so far
    bits_read: u64,
}

impl<T: Read> BitReader<T> {
    pub fn new(reader: T) -> BitReader<T> {
        BitReader {
            reader,
            buffer: 0,
            bits_remaining: 0,
            bits_read: 0,
        }
    }

    /// Reports whether another bit is available, without consuming it.
    ///
    /// Pulls at most one byte from the underlying reader.
    pub fn has_next(&mut self) -> io::Result<bool> {
        self.refill()
    }

    /// Reads the next bit, `true` meaning 1.
    ///
    /// Fails with [`io::ErrorKind::UnexpectedEof`] once the input is exhausted.
    pub fn read_bit(&mut self) -> io::Result<bool> {
        if !self.refill()? {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "bit stream exhausted",
            ));
        }
        self.bits_remaining -= 1;
        self.bits_read += 1;
        Ok(self.buffer & (1 << self.bits_remaining) != 0)
    }

    /// Reads the frequency table header block.
    ///
    /// Must be called before any bit is read or peeked.
    pub fn read_header(&mut self) -> Result<FrequencyTable, HeaderError> {
        if self.bits_remaining != 0 || self.bits_read != 0 {
            return Err(HeaderError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "header must be read before any payload bit",
            )));
        }
        let frequencies = header::decode_header(&mut self.reader)?;
        if log::log_enabled!(log::Level::Debug) {
            crate::logger::log_header("Read", &header::encode_header(&frequencies));
        }
        Ok(frequencies)
    }

    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    fn refill(&mut self) -> io::Result<bool> {
        if self.bits_remaining > 0 {
            return Ok(true);
        }
        let mut byte = [0; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(false),
                Ok(_) => {
                    self.buffer = byte[0];
                    self.bits_remaining = 8;
                    return Ok(true);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::BitReader;
    use crate::binary_stream::{BitWriter, HeaderError};
    use crate::huffman::FrequencyTable;
    use std::io::ErrorKind;

    #[test]
    fn bits_are_read_most_significant_first() {
        let input: &[u8] = &[0b1011_0001, 0b1000_0000];
        let mut reader = BitReader::new(input);
        let mut bits = Vec::new();
        while reader.has_next().expect("ERR") {
            bits.push(reader.read_bit().expect("ERR"));
        }
        assert_eq!(bits.len(), 16);
        assert_eq!(
            &bits[..9],
            &[true, false, true, true, false, false, false, true, true]
        );
        assert!(bits[9..].iter().all(|bit| !bit));
        assert_eq!(reader.bits_read(), 16);
    }

    #[test]
    fn has_next_does_not_consume() {
        let input: &[u8] = &[0b1000_0000];
        let mut reader = BitReader::new(input);
        assert!(reader.has_next().expect("ERR"));
        assert!(reader.has_next().expect("ERR"));
        assert!(reader.read_bit().expect("ERR"));
    }

    #[test]
    fn reading_past_the_end_fails() {
        let input: &[u8] = &[];
        let mut reader = BitReader::new(input);
        assert!(!reader.has_next().expect("ERR"));
        let error = reader.read_bit().expect_err("should be exhausted");
        assert_eq!(error.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn reads_back_what_the_writer_wrote() {
        let pattern = [true, true, true, false, false, false, true, true, false, false];
        let mut output: Vec<u8> = Vec::new();
        let mut writer = BitWriter::new(&mut output);
        for _ in 0..100 {
            for bit in pattern {
                writer.write_bit(bit).expect("ERR");
            }
        }
        writer.close().expect("ERR");
        assert_eq!(output.len(), 125);

        let mut reader = BitReader::new(output.as_slice());
        for _ in 0..100 {
            for bit in pattern {
                assert_eq!(reader.read_bit().expect("ERR"), bit);
            }
        }
        assert!(!reader.has_next().expect("ERR"));
    }

    #[test]
    fn header_precedes_payload() {
        let frequencies = FrequencyTable::from_iter([(b'a', 2), (b'z', 0)]);
        let mut output: Vec<u8> = Vec::new();
        let mut writer = BitWriter::new(&mut output);
        writer.write_header(&frequencies).expect("ERR");
        writer.write_bit(true).expect("ERR");
        writer.close().expect("ERR");

        let mut reader = BitReader::new(output.as_slice());
        assert_eq!(reader.read_header().expect("ERR"), frequencies);
        assert!(reader.read_bit().expect("ERR"));
    }

    #[test]
    fn header_after_payload_bits_is_rejected() {
        let input: &[u8] = &[0xFF, 0xFF];
        let mut reader = BitReader::new(input);
        reader.read_bit().expect("ERR");
        assert!(matches!(reader.read_header(), Err(HeaderError::Io(_))));
    }
}
