use std::io::{self, Write};

use super::header;
use crate::huffman::FrequencyTable;

/// State for writing individual bits to a Writer
///
/// Dropping the writer flushes pending bits on a best effort basis,
/// use [`BitWriter::close`] to observe errors of the final flush.
pub struct BitWriter<T: Write> {
    /// the underlying output stream
    writer: T,
    /// buffer of individual bits not yet written
    buffer: u8,
    /// how many bits are waiting to be written
    buffer_space_used: u8,
    /// total number of payload bits accepted so far
    bits_written: u64,
}

impl<T: Write> BitWriter<T> {
    pub fn new(writer: T) -> BitWriter<T> {
        BitWriter {
            writer,
            buffer: 0,
            buffer_space_used: 0,
            bits_written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        if bit {
            self.buffer |= 0b10000000_u8 >> self.buffer_space_used;
        }
        self.buffer_space_used += 1;
        self.bits_written += 1;
        if self.buffer_space_used == 8 {
            let byte = self.buffer;
            self.buffer = 0; // depended upon in flush()
            self.buffer_space_used = 0;
            self.writer.write_all(&[byte])?;
        }
        Ok(())
    }

    /// write a non-byte-aligned number of bits
    ///
    /// buf: a byte array containing a contigous block
    /// count: how many bits of buf to write
    ///
    /// does not guarantee that all bits have reached the
    /// underlying stream, use flush to write any remaining bits.
    pub fn write_bits(&mut self, buf: &[u8], count: usize) -> io::Result<()> {
        if count > buf.len() * 8 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "bit count exceeds the length of the buffer",
            ));
        }
        let mut remaining_bits_offset = 0;
        if self.buffer_space_used == 0 {
            // this is efficient for large blocks of byte writes
            let quick_byte_count = count / 8;
            self.writer.write_all(&buf[0..quick_byte_count])?;
            remaining_bits_offset = quick_byte_count * 8;
            self.bits_written += remaining_bits_offset as u64;
        }
        for bit_index in remaining_bits_offset..count {
            let byte_index = bit_index / 8;
            let bit_index = bit_index % 8;
            self.write_bit(buf[byte_index] & (0b10000000_u8 >> bit_index) > 0)?;
        }
        Ok(())
    }

    /// Writes the frequency table header block.
    ///
    /// Must be called on a byte boundary, i.e. before any payload bit.
    pub fn write_header(&mut self, frequencies: &FrequencyTable) -> io::Result<()> {
        if self.buffer_space_used != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "header must be written on a byte boundary",
            ));
        }
        let bytes = header::encode_header(frequencies);
        crate::logger::log_header("Writing", &bytes);
        self.writer.write_all(&bytes)
    }

    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Flushes all pending bits and the underlying writer, then releases it.
    pub fn close(mut self) -> io::Result<()> {
        self.flush()
    }
}

impl<T: Write> Write for BitWriter<T> {
    /// Writing of byte arrays into the bit writer (for performance)
    ///
    /// Warning: Even when the returned number in the result equals
    ///          the length of the input buffer, not all bits of the
    ///          input may have been written (because of possible
    ///          single bits in BitWriters buffer)
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bits(buf, buf.len() * 8)?;
        Ok(buf.len())
    }

    /// Flush all bits and the underlying writer;
    ///
    /// If there are non-byte-aligned bits still
    /// in the buffer, they will be written to the output
    /// with 0 padding to the next byte;
    fn flush(&mut self) -> io::Result<()> {
        if self.buffer_space_used != 0 {
            let byte = self.buffer;
            self.buffer = 0;
            self.buffer_space_used = 0;
            self.writer.write_all(&[byte])?;
        }
        self.writer.flush()
    }
}

impl<T: Write> Drop for BitWriter<T> {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            log::warn!("Flushing bit writer on drop failed: {}", e);
        }
    }
}

#[cfg(test)]
mod test {
    use super::BitWriter;
    use crate::huffman::FrequencyTable;
    use std::io::Write;

    #[test]
    fn byte_mode_test() {
        let mut my_output: Vec<u8> = vec![];
        let mut writer = BitWriter::new(&mut my_output);
        let input: &[u8] = &[72, 65, 76, 76, 79];
        writer.write_all(input).expect("should not fail");
        writer.close().expect("closing should not fail");
        assert_eq!(my_output, vec![72, 65, 76, 76, 79]);
    }

    #[test]
    fn bit_mode_test() {
        let mut my_output: Vec<u8> = vec![];
        let mut writer = BitWriter::new(&mut my_output);
        // write 0x11000011 0x11110000 (in MSb notation)
        writer.write_bits(&[0xFF], 2).expect("ERR");
        writer.write_bits(&[0x00], 4).expect("ERR");
        writer.write_bits(&[0xFF], 2).expect("ERR");
        writer.write_bits(&[0xFF], 4).expect("ERR");
        assert_eq!(writer.bits_written(), 12);
        writer.close().expect("ERR");
        assert_eq!(my_output.len(), 2);
        assert_eq!(my_output[0], 195);
        assert_eq!(my_output[1], 15 << 4);
    }

    #[test]
    fn mixed_mode_test() {
        let mut my_output: Vec<u8> = vec![];
        let mut writer = BitWriter::new(&mut my_output);
        // 0b111
        writer.write_bits(&[0xFF], 3).expect("ERR");
        // 0b11100000 00100000 01010000 100
        writer.write_all(&[1, 2, 4 | 128]).expect("ERR");
        writer.close().expect("ERR");
        assert_eq!(my_output, vec![224, 32, 80, 128]);
    }

    #[test]
    fn single_bits_are_packed_most_significant_first() {
        let mut my_output: Vec<u8> = vec![];
        let mut writer = BitWriter::new(&mut my_output);
        for bit in [true, false, true, true, false, false, false, true, true] {
            writer.write_bit(bit).expect("ERR");
        }
        writer.close().expect("ERR");
        assert_eq!(my_output, vec![0b1011_0001, 0b1000_0000]);
    }

    #[test]
    fn drop_flushes_pending_bits() {
        let mut my_output: Vec<u8> = vec![];
        {
            let mut writer = BitWriter::new(&mut my_output);
            writer.write_bit(true).expect("ERR");
            writer.write_bit(true).expect("ERR");
        }
        assert_eq!(my_output, vec![0b1100_0000]);
    }

    #[test]
    fn too_many_bits_for_buffer_are_rejected() {
        let mut my_output: Vec<u8> = vec![];
        let mut writer = BitWriter::new(&mut my_output);
        assert!(writer.write_bits(&[0xFF], 9).is_err());
    }

    #[test]
    fn header_after_payload_bits_is_rejected() {
        let mut my_output: Vec<u8> = vec![];
        let mut writer = BitWriter::new(&mut my_output);
        writer.write_bit(true).expect("ERR");
        let result = writer.write_header(&FrequencyTable::new());
        assert_eq!(
            result.map_err(|e| e.kind()),
            Err(std::io::ErrorKind::InvalidInput)
        );
    }
}
