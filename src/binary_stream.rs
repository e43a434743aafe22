//! Bit level reading and writing on top of byte oriented streams.
//!
//! Bits are packed most significant bit first. A structured frequency table
//! header may be written (and read back) as one unit before any payload bit.

mod header;
mod reader;
mod writer;

pub use header::HeaderError;
pub use reader::BitReader;
pub use writer::BitWriter;
