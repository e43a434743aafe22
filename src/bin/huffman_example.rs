use huffzip::binary_stream::{BitReader, BitWriter};
use huffzip::huffman::{FrequencyTable, HuffmanTree};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // symbol-frequency pairs
    let frequencies =
        FrequencyTable::from_iter([(b'a', 45), (b'b', 13), (b'c', 12), (b'd', 16), (b'e', 9)]);

    let tree = HuffmanTree::new(&frequencies);
    println!("huffman tree\n{}", tree);
    for entry in frequencies.iter() {
        let recursive = tree.encode_recursive(entry.symbol);
        let breadth_first = tree.encode_breadth_first(entry.symbol);
        println!(
            "'{}' recursive: {:?} breadth first: {:?}",
            entry.symbol as char,
            recursive.map(|code| code.to_string()),
            breadth_first.map(|code| code.to_string())
        );
    }

    let sequence_to_encode = b"deadbeefcafe";

    let mut encoded_buffer: Vec<u8> = Vec::new();
    let mut writer = BitWriter::new(&mut encoded_buffer);
    for &symbol in sequence_to_encode {
        tree.write_code(symbol, &mut writer)?;
    }
    let number_of_bits = writer.bits_written();
    writer.close()?;
    println!(
        "sequence to encode\n{}",
        String::from_utf8_lossy(sequence_to_encode)
    );
    println!("encoded sequence ({} bits)\n{:?}", number_of_bits, encoded_buffer);

    let mut reader = BitReader::new(encoded_buffer.as_slice());
    let mut decoded_buffer: Vec<u8> = Vec::new();
    while decoded_buffer.len() < sequence_to_encode.len() {
        match tree.read_code(&mut reader)? {
            Some(symbol) => decoded_buffer.push(symbol),
            None => break,
        }
    }
    println!(
        "decoded sequence\n{}",
        String::from_utf8_lossy(&decoded_buffer)
    );
    Ok(())
}
