use huffzip::binary_stream::{BitReader, BitWriter};

fn main() {
    let mut my_output: Vec<u8> = vec![];
    let mut writer = BitWriter::new(&mut my_output);

    // 10 bit pattern: 1110001100 (write 1 mil times)
    let pattern = [
        true, true, true, false, false, false, true, true, false, false,
    ];
    for _i in 0..1000000 {
        // write 1 bit at a time
        for bit in pattern {
            writer.write_bit(bit).expect("write failed");
        }
    }
    writer.close().expect("flush failed");

    // 10 bit pattern results in repeating 5 byte pattern
    let expected_pattern: Vec<u8> =
        vec![0b11100011, 0b00111000, 0b11001110, 0b00110011, 0b10001100];
    for (byte_index, byte) in my_output.iter().enumerate() {
        let exp_byte = expected_pattern[byte_index % 5];
        for bit_index in 0..8 {
            if ((*byte) & 1_u8.rotate_left(bit_index)) != (exp_byte & 1_u8.rotate_left(bit_index)) {
                println!(
                    "bit mismatch at position {} in byte {}",
                    bit_index, byte_index
                )
            }
        }
    }

    let mut reader = BitReader::new(my_output.as_slice());
    let mut bit_index: u64 = 0;
    while reader.has_next().expect("read failed") {
        let bit = reader.read_bit().expect("read failed");
        if bit != pattern[(bit_index % 10) as usize] {
            println!("read mismatch at bit {}", bit_index);
        }
        bit_index += 1;
    }
    println!("bit write and read finished")
}
