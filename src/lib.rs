use std::{
    fs::{self, File, OpenOptions},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use clap::{builder::PossibleValue, ValueEnum};

pub use cli::CLIParser;
pub use error::Error;
use zip::{DecodeSummary, EncodeSummary};

pub mod binary_stream;
mod cli;
mod error;
pub mod huffman;
mod logger;
pub mod zip;

pub type Result<T> = std::result::Result<T, error::Error>;

/// File extension of compressed artifacts
pub const COMPRESSED_FILE_EXTENSION: &str = "hz";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Encode,
    Decode,
}

impl ValueEnum for Mode {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Encode, Self::Decode]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::Encode => Some(PossibleValue::new("encode").help("Compress FILE")),
            Self::Decode => Some(PossibleValue::new("decode").help("Decompress FILE")),
        }
    }
}

pub struct Arguments {
    mode: Mode,
    input_file: PathBuf,
    output_file: PathBuf,
}

impl Arguments {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn input_file(&self) -> &Path {
        &self.input_file
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }
}

fn open_input_file(file_path: &Path) -> Result<File> {
    File::open(file_path).map_err(|e| {
        Error::UnableToOpenInputFileForReading(file_path.display().to_string(), e)
    })
}

fn open_output_file(file_path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .map_err(|e| {
            Error::UnableToOpenOutputFileForWriting(file_path.display().to_string(), e)
        })
}

/// Rejects an output path resolving to the input file, which opening the
/// output would truncate before it is read.
fn ensure_distinct_files(input_file: &Path, output_file: &Path) -> Result<()> {
    let Ok(output_path) = fs::canonicalize(output_file) else {
        return Ok(());
    };
    match fs::canonicalize(input_file) {
        Ok(input_path) if input_path == output_path => Err(Error::OutputFileIsInputFile(
            output_file.display().to_string(),
        )),
        _ => Ok(()),
    }
}

pub fn encode_file(input_file: &Path, output_file: &Path) -> Result<EncodeSummary> {
    let input = open_input_file(input_file)?;
    ensure_distinct_files(input_file, output_file)?;
    let output = open_output_file(output_file)?;
    zip::encode(BufReader::new(input), BufWriter::new(output))
}

pub fn decode_file(input_file: &Path, output_file: &Path) -> Result<DecodeSummary> {
    let input = open_input_file(input_file)?;
    ensure_distinct_files(input_file, output_file)?;
    let output = open_output_file(output_file)?;
    zip::decode(BufReader::new(input), BufWriter::new(output))
}

pub fn run(arguments: &Arguments) -> Result<()> {
    match arguments.mode {
        Mode::Encode => {
            log::info!(
                "Compressing '{}' into '{}'",
                arguments.input_file.display(),
                arguments.output_file.display()
            );
            let summary = encode_file(&arguments.input_file, &arguments.output_file)?;
            log::info!(
                "Compressed {} bytes with {} distinct symbols into {} payload bits",
                summary.input_bytes,
                summary.distinct_symbols,
                summary.payload_bits
            );
        }
        Mode::Decode => {
            log::info!(
                "Decompressing '{}' into '{}'",
                arguments.input_file.display(),
                arguments.output_file.display()
            );
            let summary = decode_file(&arguments.input_file, &arguments.output_file)?;
            log::info!(
                "Decompressed {} of {} symbols",
                summary.decoded_symbols,
                summary.expected_symbols
            );
        }
    }
    Ok(())
}
