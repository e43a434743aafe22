use std::fmt::Display;

use crate::binary_stream::HeaderError;
use crate::huffman::CodingError;

#[derive(Debug)]
pub enum Error {
    UnableToOpenInputFileForReading(String, std::io::Error),
    UnableToOpenOutputFileForWriting(String, std::io::Error),
    OutputFileIsInputFile(String),
    FailedToReadInput(std::io::Error),
    FailedToWriteOutput(std::io::Error),
    FailedToWriteHeader(std::io::Error),
    MalformedHeader(HeaderError),
    Coding(CodingError),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
            Self::UnableToOpenOutputFileForWriting(path, error) => {
                write!(
                    f,
                    "Unable to open output file '{}' for writing: {}",
                    path, error
                )
            }
            Self::OutputFileIsInputFile(path) => {
                write!(f, "Output file '{}' is the input file", path)
            }
            Self::FailedToReadInput(error) => write!(f, "Failed to read input: {}", error),
            Self::FailedToWriteOutput(error) => write!(f, "Failed to write output: {}", error),
            Self::FailedToWriteHeader(error) => {
                write!(f, "Failed to write frequency table header: {}", error)
            }
            Self::MalformedHeader(error) => {
                write!(f, "Malformed frequency table header: {}", error)
            }
            Self::Coding(error) => write!(f, "Huffman coding failed: {}", error),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnableToOpenInputFileForReading(_, error)
            | Self::UnableToOpenOutputFileForWriting(_, error)
            | Self::FailedToReadInput(error)
            | Self::FailedToWriteOutput(error)
            | Self::FailedToWriteHeader(error) => Some(error),
            Self::MalformedHeader(error) => Some(error),
            Self::Coding(error) => Some(error),
            Self::OutputFileIsInputFile(_) => None,
        }
    }
}

impl From<HeaderError> for Error {
    fn from(value: HeaderError) -> Self {
        Self::MalformedHeader(value)
    }
}

impl From<CodingError> for Error {
    fn from(value: CodingError) -> Self {
        Self::Coding(value)
    }
}
