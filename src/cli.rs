use crate::{Arguments, Mode, COMPRESSED_FILE_EXTENSION};
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const DECODED_FILE_EXTENSION: &str = "decoded";

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_mode_argument(command);
        let command = Self::register_input_file_argument(command);
        Self::register_output_file_argument(command)
    }

    fn register_mode_argument(command: Command) -> Command {
        command.arg(Self::create_mode_argument())
    }

    fn register_input_file_argument(command: Command) -> Command {
        command.arg(Self::create_input_file_argument())
    }

    fn register_output_file_argument(command: Command) -> Command {
        command.arg(Self::create_output_file_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_mode_argument() -> Arg {
        Arg::new("mode")
            .help("Whether to compress or decompress the file")
            .value_parser(value_parser!(Mode))
            .required(true)
    }

    fn create_input_file_argument() -> Arg {
        Arg::new("input_file")
            .help("Path to the file to compress or decompress")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_output_file_argument() -> Arg {
        arg!(output_file: -o --output <PATH> "Path to the output file [default: FILE.hz when encoding, FILE without .hz when decoding]")
            .required(false)
            .value_parser(value_parser!(PathBuf))
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        let mode = Self::extract_mode_argument(matches);
        let input_file = Self::extract_input_file_argument(matches);
        let output_file = Self::extract_output_file_argument(matches)
            .unwrap_or_else(|| default_output_file(mode, &input_file));
        Arguments {
            mode,
            input_file,
            output_file,
        }
    }

    fn extract_mode_argument(matches: &ArgMatches) -> Mode {
        matches
            .get_one::<Mode>("mode")
            .expect("Required argument mode not provided")
            .to_owned()
    }

    fn extract_input_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("input_file")
            .expect("Required argument input_file not provided")
            .clone()
    }

    fn extract_output_file_argument(matches: &ArgMatches) -> Option<PathBuf> {
        matches.get_one::<PathBuf>("output_file").cloned()
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}

fn default_output_file(mode: Mode, input_file: &Path) -> PathBuf {
    match mode {
        Mode::Encode => append_extension(input_file, COMPRESSED_FILE_EXTENSION),
        Mode::Decode => {
            let is_compressed = input_file
                .extension()
                .is_some_and(|extension| extension == COMPRESSED_FILE_EXTENSION);
            if is_compressed {
                input_file.with_extension("")
            } else {
                append_extension(input_file, DECODED_FILE_EXTENSION)
            }
        }
    }
}

fn append_extension(file: &Path, extension: &str) -> PathBuf {
    let mut name = file.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use clap::{error::ErrorKind, Command};
    use std::path::PathBuf;

    use super::{default_output_file, CLIParser, Mode};

    const PROGRAM_NAME_ARGUMENT: &str = "test_program_name";

    #[test]
    fn parse_mode_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_mode_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "decode"]);
        let mode = CLIParser::extract_mode_argument(&matches);
        assert_eq!(mode, Mode::Decode);
    }

    #[test]
    fn parse_mode_illegal_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_mode_argument(command);
        let result = command.try_get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "squeeze"]);
        if let Err(error) = result {
            assert_eq!(error.kind(), ErrorKind::InvalidValue);
        } else {
            panic!("Illegal value for mode not detected");
        }
    }

    #[test]
    fn parse_input_file_argument() {
        let input_file_name = "testfile.txt";
        let command = Command::new("test");
        let command = CLIParser::register_input_file_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, input_file_name]);
        let input_file = CLIParser::extract_input_file_argument(&matches);
        assert_eq!(input_file.file_name().unwrap(), input_file_name);
    }

    #[test]
    fn parse_output_file_argument() {
        let output_file_name = "result.bin";
        let command = Command::new("test");
        let command = CLIParser::register_output_file_argument(command);
        let matches =
            command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--output", output_file_name]);
        let output_file = CLIParser::extract_output_file_argument(&matches);
        assert_eq!(output_file, Some(PathBuf::from(output_file_name)));
    }

    #[test]
    fn missing_file_argument_is_rejected() {
        let mut command = CLIParser::new().command;
        let result = command.try_get_matches_from_mut(vec![PROGRAM_NAME_ARGUMENT, "encode"]);
        if let Err(error) = result {
            assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);
        } else {
            panic!("Missing input file not detected");
        }
    }

    #[test]
    fn default_output_files() {
        assert_eq!(
            default_output_file(Mode::Encode, &PathBuf::from("/data/notes.txt")),
            PathBuf::from("/data/notes.txt.hz")
        );
        assert_eq!(
            default_output_file(Mode::Decode, &PathBuf::from("/data/notes.txt.hz")),
            PathBuf::from("/data/notes.txt")
        );
        assert_eq!(
            default_output_file(Mode::Decode, &PathBuf::from("/data/notes.bin")),
            PathBuf::from("/data/notes.bin.decoded")
        );
    }

    #[test]
    fn parse_required_arguments_only() {
        let mut cli_parser = CLIParser::default();
        let arguments = cli_parser.parse(vec![PROGRAM_NAME_ARGUMENT, "encode", "/input/book.txt"]);
        assert_eq!(arguments.mode, Mode::Encode, "mode does not match");
        assert_eq!(
            arguments.input_file,
            PathBuf::from("/input/book.txt"),
            "input file does not match"
        );
        assert_eq!(
            arguments.output_file,
            PathBuf::from("/input/book.txt.hz"),
            "output file does not match"
        );
    }

    #[test]
    fn parse_explicit_output_file() {
        let mut cli_parser = CLIParser::default();
        let arguments = cli_parser.parse(vec![
            PROGRAM_NAME_ARGUMENT,
            "decode",
            "/input/book.txt.hz",
            "-o",
            "/output/book.txt",
        ]);
        assert_eq!(arguments.mode, Mode::Decode, "mode does not match");
        assert_eq!(
            arguments.output_file,
            PathBuf::from("/output/book.txt"),
            "output file does not match"
        );
    }
}
