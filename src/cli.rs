//! Command-line parsing.
//!
//! Flags come first; parsing stops at the first token that does not start with `-`, and the
//! next two tokens are the bank paths.

use phf::phf_map;
use std::{
    error::Error,
    ffi::OsString,
    fmt::{Display, Formatter, Result as FmtResult},
    io::{Result as IoResult, Write},
    path::PathBuf,
};

/// Usage text, printed for `--help` and after every usage error.
pub const USAGE: &str = "\
help: fevlist -h|--help
usage: fevlist [-v|--verbose -d|--fmod-debug] PATH_TO_MASTER_STRINGS_BANK PATH_TO_TARGET_BANK

       the tool requires you to provide the 'Master Bank.strings.bank' file on top
       of the one you're actually interested in, because that's what contains information
       about event names
";

#[derive(Clone, Copy, Debug)]
enum Flag {
    Help,
    Verbose,
    FmodDebug,
}

static FLAGS: phf::Map<&'static str, Flag> = phf_map! {
    "-h" => Flag::Help,
    "--help" => Flag::Help,
    "-v" => Flag::Verbose,
    "--verbose" => Flag::Verbose,
    "-d" => Flag::FmodDebug,
    "--fmod-debug" => Flag::FmodDebug,
};

/// What the command line asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print usage to standard output and exit successfully.
    Help,
    /// List the events of a bank.
    List(Options),
}

/// Settings for listing the events of a bank.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Print progress and the long event format.
    pub verbose: bool,
    /// Leave the runtime's own debug output enabled.
    pub fmod_debug: bool,
    /// Bank holding the event name table, usually `Master Bank.strings.bank`.
    pub strings_bank: PathBuf,
    /// Bank whose events are listed.
    pub target_bank: PathBuf,
}

impl Command {
    /// Parses a full argument list, including the program name at index 0.
    ///
    /// Fewer than three tokens in total is rejected before any flag is looked at, so a lone
    /// `-h` is a usage error rather than a help request.
    ///
    /// # Errors
    /// Returns an error for unknown or malformed options and for missing bank paths.
    pub fn parse(args: &[OsString]) -> Result<Self, UsageError> {
        if args.len() < 3 {
            return Err(UsageError::new(UsageErrorKind::TooFewArguments));
        }

        let mut verbose = false;
        let mut fmod_debug = false;
        let mut rest = &args[1..];

        while let Some((arg, tail)) = rest.split_first() {
            let bytes = arg.as_encoded_bytes();

            if bytes.first() != Some(&b'-') {
                break;
            }

            if bytes.len() < 2 {
                return Err(UsageError::new(UsageErrorKind::InvalidOption {
                    option: arg.to_string_lossy().into_owned(),
                }));
            }

            match arg.to_str().and_then(|arg| FLAGS.get(arg)) {
                Some(Flag::Help) => return Ok(Self::Help),
                Some(Flag::Verbose) => verbose = true,
                Some(Flag::FmodDebug) => fmod_debug = true,
                None => {
                    return Err(UsageError::new(UsageErrorKind::UnknownOption {
                        option: arg.to_string_lossy().into_owned(),
                    }))
                }
            }

            rest = tail;
        }

        let [strings_bank, target_bank, extra @ ..] = rest else {
            return Err(UsageError::new(UsageErrorKind::MissingBankPaths));
        };

        if !extra.is_empty() {
            log::debug!("ignoring {} extra argument(s): {extra:?}", extra.len());
        }

        Ok(Self::List(Options {
            verbose,
            fmod_debug,
            strings_bank: strings_bank.into(),
            target_bank: target_bank.into(),
        }))
    }
}

/// Writes [`USAGE`] to `sink`.
///
/// # Errors
/// Returns an error if writing fails.
pub fn write_usage<W: Write>(mut sink: W) -> IoResult<()> {
    sink.write_all(USAGE.as_bytes())
}

/// The command line could not be understood.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsageError {
    kind: UsageErrorKind,
}

/// Why the command line was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UsageErrorKind {
    /// Fewer than two arguments after the program name.
    TooFewArguments,
    /// A lone `-`.
    InvalidOption {
        /// The offending token.
        option: String,
    },
    /// A token starting with `-` that is not a known flag.
    UnknownOption {
        /// The offending token.
        option: String,
    },
    /// Fewer than two tokens left after the flags.
    MissingBankPaths,
}

impl UsageError {
    fn new(kind: UsageErrorKind) -> Self {
        Self { kind }
    }

    /// Returns why the command line was rejected.
    #[must_use]
    pub fn kind(&self) -> &UsageErrorKind {
        &self.kind
    }

    /// Writes the error line, if there is one, followed by [`USAGE`].
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn report<W: Write>(&self, mut sink: W) -> IoResult<()> {
        match self.kind {
            UsageErrorKind::InvalidOption { .. } | UsageErrorKind::UnknownOption { .. } => {
                writeln!(sink, "{self}")?;
            }
            UsageErrorKind::TooFewArguments | UsageErrorKind::MissingBankPaths => {}
        }

        write_usage(sink)
    }
}

impl Display for UsageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.kind {
            UsageErrorKind::TooFewArguments => f.write_str("too few arguments"),
            UsageErrorKind::InvalidOption { option } => {
                f.write_str(&format!("invalid option: {option}"))
            }
            UsageErrorKind::UnknownOption { option } => {
                f.write_str(&format!("unknown option: {option}"))
            }
            UsageErrorKind::MissingBankPaths => f.write_str("missing bank paths"),
        }
    }
}

impl Error for UsageError {}

#[cfg(test)]
mod test {
    use super::{Command, Options, UsageErrorKind, USAGE};
    use std::ffi::OsString;

    fn args(tokens: &[&str]) -> Vec<OsString> {
        std::iter::once("fevlist")
            .chain(tokens.iter().copied())
            .map(OsString::from)
            .collect()
    }

    fn list(verbose: bool, fmod_debug: bool, strings: &str, target: &str) -> Command {
        Command::List(Options {
            verbose,
            fmod_debug,
            strings_bank: strings.into(),
            target_bank: target.into(),
        })
    }

    fn error_kind(tokens: &[&str]) -> UsageErrorKind {
        Command::parse(&args(tokens)).unwrap_err().kind().clone()
    }

    #[test]
    fn two_paths() {
        assert_eq!(
            Command::parse(&args(&["strings.bank", "music.bank"])),
            Ok(list(false, false, "strings.bank", "music.bank"))
        );
    }

    #[test]
    fn flags_before_paths() {
        assert_eq!(
            Command::parse(&args(&["-v", "--fmod-debug", "s.bank", "t.bank"])),
            Ok(list(true, true, "s.bank", "t.bank"))
        );
        assert_eq!(
            Command::parse(&args(&["--verbose", "s.bank", "t.bank"])),
            Ok(list(true, false, "s.bank", "t.bank"))
        );
        assert_eq!(
            Command::parse(&args(&["-d", "s.bank", "t.bank"])),
            Ok(list(false, true, "s.bank", "t.bank"))
        );
    }

    #[test]
    fn flags_after_first_path_are_positional() {
        assert_eq!(
            Command::parse(&args(&["s.bank", "-v", "t.bank"])),
            Ok(list(false, false, "s.bank", "-v"))
        );
    }

    #[test]
    fn extra_paths_are_ignored() {
        assert_eq!(
            Command::parse(&args(&["s.bank", "t.bank", "other.bank"])),
            Ok(list(false, false, "s.bank", "t.bank"))
        );
    }

    #[test]
    fn empty_token_is_positional() {
        assert_eq!(
            Command::parse(&args(&["", "t.bank"])),
            Ok(list(false, false, "", "t.bank"))
        );
    }

    #[test]
    fn help_with_enough_arguments() {
        assert_eq!(Command::parse(&args(&["--help", "s.bank", "t.bank"])), Ok(Command::Help));
        assert_eq!(Command::parse(&args(&["-v", "-h"])), Ok(Command::Help));
    }

    #[test]
    fn lone_help_is_too_few_arguments() {
        assert_eq!(error_kind(&["-h"]), UsageErrorKind::TooFewArguments);
        assert_eq!(error_kind(&["--help"]), UsageErrorKind::TooFewArguments);
        assert_eq!(error_kind(&[]), UsageErrorKind::TooFewArguments);
        assert_eq!(error_kind(&["s.bank"]), UsageErrorKind::TooFewArguments);
    }

    #[test]
    fn unknown_option() {
        assert_eq!(
            error_kind(&["--bogus", "s.bank", "t.bank"]),
            UsageErrorKind::UnknownOption {
                option: "--bogus".into()
            }
        );
        assert_eq!(
            error_kind(&["-vd", "s.bank", "t.bank"]),
            UsageErrorKind::UnknownOption {
                option: "-vd".into()
            }
        );
    }

    #[test]
    fn lone_dash_is_invalid() {
        assert_eq!(
            error_kind(&["-", "s.bank", "t.bank"]),
            UsageErrorKind::InvalidOption { option: "-".into() }
        );
    }

    #[test]
    fn missing_paths_after_flags() {
        assert_eq!(error_kind(&["-v", "s.bank"]), UsageErrorKind::MissingBankPaths);
        assert_eq!(error_kind(&["-v", "-d"]), UsageErrorKind::MissingBankPaths);
    }

    #[test]
    fn report_writes_message_then_usage() {
        let error = Command::parse(&args(&["--bogus", "s.bank", "t.bank"])).unwrap_err();
        let mut sink = Vec::new();

        error.report(&mut sink).unwrap();

        assert_eq!(
            String::from_utf8(sink).unwrap(),
            format!("unknown option: --bogus\n{USAGE}")
        );
    }

    #[test]
    fn report_without_message() {
        let error = Command::parse(&args(&["-h"])).unwrap_err();
        let mut sink = Vec::new();

        error.report(&mut sink).unwrap();

        assert_eq!(String::from_utf8(sink).unwrap(), USAGE);
    }
}
