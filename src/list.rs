//! Loads the two banks and prints the events of the target bank.

use crate::cli::Options;
use crate::engine::{Backend, Bank, EventDescription, Handle, System};
use crate::error::FmodError;
use crate::flags::{DebugFlags, DebugMode, InitFlags, LoadBankFlags, StudioInitFlags};
use std::{
    borrow::Cow,
    error::Error,
    ffi::CStr,
    fmt::{Arguments, Display, Formatter, Result as FmtResult},
    io::{Error as IoError, Write},
    path::Path,
};
use tap::Pipe;

/// Number of channels the studio system is initialized with.
pub const MAX_CHANNELS: i32 = 1024;

/// Size of the buffer event paths are read into, terminator included.
/// A longer path fails the listing with `FMOD_ERR_TRUNCATED`.
pub const EVENT_PATH_CAPACITY: usize = 1024;

/// Runs the whole listing against `backend`, writing to `out`, and returns the number of
/// events printed.
///
/// Stops at the first failure. Nothing is unloaded or released in that case: the system is
/// only shut down once every event has been printed.
///
/// # Errors
/// Returns an error if a runtime call fails or `out` cannot be written to.
pub fn list_events<B: Backend, W: Write>(
    backend: &mut B,
    options: &Options,
    out: &mut W,
) -> Result<usize, ListError> {
    // In debug builds the runtime's diagnostics are silenced unless asked for.
    if cfg!(debug_assertions) && !options.fmod_debug {
        log::debug!("silencing runtime debug output");
        backend.initialize_debug(DebugFlags::none(), DebugMode::Tty)?;
    }

    let mut progress = Progress::new(out, options.verbose);

    progress.note(format_args!(
        "listing events from bank '{}' based on strings bank '{}'",
        options.target_bank.display(),
        options.strings_bank.display()
    ))?;
    progress.note(format_args!("creating system"))?;

    let mut system = backend.create_system()?;
    system.initialize(MAX_CHANNELS, StudioInitFlags::normal(), InitFlags::normal())?;

    progress.note(format_args!("system created: 0x{:x}", system.address()))?;

    let _strings = load_bank(
        &mut system,
        &options.strings_bank,
        BankRole::Strings,
        &mut progress,
    )?;
    let target = load_bank(
        &mut system,
        &options.target_bank,
        BankRole::Target,
        &mut progress,
    )?;

    let count = target.event_count()?;

    progress.note(format_args!("obtaining event list ({count} entries)"))?;

    let events = target.event_list(count)?;
    let mut path = [0; EVENT_PATH_CAPACITY];

    for (index, event) in events.iter().enumerate() {
        let event_path = read_path(event, &mut path)?;
        let id = event.id()?;

        log::debug!("event {index}: {id} {event_path}");

        if options.verbose {
            writeln!(
                progress.out,
                "event {index}: path = '{event_path}', guid = '{}'",
                id.listing()
            )?;
        } else {
            writeln!(progress.out, "{{{}}} {event_path}", id.listing())?;
        }
    }

    progress.note(format_args!("done! unloading"))?;

    system.unload_all()?;
    system.flush_commands()?;
    system.release()?;

    Ok(events.len())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BankRole {
    Strings,
    Target,
}

impl BankRole {
    fn name(self) -> &'static str {
        match self {
            Self::Strings => "strings",
            Self::Target => "target",
        }
    }

    // the strings bank's sample data is announced as "string bank"
    fn sample_data_name(self) -> &'static str {
        match self {
            Self::Strings => "string",
            Self::Target => "target",
        }
    }
}

fn load_bank<S: System, W: Write>(
    system: &mut S,
    path: &Path,
    role: BankRole,
    progress: &mut Progress<'_, W>,
) -> Result<S::Bank, ListError> {
    progress.note(format_args!("loading {} bank", role.name()))?;

    log::debug!("loading {} bank from {}", role.name(), path.display());

    let bank = system.load_bank_file(path, LoadBankFlags::normal())?;

    progress.note(format_args!("{} bank loaded: 0x{:x}", role.name(), bank.address()))?;
    progress.note(format_args!("loading {} bank sample data", role.sample_data_name()))?;

    bank.load_sample_data()?;
    system.flush_sample_loading()?;

    progress.note(format_args!("{} bank sample data loaded", role.sample_data_name()))?;

    Ok(bank)
}

fn read_path<'buf, E: EventDescription>(
    event: &E,
    buf: &'buf mut [u8],
) -> Result<Cow<'buf, str>, FmodError> {
    buf.fill(0);

    let _written = event.path(buf)?;
    let buf: &'buf [u8] = buf;

    buf.pipe_as_ref(CStr::from_bytes_until_nul)
        .map_or_else(|_| String::from_utf8_lossy(buf), CStr::to_string_lossy)
        .pipe(Ok)
}

// Writes progress lines when verbose output is enabled.
struct Progress<'out, W: Write> {
    out: &'out mut W,
    verbose: bool,
}

impl<'out, W: Write> Progress<'out, W> {
    fn new(out: &'out mut W, verbose: bool) -> Self {
        Self { out, verbose }
    }

    fn note(&mut self, line: Arguments<'_>) -> Result<(), IoError> {
        if self.verbose {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }
}

/// Listing stopped early.
#[derive(Debug)]
pub enum ListError {
    /// A runtime call failed.
    Fmod(FmodError),
    /// Output could not be written.
    Output(IoError),
}

impl From<FmodError> for ListError {
    fn from(value: FmodError) -> Self {
        Self::Fmod(value)
    }
}

impl From<IoError> for ListError {
    fn from(value: IoError) -> Self {
        Self::Output(value)
    }
}

impl Display for ListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Fmod(_) => "an FMOD runtime call failed",
            Self::Output(_) => "failed to write event listing",
        })
    }
}

impl Error for ListError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Fmod(e) => Some(e),
            Self::Output(e) => Some(e),
        }
    }
}
