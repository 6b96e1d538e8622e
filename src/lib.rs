//! # fevlist
//!
//! `fevlist` lists the events contained in an FMOD Studio bank, printing each event's path
//! and GUID. The banks are opened with the FMOD Studio runtime itself; this crate only
//! sequences the calls and formats the results.
//!
//! The runtime is reached through the traits in [`engine`], so the listing logic in [`list`]
//! does not depend on the FMOD libraries being present.

#![warn(clippy::pedantic, future_incompatible)]
#![deny(
    let_underscore_drop,
    macro_use_extern_crate,
    meta_variable_misuse,
    missing_abi,
    missing_debug_implementations,
    missing_docs,
    non_ascii_idents,
    nonstandard_style,
    noop_method_call,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_op_in_unsafe_fn,
    unused,
    unused_import_braces,
    unused_lifetimes,
    unused_macro_rules,
    unused_qualifications,
    unused_results
)]

pub mod cli;
pub mod engine;
pub mod error;
pub mod flags;
pub mod guid;
pub mod list;
pub mod logging;

use cli::Command;
use engine::Backend;
use list::ListError;
use std::{
    error::Error,
    ffi::OsString,
    io::{Result as IoResult, Write},
};

/// How the process should exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    /// Everything was listed, or help was requested.
    Success,
    /// Usage error or runtime failure.
    Failure,
}

impl Exit {
    /// Returns the process exit status.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
        }
    }
}

/// Runs the tool for the argument list `args` (program name first).
///
/// `load` is only called once the arguments are known to be valid, so help and usage errors
/// never touch the runtime. Any failed runtime call ends the run with
/// `panic! error code: <code>` on `stderr`.
pub fn run<B, L, E, O, R>(args: &[OsString], load: L, stdout: &mut O, stderr: &mut R) -> Exit
where
    B: Backend,
    L: FnOnce() -> Result<B, E>,
    E: Error,
    O: Write,
    R: Write,
{
    let options = match Command::parse(args) {
        Ok(Command::Help) => {
            emit(cli::write_usage(stdout));
            return Exit::Success;
        }
        Ok(Command::List(options)) => options,
        Err(e) => {
            log::debug!("rejected command line: {e}");
            emit(e.report(stderr));
            return Exit::Failure;
        }
    };

    let mut backend = match load() {
        Ok(backend) => backend,
        Err(e) => {
            let message = describe(&e);
            log::error!("{message}");
            emit(writeln!(stderr, "error: {message}"));
            return Exit::Failure;
        }
    };

    match list::list_events(&mut backend, &options, stdout) {
        Ok(count) => {
            log::info!("listed {count} event(s)");
            Exit::Success
        }
        Err(ListError::Fmod(e)) => {
            log::error!("{e}");
            emit(writeln!(stderr, "panic! error code: {}", e.code()));
            Exit::Failure
        }
        Err(e @ ListError::Output(_)) => {
            emit(writeln!(stderr, "error: {}", describe(&e)));
            Exit::Failure
        }
    }
}

// Joins an error and its sources into one line.
fn describe(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(e) = source {
        message.push_str(": ");
        message.push_str(&e.to_string());
        source = e.source();
    }

    message
}

// Nothing useful can be done when the standard streams themselves fail.
fn emit(result: IoResult<()>) {
    if let Err(e) = result {
        log::debug!("failed to write to standard stream: {e}");
    }
}
