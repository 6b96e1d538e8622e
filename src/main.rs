//! Command-line entry point for `fevlist`.

use fevlist::{engine::native::NativeBackend, logging, run};
use std::{env, ffi::OsString, io, process};

fn main() {
    logging::init();

    let args: Vec<OsString> = env::args_os().collect();
    let exit = run(
        &args,
        NativeBackend::load,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );

    process::exit(exit.code());
}
