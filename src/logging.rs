//! Logger setup.

use env_logger::{Builder, Env};

/// Installs a logger writing to standard error.
///
/// The filter is read from `RUST_LOG`; when it is unset nothing is logged, so the tool's
/// output is unchanged.
pub fn init() {
    if let Err(e) = Builder::from_env(Env::default().default_filter_or("off"))
        .format_timestamp(None)
        .try_init()
    {
        log::warn!("logger was already installed: {e}");
    }
}
