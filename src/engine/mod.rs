//! The FMOD Studio runtime, seen through the handful of calls this crate makes.
//!
//! [`native`] binds the real shared libraries. Tests drive the same traits with a fake.

use crate::error::FmodResult;
use crate::flags::{DebugFlags, DebugMode, InitFlags, LoadBankFlags, StudioInitFlags};
use crate::guid::Guid;
use std::path::Path;

#[cfg(test)]
pub(crate) mod fake;
pub mod native;

/// Entry points that exist before a system is created.
pub trait Backend {
    /// Studio system created by this backend.
    type System: System;

    /// Configures the runtime's own debug output (`FMOD::Debug_Initialize`).
    ///
    /// # Errors
    /// Returns an error if the runtime rejects the call.
    fn initialize_debug(&mut self, flags: DebugFlags, mode: DebugMode) -> FmodResult<()>;

    /// Creates an uninitialized studio system.
    ///
    /// # Errors
    /// Returns an error if the runtime rejects the call.
    fn create_system(&mut self) -> FmodResult<Self::System>;
}

/// An object that lives inside the runtime.
pub trait Handle {
    /// Returns the address of the runtime object, for diagnostics.
    fn address(&self) -> usize;
}

/// A studio system (`FMOD::Studio::System`).
///
/// Dropping a system does not release it; call [`System::release`].
pub trait System: Handle {
    /// Banks loaded by this system.
    type Bank: Bank;

    /// Initializes the system.
    ///
    /// # Errors
    /// Returns an error if the runtime rejects the call.
    fn initialize(
        &mut self,
        max_channels: i32,
        studio_flags: StudioInitFlags,
        flags: InitFlags,
    ) -> FmodResult<()>;

    /// Loads bank metadata from a file.
    ///
    /// # Errors
    /// Returns an error if the runtime rejects the call.
    fn load_bank_file(&mut self, path: &Path, flags: LoadBankFlags) -> FmodResult<Self::Bank>;

    /// Blocks until all pending sample data has been loaded.
    ///
    /// # Errors
    /// Returns an error if the runtime rejects the call.
    fn flush_sample_loading(&mut self) -> FmodResult<()>;

    /// Unloads every bank.
    ///
    /// # Errors
    /// Returns an error if the runtime rejects the call.
    fn unload_all(&mut self) -> FmodResult<()>;

    /// Blocks until all pending commands have been executed.
    ///
    /// # Errors
    /// Returns an error if the runtime rejects the call.
    fn flush_commands(&mut self) -> FmodResult<()>;

    /// Shuts the system down and frees it.
    ///
    /// # Errors
    /// Returns an error if the runtime rejects the call.
    fn release(self) -> FmodResult<()>;
}

/// A loaded bank (`FMOD::Studio::Bank`).
pub trait Bank: Handle {
    /// Events described by this bank.
    type Event: EventDescription;

    /// Starts loading the bank's sample data.
    ///
    /// # Errors
    /// Returns an error if the runtime rejects the call.
    fn load_sample_data(&self) -> FmodResult<()>;

    /// Returns the number of events in the bank.
    ///
    /// # Errors
    /// Returns an error if the runtime rejects the call.
    fn event_count(&self) -> FmodResult<usize>;

    /// Returns up to `capacity` events, in the runtime's order.
    ///
    /// # Errors
    /// Returns an error if the runtime rejects the call.
    fn event_list(&self, capacity: usize) -> FmodResult<Vec<Self::Event>>;
}

/// Metadata of one event (`FMOD::Studio::EventDescription`).
pub trait EventDescription {
    /// Writes the event path into `buf` as a NUL-terminated string and returns the number of
    /// bytes written, including the terminator.
    ///
    /// # Errors
    /// Returns an error with [`Truncated`](crate::error::FmodErrorKind::Truncated) if `buf`
    /// is too small; `buf` then holds as much of the path as fits, still NUL-terminated.
    fn path(&self, buf: &mut [u8]) -> FmodResult<usize>;

    /// Returns the event GUID.
    ///
    /// # Errors
    /// Returns an error if the runtime rejects the call.
    fn id(&self) -> FmodResult<Guid>;
}
