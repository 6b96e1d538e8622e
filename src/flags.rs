//! Flag words passed to the FMOD runtime.
//!
//! Each type wraps a bitfield with the layout of the corresponding C flag type. Only the
//! all-zero ("normal") value is used by this crate; the named bits show up in `Debug` output.

use bilge::prelude::*;

/// Core system initialization flags (`FMOD_INITFLAGS`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitFlags(RawInitFlags);

/// Studio system initialization flags (`FMOD_STUDIO_INITFLAGS`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StudioInitFlags(RawStudioInitFlags);

/// Bank loading flags (`FMOD_STUDIO_LOAD_BANK_FLAGS`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadBankFlags(RawLoadBankFlags);

/// Debug output level and category flags (`FMOD_DEBUG_FLAGS`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebugFlags(RawDebugFlags);

#[bitsize(32)]
#[derive(Clone, Copy, PartialEq, Eq, FromBits, DebugBits)]
struct RawInitFlags {
    stream_from_update: bool,
    mix_from_update: bool,
    right_handed_3d: bool,
    clip_output: bool,
    reserved_0: u4,
    channel_lowpass: bool,
    channel_distance_filter: bool,
    reserved_1: u6,
    profile_enable: bool,
    vol0_becomes_virtual: bool,
    geometry_use_closest: bool,
    prefer_dolby_downmix: bool,
    thread_unsafe: bool,
    profile_meter_all: bool,
    memory_tracking: bool,
    reserved_2: u9,
}

#[bitsize(32)]
#[derive(Clone, Copy, PartialEq, Eq, FromBits, DebugBits)]
struct RawStudioInitFlags {
    live_update: bool,
    allow_missing_plugins: bool,
    synchronous_update: bool,
    deferred_callbacks: bool,
    load_from_update: bool,
    memory_tracking: bool,
    reserved: u26,
}

#[bitsize(32)]
#[derive(Clone, Copy, PartialEq, Eq, FromBits, DebugBits)]
struct RawLoadBankFlags {
    nonblocking: bool,
    decompress_samples: bool,
    unencrypted: bool,
    reserved: u29,
}

#[bitsize(32)]
#[derive(Clone, Copy, PartialEq, Eq, FromBits, DebugBits)]
struct RawDebugFlags {
    level_error: bool,
    level_warning: bool,
    level_log: bool,
    reserved_0: u5,
    type_memory: bool,
    type_file: bool,
    type_codec: bool,
    type_trace: bool,
    reserved_1: u4,
    display_timestamps: bool,
    display_line_numbers: bool,
    display_thread: bool,
    reserved_2: u13,
}

impl InitFlags {
    /// `FMOD_INIT_NORMAL`
    #[must_use]
    pub fn normal() -> Self {
        Self(RawInitFlags::from(0_u32))
    }

    /// Returns the raw flag word.
    #[must_use]
    pub fn bits(self) -> u32 {
        self.0.into()
    }
}

impl StudioInitFlags {
    /// `FMOD_STUDIO_INIT_NORMAL`
    #[must_use]
    pub fn normal() -> Self {
        Self(RawStudioInitFlags::from(0_u32))
    }

    /// Returns the raw flag word.
    #[must_use]
    pub fn bits(self) -> u32 {
        self.0.into()
    }
}

impl LoadBankFlags {
    /// `FMOD_STUDIO_LOAD_BANK_NORMAL`
    #[must_use]
    pub fn normal() -> Self {
        Self(RawLoadBankFlags::from(0_u32))
    }

    /// Returns the raw flag word.
    #[must_use]
    pub fn bits(self) -> u32 {
        self.0.into()
    }
}

impl DebugFlags {
    /// `FMOD_DEBUG_LEVEL_NONE`: the runtime prints nothing.
    #[must_use]
    pub fn none() -> Self {
        Self(RawDebugFlags::from(0_u32))
    }

    /// Returns the raw flag word.
    #[must_use]
    pub fn bits(self) -> u32 {
        self.0.into()
    }
}

/// Where the runtime writes its debug output (`FMOD_DEBUG_MODE`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugMode {
    /// Standard output or the platform's debug console.
    Tty,
}

impl DebugMode {
    /// Returns the raw enum value.
    #[must_use]
    pub fn raw(self) -> i32 {
        match self {
            Self::Tty => 0,
        }
    }
}
