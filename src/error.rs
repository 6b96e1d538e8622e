//! Errors returned by the FMOD runtime and by library loading.

use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// Result of a call into the FMOD runtime.
pub type FmodResult<T> = Result<T, FmodError>;

/// Maps a raw `FMOD_RESULT` returned by `call` to a [`FmodResult`].
pub(crate) fn check(code: i32, call: &'static str) -> FmodResult<()> {
    match code {
        0 => Ok(()),
        code => Err(FmodError::new(FmodErrorKind::from_code(code), call)),
    }
}

/// A failed call into the FMOD runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FmodError {
    kind: FmodErrorKind,
    call: &'static str,
}

impl FmodError {
    /// Creates an error of the given kind, attributed to the named runtime function.
    #[must_use]
    pub fn new(kind: FmodErrorKind, call: &'static str) -> Self {
        Self { kind, call }
    }

    /// Returns what went wrong.
    #[must_use]
    pub fn kind(&self) -> FmodErrorKind {
        self.kind
    }

    /// Returns the name of the runtime function that failed.
    #[must_use]
    pub fn call(&self) -> &'static str {
        self.call
    }

    /// Returns the raw `FMOD_RESULT` value.
    #[must_use]
    pub fn code(&self) -> i32 {
        self.kind.code()
    }
}

impl Display for FmodError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&format!(
            "{} failed: {} (FMOD_RESULT {})",
            self.call,
            self.kind,
            self.code()
        ))
    }
}

impl Error for FmodError {}

/// Failure variants of `FMOD_RESULT`.
///
/// Codes the runtime may add in later versions are kept as [`FmodErrorKind::Unknown`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum FmodErrorKind {
    BadCommand,
    ChannelAlloc,
    ChannelStolen,
    Dma,
    DspConnection,
    DspDontProcess,
    DspFormat,
    DspInUse,
    DspNotFound,
    DspReserved,
    DspSilence,
    DspType,
    FileBad,
    FileCouldNotSeek,
    FileDiskEjected,
    FileEof,
    FileEndOfData,
    FileNotFound,
    Format,
    HeaderMismatch,
    Http,
    HttpAccess,
    HttpProxyAuth,
    HttpServerError,
    HttpTimeout,
    Initialization,
    Initialized,
    Internal,
    InvalidFloat,
    InvalidHandle,
    InvalidParam,
    InvalidPosition,
    InvalidSpeaker,
    InvalidSyncPoint,
    InvalidThread,
    InvalidVector,
    MaxAudible,
    Memory,
    MemoryCantPoint,
    Needs3d,
    NeedsHardware,
    NetConnect,
    NetSocketError,
    NetUrl,
    NetWouldBlock,
    NotReady,
    OutputAllocated,
    OutputCreateBuffer,
    OutputDriverCall,
    OutputFormat,
    OutputInit,
    OutputNoDrivers,
    Plugin,
    PluginMissing,
    PluginResource,
    PluginVersion,
    Record,
    ReverbChannelGroup,
    ReverbInstance,
    Subsounds,
    SubsoundAllocated,
    SubsoundCantMove,
    TagNotFound,
    TooManyChannels,
    Truncated,
    Unimplemented,
    Uninitialized,
    Unsupported,
    Version,
    EventAlreadyLoaded,
    EventLiveUpdateBusy,
    EventLiveUpdateMismatch,
    EventLiveUpdateTimeout,
    EventNotFound,
    StudioUninitialized,
    StudioNotLoaded,
    InvalidString,
    AlreadyLocked,
    NotLocked,
    RecordDisconnected,
    TooManySamples,
    /// A code this crate does not know about.
    Unknown(i32),
}

impl FmodErrorKind {
    /// Maps a non-zero `FMOD_RESULT` to its variant.
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        use FmodErrorKind::*;

        match code {
            1 => BadCommand,
            2 => ChannelAlloc,
            3 => ChannelStolen,
            4 => Dma,
            5 => DspConnection,
            6 => DspDontProcess,
            7 => DspFormat,
            8 => DspInUse,
            9 => DspNotFound,
            10 => DspReserved,
            11 => DspSilence,
            12 => DspType,
            13 => FileBad,
            14 => FileCouldNotSeek,
            15 => FileDiskEjected,
            16 => FileEof,
            17 => FileEndOfData,
            18 => FileNotFound,
            19 => Format,
            20 => HeaderMismatch,
            21 => Http,
            22 => HttpAccess,
            23 => HttpProxyAuth,
            24 => HttpServerError,
            25 => HttpTimeout,
            26 => Initialization,
            27 => Initialized,
            28 => Internal,
            29 => InvalidFloat,
            30 => InvalidHandle,
            31 => InvalidParam,
            32 => InvalidPosition,
            33 => InvalidSpeaker,
            34 => InvalidSyncPoint,
            35 => InvalidThread,
            36 => InvalidVector,
            37 => MaxAudible,
            38 => Memory,
            39 => MemoryCantPoint,
            40 => Needs3d,
            41 => NeedsHardware,
            42 => NetConnect,
            43 => NetSocketError,
            44 => NetUrl,
            45 => NetWouldBlock,
            46 => NotReady,
            47 => OutputAllocated,
            48 => OutputCreateBuffer,
            49 => OutputDriverCall,
            50 => OutputFormat,
            51 => OutputInit,
            52 => OutputNoDrivers,
            53 => Plugin,
            54 => PluginMissing,
            55 => PluginResource,
            56 => PluginVersion,
            57 => Record,
            58 => ReverbChannelGroup,
            59 => ReverbInstance,
            60 => Subsounds,
            61 => SubsoundAllocated,
            62 => SubsoundCantMove,
            63 => TagNotFound,
            64 => TooManyChannels,
            65 => Truncated,
            66 => Unimplemented,
            67 => Uninitialized,
            68 => Unsupported,
            69 => Version,
            70 => EventAlreadyLoaded,
            71 => EventLiveUpdateBusy,
            72 => EventLiveUpdateMismatch,
            73 => EventLiveUpdateTimeout,
            74 => EventNotFound,
            75 => StudioUninitialized,
            76 => StudioNotLoaded,
            77 => InvalidString,
            78 => AlreadyLocked,
            79 => NotLocked,
            80 => RecordDisconnected,
            81 => TooManySamples,
            code => Unknown(code),
        }
    }

    /// Returns the raw `FMOD_RESULT` value.
    #[must_use]
    pub fn code(self) -> i32 {
        use FmodErrorKind::*;

        match self {
            BadCommand => 1,
            ChannelAlloc => 2,
            ChannelStolen => 3,
            Dma => 4,
            DspConnection => 5,
            DspDontProcess => 6,
            DspFormat => 7,
            DspInUse => 8,
            DspNotFound => 9,
            DspReserved => 10,
            DspSilence => 11,
            DspType => 12,
            FileBad => 13,
            FileCouldNotSeek => 14,
            FileDiskEjected => 15,
            FileEof => 16,
            FileEndOfData => 17,
            FileNotFound => 18,
            Format => 19,
            HeaderMismatch => 20,
            Http => 21,
            HttpAccess => 22,
            HttpProxyAuth => 23,
            HttpServerError => 24,
            HttpTimeout => 25,
            Initialization => 26,
            Initialized => 27,
            Internal => 28,
            InvalidFloat => 29,
            InvalidHandle => 30,
            InvalidParam => 31,
            InvalidPosition => 32,
            InvalidSpeaker => 33,
            InvalidSyncPoint => 34,
            InvalidThread => 35,
            InvalidVector => 36,
            MaxAudible => 37,
            Memory => 38,
            MemoryCantPoint => 39,
            Needs3d => 40,
            NeedsHardware => 41,
            NetConnect => 42,
            NetSocketError => 43,
            NetUrl => 44,
            NetWouldBlock => 45,
            NotReady => 46,
            OutputAllocated => 47,
            OutputCreateBuffer => 48,
            OutputDriverCall => 49,
            OutputFormat => 50,
            OutputInit => 51,
            OutputNoDrivers => 52,
            Plugin => 53,
            PluginMissing => 54,
            PluginResource => 55,
            PluginVersion => 56,
            Record => 57,
            ReverbChannelGroup => 58,
            ReverbInstance => 59,
            Subsounds => 60,
            SubsoundAllocated => 61,
            SubsoundCantMove => 62,
            TagNotFound => 63,
            TooManyChannels => 64,
            Truncated => 65,
            Unimplemented => 66,
            Uninitialized => 67,
            Unsupported => 68,
            Version => 69,
            EventAlreadyLoaded => 70,
            EventLiveUpdateBusy => 71,
            EventLiveUpdateMismatch => 72,
            EventLiveUpdateTimeout => 73,
            EventNotFound => 74,
            StudioUninitialized => 75,
            StudioNotLoaded => 76,
            InvalidString => 77,
            AlreadyLocked => 78,
            NotLocked => 79,
            RecordDisconnected => 80,
            TooManySamples => 81,
            Unknown(code) => code,
        }
    }
}

impl Display for FmodErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        use FmodErrorKind::*;

        match self {
            BadCommand => f.write_str("command not supported by this object or function"),
            ChannelAlloc => f.write_str("failed to allocate a channel"),
            ChannelStolen => f.write_str("channel was stolen and reused"),
            Dma => f.write_str("DMA failure"),
            DspConnection => f.write_str("DSP connection error"),
            DspDontProcess => f.write_str("DSP skipped processing"),
            DspFormat => f.write_str("DSP format error"),
            DspInUse => f.write_str("DSP is already in the mixer's DSP network"),
            DspNotFound => f.write_str("DSP unit not found"),
            DspReserved => f.write_str("DSP operation not allowed on a reserved unit"),
            DspSilence => f.write_str("DSP returned silence"),
            DspType => f.write_str("DSP operation not valid for this DSP type"),
            FileBad => f.write_str("error loading file"),
            FileCouldNotSeek => f.write_str("couldn't seek within the file"),
            FileDiskEjected => f.write_str("media was ejected while reading"),
            FileEof => f.write_str("end of file unexpectedly reached"),
            FileEndOfData => f.write_str("end of current chunk reached"),
            FileNotFound => f.write_str("file not found"),
            Format => f.write_str("unsupported file or audio format"),
            HeaderMismatch => f.write_str("version mismatch between header and library"),
            Http => f.write_str("HTTP error"),
            HttpAccess => f.write_str("HTTP access denied"),
            HttpProxyAuth => f.write_str("HTTP proxy authentication required"),
            HttpServerError => f.write_str("HTTP server error"),
            HttpTimeout => f.write_str("HTTP request timed out"),
            Initialization => f.write_str("object was not initialized correctly"),
            Initialized => f.write_str("object was already initialized"),
            Internal => f.write_str("internal runtime error"),
            InvalidFloat => f.write_str("value passed was NaN or infinite"),
            InvalidHandle => f.write_str("invalid handle"),
            InvalidParam => f.write_str("invalid parameter"),
            InvalidPosition => f.write_str("invalid seek position"),
            InvalidSpeaker => f.write_str("invalid speaker for the current speaker mode"),
            InvalidSyncPoint => f.write_str("sync point did not come from this sound"),
            InvalidThread => f.write_str("called from a thread that is not allowed"),
            InvalidVector => f.write_str("vectors must be unit length and perpendicular"),
            MaxAudible => f.write_str("maximum audible playback count reached"),
            Memory => f.write_str("not enough memory or resources"),
            MemoryCantPoint => f.write_str("cannot point to memory for this sound"),
            Needs3d => f.write_str("operation requires a 3D sound"),
            NeedsHardware => f.write_str("operation requires hardware support"),
            NetConnect => f.write_str("couldn't connect to the specified host"),
            NetSocketError => f.write_str("network socket error"),
            NetUrl => f.write_str("couldn't resolve the specified URL"),
            NetWouldBlock => f.write_str("non-blocking socket operation would block"),
            NotReady => f.write_str("operation could not be performed yet"),
            OutputAllocated => f.write_str("output device is already in use"),
            OutputCreateBuffer => f.write_str("error creating output buffer"),
            OutputDriverCall => f.write_str("output driver call failed"),
            OutputFormat => f.write_str("output device does not support this format"),
            OutputInit => f.write_str("error initializing output device"),
            OutputNoDrivers => f.write_str("no sound devices available"),
            Plugin => f.write_str("plugin error"),
            PluginMissing => f.write_str("required plugin not found"),
            PluginResource => f.write_str("plugin resource could not be found"),
            PluginVersion => f.write_str("plugin built with an unsupported SDK version"),
            Record => f.write_str("error initializing recording"),
            ReverbChannelGroup => f.write_str("reverb instance already in use"),
            ReverbInstance => f.write_str("invalid reverb instance"),
            Subsounds => f.write_str("operation not valid on a parent sound"),
            SubsoundAllocated => f.write_str("subsound already used by another parent"),
            SubsoundCantMove => f.write_str("subsound cannot be moved"),
            TagNotFound => f.write_str("tag not found"),
            TooManyChannels => f.write_str("too many channels requested"),
            Truncated => f.write_str("string was truncated to fit the buffer"),
            Unimplemented => f.write_str("feature not implemented"),
            Uninitialized => f.write_str("runtime is not initialized"),
            Unsupported => f.write_str("operation not supported"),
            Version => f.write_str("incorrect data version"),
            EventAlreadyLoaded => f.write_str("bank is already loaded"),
            EventLiveUpdateBusy => f.write_str("live update connection is busy"),
            EventLiveUpdateMismatch => f.write_str("live update data does not match the project"),
            EventLiveUpdateTimeout => f.write_str("live update connection timed out"),
            EventNotFound => f.write_str("event or bank entry not found"),
            StudioUninitialized => f.write_str("studio system is not initialized"),
            StudioNotLoaded => f.write_str("object is not loaded"),
            InvalidString => f.write_str("invalid string"),
            AlreadyLocked => f.write_str("resource is already locked"),
            NotLocked => f.write_str("resource is not locked"),
            RecordDisconnected => f.write_str("recording device was disconnected"),
            TooManySamples => f.write_str("too many samples requested"),
            Unknown(_) => f.write_str("unrecognized error"),
        }
    }
}

/// The FMOD shared libraries could not be bound.
#[derive(Debug)]
pub struct LibraryError {
    kind: LibraryErrorKind,
    source: libloading::Error,
}

/// Which part of binding the FMOD shared libraries failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LibraryErrorKind {
    /// The library file could not be opened.
    Open {
        /// File name or path that was tried.
        library: String,
    },
    /// The library was opened but lacks an exported function.
    Symbol {
        /// Name of the missing function.
        symbol: &'static str,
    },
}

impl LibraryError {
    pub(crate) fn factory(kind: LibraryErrorKind) -> impl FnOnce(libloading::Error) -> Self {
        move |source| Self { kind, source }
    }

    /// Returns which part of binding failed.
    #[must_use]
    pub fn kind(&self) -> &LibraryErrorKind {
        &self.kind
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.kind {
            LibraryErrorKind::Open { library } => {
                f.write_str(&format!("failed to load FMOD library '{library}'"))
            }
            LibraryErrorKind::Symbol { symbol } => {
                f.write_str(&format!("FMOD library does not export '{symbol}'"))
            }
        }
    }
}

impl Error for LibraryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

#[cfg(test)]
mod test {
    use super::{check, FmodError, FmodErrorKind};

    #[test]
    fn success_is_not_an_error() {
        assert_eq!(check(0, "FMOD_Studio_System_Create"), Ok(()));
    }

    #[test]
    fn failure_codes_keep_their_call() {
        let error = check(18, "FMOD_Studio_System_LoadBankFile").unwrap_err();

        assert_eq!(error.kind(), FmodErrorKind::FileNotFound);
        assert_eq!(error.code(), 18);
        assert_eq!(error.call(), "FMOD_Studio_System_LoadBankFile");
        assert_eq!(
            error.to_string(),
            "FMOD_Studio_System_LoadBankFile failed: file not found (FMOD_RESULT 18)"
        );
    }

    #[test]
    fn every_known_code_maps_back() {
        for code in 1..=81 {
            let kind = FmodErrorKind::from_code(code);

            assert!(!matches!(kind, FmodErrorKind::Unknown(_)), "code {code}");
            assert_eq!(kind.code(), code);
        }
    }

    #[test]
    fn unknown_codes_are_preserved() {
        for code in [-1, 82, 1000] {
            assert_eq!(FmodErrorKind::from_code(code), FmodErrorKind::Unknown(code));
            assert_eq!(FmodError::new(FmodErrorKind::Unknown(code), "f").code(), code);
        }
    }

    #[test]
    fn truncation_has_its_own_kind() {
        assert_eq!(FmodErrorKind::from_code(65), FmodErrorKind::Truncated);
    }
}
