//! Binding to the FMOD shared libraries, resolved at run time.
//!
//! The core library (`fmod`) and the Studio library (`fmodstudio`) are opened with
//! `libloading`, so the crate builds without the FMOD SDK. Set `FMOD_LIBRARY_DIR` to load
//! them from a specific directory instead of the platform search path, and
//! `FMOD_HEADER_VERSION` (hex, e.g. `0x00020308`) when the libraries are not FMOD 2.02.

use super::{Backend, Bank, EventDescription, Handle, System};
use crate::error::{check, FmodError, FmodErrorKind, FmodResult, LibraryError, LibraryErrorKind};
use crate::flags::{DebugFlags, DebugMode, InitFlags, LoadBankFlags, StudioInitFlags};
use crate::guid::Guid;
use libloading::{library_filename, Library};
use std::{
    env,
    ffi::{c_char, c_int, c_uint, c_void, CString, OsStr},
    path::{Path, PathBuf},
    ptr,
    rc::Rc,
};
use tap::Pipe;

/// Default header version passed to `FMOD_Studio_System_Create` (FMOD 2.02.22).
pub const HEADER_VERSION: u32 = 0x0002_0222;

/// Environment variable overriding [`HEADER_VERSION`], in hex.
pub const HEADER_VERSION_VAR: &str = "FMOD_HEADER_VERSION";

/// Environment variable naming the directory that holds the FMOD libraries.
pub const LIBRARY_DIR_VAR: &str = "FMOD_LIBRARY_DIR";

const CORE_LIBRARY: &str = "fmod";
const STUDIO_LIBRARY: &str = "fmodstudio";

type DebugInitializeFn = unsafe extern "C" fn(c_uint, c_int, *mut c_void, *const c_char) -> c_int;
type SystemCreateFn = unsafe extern "C" fn(*mut *mut c_void, c_uint) -> c_int;
type SystemInitializeFn =
    unsafe extern "C" fn(*mut c_void, c_int, c_uint, c_uint, *mut c_void) -> c_int;
type SystemLoadBankFileFn =
    unsafe extern "C" fn(*mut c_void, *const c_char, c_uint, *mut *mut c_void) -> c_int;
type SystemFn = unsafe extern "C" fn(*mut c_void) -> c_int;
type BankFn = unsafe extern "C" fn(*mut c_void) -> c_int;
type BankGetEventCountFn = unsafe extern "C" fn(*mut c_void, *mut c_int) -> c_int;
type BankGetEventListFn =
    unsafe extern "C" fn(*mut c_void, *mut *mut c_void, c_int, *mut c_int) -> c_int;
type EventGetPathFn = unsafe extern "C" fn(*mut c_void, *mut c_char, c_int, *mut c_int) -> c_int;
type EventGetIdFn = unsafe extern "C" fn(*mut c_void, *mut Guid) -> c_int;

// The libraries must outlive every function pointer copied out of them, so they are kept here.
#[derive(Debug)]
struct Api {
    debug_initialize: DebugInitializeFn,
    system_create: SystemCreateFn,
    system_initialize: SystemInitializeFn,
    system_load_bank_file: SystemLoadBankFileFn,
    system_flush_sample_loading: SystemFn,
    system_unload_all: SystemFn,
    system_flush_commands: SystemFn,
    system_release: SystemFn,
    bank_load_sample_data: BankFn,
    bank_get_event_count: BankGetEventCountFn,
    bank_get_event_list: BankGetEventListFn,
    event_get_path: EventGetPathFn,
    event_get_id: EventGetIdFn,
    _studio: Library,
    _core: Library,
}

impl Api {
    fn load(dir: Option<&Path>) -> Result<Self, LibraryError> {
        let core = open(dir, CORE_LIBRARY)?;
        let studio = open(dir, STUDIO_LIBRARY)?;

        // SAFETY: each type alias matches the C declaration of the named function.
        unsafe {
            Ok(Self {
                debug_initialize: symbol(&core, "FMOD_Debug_Initialize")?,
                system_create: symbol(&studio, "FMOD_Studio_System_Create")?,
                system_initialize: symbol(&studio, "FMOD_Studio_System_Initialize")?,
                system_load_bank_file: symbol(&studio, "FMOD_Studio_System_LoadBankFile")?,
                system_flush_sample_loading: symbol(
                    &studio,
                    "FMOD_Studio_System_FlushSampleLoading",
                )?,
                system_unload_all: symbol(&studio, "FMOD_Studio_System_UnloadAll")?,
                system_flush_commands: symbol(&studio, "FMOD_Studio_System_FlushCommands")?,
                system_release: symbol(&studio, "FMOD_Studio_System_Release")?,
                bank_load_sample_data: symbol(&studio, "FMOD_Studio_Bank_LoadSampleData")?,
                bank_get_event_count: symbol(&studio, "FMOD_Studio_Bank_GetEventCount")?,
                bank_get_event_list: symbol(&studio, "FMOD_Studio_Bank_GetEventList")?,
                event_get_path: symbol(&studio, "FMOD_Studio_EventDescription_GetPath")?,
                event_get_id: symbol(&studio, "FMOD_Studio_EventDescription_GetID")?,
                _studio: studio,
                _core: core,
            })
        }
    }
}

fn library_path(dir: Option<&Path>, name: &str) -> PathBuf {
    let file = library_filename(name);

    match dir {
        Some(dir) => dir.join(file),
        None => PathBuf::from(file),
    }
}

fn open(dir: Option<&Path>, name: &str) -> Result<Library, LibraryError> {
    let path = library_path(dir, name);

    log::debug!("opening {}", path.display());

    // SAFETY: the FMOD libraries run no initialization code with preconditions on load.
    unsafe { Library::new(&path) }.map_err(LibraryError::factory(LibraryErrorKind::Open {
        library: path.display().to_string(),
    }))
}

fn parse_header_version(value: &OsStr) -> Option<u32> {
    let value = value.to_str()?.trim();
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    u32::from_str_radix(digits, 16).ok()
}

/// # Safety
/// `T` must be the function pointer type matching the exported symbol's C signature.
unsafe fn symbol<T: Copy>(library: &Library, name: &'static str) -> Result<T, LibraryError> {
    // SAFETY: upheld by the caller.
    unsafe { library.get::<T>(name.as_bytes()) }
        .map(|symbol| *symbol)
        .map_err(LibraryError::factory(LibraryErrorKind::Symbol { symbol: name }))
}

/// The FMOD runtime, loaded from its shared libraries.
#[derive(Debug)]
pub struct NativeBackend {
    api: Rc<Api>,
    header_version: u32,
}

impl NativeBackend {
    /// Loads the libraries from `FMOD_LIBRARY_DIR`, or from the platform search path if the
    /// variable is not set. `FMOD_HEADER_VERSION` replaces [`HEADER_VERSION`] when it holds a
    /// valid hex number.
    ///
    /// # Errors
    /// Returns an error if a library cannot be opened or lacks a required function.
    pub fn load() -> Result<Self, LibraryError> {
        let backend = env::var_os(LIBRARY_DIR_VAR)
            .as_deref()
            .map(Path::new)
            .pipe(Self::load_from)?;

        let Some(value) = env::var_os(HEADER_VERSION_VAR) else {
            return Ok(backend);
        };

        match parse_header_version(&value) {
            Some(version) => Ok(backend.with_header_version(version)),
            None => {
                log::warn!(
                    "ignoring {HEADER_VERSION_VAR}={value:?}, using 0x{HEADER_VERSION:08x}"
                );
                Ok(backend)
            }
        }
    }

    /// Loads the libraries from `dir`, or from the platform search path if `dir` is `None`.
    ///
    /// # Errors
    /// Returns an error if a library cannot be opened or lacks a required function.
    pub fn load_from(dir: Option<&Path>) -> Result<Self, LibraryError> {
        let api = Api::load(dir)?;

        log::info!(
            "loaded {} and {}",
            library_path(dir, CORE_LIBRARY).display(),
            library_path(dir, STUDIO_LIBRARY).display()
        );

        Ok(Self {
            api: Rc::new(api),
            header_version: HEADER_VERSION,
        })
    }

    /// Uses `version` instead of [`HEADER_VERSION`] when creating the studio system.
    #[must_use]
    pub fn with_header_version(self, version: u32) -> Self {
        Self {
            header_version: version,
            ..self
        }
    }
}

impl Backend for NativeBackend {
    type System = NativeSystem;

    fn initialize_debug(&mut self, flags: DebugFlags, mode: DebugMode) -> FmodResult<()> {
        // SAFETY: a null callback and file name are accepted for TTY output.
        let code = unsafe {
            (self.api.debug_initialize)(flags.bits(), mode.raw(), ptr::null_mut(), ptr::null())
        };
        check(code, "FMOD_Debug_Initialize")
    }

    fn create_system(&mut self) -> FmodResult<Self::System> {
        let mut raw: *mut c_void = ptr::null_mut();

        log::debug!("creating studio system, header version 0x{:08x}", self.header_version);

        // SAFETY: `raw` is a valid out-pointer.
        let code = unsafe { (self.api.system_create)(&mut raw, self.header_version) };
        check(code, "FMOD_Studio_System_Create")?;

        Ok(NativeSystem {
            api: Rc::clone(&self.api),
            raw,
        })
    }
}

/// A studio system owned by the native runtime.
#[derive(Debug)]
pub struct NativeSystem {
    api: Rc<Api>,
    raw: *mut c_void,
}

impl Handle for NativeSystem {
    fn address(&self) -> usize {
        self.raw as usize
    }
}

impl System for NativeSystem {
    type Bank = NativeBank;

    fn initialize(
        &mut self,
        max_channels: i32,
        studio_flags: StudioInitFlags,
        flags: InitFlags,
    ) -> FmodResult<()> {
        // SAFETY: `raw` came from `FMOD_Studio_System_Create`.
        let code = unsafe {
            (self.api.system_initialize)(
                self.raw,
                max_channels,
                studio_flags.bits(),
                flags.bits(),
                ptr::null_mut(),
            )
        };
        check(code, "FMOD_Studio_System_Initialize")
    }

    fn load_bank_file(&mut self, path: &Path, flags: LoadBankFlags) -> FmodResult<Self::Bank> {
        const CALL: &str = "FMOD_Studio_System_LoadBankFile";

        let path = CString::new(path.as_os_str().as_encoded_bytes())
            .map_err(|_| FmodError::new(FmodErrorKind::InvalidParam, CALL))?;
        let mut raw: *mut c_void = ptr::null_mut();

        // SAFETY: `path` is NUL-terminated and `raw` is a valid out-pointer.
        let code = unsafe {
            (self.api.system_load_bank_file)(self.raw, path.as_ptr(), flags.bits(), &mut raw)
        };
        check(code, CALL)?;

        Ok(NativeBank {
            api: Rc::clone(&self.api),
            raw,
        })
    }

    fn flush_sample_loading(&mut self) -> FmodResult<()> {
        // SAFETY: `raw` came from `FMOD_Studio_System_Create`.
        let code = unsafe { (self.api.system_flush_sample_loading)(self.raw) };
        check(code, "FMOD_Studio_System_FlushSampleLoading")
    }

    fn unload_all(&mut self) -> FmodResult<()> {
        // SAFETY: `raw` came from `FMOD_Studio_System_Create`.
        let code = unsafe { (self.api.system_unload_all)(self.raw) };
        check(code, "FMOD_Studio_System_UnloadAll")
    }

    fn flush_commands(&mut self) -> FmodResult<()> {
        // SAFETY: `raw` came from `FMOD_Studio_System_Create`.
        let code = unsafe { (self.api.system_flush_commands)(self.raw) };
        check(code, "FMOD_Studio_System_FlushCommands")
    }

    fn release(self) -> FmodResult<()> {
        // SAFETY: `raw` came from `FMOD_Studio_System_Create` and is not used afterwards.
        let code = unsafe { (self.api.system_release)(self.raw) };
        check(code, "FMOD_Studio_System_Release")
    }
}

/// A bank loaded by a [`NativeSystem`].
#[derive(Debug)]
pub struct NativeBank {
    api: Rc<Api>,
    raw: *mut c_void,
}

impl Handle for NativeBank {
    fn address(&self) -> usize {
        self.raw as usize
    }
}

impl Bank for NativeBank {
    type Event = NativeEvent;

    fn load_sample_data(&self) -> FmodResult<()> {
        // SAFETY: `raw` came from `FMOD_Studio_System_LoadBankFile`.
        let code = unsafe { (self.api.bank_load_sample_data)(self.raw) };
        check(code, "FMOD_Studio_Bank_LoadSampleData")
    }

    fn event_count(&self) -> FmodResult<usize> {
        let mut count: c_int = 0;

        // SAFETY: `raw` came from `FMOD_Studio_System_LoadBankFile`.
        let code = unsafe { (self.api.bank_get_event_count)(self.raw, &mut count) };
        check(code, "FMOD_Studio_Bank_GetEventCount")?;

        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn event_list(&self, capacity: usize) -> FmodResult<Vec<Self::Event>> {
        const CALL: &str = "FMOD_Studio_Bank_GetEventList";

        let raw_capacity = c_int::try_from(capacity)
            .map_err(|_| FmodError::new(FmodErrorKind::InvalidParam, CALL))?;
        let mut list: Vec<*mut c_void> = vec![ptr::null_mut(); capacity];
        let mut count: c_int = 0;

        // SAFETY: `list` has room for `raw_capacity` handles.
        let code = unsafe {
            (self.api.bank_get_event_list)(self.raw, list.as_mut_ptr(), raw_capacity, &mut count)
        };
        check(code, CALL)?;

        list.truncate(usize::try_from(count).unwrap_or_default());

        Ok(list
            .into_iter()
            .map(|raw| NativeEvent {
                api: Rc::clone(&self.api),
                raw,
            })
            .collect())
    }
}

/// An event description from a [`NativeBank`].
#[derive(Debug)]
pub struct NativeEvent {
    api: Rc<Api>,
    raw: *mut c_void,
}

impl Handle for NativeEvent {
    fn address(&self) -> usize {
        self.raw as usize
    }
}

impl EventDescription for NativeEvent {
    fn path(&self, buf: &mut [u8]) -> FmodResult<usize> {
        const CALL: &str = "FMOD_Studio_EventDescription_GetPath";

        let size = c_int::try_from(buf.len())
            .map_err(|_| FmodError::new(FmodErrorKind::InvalidParam, CALL))?;
        let mut retrieved: c_int = 0;

        // SAFETY: `buf` is writable for `size` bytes.
        let code = unsafe {
            (self.api.event_get_path)(
                self.raw,
                buf.as_mut_ptr().cast::<c_char>(),
                size,
                &mut retrieved,
            )
        };
        check(code, CALL)?;

        Ok(usize::try_from(retrieved).unwrap_or_default())
    }

    fn id(&self) -> FmodResult<Guid> {
        let mut id = Guid::default();

        // SAFETY: `Guid` has the layout of `FMOD_GUID`.
        let code = unsafe { (self.api.event_get_id)(self.raw, &mut id) };
        check(code, "FMOD_Studio_EventDescription_GetID")?;

        Ok(id)
    }
}
