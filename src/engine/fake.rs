//! In-memory stand-in for the FMOD runtime that records every call it receives.

use super::{Backend, Bank, EventDescription, Handle, System};
use crate::error::{FmodError, FmodErrorKind, FmodResult};
use crate::flags::{DebugFlags, DebugMode, InitFlags, LoadBankFlags, StudioInitFlags};
use crate::guid::Guid;
use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
};

pub(crate) const SYSTEM_ADDRESS: usize = 0x5eed_0000;
pub(crate) const BANK_ADDRESS: usize = 0xba4c_0000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    InitializeDebug { flags: u32, mode: i32 },
    CreateSystem,
    Initialize { max_channels: i32, studio_flags: u32, flags: u32 },
    LoadBankFile(PathBuf),
    LoadSampleData(PathBuf),
    FlushSampleLoading,
    EventCount(PathBuf),
    EventList { bank: PathBuf, capacity: usize },
    EventPath(usize),
    EventId(usize),
    UnloadAll,
    FlushCommands,
    Release,
}

#[derive(Clone, Debug)]
pub(crate) struct FakeEvent {
    path: String,
    id: Guid,
}

impl FakeEvent {
    pub(crate) fn new(path: impl Into<String>, id: Guid) -> Self {
        Self {
            path: path.into(),
            id,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    banks: Vec<(PathBuf, Vec<FakeEvent>)>,
    failure: Option<(Call, FmodErrorKind)>,
    calls: RefCell<Vec<Call>>,
}

impl State {
    fn record(&self, call: Call, name: &'static str) -> FmodResult<()> {
        let failure = match &self.failure {
            Some((failing, kind)) if *failing == call => Some(*kind),
            _ => None,
        };

        self.calls.borrow_mut().push(call);

        match failure {
            Some(kind) => Err(FmodError::new(kind, name)),
            None => Ok(()),
        }
    }

    fn bank(&self, index: usize) -> &(PathBuf, Vec<FakeEvent>) {
        &self.banks[index]
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct FakeBackend {
    state: Rc<State>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn state_mut(&mut self) -> &mut State {
        Rc::get_mut(&mut self.state).expect("fake must be configured before use")
    }

    pub(crate) fn with_bank(mut self, path: impl Into<PathBuf>, events: Vec<FakeEvent>) -> Self {
        self.state_mut().banks.push((path.into(), events));
        self
    }

    pub(crate) fn failing_at(mut self, call: Call, kind: FmodErrorKind) -> Self {
        self.state_mut().failure = Some((call, kind));
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.calls.borrow().clone()
    }
}

impl Backend for FakeBackend {
    type System = FakeSystem;

    fn initialize_debug(&mut self, flags: DebugFlags, mode: DebugMode) -> FmodResult<()> {
        self.state.record(
            Call::InitializeDebug {
                flags: flags.bits(),
                mode: mode.raw(),
            },
            "FMOD_Debug_Initialize",
        )
    }

    fn create_system(&mut self) -> FmodResult<Self::System> {
        self.state
            .record(Call::CreateSystem, "FMOD_Studio_System_Create")?;

        Ok(FakeSystem {
            state: Rc::clone(&self.state),
        })
    }
}

#[derive(Debug)]
pub(crate) struct FakeSystem {
    state: Rc<State>,
}

impl Handle for FakeSystem {
    fn address(&self) -> usize {
        SYSTEM_ADDRESS
    }
}

impl System for FakeSystem {
    type Bank = FakeBank;

    fn initialize(
        &mut self,
        max_channels: i32,
        studio_flags: StudioInitFlags,
        flags: InitFlags,
    ) -> FmodResult<()> {
        self.state.record(
            Call::Initialize {
                max_channels,
                studio_flags: studio_flags.bits(),
                flags: flags.bits(),
            },
            "FMOD_Studio_System_Initialize",
        )
    }

    fn load_bank_file(&mut self, path: &Path, _flags: LoadBankFlags) -> FmodResult<Self::Bank> {
        const CALL: &str = "FMOD_Studio_System_LoadBankFile";

        self.state.record(Call::LoadBankFile(path.to_owned()), CALL)?;

        self.state
            .banks
            .iter()
            .position(|(bank, _)| bank == path)
            .map(|index| FakeBank {
                state: Rc::clone(&self.state),
                index,
            })
            .ok_or_else(|| FmodError::new(FmodErrorKind::FileNotFound, CALL))
    }

    fn flush_sample_loading(&mut self) -> FmodResult<()> {
        self.state.record(
            Call::FlushSampleLoading,
            "FMOD_Studio_System_FlushSampleLoading",
        )
    }

    fn unload_all(&mut self) -> FmodResult<()> {
        self.state
            .record(Call::UnloadAll, "FMOD_Studio_System_UnloadAll")
    }

    fn flush_commands(&mut self) -> FmodResult<()> {
        self.state
            .record(Call::FlushCommands, "FMOD_Studio_System_FlushCommands")
    }

    fn release(self) -> FmodResult<()> {
        self.state.record(Call::Release, "FMOD_Studio_System_Release")
    }
}

#[derive(Debug)]
pub(crate) struct FakeBank {
    state: Rc<State>,
    index: usize,
}

impl Handle for FakeBank {
    fn address(&self) -> usize {
        BANK_ADDRESS + self.index * 0x100
    }
}

impl Bank for FakeBank {
    type Event = FakeEventHandle;

    fn load_sample_data(&self) -> FmodResult<()> {
        let (path, _) = self.state.bank(self.index);

        self.state.record(
            Call::LoadSampleData(path.clone()),
            "FMOD_Studio_Bank_LoadSampleData",
        )
    }

    fn event_count(&self) -> FmodResult<usize> {
        let (path, events) = self.state.bank(self.index);

        self.state
            .record(Call::EventCount(path.clone()), "FMOD_Studio_Bank_GetEventCount")?;

        Ok(events.len())
    }

    fn event_list(&self, capacity: usize) -> FmodResult<Vec<Self::Event>> {
        let (path, events) = self.state.bank(self.index);

        self.state.record(
            Call::EventList {
                bank: path.clone(),
                capacity,
            },
            "FMOD_Studio_Bank_GetEventList",
        )?;

        Ok((0..events.len().min(capacity))
            .map(|event| FakeEventHandle {
                state: Rc::clone(&self.state),
                bank: self.index,
                event,
            })
            .collect())
    }
}

#[derive(Debug)]
pub(crate) struct FakeEventHandle {
    state: Rc<State>,
    bank: usize,
    event: usize,
}

impl FakeEventHandle {
    fn event(&self) -> &FakeEvent {
        &self.state.bank(self.bank).1[self.event]
    }
}

impl EventDescription for FakeEventHandle {
    fn path(&self, buf: &mut [u8]) -> FmodResult<usize> {
        const CALL: &str = "FMOD_Studio_EventDescription_GetPath";

        self.state.record(Call::EventPath(self.event), CALL)?;

        let path = self.event().path.as_bytes();

        // same contract as the runtime: copy what fits, always terminate
        let len = path.len().min(buf.len().saturating_sub(1));
        buf[..len].copy_from_slice(&path[..len]);
        if let Some(terminator) = buf.get_mut(len) {
            *terminator = 0;
        }

        if len < path.len() {
            Err(FmodError::new(FmodErrorKind::Truncated, CALL))
        } else {
            Ok(len + 1)
        }
    }

    fn id(&self) -> FmodResult<Guid> {
        self.state.record(
            Call::EventId(self.event),
            "FMOD_Studio_EventDescription_GetID",
        )?;

        Ok(self.event().id)
    }
}
