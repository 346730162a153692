use std::io;

use thiserror::Error;

/// Which part of a savestate failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Header,
    StackPointer,
    Footer,
}

/// Broad categories of `Fault`, numbered like the emulator's exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Argument = 0x02,
    Init = 0x04,
    Range = 0x05,
    Io = 0x06,
    Data = 0x07,
    Subsystem = 0x08,
    Quit = 0x09,
}

/// Everything that can stop the emulator.
///
/// Every fault is fatal to the current run. `QuitRequested` is not a failure,
/// it unwinds the driving loop when the user asks to leave.
#[derive(Debug, Error)]
pub enum Fault {
    #[error("{0}")]
    Argument(String),

    #[error("could not initialise {0}")]
    Init(String),

    #[error("stack limit exceeded")]
    StackOverflow,

    #[error("stack pointer cannot be negative")]
    StackUnderflow,

    #[error("out-of-bounds RAM access at {address:#05x}")]
    OutOfBounds { address: usize },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("program is {size} bytes but at most {capacity} fit in memory")]
    ProgramTooLarge { size: usize, capacity: usize },

    #[error("savestate is invalid or malformed - {0:?}")]
    MalformedSaveState(Tag),

    #[error("{0}")]
    Subsystem(String),

    #[error("quit requested")]
    QuitRequested,
}

impl Fault {
    pub fn kind(&self) -> FaultKind {
        match self {
            Fault::Argument(_) => FaultKind::Argument,
            Fault::Init(_) => FaultKind::Init,
            Fault::StackOverflow | Fault::StackUnderflow | Fault::OutOfBounds { .. } => {
                FaultKind::Range
            }
            Fault::Io { .. } => FaultKind::Io,
            Fault::ProgramTooLarge { .. } | Fault::MalformedSaveState(_) => FaultKind::Data,
            Fault::Subsystem(_) => FaultKind::Subsystem,
            Fault::QuitRequested => FaultKind::Quit,
        }
    }

    /// Process exit status; leaving on request is a success
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            FaultKind::Quit => 0,
            kind => kind as i32,
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Fault::Io {
            context: context.into(),
            source,
        }
    }
}
