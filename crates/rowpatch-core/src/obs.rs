//! Patch run tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect
//! execution semantics.

use crate::error::PatchResultCode;
use std::{fmt, path::PathBuf};

///
/// PatchTraceSink
///

pub trait PatchTraceSink: Send + Sync {
    fn on_event(&self, event: PatchTraceEvent);
}

///
/// PatchPhase
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PatchPhase {
    Lookup,
    Add,
    Update,
}

impl fmt::Display for PatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Lookup => "lookup",
            Self::Add => "add",
            Self::Update => "update",
        };
        write!(f, "{label}")
    }
}

///
/// PatchTraceEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PatchTraceEvent {
    RunStart {
        instructions: usize,
    },
    PhaseStart {
        phase: PatchPhase,
        instructions: usize,
    },
    InstructionFinished {
        phase: PatchPhase,
        index: usize,
        file: String,
        code: PatchResultCode,
    },
    Committed {
        files: Vec<PathBuf>,
    },
    Aborted {
        phase: PatchPhase,
        index: usize,
        code: PatchResultCode,
    },
    CommitFailed {
        code: PatchResultCode,
    },
}
