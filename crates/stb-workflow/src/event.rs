//! Transition notifications

use crate::state::WorkflowState;
use stb_core::ContentHash;
use std::path::PathBuf;

/// What came with a transition
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    Loaded {
        source: PathBuf,
        hash: ContentHash,
    },
    Validated {
        valid: bool,
        errors: usize,
        warnings: usize,
        repairable: usize,
    },
    Repaired {
        applied: usize,
        skipped: usize,
        removed: Vec<String>,
    },
    Exported {
        name: String,
        bytes: usize,
    },
    Failed(String),
    Reset,
}

/// One state change, delivered to every listener
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowEvent {
    pub from: WorkflowState,
    pub state: WorkflowState,
    pub payload: EventPayload,
}

/// Listener callback; called synchronously on every transition
pub type Listener = Box<dyn FnMut(&WorkflowEvent)>;
