//! Workflow states and the transition table

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a document is in its load → export lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Idle,
    Loaded,
    Validated,
    Repaired,
    Revalidated,
    Exported,
    /// A loader or exporter failed; only `reset` leaves this state
    Error,
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Loaded => "loaded",
            WorkflowState::Validated => "validated",
            WorkflowState::Repaired => "repaired",
            WorkflowState::Revalidated => "revalidated",
            WorkflowState::Exported => "exported",
            WorkflowState::Error => "error",
        }
    }

    pub fn can_load(&self) -> bool {
        matches!(self, WorkflowState::Idle)
    }

    pub fn can_repair(&self) -> bool {
        matches!(self, WorkflowState::Validated | WorkflowState::Revalidated)
    }

    pub fn can_revalidate(&self) -> bool {
        matches!(self, WorkflowState::Repaired)
    }

    /// Export repeats are allowed so a repaired file can be saved twice
    pub fn can_export(&self) -> bool {
        matches!(self, WorkflowState::Revalidated | WorkflowState::Exported)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
