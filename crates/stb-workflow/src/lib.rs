//! STB Workflow - Orchestrates load, validation, repair and export
//!
//! A [`Workflow`] is a small state machine over one document. Each
//! operation is legal only in specific states; listeners see every
//! transition synchronously and in order.

mod event;
mod io;
mod state;
mod workflow;

pub use event::{EventPayload, Listener, WorkflowEvent};
pub use io::{DocumentExporter, DocumentLoader, RepairedFile, TomlDocumentExporter, TomlDocumentLoader};
pub use state::WorkflowState;
pub use workflow::Workflow;
