//! The workflow state machine

use crate::event::{EventPayload, Listener, WorkflowEvent};
use crate::io::{DocumentExporter, DocumentLoader, RepairedFile, TomlDocumentExporter, TomlDocumentLoader};
use crate::state::WorkflowState;
use stb_core::{ContentHash, Result, StbError};
use stb_model::StbDocument;
use stb_validate::{
    DimensionalSectionValidator, RepairEngine, RepairOptions, RepairReport, SectionValidator,
    ValidationOptions, ValidationReport, ValidationRules, Validator,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Drives one document through load → validate → repair → revalidate → export.
///
/// The loaded document is kept as-is; repairs work on a separate copy.
/// Operations called in the wrong state fail with
/// [`StbError::InvalidTransition`] and leave everything unchanged.
pub struct Workflow {
    state: WorkflowState,
    loader: Box<dyn DocumentLoader>,
    exporter: Box<dyn DocumentExporter>,
    rules: ValidationRules,
    section_validator: Box<dyn SectionValidator>,
    validation_options: ValidationOptions,
    listeners: Vec<Listener>,

    source: Option<PathBuf>,
    source_hash: Option<ContentHash>,
    original: Option<StbDocument>,
    working: Option<StbDocument>,
    initial_report: Option<ValidationReport>,
    report: Option<ValidationReport>,
    repair_report: Option<RepairReport>,
    last_error: Option<String>,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

impl Workflow {
    /// TOML loader and exporter, default rules
    pub fn new() -> Self {
        let rules = ValidationRules::default();
        Self {
            state: WorkflowState::Idle,
            loader: Box::new(TomlDocumentLoader),
            exporter: Box::new(TomlDocumentExporter),
            section_validator: Box::new(DimensionalSectionValidator::from_rules(&rules)),
            rules,
            validation_options: ValidationOptions::default(),
            listeners: Vec::new(),
            source: None,
            source_hash: None,
            original: None,
            working: None,
            initial_report: None,
            report: None,
            repair_report: None,
            last_error: None,
        }
    }

    pub fn with_loader(mut self, loader: impl DocumentLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn with_exporter(mut self, exporter: impl DocumentExporter + 'static) -> Self {
        self.exporter = Box::new(exporter);
        self
    }

    /// Replace the rules; also rebuilds the default section validator
    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.section_validator = Box::new(DimensionalSectionValidator::from_rules(&rules));
        self.rules = rules;
        self
    }

    pub fn with_section_validator(mut self, validator: impl SectionValidator + 'static) -> Self {
        self.section_validator = Box::new(validator);
        self
    }

    pub fn with_validation_options(mut self, options: ValidationOptions) -> Self {
        self.validation_options = options;
        self
    }

    /// Register a transition listener
    pub fn on_transition(&mut self, listener: impl FnMut(&WorkflowEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Hash of the loaded source text
    pub fn source_hash(&self) -> Option<ContentHash> {
        self.source_hash
    }

    /// The document exactly as loaded
    pub fn original_document(&self) -> Option<&StbDocument> {
        self.original.as_ref()
    }

    /// The document repairs are applied to
    pub fn working_document(&self) -> Option<&StbDocument> {
        self.working.as_ref()
    }

    /// Report from the first validation after load
    pub fn initial_report(&self) -> Option<&ValidationReport> {
        self.initial_report.as_ref()
    }

    /// Most recent validation report
    pub fn report(&self) -> Option<&ValidationReport> {
        self.report.as_ref()
    }

    pub fn repair_report(&self) -> Option<&RepairReport> {
        self.repair_report.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Idle → Loaded → Validated
    pub fn load_and_validate(&mut self, path: impl AsRef<Path>) -> Result<&ValidationReport> {
        let path = path.as_ref();
        self.require(self.state.can_load(), "load a document")?;

        let loaded = self
            .loader
            .read_source(path)
            .and_then(|source| Ok((self.loader.parse(&source)?, ContentHash::of_text(&source))));
        let (document, hash) = match loaded {
            Ok(loaded) => loaded,
            Err(e) => return Err(self.fail(e)),
        };

        info!(path = %path.display(), hash = %hash.short(), "document loaded");
        self.source = Some(path.to_path_buf());
        self.source_hash = Some(hash);
        self.working = Some(document.clone());
        self.original = Some(document);
        self.transition(
            WorkflowState::Loaded,
            EventPayload::Loaded {
                source: path.to_path_buf(),
                hash,
            },
        );

        let report = self.run_validation()?;
        self.initial_report = Some(report.clone());
        self.finish_validation(report, WorkflowState::Validated)
    }

    /// Validated/Revalidated → Repaired
    pub fn execute_auto_repair(&mut self, options: &RepairOptions) -> Result<&RepairReport> {
        self.require(self.state.can_repair(), "repair")?;
        let report = self
            .report
            .as_ref()
            .ok_or_else(|| StbError::WorkflowNotReady("no validation report".to_string()))?;
        let working = self
            .working
            .as_mut()
            .ok_or_else(|| StbError::WorkflowNotReady("no working document".to_string()))?;

        let repair_report = RepairEngine::new(options).repair_in_place(working, report);
        let payload = EventPayload::Repaired {
            applied: repair_report.success_count,
            skipped: repair_report.skipped_count,
            removed: repair_report.removed_elements.clone(),
        };
        self.repair_report = Some(repair_report);
        self.transition(WorkflowState::Repaired, payload);

        self.repair_report
            .as_ref()
            .ok_or_else(|| StbError::WorkflowNotReady("no repair report".to_string()))
    }

    /// Repaired → Revalidated
    pub fn revalidate_repaired(&mut self) -> Result<&ValidationReport> {
        self.require(self.state.can_revalidate(), "revalidate")?;
        let report = self.run_validation()?;
        self.finish_validation(report, WorkflowState::Revalidated)
    }

    /// Render the working document for download; Revalidated → Exported
    pub fn download_repaired_file(&mut self, name: &str) -> Result<RepairedFile> {
        self.require(self.state.can_export(), "export")?;
        let working = self
            .working
            .as_ref()
            .ok_or_else(|| StbError::WorkflowNotReady("no working document".to_string()))?;

        let content = match self.exporter.render(working) {
            Ok(content) => content,
            Err(e) => return Err(self.fail(e)),
        };
        self.transition(
            WorkflowState::Exported,
            EventPayload::Exported {
                name: name.to_string(),
                bytes: content.len(),
            },
        );
        Ok(RepairedFile {
            name: name.to_string(),
            content,
        })
    }

    /// Write the working document to `path`; Revalidated → Exported
    pub fn export(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        self.require(self.state.can_export(), "export")?;
        let working = self
            .working
            .as_ref()
            .ok_or_else(|| StbError::WorkflowNotReady("no working document".to_string()))?;

        let bytes = match self.exporter.write(working, path) {
            Ok(bytes) => bytes,
            Err(e) => return Err(self.fail(e)),
        };
        info!(path = %path.display(), bytes, "repaired document exported");
        self.transition(
            WorkflowState::Exported,
            EventPayload::Exported {
                name: path.display().to_string(),
                bytes,
            },
        );
        Ok(bytes)
    }

    /// Drop everything and return to Idle; legal from any state
    pub fn reset(&mut self) {
        self.source = None;
        self.source_hash = None;
        self.original = None;
        self.working = None;
        self.initial_report = None;
        self.report = None;
        self.repair_report = None;
        self.last_error = None;
        self.transition(WorkflowState::Idle, EventPayload::Reset);
    }

    fn run_validation(&self) -> Result<ValidationReport> {
        let working = self
            .working
            .as_ref()
            .ok_or_else(|| StbError::WorkflowNotReady("no working document".to_string()))?;
        let validator = Validator::new(
            &self.rules,
            self.section_validator.as_ref(),
            self.validation_options,
        );
        Ok(validator.validate(working))
    }

    fn finish_validation(
        &mut self,
        report: ValidationReport,
        next: WorkflowState,
    ) -> Result<&ValidationReport> {
        let payload = EventPayload::Validated {
            valid: report.valid,
            errors: report.statistics.error_count,
            warnings: report.statistics.warning_count,
            repairable: report.statistics.repairable_count,
        };
        self.report = Some(report);
        self.transition(next, payload);
        self.report
            .as_ref()
            .ok_or_else(|| StbError::WorkflowNotReady("no validation report".to_string()))
    }

    fn require(&self, allowed: bool, action: &str) -> Result<()> {
        if allowed {
            return Ok(());
        }
        debug!(state = %self.state, action, "rejected transition");
        Err(StbError::InvalidTransition {
            state: self.state.to_string(),
            action: action.to_string(),
        })
    }

    /// Enter the Error state for a collaborator failure and hand the error back
    fn fail(&mut self, error: StbError) -> StbError {
        warn!(state = %self.state, "workflow failed: {}", error);
        let message = error.to_string();
        self.last_error = Some(message.clone());
        self.transition(WorkflowState::Error, EventPayload::Failed(message));
        error
    }

    fn transition(&mut self, next: WorkflowState, payload: EventPayload) {
        let event = WorkflowEvent {
            from: self.state,
            state: next,
            payload,
        };
        debug!(from = %event.from, to = %event.state, "transition");
        self.state = next;
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}
