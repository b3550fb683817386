//! Loader and exporter seams
//!
//! The workflow never touches the filesystem or a document format directly.
//! Both go through these traits; the TOML implementations are the defaults.

use stb_core::{Result, StbError};
use stb_model::{load_document_string, save_document_string, StbDocument};
use std::fs;
use std::path::Path;

/// Reads and parses a document
pub trait DocumentLoader {
    /// Raw source text; its hash identifies the loaded document
    fn read_source(&self, path: &Path) -> Result<String>;

    fn parse(&self, source: &str) -> Result<StbDocument>;
}

/// Serializes a document for export
pub trait DocumentExporter {
    fn render(&self, document: &StbDocument) -> Result<String>;

    /// Write the rendered document to `path`, returning the byte count
    fn write(&self, document: &StbDocument, path: &Path) -> Result<usize> {
        let content = self.render(document)?;
        fs::write(path, &content)
            .map_err(|e| StbError::ExportError(format!("{}: {}", path.display(), e)))?;
        Ok(content.len())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TomlDocumentLoader;

impl DocumentLoader for TomlDocumentLoader {
    fn read_source(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path)?)
    }

    fn parse(&self, source: &str) -> Result<StbDocument> {
        load_document_string(source)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TomlDocumentExporter;

impl DocumentExporter for TomlDocumentExporter {
    fn render(&self, document: &StbDocument) -> Result<String> {
        save_document_string(document)
    }
}

/// An in-memory export, ready to be handed to the user
#[derive(Debug, Clone, PartialEq)]
pub struct RepairedFile {
    pub name: String,
    pub content: String,
}
