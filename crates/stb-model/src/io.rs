//! Document loading and saving (TOML)

use crate::format::StbDocument;
use stb_core::Result;
use std::fs;
use std::path::Path;

/// Load a document from a TOML file
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<StbDocument> {
    let content = fs::read_to_string(path)?;
    load_document_string(&content)
}

/// Load a document from a TOML string
pub fn load_document_string(content: &str) -> Result<StbDocument> {
    Ok(toml::from_str(content)?)
}

/// Save a document to a TOML file
pub fn save_document<P: AsRef<Path>>(path: P, document: &StbDocument) -> Result<()> {
    let content = save_document_string(document)?;
    fs::write(path, content)?;
    Ok(())
}

/// Serialize a document to a TOML string
pub fn save_document_string(document: &StbDocument) -> Result<String> {
    Ok(toml::to_string_pretty(document)?)
}
