//! STB Model - the in-memory ST-Bridge document and its accessors
//!
//! XML extraction happens elsewhere; this crate owns the shape the checker
//! works on:
//! - `StbDocument` - serde model of an extracted document (persisted as TOML)
//! - `ElementKind` / `KindSpec` - the per-kind dispatch table
//! - `ModelSnapshot` - immutable accessor view built once per validation run

mod diff;
mod format;
mod io;
mod kind;
mod snapshot;

pub use diff::{compute_document_diff, has_changes};
pub use format::{
    AttrValue, Axes, AxisDef, ElementDef, NodeDef, NumericValue, SectionDef, StbDocument,
    StbModelData, StoryDef,
};
pub use io::{load_document, load_document_string, save_document, save_document_string};
pub use kind::{ElementKind, KindSpec, NodeLayout, SectionFamily, SECTION_UNSET};
pub use snapshot::{AttrRef, AxisGroup, ElementRecord, ModelSnapshot, NodeMap};
