//! STB Core - Foundational types for the ST-Bridge checker
//!
//! This crate provides the types that every other STB crate depends on:
//! - `Point3` - Node coordinates in millimetres
//! - `ContentHash` - SHA-256 based document fingerprints
//! - Error types and Result alias

mod error;
mod hash;
mod types;

pub use error::{Result, StbError};
pub use hash::ContentHash;
pub use types::Point3;
