//! Core infrastructure for remap.
//!
//! This crate is language-agnostic:
//! - Canonical symbol keys and JVM descriptors
//! - SRG mapping files, consistency checks and the immutable mapping table
//! - The declaration model seam a language crate implements
//! - Run-scoped identity caches and the rename processors
//! - Patch IR for applying name edits to source text
//! - Error types, exit codes and JSON output types

pub mod cache;
pub mod derive;
pub mod engine;
pub mod error;
pub mod keys;
pub mod mapping;
pub mod model;
pub mod output;
pub mod patch;
pub mod processor;
pub mod text;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;
