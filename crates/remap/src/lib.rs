//! remap - rename Java classes, fields and methods from an SRG mapping table.
//!
//! This crate provides the `remap` binary. The engine lives in `remap-core`,
//! Java parsing and the source-tree driver in `remap-java`.
//!
//! ## Modules
//!
//! - `cli` - argument validation and command implementations

pub mod cli;

pub use remap_core::error::{OutputErrorCode, RemapError};
pub use remap_core::output::{ErrorInfo, ErrorResponse, SCHEMA_VERSION};
