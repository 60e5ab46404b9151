//! Java support for remap.
//!
//! - [`lexer`] and [`parser`]: declaration-level parsing of one source file
//! - [`resolve`]: declared type names to qualified binary names
//! - [`unit`]: [`JavaUnit`], the [`DeclarationModel`](remap_core::model::DeclarationModel)
//!   implementation and printer
//! - [`files`] and [`transform`]: the source-tree driver

pub mod error;
pub mod files;
pub mod lexer;
pub mod parser;
pub mod resolve;
pub mod transform;
pub mod unit;

pub use error::{JavaError, JavaResult, SyntaxError};
pub use transform::{transform_tree, TransformConfig, TransformReport};
pub use resolve::TypeIndex;
pub use unit::{JavaUnit, ParsedFile};
