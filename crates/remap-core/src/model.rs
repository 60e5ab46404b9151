//! Declaration model trait: the seam between the engine and a language.
//!
//! The engine never parses or prints source. A language crate owns the parsed
//! representation and exposes it through [`DeclarationModel`]:
//!
//! - every declaration has a [`NodeId`] that is stable for the whole run
//! - accessors report the declaration's *original* shape (qualified names and
//!   declared types as parsed), not the shape after renames applied so far
//! - [`DeclarationModel::set_simple_name`] is the only mutation the engine
//!   performs
//!
//! # Traversal
//!
//! [`DeclarationModel::declarations`] returns the nodes the engine should visit.
//! The order is the model's choice; the engine does not depend on it.
//!
//! # Example
//!
//! ```
//! use remap_core::model::{DeclarationModel, NodeId};
//! use remap_core::keys::SymbolKind;
//! use remap_core::patch::FileId;
//! use remap_core::types::Location;
//!
//! struct OneClass {
//!     name: String,
//! }
//!
//! impl DeclarationModel for OneClass {
//!     fn declarations(&self) -> Vec<NodeId> {
//!         vec![NodeId::new(FileId(0), 0)]
//!     }
//!     fn kind(&self, _node: NodeId) -> SymbolKind {
//!         SymbolKind::Class
//!     }
//!     fn simple_name(&self, _node: NodeId) -> &str {
//!         &self.name
//!     }
//!     fn qualified_name(&self, _node: NodeId) -> Option<String> {
//!         Some(format!("a.b.{}", self.name))
//!     }
//!     fn enclosing_type(&self, _node: NodeId) -> Option<NodeId> {
//!         None
//!     }
//!     fn parameter_types(&self, _node: NodeId) -> Option<Vec<String>> {
//!         None
//!     }
//!     fn return_type(&self, _node: NodeId) -> Option<String> {
//!         None
//!     }
//!     fn location(&self, _node: NodeId) -> Option<Location> {
//!         None
//!     }
//!     fn set_simple_name(&mut self, _node: NodeId, name: &str) {
//!         self.name = name.to_string();
//!     }
//! }
//!
//! let model = OneClass { name: "Old".to_string() };
//! assert_eq!(model.declarations().len(), 1);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::keys::SymbolKind;
use crate::patch::FileId;
use crate::types::Location;

/// Opaque identity of one declaration node.
///
/// Identity, not value: two structurally identical declarations in different
/// places have different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    /// File the declaration lives in.
    pub file: FileId,
    /// Arena index within that file.
    pub index: u32,
}

impl NodeId {
    /// Create a node id.
    pub fn new(file: FileId, index: u32) -> Self {
        NodeId { file, index }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.file, self.index)
    }
}

/// Read access to declarations plus the single rename mutation.
pub trait DeclarationModel {
    /// Nodes to visit, in the model's traversal order.
    fn declarations(&self) -> Vec<NodeId>;

    /// Category of a declaration.
    fn kind(&self, node: NodeId) -> SymbolKind;

    /// Current simple name (reflects renames already applied).
    fn simple_name(&self, node: NodeId) -> &str;

    /// Original fully-qualified binary name of a type declaration.
    ///
    /// `None` for non-type nodes and for types with no stable name (anonymous
    /// or local classes).
    fn qualified_name(&self, node: NodeId) -> Option<String>;

    /// The immediately enclosing named type declaration, if it has one.
    fn enclosing_type(&self, node: NodeId) -> Option<NodeId>;

    /// Declared parameter types of a method as qualified names, in order.
    ///
    /// `None` if the node is not a method or a type could not be resolved.
    fn parameter_types(&self, node: NodeId) -> Option<Vec<String>>;

    /// Declared return type of a method as a qualified name.
    fn return_type(&self, node: NodeId) -> Option<String>;

    /// Where the declaration's name appears, for reporting.
    fn location(&self, node: NodeId) -> Option<Location>;

    /// Replace the declaration's simple name. Nothing else may change.
    fn set_simple_name(&mut self, node: NodeId, name: &str);
}
