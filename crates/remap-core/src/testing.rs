//! In-memory declaration model for unit tests.

use crate::keys::SymbolKind;
use crate::model::{DeclarationModel, NodeId};
use crate::patch::FileId;
use crate::types::Location;

#[derive(Debug, Clone)]
struct FakeDecl {
    kind: SymbolKind,
    name: String,
    qualified: Option<String>,
    owner: Option<NodeId>,
    params: Vec<String>,
    ret: Option<String>,
}

/// Flat list of declarations addressed by index in `FileId(0)`.
#[derive(Debug, Default)]
pub(crate) struct FakeModel {
    decls: Vec<FakeDecl>,
    reversed: bool,
    pub(crate) renames: usize,
}

impl FakeModel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, decl: FakeDecl) -> NodeId {
        self.decls.push(decl);
        NodeId::new(FileId(0), (self.decls.len() - 1) as u32)
    }

    fn decl(&self, node: NodeId) -> &FakeDecl {
        &self.decls[node.index as usize]
    }

    pub(crate) fn class(&mut self, package: &str, name: &str) -> NodeId {
        let qualified = if package.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", package, name)
        };
        self.push(FakeDecl {
            kind: SymbolKind::Class,
            name: name.to_string(),
            qualified: Some(qualified),
            owner: None,
            params: Vec::new(),
            ret: None,
        })
    }

    pub(crate) fn anonymous_class(&mut self) -> NodeId {
        self.push(FakeDecl {
            kind: SymbolKind::Class,
            name: String::new(),
            qualified: None,
            owner: None,
            params: Vec::new(),
            ret: None,
        })
    }

    pub(crate) fn field(&mut self, owner: NodeId, name: &str) -> NodeId {
        self.push(FakeDecl {
            kind: SymbolKind::Field,
            name: name.to_string(),
            qualified: None,
            owner: Some(owner),
            params: Vec::new(),
            ret: None,
        })
    }

    /// A field with no enclosing named type.
    pub(crate) fn orphan_field(&mut self, name: &str) -> NodeId {
        self.push(FakeDecl {
            kind: SymbolKind::Field,
            name: name.to_string(),
            qualified: None,
            owner: None,
            params: Vec::new(),
            ret: None,
        })
    }

    pub(crate) fn method(&mut self, owner: NodeId, name: &str, params: &[&str], ret: &str) -> NodeId {
        self.push(FakeDecl {
            kind: SymbolKind::Method,
            name: name.to_string(),
            qualified: None,
            owner: Some(owner),
            params: params.iter().map(|p| p.to_string()).collect(),
            ret: Some(ret.to_string()),
        })
    }

    /// Visit declarations last-to-first.
    pub(crate) fn reverse_order(&mut self) {
        self.reversed = !self.reversed;
    }
}

impl DeclarationModel for FakeModel {
    fn declarations(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = (0..self.decls.len())
            .map(|i| NodeId::new(FileId(0), i as u32))
            .collect();
        if self.reversed {
            nodes.reverse();
        }
        nodes
    }

    fn kind(&self, node: NodeId) -> SymbolKind {
        self.decl(node).kind
    }

    fn simple_name(&self, node: NodeId) -> &str {
        &self.decl(node).name
    }

    fn qualified_name(&self, node: NodeId) -> Option<String> {
        self.decl(node).qualified.clone()
    }

    fn enclosing_type(&self, node: NodeId) -> Option<NodeId> {
        self.decl(node).owner
    }

    fn parameter_types(&self, node: NodeId) -> Option<Vec<String>> {
        match self.decl(node).kind {
            SymbolKind::Method => Some(self.decl(node).params.clone()),
            _ => None,
        }
    }

    fn return_type(&self, node: NodeId) -> Option<String> {
        self.decl(node).ret.clone()
    }

    fn location(&self, node: NodeId) -> Option<Location> {
        Some(Location::new("Fake.java", node.index + 1, 1))
    }

    fn set_simple_name(&mut self, node: NodeId, name: &str) {
        self.renames += 1;
        self.decls[node.index as usize].name = name.to_string();
    }
}
