//! One parsed Java file exposed as a [`DeclarationModel`].
//!
//! Parsing happens per file in [`ParsedFile`]; resolving against a tree-wide
//! [`TypeIndex`] then yields the [`JavaUnit`]. Declared names, qualified names
//! and resolved signatures are computed once at that point and never change; renames only touch the per-declaration
//! current name. [`JavaUnit::render`] turns those renames into span edits over
//! the untouched original text.

use remap_core::keys::SymbolKind;
use remap_core::model::{DeclarationModel, NodeId};
use remap_core::patch::{apply_edits, Edit, FileId, Span};
use remap_core::text::LineIndex;
use remap_core::types::Location;

use crate::error::{JavaError, JavaResult};
use crate::parser::{self, CompilationUnit, DeclShape};
use crate::resolve::{Resolver, TypeIndex};

/// Per-declaration data the model serves.
#[derive(Debug, Clone)]
struct DeclInfo {
    kind: SymbolKind,
    original: String,
    current: String,
    span: Span,
    /// Constructor name spans renamed together with a type.
    constructors: Vec<Span>,
    qualified: Option<String>,
    /// Declared at file level.
    top_level: bool,
    enclosing: Option<u32>,
    params: Option<Vec<String>>,
    ret: Option<String>,
}

/// A parsed compilation unit with rename state.
#[derive(Debug)]
pub struct JavaUnit {
    file_id: FileId,
    path: String,
    source: String,
    lines: LineIndex,
    decls: Vec<DeclInfo>,
}

/// A syntax tree not yet resolved against the rest of the source tree.
#[derive(Debug)]
pub struct ParsedFile {
    path: String,
    source: String,
    lines: LineIndex,
    syntax: CompilationUnit,
}

impl ParsedFile {
    /// Parse `source`. `path` is used for locations and error messages.
    pub fn parse(path: impl Into<String>, source: String) -> JavaResult<Self> {
        let path = path.into();
        let lines = LineIndex::new(&source);
        let syntax = parser::parse(&source).map_err(|err| {
            let (line, col) = lines.position(err.offset);
            JavaError::Parse {
                path: path.clone(),
                line,
                col,
                message: err.message,
            }
        })?;
        Ok(ParsedFile {
            path,
            source,
            lines,
            syntax,
        })
    }

    pub fn syntax(&self) -> &CompilationUnit {
        &self.syntax
    }
}

impl JavaUnit {
    /// Parse a file on its own; only the types it declares are known.
    pub fn parse(file_id: FileId, path: impl Into<String>, source: String) -> JavaResult<Self> {
        let parsed = ParsedFile::parse(path, source)?;
        let index: TypeIndex = [parsed.syntax()].into_iter().collect();
        Ok(JavaUnit::resolve(file_id, parsed, &index))
    }

    /// Resolve signatures of `parsed` against the types in `index`.
    pub fn resolve(file_id: FileId, parsed: ParsedFile, index: &TypeIndex) -> Self {
        let ParsedFile {
            path,
            source,
            lines,
            syntax: unit,
        } = parsed;

        let resolver = Resolver::new(&unit, index);
        let decls = unit
            .decls
            .iter()
            .enumerate()
            .map(|(idx, decl)| {
                let span = Span::new(decl.name_start as u64, decl.name_end as u64);
                // Members of anonymous bodies have no named enclosing type.
                let enclosing = decl
                    .parent
                    .filter(|p| !unit.decls[*p].is_anonymous())
                    .map(|p| p as u32);
                let mut info = DeclInfo {
                    kind: decl.kind(),
                    original: decl.name.clone(),
                    current: decl.name.clone(),
                    span,
                    constructors: Vec::new(),
                    qualified: None,
                    top_level: decl.parent.is_none(),
                    enclosing,
                    params: None,
                    ret: None,
                };
                match &decl.shape {
                    DeclShape::Type { constructors, .. } => {
                        info.qualified = resolver.binary_name(idx).map(str::to_string);
                        info.constructors = constructors
                            .iter()
                            .map(|(s, e)| Span::new(*s as u64, *e as u64))
                            .collect();
                    }
                    DeclShape::Method { params, ret, .. } => {
                        info.params = Some(params.iter().map(|p| resolver.resolve(p, idx)).collect());
                        info.ret = Some(resolver.resolve(ret, idx));
                    }
                    DeclShape::Field { .. } => {}
                }
                info
            })
            .collect();

        JavaUnit {
            file_id,
            path,
            source,
            lines,
            decls,
        }
    }

    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    /// Path the file was parsed under.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Original text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Relative path the rendered text belongs at.
    ///
    /// A top-level type named like its file gives the file its name, so when
    /// that type is renamed the file follows it. Otherwise the input path is
    /// kept.
    pub fn output_path(&self) -> String {
        let (dir, file) = match self.path.rsplit_once('/') {
            Some((dir, file)) => (Some(dir), file),
            None => (None, self.path.as_str()),
        };
        let Some(stem) = file.strip_suffix(".java") else {
            return self.path.clone();
        };
        let primary = self
            .decls
            .iter()
            .find(|d| d.top_level && d.kind == SymbolKind::Class && d.original == stem);
        match (primary, dir) {
            (Some(d), Some(dir)) if d.current != d.original => {
                format!("{}/{}.java", dir, d.current)
            }
            (Some(d), None) if d.current != d.original => format!("{}.java", d.current),
            _ => self.path.clone(),
        }
    }

    /// Whether any declaration has been renamed.
    pub fn is_modified(&self) -> bool {
        self.decls.iter().any(|d| d.current != d.original)
    }

    /// Name edits for every renamed declaration, in source order.
    pub fn edits(&self) -> Vec<Edit> {
        let mut edits = Vec::new();
        for decl in self.decls.iter().filter(|d| d.current != d.original) {
            for span in std::iter::once(&decl.span).chain(&decl.constructors) {
                edits.push(Edit::replace(
                    self.file_id,
                    *span,
                    decl.original.clone(),
                    decl.current.clone(),
                ));
            }
        }
        edits.sort_by_key(|e| e.span.start);
        edits
    }

    /// Rewritten text. Byte-identical to the input when nothing was renamed.
    pub fn render(&self) -> JavaResult<String> {
        if !self.is_modified() {
            return Ok(self.source.clone());
        }
        apply_edits(self.file_id, &self.source, &self.edits()).map_err(|conflicts| {
            let message = conflicts
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            JavaError::Conflict {
                path: self.path.clone(),
                message,
            }
        })
    }

    fn info(&self, node: NodeId) -> Option<&DeclInfo> {
        if node.file != self.file_id {
            return None;
        }
        self.decls.get(node.index as usize)
    }

    fn node(&self, index: u32) -> NodeId {
        NodeId::new(self.file_id, index)
    }
}

impl DeclarationModel for JavaUnit {
    fn declarations(&self) -> Vec<NodeId> {
        (0..self.decls.len() as u32).map(|i| self.node(i)).collect()
    }

    fn kind(&self, node: NodeId) -> SymbolKind {
        self.info(node).map_or(SymbolKind::Class, |d| d.kind)
    }

    fn simple_name(&self, node: NodeId) -> &str {
        self.info(node).map_or("", |d| d.current.as_str())
    }

    fn qualified_name(&self, node: NodeId) -> Option<String> {
        self.info(node)?.qualified.clone()
    }

    fn enclosing_type(&self, node: NodeId) -> Option<NodeId> {
        self.info(node)?.enclosing.map(|i| self.node(i))
    }

    fn parameter_types(&self, node: NodeId) -> Option<Vec<String>> {
        self.info(node)?.params.clone()
    }

    fn return_type(&self, node: NodeId) -> Option<String> {
        self.info(node)?.ret.clone()
    }

    fn location(&self, node: NodeId) -> Option<Location> {
        let info = self.info(node)?;
        let (line, col) = self.lines.position(info.span.start as usize);
        Some(Location::with_span(
            self.path.clone(),
            line,
            col,
            info.span.start,
            info.span.end,
        ))
    }

    fn set_simple_name(&mut self, node: NodeId, name: &str) {
        if node.file != self.file_id {
            return;
        }
        if let Some(info) = self.decls.get_mut(node.index as usize) {
            info.current = name.to_string();
        }
    }
}
