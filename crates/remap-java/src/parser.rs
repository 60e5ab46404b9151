//! Declaration-level Java parser.
//!
//! Builds a flat arena of the declarations a remap run can rename: types
//! (including nested ones), fields, and methods. Everything below declaration
//! level is skipped by bracket matching: method bodies, initializer
//! expressions, and the contents of instance and static initializer blocks.
//! Classes declared inside method bodies are therefore never recorded.
//!
//! Recorded shapes:
//! - every declarator of `int a, b[];` becomes its own field
//! - record components become fields of the record
//! - annotation type elements become methods
//! - an enum constant with a body becomes an anonymous class owning the
//!   body's members; the constant itself is not a field of interest
//! - constructors are not methods; their name spans are attached to the
//!   enclosing type so they can be renamed with it

use remap_core::keys::SymbolKind;

use crate::error::SyntaxError;
use crate::lexer::{tokenize, Token, TokenKind};

// ============================================================================
// Parsed Shapes
// ============================================================================

/// A type as written, with generic arguments and annotations erased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Dotted name as written (`String`, `Map.Entry`, `java.util.List`).
    pub name: String,
    /// Array dimensions, varargs included.
    pub dims: usize,
}

impl TypeRef {
    pub fn new(name: impl Into<String>, dims: usize) -> Self {
        TypeRef {
            name: name.into(),
            dims,
        }
    }

    fn with_extra_dims(&self, extra: usize) -> Self {
        TypeRef::new(self.name.clone(), self.dims + extra)
    }
}

/// A declared type variable and its first bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParam {
    pub name: String,
    pub bound: Option<TypeRef>,
}

/// Which keyword introduced a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFlavor {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

/// Kind-specific parts of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclShape {
    Type {
        flavor: TypeFlavor,
        type_params: Vec<TypeParam>,
        /// Enum constant bodies have no name.
        anonymous: bool,
        /// Byte spans of constructor names.
        constructors: Vec<(usize, usize)>,
    },
    Field {
        ty: TypeRef,
    },
    Method {
        type_params: Vec<TypeParam>,
        params: Vec<TypeRef>,
        ret: TypeRef,
    },
}

/// One declaration in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decl {
    /// Name as written (empty for anonymous types).
    pub name: String,
    /// Byte span of the name.
    pub name_start: usize,
    pub name_end: usize,
    /// Arena index of the enclosing type declaration.
    pub parent: Option<usize>,
    pub shape: DeclShape,
}

impl Decl {
    /// Rename category of this declaration.
    pub fn kind(&self) -> SymbolKind {
        match self.shape {
            DeclShape::Type { .. } => SymbolKind::Class,
            DeclShape::Field { .. } => SymbolKind::Field,
            DeclShape::Method { .. } => SymbolKind::Method,
        }
    }

    /// Whether this is an anonymous class body.
    pub fn is_anonymous(&self) -> bool {
        matches!(self.shape, DeclShape::Type { anonymous: true, .. })
    }
}

/// An `import` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Dotted path without a trailing `.*`.
    pub path: String,
    pub is_static: bool,
    pub on_demand: bool,
}

/// Everything recorded from one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilationUnit {
    pub package: Option<String>,
    pub imports: Vec<Import>,
    pub decls: Vec<Decl>,
}

/// Parse one compilation unit.
pub fn parse(source: &str) -> Result<CompilationUnit, SyntaxError> {
    let tokens = tokenize(source)?;
    Parser {
        source,
        tokens,
        pos: 0,
        decls: Vec::new(),
    }
    .compilation_unit()
}

// ============================================================================
// Parser
// ============================================================================

const MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "abstract",
    "final",
    "native",
    "synchronized",
    "transient",
    "volatile",
    "strictfp",
    "default",
    "sealed",
];

type PResult<T> = Result<T, SyntaxError>;

struct Parser<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    pos: usize,
    decls: Vec<Decl>,
}

impl<'s> Parser<'s> {
    // ---- token access ----

    fn peek_at(&self, ahead: usize) -> Option<Token> {
        self.tokens.get(self.pos + ahead).copied()
    }

    fn is_punct_at(&self, ahead: usize, c: char) -> bool {
        self.peek_at(ahead)
            .is_some_and(|t| t.kind == TokenKind::Punct(c))
    }

    fn is_punct(&self, c: char) -> bool {
        self.is_punct_at(0, c)
    }

    fn ident_at(&self, ahead: usize) -> Option<&'s str> {
        match self.peek_at(ahead) {
            Some(t) if t.kind == TokenKind::Ident => Some(t.text(self.source)),
            _ => None,
        }
    }

    fn is_ident(&self, text: &str) -> bool {
        self.ident_at(0) == Some(text)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek_at(0);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error_here(&self, expected: &str) -> SyntaxError {
        match self.peek_at(0) {
            Some(t) => SyntaxError::new(
                t.start,
                format!("expected {}, found '{}'", expected, t.text(self.source)),
            ),
            None => SyntaxError::new(
                self.source.len(),
                format!("expected {}, found end of input", expected),
            ),
        }
    }

    fn expect_punct(&mut self, c: char) -> PResult<Token> {
        if self.is_punct(c) {
            self.bump().ok_or_else(|| self.error_here(&format!("'{}'", c)))
        } else {
            Err(self.error_here(&format!("'{}'", c)))
        }
    }

    fn expect_ident(&mut self) -> PResult<Token> {
        match self.peek_at(0) {
            Some(t) if t.kind == TokenKind::Ident => {
                self.pos += 1;
                Ok(t)
            }
            _ => Err(self.error_here("identifier")),
        }
    }

    // ---- skipping ----

    /// Skip from an opening bracket to its matching close.
    fn skip_balanced(&mut self, open: char, close: char) -> PResult<()> {
        let start = self.expect_punct(open)?;
        let mut depth = 1usize;
        while let Some(token) = self.bump() {
            if token.kind == TokenKind::Punct(open) {
                depth += 1;
            } else if token.kind == TokenKind::Punct(close) {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
        }
        Err(SyntaxError::new(
            start.start,
            format!("unbalanced '{}'", open),
        ))
    }

    fn skip_annotation(&mut self) -> PResult<()> {
        self.expect_punct('@')?;
        self.qualified_name()?;
        if self.is_punct('(') {
            self.skip_balanced('(', ')')?;
        }
        Ok(())
    }

    fn at_annotation(&self) -> bool {
        self.is_punct('@') && self.ident_at(1) != Some("interface")
    }

    fn skip_annotations(&mut self) -> PResult<()> {
        while self.at_annotation() {
            self.skip_annotation()?;
        }
        Ok(())
    }

    fn skip_modifiers(&mut self) -> PResult<()> {
        loop {
            if self.at_annotation() {
                self.skip_annotation()?;
            } else if self.ident_at(0).is_some_and(|m| MODIFIERS.contains(&m)) {
                self.bump();
            } else if self.is_ident("non")
                && self.is_punct_at(1, '-')
                && self.ident_at(2) == Some("sealed")
            {
                self.pos += 3;
            } else {
                return Ok(());
            }
        }
    }

    /// Skip an expression up to (not including) the `;` or the `,` that
    /// starts the next declarator.
    ///
    /// Angle brackets are not tracked, so a depth-zero `,` only ends the
    /// initializer when [`Parser::declarator_follows`] holds. Commas inside
    /// `new HashMap<K, V>()` or `Foo.<K, V>bar()` are skipped over.
    fn skip_initializer(&mut self) -> PResult<()> {
        loop {
            match self.peek_at(0).map(|t| t.kind) {
                None => return Err(self.error_here("';'")),
                Some(TokenKind::Punct(';')) => return Ok(()),
                Some(TokenKind::Punct(',')) => {
                    if self.declarator_follows() {
                        return Ok(());
                    }
                    self.bump();
                }
                Some(TokenKind::Punct('(')) => self.skip_balanced('(', ')')?,
                Some(TokenKind::Punct('[')) => self.skip_balanced('[', ']')?,
                Some(TokenKind::Punct('{')) => self.skip_balanced('{', '}')?,
                Some(TokenKind::Punct(')')) | Some(TokenKind::Punct(']'))
                | Some(TokenKind::Punct('}')) => return Err(self.error_here("';'")),
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    /// Whether the `,` under the cursor is followed by declarators:
    /// `name ([])* (, name ([])*)*` ending in `=` or `;`.
    fn declarator_follows(&self) -> bool {
        let mut ahead = 1;
        loop {
            if self.ident_at(ahead).is_none() {
                return false;
            }
            ahead += 1;
            while self.is_punct_at(ahead, '[') && self.is_punct_at(ahead + 1, ']') {
                ahead += 2;
            }
            if self.is_punct_at(ahead, '=') || self.is_punct_at(ahead, ';') {
                return true;
            }
            if !self.is_punct_at(ahead, ',') {
                return false;
            }
            ahead += 1;
        }
    }

    /// Skip `throws` clauses, annotation defaults, and the body or `;`.
    fn skip_method_tail(&mut self) -> PResult<()> {
        loop {
            if self.is_punct('{') {
                return self.skip_balanced('{', '}');
            }
            if self.is_punct(';') {
                self.bump();
                return Ok(());
            }
            if self.is_ident("default") {
                self.bump();
                self.skip_initializer()?;
                self.expect_punct(';')?;
                return Ok(());
            }
            if self.is_punct('<') {
                self.skip_type_args()?;
                continue;
            }
            if self.is_punct('@') {
                self.skip_annotation()?;
                continue;
            }
            match self.peek_at(0).map(|t| t.kind) {
                Some(TokenKind::Ident) | Some(TokenKind::Punct('.')) | Some(TokenKind::Punct(',')) => {
                    self.bump();
                }
                _ => return Err(self.error_here("method body or ';'")),
            }
        }
    }

    fn skip_type_args(&mut self) -> PResult<()> {
        self.skip_balanced('<', '>')
    }

    // ---- names and types ----

    fn qualified_name(&mut self) -> PResult<String> {
        let first = self.expect_ident()?;
        let mut name = first.text(self.source).to_string();
        while self.is_punct('.') && self.ident_at(1).is_some() {
            self.bump();
            let next = self.expect_ident()?;
            name.push('.');
            name.push_str(next.text(self.source));
        }
        Ok(name)
    }

    fn dims(&mut self) -> PResult<usize> {
        let mut dims = 0;
        loop {
            self.skip_annotations()?;
            if self.is_punct('[') && self.is_punct_at(1, ']') {
                self.pos += 2;
                dims += 1;
            } else {
                return Ok(dims);
            }
        }
    }

    fn type_ref(&mut self) -> PResult<TypeRef> {
        self.skip_annotations()?;
        let first = self
            .expect_ident()
            .map_err(|_| self.error_here("a type"))?;
        let mut segments = vec![first.text(self.source).to_string()];
        loop {
            if self.is_punct('<') {
                self.skip_type_args()?;
            } else if self.is_punct('.')
                && (self.ident_at(1).is_some() || self.is_punct_at(1, '@'))
            {
                self.bump();
                self.skip_annotations()?;
                let next = self.expect_ident()?;
                segments.push(next.text(self.source).to_string());
            } else {
                break;
            }
        }
        let mut dims = self.dims()?;
        if self.is_punct('.') && self.is_punct_at(1, '.') && self.is_punct_at(2, '.') {
            self.pos += 3;
            dims += 1;
        }
        Ok(TypeRef::new(segments.join("."), dims))
    }

    fn type_params(&mut self) -> PResult<Vec<TypeParam>> {
        self.expect_punct('<')?;
        let mut params = Vec::new();
        loop {
            self.skip_annotations()?;
            let name = self.expect_ident()?.text(self.source).to_string();
            let mut bound = None;
            if self.is_ident("extends") {
                self.bump();
                bound = Some(self.type_ref()?);
                while self.is_punct('&') {
                    self.bump();
                    self.type_ref()?;
                }
            }
            params.push(TypeParam { name, bound });
            if self.is_punct(',') {
                self.bump();
                continue;
            }
            self.expect_punct('>')?;
            return Ok(params);
        }
    }

    fn parameters(&mut self) -> PResult<Vec<TypeRef>> {
        self.expect_punct('(')?;
        let mut params = Vec::new();
        if self.is_punct(')') {
            self.bump();
            return Ok(params);
        }
        loop {
            self.skip_modifiers()?;
            let ty = self.type_ref()?;
            let name = self.expect_ident()?;
            if name.text(self.source) == "this" {
                // receiver parameter
            } else if self.is_punct('.') && self.ident_at(1) == Some("this") {
                self.pos += 2;
            } else {
                let extra = self.dims()?;
                params.push(ty.with_extra_dims(extra));
            }
            if self.is_punct(',') {
                self.bump();
                continue;
            }
            self.expect_punct(')')?;
            return Ok(params);
        }
    }

    // ---- declarations ----

    fn push(&mut self, decl: Decl) -> usize {
        self.decls.push(decl);
        self.decls.len() - 1
    }

    fn compilation_unit(mut self) -> PResult<CompilationUnit> {
        let mut package = None;
        let mut imports = Vec::new();

        loop {
            if self.is_punct(';') {
                self.bump();
                continue;
            }
            if self.peek_at(0).is_none() {
                break;
            }
            self.skip_modifiers()?;
            if self.is_ident("package") {
                self.bump();
                package = Some(self.qualified_name()?);
                self.expect_punct(';')?;
            } else if self.is_ident("import") {
                self.bump();
                let is_static = self.is_ident("static");
                if is_static {
                    self.bump();
                }
                let path = self.qualified_name()?;
                let on_demand = self.is_punct('.') && self.is_punct_at(1, '*');
                if on_demand {
                    self.pos += 2;
                }
                self.expect_punct(';')?;
                imports.push(Import {
                    path,
                    is_static,
                    on_demand,
                });
            } else if self.is_ident("module")
                || (self.is_ident("open") && self.ident_at(1) == Some("module"))
            {
                while !self.is_punct('{') {
                    if self.bump().is_none() {
                        return Err(self.error_here("'{'"));
                    }
                }
                self.skip_balanced('{', '}')?;
            } else if let Some(flavor) = self.type_keyword() {
                self.type_decl(None, flavor)?;
            } else {
                return Err(self.error_here("a type declaration"));
            }
        }

        Ok(CompilationUnit {
            package,
            imports,
            decls: self.decls,
        })
    }

    /// Consume a type-introducing keyword, if one is next.
    fn type_keyword(&mut self) -> Option<TypeFlavor> {
        let flavor = match self.ident_at(0) {
            Some("class") => TypeFlavor::Class,
            Some("interface") => TypeFlavor::Interface,
            Some("enum") => TypeFlavor::Enum,
            Some("record")
                if self.ident_at(1).is_some()
                    && (self.is_punct_at(2, '(') || self.is_punct_at(2, '<')) =>
            {
                TypeFlavor::Record
            }
            _ if self.is_punct('@') && self.ident_at(1) == Some("interface") => {
                self.pos += 1;
                TypeFlavor::Annotation
            }
            _ => return None,
        };
        self.pos += 1;
        Some(flavor)
    }

    fn type_decl(&mut self, parent: Option<usize>, flavor: TypeFlavor) -> PResult<()> {
        let name = self.expect_ident()?;
        let type_params = if self.is_punct('<') {
            self.type_params()?
        } else {
            Vec::new()
        };
        let owner_name = name.text(self.source).to_string();
        let idx = self.push(Decl {
            name: owner_name.clone(),
            name_start: name.start,
            name_end: name.end,
            parent,
            shape: DeclShape::Type {
                flavor,
                type_params,
                anonymous: false,
                constructors: Vec::new(),
            },
        });

        if flavor == TypeFlavor::Record && self.is_punct('(') {
            self.record_components(idx)?;
        }
        while !self.is_punct('{') {
            if self.bump().is_none() {
                return Err(self.error_here("'{'"));
            }
        }
        self.type_body(idx, flavor, &owner_name)
    }

    fn record_components(&mut self, owner: usize) -> PResult<()> {
        self.expect_punct('(')?;
        if self.is_punct(')') {
            self.bump();
            return Ok(());
        }
        loop {
            self.skip_modifiers()?;
            let ty = self.type_ref()?;
            let name = self.expect_ident()?;
            self.push(Decl {
                name: name.text(self.source).to_string(),
                name_start: name.start,
                name_end: name.end,
                parent: Some(owner),
                shape: DeclShape::Field { ty },
            });
            if self.is_punct(',') {
                self.bump();
                continue;
            }
            self.expect_punct(')')?;
            return Ok(());
        }
    }

    fn type_body(&mut self, owner: usize, flavor: TypeFlavor, owner_name: &str) -> PResult<()> {
        self.expect_punct('{')?;
        if flavor == TypeFlavor::Enum {
            self.enum_constants(owner)?;
        }
        loop {
            if self.is_punct('}') {
                self.bump();
                return Ok(());
            }
            if self.peek_at(0).is_none() {
                return Err(self.error_here("'}'"));
            }
            if self.is_punct(';') {
                self.bump();
                continue;
            }
            self.member(owner, owner_name)?;
        }
    }

    fn enum_constants(&mut self, owner: usize) -> PResult<()> {
        loop {
            self.skip_annotations()?;
            if self.is_punct(';') {
                self.bump();
                return Ok(());
            }
            if self.is_punct('}') {
                return Ok(());
            }
            if self.is_punct(',') {
                self.bump();
                continue;
            }
            self.expect_ident()?;
            if self.is_punct('(') {
                self.skip_balanced('(', ')')?;
            }
            if let Some(brace) = self.peek_at(0).filter(|t| t.kind == TokenKind::Punct('{')) {
                let anon = self.push(Decl {
                    name: String::new(),
                    name_start: brace.start,
                    name_end: brace.start,
                    parent: Some(owner),
                    shape: DeclShape::Type {
                        flavor: TypeFlavor::Class,
                        type_params: Vec::new(),
                        anonymous: true,
                        constructors: Vec::new(),
                    },
                });
                self.type_body(anon, TypeFlavor::Class, "")?;
            }
            if self.is_punct(',') {
                self.bump();
            } else if !self.is_punct(';') && !self.is_punct('}') {
                return Err(self.error_here("',', ';' or '}' after enum constant"));
            }
        }
    }

    fn member(&mut self, owner: usize, owner_name: &str) -> PResult<()> {
        self.skip_modifiers()?;

        if self.is_punct('{') {
            return self.skip_balanced('{', '}');
        }
        if self.is_punct(';') {
            self.bump();
            return Ok(());
        }
        if let Some(flavor) = self.type_keyword() {
            return self.type_decl(Some(owner), flavor);
        }

        let type_params = if self.is_punct('<') {
            self.type_params()?
        } else {
            Vec::new()
        };

        if !owner_name.is_empty()
            && self.ident_at(0) == Some(owner_name)
            && (self.is_punct_at(1, '(') || self.is_punct_at(1, '{'))
        {
            return self.constructor(owner);
        }

        let ty = self.type_ref()?;
        let name = self.expect_ident()?;

        if self.is_punct('(') {
            let params = self.parameters()?;
            let extra = self.dims()?;
            self.push(Decl {
                name: name.text(self.source).to_string(),
                name_start: name.start,
                name_end: name.end,
                parent: Some(owner),
                shape: DeclShape::Method {
                    type_params,
                    params,
                    ret: ty.with_extra_dims(extra),
                },
            });
            return self.skip_method_tail();
        }

        let mut name = name;
        loop {
            let extra = self.dims()?;
            self.push(Decl {
                name: name.text(self.source).to_string(),
                name_start: name.start,
                name_end: name.end,
                parent: Some(owner),
                shape: DeclShape::Field {
                    ty: ty.with_extra_dims(extra),
                },
            });
            if self.is_punct('=') {
                self.bump();
                self.skip_initializer()?;
            }
            if self.is_punct(',') {
                self.bump();
                name = self.expect_ident()?;
                continue;
            }
            self.expect_punct(';')?;
            return Ok(());
        }
    }

    /// A constructor, or a record's compact canonical constructor.
    fn constructor(&mut self, owner: usize) -> PResult<()> {
        let name = self.expect_ident()?;
        if let DeclShape::Type { constructors, .. } = &mut self.decls[owner].shape {
            constructors.push((name.start, name.end));
        }
        if self.is_punct('(') {
            self.skip_balanced('(', ')')?;
        }
        self.skip_method_tail()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn names(unit: &CompilationUnit) -> Vec<(SymbolKind, &str)> {
        unit.decls
            .iter()
            .map(|d| (d.kind(), d.name.as_str()))
            .collect()
    }

    fn method<'u>(unit: &'u CompilationUnit, name: &str) -> (&'u [TypeRef], &'u TypeRef) {
        unit.decls
            .iter()
            .find_map(|d| match &d.shape {
                DeclShape::Method { params, ret, .. } if d.name == name => {
                    Some((params.as_slice(), ret))
                }
                _ => None,
            })
            .unwrap()
    }

    mod structure {
        use super::*;

        #[test]
        fn package_imports_and_members() {
            let unit = parse(
                "package a.b;\n\
                 import java.util.List;\n\
                 import static java.lang.Math.max;\n\
                 import java.io.*;\n\
                 public class Old {\n\
                     private int x = 1;\n\
                     public void m() { int local = 2; }\n\
                 }\n",
            )
            .unwrap();
            assert_eq!(unit.package.as_deref(), Some("a.b"));
            assert_eq!(unit.imports.len(), 3);
            assert!(unit.imports[1].is_static);
            assert!(unit.imports[2].on_demand);
            assert_eq!(unit.imports[2].path, "java.io");
            assert_eq!(
                names(&unit),
                vec![
                    (SymbolKind::Class, "Old"),
                    (SymbolKind::Field, "x"),
                    (SymbolKind::Method, "m"),
                ]
            );
            assert_eq!(unit.decls[1].parent, Some(0));
        }

        #[test]
        fn name_spans_point_at_names() {
            let source = "class Old { int x; void m() {} }";
            let unit = parse(source).unwrap();
            for decl in &unit.decls {
                assert_eq!(&source[decl.name_start..decl.name_end], decl.name);
            }
        }

        #[test]
        fn nested_types_record_parent() {
            let unit = parse(
                "class Outer { static class Inner { int f; } interface I { void run(); } }",
            )
            .unwrap();
            assert_eq!(
                names(&unit),
                vec![
                    (SymbolKind::Class, "Outer"),
                    (SymbolKind::Class, "Inner"),
                    (SymbolKind::Field, "f"),
                    (SymbolKind::Class, "I"),
                    (SymbolKind::Method, "run"),
                ]
            );
            assert_eq!(unit.decls[2].parent, Some(1));
            assert_eq!(unit.decls[3].parent, Some(0));
        }

        #[test]
        fn multi_declarator_fields() {
            let unit = parse("class A { int a = f(1, 2), b[], c = {1, 2}[0]; }").unwrap();
            let fields: Vec<(&str, usize)> = unit
                .decls
                .iter()
                .filter_map(|d| match &d.shape {
                    DeclShape::Field { ty } => Some((d.name.as_str(), ty.dims)),
                    _ => None,
                })
                .collect();
            assert_eq!(fields, vec![("a", 0), ("b", 1), ("c", 0)]);
        }

        #[test]
        fn generic_arguments_in_initializers() {
            let unit = parse(
                "class A {\n\
                   Map<String, Integer> m = new HashMap<String, Integer>();\n\
                   Map<String, Integer> e = Collections.<String, Integer>emptyMap(), f;\n\
                   Triple<A, B, C> t = new Triple<A, B, C>(), u = null;\n\
                   Map<String, int[]> g = new HashMap<String, int[]>();\n\
                   int a = x < y ? 1 : 2, b[] = {}, c;\n\
                 }",
            )
            .unwrap();
            let fields: Vec<&str> = unit
                .decls
                .iter()
                .filter(|d| d.kind() == SymbolKind::Field)
                .map(|d| d.name.as_str())
                .collect();
            assert_eq!(fields, vec!["m", "e", "f", "t", "u", "g", "a", "b", "c"]);
        }

        #[test]
        fn bodies_and_initializers_are_skipped() {
            let unit = parse(
                "class A {\n\
                   static { register(new Object() { int hidden; }); }\n\
                   { count++; }\n\
                   Runnable r = () -> { class Local { int alsoHidden; } };\n\
                   void m() { new Thread() { public void run() {} }.start(); }\n\
                 }",
            )
            .unwrap();
            assert_eq!(
                names(&unit),
                vec![
                    (SymbolKind::Class, "A"),
                    (SymbolKind::Field, "r"),
                    (SymbolKind::Method, "m"),
                ]
            );
        }

        #[test]
        fn module_info_has_no_declarations() {
            let unit = parse("open module a.b { requires java.base; exports a.b; }").unwrap();
            assert!(unit.decls.is_empty());
        }
    }

    mod special_members {
        use super::*;

        #[test]
        fn constructors_attach_to_type() {
            let source = "class Old { Old() {} <T> Old(T t) throws Exception { } void Old2() {} }";
            let unit = parse(source).unwrap();
            assert_eq!(
                names(&unit),
                vec![(SymbolKind::Class, "Old"), (SymbolKind::Method, "Old2")]
            );
            let DeclShape::Type { constructors, .. } = &unit.decls[0].shape else {
                panic!("expected type");
            };
            assert_eq!(constructors.len(), 2);
            for (start, end) in constructors {
                assert_eq!(&source[*start..*end], "Old");
            }
        }

        #[test]
        fn enum_constants_and_bodies() {
            let unit = parse(
                "enum Op {\n\
                   PLUS(\"+\") { int apply(int a, int b) { return a + b; } },\n\
                   @Deprecated MINUS(\"-\"),\n\
                   NOP;\n\
                   private final String symbol;\n\
                   Op(String symbol) { this.symbol = symbol; }\n\
                   int apply(int a, int b) { return 0; }\n\
                 }",
            )
            .unwrap();
            assert_eq!(
                names(&unit),
                vec![
                    (SymbolKind::Class, "Op"),
                    (SymbolKind::Class, ""),
                    (SymbolKind::Method, "apply"),
                    (SymbolKind::Field, "symbol"),
                    (SymbolKind::Method, "apply"),
                ]
            );
            assert!(unit.decls[1].is_anonymous());
            assert_eq!(unit.decls[2].parent, Some(1));
        }

        #[test]
        fn enum_without_members() {
            let unit = parse("enum E { A, B, }").unwrap();
            assert_eq!(names(&unit), vec![(SymbolKind::Class, "E")]);
        }

        #[test]
        fn records_components_are_fields() {
            let unit = parse(
                "record Point<T>(int x, List<T> ys) implements Shape {\n\
                   Point { if (x < 0) throw new IllegalArgumentException(); }\n\
                   static Point origin() { return null; }\n\
                 }",
            )
            .unwrap();
            assert_eq!(
                names(&unit),
                vec![
                    (SymbolKind::Class, "Point"),
                    (SymbolKind::Field, "x"),
                    (SymbolKind::Field, "ys"),
                    (SymbolKind::Method, "origin"),
                ]
            );
        }

        #[test]
        fn annotation_elements_are_methods() {
            let unit = parse(
                "@interface Marker { String value() default \"\"; int[] ids() default {1, 2}; int LIMIT = 3; }",
            )
            .unwrap();
            assert_eq!(
                names(&unit),
                vec![
                    (SymbolKind::Class, "Marker"),
                    (SymbolKind::Method, "value"),
                    (SymbolKind::Method, "ids"),
                    (SymbolKind::Field, "LIMIT"),
                ]
            );
        }

        #[test]
        fn sealed_hierarchy_modifiers() {
            let unit = parse(
                "sealed interface S permits A, B {}\nnon-sealed class A implements S {}\nfinal class B implements S {}",
            )
            .unwrap();
            assert_eq!(unit.decls.len(), 3);
        }
    }

    mod types {
        use super::*;

        #[test]
        fn generics_are_erased_and_arrays_counted() {
            let unit = parse(
                "class A { Map<String, List<int[]>> m(java.util.Map.Entry<K, V> e, String[]... rest, final @Ann int x[]) { return null; } }",
            )
            .unwrap();
            let (params, ret) = method(&unit, "m");
            assert_eq!(ret, &TypeRef::new("Map", 0));
            assert_eq!(
                params,
                &[
                    TypeRef::new("java.util.Map.Entry", 0),
                    TypeRef::new("String", 2),
                    TypeRef::new("int", 1),
                ]
            );
        }

        #[test]
        fn receiver_parameter_is_not_a_parameter() {
            let unit = parse("class A { class B { void m(A.B this, int x) {} void n(A A.this) {} } }")
                .unwrap();
            assert_eq!(method(&unit, "m").0, &[TypeRef::new("int", 0)]);
            assert!(method(&unit, "n").0.is_empty());
        }

        #[test]
        fn method_type_params_with_bounds() {
            let unit =
                parse("class A { <T extends Comparable<T> & Serializable, U> T max(T a, U b) { return a; } }")
                    .unwrap();
            let DeclShape::Method { type_params, .. } = &unit.decls[1].shape else {
                panic!("expected method");
            };
            assert_eq!(
                type_params,
                &vec![
                    TypeParam {
                        name: "T".to_string(),
                        bound: Some(TypeRef::new("Comparable", 0)),
                    },
                    TypeParam {
                        name: "U".to_string(),
                        bound: None,
                    },
                ]
            );
        }

        #[test]
        fn legacy_array_return() {
            let unit = parse("class A { int m()[] { return null; } }").unwrap();
            assert_eq!(method(&unit, "m").1, &TypeRef::new("int", 1));
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn unbalanced_body() {
            let err = parse("class A { void m() { if (x) { }").unwrap_err();
            assert_eq!(err.message, "unbalanced '{'");
        }

        #[test]
        fn missing_type_declaration() {
            let err = parse("package a; int x;").unwrap_err();
            assert_eq!(err.message, "expected a type declaration, found 'int'");
            assert_eq!(err.offset, 11);
        }

        #[test]
        fn truncated_class() {
            let err = parse("class A { int x;").unwrap_err();
            assert_eq!(err.message, "expected '}', found end of input");
        }

        #[test]
        fn missing_field_semicolon() {
            let err = parse("class A { int x }").unwrap_err();
            assert_eq!(err.message, "expected ';', found '}'");
        }
    }
}
