//! Canonical symbol keys.
//!
//! A key identifies a class, field or method independently of where its
//! declaration sits in a file. Keys are plain values: equality, ordering and
//! hashing are structural, so two declarations with the same owner, name and
//! signature produce equal keys.
//!
//! Type keys use dotted binary names (`a.b.Outer$Inner`). Parameter and return
//! types use the same representation, plus primitive names (`int`) and `[]`
//! suffixes for arrays. JVM internal names (`a/b/Outer$Inner`) and descriptors
//! (`(ILjava/lang/String;)V`) are accepted and produced at the mapping-file
//! boundary.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use winnow::combinator::{alt, delimited, repeat};
use winnow::prelude::*;
use winnow::token::{one_of, take_till};
use winnow::ModalResult;

// ============================================================================
// Symbol Kind
// ============================================================================

/// The three declaration categories the engine renames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// Class, interface, enum, record or annotation type.
    Class,
    /// Field declaration.
    Field,
    /// Method declaration.
    Method,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::Class => "class",
            SymbolKind::Field => "field",
            SymbolKind::Method => "method",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Type Key
// ============================================================================

const PRIMITIVES: &[(char, &str)] = &[
    ('B', "byte"),
    ('C', "char"),
    ('D', "double"),
    ('F', "float"),
    ('I', "int"),
    ('J', "long"),
    ('S', "short"),
    ('Z', "boolean"),
    ('V', "void"),
];

/// Canonical key for a type, by fully-qualified binary name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeKey(String);

impl TypeKey {
    /// Create a key from a dotted binary name (`a.b.Outer$Inner`).
    pub fn new(name: impl Into<String>) -> Self {
        TypeKey(name.into())
    }

    /// Create a key from a JVM internal name (`a/b/Outer$Inner`).
    pub fn from_internal_name(name: &str) -> Self {
        TypeKey(name.replace('/', "."))
    }

    /// The dotted binary name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// The JVM internal name (`a/b/Outer$Inner`).
    pub fn internal_name(&self) -> String {
        self.0.replace('.', "/")
    }

    /// Unqualified name: text after the last `.` and the last `$`.
    pub fn simple_name(&self) -> &str {
        let after_dot = self.0.rsplit('.').next().unwrap_or(&self.0);
        after_dot.rsplit('$').next().unwrap_or(after_dot)
    }

    /// Package portion, or `None` for the default package.
    pub fn package(&self) -> Option<&str> {
        self.0.rfind('.').map(|idx| &self.0[..idx])
    }

    /// Whether this names a primitive type or `void`.
    pub fn is_primitive(&self) -> bool {
        PRIMITIVES.iter().any(|(_, name)| *name == self.0)
    }

    /// Number of array dimensions (`int[][]` has 2).
    pub fn array_dimensions(&self) -> usize {
        let mut rest = self.0.as_str();
        let mut dims = 0;
        while let Some(stripped) = rest.strip_suffix("[]") {
            rest = stripped;
            dims += 1;
        }
        dims
    }

    /// The element type with all array dimensions removed.
    pub fn element_type(&self) -> TypeKey {
        let dims = self.array_dimensions();
        TypeKey(self.0[..self.0.len() - 2 * dims].to_string())
    }

    /// Wrap the element type in `dims` array dimensions.
    pub fn array_of(&self, dims: usize) -> TypeKey {
        let mut name = self.0.clone();
        for _ in 0..dims {
            name.push_str("[]");
        }
        TypeKey(name)
    }

    /// JVM field descriptor for this type (`I`, `[Ljava/lang/String;`).
    pub fn descriptor(&self) -> String {
        let dims = self.array_dimensions();
        let element = self.element_type();
        let mut out = "[".repeat(dims);
        match PRIMITIVES.iter().find(|(_, name)| *name == element.0) {
            Some((code, _)) => out.push(*code),
            None => {
                out.push('L');
                out.push_str(&element.internal_name());
                out.push(';');
            }
        }
        out
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Field Key
// ============================================================================

/// Canonical key for a field: owning type plus simple name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldKey {
    /// Type that declares the field.
    pub owner: TypeKey,
    /// Field simple name.
    pub name: String,
}

impl FieldKey {
    /// Create a field key.
    pub fn new(owner: TypeKey, name: impl Into<String>) -> Self {
        FieldKey {
            owner,
            name: name.into(),
        }
    }

    /// Same field owner, different simple name.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        FieldKey::new(self.owner.clone(), name)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}

// ============================================================================
// Method Signature and Key
// ============================================================================

/// Error decoding a JVM method descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// The descriptor does not follow `(<params>)<return>` grammar.
    #[error("malformed method descriptor '{descriptor}'")]
    Malformed { descriptor: String },

    /// `void` used as a parameter or array element.
    #[error("'void' is only valid as a return type in '{descriptor}'")]
    MisplacedVoid { descriptor: String },
}

/// Ordered parameter types plus return type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodSignature {
    /// Parameter types in declaration order.
    pub params: Vec<TypeKey>,
    /// Return type (`void` for none).
    pub ret: TypeKey,
}

impl MethodSignature {
    /// Create a signature.
    pub fn new(params: Vec<TypeKey>, ret: TypeKey) -> Self {
        MethodSignature { params, ret }
    }

    /// Decode a JVM method descriptor such as `(I[Ljava/lang/String;)V`.
    pub fn from_descriptor(descriptor: &str) -> Result<Self, DescriptorError> {
        let (params, ret) = method_descriptor
            .parse(descriptor)
            .map_err(|_| DescriptorError::Malformed {
                descriptor: descriptor.to_string(),
            })?;

        let void = TypeKey::new("void");
        let misplaced = params.iter().any(|p| p.element_type() == void)
            || (ret.element_type() == void && ret.array_dimensions() > 0);
        if misplaced {
            return Err(DescriptorError::MisplacedVoid {
                descriptor: descriptor.to_string(),
            });
        }

        Ok(MethodSignature { params, ret })
    }

    /// Encode as a JVM method descriptor.
    pub fn descriptor(&self) -> String {
        let mut out = String::from("(");
        for param in &self.params {
            out.push_str(&param.descriptor());
        }
        out.push(')');
        out.push_str(&self.ret.descriptor());
        out
    }

    /// Apply `f` to every parameter type and the return type.
    pub fn map_types(&self, mut f: impl FnMut(&TypeKey) -> TypeKey) -> Self {
        MethodSignature {
            params: self.params.iter().map(&mut f).collect(),
            ret: f(&self.ret),
        }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor())
    }
}

/// Canonical key for a method: owner, simple name and signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodKey {
    /// Type that declares the method.
    pub owner: TypeKey,
    /// Method simple name.
    pub name: String,
    /// Parameter and return types.
    pub signature: MethodSignature,
}

impl MethodKey {
    /// Create a method key.
    pub fn new(owner: TypeKey, name: impl Into<String>, signature: MethodSignature) -> Self {
        MethodKey {
            owner,
            name: name.into(),
            signature,
        }
    }

    /// Same owner and signature, different simple name.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        MethodKey::new(self.owner.clone(), name, self.signature.clone())
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}{}", self.owner, self.name, self.signature)
    }
}

// ============================================================================
// Descriptor parser (winnow)
// ============================================================================

fn method_descriptor(input: &mut &str) -> ModalResult<(Vec<TypeKey>, TypeKey)> {
    let params: Vec<TypeKey> = delimited('(', repeat(0.., field_type), ')').parse_next(input)?;
    let ret = field_type.parse_next(input)?;
    Ok((params, ret))
}

fn field_type(input: &mut &str) -> ModalResult<TypeKey> {
    let dims = repeat(0.., '[')
        .map(|brackets: Vec<char>| brackets.len())
        .parse_next(input)?;
    let element = alt((primitive_type, object_type)).parse_next(input)?;
    Ok(element.array_of(dims))
}

fn primitive_type(input: &mut &str) -> ModalResult<TypeKey> {
    let code = one_of(['B', 'C', 'D', 'F', 'I', 'J', 'S', 'Z', 'V']).parse_next(input)?;
    let name = PRIMITIVES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or("void");
    Ok(TypeKey::new(name))
}

fn object_type(input: &mut &str) -> ModalResult<TypeKey> {
    delimited('L', take_till(1.., ';'), ';')
        .map(TypeKey::from_internal_name)
        .parse_next(input)
}

// ============================================================================
// Tests
// ============================================================================
