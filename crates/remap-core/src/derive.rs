//! Symbol key derivation from declaration nodes.
//!
//! Keys are derived from the model's *original* view of a declaration, and
//! owner keys always go through the type cache. Once a class has been keyed,
//! renaming it cannot change the keys of its members: they see the pinned
//! pre-rename owner.
//!
//! Derivation returns `None` for declarations that cannot be keyed (anonymous
//! or local owners, unresolvable types). Callers skip those.

use crate::cache::IdentityCache;
use crate::keys::{FieldKey, MethodKey, MethodSignature, SymbolKind, TypeKey};
use crate::model::{DeclarationModel, NodeId};

/// Type key for a class-like declaration.
pub fn type_key<M: DeclarationModel + ?Sized>(model: &M, node: NodeId) -> Option<TypeKey> {
    if model.kind(node) != SymbolKind::Class {
        return None;
    }
    model.qualified_name(node).map(TypeKey::new)
}

/// Cached type key of the type immediately enclosing `node`.
pub fn owner_key<M: DeclarationModel + ?Sized>(
    types: &mut IdentityCache<TypeKey>,
    model: &M,
    node: NodeId,
) -> Option<TypeKey> {
    let owner = model.enclosing_type(node)?;
    types
        .get_or_compute(owner, || type_key(model, owner))
        .cloned()
}

/// Field key: (owner, simple name).
pub fn field_key<M: DeclarationModel + ?Sized>(
    types: &mut IdentityCache<TypeKey>,
    model: &M,
    node: NodeId,
) -> Option<FieldKey> {
    if model.kind(node) != SymbolKind::Field {
        return None;
    }
    let owner = owner_key(types, model, node)?;
    Some(FieldKey::new(owner, model.simple_name(node)))
}

/// Method key: (owner, simple name, parameter types, return type).
///
/// Declared type names are used verbatim. Primitive and boxed forms are not
/// normalized against each other.
pub fn method_key<M: DeclarationModel + ?Sized>(
    types: &mut IdentityCache<TypeKey>,
    model: &M,
    node: NodeId,
) -> Option<MethodKey> {
    if model.kind(node) != SymbolKind::Method {
        return None;
    }
    let owner = owner_key(types, model, node)?;
    let params = model
        .parameter_types(node)?
        .into_iter()
        .map(TypeKey::new)
        .collect();
    let ret = TypeKey::new(model.return_type(node)?);
    Some(MethodKey::new(
        owner,
        model.simple_name(node),
        MethodSignature::new(params, ret),
    ))
}
