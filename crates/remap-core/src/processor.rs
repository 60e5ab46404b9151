//! Rename processors, one per declaration category.
//!
//! Each processor handles one visited declaration:
//!
//! 1. derive (or fetch from the run's cache) the declaration's old key
//! 2. look the key up in the [`MappingTable`]
//! 3. unmapped: nothing happens
//! 4. mapped: replace the simple name, and only the simple name
//! 5. report the rename as a [`RenameRecord`]
//!
//! A declaration whose key cannot be derived is skipped. Nothing a processor
//! does can fail the run.

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::cache::KeyCaches;
use crate::derive;
use crate::keys::SymbolKind;
use crate::mapping::MappingTable;
use crate::model::{DeclarationModel, NodeId};
use crate::types::Location;

/// One applied rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameRecord {
    /// Declaration category.
    pub kind: SymbolKind,
    /// Old canonical key, rendered.
    pub old_key: String,
    /// New canonical key, rendered.
    pub new_key: String,
    /// Simple name before the rename.
    pub old_name: String,
    /// Simple name after the rename.
    pub new_name: String,
    /// Where the declaration's name sits, when the model knows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// Result of processing one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The key has no mapping (or already carries the new name).
    Unchanged,
    /// The key could not be derived.
    Skipped,
    /// The simple name was replaced.
    Renamed(RenameRecord),
}

/// The closed set of processors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemapProcessor {
    /// Renames class-like declarations.
    Class,
    /// Renames field declarations.
    Field,
    /// Renames method declarations.
    Method,
}

impl RemapProcessor {
    /// The processor responsible for `kind`.
    pub fn for_kind(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Class => RemapProcessor::Class,
            SymbolKind::Field => RemapProcessor::Field,
            SymbolKind::Method => RemapProcessor::Method,
        }
    }

    /// The category this processor handles.
    pub fn kind(self) -> SymbolKind {
        match self {
            RemapProcessor::Class => SymbolKind::Class,
            RemapProcessor::Field => SymbolKind::Field,
            RemapProcessor::Method => SymbolKind::Method,
        }
    }

    /// Process one declaration. See the module docs for the steps.
    pub fn process<M: DeclarationModel + ?Sized>(
        self,
        table: &MappingTable,
        caches: &mut KeyCaches,
        model: &mut M,
        node: NodeId,
    ) -> Outcome {
        if model.kind(node) != self.kind() {
            return Outcome::Skipped;
        }

        let KeyCaches {
            types,
            fields,
            methods,
        } = caches;

        let target = match self {
            RemapProcessor::Class => {
                let Some(old) = types.get_or_compute(node, || derive::type_key(&*model, node))
                else {
                    return skipped(self, &*model, node);
                };
                table.mapped_type(old).map(|new| {
                    (
                        old.to_string(),
                        new.to_string(),
                        new.simple_name().to_string(),
                    )
                })
            }
            RemapProcessor::Field => {
                let Some(old) =
                    fields.get_or_compute(node, || derive::field_key(types, &*model, node))
                else {
                    return skipped(self, &*model, node);
                };
                table
                    .mapped_field_name(old)
                    .map(|name| (old.to_string(), old.with_name(name).to_string(), name.to_string()))
            }
            RemapProcessor::Method => {
                let Some(old) =
                    methods.get_or_compute(node, || derive::method_key(types, &*model, node))
                else {
                    return skipped(self, &*model, node);
                };
                table
                    .mapped_method_name(old)
                    .map(|name| (old.to_string(), old.with_name(name).to_string(), name.to_string()))
            }
        };

        let Some((old_key, new_key, new_name)) = target else {
            trace!(kind = %self.kind(), node = %node, "no mapping");
            return Outcome::Unchanged;
        };

        let old_name = model.simple_name(node).to_string();
        if old_name == new_name {
            debug!(
                kind = %self.kind(),
                old = %old_key,
                new = %new_key,
                "simple name already matches target"
            );
            return Outcome::Unchanged;
        }

        let location = model.location(node);
        model.set_simple_name(node, &new_name);
        info!(kind = %self.kind(), old = %old_key, new = %new_key, "applied rename");

        Outcome::Renamed(RenameRecord {
            kind: self.kind(),
            old_key,
            new_key,
            old_name,
            new_name,
            location,
        })
    }
}

fn skipped<M: DeclarationModel + ?Sized>(
    processor: RemapProcessor,
    model: &M,
    node: NodeId,
) -> Outcome {
    debug!(
        kind = %processor.kind(),
        name = model.simple_name(node),
        node = %node,
        "skipping declaration without a derivable key"
    );
    Outcome::Skipped
}
