//! Mapping tables: old symbol key to new symbol key, per category.
//!
//! Two forms exist:
//!
//! - [`Mappings`]: the mutable form built while reading a mapping file. It
//!   keeps every entry exactly as written (new owners, new signatures) so the
//!   consistency checker can validate them.
//! - [`MappingTable`]: the immutable snapshot the engine consults. Member
//!   entries are reduced to their new simple name, and lookups of absent keys
//!   return the key unchanged.
//!
//! Loading is all-or-nothing: [`MappingTable::load`] reads, parses, checks and
//! snapshots, and any failure surfaces before a traversal can start.

mod consistency;
mod srg;

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::keys::{FieldKey, MethodKey, TypeKey};

pub use consistency::{check_consistency, ConsistencyError, Violation};
pub use srg::{parse_srg, MappingParseError, ParseErrorKind};

// ============================================================================
// Errors
// ============================================================================

/// Two entries for the same old key disagree on the target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{category} '{old}' is mapped to both '{existing}' and '{new}'")]
pub struct DuplicateMapping {
    pub category: &'static str,
    pub old: String,
    pub existing: String,
    pub new: String,
}

/// Failure to produce a usable mapping table.
#[derive(Debug, Error)]
pub enum MappingError {
    /// The mapping file could not be read.
    #[error("failed to read mappings from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The mapping file is not valid SRG.
    #[error("failed to parse mappings from {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: MappingParseError,
    },

    /// The entries parsed but contradict each other.
    #[error("mappings in {} are inconsistent: {source}", path.display())]
    Consistency {
        path: PathBuf,
        #[source]
        source: ConsistencyError,
    },
}

// ============================================================================
// Mutable Mappings
// ============================================================================

/// Mapping entries as written in a mapping file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mappings {
    packages: BTreeMap<String, String>,
    types: BTreeMap<TypeKey, TypeKey>,
    fields: BTreeMap<FieldKey, FieldKey>,
    methods: BTreeMap<MethodKey, MethodKey>,
}

impl Mappings {
    /// Empty mappings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a package rename. Recorded for reporting only.
    pub fn put_package(
        &mut self,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Result<(), DuplicateMapping> {
        let (old, new) = (old.into(), new.into());
        insert_unique(&mut self.packages, "package", old, new, |s| s.clone())
    }

    /// Record a type rename.
    pub fn put_type(&mut self, old: TypeKey, new: TypeKey) -> Result<(), DuplicateMapping> {
        insert_unique(&mut self.types, "class", old, new, |k| k.to_string())
    }

    /// Record a field rename (new owner and name as written).
    pub fn put_field(&mut self, old: FieldKey, new: FieldKey) -> Result<(), DuplicateMapping> {
        insert_unique(&mut self.fields, "field", old, new, |k| k.to_string())
    }

    /// Record a method rename (new owner, name and signature as written).
    pub fn put_method(&mut self, old: MethodKey, new: MethodKey) -> Result<(), DuplicateMapping> {
        insert_unique(&mut self.methods, "method", old, new, |k| k.to_string())
    }

    /// Mapped type, or the same key if unmapped.
    pub fn new_type(&self, old: &TypeKey) -> TypeKey {
        self.types.get(old).cloned().unwrap_or_else(|| old.clone())
    }

    /// Type entries in key order.
    pub fn types(&self) -> impl Iterator<Item = (&TypeKey, &TypeKey)> {
        self.types.iter()
    }

    /// Field entries in key order.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldKey, &FieldKey)> {
        self.fields.iter()
    }

    /// Method entries in key order.
    pub fn methods(&self) -> impl Iterator<Item = (&MethodKey, &MethodKey)> {
        self.methods.iter()
    }

    /// Package entries in key order.
    pub fn packages(&self) -> impl Iterator<Item = (&String, &String)> {
        self.packages.iter()
    }

    /// Freeze into an immutable table.
    ///
    /// Identity entries are dropped; member targets keep only the new simple
    /// name (owner and signature stay those of the old key).
    pub fn snapshot(&self) -> MappingTable {
        let types: HashMap<TypeKey, TypeKey> = self
            .types
            .iter()
            .filter(|(old, new)| old != new)
            .map(|(old, new)| (old.clone(), new.clone()))
            .collect();
        let fields: HashMap<FieldKey, String> = self
            .fields
            .iter()
            .filter(|(old, new)| old.name != new.name)
            .map(|(old, new)| (old.clone(), new.name.clone()))
            .collect();
        let methods: HashMap<MethodKey, String> = self
            .methods
            .iter()
            .filter(|(old, new)| old.name != new.name)
            .map(|(old, new)| (old.clone(), new.name.clone()))
            .collect();

        MappingTable {
            types,
            fields,
            methods,
            packages: self.packages.len(),
        }
    }
}

fn insert_unique<K: Ord, V: PartialEq>(
    map: &mut BTreeMap<K, V>,
    category: &'static str,
    old: K,
    new: V,
    show: impl Fn(&V) -> String,
) -> Result<(), DuplicateMapping>
where
    K: std::fmt::Display,
{
    if let Some(existing) = map.get(&old) {
        if *existing == new {
            return Ok(());
        }
        return Err(DuplicateMapping {
            category,
            old: old.to_string(),
            existing: show(existing),
            new: show(&new),
        });
    }
    map.insert(old, new);
    Ok(())
}

// ============================================================================
// Immutable Table
// ============================================================================

/// Entry counts for a loaded table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MappingSummary {
    /// Package entries (parsed, never applied).
    pub packages: usize,
    /// Effective type renames.
    pub types: usize,
    /// Effective field renames.
    pub fields: usize,
    /// Effective method renames.
    pub methods: usize,
}

/// Immutable snapshot consulted by the rename processors.
///
/// Every lookup is total: an absent key maps to itself.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    types: HashMap<TypeKey, TypeKey>,
    fields: HashMap<FieldKey, String>,
    methods: HashMap<MethodKey, String>,
    packages: usize,
}

impl MappingTable {
    /// Read, parse, validate and snapshot an SRG mapping file.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let text = fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mappings = parse_srg(&text).map_err(|source| MappingError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        check_consistency(&mappings).map_err(|source| MappingError::Consistency {
            path: path.to_path_buf(),
            source,
        })?;

        let table = mappings.snapshot();
        debug!(
            path = %path.display(),
            types = table.types.len(),
            fields = table.fields.len(),
            methods = table.methods.len(),
            "loaded mapping table"
        );
        Ok(table)
    }

    /// Mapped type, or the same key if unmapped.
    pub fn lookup_type(&self, key: &TypeKey) -> TypeKey {
        self.mapped_type(key).cloned().unwrap_or_else(|| key.clone())
    }

    /// Mapped field (same owner, new name), or the same key if unmapped.
    pub fn lookup_field(&self, key: &FieldKey) -> FieldKey {
        match self.mapped_field_name(key) {
            Some(name) => key.with_name(name),
            None => key.clone(),
        }
    }

    /// Mapped method (same owner and signature, new name), or the same key.
    pub fn lookup_method(&self, key: &MethodKey) -> MethodKey {
        match self.mapped_method_name(key) {
            Some(name) => key.with_name(name),
            None => key.clone(),
        }
    }

    /// New type key if `key` is renamed. Allocation-free on a miss.
    pub fn mapped_type(&self, key: &TypeKey) -> Option<&TypeKey> {
        self.types.get(key)
    }

    /// New simple name if the field is renamed.
    pub fn mapped_field_name(&self, key: &FieldKey) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// New simple name if the method is renamed.
    pub fn mapped_method_name(&self, key: &MethodKey) -> Option<&str> {
        self.methods.get(key).map(String::as_str)
    }

    /// Whether the table renames nothing.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.fields.is_empty() && self.methods.is_empty()
    }

    /// Entry counts.
    pub fn summary(&self) -> MappingSummary {
        MappingSummary {
            packages: self.packages,
            types: self.types.len(),
            fields: self.fields.len(),
            methods: self.methods.len(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
