//! Run-scoped identity caches from declaration node to derived key.
//!
//! Entries are keyed by [`NodeId`] (node identity, never node value) and hold
//! only the derived key, so the cache keeps nothing of the parsed source
//! alive. A cache belongs to exactly one run and is dropped with it.
//!
//! Derivation failures are cached too: a node whose key cannot be derived is
//! not re-derived on a later visit.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::Serialize;

use crate::keys::{FieldKey, MethodKey, TypeKey};
use crate::model::NodeId;

/// Hit/miss counters for one cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that ran the derivation.
    pub misses: u64,
    /// Entries currently stored.
    pub entries: usize,
}

/// Identity-keyed memo of derived keys.
#[derive(Debug)]
pub struct IdentityCache<K> {
    entries: HashMap<NodeId, Option<K>>,
    hits: u64,
    misses: u64,
}

impl<K> Default for IdentityCache<K> {
    fn default() -> Self {
        IdentityCache {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }
}

impl<K> IdentityCache<K> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the key stored for `node`, running `derive` on first request.
    ///
    /// `derive` runs at most once per node for the life of the cache, whether
    /// it produced a key or not.
    pub fn get_or_compute<F>(&mut self, node: NodeId, derive: F) -> Option<&K>
    where
        F: FnOnce() -> Option<K>,
    {
        match self.entries.entry(node) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                entry.into_mut().as_ref()
            }
            Entry::Vacant(entry) => {
                self.misses += 1;
                entry.insert(derive()).as_ref()
            }
        }
    }

    /// Stored key for `node` without deriving.
    pub fn get(&self, node: NodeId) -> Option<&K> {
        self.entries.get(&node).and_then(Option::as_ref)
    }

    /// Number of stored entries (including underivable nodes).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry and reset counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}

/// One cache per declaration category, owned by a single run.
#[derive(Debug, Default)]
pub struct KeyCaches {
    /// Class declarations (also consulted for member owners).
    pub types: IdentityCache<TypeKey>,
    /// Field declarations.
    pub fields: IdentityCache<FieldKey>,
    /// Method declarations.
    pub methods: IdentityCache<MethodKey>,
}

impl KeyCaches {
    /// Fresh, empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for all three caches.
    pub fn stats(&self) -> KeyCacheStats {
        KeyCacheStats {
            types: self.types.stats(),
            fields: self.fields.stats(),
            methods: self.methods.stats(),
        }
    }
}

/// Counters for all three caches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeyCacheStats {
    /// Class keys, one entry per type declaration seen.
    pub types: CacheStats,
    /// Field keys, one entry per field declaration seen.
    pub fields: CacheStats,
    /// Method keys, one entry per method declaration seen.
    pub methods: CacheStats,
}
