//! Remap orchestration: one engine per mapping table, one run per traversal.
//!
//! A [`RemapEngine`] holds the immutable [`MappingTable`]. Each call to
//! [`RemapEngine::begin_run`] creates a [`RemapRun`] with fresh caches; the
//! run visits one or more models and is consumed by [`RemapRun::finish`].
//! Nothing survives from one run to the next.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::cache::{KeyCacheStats, KeyCaches};
use crate::mapping::{MappingError, MappingTable};
use crate::model::{DeclarationModel, NodeId};
use crate::processor::{Outcome, RemapProcessor, RenameRecord};

// ============================================================================
// Engine
// ============================================================================

/// Entry point holding the loaded table.
#[derive(Debug, Clone)]
pub struct RemapEngine {
    table: Arc<MappingTable>,
}

impl RemapEngine {
    /// Wrap an already loaded table.
    pub fn new(table: MappingTable) -> Self {
        RemapEngine {
            table: Arc::new(table),
        }
    }

    /// Load and validate an SRG file. Fails before any traversal.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        MappingTable::load(path).map(Self::new)
    }

    /// The table this engine applies.
    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    /// Start a run with empty caches.
    pub fn begin_run(&self) -> RemapRun {
        RemapRun {
            table: Arc::clone(&self.table),
            caches: KeyCaches::new(),
            records: Vec::new(),
            stats: RunStats::default(),
        }
    }
}

// ============================================================================
// Run
// ============================================================================

/// Per-outcome counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Declarations visited.
    pub visited: usize,
    /// Declarations renamed.
    pub renamed: usize,
    /// Declarations with no mapping.
    pub unchanged: usize,
    /// Declarations whose key could not be derived.
    pub skipped: usize,
}

impl RunStats {
    fn record(&mut self, outcome: &Outcome) {
        self.visited += 1;
        match outcome {
            Outcome::Renamed(_) => self.renamed += 1,
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Applied renames in visit order.
    pub records: Vec<RenameRecord>,
    /// Outcome counters.
    pub stats: RunStats,
    /// Cache counters at the end of the run.
    pub cache: KeyCacheStats,
}

/// One traversal's state: the table, its caches and the renames so far.
#[derive(Debug)]
pub struct RemapRun {
    table: Arc<MappingTable>,
    caches: KeyCaches,
    records: Vec<RenameRecord>,
    stats: RunStats,
}

impl RemapRun {
    /// Visit every declaration `model` yields.
    ///
    /// Returns the renames applied to this model.
    pub fn remap<M: DeclarationModel + ?Sized>(&mut self, model: &mut M) -> Vec<RenameRecord> {
        let mut applied = Vec::new();
        for node in model.declarations() {
            if let Outcome::Renamed(record) = self.visit(model, node) {
                applied.push(record);
            }
        }
        applied
    }

    /// Dispatch one declaration to its processor.
    pub fn visit<M: DeclarationModel + ?Sized>(&mut self, model: &mut M, node: NodeId) -> Outcome {
        let processor = RemapProcessor::for_kind(model.kind(node));
        let outcome = processor.process(&self.table, &mut self.caches, model, node);
        self.stats.record(&outcome);
        if let Outcome::Renamed(record) = &outcome {
            self.records.push(record.clone());
        }
        outcome
    }

    /// Counters so far.
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// End the run, dropping its caches.
    pub fn finish(self) -> RunReport {
        let cache = self.caches.stats();
        debug!(
            visited = self.stats.visited,
            renamed = self.stats.renamed,
            unchanged = self.stats.unchanged,
            skipped = self.stats.skipped,
            cache_hits = cache.types.hits + cache.fields.hits + cache.methods.hits,
            "remap run finished"
        );
        RunReport {
            records: self.records,
            stats: self.stats,
            cache,
        }
    }
}
